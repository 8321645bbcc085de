//! Shared items related to user account control

mod errors;
mod responses;
mod role;
mod user;

pub use errors::RegistrationError;
pub use responses::{AuthResponse, CustomerProfile, RefreshResponse};
pub use role::{AccessProfile, Role, RoleClass};
pub use user::{ResponderType, UserRecord, UserType};

//! Stores the session and access control functionality used by every Ryde
//! client
//! NB: The assumption is made that the async runtime has already been started
//! before any functions from this library are called

#![warn(unused_crate_dependencies)]


mod access_gate;
mod client;
pub mod configuration;
mod session_store;
mod storage;

pub use access_gate::{decide, AccessDecision, AccessGate, Destination};
pub use client::{AuthOutcome, Client, UiCallBack, DUMMY_ARGUMENT};
pub use session_store::{SessionStore, SESSION_KEYS};
pub use storage::{MemoryStorage, SessionStorage};

//! Decides on every navigation whether the destination is rendered or the
//! visitor is sent somewhere else

use ryde_shared::uac::{AccessProfile, Role, RoleClass};

use crate::SessionStore;

const CUSTOMER_ROLES: &[Role] = &[Role::Customer];
const DRIVER_ROLES: &[Role] = &[Role::Driver, Role::BodaRider];
const ADMIN_ROLES: &[Role] = &[Role::Staff, Role::Superuser];

/// Every view the client can navigate to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Destination {
    Homepage,
    Login,
    Register,
    Chatbot,
    RequestRide,
    MyRides,
    CustomerDashboard,
    DriverDashboard,
    AdminDashboard,
}

impl Destination {
    pub const fn path(self) -> &'static str {
        match self {
            Destination::Homepage => "/homepage",
            Destination::Login => "/login",
            Destination::Register => "/register",
            Destination::Chatbot => "/chatbot",
            Destination::RequestRide => "/request-ride",
            Destination::MyRides => "/my-rides",
            Destination::CustomerDashboard => "/dashboard",
            Destination::DriverDashboard => "/driver-dashboard",
            Destination::AdminDashboard => "/admin-dashboard",
        }
    }

    /// `None` for public destinations. For protected destinations an empty
    /// slice means any authenticated visitor may enter.
    pub const fn allowed_roles(self) -> Option<&'static [Role]> {
        match self {
            Destination::Homepage
            | Destination::Login
            | Destination::Register
            | Destination::Chatbot => None,
            Destination::RequestRide | Destination::MyRides | Destination::CustomerDashboard => {
                Some(CUSTOMER_ROLES)
            }
            Destination::DriverDashboard => Some(DRIVER_ROLES),
            Destination::AdminDashboard => Some(ADMIN_ROLES),
        }
    }

    #[must_use]
    pub const fn is_protected(self) -> bool {
        self.allowed_roles().is_some()
    }

    /// Looks up a destination by path. The root path maps to the homepage and
    /// a trailing slash is ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        use strum::IntoEnumIterator as _;
        let trimmed = path.trim();
        if trimmed == "/" {
            return Some(Self::Homepage);
        }
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        Self::iter().find(|destination| destination.path() == trimmed)
    }

    /// Where a visitor of this class lands after logging in
    pub fn home_for(role_class: RoleClass) -> Self {
        match role_class {
            RoleClass::Admin => Self::AdminDashboard,
            RoleClass::Customer => Self::CustomerDashboard,
            RoleClass::Driver => Self::DriverDashboard,
            RoleClass::Unclassified => Self::Homepage,
        }
    }
}

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Redirect(Destination),
}

impl AccessDecision {
    /// Returns `true` if the access decision is [`Allow`].
    ///
    /// [`Allow`]: AccessDecision::Allow
    #[must_use]
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// The access rules. `profile` is `None` when the visitor is not
/// authenticated and an empty `allowed_roles` admits any authenticated visitor.
///
/// The order of the checks is the precedence. Admins are resolved before the
/// user type is looked at so an admin never gets a role specific fallback.
pub fn decide(profile: Option<&AccessProfile>, allowed_roles: &[Role]) -> AccessDecision {
    let Some(profile) = profile else {
        return AccessDecision::Redirect(Destination::Login);
    };
    let is_admin = profile.is_admin();
    if is_admin && allowed_roles.contains(&Role::Staff) {
        return AccessDecision::Allow;
    }
    if is_admin {
        return AccessDecision::Redirect(Destination::AdminDashboard);
    }
    if !allowed_roles.is_empty() && !profile.user_type_in(allowed_roles) {
        // Keyed by who the visitor is, not by where they tried to go
        return AccessDecision::Redirect(Destination::home_for(profile.role_class()));
    }
    AccessDecision::Allow
}

/// Evaluates [`decide`] against the live session. Nothing is cached so a
/// login, logout or cleared session is picked up on the next navigation.
#[derive(Debug, Clone, Copy)]
pub struct AccessGate<'a> {
    session: &'a SessionStore,
}

impl<'a> AccessGate<'a> {
    pub fn new(session: &'a SessionStore) -> Self {
        Self { session }
    }

    #[tracing::instrument(skip(self), ret)]
    pub fn check(&self, allowed_roles: &[Role]) -> AccessDecision {
        decide(self.session.authenticated_profile().as_ref(), allowed_roles)
    }

    /// Public destinations are always allowed
    #[tracing::instrument(skip(self), ret)]
    pub fn navigate(&self, destination: Destination) -> AccessDecision {
        match destination.allowed_roles() {
            Some(allowed_roles) => self.check(allowed_roles),
            None => AccessDecision::Allow,
        }
    }

    /// Where the visitor should be sent after logging in
    pub fn landing(&self) -> Destination {
        match self.session.authenticated_profile() {
            Some(profile) => Destination::home_for(profile.role_class()),
            None => Destination::Login,
        }
    }
}

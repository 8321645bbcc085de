use super::{UserRecord, UserType};

/// A role a destination can declare as allowed to enter it
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Customer,
    Driver,
    BodaRider,
    Staff,
    Superuser,
}

/// Classification used only for routing decisions. Never stored, always
/// derived from the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleClass {
    /// Staff or superuser, whatever the user type
    Admin,
    Customer,
    /// Both car drivers and boda riders
    Driver,
    Unclassified,
}

/// The inputs needed to decide what a visitor may access
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessProfile {
    pub user_type: Option<UserType>,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl AccessProfile {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_staff || self.is_superuser
    }

    pub fn role_class(&self) -> RoleClass {
        if self.is_admin() {
            return RoleClass::Admin;
        }
        match self.user_type {
            Some(UserType::Customer) => RoleClass::Customer,
            Some(UserType::Driver | UserType::BodaRider) => RoleClass::Driver,
            Some(UserType::EmergencyResponder | UserType::Other(_)) | None => {
                RoleClass::Unclassified
            }
        }
    }

    /// Returns `true` if the user type is one of `roles`
    #[must_use]
    pub fn user_type_in(&self, roles: &[Role]) -> bool {
        self.user_type
            .as_ref()
            .and_then(UserType::as_role)
            .is_some_and(|role| roles.contains(&role))
    }
}

impl From<&UserRecord> for AccessProfile {
    fn from(value: &UserRecord) -> Self {
        Self {
            user_type: value.user_type.clone(),
            is_staff: value.is_staff,
            is_superuser: value.is_superuser,
        }
    }
}

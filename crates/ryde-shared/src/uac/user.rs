use std::fmt::Display;

use crate::id::UserId;

use super::Role;

/// The kind of account chosen at registration.
///
/// Values the client does not know about are kept verbatim in [`Other`] so
/// that writing them back out yields exactly what the backend sent.
///
/// [`Other`]: UserType::Other
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserType {
    Customer,
    Driver,
    /// Two wheeler (motorbike taxi) driver
    BodaRider,
    EmergencyResponder,
    Other(String),
}

impl UserType {
    pub fn as_str(&self) -> &str {
        match self {
            UserType::Customer => "customer",
            UserType::Driver => "driver",
            UserType::BodaRider => "boda_rider",
            UserType::EmergencyResponder => "emergency_responder",
            UserType::Other(s) => s,
        }
    }

    /// The role this user type satisfies when a destination lists allowed
    /// roles. Staff and superuser are flags on the account, not user types.
    pub fn as_role(&self) -> Option<Role> {
        match self {
            UserType::Customer => Some(Role::Customer),
            UserType::Driver => Some(Role::Driver),
            UserType::BodaRider => Some(Role::BodaRider),
            UserType::EmergencyResponder | UserType::Other(_) => None,
        }
    }

    /// Returns `true` for the user types that drive a vehicle and need a
    /// license to register
    #[must_use]
    pub fn is_driver_kind(&self) -> bool {
        matches!(self, Self::Driver | Self::BodaRider)
    }
}

impl From<String> for UserType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "customer" => Self::Customer,
            "driver" => Self::Driver,
            "boda_rider" => Self::BodaRider,
            "emergency_responder" => Self::EmergencyResponder,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for UserType {
    fn from(value: &str) -> Self {
        value.to_string().into()
    }
}

impl From<UserType> for String {
    fn from(value: UserType) -> Self {
        match value {
            UserType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Service offered by an emergency responder
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    strum::EnumString,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResponderType {
    Ambulance,
    TowTruck,
    Police,
    Fire,
    BodaEmergency,
}

/// The authenticated user as returned by the backend on login
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub user_type: Option<UserType>,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

impl UserRecord {
    /// First and last name separated by a space, skipping whichever is blank
    pub fn full_name(&self) -> String {
        [self.first_name.trim(), self.last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

//! This module stores the arguments for the requests the client sends.
//! Secrets are kept in [`SecretString`] and only exposed when the request body
//! is built.

use secrecy::{ExposeSecret, SecretString};

use crate::uac::{RegistrationError, ResponderType, UserType};

#[derive(Debug, Clone)]
pub struct LoginReqArgs {
    pub email: String,
    pub password: SecretString,
}

impl LoginReqArgs {
    pub fn new<S: Into<String>>(email: S, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegisterReqArgs {
    pub email: String,
    pub password: SecretString,
    pub password2: SecretString,
    pub user_type: UserType,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    /// Only used by drivers and boda riders
    pub driver_license: Option<String>,
    /// Only used by emergency responders
    pub responder_type: Option<ResponderType>,
}

impl RegisterReqArgs {
    /// Checks the fields that depend on each other. Everything else is left
    /// for the backend to validate.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        if self.password.expose_secret() != self.password2.expose_secret() {
            return Err(RegistrationError::PasswordsDoNotMatch);
        }
        if self.user_type.is_driver_kind()
            && self
                .driver_license
                .as_deref()
                .is_none_or(|license| license.trim().is_empty())
        {
            return Err(RegistrationError::MissingDriverLicense(
                self.user_type.clone(),
            ));
        }
        if self.user_type == UserType::EmergencyResponder && self.responder_type.is_none() {
            return Err(RegistrationError::MissingResponderType);
        }
        Ok(())
    }

    /// The body expected by the backend. Optional fields are only included
    /// for the user types that use them.
    pub fn to_json(&self) -> serde_json::Value {
        let mut result = serde_json::json!({
            "email": self.email,
            "password": self.password.expose_secret(),
            "password2": self.password2.expose_secret(),
            "user_type": self.user_type,
            "phone_number": self.phone_number,
            "first_name": self.first_name,
            "last_name": self.last_name,
        });
        if self.user_type.is_driver_kind() {
            result["driver_license"] = serde_json::json!(self.driver_license);
        }
        if self.user_type == UserType::EmergencyResponder {
            result["responder_type"] = serde_json::json!(self.responder_type);
        }
        result
    }
}

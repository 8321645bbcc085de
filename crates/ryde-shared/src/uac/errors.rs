/// Problems found with registration details before they are sent
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("You entered two different passwords - the field values must match.")]
    PasswordsDoNotMatch,
    #[error("A driver license number is required to register as a {0}")]
    MissingDriverLicense(super::UserType),
    #[error("Select a service type to register as an emergency responder")]
    MissingResponderType,
}

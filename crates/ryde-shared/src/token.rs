//! Bearer credentials issued by the backend
//!
//! Both token types refuse to be empty and never print their contents in
//! `Debug` output so they can not leak into traces

use std::fmt::Debug;

use crate::errors::ConversionError;

macro_rules! token_newtype {
    ($name:ident) => {
        #[derive(Clone, PartialEq, Eq)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ConversionError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                if value.is_empty() {
                    return Err(ConversionError::Empty);
                }
                Ok(Self(value))
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ConversionError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                value.to_string().try_into()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}([REDACTED])", stringify!($name))
            }
        }
    };
}

token_newtype!(AccessToken);
token_newtype!(RefreshToken);

impl AccessToken {
    /// Number of dot separated parts in a signed token (header, claims,
    /// signature)
    pub const SEGMENT_COUNT: usize = 3;

    /// Structural check only. Neither the signature nor the expiry is
    /// verified as the client has no key material and no trusted clock.
    #[must_use]
    pub fn has_signed_token_shape(&self) -> bool {
        let mut count = 0;
        for segment in self.0.split('.') {
            if segment.is_empty() {
                return false;
            }
            count += 1;
        }
        count == Self::SEGMENT_COUNT
    }
}

/// The credentials returned together on login and registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: AccessToken,
    pub refresh: RefreshToken,
}

//! Newtype IDs for type-safe identifiers.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Catalog identifier of a rental product (`_id` on the wire).
    ProductId
);
define_id!(
    /// Booking-level code grouping the products of one quote request.
    SetCode
);

/// Characters a set code is drawn from.
pub const SET_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of a generated set code.
pub const SET_CODE_LEN: usize = 8;

impl SetCode {
    /// Generate a fresh code from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let code = (0..SET_CODE_LEN)
            .map(|_| SET_CODE_ALPHABET[rng.gen_range(0..SET_CODE_ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    /// Check the code has the generated shape.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == SET_CODE_LEN && self.0.bytes().all(|b| SET_CODE_ALPHABET.contains(&b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("64f0c2a1");
        assert_eq!(id.as_str(), "64f0c2a1");
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = ProductId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""abc""#);
    }

    #[test]
    fn test_set_code_shape() {
        for _ in 0..100 {
            let code = SetCode::generate();
            assert_eq!(code.as_str().len(), 8);
            assert!(code.is_well_formed(), "bad code {code}");
        }
    }

    #[test]
    fn test_set_codes_differ() {
        assert_ne!(SetCode::generate(), SetCode::generate());
    }

    #[test]
    fn test_set_code_rejects_lowercase() {
        assert!(!SetCode::new("abcd1234").is_well_formed());
        assert!(!SetCode::new("ABC").is_well_formed());
    }
}

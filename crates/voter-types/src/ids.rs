//! Type-safe identifier wrappers around `u64`.
//!
//! Voter and poll identifiers are both plain unsigned integers on the wire.
//! Wrapping them keeps a poll id from being passed where a voter id is
//! expected. Identifiers are always caller-assigned; nothing here generates
//! them.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around `u64` with standard derives.
///
/// The wrapper serializes as a bare JSON integer.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            /// Wrap a raw identifier value.
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Return the inner `u64` value.
            pub const fn into_inner(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a voter record.
    VoterId
}

define_id! {
    /// Identifier of a poll a voter took part in.
    PollId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_bare_integers() {
        let json = serde_json::to_string(&VoterId::new(42));
        assert_eq!(json.ok().as_deref(), Some("42"));

        let parsed: Result<PollId, _> = serde_json::from_str("500");
        assert_eq!(parsed.ok(), Some(PollId::new(500)));
    }

    #[test]
    fn display_is_decimal() {
        assert_eq!(VoterId::new(7).to_string(), "7");
        assert_eq!(u64::from(PollId::from(9)), 9);
    }
}

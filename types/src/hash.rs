//! Content hashes for blockchains and transactions.
//!
//! The node reports hashes as hex strings. The dashboard never recomputes or
//! validates them, so both types are opaque string keys.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The first `len` characters of the hash, for display.
            ///
            /// Returns the whole hash when it is shorter than `len`. Always
            /// cuts on a character boundary.
            pub fn prefix(&self, len: usize) -> &str {
                match self.0.char_indices().nth(len) {
                    Some((idx, _)) => &self.0[..idx],
                    None => &self.0,
                }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.prefix(8))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
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
    };
}

string_key!(
    /// Content hash of a proposed blockchain.
    ChainHash
);

string_key!(
    /// Hash of a transaction created by an endorser.
    TxHash
);

//! Identifier newtypes shared across the engine.
//!
//! Orders, users and symbols are all opaque strings at the boundary; wrapping
//! them keeps `submit(order_id, user_id)`-shaped call sites from silently
//! compiling when arguments are swapped.

use std::fmt;
use std::sync::Arc;

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(value: impl Into<Arc<str>>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Mints a fresh random identifier, the way callers that don't
            /// have a natural id of their own (e.g. a test harness) commonly
            /// generate order ids.
            pub fn new_uuid() -> Self {
                Self(Arc::from(uuid::Uuid::new_v4().to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(Arc::from(value))
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(Arc::from(value))
            }
        }
    };
}

string_id!(OrderId);
string_id!(UserId);
string_id!(SymbolId);

//! Crate-wide error type.
//!
//! Every failure surfaces to the caller of the operation that hit it;
//! there are no retries and nothing is swallowed. Operations are
//! fail-stop: an `Err` means the dictionary is unchanged and all of its
//! invariants still hold.

use crate::fallible::ObjectError;
use crate::mode::Mode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Lookup or pop on an absent key, or `popitem` on an empty dict.
    #[error("key not found")]
    KeyNotFound,

    /// A mutation the current mode forbids. Raised before any state
    /// changes.
    #[error("cannot {op} in '{mode}' mode")]
    ModeViolation { op: &'static str, mode: Mode },

    /// `dict_hash` on a dictionary whose mode is not hashable.
    #[error("unhashable in '{mode}' mode")]
    Unhashable { mode: Mode },

    /// A mode name that is not one of the five supported ones.
    #[error("unsupported mode '{0}'")]
    UnknownMode(String),

    /// A table growth step could not allocate. The previous arrays are
    /// intact and the dictionary stays usable.
    #[error("hash table allocation failed")]
    AllocationFailed,

    /// A key or value raised while being hashed.
    #[error("hash failed: {0}")]
    HashFailed(#[source] ObjectError),

    /// A key or value raised while being compared.
    #[error("equality failed: {0}")]
    EqFailed(#[source] ObjectError),
}

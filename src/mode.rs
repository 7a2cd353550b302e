//! Operational modes and their capability flags.

use core::fmt;
use core::str::FromStr;

use crate::error::Error;

pub const MODE_MUTABLE: u8 = 0;
pub const MODE_IMMUTABLE: u8 = 1;
pub const MODE_READONLY: u8 = 2;
pub const MODE_INSERT: u8 = 3;
pub const MODE_ARENA: u8 = 4;

/// Which mutations a [`crate::ZDict`] permits.
///
/// Reads are always allowed; `get` never consults the mode. Mutating
/// entry points check the relevant predicate before touching the table,
/// so a rejected call leaves the dictionary byte-for-byte unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mode {
    /// Fully functional, general-purpose dictionary.
    Mutable = MODE_MUTABLE,
    /// Frozen, hashable map.
    Immutable = MODE_IMMUTABLE,
    /// No mutation of any kind.
    Readonly = MODE_READONLY,
    /// New keys only; existing entries are fixed.
    Insert = MODE_INSERT,
    /// Pre-sized, unrestricted mutation.
    Arena = MODE_ARENA,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Mutable,
        Mode::Immutable,
        Mode::Readonly,
        Mode::Insert,
        Mode::Arena,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Mutable => "mutable",
            Mode::Immutable => "immutable",
            Mode::Readonly => "readonly",
            Mode::Insert => "insert",
            Mode::Arena => "arena",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Mode::Mutable => "Fully functional, general-purpose dict.",
            Mode::Immutable => "Frozen, hashable map.",
            Mode::Readonly => "No mutation, high-speed access.",
            Mode::Insert => "Fast insert-only usage.",
            Mode::Arena => "Pre-sized, pointer-stable structure.",
        }
    }

    pub const fn from_index(index: u8) -> Option<Mode> {
        match index {
            MODE_MUTABLE => Some(Mode::Mutable),
            MODE_IMMUTABLE => Some(Mode::Immutable),
            MODE_READONLY => Some(Mode::Readonly),
            MODE_INSERT => Some(Mode::Insert),
            MODE_ARENA => Some(Mode::Arena),
            _ => None,
        }
    }

    /// May a key that is not yet present be inserted?
    pub const fn allows_insert(self) -> bool {
        !matches!(self, Mode::Immutable | Mode::Readonly)
    }

    /// May the value of an existing key be replaced?
    pub const fn allows_update(self) -> bool {
        matches!(self, Mode::Mutable | Mode::Arena)
    }

    /// May entries be removed (`remove` / `pop` / `popitem` / `clear`)?
    pub const fn allows_delete(self) -> bool {
        matches!(self, Mode::Mutable | Mode::Arena)
    }

    /// Is the dictionary itself hashable in this mode?
    pub const fn hashable(self) -> bool {
        matches!(self, Mode::Immutable)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "mutable" => Ok(Mode::Mutable),
            "immutable" => Ok(Mode::Immutable),
            "readonly" => Ok(Mode::Readonly),
            "insert" => Ok(Mode::Insert),
            "arena" => Ok(Mode::Arena),
            other => Err(Error::UnknownMode(other.to_string())),
        }
    }
}

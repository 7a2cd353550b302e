//! zdict: a mode-gated dictionary over a SwissTable-style hash core.
//!
//! Two layers. [`SwissTable`] is an open-addressed table with one
//! metadata byte per slot (empty / tombstone / short hash) driving
//! linear probes, a 0.7 load factor, and strict fail-stop growth.
//! [`ZDict`] wraps one table with an operational [`Mode`] that fixes
//! which mutations are permitted: fully mutable, frozen-and-hashable,
//! readonly, insert-only, or arena. Mode violations are rejected
//! before any state changes.
//!
//! Keys and values hash and compare through [`TryHash`] / [`TryEq`].
//! The standard scalar and string types (plus references, `Rc` and
//! `Box`) implement both infallibly; host-object types implement the
//! traits directly, and their failures propagate through every
//! operation without corrupting the table.
//!
//! ```
//! use zdict::{Mode, ZDict};
//!
//! let mut d: ZDict<&str, i32> = ZDict::with_mode(Mode::Insert)?;
//! d.insert("a", 1)?;
//! assert!(d.insert("a", 2).is_err()); // existing keys are fixed
//! assert_eq!(d.get("a")?, Some(&1));
//! # Ok::<(), zdict::Error>(())
//! ```

mod dict;
mod error;
mod fallible;
mod mode;
mod swiss_table;

#[cfg(test)]
mod dict_proptest;

pub use dict::{Keys, Values, ZDict};
pub use error::{Error, Result};
pub use fallible::{ObjectError, TryEq, TryHash};
pub use mode::{
    Mode, MODE_ARENA, MODE_IMMUTABLE, MODE_INSERT, MODE_MUTABLE, MODE_READONLY,
};
pub use swiss_table::{IntoIter, Iter, SwissTable};

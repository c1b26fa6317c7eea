//! Entity handles, kind tags, errors, and randomness for Oly.
//!
//! This crate provides:
//! - [`BoxId`] - Integer entity handles (0 is "no entity")
//! - [`Kind`] / [`Subkind`] - Primary and secondary entity type tags
//! - [`LocDepth`] - Location nesting levels derived from subkinds
//! - [`Error`] - Invariant violation errors with context
//! - [`RandomSource`] / [`SimRng`] - Uniform random source used by the core

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;
pub mod random;
pub mod types;

pub use entity::BoxId;
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use random::{RandomSource, ScriptedRandom, SimRng};
pub use types::{Direction, Kind, LocDepth, Subkind};

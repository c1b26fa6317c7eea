//! Entity table, containment graph, and character stacking for Oly.
//!
//! This crate provides:
//! - [`EntityTable`] - Fixed-capacity entity arena with kind/subkind indices
//! - Typed extension records ([`CharInfo`], [`LocInfo`], [`SublocInfo`], ...)
//! - [`World`] - The simulation context, with containment and stacking
//!   operations implemented on it
//!
//! The containment graph is changed only through [`World::relocate`] and
//! the stacking operations built on it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod budget;
pub mod config;
pub mod containment;
pub mod entity;
pub mod extension;
pub mod index;
pub mod stack;
pub mod world;

pub use budget::Budget;
pub use config::{DEFAULT_MAX_HANDLE, WorldConfig};
pub use entity::{Entity, EntityTable};
pub use extension::{
    CharInfo, Extension, InventoryLine, ItemInfo, LocInfo, Loyalty, LoyaltyKind, MiscInfo,
    SublocInfo,
};
pub use index::ChainIndex;
pub use stack::{CaptureOutcome, Extraction, JoinOutcome};
pub use world::World;

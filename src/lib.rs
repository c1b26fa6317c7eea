//! Oly - Entity store and containment rules for a turn-based strategy world
//!
//! This crate re-exports all layers of the Oly system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: oly_engine     - Weights, movement gating, destruction
//! Layer 1: oly_storage    - Entity table, containment graph, stacking
//! Layer 0: oly_foundation - Core types (BoxId, Kind, Subkind, Error, randomness)
//! ```

pub use oly_engine as engine;
pub use oly_foundation as foundation;
pub use oly_storage as storage;

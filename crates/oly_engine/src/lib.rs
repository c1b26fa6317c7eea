//! Weights, movement gating, and destruction rules for Oly.
//!
//! This crate provides:
//! - [`Weights`] - Load and capacity figures, with [`unit_weights`] and friends
//! - [`land_check`] / [`ship_check`] - Movement gating returning [`MoveCheck`]
//! - [`sink_ship`] / [`building_collapses`] - Destruction that unwinds the
//!   containment graph
//! - [`find_nearest_land`] - Stochastic search for a castaway's landfall
//! - [`Collaborators`] / [`Services`] - Hooks into narration, skills, and
//!   randomness

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod catalog;
pub mod collaborators;
pub mod config;
pub mod destruction;
pub mod land_search;
pub mod movement;
pub mod weights;

pub use catalog::{
    ITEM_GOLD, ITEM_OX, ITEM_PEASANT, ITEM_RIDING_HORSE, ITEM_SOLDIER, ITEM_WINGED_HORSE,
    ITEM_WORKER, install_standard_items,
};
pub use collaborators::{Collaborators, NullCollaborators, RecordingCollaborators, Services};
pub use config::EngineConfig;
pub use destruction::{
    Collapse, SinkReport, accumulate_damage, bind_storm, building_collapses,
    collapse_mine_debris, decay_collapsed_mines, sink_ship, unbind_storm,
};
pub use land_search::find_nearest_land;
pub use movement::{
    MoveCheck, MoveRefusal, fly_check, land_check, ride_check, ship_check, stack_members,
    whole_stack_weights,
};
pub use weights::{
    Weights, effective_capacity, item_contribution, raw_capacity, ship_cargo_weight,
    stack_weights, unit_weights,
};

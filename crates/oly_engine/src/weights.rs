//! Weight and capacity.
//!
//! Everything here is a pure read of the world. Each item adds its weight
//! to the total, and to each of the land, ride, and fly loads unless it
//! provides capacity in that bucket, in which case it adds capacity there
//! instead.

use std::ops::{Add, AddAssign};

use oly_foundation::{BoxId, Kind};
use oly_storage::World;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::catalog::ITEM_PEASANT;

/// Load and capacity figures for a unit, stack, or cargo.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Weights {
    /// Sum of every item's weight.
    pub total_weight: i64,
    /// Weight that must be carried over land.
    pub land_weight: i64,
    /// Land carrying capacity.
    pub land_cap: i64,
    /// Weight that must be carried when riding.
    pub ride_weight: i64,
    /// Riding capacity.
    pub ride_cap: i64,
    /// Weight that must be carried when flying.
    pub fly_weight: i64,
    /// Flying capacity.
    pub fly_cap: i64,
    /// Number of animals.
    pub animals: i64,
    /// Number of fighting men.
    pub men: i64,
}

impl AddAssign for Weights {
    fn add_assign(&mut self, rhs: Self) {
        self.total_weight += rhs.total_weight;
        self.land_weight += rhs.land_weight;
        self.land_cap += rhs.land_cap;
        self.ride_weight += rhs.ride_weight;
        self.ride_cap += rhs.ride_cap;
        self.fly_weight += rhs.fly_weight;
        self.fly_cap += rhs.fly_cap;
        self.animals += rhs.animals;
        self.men += rhs.men;
    }
}

impl Add for Weights {
    type Output = Weights;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl Weights {
    /// Land load beyond capacity, or zero.
    #[must_use]
    pub fn land_excess(&self) -> i64 {
        (self.land_weight - self.land_cap).max(0)
    }

    /// True if the riders and their loads fit on their mounts.
    #[must_use]
    pub fn can_ride(&self) -> bool {
        self.ride_cap > 0 && self.ride_weight <= self.ride_cap
    }

    /// True if everything can be carried aloft.
    #[must_use]
    pub fn can_fly(&self) -> bool {
        self.fly_cap > 0 && self.fly_weight <= self.fly_cap
    }
}

/// What `qty` units of `item` contribute.
#[must_use]
pub fn item_contribution(world: &World, item: BoxId, qty: i64) -> Weights {
    let Some(info) = world.item_info(item) else {
        return Weights::default();
    };
    let weight = info.weight * qty;
    let mut w = Weights {
        total_weight: weight,
        ..Weights::default()
    };

    if info.land_cap > 0 {
        w.land_cap = info.land_cap * qty;
    } else {
        w.land_weight = weight;
    }
    if info.ride_cap > 0 {
        w.ride_cap = info.ride_cap * qty;
    } else {
        w.ride_weight = weight;
    }
    if info.fly_cap > 0 {
        w.fly_cap = info.fly_cap * qty;
    } else {
        w.fly_weight = weight;
    }
    if info.animal {
        w.animals = qty;
    }
    if info.is_man_item {
        w.men = qty;
    }
    w
}

/// Figures for one entity: its own figure if it is a character, plus
/// everything in its inventory.
#[must_use]
pub fn unit_weights(world: &World, id: BoxId) -> Weights {
    let mut w = Weights::default();
    if world.kind(id) == Kind::Char {
        let figure = world.unit_item(id).to_option().unwrap_or(ITEM_PEASANT);
        w += item_contribution(world, figure, 1);
    }
    for line in world.inventory(id) {
        w += item_contribution(world, line.item, line.qty);
    }
    w
}

/// `unit_weights` of `id` plus each character directly beneath it.
///
/// Deeper followers are not included.
#[must_use]
pub fn stack_weights(world: &World, id: BoxId) -> Weights {
    world
        .children(id)
        .iter()
        .filter(|c| world.kind(**c) == Kind::Char)
        .fold(unit_weights(world, id), |acc, c| acc + unit_weights(world, *c))
}

/// Sum of `unit_weights` for every character directly aboard.
#[must_use]
pub fn ship_cargo_weight(world: &World, ship: BoxId) -> i64 {
    world
        .children(ship)
        .iter()
        .filter(|c| world.kind(**c) == Kind::Char)
        .map(|c| unit_weights(world, *c).total_weight)
        .sum()
}

/// Undamaged capacity: the ship's own override, else its class default.
#[must_use]
pub fn raw_capacity(world: &World, ship: BoxId) -> i64 {
    match world.subloc_info(ship).map_or(0, |s| s.capacity) {
        0 => world.subkind(ship).default_ship_capacity(),
        cap => cap,
    }
}

/// Capacity after damage: `raw * (100 - damage) / 100`.
#[must_use]
pub fn effective_capacity(world: &World, ship: BoxId) -> i64 {
    let damage = i64::from(world.damage(ship).clamp(0, 100));
    raw_capacity(world, ship) * (100 - damage) / 100
}

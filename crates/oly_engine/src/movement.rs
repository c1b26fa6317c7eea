//! Movement gating.
//!
//! Each check looks at a whole stack (the leader and every character
//! beneath it) or a ship's cargo and either refuses the move or says how
//! many days it will take. Refusals are ordinary outcomes for the caller to
//! narrate.

use oly_foundation::{BoxId, Kind, Result, Subkind};
use oly_storage::World;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::weights::{Weights, effective_capacity, ship_cargo_weight, unit_weights};

/// Why a move cannot start.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MoveRefusal {
    /// Carrying far more than the stack can haul.
    Overloaded {
        /// Land load.
        weight: i64,
        /// Land capacity.
        capacity: i64,
    },
    /// Not enough mounts for everyone and everything.
    TooHeavyToRide {
        /// Riding load.
        weight: i64,
        /// Riding capacity.
        capacity: i64,
    },
    /// Not enough flying mounts for everyone and everything.
    TooHeavyToFly {
        /// Flying load.
        weight: i64,
        /// Flying capacity.
        capacity: i64,
    },
    /// The ship's cargo exceeds what its damaged hull can carry.
    ShipOverloaded {
        /// Cargo weight.
        cargo: i64,
        /// Effective capacity.
        capacity: i64,
    },
    /// Only ships can sail.
    NotAShip,
}

/// Outcome of a movement check.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MoveCheck {
    /// The move may proceed and will take this many days.
    Allowed {
        /// Travel time.
        days: i32,
    },
    /// The move may not start.
    Refused(MoveRefusal),
}

impl MoveCheck {
    /// Returns true if the move may proceed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Travel time, if allowed.
    #[must_use]
    pub fn days(&self) -> Option<i32> {
        match self {
            Self::Allowed { days } => Some(*days),
            Self::Refused(_) => None,
        }
    }
}

/// The leader followed by every character beneath it, in pre-order.
///
/// # Errors
///
/// Fails if the walk exceeds the traversal limit.
pub fn stack_members(world: &World, leader: BoxId) -> Result<Vec<BoxId>> {
    let mut members = vec![leader];
    members.extend(world.character_descendants(leader)?);
    Ok(members)
}

/// Combined figures for a whole stack.
///
/// # Errors
///
/// Fails if the walk exceeds the traversal limit.
pub fn whole_stack_weights(world: &World, leader: BoxId) -> Result<Weights> {
    Ok(stack_members(world, leader)?
        .into_iter()
        .fold(Weights::default(), |acc, m| acc + unit_weights(world, m)))
}

/// Fighting men carried in inventories across a stack.
fn troop_count(world: &World, members: &[BoxId]) -> i64 {
    members
        .iter()
        .flat_map(|m| world.inventory(*m))
        .filter(|line| world.item_info(line.item).is_some_and(|i| i.is_man_item))
        .map(|line| line.qty)
        .sum()
}

fn clamp_days(days: i64) -> i32 {
    i32::try_from(days).unwrap_or(i32::MAX)
}

/// Checks an overland move of `base_days` into `terrain`.
///
/// Land capacity is what the stack's items provide plus what each member
/// hauls on foot. Over capacity adds days in proportion to the excess. A stack that can
/// ride and is not bound for a swamp travels in half the time. Troops
/// beyond what the nobles can lead add days of their own.
///
/// # Errors
///
/// Fails if the stack walk exceeds the traversal limit.
pub fn land_check(
    world: &World,
    config: &EngineConfig,
    leader: BoxId,
    base_days: i32,
    terrain: Subkind,
) -> Result<MoveCheck> {
    let members = stack_members(world, leader)?;
    let mut w = members
        .iter()
        .fold(Weights::default(), |acc, m| acc + unit_weights(world, *m));
    let nobles = i64::try_from(members.len()).unwrap_or(i64::MAX);
    w.land_cap += nobles.saturating_mul(config.noble_land_capacity);

    if w.land_weight > w.land_cap * config.overload_factor {
        tracing::debug!(
            leader = leader.get(),
            weight = w.land_weight,
            capacity = w.land_cap,
            "stack too overloaded to travel"
        );
        return Ok(MoveCheck::Refused(MoveRefusal::Overloaded {
            weight: w.land_weight,
            capacity: w.land_cap,
        }));
    }

    let base = i64::from(base_days);
    let mut days = base;
    if w.land_excess() > 0 {
        days += base * w.land_excess() / w.land_cap;
    } else if w.can_ride() && terrain != Subkind::Swamp {
        days = if base > 0 { (base / 2).max(1) } else { base };
    }

    let excess_troops = troop_count(world, &members) - nobles * config.free_troops_per_noble;
    if excess_troops > 0 {
        let per = config.troops_per_extra_day.max(1);
        days += (excess_troops + per - 1) / per;
    }

    Ok(MoveCheck::Allowed {
        days: clamp_days(days),
    })
}

/// Checks that a stack has mounts for everyone.
///
/// # Errors
///
/// Fails if the stack walk exceeds the traversal limit.
pub fn ride_check(world: &World, leader: BoxId, base_days: i32) -> Result<MoveCheck> {
    let w = whole_stack_weights(world, leader)?;
    if !w.can_ride() {
        return Ok(MoveCheck::Refused(MoveRefusal::TooHeavyToRide {
            weight: w.ride_weight,
            capacity: w.ride_cap,
        }));
    }
    Ok(MoveCheck::Allowed { days: base_days })
}

/// Checks that a stack can take to the air.
///
/// # Errors
///
/// Fails if the stack walk exceeds the traversal limit.
pub fn fly_check(world: &World, leader: BoxId, base_days: i32) -> Result<MoveCheck> {
    let w = whole_stack_weights(world, leader)?;
    if !w.can_fly() {
        return Ok(MoveCheck::Refused(MoveRefusal::TooHeavyToFly {
            weight: w.fly_weight,
            capacity: w.fly_cap,
        }));
    }
    Ok(MoveCheck::Allowed { days: base_days })
}

/// Checks that a ship can sail with its current cargo.
#[must_use]
pub fn ship_check(world: &World, ship: BoxId, base_days: i32) -> MoveCheck {
    if world.kind(ship) != Kind::Ship {
        return MoveCheck::Refused(MoveRefusal::NotAShip);
    }
    let cargo = ship_cargo_weight(world, ship);
    let capacity = effective_capacity(world, ship);
    if cargo > capacity {
        tracing::debug!(ship = ship.get(), cargo, capacity, "ship overloaded");
        return MoveCheck::Refused(MoveRefusal::ShipOverloaded { cargo, capacity });
    }
    MoveCheck::Allowed { days: base_days }
}

//! Configuration for the rules layer.

use oly_foundation::BoxId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tunables for movement gating, destruction, and land search.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// Random walks tried before falling back to a region scan.
    pub land_search_attempts: u32,

    /// Steps per random walk.
    pub land_search_steps: u32,

    /// A stack carrying more than this many times its capacity cannot move.
    pub overload_factor: i64,

    /// Land load each character hauls on foot, on top of item capacity.
    pub noble_land_capacity: i64,

    /// Troops each noble leads without slowing the stack.
    pub free_troops_per_noble: i64,

    /// Excess troops that cost one extra day of travel.
    pub troops_per_extra_day: i64,

    /// Turns a collapsed mine blocks its site before clearing.
    pub mine_collapse_delay: i32,

    /// Skill that lets a character survive a sinking (sentinel = none).
    pub survival_skill: BoxId,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            land_search_attempts: 10,
            land_search_steps: 10,
            overload_factor: 2,
            noble_land_capacity: 100,
            free_troops_per_noble: 10,
            troops_per_extra_day: 100,
            mine_collapse_delay: 8,
            survival_skill: BoxId::NONE,
        }
    }
}

impl EngineConfig {
    /// Builder method to set the land search effort.
    #[must_use]
    pub fn with_land_search(mut self, attempts: u32, steps: u32) -> Self {
        self.land_search_attempts = attempts;
        self.land_search_steps = steps;
        self
    }

    /// Builder method to set the overload factor.
    #[must_use]
    pub fn with_overload_factor(mut self, factor: i64) -> Self {
        self.overload_factor = factor.max(1);
        self
    }

    /// Builder method to set what each character hauls on foot.
    #[must_use]
    pub fn with_noble_land_capacity(mut self, capacity: i64) -> Self {
        self.noble_land_capacity = capacity.max(0);
        self
    }

    /// Builder method to set the troop ratio parameters.
    #[must_use]
    pub fn with_troop_ratio(mut self, free_per_noble: i64, per_extra_day: i64) -> Self {
        self.free_troops_per_noble = free_per_noble.max(0);
        self.troops_per_extra_day = per_extra_day.max(1);
        self
    }

    /// Builder method to set the collapsed mine delay.
    #[must_use]
    pub fn with_mine_collapse_delay(mut self, turns: i32) -> Self {
        self.mine_collapse_delay = turns;
        self
    }

    /// Builder method to set the survival skill.
    #[must_use]
    pub fn with_survival_skill(mut self, skill: BoxId) -> Self {
        self.survival_skill = skill;
        self
    }
}

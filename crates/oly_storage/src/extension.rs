//! Typed extension records.
//!
//! An entity carries at most one record of each extension type. Records are
//! absent until the first typed write allocates them; typed reads of an
//! absent record return `None`, and the convenience accessors built on them
//! fall back to the type's zero value.

use oly_foundation::BoxId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// An extension record type stored in an [`Entity`] slot.
pub trait Extension: Clone + Default + 'static {
    /// Short name used in diagnostics.
    const NAME: &'static str;

    /// Returns the slot holding this extension.
    fn slot(entity: &Entity) -> &Option<Self>;

    /// Returns the mutable slot holding this extension.
    fn slot_mut(entity: &mut Entity) -> &mut Option<Self>;
}

macro_rules! extension {
    ($ty:ty, $field:ident, $name:literal) => {
        impl Extension for $ty {
            const NAME: &'static str = $name;

            fn slot(entity: &Entity) -> &Option<Self> {
                &entity.$field
            }

            fn slot_mut(entity: &mut Entity) -> &mut Option<Self> {
                &mut entity.$field
            }
        }
    };
}

/// How a character's loyalty is held.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LoyaltyKind {
    /// No loyalty recorded.
    #[default]
    Unsworn,
    /// Paid loyalty.
    Contract,
    /// Sworn oath.
    Oath,
    /// Held by fear.
    Fear,
    /// Independent non-player character.
    Npc,
    /// Summoned creature bound to its summoner.
    Summon,
}

/// Character loyalty: kind plus strength.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Loyalty {
    /// How the loyalty is held.
    pub kind: LoyaltyKind,
    /// Strength of the loyalty.
    pub rate: i32,
}

/// Character-only fields.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CharInfo {
    /// Figure type this character counts as (0 = peasant).
    pub unit_item: BoxId,
    /// Held captive by the character it is stacked beneath.
    pub prisoner: bool,
    /// Day a movement in progress began (0 = not moving).
    pub moving: i32,
    /// Swear to the captor when released.
    pub swear_on_release: bool,
    /// Loyalty to the owning player.
    pub loyalty: Loyalty,
    /// Health percentage.
    pub health: i32,
}

/// Location-only fields.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocInfo {
    /// Province exits indexed by [`oly_foundation::Direction::index`].
    pub prov_dest: [BoxId; 4],
    /// Hidden from casual view.
    pub hidden: bool,
}

/// Fields shared by ships and buildings.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SublocInfo {
    /// Structural damage percentage, 0..=100.
    pub damage: i32,
    /// Raw capacity override; 0 uses the class default.
    pub capacity: i64,
    /// Storms bound to this ship.
    pub bound_storms: Vec<BoxId>,
}

/// Static item data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ItemInfo {
    /// Weight of one unit.
    pub weight: i64,
    /// Land carrying capacity of one unit.
    pub land_cap: i64,
    /// Riding capacity of one unit.
    pub ride_cap: i64,
    /// Flying capacity of one unit.
    pub fly_cap: i64,
    /// Counts as an animal.
    pub animal: bool,
    /// Counts as a fighting man (troops).
    pub is_man_item: bool,
}

/// Miscellaneous back-links and timers.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MiscInfo {
    /// Castle a garrison guards.
    pub garrison_castle: BoxId,
    /// Turns until a collapsed mine clears.
    pub mine_delay: i32,
    /// Ship a storm is bound to.
    pub storm_bound_to: BoxId,
}

/// One inventory line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InventoryLine {
    /// The item type.
    pub item: BoxId,
    /// How many are held.
    pub qty: i64,
}

extension!(CharInfo, char_info, "char");
extension!(LocInfo, loc_info, "loc");
extension!(SublocInfo, subloc_info, "subloc");
extension!(ItemInfo, item_info, "item");
extension!(MiscInfo, misc_info, "misc");

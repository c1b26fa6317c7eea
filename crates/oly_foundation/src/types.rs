//! Kind and subkind tags.
//!
//! Every entity carries a primary [`Kind`] and a secondary [`Subkind`] whose
//! meaning depends on the kind: terrain for locations, hull class for ships,
//! weather type for storms, and so on.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Primary entity type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Kind {
    /// Tombstone: empty slot, out-of-range handle, or deleted entity.
    #[default]
    Deleted,
    /// A player (faction).
    Player,
    /// A character (noble, NPC, garrison).
    Char,
    /// A location at any depth.
    Loc,
    /// An item type.
    Item,
    /// A skill.
    Skill,
    /// A magical gate between locations.
    Gate,
    /// A road between provinces.
    Road,
    /// A character retired from play, kept for reporting.
    DeadChar,
    /// A ship.
    Ship,
    /// A posted sign.
    Post,
    /// A storm.
    Storm,
    /// An unformed noble awaiting creation.
    Unform,
    /// A lore sheet.
    Lore,
}

impl Kind {
    /// All kinds, in declaration order.
    pub const ALL: [Kind; 14] = [
        Kind::Deleted,
        Kind::Player,
        Kind::Char,
        Kind::Loc,
        Kind::Item,
        Kind::Skill,
        Kind::Gate,
        Kind::Road,
        Kind::DeadChar,
        Kind::Ship,
        Kind::Post,
        Kind::Storm,
        Kind::Unform,
        Kind::Lore,
    ];

    /// Returns the lowercase name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Deleted => "deleted",
            Kind::Player => "player",
            Kind::Char => "char",
            Kind::Loc => "loc",
            Kind::Item => "item",
            Kind::Skill => "skill",
            Kind::Gate => "gate",
            Kind::Road => "road",
            Kind::DeadChar => "deadchar",
            Kind::Ship => "ship",
            Kind::Post => "post",
            Kind::Storm => "storm",
            Kind::Unform => "unform",
            Kind::Lore => "lore",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Location nesting level.
///
/// Forms a strict chain: building ⊂ subloc ⊂ province ⊂ region.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LocDepth {
    /// Not a location (or a ship).
    #[default]
    None,
    /// Top level.
    Region,
    /// A map cell.
    Province,
    /// A feature inside a province (city, island, cave, ...).
    Subloc,
    /// A constructed structure.
    Building,
}

/// Secondary entity type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(missing_docs)]
pub enum Subkind {
    #[default]
    None,

    // Regions
    Region,

    // Province terrain
    Ocean,
    Forest,
    Plain,
    Mountain,
    Desert,
    Swamp,
    Underground,
    Cloud,
    Tunnel,
    Chamber,

    // Sub-locations
    Island,
    StoneCircle,
    MallornGrove,
    Bog,
    Cave,
    City,
    Lair,
    Graveyard,
    Ruins,
    Battlefield,
    EnchantedForest,
    RockyHill,
    TreeCircle,
    Pits,
    Pasture,
    Oasis,
    YewGrove,
    SandPit,
    SacredGrove,
    PoppyField,
    FaeryHill,
    HadesPit,
    Sewer,
    HiddenGate,

    // Buildings
    Castle,
    CastleNotDone,
    Temple,
    TempleNotDone,
    Tower,
    TowerNotDone,
    Inn,
    InnNotDone,
    Mine,
    MineNotDone,
    MineCollapsed,
    MineShaft,
    OrcStronghold,

    // Ships
    Galley,
    GalleyNotDone,
    Roundship,
    RoundshipNotDone,
    GhostShip,

    // Characters
    Garrison,
    Ni,
    DemonLord,
    Undead,
    LostSoul,

    // Players
    PlayerSystem,
    PlayerRegular,
    PlayerNpc,
    PlayerSavage,

    // Items
    DeadBody,
    Scroll,
    MagicItem,
    Palantir,
    Auraculum,
    MagicArtifact,
    AnimalPart,

    // Storms
    Fog,
    Rain,
    Wind,
    Mist,
}

impl Subkind {
    /// Returns the location depth a location of this subkind sits at.
    ///
    /// Ship classes and non-location subkinds report [`LocDepth::None`].
    #[must_use]
    pub const fn loc_depth(self) -> LocDepth {
        use Subkind::{
            Battlefield, Bog, Castle, CastleNotDone, Cave, Chamber, City, Cloud, Desert,
            EnchantedForest, FaeryHill, Forest, Graveyard, HadesPit, HiddenGate, Inn, InnNotDone,
            Island, Lair, MallornGrove, Mine, MineCollapsed, MineNotDone, MineShaft, Mountain,
            Oasis, Ocean, OrcStronghold, Pasture, Pits, Plain, PoppyField, Region, RockyHill,
            Ruins, SacredGrove, SandPit, Sewer, StoneCircle, Swamp, Temple, TempleNotDone, Tower,
            TowerNotDone, TreeCircle, Tunnel, Underground, YewGrove,
        };
        match self {
            Region => LocDepth::Region,
            Ocean | Forest | Plain | Mountain | Desert | Swamp | Underground | Cloud | Tunnel
            | Chamber => LocDepth::Province,
            Island | StoneCircle | MallornGrove | Bog | Cave | City | Lair | Graveyard | Ruins
            | Battlefield | EnchantedForest | RockyHill | TreeCircle | Pits | Pasture | Oasis
            | YewGrove | SandPit | SacredGrove | PoppyField | FaeryHill | HadesPit | Sewer
            | HiddenGate => LocDepth::Subloc,
            Castle | CastleNotDone | Temple | TempleNotDone | Tower | TowerNotDone | Inn
            | InnNotDone | Mine | MineNotDone | MineCollapsed | MineShaft | OrcStronghold => {
                LocDepth::Building
            }
            _ => LocDepth::None,
        }
    }

    /// Returns true for sub-locations whose contents form their own view
    /// group: those inside are not seen from the enclosing province.
    #[must_use]
    pub const fn is_view_boundary(self) -> bool {
        matches!(
            self,
            Subkind::City
                | Subkind::Graveyard
                | Subkind::Sewer
                | Subkind::FaeryHill
                | Subkind::HadesPit
                | Subkind::HiddenGate
        )
    }

    /// Returns true for ship hull classes, finished or not.
    #[must_use]
    pub const fn is_ship_class(self) -> bool {
        matches!(
            self,
            Subkind::Galley
                | Subkind::GalleyNotDone
                | Subkind::Roundship
                | Subkind::RoundshipNotDone
                | Subkind::GhostShip
        )
    }

    /// Returns the undamaged cargo capacity of a ship class, or 0.
    #[must_use]
    pub const fn default_ship_capacity(self) -> i64 {
        match self {
            Subkind::Galley => 5_000,
            Subkind::Roundship => 25_000,
            Subkind::GhostShip => 10_000,
            _ => 0,
        }
    }
}

/// Cardinal exit direction out of a province.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// North.
    North,
    /// East.
    East,
    /// South.
    South,
    /// West.
    West,
}

impl Direction {
    /// Cardinal directions in clockwise order.
    pub const CARDINAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Returns the slot of this direction in a province's exit table.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// Returns the next direction clockwise.
    #[must_use]
    pub const fn rotate(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }
}

//! Integration tests for destruction
//!
//! Tests ships sinking, buildings collapsing, and damage accumulation.

use oly_engine::{
    Collapse, EngineConfig, RecordingCollaborators, Services, accumulate_damage, bind_storm,
    building_collapses, decay_collapsed_mines, sink_ship,
};
use oly_foundation::{BoxId, Direction, ErrorKind, Kind, ScriptedRandom, Subkind};
use oly_storage::{World, WorldConfig};

struct Harness {
    config: EngineConfig,
    random: ScriptedRandom,
    rec: RecordingCollaborators,
}

impl Harness {
    fn new(config: EngineConfig) -> Self {
        Self {
            config,
            random: ScriptedRandom::new(Vec::new()),
            rec: RecordingCollaborators::new(),
        }
    }

    fn services(&mut self) -> Services<'_> {
        Services::new(&self.config, &mut self.random, &mut self.rec)
    }
}

struct Coast {
    world: World,
    ocean: BoxId,
    shore: BoxId,
}

/// An ocean province with a plain to its east.
fn coast() -> Coast {
    let mut world = World::new(WorldConfig::small());
    let region = world.create(Kind::Loc, Subkind::Region).unwrap();
    let ocean = world.create(Kind::Loc, Subkind::Ocean).unwrap();
    let shore = world.create(Kind::Loc, Subkind::Plain).unwrap();
    world.relocate(ocean, region).unwrap();
    world.relocate(shore, region).unwrap();
    world.set_exit(ocean, Direction::East, shore).unwrap();
    world.set_exit(shore, Direction::West, ocean).unwrap();
    Coast {
        world,
        ocean,
        shore,
    }
}

fn place(world: &mut World, kind: Kind, subkind: Subkind, parent: BoxId) -> BoxId {
    let id = world.create(kind, subkind).unwrap();
    world.relocate(id, parent).unwrap();
    id
}

// =============================================================================
// Sinking
// =============================================================================

#[test]
fn sinking_with_a_prisoner_aboard() {
    crate::init_tracing();
    let Coast {
        mut world, ocean, ..
    } = coast();
    let ship = place(&mut world, Kind::Ship, Subkind::Galley, ocean);
    let captor = place(&mut world, Kind::Char, Subkind::None, ship);
    let victim = place(&mut world, Kind::Char, Subkind::None, ship);
    world.take_prisoner(captor, victim).unwrap();

    let mut h = Harness::new(EngineConfig::default());
    let report = sink_ship(&mut world, &mut h.services(), ship).unwrap();

    assert_eq!(report.drowned, vec![captor, victim]);
    assert_eq!(world.kind(ship), Kind::Deleted);
    assert!(!world.children(ocean).contains(&ship));
    assert_eq!(world.kind(captor), Kind::DeadChar);
    assert_eq!(world.kind(victim), Kind::DeadChar);
    assert_eq!(world.immediate_location(captor).unwrap(), BoxId::NONE);
    assert_eq!(h.rec.reports_to(ocean).count(), 1);
    world.audit().unwrap();
}

#[test]
fn a_strong_swimmer_reaches_the_shore() {
    let Coast {
        mut world,
        ocean,
        shore,
    } = coast();
    let ship = place(&mut world, Kind::Ship, Subkind::Roundship, ocean);
    let swimmer = place(&mut world, Kind::Char, Subkind::None, ship);
    let skill = BoxId::new(700);

    let mut h = Harness::new(EngineConfig::default().with_survival_skill(skill));
    h.rec = RecordingCollaborators::new().with_skill(swimmer, skill);
    let report = sink_ship(&mut world, &mut h.services(), ship).unwrap();

    assert!(report.drowned.is_empty());
    assert_eq!(report.survivors, vec![(swimmer, shore)]);
    assert_eq!(world.parent(swimmer), shore);
    assert_eq!(world.kind(swimmer), Kind::Char);
}

#[test]
fn sinking_in_port_puts_everyone_ashore() {
    let Coast {
        mut world, shore, ..
    } = coast();
    let ship = place(&mut world, Kind::Ship, Subkind::Galley, shore);
    let a = place(&mut world, Kind::Char, Subkind::None, ship);
    let b = place(&mut world, Kind::Char, Subkind::None, a);
    let storm = world.create(Kind::Storm, Subkind::Rain).unwrap();
    bind_storm(&mut world, storm, ship).unwrap();

    let mut h = Harness::new(EngineConfig::default());
    let report = sink_ship(&mut world, &mut h.services(), ship).unwrap();

    assert_eq!(report.rehomed, vec![a]);
    assert_eq!(world.parent(a), shore);
    assert_eq!(world.parent(b), a);
    assert_eq!(world.misc_info(storm).unwrap().storm_bound_to, BoxId::NONE);
    world.audit().unwrap();
}

// =============================================================================
// Damage
// =============================================================================

#[test]
fn sixty_plus_sixty_destroys_a_tower_once() {
    let Coast {
        mut world, shore, ..
    } = coast();
    let tower = place(&mut world, Kind::Loc, Subkind::Tower, shore);
    let guard = place(&mut world, Kind::Char, Subkind::None, tower);
    let mut h = Harness::new(EngineConfig::default());

    assert!(!accumulate_damage(&mut world, &mut h.services(), tower, 60, true).unwrap());
    assert_eq!(world.damage(tower), 60);
    assert_eq!(world.kind(tower), Kind::Loc);

    assert!(accumulate_damage(&mut world, &mut h.services(), tower, 60, true).unwrap());
    assert_eq!(world.kind(tower), Kind::Deleted);
    assert_eq!(world.parent(guard), shore);
    world.audit().unwrap();
}

#[test]
fn indestructible_damage_stops_short() {
    let Coast {
        mut world, ocean, ..
    } = coast();
    let ship = place(&mut world, Kind::Ship, Subkind::Galley, ocean);
    let mut h = Harness::new(EngineConfig::default());

    assert!(!accumulate_damage(&mut world, &mut h.services(), ship, 150, false).unwrap());
    assert_eq!(world.damage(ship), 99);
    assert!(accumulate_damage(&mut world, &mut h.services(), ship, 1, true).unwrap());
    assert_eq!(world.kind(ship), Kind::Deleted);
}

#[test]
fn only_ships_and_buildings_take_damage() {
    let mut world = World::new(WorldConfig::small());
    let region = world.create(Kind::Loc, Subkind::Region).unwrap();
    let forest = place(&mut world, Kind::Loc, Subkind::Forest, region);
    let ranger = place(&mut world, Kind::Char, Subkind::None, forest);
    let mut h = Harness::new(EngineConfig::default());

    let err = accumulate_damage(&mut world, &mut h.services(), forest, 100, true).unwrap_err();
    assert_eq!(err.entity(), Some(forest));
    assert_eq!(world.kind(forest), Kind::Loc);
    assert_eq!(world.parent(ranger), forest);
    assert_eq!(world.damage(forest), 0);

    let err = accumulate_damage(&mut world, &mut h.services(), ranger, 100, true).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::WrongKind { .. }));
    assert!(world.subloc_info(ranger).is_none());
    world.audit().unwrap();
}

// =============================================================================
// Mines
// =============================================================================

#[test]
fn collapsed_mine_lingers_for_its_delay() {
    let Coast {
        mut world, shore, ..
    } = coast();
    let mine = place(&mut world, Kind::Loc, Subkind::Mine, shore);
    let miner = place(&mut world, Kind::Char, Subkind::None, mine);
    let mut h = Harness::new(EngineConfig::default().with_mine_collapse_delay(3));

    assert_eq!(
        building_collapses(&mut world, &mut h.services(), mine).unwrap(),
        Collapse::MineCollapsed
    );
    assert_eq!(world.subkind(mine), Subkind::MineCollapsed);
    assert_eq!(world.parent(miner), shore);

    assert!(decay_collapsed_mines(&mut world, &mut h.services()).unwrap().is_empty());
    assert!(decay_collapsed_mines(&mut world, &mut h.services()).unwrap().is_empty());
    assert_eq!(
        decay_collapsed_mines(&mut world, &mut h.services()).unwrap(),
        vec![mine]
    );
    assert_eq!(world.kind(mine), Kind::Deleted);
    assert!(world.all_of_subkind(Subkind::MineCollapsed).is_empty());
}

#[test]
fn castle_collapse_frees_its_garrisons() {
    let Coast {
        mut world, shore, ..
    } = coast();
    let castle = place(&mut world, Kind::Loc, Subkind::Castle, shore);
    let garrison = place(&mut world, Kind::Char, Subkind::Garrison, shore);
    world.misc_info_mut(garrison).unwrap().garrison_castle = castle;
    let mut h = Harness::new(EngineConfig::default());

    assert_eq!(
        building_collapses(&mut world, &mut h.services(), castle).unwrap(),
        Collapse::Destroyed
    );
    assert_eq!(world.garrison_castle(garrison), BoxId::NONE);
    assert_eq!(world.kind(castle), Kind::Deleted);
}

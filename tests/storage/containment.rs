//! Integration tests for the containment graph
//!
//! Tests relocation, upward and downward walks, and the audit.

use oly_foundation::{BoxId, Direction, ErrorKind, Kind, Subkind};
use oly_storage::{World, WorldConfig};

struct Map {
    world: World,
    region: BoxId,
    forest: BoxId,
    city: BoxId,
    inn: BoxId,
}

/// region > forest > city > inn
fn map() -> Map {
    let mut world = World::new(WorldConfig::small());
    let region = world.create(Kind::Loc, Subkind::Region).unwrap();
    let forest = world.create(Kind::Loc, Subkind::Forest).unwrap();
    let city = world.create(Kind::Loc, Subkind::City).unwrap();
    let inn = world.create(Kind::Loc, Subkind::Inn).unwrap();
    world.relocate(forest, region).unwrap();
    world.relocate(city, forest).unwrap();
    world.relocate(inn, city).unwrap();
    Map {
        world,
        region,
        forest,
        city,
        inn,
    }
}

fn character(world: &mut World, parent: BoxId) -> BoxId {
    let c = world.create(Kind::Char, Subkind::None).unwrap();
    world.relocate(c, parent).unwrap();
    c
}

// =============================================================================
// Relocation
// =============================================================================

#[test]
fn relocate_keeps_both_sides_in_step() {
    let Map {
        mut world,
        forest,
        city,
        ..
    } = map();
    let c = character(&mut world, forest);
    assert_eq!(world.parent(c), forest);
    assert!(world.children(forest).contains(&c));

    world.relocate(c, city).unwrap();
    assert_eq!(world.parent(c), city);
    assert!(!world.children(forest).contains(&c));
    assert_eq!(world.children(city).iter().filter(|x| **x == c).count(), 1);
    world.audit().unwrap();
}

#[test]
fn relocating_twice_lists_once() {
    let Map {
        mut world, city, ..
    } = map();
    let c = character(&mut world, city);
    world.relocate(c, city).unwrap();
    world.relocate(c, city).unwrap();
    assert_eq!(world.children(city).iter().filter(|x| **x == c).count(), 1);
}

#[test]
fn relocate_at_inserts_in_place() {
    let Map {
        mut world, city, ..
    } = map();
    let a = character(&mut world, city);
    let b = character(&mut world, city);
    let c = world.create(Kind::Char, Subkind::None).unwrap();
    // The inn sits at index 0.
    world.relocate_at(c, city, 2).unwrap();

    let chars: Vec<_> = world
        .children(city)
        .iter()
        .copied()
        .filter(|x| world.kind(*x) == Kind::Char)
        .collect();
    assert_eq!(chars, vec![a, c, b]);
}

#[test]
fn cycles_are_refused_without_changes() {
    let Map {
        mut world,
        region,
        inn,
        ..
    } = map();
    let before = world.snapshot();

    let err = world.relocate(region, inn).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ContainmentCycle { .. }));
    assert_eq!(world.parent(region), BoxId::NONE);
    assert_eq!(world.children(inn), before.children(inn));

    let err = world.relocate(inn, inn).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SelfParent(_)));
    world.audit().unwrap();
}

#[test]
fn relocating_into_a_deleted_parent_fails() {
    let Map {
        mut world, city, ..
    } = map();
    let c = character(&mut world, city);
    let tomb = world.create(Kind::Loc, Subkind::Plain).unwrap();
    world.delete(tomb).unwrap();

    let err = world.relocate(c, tomb).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DeletedHandle(_)));
    assert_eq!(world.parent(c), city);
}

// =============================================================================
// Upward Walks
// =============================================================================

#[test]
fn enclosing_locations() {
    let Map {
        mut world,
        region,
        forest,
        city,
        inn,
    } = map();
    let leader = character(&mut world, inn);
    let follower = character(&mut world, leader);

    assert_eq!(world.region(follower).unwrap(), region);
    assert_eq!(world.province(follower).unwrap(), forest);
    assert_eq!(world.immediate_location(follower).unwrap(), inn);
    assert_eq!(world.view_location(follower).unwrap(), city);
    assert_eq!(world.province(forest).unwrap(), forest);
    assert_eq!(world.region(region).unwrap(), region);
}

#[test]
fn detached_entities_have_no_location() {
    let mut world = World::new(WorldConfig::small());
    let c = world.create(Kind::Char, Subkind::None).unwrap();
    assert_eq!(world.immediate_location(c).unwrap(), BoxId::NONE);
    assert_eq!(world.region(c).unwrap(), BoxId::NONE);
}

#[test]
fn ships_count_as_locations() {
    let Map {
        mut world, forest, ..
    } = map();
    let ship = world.create(Kind::Ship, Subkind::Galley).unwrap();
    world.relocate(ship, forest).unwrap();
    let c = character(&mut world, ship);

    assert_eq!(world.immediate_location(c).unwrap(), ship);
    assert_eq!(world.province(c).unwrap(), forest);
    assert_eq!(world.view_location(ship).unwrap(), forest);
}

// =============================================================================
// Downward Walks
// =============================================================================

#[test]
fn descendants_in_pre_order() {
    let Map {
        mut world,
        forest,
        city,
        inn,
        ..
    } = map();
    let a = character(&mut world, forest);
    let b = character(&mut world, a);
    let c = character(&mut world, inn);

    assert_eq!(world.descendants(forest).unwrap(), vec![city, inn, c, a, b]);
    assert_eq!(world.character_descendants(forest).unwrap(), vec![c, a, b]);
    assert!(world.is_inside(forest, c).unwrap());
    assert!(!world.is_inside(c, forest).unwrap());
    assert!(!world.is_inside(c, c).unwrap());
}

#[test]
fn child_scans() {
    let Map {
        mut world, forest, city, ..
    } = map();
    let castle = world.create(Kind::Loc, Subkind::Castle).unwrap();
    world.relocate(castle, forest).unwrap();
    let c = character(&mut world, forest);

    assert_eq!(world.first_child_of_kind(forest, Kind::Char), c);
    assert_eq!(world.first_child_of_kind(forest, Kind::Loc), city);
    assert_eq!(
        world.count_children_matching(forest, Subkind::City, Subkind::Castle),
        2
    );
}

// =============================================================================
// Exits
// =============================================================================

#[test]
fn province_exits() {
    let mut world = World::new(WorldConfig::small());
    let a = world.create(Kind::Loc, Subkind::Plain).unwrap();
    let b = world.create(Kind::Loc, Subkind::Forest).unwrap();
    world.set_exit(a, Direction::South, b).unwrap();

    assert_eq!(world.location_direction(a, Direction::South), b);
    assert_eq!(world.location_direction(a, Direction::North), BoxId::NONE);
    assert_eq!(world.location_direction(b, Direction::North), BoxId::NONE);
}

//! Integration tests for weight and capacity

use oly_engine::{
    ITEM_GOLD, ITEM_OX, ITEM_PEASANT, ITEM_RIDING_HORSE, ITEM_SOLDIER, effective_capacity,
    install_standard_items, item_contribution, stack_weights, unit_weights, whole_stack_weights,
};
use oly_foundation::{BoxId, Kind, Subkind};
use oly_storage::{World, WorldConfig};

fn standard_world() -> World {
    let mut world = World::new(WorldConfig::small());
    install_standard_items(&mut world).unwrap();
    world
}

// =============================================================================
// Unit Weights
// =============================================================================

#[test]
fn gold_carrier_without_a_mount() {
    let mut world = standard_world();
    let c = world.create(Kind::Char, Subkind::None).unwrap();
    world.gen_item(c, ITEM_GOLD, 100).unwrap();

    let w = unit_weights(&world, c);
    assert_eq!(w.land_weight, 10 + 100);
    assert_eq!(w.land_cap, 0);
    assert_eq!(w.total_weight, 110);
}

#[test]
fn empty_handed_character_weighs_its_unit_item() {
    let mut world = standard_world();
    let peasant = world.create(Kind::Char, Subkind::None).unwrap();
    let soldier = world.create(Kind::Char, Subkind::None).unwrap();
    world.char_info_mut(soldier).unwrap().unit_item = ITEM_SOLDIER;

    assert_eq!(
        unit_weights(&world, peasant),
        item_contribution(&world, ITEM_PEASANT, 1)
    );
    assert_eq!(
        unit_weights(&world, soldier),
        item_contribution(&world, ITEM_SOLDIER, 1)
    );
}

#[test]
fn mounts_carry_their_riders() {
    let mut world = standard_world();
    let c = world.create(Kind::Char, Subkind::None).unwrap();
    world.gen_item(c, ITEM_RIDING_HORSE, 1).unwrap();
    world.gen_item(c, ITEM_GOLD, 50).unwrap();

    let w = unit_weights(&world, c);
    assert_eq!(w.total_weight, 10 + 1000 + 50);
    assert_eq!(w.land_cap, 1500);
    assert_eq!(w.land_weight, 10 + 50);
    assert_eq!(w.ride_cap, 1150);
    assert_eq!(w.ride_weight, 10 + 50);
    assert!(w.can_ride());
    assert!(!w.can_fly());
    assert_eq!(w.animals, 1);
    assert_eq!(w.men, 1);
}

// =============================================================================
// Stacks
// =============================================================================

#[test]
fn stack_figures_differ_by_depth() {
    let mut world = standard_world();
    let plain = world.create(Kind::Loc, Subkind::Plain).unwrap();
    let mut parent = plain;
    let mut stack = Vec::new();
    for _ in 0..3 {
        let c = world.create(Kind::Char, Subkind::None).unwrap();
        world.relocate(c, parent).unwrap();
        world.gen_item(c, ITEM_OX, 1).unwrap();
        stack.push(c);
        parent = c;
    }

    let one = unit_weights(&world, stack[0]);
    assert_eq!(stack_weights(&world, stack[0]), one + one);
    assert_eq!(whole_stack_weights(&world, stack[0]).unwrap(), one + one + one);
    assert_eq!(whole_stack_weights(&world, stack[2]).unwrap(), one);
}

// =============================================================================
// Ship Capacity
// =============================================================================

#[test]
fn capacity_reaches_zero_at_full_damage() {
    let mut world = standard_world();
    let ship = world.create(Kind::Ship, Subkind::Galley).unwrap();

    let mut last = i64::MAX;
    for damage in 0..=100 {
        world.subloc_info_mut(ship).unwrap().damage = damage;
        let cap = effective_capacity(&world, ship);
        assert!(cap <= last);
        last = cap;
    }
    assert_eq!(last, 0);
    assert_eq!(effective_capacity(&world, BoxId::NONE), 0);
}

//! Integration tests for the entity table
//!
//! Tests allocation, deletion, handle reuse, kind chains, and typed extensions.

use oly_foundation::{BoxId, ErrorKind, Kind, Subkind};
use oly_storage::{CharInfo, ItemInfo, LoyaltyKind, World, WorldConfig};

fn sorted(mut ids: Vec<BoxId>) -> Vec<BoxId> {
    ids.sort();
    ids
}

// =============================================================================
// Allocation
// =============================================================================

#[test]
fn handles_start_at_one() {
    let mut world = World::new(WorldConfig::small());
    let a = world.create(Kind::Char, Subkind::None).unwrap();
    let b = world.create(Kind::Item, Subkind::None).unwrap();
    assert_eq!(a, BoxId::new(1));
    assert_eq!(b, BoxId::new(2));
    assert_eq!(world.entity_count(), 2);
}

#[test]
fn table_fills_up() {
    let mut world = World::new(WorldConfig::small().with_max_handle(4));
    for _ in 0..3 {
        world.create(Kind::Char, Subkind::None).unwrap();
    }
    let err = world.create(Kind::Char, Subkind::None).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TableFull { .. }));
}

#[test]
fn create_at_skips_over_reserved_handles() {
    let mut world = World::new(WorldConfig::small());
    world.create_at(BoxId::new(1), Kind::Item, Subkind::None).unwrap();
    world.create_at(BoxId::new(3), Kind::Item, Subkind::None).unwrap();

    assert_eq!(world.create(Kind::Char, Subkind::None).unwrap(), BoxId::new(2));
    assert_eq!(world.create(Kind::Char, Subkind::None).unwrap(), BoxId::new(4));
}

#[test]
fn out_of_range_handles_are_invalid() {
    let mut world = World::new(WorldConfig::small());
    let err = world
        .create_at(BoxId::new(5_000), Kind::Char, Subkind::None)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidHandle(_)));
    assert_eq!(world.kind(BoxId::new(5_000)), Kind::Deleted);
}

// =============================================================================
// Deletion and Reuse
// =============================================================================

#[test]
fn attached_entities_cannot_be_deleted() {
    let mut world = World::new(WorldConfig::small());
    let plain = world.create(Kind::Loc, Subkind::Plain).unwrap();
    let c = world.create(Kind::Char, Subkind::None).unwrap();
    world.relocate(c, plain).unwrap();

    let err = world.delete(c).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotDetached(_)));
    let err = world.delete(plain).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotDetached(_)));

    world.detach_and_delete(c).unwrap();
    assert_eq!(world.kind(c), Kind::Deleted);
    assert!(world.children(plain).is_empty());
}

#[test]
fn deleted_handles_wait_for_the_next_turn() {
    let mut world = World::new(WorldConfig::small());
    let a = world.create(Kind::Char, Subkind::None).unwrap();
    world.delete(a).unwrap();

    let b = world.create(Kind::Char, Subkind::None).unwrap();
    assert_ne!(a, b);

    world.advance_turn();
    assert_eq!(world.turn(), 1);
    let c = world.create(Kind::Char, Subkind::None).unwrap();
    assert_eq!(c, a);
}

#[test]
fn operations_on_deleted_handles_fail() {
    let mut world = World::new(WorldConfig::small());
    let a = world.create(Kind::Char, Subkind::None).unwrap();
    world.delete(a).unwrap();

    let err = world.char_info_mut(a).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DeletedHandle(_)));
    let err = world.delete(a).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DeletedHandle(_)));
}

// =============================================================================
// Kind and Subkind Chains
// =============================================================================

#[test]
fn chains_follow_kind_changes() {
    let mut world = World::new(WorldConfig::small());
    let a = world.create(Kind::Char, Subkind::None).unwrap();
    let b = world.create(Kind::Char, Subkind::None).unwrap();
    let _item = world.create(Kind::Item, Subkind::None).unwrap();

    assert_eq!(sorted(world.all_of_kind(Kind::Char)), vec![a, b]);

    world.change_kind(a, Kind::DeadChar).unwrap();
    assert_eq!(world.all_of_kind(Kind::Char), vec![b]);
    assert_eq!(world.all_of_kind(Kind::DeadChar), vec![a]);
}

#[test]
fn deleting_while_walking_a_subkind_chain() {
    let mut world = World::new(WorldConfig::small());
    let mines: Vec<_> = (0..5)
        .map(|_| world.create(Kind::Loc, Subkind::Mine).unwrap())
        .collect();

    let mut visited = Vec::new();
    let mut cur = world.first_of_subkind(Subkind::Mine);
    while cur.is_some() {
        visited.push(cur);
        world.delete(cur).unwrap();
        cur = world.next_of_subkind(cur);
    }

    assert_eq!(sorted(visited), mines);
    assert!(world.all_of_subkind(Subkind::Mine).is_empty());
}

#[test]
fn subkind_change_moves_chains() {
    let mut world = World::new(WorldConfig::small());
    let mine = world.create(Kind::Loc, Subkind::Mine).unwrap();
    world.change_subkind(mine, Subkind::MineCollapsed).unwrap();

    assert!(world.first_of_subkind(Subkind::Mine).is_none());
    assert_eq!(world.first_of_subkind(Subkind::MineCollapsed), mine);
}

// =============================================================================
// Typed Extensions
// =============================================================================

#[test]
fn reads_never_allocate() {
    let mut world = World::new(WorldConfig::small());
    let c = world.create(Kind::Char, Subkind::None).unwrap();

    assert!(world.char_info(c).is_none());
    assert_eq!(world.loyalty(c).kind, LoyaltyKind::Unsworn);
    assert!(world.char_info(c).is_none());
}

#[test]
fn writes_allocate_on_demand() {
    let mut world = World::new(WorldConfig::small());
    let c = world.create(Kind::Char, Subkind::None).unwrap();

    world.char_info_mut(c).unwrap().moving = 12;
    assert_eq!(world.char_moving(c), 12);
    assert_eq!(
        world.char_info(c),
        Some(&CharInfo {
            moving: 12,
            ..CharInfo::default()
        })
    );
}

#[test]
fn item_extensions() {
    let mut world = World::new(WorldConfig::small());
    let gold = world.create(Kind::Item, Subkind::None).unwrap();
    *world.item_info_mut(gold).unwrap() = ItemInfo {
        weight: 1,
        ..ItemInfo::default()
    };
    world.set_name(gold, "gold").unwrap();

    assert_eq!(world.item_weight(gold), 1);
    assert_eq!(world.box_name(gold), format!("gold {gold}"));
}

// =============================================================================
// Inventory
// =============================================================================

#[test]
fn inventory_accumulates_and_consumes() {
    let mut world = World::new(WorldConfig::small());
    let c = world.create(Kind::Char, Subkind::None).unwrap();
    let gold = world.create(Kind::Item, Subkind::None).unwrap();

    world.gen_item(c, gold, 30).unwrap();
    world.gen_item(c, gold, 20).unwrap();
    assert_eq!(world.item_qty(c, gold), 50);
    assert_eq!(world.inventory(c).len(), 1);

    assert!(!world.consume_item(c, gold, 60).unwrap());
    assert!(world.consume_item(c, gold, 50).unwrap());
    assert_eq!(world.item_qty(c, gold), 0);
}

// =============================================================================
// Snapshots
// =============================================================================

#[test]
fn snapshot_is_isolated_from_later_writes() {
    let mut world = World::new(WorldConfig::small());
    let plain = world.create(Kind::Loc, Subkind::Plain).unwrap();
    let c = world.create(Kind::Char, Subkind::None).unwrap();
    world.relocate(c, plain).unwrap();

    let checkpoint = world.snapshot();
    world.relocate(c, BoxId::NONE).unwrap();
    world.detach_and_delete(plain).unwrap();

    assert_eq!(checkpoint.parent(c), plain);
    assert_eq!(checkpoint.children(plain), &[c]);
    assert_eq!(world.kind(plain), Kind::Deleted);
}

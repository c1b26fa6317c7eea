//! Property tests for the containment graph and stacking
//!
//! Random sequences of stacking operations must never break the graph.

use oly_foundation::{BoxId, Kind, Subkind};
use oly_storage::{World, WorldConfig};
use proptest::prelude::*;

const CHARS: usize = 8;

#[derive(Clone, Debug)]
enum Op {
    Join(usize, usize),
    Unstack(usize),
    Extract(usize),
    Promote(usize, usize),
    Capture(usize, usize),
    Release(usize),
    Move(usize, usize),
}

fn op() -> impl Strategy<Value = Op> {
    let c = 0..CHARS;
    prop_oneof![
        (c.clone(), c.clone()).prop_map(|(a, b)| Op::Join(a, b)),
        c.clone().prop_map(Op::Unstack),
        c.clone().prop_map(Op::Extract),
        (c.clone(), 0..CHARS).prop_map(|(a, i)| Op::Promote(a, i)),
        (c.clone(), c.clone()).prop_map(|(a, b)| Op::Capture(a, b)),
        c.clone().prop_map(Op::Release),
        (c, 0..2usize).prop_map(|(a, p)| Op::Move(a, p)),
    ]
}

struct Setup {
    world: World,
    provinces: [BoxId; 2],
    chars: Vec<BoxId>,
}

fn setup() -> Setup {
    let mut world = World::new(WorldConfig::small());
    let region = world.create(Kind::Loc, Subkind::Region).unwrap();
    let a = world.create(Kind::Loc, Subkind::Plain).unwrap();
    let b = world.create(Kind::Loc, Subkind::Forest).unwrap();
    world.relocate(a, region).unwrap();
    world.relocate(b, region).unwrap();
    let chars = (0..CHARS)
        .map(|_| {
            let c = world.create(Kind::Char, Subkind::None).unwrap();
            world.relocate(c, a).unwrap();
            c
        })
        .collect();
    Setup {
        world,
        provinces: [a, b],
        chars,
    }
}

fn apply(s: &mut Setup, op: &Op) {
    let w = &mut s.world;
    match *op {
        Op::Join(a, b) => {
            w.join(s.chars[a], s.chars[b]).unwrap();
        }
        Op::Unstack(a) => {
            w.unstack(s.chars[a]).unwrap();
        }
        Op::Extract(a) => {
            let id = s.chars[a];
            if w.parent(id).is_some() && !w.is_prisoner(id) {
                let home = w.province(id).unwrap();
                w.extract(id).unwrap();
                w.relocate(id, home).unwrap();
            }
        }
        Op::Promote(a, i) => {
            let id = s.chars[a];
            if !w.is_prisoner(id) {
                let pos = w.here_pos(id).unwrap();
                w.promote(id, i.min(pos)).unwrap();
            }
        }
        Op::Capture(a, b) => {
            let (captor, victim) = (s.chars[a], s.chars[b]);
            let together = w.immediate_location(captor).unwrap()
                == w.immediate_location(victim).unwrap();
            if captor != victim
                && together
                && !w.is_prisoner(captor)
                && !w.is_prisoner(victim)
                && !w.is_beneath(victim, captor).unwrap()
            {
                w.take_prisoner(captor, victim).unwrap();
            }
        }
        Op::Release(a) => {
            w.release_prisoner(s.chars[a]).unwrap();
        }
        Op::Move(a, p) => {
            let id = s.chars[a];
            if w.stack_parent(id).is_none() {
                w.relocate(id, s.provinces[p]).unwrap();
            }
        }
    }
}

proptest! {
    #[test]
    fn stacking_keeps_the_graph_sound(ops in prop::collection::vec(op(), 1..40)) {
        let mut s = setup();
        for op in &ops {
            apply(&mut s, op);
            prop_assert!(s.world.audit().is_ok(), "audit failed after {:?}", op);

            for &c in &s.chars {
                let leader = s.world.stack_leader(c).unwrap();
                prop_assert_eq!(s.world.stack_leader(leader).unwrap(), leader);
                prop_assert!(s.world.parent(c).is_some());
            }
        }
    }

    #[test]
    fn relocate_is_idempotent(ops in prop::collection::vec(op(), 0..20), who in 0..CHARS, to in 0..2usize) {
        let mut s = setup();
        for op in &ops {
            apply(&mut s, op);
        }
        let id = s.chars[who];
        let dest = s.provinces[to];
        s.world.relocate(id, dest).unwrap();
        s.world.relocate(id, dest).unwrap();
        prop_assert_eq!(s.world.children(dest).iter().filter(|c| **c == id).count(), 1);
        prop_assert!(s.world.audit().is_ok());
    }

    #[test]
    fn promote_keeps_everyone_else_in_order(who in 0..CHARS, to in 0..CHARS) {
        let mut s = setup();
        let plain = s.provinces[0];
        let id = s.chars[who];
        let others: Vec<_> = s.world.children(plain).iter().copied().filter(|c| *c != id).collect();

        let pos = s.world.here_pos(id).unwrap();
        s.world.promote(id, to.min(pos)).unwrap();

        let after: Vec<_> = s.world.children(plain).iter().copied().filter(|c| *c != id).collect();
        prop_assert_eq!(others, after);
        prop_assert_eq!(s.world.here_pos(id), Some(to.min(pos)));
    }

    #[test]
    fn extract_keeps_everyone_but_the_extracted(ops in prop::collection::vec(op(), 0..30), who in 0..CHARS) {
        let mut s = setup();
        for op in &ops {
            apply(&mut s, op);
        }
        let id = s.chars[who];
        prop_assume!(!s.world.is_prisoner(id));

        let location = s.world.immediate_location(id).unwrap();
        let prisoners_below: Vec<_> = s.world.children(id)
            .iter()
            .copied()
            .filter(|c| s.world.is_prisoner(*c))
            .collect();
        let mut before = s.world.descendants(location).unwrap();
        before.retain(|c| *c != id);
        before.sort();

        let out = s.world.extract(id).unwrap();

        let mut after = s.world.descendants(location).unwrap();
        after.sort();
        prop_assert_eq!(before, after);
        prop_assert_eq!(&out.escaped, &prisoners_below);
        for p in &out.escaped {
            prop_assert!(!s.world.is_prisoner(*p));
            prop_assert_eq!(s.world.parent(*p), location);
        }
        prop_assert!(s.world.audit().is_ok());
    }
}

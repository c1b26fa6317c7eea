//! Destruction of ships and buildings.
//!
//! Everything inside a destroyed structure is moved out before the
//! structure leaves the graph, so the containment invariant holds
//! throughout. Characters lost at sea are retired as dead characters rather
//! than deleted; the structure itself is deleted, except for a collapsed
//! mine, which lingers until [`decay_collapsed_mines`] clears it.

use oly_foundation::{BoxId, Error, Kind, LocDepth, Result, Subkind};
use oly_storage::World;

use crate::collaborators::Services;
use crate::land_search::find_nearest_land;

/// Where everyone aboard a sunken ship ended up.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SinkReport {
    /// Characters retired at sea, followers included.
    pub drowned: Vec<BoxId>,
    /// Characters who reached land, and where.
    pub survivors: Vec<(BoxId, BoxId)>,
    /// Entities moved to the ship's location.
    pub rehomed: Vec<BoxId>,
}

/// What happened to a collapsed building.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collapse {
    /// The building is gone.
    Destroyed,
    /// The mine caved in and blocks its site for a while.
    MineCollapsed,
}

/// Requires `fort` to be a building.
fn require_building(world: &World, fort: BoxId, op: &str) -> Result<()> {
    let kind = world.kind(fort);
    if kind != Kind::Loc {
        tracing::error!(fort = fort.get(), ?kind, op, "not a building");
        return Err(Error::wrong_kind(fort, Kind::Loc, kind).in_frame(op));
    }
    let depth = world.loc_depth(fort);
    if depth != LocDepth::Building {
        tracing::error!(fort = fort.get(), ?depth, op, "not a building");
        return Err(Error::wrong_depth(fort, LocDepth::Building, depth).in_frame(op));
    }
    Ok(())
}

fn rehome_children(world: &mut World, from: BoxId, to: BoxId) -> Result<Vec<BoxId>> {
    let children = world.children(from).to_vec();
    for child in &children {
        world.relocate(*child, to)?;
    }
    Ok(children)
}

/// Sinks `ship`.
///
/// In open water every character aboard is lost at sea: each either
/// survives (per [`crate::Collaborators::survives_sinking`]) and washes up
/// at the nearest land, or is retired along with its followers. Anywhere
/// else, everyone aboard steps off into the ship's location. Bound storms
/// are released and the ship is deleted.
///
/// # Errors
///
/// Fails if `ship` is not a ship, or on a containment violation.
pub fn sink_ship(world: &mut World, services: &mut Services<'_>, ship: BoxId) -> Result<SinkReport> {
    let kind = world.kind(ship);
    if kind != Kind::Ship {
        return Err(Error::wrong_kind(ship, Kind::Ship, kind).in_frame("sink_ship"));
    }

    let name = world.box_name(ship);
    let location = world.immediate_location(ship)?;
    let open_water = world.subkind(location) == Subkind::Ocean;
    let mut report = SinkReport::default();

    for who in world.children(ship).to_vec() {
        if open_water && world.kind(who) == Kind::Char {
            lost_at_sea(world, services, who, location, &mut report)?;
        } else {
            world.relocate(who, location)?;
            report.rehomed.push(who);
        }
    }

    let storms = world
        .subloc_info(ship)
        .map(|s| s.bound_storms.clone())
        .unwrap_or_default();
    for storm in storms {
        unbind_storm(world, storm)?;
    }

    world.detach_and_delete(ship)?;
    services.report(location, &format!("{name} has sunk."));
    tracing::info!(
        ship = ship.get(),
        location = location.get(),
        open_water,
        drowned = report.drowned.len(),
        survivors = report.survivors.len(),
        "ship sunk"
    );
    Ok(report)
}

fn lost_at_sea(
    world: &mut World,
    services: &mut Services<'_>,
    who: BoxId,
    sea: BoxId,
    report: &mut SinkReport,
) -> Result<()> {
    let skill = services.config.survival_skill;
    if services.collaborators.survives_sinking(world, who, skill) {
        let shore = find_nearest_land(world, services, sea)?;
        if shore.is_some() {
            world.relocate(who, shore)?;
            services.report(who, &format!("{} washed ashore.", world.box_name(who)));
            report.survivors.push((who, shore));
            return Ok(());
        }
    }

    let mut lost = vec![who];
    lost.extend(world.character_descendants(who)?);
    world.relocate(who, BoxId::NONE)?;
    for dead in &lost {
        services.report(*dead, &format!("{} was lost at sea.", world.box_name(*dead)));
        world.change_kind(*dead, Kind::DeadChar)?;
    }
    tracing::debug!(who = who.get(), count = lost.len(), "lost at sea");
    report.drowned.extend(lost);
    Ok(())
}

/// Clears the rubble of a collapsed mine.
///
/// Everything inside moves to the mine's location and the mine is deleted.
///
/// # Errors
///
/// Fails if `fort` is not a collapsed mine, or on a containment violation.
pub fn collapse_mine_debris(
    world: &mut World,
    services: &mut Services<'_>,
    fort: BoxId,
) -> Result<()> {
    let subkind = world.subkind(fort);
    if subkind != Subkind::MineCollapsed {
        return Err(
            Error::wrong_subkind(fort, Subkind::MineCollapsed, subkind).in_frame("collapse_mine_debris")
        );
    }

    let name = world.box_name(fort);
    let location = world.immediate_location(fort)?;
    rehome_children(world, fort, location)?;
    world.detach_and_delete(fort)?;

    services.report(location, &format!("The ruins of {name} have been cleared."));
    tracing::info!(mine = fort.get(), location = location.get(), "collapsed mine cleared");
    Ok(())
}

/// Brings down a building.
///
/// Occupants move to the building's location. A mine caves in and stays
/// as a collapsed mine for the configured delay. A castle releases its
/// garrisons. Anything else is deleted.
///
/// # Errors
///
/// Fails if `fort` is not a building, or on a containment violation.
pub fn building_collapses(
    world: &mut World,
    services: &mut Services<'_>,
    fort: BoxId,
) -> Result<Collapse> {
    require_building(world, fort, "building_collapses")?;

    let name = world.box_name(fort);
    let location = world.immediate_location(fort)?;
    let subkind = world.subkind(fort);
    rehome_children(world, fort, location)?;

    if subkind == Subkind::Mine {
        world.change_subkind(fort, Subkind::MineCollapsed)?;
        world.misc_info_mut(fort)?.mine_delay = services.config.mine_collapse_delay;
        services.report(location, &format!("{name} has caved in."));
        tracing::info!(mine = fort.get(), "mine collapsed");
        return Ok(Collapse::MineCollapsed);
    }

    if matches!(subkind, Subkind::Castle | Subkind::CastleNotDone) {
        for garrison in world.all_of_subkind(Subkind::Garrison) {
            if world.garrison_castle(garrison) == fort {
                world.misc_info_mut(garrison)?.garrison_castle = BoxId::NONE;
            }
        }
    }

    world.detach_and_delete(fort)?;
    services.report(location, &format!("{name} has collapsed."));
    tracing::info!(building = fort.get(), ?subkind, "building destroyed");
    Ok(Collapse::Destroyed)
}

/// Adds `amount` to a ship's or building's damage.
///
/// Damage stays within 0..=100. Reaching 100 destroys the structure when
/// `can_destroy` is set and stops at 99 otherwise. A structure already at
/// 100 is left alone. Returns true if this call destroyed it.
///
/// # Errors
///
/// Fails if `fort` is neither a ship nor a building, before anything is
/// written, or on a containment violation.
pub fn accumulate_damage(
    world: &mut World,
    services: &mut Services<'_>,
    fort: BoxId,
    amount: i32,
    can_destroy: bool,
) -> Result<bool> {
    if world.kind(fort) != Kind::Ship {
        require_building(world, fort, "accumulate_damage")?;
    }

    let before = world.damage(fort);
    if before >= 100 {
        return Ok(false);
    }

    let after = before.saturating_add(amount).clamp(0, 100);
    if after < 100 {
        world.subloc_info_mut(fort)?.damage = after;
        return Ok(false);
    }
    if !can_destroy {
        world.subloc_info_mut(fort)?.damage = 99;
        return Ok(false);
    }

    world.subloc_info_mut(fort)?.damage = 100;
    tracing::debug!(fort = fort.get(), before, amount, "structure destroyed by damage");
    if world.kind(fort) == Kind::Ship {
        sink_ship(world, services, fort)?;
    } else {
        building_collapses(world, services, fort)?;
    }
    Ok(true)
}

/// Counts down every collapsed mine and clears those whose delay has run
/// out. Returns the cleared mines.
///
/// # Errors
///
/// Propagates failures from [`collapse_mine_debris`].
pub fn decay_collapsed_mines(world: &mut World, services: &mut Services<'_>) -> Result<Vec<BoxId>> {
    let mut cleared = Vec::new();
    let mut mine = world.first_of_subkind(Subkind::MineCollapsed);
    while mine.is_some() {
        let delay = world.misc_info(mine).map_or(0, |m| m.mine_delay) - 1;
        if delay > 0 {
            world.misc_info_mut(mine)?.mine_delay = delay;
        } else {
            collapse_mine_debris(world, services, mine)?;
            cleared.push(mine);
        }
        // Stepping on from a just-deleted mine is safe.
        mine = world.next_of_subkind(mine);
    }
    Ok(cleared)
}

/// Binds `storm` to follow `ship`, releasing any earlier binding.
///
/// # Errors
///
/// Fails if either entity has the wrong kind.
pub fn bind_storm(world: &mut World, storm: BoxId, ship: BoxId) -> Result<()> {
    if world.kind(storm) != Kind::Storm {
        return Err(Error::wrong_kind(storm, Kind::Storm, world.kind(storm)));
    }
    if world.kind(ship) != Kind::Ship {
        return Err(Error::wrong_kind(ship, Kind::Ship, world.kind(ship)));
    }
    unbind_storm(world, storm)?;
    world.misc_info_mut(storm)?.storm_bound_to = ship;
    world.subloc_info_mut(ship)?.bound_storms.push(storm);
    Ok(())
}

/// Releases `storm` from the ship it follows.
///
/// Returns `false` if it was not bound.
///
/// # Errors
///
/// Fails if `storm` is not live.
pub fn unbind_storm(world: &mut World, storm: BoxId) -> Result<bool> {
    let ship = world.misc_info(storm).map_or(BoxId::NONE, |m| m.storm_bound_to);
    if ship.is_none() {
        return Ok(false);
    }
    world.misc_info_mut(storm)?.storm_bound_to = BoxId::NONE;
    if world.subloc_info(ship).is_some() {
        world.subloc_info_mut(ship)?.bound_storms.retain(|s| *s != storm);
    }
    tracing::debug!(storm = storm.get(), ship = ship.get(), "storm unbound");
    Ok(true)
}

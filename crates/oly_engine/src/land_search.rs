//! Nearest-land search for castaways.
//!
//! From an ocean province, random walks step along province exits looking
//! for land: a non-ocean province, or an island inside a visited ocean
//! cell. Walks that hit a dead end turn clockwise. If every walk fails, a
//! land province of the same region is chosen at random.

use oly_foundation::{BoxId, Direction, Kind, LocDepth, Result, Subkind};
use oly_storage::World;

use crate::collaborators::Services;

fn is_ocean(world: &World, id: BoxId) -> bool {
    world.subkind(id) == Subkind::Ocean
}

/// Island directly inside `cell`, or the sentinel.
fn island_in(world: &World, cell: BoxId) -> BoxId {
    world
        .children(cell)
        .iter()
        .copied()
        .find(|c| world.kind(*c) == Kind::Loc && world.subkind(*c) == Subkind::Island)
        .unwrap_or(BoxId::NONE)
}

/// Exit from `cell` heading `dir`, turning clockwise past missing exits.
fn step(world: &World, cell: BoxId, dir: Direction) -> Option<(BoxId, Direction)> {
    let mut dir = dir;
    for _ in 0..Direction::CARDINAL.len() {
        let dest = world.location_direction(cell, dir);
        if dest.is_some() {
            return Some((dest, dir));
        }
        dir = dir.rotate();
    }
    None
}

fn random_walk(world: &World, services: &mut Services<'_>, origin: BoxId) -> BoxId {
    let pick = services.random.pick_index(Direction::CARDINAL.len());
    let mut dir = Direction::CARDINAL[pick];
    let mut cell = origin;

    for _ in 0..services.config.land_search_steps {
        let Some((next, heading)) = step(world, cell, dir) else {
            break;
        };
        cell = next;
        dir = heading;

        if world.loc_depth(cell) == LocDepth::Province && !is_ocean(world, cell) {
            return cell;
        }
        let island = island_in(world, cell);
        if island.is_some() {
            return island;
        }
    }
    BoxId::NONE
}

/// Nearest land to `origin`: `origin` itself unless it is ocean.
///
/// Returns the sentinel, after reporting the failure, if the region has no
/// land at all.
///
/// # Errors
///
/// Fails if the region scan exceeds the traversal limit.
pub fn find_nearest_land(
    world: &World,
    services: &mut Services<'_>,
    origin: BoxId,
) -> Result<BoxId> {
    if !is_ocean(world, origin) {
        return Ok(origin);
    }

    let island = island_in(world, origin);
    if island.is_some() {
        return Ok(island);
    }

    for attempt in 0..services.config.land_search_attempts {
        let found = random_walk(world, services, origin);
        if found.is_some() {
            tracing::debug!(origin = origin.get(), found = found.get(), attempt, "land found");
            return Ok(found);
        }
    }

    let region = world.region(origin)?;
    let land: Vec<BoxId> = world
        .descendants(region)?
        .into_iter()
        .filter(|p| world.loc_depth(*p) == LocDepth::Province && !is_ocean(world, *p))
        .collect();

    if land.is_empty() {
        tracing::warn!(origin = origin.get(), region = region.get(), "no land in region");
        services.report(origin, "No land could be found anywhere nearby.");
        return Ok(BoxId::NONE);
    }

    let chosen = land[services.random.pick_index(land.len())];
    tracing::warn!(
        origin = origin.get(),
        chosen = chosen.get(),
        candidates = land.len(),
        "land search fell back to a region scan"
    );
    Ok(chosen)
}

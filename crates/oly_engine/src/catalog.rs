//! Well-known item types.
//!
//! Item types are ordinary entities whose [`ItemInfo`] carries their static
//! data. A handful are referenced by the rules directly and live at fixed
//! handles; [`install_standard_items`] creates them in a fresh world.

use oly_foundation::{BoxId, Kind, Result, Subkind};
use oly_storage::{ItemInfo, World};

/// Gold coins.
pub const ITEM_GOLD: BoxId = BoxId::new(1);
/// Peasants; also the figure a character counts as when it has no unit item.
pub const ITEM_PEASANT: BoxId = BoxId::new(10);
/// Workers.
pub const ITEM_WORKER: BoxId = BoxId::new(11);
/// Soldiers.
pub const ITEM_SOLDIER: BoxId = BoxId::new(12);
/// Riding horses.
pub const ITEM_RIDING_HORSE: BoxId = BoxId::new(52);
/// Winged horses.
pub const ITEM_WINGED_HORSE: BoxId = BoxId::new(54);
/// Oxen.
pub const ITEM_OX: BoxId = BoxId::new(76);

struct StandardItem {
    id: BoxId,
    name: &'static str,
    info: ItemInfo,
}

fn man(weight: i64, land_cap: i64) -> ItemInfo {
    ItemInfo {
        weight,
        land_cap,
        is_man_item: true,
        ..ItemInfo::default()
    }
}

fn standard_items() -> Vec<StandardItem> {
    vec![
        StandardItem {
            id: ITEM_GOLD,
            name: "gold",
            info: ItemInfo {
                weight: 1,
                ..ItemInfo::default()
            },
        },
        StandardItem {
            id: ITEM_PEASANT,
            name: "peasant",
            info: man(10, 0),
        },
        StandardItem {
            id: ITEM_WORKER,
            name: "worker",
            info: man(100, 100),
        },
        StandardItem {
            id: ITEM_SOLDIER,
            name: "soldier",
            info: man(100, 100),
        },
        StandardItem {
            id: ITEM_RIDING_HORSE,
            name: "riding horse",
            info: ItemInfo {
                weight: 1000,
                land_cap: 1500,
                ride_cap: 1150,
                animal: true,
                ..ItemInfo::default()
            },
        },
        StandardItem {
            id: ITEM_WINGED_HORSE,
            name: "winged horse",
            info: ItemInfo {
                weight: 1000,
                land_cap: 1500,
                ride_cap: 1150,
                fly_cap: 1150,
                animal: true,
                ..ItemInfo::default()
            },
        },
        StandardItem {
            id: ITEM_OX,
            name: "ox",
            info: ItemInfo {
                weight: 1000,
                land_cap: 1500,
                animal: true,
                ..ItemInfo::default()
            },
        },
    ]
}

/// Creates the standard item types at their fixed handles.
///
/// Call before allocating anything else, since the handles must be free.
///
/// # Errors
///
/// Returns an error if any of the handles is already live.
pub fn install_standard_items(world: &mut World) -> Result<()> {
    for item in standard_items() {
        world.create_at(item.id, Kind::Item, Subkind::None)?;
        world.set_name(item.id, item.name)?;
        *world.item_info_mut(item.id)? = item.info;
    }
    tracing::debug!(count = world.entity_count(), "standard items installed");
    Ok(())
}

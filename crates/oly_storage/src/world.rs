//! The simulation context.
//!
//! `World` owns the entity table and configuration and is passed explicitly
//! to every core operation. Cloning is cheap: the table is built on
//! persistent collections, so a clone shares structure with the original
//! until either side writes. That makes [`World::snapshot`] usable as a
//! turn checkpoint.

use oly_foundation::{BoxId, Kind, Result, SimRng, Subkind};

use crate::config::WorldConfig;
use crate::entity::{Entity, EntityTable};
use crate::extension::{
    CharInfo, Extension, InventoryLine, ItemInfo, LocInfo, Loyalty, MiscInfo, SublocInfo,
};

/// Entity table plus the state every core operation needs.
#[derive(Clone, Debug)]
pub struct World {
    /// Entity records and indices.
    entities: EntityTable,
    /// Configuration.
    config: WorldConfig,
    /// Current turn number.
    turn: u32,
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        Self {
            entities: EntityTable::new(config.max_handle),
            config,
            turn: 0,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// A random source seeded from the configured world seed.
    #[must_use]
    pub fn rng(&self) -> SimRng {
        SimRng::new(self.config.seed)
    }

    /// Returns the current turn number.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Ends the current turn: releases handles deleted during it for reuse
    /// and advances the turn counter.
    pub fn advance_turn(&mut self) {
        let released = self.entities.recycle_deleted();
        self.turn += 1;
        tracing::debug!(turn = self.turn, released, "turn advanced");
    }

    /// Returns a checkpoint sharing structure with this world.
    #[must_use]
    pub fn snapshot(&self) -> World {
        self.clone()
    }

    /// Returns the entity table.
    #[must_use]
    pub fn entities(&self) -> &EntityTable {
        &self.entities
    }

    pub(crate) fn entities_mut(&mut self) -> &mut EntityTable {
        &mut self.entities
    }

    /// Step budget for bounded walks.
    #[must_use]
    pub fn traversal_limit(&self) -> usize {
        self.config.traversal_limit()
    }

    // --- Entity store ---

    /// Allocates a new entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is full.
    pub fn create(&mut self, kind: Kind, subkind: Subkind) -> Result<BoxId> {
        let id = self.entities.create(kind, subkind)?;
        tracing::trace!(id = id.get(), %kind, ?subkind, "entity created");
        Ok(id)
    }

    /// Allocates a specific handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is out of range or live.
    pub fn create_at(&mut self, id: BoxId, kind: Kind, subkind: Subkind) -> Result<()> {
        self.entities.create_at(id, kind, subkind)
    }

    /// Deletes a detached entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not live or still in the graph.
    pub fn delete(&mut self, id: BoxId) -> Result<()> {
        self.entities.delete(id)?;
        tracing::debug!(id = id.get(), "entity deleted");
        Ok(())
    }

    /// Detaches an entity from its parent and deletes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity still contains anything.
    pub fn detach_and_delete(&mut self, id: BoxId) -> Result<()> {
        self.relocate(id, BoxId::NONE)?;
        self.delete(id)
    }

    /// Moves an entity onto a different subkind chain.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not live.
    pub fn change_subkind(&mut self, id: BoxId, subkind: Subkind) -> Result<()> {
        self.entities.change_subkind(id, subkind)
    }

    /// Moves an entity onto a different kind chain.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not live.
    pub fn change_kind(&mut self, id: BoxId, kind: Kind) -> Result<()> {
        self.entities.change_kind(id, kind)
    }

    /// Returns the record for a live handle.
    #[must_use]
    pub fn entity(&self, id: BoxId) -> Option<&Entity> {
        self.entities.entity(id)
    }

    /// Primary type; [`Kind::Deleted`] for non-live handles.
    #[must_use]
    pub fn kind(&self, id: BoxId) -> Kind {
        self.entities.kind(id)
    }

    /// Secondary type; [`Subkind::None`] for non-live handles.
    #[must_use]
    pub fn subkind(&self, id: BoxId) -> Subkind {
        self.entities.subkind(id)
    }

    /// True if the handle names a live entity.
    #[must_use]
    pub fn valid(&self, id: BoxId) -> bool {
        self.entities.valid(id)
    }

    /// Typed read; `None` if the entity or the record is absent.
    #[must_use]
    pub fn get<E: Extension>(&self, id: BoxId) -> Option<&E> {
        self.entities.get(id)
    }

    /// Typed write; allocates the record on first use.
    ///
    /// # Errors
    ///
    /// Returns an error for the sentinel, out-of-range, or deleted handles.
    pub fn get_mut<E: Extension>(&mut self, id: BoxId) -> Result<&mut E> {
        self.entities.get_mut(id)
    }

    /// Character record, if present.
    #[must_use]
    pub fn char_info(&self, id: BoxId) -> Option<&CharInfo> {
        self.get(id)
    }

    /// Character record, allocated on demand.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is not live.
    pub fn char_info_mut(&mut self, id: BoxId) -> Result<&mut CharInfo> {
        self.get_mut(id)
    }

    /// Location record, if present.
    #[must_use]
    pub fn loc_info(&self, id: BoxId) -> Option<&LocInfo> {
        self.get(id)
    }

    /// Location record, allocated on demand.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is not live.
    pub fn loc_info_mut(&mut self, id: BoxId) -> Result<&mut LocInfo> {
        self.get_mut(id)
    }

    /// Ship/building record, if present.
    #[must_use]
    pub fn subloc_info(&self, id: BoxId) -> Option<&SublocInfo> {
        self.get(id)
    }

    /// Ship/building record, allocated on demand.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is not live.
    pub fn subloc_info_mut(&mut self, id: BoxId) -> Result<&mut SublocInfo> {
        self.get_mut(id)
    }

    /// Item record, if present.
    #[must_use]
    pub fn item_info(&self, id: BoxId) -> Option<&ItemInfo> {
        self.get(id)
    }

    /// Item record, allocated on demand.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is not live.
    pub fn item_info_mut(&mut self, id: BoxId) -> Result<&mut ItemInfo> {
        self.get_mut(id)
    }

    /// Miscellaneous record, if present.
    #[must_use]
    pub fn misc_info(&self, id: BoxId) -> Option<&MiscInfo> {
        self.get(id)
    }

    /// Miscellaneous record, allocated on demand.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is not live.
    pub fn misc_info_mut(&mut self, id: BoxId) -> Result<&mut MiscInfo> {
        self.get_mut(id)
    }

    /// First entity of a kind in chain order.
    #[must_use]
    pub fn first_of_kind(&self, kind: Kind) -> BoxId {
        self.entities.first_of_kind(kind)
    }

    /// Entity after `id` on its kind chain.
    #[must_use]
    pub fn next_of_kind(&self, id: BoxId) -> BoxId {
        self.entities.next_of_kind(id)
    }

    /// First entity of a subkind in chain order.
    #[must_use]
    pub fn first_of_subkind(&self, subkind: Subkind) -> BoxId {
        self.entities.first_of_subkind(subkind)
    }

    /// Entity after `id` on its subkind chain.
    #[must_use]
    pub fn next_of_subkind(&self, id: BoxId) -> BoxId {
        self.entities.next_of_subkind(id)
    }

    /// Snapshot of every entity of a kind, safe across deletes.
    #[must_use]
    pub fn all_of_kind(&self, kind: Kind) -> Vec<BoxId> {
        self.entities.all_of_kind(kind)
    }

    /// Snapshot of every entity of a subkind, safe across deletes.
    #[must_use]
    pub fn all_of_subkind(&self, subkind: Subkind) -> Vec<BoxId> {
        self.entities.all_of_subkind(subkind)
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // --- Names and inventory ---

    /// Sets the display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is not live.
    pub fn set_name(&mut self, id: BoxId, name: impl Into<String>) -> Result<()> {
        self.entities.set_name(id, name)
    }

    /// Name and handle as shown to players.
    #[must_use]
    pub fn box_name(&self, id: BoxId) -> String {
        self.entities.box_name(id)
    }

    /// Inventory lines; empty for non-live handles.
    #[must_use]
    pub fn inventory(&self, id: BoxId) -> &[InventoryLine] {
        self.entities.inventory(id)
    }

    /// Quantity of an item held.
    #[must_use]
    pub fn item_qty(&self, id: BoxId, item: BoxId) -> i64 {
        self.entities.item_qty(id, item)
    }

    /// Adds items to an inventory.
    ///
    /// # Errors
    ///
    /// Returns an error if the holder is not live.
    pub fn gen_item(&mut self, id: BoxId, item: BoxId, qty: i64) -> Result<()> {
        self.entities.gen_item(id, item, qty)
    }

    /// Removes items if enough are held.
    ///
    /// # Errors
    ///
    /// Returns an error if the holder is not live.
    pub fn consume_item(&mut self, id: BoxId, item: BoxId, qty: i64) -> Result<bool> {
        self.entities.consume_item(id, item, qty)
    }

    // --- Convenience accessors (zero when absent) ---

    /// True if the character is held prisoner.
    #[must_use]
    pub fn is_prisoner(&self, id: BoxId) -> bool {
        self.char_info(id).is_some_and(|c| c.prisoner)
    }

    /// Day the character's current move began, 0 if not moving.
    #[must_use]
    pub fn char_moving(&self, id: BoxId) -> i32 {
        self.char_info(id).map_or(0, |c| c.moving)
    }

    /// Character loyalty.
    #[must_use]
    pub fn loyalty(&self, id: BoxId) -> Loyalty {
        self.char_info(id).map(|c| c.loyalty).unwrap_or_default()
    }

    /// Figure type a character counts as, 0 if unset.
    #[must_use]
    pub fn unit_item(&self, id: BoxId) -> BoxId {
        self.char_info(id).map_or(BoxId::NONE, |c| c.unit_item)
    }

    /// Structural damage of a ship or building.
    #[must_use]
    pub fn damage(&self, id: BoxId) -> i32 {
        self.subloc_info(id).map_or(0, |s| s.damage)
    }

    /// Weight of one unit of an item.
    #[must_use]
    pub fn item_weight(&self, item: BoxId) -> i64 {
        self.item_info(item).map_or(0, |i| i.weight)
    }

    /// Castle a garrison guards.
    #[must_use]
    pub fn garrison_castle(&self, id: BoxId) -> BoxId {
        self.misc_info(id).map_or(BoxId::NONE, |m| m.garrison_castle)
    }
}

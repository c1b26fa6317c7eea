//! The entity table.
//!
//! `EntityTable` is a fixed-capacity arena of entity records addressed by
//! [`BoxId`]. Slots are allocated on creation and cleared on deletion; a
//! cleared, never-used, or out-of-range slot reads as [`Kind::Deleted`].
//! Deleted handles are parked until [`EntityTable::recycle_deleted`] hands
//! them back to the allocator, so a handle is never reused within a turn.

use oly_foundation::{BoxId, Error, ErrorKind, Kind, Result, Subkind};

use crate::extension::{Extension, InventoryLine};
use crate::extension::{CharInfo, ItemInfo, LocInfo, MiscInfo, SublocInfo};
use crate::index::ChainIndex;

/// One entity record.
///
/// `location` and `here` are written only by the containment primitive in
/// [`crate::World::relocate`].
#[derive(Clone, Debug, Default)]
pub struct Entity {
    pub(crate) kind: Kind,
    pub(crate) subkind: Subkind,
    pub(crate) name: Option<String>,
    pub(crate) location: BoxId,
    pub(crate) here: Vec<BoxId>,
    pub(crate) inventory: Vec<InventoryLine>,
    pub(crate) char_info: Option<CharInfo>,
    pub(crate) loc_info: Option<LocInfo>,
    pub(crate) subloc_info: Option<SublocInfo>,
    pub(crate) item_info: Option<ItemInfo>,
    pub(crate) misc_info: Option<MiscInfo>,
}

impl Entity {
    fn new(kind: Kind, subkind: Subkind) -> Self {
        Self {
            kind,
            subkind,
            ..Self::default()
        }
    }

    /// Primary type.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Secondary type.
    #[must_use]
    pub fn subkind(&self) -> Subkind {
        self.subkind
    }

    /// Display name, if one was set.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Direct parent (`where`).
    #[must_use]
    pub fn location(&self) -> BoxId {
        self.location
    }

    /// Direct children, in precedence order.
    #[must_use]
    pub fn here(&self) -> &[BoxId] {
        &self.here
    }

    /// Inventory lines.
    #[must_use]
    pub fn inventory(&self) -> &[InventoryLine] {
        &self.inventory
    }
}

/// Fixed-capacity entity arena with kind and subkind indices.
#[derive(Clone, Debug)]
pub struct EntityTable {
    /// Slot per handle; index 0 is never used.
    slots: im::Vector<Option<Entity>>,
    /// Exclusive upper bound on handles.
    capacity: u32,
    /// Handles ready for reuse.
    free_list: Vec<BoxId>,
    /// Handles deleted since the last recycle.
    pending_free: Vec<BoxId>,
    /// Lowest never-allocated handle.
    next_fresh: u32,
    /// Count of live entities.
    live_count: usize,
    kind_index: ChainIndex<Kind>,
    subkind_index: ChainIndex<Subkind>,
}

impl EntityTable {
    /// Creates an empty table accepting handles `1..capacity`.
    #[must_use]
    pub fn new(capacity: u32) -> Self {
        Self {
            slots: im::Vector::new(),
            capacity: capacity.max(2),
            free_list: Vec::new(),
            pending_free: Vec::new(),
            next_fresh: 1,
            live_count: 0,
            kind_index: ChainIndex::new(),
            subkind_index: ChainIndex::new(),
        }
    }

    /// Exclusive upper bound on handles.
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live_count
    }

    /// Returns true if there are no live entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    fn in_range(&self, id: BoxId) -> bool {
        id.is_some() && id.get() < self.capacity
    }

    fn check_range(&self, id: BoxId) -> Result<()> {
        if self.in_range(id) {
            Ok(())
        } else {
            Err(Error::invalid_handle(id))
        }
    }

    fn occupied(&self, id: BoxId) -> bool {
        matches!(self.slots.get(id.index()), Some(Some(_)))
    }

    // --- Allocation ---

    /// Allocates a new entity of the given kind and subkind.
    ///
    /// Reuses recycled handles first, then the lowest never-used handle.
    ///
    /// # Errors
    ///
    /// Returns `TableFull` if no handle is available, or `InvalidHandle` if
    /// `kind` is [`Kind::Deleted`].
    pub fn create(&mut self, kind: Kind, subkind: Subkind) -> Result<BoxId> {
        if kind == Kind::Deleted {
            return Err(Error::internal("cannot create an entity of kind deleted"));
        }
        while let Some(id) = self.free_list.pop() {
            if !self.occupied(id) {
                self.install(id, kind, subkind);
                return Ok(id);
            }
        }
        while self.next_fresh < self.capacity {
            let id = BoxId::new(self.next_fresh);
            self.next_fresh += 1;
            if !self.occupied(id) {
                self.install(id, kind, subkind);
                return Ok(id);
            }
        }
        Err(Error::new(ErrorKind::TableFull {
            capacity: self.capacity as usize,
        }))
    }

    /// Allocates a specific handle.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if out of range, `HandleInUse` if live.
    pub fn create_at(&mut self, id: BoxId, kind: Kind, subkind: Subkind) -> Result<()> {
        self.check_range(id)?;
        if kind == Kind::Deleted {
            return Err(Error::internal("cannot create an entity of kind deleted"));
        }
        if self.occupied(id) {
            return Err(Error::new(ErrorKind::HandleInUse(id)));
        }
        self.pending_free.retain(|p| *p != id);
        self.install(id, kind, subkind);
        Ok(())
    }

    fn install(&mut self, id: BoxId, kind: Kind, subkind: Subkind) {
        while self.slots.len() <= id.index() {
            self.slots.push_back(None);
        }
        self.slots[id.index()] = Some(Entity::new(kind, subkind));
        self.kind_index.insert(kind, id);
        self.subkind_index.insert(subkind, id);
        self.live_count += 1;
    }

    /// Deletes an entity, leaving a tombstone.
    ///
    /// The entity must already be out of the containment graph.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is not live or still attached.
    pub fn delete(&mut self, id: BoxId) -> Result<()> {
        let entity = self.entity(id).ok_or_else(|| self.not_live(id))?;
        if entity.location.is_some() || !entity.here.is_empty() {
            return Err(Error::new(ErrorKind::NotDetached(id)));
        }
        let (kind, subkind) = (entity.kind, entity.subkind);

        self.kind_index.remove(&kind, id);
        self.subkind_index.remove(&subkind, id);
        self.slots[id.index()] = None;
        self.pending_free.push(id);
        self.live_count -= 1;
        Ok(())
    }

    /// Makes handles deleted since the last call available for reuse.
    ///
    /// Returns how many handles were released.
    pub fn recycle_deleted(&mut self) -> usize {
        let released = self.pending_free.len();
        // Reverse so the allocator pops in deletion order.
        self.free_list.extend(self.pending_free.drain(..).rev());
        released
    }

    /// Moves an entity onto a different subkind chain.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is not live.
    pub fn change_subkind(&mut self, id: BoxId, subkind: Subkind) -> Result<()> {
        let old = self.entity(id).ok_or_else(|| self.not_live(id))?.subkind;
        if old == subkind {
            return Ok(());
        }
        self.subkind_index.remove(&old, id);
        self.subkind_index.insert(subkind, id);
        self.entity_mut(id)?.subkind = subkind;
        Ok(())
    }

    /// Moves an entity onto a different kind chain.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is not live or `kind` is deleted.
    pub fn change_kind(&mut self, id: BoxId, kind: Kind) -> Result<()> {
        if kind == Kind::Deleted {
            return Err(Error::internal("use delete to tombstone an entity"));
        }
        let old = self.entity(id).ok_or_else(|| self.not_live(id))?.kind;
        if old == kind {
            return Ok(());
        }
        self.kind_index.remove(&old, id);
        self.kind_index.insert(kind, id);
        self.entity_mut(id)?.kind = kind;
        Ok(())
    }

    fn not_live(&self, id: BoxId) -> Error {
        if self.in_range(id) {
            Error::deleted_handle(id)
        } else {
            Error::invalid_handle(id)
        }
    }

    // --- Reads ---

    /// Returns the record for a live handle.
    #[must_use]
    pub fn entity(&self, id: BoxId) -> Option<&Entity> {
        if !self.in_range(id) {
            return None;
        }
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Returns the record for a live handle, or the error explaining why
    /// there is none.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` or `DeletedHandle`.
    pub fn require(&self, id: BoxId) -> Result<&Entity> {
        self.entity(id).ok_or_else(|| self.not_live(id))
    }

    /// Returns the mutable record for a live handle.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` or `DeletedHandle` rather than allocating.
    pub fn entity_mut(&mut self, id: BoxId) -> Result<&mut Entity> {
        self.check_range(id)?;
        match self.slots.get_mut(id.index()) {
            Some(Some(entity)) => Ok(entity),
            _ => Err(Error::deleted_handle(id)),
        }
    }

    /// Primary type; [`Kind::Deleted`] for any non-live handle.
    #[must_use]
    pub fn kind(&self, id: BoxId) -> Kind {
        self.entity(id).map_or(Kind::Deleted, Entity::kind)
    }

    /// Secondary type; [`Subkind::None`] for any non-live handle.
    #[must_use]
    pub fn subkind(&self, id: BoxId) -> Subkind {
        self.entity(id).map_or(Subkind::None, Entity::subkind)
    }

    /// True if the handle names a live entity.
    #[must_use]
    pub fn valid(&self, id: BoxId) -> bool {
        self.kind(id) != Kind::Deleted
    }

    /// Typed read. Never allocates.
    #[must_use]
    pub fn get<E: Extension>(&self, id: BoxId) -> Option<&E> {
        self.entity(id).and_then(|e| E::slot(e).as_ref())
    }

    /// Typed write. Allocates the extension on first use.
    ///
    /// # Errors
    ///
    /// Returns an error for the sentinel, out-of-range, or deleted handles.
    pub fn get_mut<E: Extension>(&mut self, id: BoxId) -> Result<&mut E> {
        let entity = self
            .entity_mut(id)
            .map_err(|e| e.in_frame(format!("write {} info", E::NAME)))?;
        Ok(E::slot_mut(entity).get_or_insert_with(E::default))
    }

    /// Drops an extension record.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is not live.
    pub fn clear<E: Extension>(&mut self, id: BoxId) -> Result<()> {
        let entity = self
            .entity_mut(id)
            .map_err(|e| e.in_frame(format!("clear {} info", E::NAME)))?;
        *E::slot_mut(entity) = None;
        Ok(())
    }

    /// Iterates over every live handle in numeric order.
    pub fn iter(&self) -> impl Iterator<Item = BoxId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .filter_map(|(idx, _)| u32::try_from(idx).ok().map(BoxId::new))
    }

    // --- Indices ---

    /// First entity of a kind in chain order.
    #[must_use]
    pub fn first_of_kind(&self, kind: Kind) -> BoxId {
        self.kind_index.first(&kind)
    }

    /// Entity after `id` on its kind chain.
    #[must_use]
    pub fn next_of_kind(&self, id: BoxId) -> BoxId {
        self.kind_index.next(id)
    }

    /// First entity of a subkind in chain order.
    #[must_use]
    pub fn first_of_subkind(&self, subkind: Subkind) -> BoxId {
        self.subkind_index.first(&subkind)
    }

    /// Entity after `id` on its subkind chain.
    #[must_use]
    pub fn next_of_subkind(&self, id: BoxId) -> BoxId {
        self.subkind_index.next(id)
    }

    /// Snapshot of every entity of a kind.
    #[must_use]
    pub fn all_of_kind(&self, kind: Kind) -> Vec<BoxId> {
        self.kind_index.collect(&kind)
    }

    /// Snapshot of every entity of a subkind.
    #[must_use]
    pub fn all_of_subkind(&self, subkind: Subkind) -> Vec<BoxId> {
        self.subkind_index.collect(&subkind)
    }

    /// Number of entities of a kind.
    #[must_use]
    pub fn count_of_kind(&self, kind: Kind) -> usize {
        self.kind_index.len(&kind)
    }

    // --- Names ---

    /// Sets the display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is not live.
    pub fn set_name(&mut self, id: BoxId, name: impl Into<String>) -> Result<()> {
        self.entity_mut(id)?.name = Some(name.into());
        Ok(())
    }

    /// Display name, if any.
    #[must_use]
    pub fn name(&self, id: BoxId) -> Option<&str> {
        self.entity(id).and_then(Entity::name)
    }

    /// Name and handle as shown to players, e.g. `Osswid [5021]`.
    #[must_use]
    pub fn box_name(&self, id: BoxId) -> String {
        match self.name(id) {
            Some(name) => format!("{name} {id}"),
            None => id.to_string(),
        }
    }

    // --- Inventory ---

    /// Inventory lines of an entity; empty for non-live handles.
    #[must_use]
    pub fn inventory(&self, id: BoxId) -> &[InventoryLine] {
        self.entity(id).map_or(&[][..], Entity::inventory)
    }

    /// Quantity of `item` held by `id`.
    #[must_use]
    pub fn item_qty(&self, id: BoxId, item: BoxId) -> i64 {
        self.inventory(id)
            .iter()
            .find(|line| line.item == item)
            .map_or(0, |line| line.qty)
    }

    /// Adds `qty` of `item` to an inventory.
    ///
    /// # Errors
    ///
    /// Returns an error if the holder is not live.
    pub fn gen_item(&mut self, id: BoxId, item: BoxId, qty: i64) -> Result<()> {
        let inventory = &mut self.entity_mut(id)?.inventory;
        match inventory.iter_mut().find(|line| line.item == item) {
            Some(line) => line.qty += qty,
            None => inventory.push(InventoryLine { item, qty }),
        }
        inventory.retain(|line| line.qty > 0);
        Ok(())
    }

    /// Removes `qty` of `item` if that many are held.
    ///
    /// Returns `false`, changing nothing, if the holder has too few.
    ///
    /// # Errors
    ///
    /// Returns an error if the holder is not live.
    pub fn consume_item(&mut self, id: BoxId, item: BoxId, qty: i64) -> Result<bool> {
        if self.item_qty(id, item) < qty {
            return Ok(false);
        }
        self.gen_item(id, item, -qty)?;
        Ok(true)
    }

    // --- Containment fields ---

    /// Direct parent; the sentinel for non-live handles.
    #[must_use]
    pub fn location(&self, id: BoxId) -> BoxId {
        self.entity(id).map_or(BoxId::NONE, Entity::location)
    }

    /// Direct children; empty for non-live handles.
    #[must_use]
    pub fn here(&self, id: BoxId) -> &[BoxId] {
        self.entity(id).map_or(&[][..], Entity::here)
    }

    pub(crate) fn here_mut(&mut self, id: BoxId) -> Result<&mut Vec<BoxId>> {
        Ok(&mut self.entity_mut(id)?.here)
    }

    pub(crate) fn set_location(&mut self, id: BoxId, parent: BoxId) -> Result<()> {
        self.entity_mut(id)?.location = parent;
        Ok(())
    }
}

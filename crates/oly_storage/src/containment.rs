//! The containment graph.
//!
//! Every entity has one parent (`where`, read with [`World::parent`]) and an
//! ordered list of direct children (its here list, read with
//! [`World::children`]). The two are kept in agreement by a single
//! mutator, [`World::relocate`]; nothing else writes either field.
//!
//! Locations nest region ⊃ province ⊃ sub-location ⊃ building. Characters
//! and ships sit in a location's here list without being on that ladder,
//! and characters may sit in other characters' here lists (stacks).

use oly_foundation::{BoxId, Direction, Error, ErrorContext, ErrorKind, Kind, LocDepth, Result, Subkind};

use crate::budget::Budget;
use crate::world::World;

fn violation(operation: &'static str, entity: BoxId, kind: ErrorKind) -> Error {
    tracing::error!(operation, entity = entity.get(), violation = %kind, "containment invariant violated");
    Error::new(kind).with_context(
        ErrorContext::new()
            .with_operation(operation)
            .with_entity(entity),
    )
}

impl World {
    /// Direct parent; the sentinel if detached or not live.
    #[must_use]
    pub fn parent(&self, id: BoxId) -> BoxId {
        self.entities().location(id)
    }

    /// Direct children in precedence order.
    #[must_use]
    pub fn children(&self, id: BoxId) -> &[BoxId] {
        self.entities().here(id)
    }

    /// Index of `id` within its parent's here list.
    #[must_use]
    pub fn here_pos(&self, id: BoxId) -> Option<usize> {
        self.children(self.parent(id)).iter().position(|c| *c == id)
    }

    /// Moves `id` under `new_parent`, appending it to the parent's here
    /// list. Relocating to the sentinel detaches.
    ///
    /// Relocating to the current parent moves `id` to the end of the list.
    ///
    /// # Errors
    ///
    /// Fails without changing anything if either handle is not live, if
    /// `id == new_parent`, if the move would put `id` inside itself, or if
    /// the existing links are already inconsistent.
    pub fn relocate(&mut self, id: BoxId, new_parent: BoxId) -> Result<()> {
        self.relocate_at(id, new_parent, usize::MAX)
    }

    /// Like [`World::relocate`], but inserts at `index` in the new parent's
    /// here list (clamped to its length).
    ///
    /// # Errors
    ///
    /// As for [`World::relocate`].
    pub fn relocate_at(&mut self, id: BoxId, new_parent: BoxId, index: usize) -> Result<()> {
        const OP: &str = "relocate";

        self.entities()
            .require(id)
            .map_err(|e| e.in_frame(OP))?;
        if id == new_parent {
            return Err(violation(OP, id, ErrorKind::SelfParent(id)));
        }
        if new_parent.is_some() {
            self.entities()
                .require(new_parent)
                .map_err(|e| e.in_frame(OP))?;
            if self.is_inside(id, new_parent)? {
                return Err(violation(
                    OP,
                    id,
                    ErrorKind::ContainmentCycle {
                        entity: id,
                        new_parent,
                    },
                ));
            }
        }

        let old = self.parent(id);
        if old.is_some() && !self.children(old).contains(&id) {
            return Err(violation(
                OP,
                id,
                ErrorKind::NotInParentList {
                    child: id,
                    parent: old,
                },
            ));
        }
        if new_parent.is_some() && new_parent != old && self.children(new_parent).contains(&id) {
            return Err(violation(
                OP,
                id,
                ErrorKind::DuplicateChild {
                    child: id,
                    parent: new_parent,
                },
            ));
        }

        let table = self.entities_mut();
        if old.is_some() {
            table.here_mut(old)?.retain(|c| *c != id);
        }
        if new_parent.is_some() {
            let here = table.here_mut(new_parent)?;
            let at = index.min(here.len());
            here.insert(at, id);
        }
        table.set_location(id, new_parent)?;

        tracing::debug!(
            id = id.get(),
            from = old.get(),
            to = new_parent.get(),
            "relocated"
        );
        Ok(())
    }

    /// Moves `id` to `index` within its current parent's list.
    pub(crate) fn reposition(&mut self, id: BoxId, index: usize) -> Result<()> {
        let parent = self.parent(id);
        let here = self.entities_mut().here_mut(parent)?;
        let Some(from) = here.iter().position(|c| *c == id) else {
            return Err(violation(
                "reposition",
                id,
                ErrorKind::NotInParentList { child: id, parent },
            ));
        };
        here.remove(from);
        let at = index.min(here.len());
        here.insert(at, id);
        Ok(())
    }

    // --- Depth ladder ---

    /// Depth of a location; [`LocDepth::None`] for anything else.
    #[must_use]
    pub fn loc_depth(&self, id: BoxId) -> LocDepth {
        if self.kind(id) == Kind::Loc {
            self.subkind(id).loc_depth()
        } else {
            LocDepth::None
        }
    }

    /// True for locations and ships.
    #[must_use]
    pub fn is_loc_or_ship(&self, id: BoxId) -> bool {
        matches!(self.kind(id), Kind::Loc | Kind::Ship)
    }

    /// Walks `where` from `start` (inclusive) until `stop` holds.
    ///
    /// Returns the sentinel if the walk runs off the top of the graph.
    fn ascend(
        &self,
        operation: &'static str,
        start: BoxId,
        stop: impl Fn(&World, BoxId) -> bool,
    ) -> Result<BoxId> {
        let mut budget = Budget::new(operation, start, self.traversal_limit());
        let mut cur = start;
        while cur.is_some() {
            if stop(self, cur) {
                return Ok(cur);
            }
            budget.step()?;
            cur = self.parent(cur);
        }
        Ok(BoxId::NONE)
    }

    /// Region enclosing `id` (or `id` itself if it is a region).
    ///
    /// # Errors
    ///
    /// Fails if the walk exceeds the traversal limit.
    pub fn region(&self, id: BoxId) -> Result<BoxId> {
        self.ascend("region", id, |w, b| w.loc_depth(b) == LocDepth::Region)
    }

    /// Province enclosing `id` (or `id` itself if it is a province).
    ///
    /// # Errors
    ///
    /// Fails if the walk exceeds the traversal limit.
    pub fn province(&self, id: BoxId) -> Result<BoxId> {
        self.ascend("province", id, |w, b| w.loc_depth(b) == LocDepth::Province)
    }

    /// Nearest enclosing location or ship, skipping any characters `id` is
    /// stacked beneath.
    ///
    /// # Errors
    ///
    /// Fails if the walk exceeds the traversal limit.
    pub fn immediate_location(&self, id: BoxId) -> Result<BoxId> {
        self.ascend("immediate_location", self.parent(id), World::is_loc_or_ship)
    }

    /// Location whose occupants `id` is grouped with for visibility.
    ///
    /// Starts at `id` if it is a location or ship, else at its immediate
    /// location, and steps outward until reaching a province, a region, or
    /// a sub-location whose contents form their own view group.
    ///
    /// # Errors
    ///
    /// Fails if a walk exceeds the traversal limit.
    pub fn view_location(&self, id: BoxId) -> Result<BoxId> {
        let start = if self.is_loc_or_ship(id) {
            id
        } else {
            self.immediate_location(id)?
        };
        self.ascend("view_location", start, |w, b| {
            let depth = w.loc_depth(b);
            depth == LocDepth::Province
                || depth == LocDepth::Region
                || (w.kind(b) == Kind::Loc && w.subkind(b).is_view_boundary())
        })
    }

    // --- Downward traversal ---

    fn collect_below(
        &self,
        operation: &'static str,
        id: BoxId,
        keep: impl Fn(&World, BoxId) -> bool,
    ) -> Result<Vec<BoxId>> {
        let mut budget = Budget::new(operation, id, self.traversal_limit());
        let mut out = Vec::new();
        let mut pending: Vec<BoxId> = self.children(id).iter().rev().copied().collect();

        while let Some(cur) = pending.pop() {
            budget.step()?;
            if keep(self, cur) {
                out.push(cur);
            }
            pending.extend(self.children(cur).iter().rev());
        }
        Ok(out)
    }

    /// Everything nested below `id`, in pre-order.
    ///
    /// # Errors
    ///
    /// Fails if the walk exceeds the traversal limit.
    pub fn descendants(&self, id: BoxId) -> Result<Vec<BoxId>> {
        self.collect_below("descendants", id, |_, _| true)
    }

    /// Every character nested below `id`, in pre-order.
    ///
    /// # Errors
    ///
    /// Fails if the walk exceeds the traversal limit.
    pub fn character_descendants(&self, id: BoxId) -> Result<Vec<BoxId>> {
        self.collect_below("character_descendants", id, |w, b| w.kind(b) == Kind::Char)
    }

    /// True if `descendant` is nested somewhere below `ancestor`.
    ///
    /// False when the two are the same entity.
    ///
    /// # Errors
    ///
    /// Fails if the walk exceeds the traversal limit.
    pub fn is_inside(&self, ancestor: BoxId, descendant: BoxId) -> Result<bool> {
        if ancestor.is_none() || descendant.is_none() || ancestor == descendant {
            return Ok(false);
        }
        let found = self.ascend("is_inside", self.parent(descendant), |_, b| b == ancestor)?;
        Ok(found == ancestor)
    }

    // --- Here-list scans ---

    /// First direct child of the given kind, or the sentinel.
    #[must_use]
    pub fn first_child_of_kind(&self, parent: BoxId, kind: Kind) -> BoxId {
        self.children(parent)
            .iter()
            .copied()
            .find(|c| self.kind(*c) == kind)
            .unwrap_or(BoxId::NONE)
    }

    /// Number of direct children whose subkind is `a` or `b`.
    #[must_use]
    pub fn count_children_matching(&self, parent: BoxId, a: Subkind, b: Subkind) -> usize {
        self.children(parent)
            .iter()
            .filter(|c| {
                let s = self.subkind(**c);
                s == a || s == b
            })
            .count()
    }

    // --- Province exits ---

    /// Province reached by leaving `province` in `dir`, or the sentinel.
    #[must_use]
    pub fn location_direction(&self, province: BoxId, dir: Direction) -> BoxId {
        self.loc_info(province)
            .map_or(BoxId::NONE, |l| l.prov_dest[dir.index()])
    }

    /// Sets the exit of `province` in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if `province` is not live.
    pub fn set_exit(&mut self, province: BoxId, dir: Direction, dest: BoxId) -> Result<()> {
        self.loc_info_mut(province)?.prov_dest[dir.index()] = dest;
        Ok(())
    }

    // --- Audit ---

    /// Checks every parent/child link in the table.
    ///
    /// # Errors
    ///
    /// Returns the first disagreement found between a `where` and a here
    /// list.
    pub fn audit(&self) -> Result<()> {
        const OP: &str = "audit";

        for id in self.entities().iter() {
            let parent = self.parent(id);
            if parent.is_some() && !self.children(parent).contains(&id) {
                return Err(violation(OP, id, ErrorKind::NotInParentList { child: id, parent }));
            }

            let here = self.children(id);
            for (i, child) in here.iter().enumerate() {
                let recorded = self.parent(*child);
                if recorded != id {
                    return Err(violation(
                        OP,
                        *child,
                        ErrorKind::ParentMismatch {
                            child: *child,
                            listed_in: id,
                            recorded,
                        },
                    ));
                }
                if here[..i].contains(child) {
                    return Err(violation(
                        OP,
                        *child,
                        ErrorKind::DuplicateChild {
                            child: *child,
                            parent: id,
                        },
                    ));
                }
            }
        }
        Ok(())
    }
}

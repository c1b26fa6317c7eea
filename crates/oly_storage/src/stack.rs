//! Character stacking.
//!
//! A stack is a chain of characters where each follower's parent is the
//! character it follows. The leader is the first character in the chain
//! whose own parent is not a character. Order within a here list is
//! precedence: a stack's free members come first, its prisoners trail.
//!
//! All moves go through [`World::relocate_at`], so the containment
//! invariant holds after every call here.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use oly_foundation::{BoxId, Error, ErrorKind, Kind, Result};

use crate::budget::Budget;
use crate::extension::LoyaltyKind;
use crate::world::World;

/// Result of a [`World::join`] request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JoinOutcome {
    /// The character now follows the target.
    Joined,
    /// A character cannot follow itself.
    SelfJoin,
    /// Either side is not a character.
    NotACharacter,
    /// Already somewhere beneath the target.
    AlreadyBeneath,
    /// The target is somewhere beneath the joiner.
    TargetBeneath,
    /// Prisoners cannot lead.
    TargetIsPrisoner,
    /// The two are not at the same immediate location.
    NotTogether,
}

impl JoinOutcome {
    /// True for [`JoinOutcome::Joined`].
    #[must_use]
    pub fn is_joined(self) -> bool {
        self == JoinOutcome::Joined
    }
}

/// Result of [`World::take_prisoner`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The victim is now held; carries what happened to its followers.
    Taken(Extraction),
    /// A character cannot hold itself.
    SelfCapture,
    /// Either side is not a character.
    NotACharacter,
    /// Prisoners cannot hold anyone.
    CaptorIsPrisoner,
    /// The victim is already held.
    AlreadyPrisoner,
}

impl CaptureOutcome {
    /// True for [`CaptureOutcome::Taken`].
    #[must_use]
    pub fn is_taken(&self) -> bool {
        matches!(self, CaptureOutcome::Taken(_))
    }

    /// The extraction, if the victim was taken.
    #[must_use]
    pub fn extraction(self) -> Option<Extraction> {
        match self {
            CaptureOutcome::Taken(extraction) => Some(extraction),
            _ => None,
        }
    }
}

/// What [`World::extract`] did with the removed character's followers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Follower that took the removed character's place, or the sentinel.
    pub new_leader: BoxId,
    /// Prisoners set free by the extraction.
    pub escaped: Vec<BoxId>,
}

impl World {
    /// The character `id` is stacked beneath, or the sentinel.
    #[must_use]
    pub fn stack_parent(&self, id: BoxId) -> BoxId {
        let parent = self.parent(id);
        if self.kind(parent) == Kind::Char {
            parent
        } else {
            BoxId::NONE
        }
    }

    /// Top of the stack `id` belongs to; `id` itself when not stacked.
    ///
    /// # Errors
    ///
    /// Fails if the chain exceeds the traversal limit.
    pub fn stack_leader(&self, id: BoxId) -> Result<BoxId> {
        let mut budget = Budget::new("stack_leader", id, self.traversal_limit());
        let mut cur = id;
        loop {
            let up = self.stack_parent(cur);
            if up.is_none() {
                return Ok(cur);
            }
            budget.step()?;
            cur = up;
        }
    }

    /// True if `below` is stacked somewhere beneath `above`.
    ///
    /// # Errors
    ///
    /// Fails if the chain exceeds the traversal limit.
    pub fn is_beneath(&self, above: BoxId, below: BoxId) -> Result<bool> {
        if above.is_none() || above == below {
            return Ok(false);
        }
        let mut budget = Budget::new("is_beneath", below, self.traversal_limit());
        let mut cur = self.stack_parent(below);
        while cur.is_some() {
            if cur == above {
                return Ok(true);
            }
            budget.step()?;
            cur = self.stack_parent(cur);
        }
        Ok(false)
    }

    /// Moves `id` forward to `new_index` in its parent's here list.
    ///
    /// Entries between the two positions shift back by one.
    ///
    /// # Errors
    ///
    /// Fails if `new_index` is behind the current position, or if `id` is
    /// missing from its parent's list.
    pub fn promote(&mut self, id: BoxId, new_index: usize) -> Result<()> {
        let Some(current) = self.here_pos(id) else {
            return Err(Error::new(ErrorKind::NotInParentList {
                child: id,
                parent: self.parent(id),
            })
            .in_frame("promote"));
        };
        if new_index > current {
            return Err(Error::new(ErrorKind::PromoteForward {
                entity: id,
                from: current,
                to: new_index,
            }));
        }
        if new_index < current {
            self.reposition(id, new_index)?;
        }
        Ok(())
    }

    /// Takes `id` out of its stack and puts it at the location level, right
    /// after the leader it was stacked under.
    ///
    /// Clears swear-on-release and turns summoned loyalty into NPC loyalty.
    /// Returns `false` if `id` was not stacked.
    ///
    /// # Errors
    ///
    /// Propagates containment violations.
    pub fn unstack(&mut self, id: BoxId) -> Result<bool> {
        let parent = self.stack_parent(id);
        if parent.is_none() {
            return Ok(false);
        }
        let leader = self.stack_leader(parent)?;
        let location = self.parent(leader);
        let at = self.here_pos(leader).map_or(usize::MAX, |p| p + 1);
        self.relocate_at(id, location, at)?;

        if self.char_info(id).is_some() {
            let info = self.char_info_mut(id)?;
            info.swear_on_release = false;
            if info.loyalty.kind == LoyaltyKind::Summon {
                info.loyalty.kind = LoyaltyKind::Npc;
                info.loyalty.rate = 0;
            }
        }

        tracing::debug!(id = id.get(), leader = leader.get(), "unstacked");
        Ok(true)
    }

    /// Stacks `id` beneath `target`.
    ///
    /// Refusals come back as [`JoinOutcome`] values. On success `id` leaves
    /// any stack it was in, inherits the target's movement, and (unless it
    /// is a prisoner) lands ahead of the target's prisoners.
    ///
    /// # Errors
    ///
    /// Propagates containment violations.
    pub fn join(&mut self, id: BoxId, target: BoxId) -> Result<JoinOutcome> {
        if id == target {
            return Ok(JoinOutcome::SelfJoin);
        }
        if self.kind(id) != Kind::Char || self.kind(target) != Kind::Char {
            return Ok(JoinOutcome::NotACharacter);
        }
        if self.is_beneath(target, id)? {
            return Ok(JoinOutcome::AlreadyBeneath);
        }
        if self.is_prisoner(target) {
            return Ok(JoinOutcome::TargetIsPrisoner);
        }
        if self.immediate_location(id)? != self.immediate_location(target)? {
            return Ok(JoinOutcome::NotTogether);
        }
        if self.is_beneath(id, target)? {
            return Ok(JoinOutcome::TargetBeneath);
        }

        self.unstack(id)?;
        if self.is_prisoner(id) {
            self.relocate(id, target)?;
        } else {
            self.attach_ahead_of_prisoners(id, target)?;
        }

        let moving = self.char_moving(target);
        if moving != self.char_moving(id) {
            self.char_info_mut(id)?.moving = moving;
        }

        tracing::debug!(id = id.get(), target = target.get(), "joined stack");
        Ok(JoinOutcome::Joined)
    }

    /// Puts `id` under `leader`, just before the leader's first prisoner.
    fn attach_ahead_of_prisoners(&mut self, id: BoxId, leader: BoxId) -> Result<()> {
        let at = self
            .children(leader)
            .iter()
            .position(|c| *c != id && self.is_prisoner(*c))
            .unwrap_or(usize::MAX);
        self.relocate_at(id, leader, at)
    }

    /// Removes `id` from the graph without disturbing anyone else's order.
    ///
    /// The first free character following `id` takes its place; the other
    /// free followers restack beneath that one. Prisoners held by `id`
    /// escape to the immediate location, as does anything that is not a
    /// character. `id` ends up detached.
    ///
    /// # Errors
    ///
    /// Propagates containment violations.
    pub fn extract(&mut self, id: BoxId) -> Result<Extraction> {
        let parent = self.parent(id);
        let location = self.immediate_location(id)?;
        let followers = self.children(id).to_vec();

        let new_leader = followers
            .iter()
            .copied()
            .find(|c| self.kind(*c) == Kind::Char && !self.is_prisoner(*c))
            .unwrap_or(BoxId::NONE);

        if new_leader.is_some() {
            let at = self.here_pos(id).unwrap_or(usize::MAX);
            self.relocate_at(new_leader, parent, at)?;
        }

        let mut escaped = Vec::new();
        for child in followers {
            if child == new_leader {
                continue;
            }
            if self.kind(child) != Kind::Char {
                self.relocate(child, location)?;
            } else if self.is_prisoner(child) {
                self.char_info_mut(child)?.prisoner = false;
                self.relocate(child, location)?;
                escaped.push(child);
            } else {
                self.attach_ahead_of_prisoners(child, new_leader)?;
            }
        }

        self.relocate(id, BoxId::NONE)?;

        tracing::debug!(
            id = id.get(),
            new_leader = new_leader.get(),
            escaped = escaped.len(),
            "extracted from stack"
        );
        Ok(Extraction {
            new_leader,
            escaped,
        })
    }

    /// True if `a` comes before `b` in character order at the location
    /// they share.
    ///
    /// # Errors
    ///
    /// Fails if a walk exceeds the traversal limit.
    pub fn promote_after(&self, a: BoxId, b: BoxId) -> Result<bool> {
        let location = self.immediate_location(a)?;
        if location.is_none() || location != self.immediate_location(b)? {
            return Ok(false);
        }
        let order = self.character_descendants(location)?;
        let pos_a = order.iter().position(|c| *c == a);
        let pos_b = order.iter().position(|c| *c == b);
        Ok(matches!((pos_a, pos_b), (Some(x), Some(y)) if x < y))
    }

    // --- Prisoners ---

    /// Makes `victim` a prisoner held by `captor`.
    ///
    /// Refusals come back as [`CaptureOutcome`] values and leave both
    /// untouched. The victim's own followers are handled as by
    /// [`World::extract`].
    ///
    /// # Errors
    ///
    /// Propagates containment violations.
    pub fn take_prisoner(&mut self, captor: BoxId, victim: BoxId) -> Result<CaptureOutcome> {
        if captor == victim {
            return Ok(CaptureOutcome::SelfCapture);
        }
        if self.kind(captor) != Kind::Char || self.kind(victim) != Kind::Char {
            return Ok(CaptureOutcome::NotACharacter);
        }
        if self.is_prisoner(captor) {
            return Ok(CaptureOutcome::CaptorIsPrisoner);
        }
        if self.is_prisoner(victim) {
            return Ok(CaptureOutcome::AlreadyPrisoner);
        }

        let extraction = self.extract(victim)?;
        let info = self.char_info_mut(victim)?;
        info.prisoner = true;
        info.moving = 0;
        self.relocate(victim, captor)?;
        tracing::debug!(captor = captor.get(), victim = victim.get(), "prisoner taken");
        Ok(CaptureOutcome::Taken(extraction))
    }

    /// Frees a prisoner into its captor's location.
    ///
    /// Returns `false` if `id` was not a prisoner.
    ///
    /// # Errors
    ///
    /// Propagates containment violations.
    pub fn release_prisoner(&mut self, id: BoxId) -> Result<bool> {
        if !self.is_prisoner(id) {
            return Ok(false);
        }
        self.char_info_mut(id)?.prisoner = false;
        self.unstack(id)?;
        tracing::debug!(id = id.get(), "prisoner released");
        Ok(true)
    }
}

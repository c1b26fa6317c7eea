//! Hooks into the systems around the core.
//!
//! Narration, skill checks, and randomness live outside this workspace. The
//! rules here reach them through [`Collaborators`] and
//! [`oly_foundation::RandomSource`], bundled per call in [`Services`].

use std::collections::HashSet;

use oly_foundation::{BoxId, RandomSource};
use oly_storage::World;

use crate::config::EngineConfig;

/// Player-facing output and read-only game queries.
///
/// Every method has a default so implementors override only what they use.
pub trait Collaborators {
    /// Sends a narrative message to the player who controls `who`.
    fn report(&mut self, who: BoxId, message: &str) {
        let _ = (who, message);
    }

    /// True if `who` knows `skill`.
    fn has_skill(&self, world: &World, who: BoxId, skill: BoxId) -> bool {
        let _ = (world, who, skill);
        false
    }

    /// Decides whether a character lost at sea makes it to shore.
    ///
    /// Defaults to knowing the configured survival skill.
    fn survives_sinking(&mut self, world: &World, who: BoxId, survival_skill: BoxId) -> bool {
        survival_skill.is_some() && self.has_skill(world, who, survival_skill)
    }
}

/// Collaborators that ignore everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullCollaborators;

impl Collaborators for NullCollaborators {}

/// Collaborators that keep every report and answer skill checks from a set.
#[derive(Clone, Debug, Default)]
pub struct RecordingCollaborators {
    /// Reports in the order they were sent.
    pub reports: Vec<(BoxId, String)>,
    /// `(who, skill)` pairs that [`Collaborators::has_skill`] accepts.
    pub skills: HashSet<(BoxId, BoxId)>,
}

impl RecordingCollaborators {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to grant a skill.
    #[must_use]
    pub fn with_skill(mut self, who: BoxId, skill: BoxId) -> Self {
        self.skills.insert((who, skill));
        self
    }

    /// Reports sent to `who`.
    pub fn reports_to(&self, who: BoxId) -> impl Iterator<Item = &str> {
        self.reports
            .iter()
            .filter(move |(to, _)| *to == who)
            .map(|(_, msg)| msg.as_str())
    }
}

impl Collaborators for RecordingCollaborators {
    fn report(&mut self, who: BoxId, message: &str) {
        self.reports.push((who, message.to_string()));
    }

    fn has_skill(&self, _world: &World, who: BoxId, skill: BoxId) -> bool {
        self.skills.contains(&(who, skill))
    }
}

/// Everything a rule needs besides the world itself.
pub struct Services<'a> {
    /// Tunables.
    pub config: &'a EngineConfig,
    /// Random source.
    pub random: &'a mut dyn RandomSource,
    /// Narration and game queries.
    pub collaborators: &'a mut dyn Collaborators,
}

impl<'a> Services<'a> {
    /// Bundles the services for one call.
    pub fn new(
        config: &'a EngineConfig,
        random: &'a mut dyn RandomSource,
        collaborators: &'a mut dyn Collaborators,
    ) -> Self {
        Self {
            config,
            random,
            collaborators,
        }
    }

    /// Sends a report through the collaborators.
    pub fn report(&mut self, who: BoxId, message: &str) {
        self.collaborators.report(who, message);
    }
}

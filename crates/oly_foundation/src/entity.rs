//! Entity handles.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer handle addressing one slot of the entity table.
///
/// Handles are positive and unique for the lifetime of the entity they
/// name. Handle 0 is the "no entity" sentinel: it is what `where` holds for
/// a detached entity and what every query returns when it finds nothing.
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxId(u32);

impl BoxId {
    /// The "no entity" sentinel.
    pub const NONE: BoxId = BoxId(0);

    /// Creates a handle from its raw number.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw handle number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the handle as a table index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns true if this is the "no entity" sentinel.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Returns true if this names some entity (which may still be deleted).
    #[must_use]
    pub const fn is_some(self) -> bool {
        self.0 != 0
    }

    /// Converts the sentinel into `None`.
    #[must_use]
    pub const fn to_option(self) -> Option<BoxId> {
        if self.is_none() { None } else { Some(self) }
    }
}

impl From<u32> for BoxId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<Option<BoxId>> for BoxId {
    fn from(value: Option<BoxId>) -> Self {
        value.unwrap_or(BoxId::NONE)
    }
}

impl fmt::Debug for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "BoxId(none)")
        } else {
            write!(f, "BoxId({})", self.0)
        }
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

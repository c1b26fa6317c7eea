//! Step budgets for graph walks.
//!
//! Every upward or downward walk over the containment graph charges one
//! step per entity visited. A correct graph is acyclic, so no walk can need
//! more steps than the table holds; running out means a cycle was
//! introduced somewhere and the walk fails with a traversal-limit error.

use oly_foundation::{BoxId, Error, ErrorContext, Result};

/// Remaining steps for one walk.
#[derive(Clone, Debug)]
pub struct Budget {
    operation: &'static str,
    start: BoxId,
    limit: usize,
    used: usize,
}

impl Budget {
    /// Creates a budget of `limit` steps for a walk starting at `start`.
    #[must_use]
    pub fn new(operation: &'static str, start: BoxId, limit: usize) -> Self {
        Self {
            operation,
            start,
            limit,
            used: 0,
        }
    }

    /// Charges one step.
    ///
    /// # Errors
    ///
    /// Returns a traversal-limit error once the budget is spent.
    pub fn step(&mut self) -> Result<()> {
        self.used += 1;
        if self.used > self.limit {
            tracing::error!(
                operation = self.operation,
                start = self.start.get(),
                limit = self.limit,
                "graph walk exceeded its budget; containment cycle suspected"
            );
            return Err(Error::traversal_limit(self.start, self.limit).with_context(
                ErrorContext::new()
                    .with_operation(self.operation)
                    .with_entity(self.start),
            ));
        }
        Ok(())
    }

    /// Steps charged so far.
    #[must_use]
    pub fn used(&self) -> usize {
        self.used
    }
}

// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cooperative cancellation shared by every operator (`spec.md` §5: "each
//! per-partition iterator must honor an `isInterrupted` flag at least
//! between elements").

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use stark_types::StarkError;

/// A cheaply-cloneable flag a collaborator sets to ask in-flight partition
/// tasks to stop. Operators check it at the boundary of every element
/// emission, never mid-element.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// A fresh, not-yet-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation to every clone of this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether [`CancellationToken::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Return [`StarkError::Interrupted`] for `partition_id` if cancelled,
    /// else `Ok(())`. Operators call this between element emissions.
    pub fn check(&self, partition_id: Option<u32>) -> Result<(), StarkError> {
        if self.is_cancelled() {
            Err(StarkError::Interrupted { partition_id })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_token_is_not_cancelled() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        assert!(token.check(Some(3)).is_ok());
    }

    #[test]
    fn cancel_is_visible_to_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
        assert_eq!(token.check(Some(1)), Err(StarkError::Interrupted { partition_id: Some(1) }));
    }
}

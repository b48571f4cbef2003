use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;
use understudy_types::{Invocation, Outcome};

use crate::behavior::{Behavior, Next, TerminalStep};
use crate::error::PipelineError;

/// Immutable view of the behavior list as of one moment.
pub type BehaviorSnapshot = Arc<Vec<Arc<dyn Behavior>>>;

/// An ordered, mutable behavior list and the dispatch fold over it.
///
/// Insertion order is execution order; there is no other priority. The list
/// is copy-on-write: [`BehaviorPipeline::execute`] pins the snapshot current
/// when it starts, so behaviors added or removed meanwhile (from another
/// thread or from inside a running behavior) affect only later calls.
pub struct BehaviorPipeline {
    behaviors: RwLock<BehaviorSnapshot>,
}

impl BehaviorPipeline {
    pub fn new() -> Self {
        Self {
            behaviors: RwLock::new(Arc::new(Vec::new())),
        }
    }

    pub fn with_behaviors(behaviors: impl IntoIterator<Item = Arc<dyn Behavior>>) -> Self {
        Self {
            behaviors: RwLock::new(Arc::new(behaviors.into_iter().collect())),
        }
    }

    /// Append a behavior to the end of the chain.
    ///
    /// Adding the same behavior twice yields two independent entries.
    pub fn add(&self, behavior: Arc<dyn Behavior>) {
        let mut guard = self.behaviors.write();
        debug!(behavior = behavior.name(), position = guard.len(), "behavior added");
        Arc::make_mut(&mut guard).push(behavior);
    }

    /// Insert a behavior at `index`, shifting later ones back.
    pub fn insert(&self, index: usize, behavior: Arc<dyn Behavior>) -> Result<(), PipelineError> {
        let mut guard = self.behaviors.write();
        if index > guard.len() {
            return Err(PipelineError::IndexOutOfRange {
                index,
                len: guard.len(),
            });
        }
        debug!(behavior = behavior.name(), position = index, "behavior inserted");
        Arc::make_mut(&mut guard).insert(index, behavior);
        Ok(())
    }

    /// Remove and return the behavior at `index`.
    pub fn remove(&self, index: usize) -> Result<Arc<dyn Behavior>, PipelineError> {
        let mut guard = self.behaviors.write();
        if index >= guard.len() {
            return Err(PipelineError::IndexOutOfRange {
                index,
                len: guard.len(),
            });
        }
        let removed = Arc::make_mut(&mut guard).remove(index);
        debug!(behavior = removed.name(), position = index, "behavior removed");
        Ok(removed)
    }

    /// Remove every entry that is the same object as `behavior`.
    /// Returns how many entries were removed.
    pub fn remove_all(&self, behavior: &Arc<dyn Behavior>) -> usize {
        let mut guard = self.behaviors.write();
        let before = guard.len();
        Arc::make_mut(&mut guard).retain(|b| !Arc::ptr_eq(b, behavior));
        before - guard.len()
    }

    pub fn clear(&self) {
        *self.behaviors.write() = Arc::new(Vec::new());
    }

    pub fn len(&self) -> usize {
        self.behaviors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.read().is_empty()
    }

    /// The behavior list as it stands now.
    pub fn snapshot(&self) -> BehaviorSnapshot {
        Arc::clone(&self.behaviors.read())
    }

    /// Display labels in chain order.
    pub fn names(&self) -> Vec<String> {
        self.snapshot().iter().map(|b| b.name().to_string()).collect()
    }

    /// Run `invocation` through the chain, ending at `terminal`.
    ///
    /// The outcome is whatever the first applicable behavior that does not
    /// delegate produced (or the terminal step's), passed back through any
    /// delegating behaviors ahead of it.
    pub fn execute(&self, invocation: &mut Invocation, terminal: &dyn TerminalStep) -> Outcome {
        let snapshot = self.snapshot();
        debug!(
            member = %invocation.method().qualified_name(),
            target = %invocation.target(),
            behaviors = snapshot.len(),
            "dispatching invocation"
        );
        let outcome = Next::new(&snapshot, terminal).run(invocation);
        if let Some(failure) = outcome.failure() {
            debug!(
                member = %invocation.method().qualified_name(),
                error = %failure,
                "invocation failed"
            );
        }
        outcome
    }
}

impl Default for BehaviorPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BehaviorPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorPipeline")
            .field("behaviors", &self.names())
            .finish()
    }
}

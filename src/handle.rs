use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::RuleIndex;

/// Shared slot holding the currently published [`RuleIndex`].
///
/// Readers take a snapshot with [`load`](Self::load) and resolve against it
/// without locking. Reloading compiles a fresh index and
/// [`publish`](Self::publish)es it with an atomic swap; snapshots already
/// handed out stay valid and unchanged, and the old index is dropped once the
/// last of them goes away.
#[derive(Debug)]
pub struct IndexHandle {
    current: ArcSwap<RuleIndex>,
}

impl IndexHandle {
    #[must_use]
    pub fn new(index: RuleIndex) -> Self {
        Self {
            current: ArcSwap::from_pointee(index),
        }
    }

    /// The currently published index (lock-free read).
    #[must_use]
    pub fn load(&self) -> Arc<RuleIndex> {
        self.current.load_full()
    }

    /// Replace the published index, returning the previous one.
    pub fn publish(&self, index: RuleIndex) -> Arc<RuleIndex> {
        let next = Arc::new(index);
        let current = next.len();
        let previous = self.current.swap(next);
        tracing::debug!(
            previous = previous.len(),
            current,
            "published rule index"
        );
        previous
    }
}

impl From<RuleIndex> for IndexHandle {
    fn from(index: RuleIndex) -> Self {
        Self::new(index)
    }
}

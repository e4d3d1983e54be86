//! Unit of work handed to the pool.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

static WORK_ITEM_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a work item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkItemId(u64);

impl WorkItemId {
    fn next() -> Self {
        WorkItemId(WORK_ITEM_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Heap-owned callable with everything it captured.
///
/// Owned by the queue until a worker claims it, then consumed by `execute`.
pub struct WorkItem {
    pub(crate) id: WorkItemId,
    func: Box<dyn FnOnce() + Send + 'static>,
    pub(crate) spawn_time: Instant,
}

impl WorkItem {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        WorkItem {
            id: WorkItemId::next(),
            func: Box::new(f),
            spawn_time: Instant::now(),
        }
    }

    pub fn id(&self) -> WorkItemId {
        self.id
    }

    pub fn execute(self) {
        (self.func)();
    }
}

impl std::fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkItem")
            .field("id", &self.id)
            .field("spawn_time", &self.spawn_time)
            .finish()
    }
}

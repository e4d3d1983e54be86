// worker thread loop
use super::panic_handler::PanicHandler;
use super::queue::NotificationQueue;
use super::task::WorkItem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

pub type WorkerId = usize;

// stats for each worker
#[derive(Debug, Default)]
pub struct WorkerState {
    pub tasks_executed: AtomicU64,
    pub tasks_panicked: AtomicU64,
    pub busy_time_ns: AtomicU64,
}

#[derive(Debug)]
pub(crate) struct Worker {
    pub id: WorkerId,
    pub state: Arc<WorkerState>,
    panic_handler: Arc<PanicHandler>,
}

impl Worker {
    pub fn new(id: WorkerId, panic_handler: Arc<PanicHandler>) -> Self {
        Self {
            id,
            state: Arc::new(WorkerState::default()),
            panic_handler,
        }
    }

    // main loop: pop until the queue is shut down and drained
    pub fn run(&self, queue: Arc<NotificationQueue<WorkItem>>) {
        tracing::trace!(worker = self.id, "worker started");

        while let Some(item) = queue.pop() {
            self.execute_item(item);
        }

        tracing::trace!(worker = self.id, "worker exiting");
    }

    fn execute_item(&self, item: WorkItem) {
        let id = item.id();
        let start = Instant::now();
        let queued_ns = start.duration_since(item.spawn_time).as_nanos() as u64;

        let result = self.panic_handler.execute(|| item.execute());

        let duration_ns = start.elapsed().as_nanos() as u64;
        self.state
            .busy_time_ns
            .fetch_add(duration_ns, Ordering::Relaxed);
        self.state.tasks_executed.fetch_add(1, Ordering::Relaxed);

        if result.is_err() {
            self.state.tasks_panicked.fetch_add(1, Ordering::Relaxed);
        }

        tracing::trace!(
            worker = self.id,
            item = ?id,
            queued_ns,
            duration_ns,
            "work item finished"
        );
    }
}

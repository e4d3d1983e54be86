use super::panic_handler::PanicHandler;
use super::queue::NotificationQueue;
use super::task::WorkItem;
use super::worker::{Worker, WorkerId, WorkerState};
use crate::config::Config;
use crate::error::{Error, Result};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Fixed set of OS threads draining one shared [`NotificationQueue`].
///
/// Threads start in [`WorkerPool::new`]. Dropping the pool shuts the queue
/// down and joins every worker, so all work enqueued before teardown runs to
/// completion.
pub struct WorkerPool {
    workers: Vec<WorkerHandle>,
    queue: Arc<NotificationQueue<WorkItem>>,
    panic_handler: Arc<PanicHandler>,
    num_threads: usize,
}

struct WorkerHandle {
    id: WorkerId,
    thread: Option<JoinHandle<()>>,
    state: Arc<WorkerState>,
}

/// Aggregated worker counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub tasks_executed: u64,
    pub tasks_panicked: u64,
    pub busy_time: Duration,
}

impl WorkerPool {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let num_threads = config.worker_threads();

        let queue = Arc::new(NotificationQueue::new());
        let panic_handler = Arc::new(PanicHandler::new(config.panic_strategy));
        let mut workers: Vec<WorkerHandle> = Vec::with_capacity(num_threads);

        for id in 0..num_threads {
            let worker = Worker::new(id, panic_handler.clone());
            let state = worker.state.clone();
            let queue_clone = queue.clone();
            let name = format!("{}-{}", config.thread_name_prefix, id);

            let mut builder = thread::Builder::new().name(name);

            if let Some(stack_size) = config.stack_size {
                builder = builder.stack_size(stack_size);
            }

            match builder.spawn(move || worker.run(queue_clone)) {
                Ok(thread) => workers.push(WorkerHandle {
                    id,
                    thread: Some(thread),
                    state,
                }),
                Err(e) => {
                    // tear down whatever already started
                    queue.shutdown();
                    for handle in &mut workers {
                        if let Some(thread) = handle.thread.take() {
                            let _ = thread.join();
                        }
                    }
                    return Err(Error::executor(format!("spawn failed: {}", e)));
                }
            }
        }

        tracing::debug!(
            threads = num_threads,
            prefix = %config.thread_name_prefix,
            "worker pool started"
        );

        Ok(Self {
            workers,
            queue,
            panic_handler,
            num_threads,
        })
    }

    /// Pool with the default config and detected concurrency.
    pub fn with_default_threads() -> Result<Self> {
        Self::new(&Config::default())
    }

    /// Enqueue a work item. Never inspects its result.
    pub fn run(&self, item: WorkItem) {
        self.queue.push(item);
    }

    pub fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.run(WorkItem::new(f));
    }

    pub(crate) fn queue(&self) -> &Arc<NotificationQueue<WorkItem>> {
        &self.queue
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    pub fn pending_items(&self) -> usize {
        self.queue.len()
    }

    pub fn stats(&self) -> PoolStats {
        let mut stats = PoolStats::default();
        let mut busy_ns = 0u64;
        for worker in &self.workers {
            stats.tasks_executed += worker.state.tasks_executed.load(Ordering::Relaxed);
            stats.tasks_panicked += worker.state.tasks_panicked.load(Ordering::Relaxed);
            busy_ns += worker.state.busy_time_ns.load(Ordering::Relaxed);
        }
        stats.busy_time = Duration::from_nanos(busy_ns);
        stats
    }

    pub fn panic_count(&self) -> usize {
        self.panic_handler.panic_count()
    }

    fn shutdown(&mut self) {
        if self.workers.iter().all(|w| w.thread.is_none()) {
            return;
        }

        self.queue.shutdown();

        let current = thread::current().id();
        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                if thread.thread().id() == current {
                    tracing::warn!(worker = worker.id, "pool dropped on its own worker, not joining it");
                    continue;
                }
                let _ = thread.join();
            }
        }

        tracing::debug!(threads = self.num_threads, "worker pool shut down");
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("num_threads", &self.num_threads)
            .field("pending_items", &self.pending_items())
            .finish()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

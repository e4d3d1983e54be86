//! Entry points that run a whole graph.

use super::callable::Callable;
use super::node::Node;
use super::value::{IntoValues, Values};
use crate::error::{Error, Result};
use crate::executor::panic_handler::catch_panic;
use crate::executor::{promise, RunnerHandle, TaskFuture};
use crate::util::ManualEvent;
use parking_lot::Mutex;
use std::sync::Arc;

// Notifies the finish event when dropped, whether or not the final
// continuation ever ran.
struct FinishGuard(Arc<ManualEvent>);

impl Drop for FinishGuard {
    fn drop(&mut self) {
        self.0.notify();
    }
}

/// Execute `root` with `args` and block until `continuation` has consumed
/// its results.
///
/// The first node runs on the calling thread. `continuation` only runs when
/// the whole graph succeeded; any failure is returned instead, so a
/// panicking node never leaves the caller hanging.
///
/// Calling this from a pool worker can deadlock if the pool has no other
/// free thread.
pub fn sync_execute<R, C, M, A>(runner: &R, root: &Node, continuation: C, args: A) -> Result<()>
where
    R: AsRef<RunnerHandle> + ?Sized,
    C: Callable<M>,
    A: IntoValues,
{
    root.input_schema().expect(&A::schema())?;
    continuation.input_schema().expect(root.output_schema())?;

    let event = Arc::new(ManualEvent::new());
    let slot = Arc::new(Mutex::new(None::<Result<()>>));

    let guard = FinishGuard(event.clone());
    let sink = slot.clone();
    root.execute(
        runner.as_ref(),
        Box::new(move |outcome| {
            let _guard = guard;
            let result = outcome.and_then(|values| {
                catch_panic(|| continuation.call(values))
                    .map_err(Error::from)
                    .and_then(|called| called)
                    .map(drop)
            });
            *sink.lock() = Some(result);
        }),
        args.into_values(),
    );
    event.wait();

    let result = slot.lock().take();
    tracing::trace!(ok = matches!(result, Some(Ok(()))), "graph finished");
    result.unwrap_or(Err(Error::Disconnected))
}

/// Submit `root` with `args` as one unit of work and return a future of its
/// results without blocking.
///
/// Failures, including an argument schema mismatch, surface through the
/// future.
pub fn async_execute<R, A>(runner: &R, root: &Node, args: A) -> TaskFuture<Values>
where
    R: AsRef<RunnerHandle> + ?Sized,
    A: IntoValues,
{
    let (promise, future) = promise();

    if let Err(err) = root.input_schema().expect(&A::schema()) {
        promise.set_error(err);
        return future;
    }

    let handle = runner.as_ref().clone();
    let root = root.clone();
    let args = args.into_values();
    runner.as_ref().run(move || {
        root.execute(&handle, Box::new(move |outcome| promise.set(outcome)), args);
    });

    future
}

//! Fan-out/fan-in node.
//!
//! Every branch is submitted to the runner as its own unit of work with a
//! copy of the input. Branches write their results into disjoint slots of a
//! per-execution [`CompletionState`] and then decrement a shared counter.
//! Whichever branch takes the counter to zero gathers the slots in
//! declaration order and calls the continuation.

use super::node::{Continuation, GraphNode, Node, Outcome};
use super::value::{Schema, Value, Values};
use crate::error::{Error, Result};
use crate::executor::RunnerHandle;
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Node running sibling nodes concurrently on the same input.
///
/// Output is the concatenation of the branches' outputs in declaration
/// order; branches that produce nothing contribute nothing.
#[derive(Debug)]
pub struct ParallelAll {
    branches: Vec<Node>,
    // index of each branch's first result within the gathered output
    offsets: Vec<usize>,
    output: Schema,
}

impl ParallelAll {
    /// Needs at least one branch, and all branches must take the same input.
    pub fn new(branches: Vec<Node>) -> Result<Self> {
        let first = branches.first().ok_or(Error::EmptyParallel)?;
        let input = first.input_schema();

        let mut offsets = Vec::with_capacity(branches.len());
        let mut output = Schema::empty();
        for branch in &branches {
            input.expect(branch.input_schema())?;
            offsets.push(output.len());
            output = output.concat(branch.output_schema());
        }

        Ok(Self {
            branches,
            offsets,
            output,
        })
    }

    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }
}

impl GraphNode for ParallelAll {
    fn input_schema(&self) -> &Schema {
        self.branches[0].input_schema()
    }

    fn output_schema(&self) -> &Schema {
        &self.output
    }

    fn execute(&self, runner: &RunnerHandle, then: Continuation, args: Values) {
        let state = Arc::new(CompletionState::new(
            self.branches.len(),
            self.output.len(),
            then,
        ));

        for (index, branch) in self.branches.iter().enumerate() {
            let branch = branch.clone();
            let state = state.clone();
            let handle = runner.clone();
            let args = args.clone();
            let offset = self.offsets[index];
            let arity = branch.output_schema().len();

            runner.run(move || {
                branch.execute(
                    &handle,
                    Box::new(move |outcome| state.complete(index, offset, arity, outcome)),
                    args,
                );
            });
        }
    }

    fn label(&self) -> &'static str {
        "parallel_all"
    }
}

/// Cell written by exactly one branch and read only by the finishing one.
struct Slot<T>(UnsafeCell<T>);

// SAFETY: each slot has a single writer (the branch owning it) and a single
// reader (the branch observing the zero transition). The AcqRel decrement on
// `remaining` orders every write before that read.
unsafe impl<T: Send> Sync for Slot<T> {}

impl<T: Default> Slot<T> {
    fn new(value: T) -> Self {
        Self(UnsafeCell::new(value))
    }

    /// # Safety
    ///
    /// No other thread may access this slot concurrently.
    unsafe fn put(&self, value: T) {
        *self.0.get() = value;
    }

    /// # Safety
    ///
    /// No other thread may access this slot concurrently.
    unsafe fn take(&self) -> T {
        std::mem::take(&mut *self.0.get())
    }
}

/// Per-execution record shared by the branches of one [`ParallelAll`] run.
struct CompletionState {
    remaining: AtomicUsize,
    results: Box<[Slot<Option<Value>>]>,
    failures: Box<[Slot<Option<Error>>]>,
    then: Slot<Option<Continuation>>,
}

impl CompletionState {
    fn new(branches: usize, results: usize, then: Continuation) -> Self {
        Self {
            remaining: AtomicUsize::new(branches),
            results: (0..results).map(|_| Slot::new(None)).collect(),
            failures: (0..branches).map(|_| Slot::new(None)).collect(),
            then: Slot::new(Some(then)),
        }
    }

    /// Record branch `index`'s outcome; the last branch in finishes the run.
    fn complete(&self, index: usize, offset: usize, arity: usize, outcome: Outcome) {
        match outcome {
            Ok(values) if values.len() == arity => {
                for (i, value) in values.into_iter().enumerate() {
                    // SAFETY: slots offset..offset + arity belong to this branch
                    // alone, and it completes exactly once.
                    unsafe { self.results[offset + i].put(Some(value)) };
                }
            }
            Ok(values) => {
                let err = Error::executor(format!(
                    "branch {} produced {} values, expected {}",
                    index,
                    values.len(),
                    arity
                ));
                // SAFETY: failure slot `index` belongs to this branch alone.
                unsafe { self.failures[index].put(Some(err)) };
            }
            Err(err) => {
                // SAFETY: as above.
                unsafe { self.failures[index].put(Some(err)) };
            }
        }

        if self.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.finish();
        }
    }

    fn finish(&self) {
        // SAFETY: every branch has decremented `remaining`, so no writer is
        // left and this thread is the only one to reach here.
        let then = match unsafe { self.then.take() } {
            Some(then) => then,
            None => return,
        };

        let failure = self
            .failures
            .iter()
            .find_map(|slot| unsafe { slot.take() });
        if let Some(err) = failure {
            then(Err(err));
            return;
        }

        let values: Values = self
            .results
            .iter()
            .filter_map(|slot| unsafe { slot.take() })
            .collect();
        then(Ok(values));
    }
}

use super::callable::Callable;
use super::node::{Continuation, GraphNode};
use super::value::{Schema, Values};
use crate::error::{Error, Result};
use crate::executor::panic_handler::catch_panic;
use crate::executor::RunnerHandle;

type Body = Box<dyn Fn(Values) -> Result<Values> + Send + Sync>;

/// Node wrapping one callable.
///
/// Runs inline on whichever thread executes it and introduces no
/// concurrency of its own. A panic in the body becomes
/// [`Error::TaskPanicked`] for the continuation.
pub struct Leaf {
    body: Body,
    input: Schema,
    output: Schema,
}

impl Leaf {
    pub fn new<F, M>(f: F) -> Self
    where
        F: Callable<M>,
        M: 'static,
    {
        let input = f.input_schema();
        let output = f.output_schema();
        Self {
            body: Box::new(move |args| f.call(args)),
            input,
            output,
        }
    }
}

impl std::fmt::Debug for Leaf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Leaf")
            .field("input", &self.input)
            .field("output", &self.output)
            .finish()
    }
}

impl GraphNode for Leaf {
    fn input_schema(&self) -> &Schema {
        &self.input
    }

    fn output_schema(&self) -> &Schema {
        &self.output
    }

    fn execute(&self, _runner: &RunnerHandle, then: Continuation, args: Values) {
        let outcome = catch_panic(|| (self.body)(args))
            .map_err(Error::from)
            .and_then(|result| result);
        then(outcome);
    }

    fn label(&self) -> &'static str {
        "leaf"
    }
}

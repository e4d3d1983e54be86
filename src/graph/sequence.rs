use super::node::{Continuation, GraphNode, Node};
use super::value::{Schema, Values};
use crate::error::Result;
use crate::executor::RunnerHandle;

/// Node running `first`, then `second` with whatever `first` produced.
///
/// A failure in `first` skips `second` and goes straight to the
/// continuation.
#[derive(Debug)]
pub struct Sequence {
    first: Node,
    second: Node,
}

impl Sequence {
    /// Fails with a schema mismatch unless `first`'s output is exactly
    /// `second`'s input.
    pub fn new(first: Node, second: Node) -> Result<Self> {
        second.input_schema().expect(first.output_schema())?;
        Ok(Self { first, second })
    }
}

impl GraphNode for Sequence {
    fn input_schema(&self) -> &Schema {
        self.first.input_schema()
    }

    fn output_schema(&self) -> &Schema {
        self.second.output_schema()
    }

    fn execute(&self, runner: &RunnerHandle, then: Continuation, args: Values) {
        let second = self.second.clone();
        let handle = runner.clone();
        self.first.execute(
            runner,
            Box::new(move |outcome| match outcome {
                Ok(values) => second.execute(&handle, then, values),
                Err(err) => then(Err(err)),
            }),
            args,
        );
    }

    fn label(&self) -> &'static str {
        "sequence"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::executor::TaskRunner;
    use crate::graph::{leaf, Outcome};
    use crate::graph::value::IntoValues;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_threads_results_forward() {
        let runner = TaskRunner::with_threads(1).unwrap();
        let node = Sequence::new(leaf(|a: i32, b: i32| a + b), leaf(|s: i32| s * 10)).unwrap();
        let slot = Arc::new(Mutex::new(None::<Outcome>));
        let sink = slot.clone();

        node.execute(
            runner.handle(),
            Box::new(move |outcome| *sink.lock() = Some(outcome)),
            (2, 3).into_values(),
        );

        let values = slot.lock().take().unwrap().unwrap();
        assert_eq!(values.into_single::<i32>().unwrap(), 50);
    }

    fn fail() {
        panic!("first")
    }

    #[test]
    fn test_failure_skips_second() {
        let runner = TaskRunner::with_threads(1).unwrap();
        let ran = Arc::new(Mutex::new(false));
        let flag = ran.clone();
        let node = Sequence::new(
            leaf(fail),
            leaf(move || *flag.lock() = true),
        )
        .unwrap();
        let slot = Arc::new(Mutex::new(None::<Outcome>));
        let sink = slot.clone();

        node.execute(
            runner.handle(),
            Box::new(move |outcome| *sink.lock() = Some(outcome)),
            Values::new(),
        );

        assert!(matches!(slot.lock().take(), Some(Err(Error::TaskPanicked(_)))));
        assert!(!*ran.lock());
    }

    #[test]
    fn test_rejects_mismatched_schema() {
        let result = Sequence::new(leaf(|| 1u8), leaf(|x: u16| x));
        assert!(result.is_err());
    }
}

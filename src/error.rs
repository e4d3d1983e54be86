use crate::graph::Schema;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("executor error: {0}")]
    Executor(String),

    #[error("task panicked: {0}")]
    TaskPanicked(String),

    #[error("schema mismatch: expected {expected}, found {found}")]
    SchemaMismatch { expected: Schema, found: Schema },

    #[error("when_all needs at least one branch")]
    EmptyParallel,

    #[error("promise dropped without a value")]
    Disconnected,
}

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub fn executor<S: Into<String>>(msg: S) -> Self {
        Error::Executor(msg.into())
    }

    pub(crate) fn schema_mismatch(expected: &Schema, found: &Schema) -> Self {
        Error::SchemaMismatch {
            expected: expected.clone(),
            found: found.clone(),
        }
    }
}

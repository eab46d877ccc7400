use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by the client. All but `Executor` are raised before any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid sample count {0:?}: expected a positive integer")]
    InvalidSampleCount(String),
    #[error("invalid call: unknown statistic kind {0:?}")]
    InvalidRequestKind(String),
    #[error("parameter id {0:?} is not a resolved dotted numeric identifier")]
    UnresolvedParameterId(String),
    #[error("no parameter named {0:?} in the catalog")]
    UnknownParameter(String),
    #[error("parameter {0:?} is write-only")]
    NotReadable(String),
    #[error("parameter {0:?} is read-only")]
    NotWritable(String),
    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

/// Failure of a single request as reported by an [`Executor`](crate::executor::Executor).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("timeout waiting for {target}")]
    Timeout { target: String },
    #[error("no such object: {0}")]
    NoSuchObject(String),
    #[error("{tool} exited with {status}: {stderr}")]
    Command {
        tool: String,
        status: String,
        stderr: String,
    },
    #[error("unparseable response {0:?}")]
    Unparseable(String),
    #[error("failed to run {tool}: {reason}")]
    Spawn { tool: String, reason: String },
    #[error("{0} not found in PATH")]
    ToolNotFound(String),
}

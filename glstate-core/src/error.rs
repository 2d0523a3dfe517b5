/// Error types shared by the transform and logging halves of the library
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::matrix::MatrixType;

/// Failures raised by transform state assignment, derivation and stacking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransformError {
    /// A matrix of the wrong kind or precision was assigned to a slot.
    #[error("{slot}: expected {expected}, found {found}")]
    TypeMismatch {
        slot: &'static str,
        expected: MatrixType,
        found: MatrixType,
    },
    /// A derived matrix was read before its inputs were set.
    #[error("unable to compute {slot}: {missing} is not set")]
    MissingPrerequisite {
        slot: &'static str,
        missing: &'static str,
    },
    #[error("state stack underflow")]
    StackUnderflow,
}

/// Failures raised while loading log sources or formatting calls
#[derive(Debug, Error)]
pub enum LogError {
    #[error("command name is empty")]
    EmptyCommandName,
    #[error("header line {line}: {message}")]
    Header { line: usize, message: String },
    #[error("log map line {line}: {message}")]
    LogMap { line: usize, message: String },
    #[error("unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

//! Error types for graph I/O, text import, and solver runs.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for graph import/export.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Failures while importing or exporting a graph.
#[derive(Error, Debug)]
pub enum GraphError {
    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// The failing path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Export target exists and overwriting was not requested.
    #[error("refusing to overwrite existing file {}", .path.display())]
    AlreadyExists {
        /// The existing path.
        path: PathBuf,
    },

    /// The graph description text is malformed.
    #[error(transparent)]
    Dot(#[from] DotError),
}

/// Malformed graph description text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DotError {
    /// Input does not start with `graph {` or `digraph {`.
    #[error("expected `graph {{` or `digraph {{` header")]
    MissingHeader,

    /// The closing `}` is missing.
    #[error("graph body is not terminated by `}}`")]
    UnterminatedBody,

    /// A vertex id could not be parsed into the vertex type.
    #[error("line {line}: invalid vertex id {token:?}")]
    InvalidVertex {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },

    /// An attribute list is not of the form `[key=value, ...]`.
    #[error("line {line}: malformed attribute list {text:?}")]
    InvalidAttribute {
        /// 1-based line number.
        line: usize,
        /// Offending text.
        text: String,
    },

    /// A `weight` attribute is not a number.
    #[error("line {line}: invalid weight {value:?}")]
    InvalidWeight {
        /// 1-based line number.
        line: usize,
        /// Offending value.
        value: String,
    },

    /// An edge connector has no vertex on one side, or uses the wrong arrow for the graph type.
    #[error("line {line}: malformed edge statement")]
    DanglingConnector {
        /// 1-based line number.
        line: usize,
    },
}

/// Outcomes of a solver run that produce no usable answer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    /// The run was cancelled; in-flight work was discarded.
    #[error("search was cancelled")]
    Cancelled,

    /// An inclusion vector does not match the graph size.
    #[error("inclusion vector has length {got}, graph has {expected} vertices")]
    LengthMismatch {
        /// Graph size.
        expected: usize,
        /// Supplied length.
        got: usize,
    },
}

//! Crate-level error type and `Result` alias.
//! Covers launching the external tagger, its exit status, decoding of its
//! output lines, and the I/O plumbing around them.
use std::process::ExitStatus;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Tagger not found: could not launch `{command}`: {source}")]
    ToolNotFound {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Tagger `{command}` exited abnormally: {status}")]
    ToolInvocation { command: String, status: ExitStatus },

    #[error("Malformed tagger output at line {line_number}: {reason} in {line:?}")]
    MalformedLine {
        line_number: usize,
        line: String,
        reason: String,
    },

    #[error("Invalid tagger command {command:?}: {reason}")]
    InvalidCommand { command: String, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Tagger `{command}` timed out after {secs}s")]
    Timeout { command: String, secs: u64 },

    #[error("Tagger `{command}` was cancelled")]
    Cancelled { command: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

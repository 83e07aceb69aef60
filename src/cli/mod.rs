//! Command Line Interface (CLI) layer for arktag.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for the `tag` and `check`
//! subcommands. It wires user-provided options to the library API exposed
//! via `arktag::api`.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;

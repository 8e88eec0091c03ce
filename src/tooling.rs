//! Tooling & Integration Layer
//!
//! Host-facing surfaces built on the engine: the command-line interface.

pub mod cli;

pub use cli::{Cli, CliContext, Commands, SourceArgs};

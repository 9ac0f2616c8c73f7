//! Common utilities shared across CLI commands.

pub mod error;
pub mod input;
pub mod vars;

pub use error::CliResult;

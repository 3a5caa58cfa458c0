//! Tool execution utilities

pub mod run;

pub use run::{execute_command, CommandOptions, CommandResult};

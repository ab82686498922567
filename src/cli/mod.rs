//! CLI argument parsing and command handling.

mod args;
pub mod help;

pub use args::{ClassifyArgs, Cli, Command, ConfigAction, GlobalArgs, PostArgs, SearchArgs};

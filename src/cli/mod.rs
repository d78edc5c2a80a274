//! Command-line interface module.

mod args;
pub mod build;
pub mod lookup;

pub use args::{BuildArgs, Cli, Commands};

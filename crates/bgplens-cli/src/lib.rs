mod args;
pub mod config;
pub mod console;
pub mod render;
mod run;

pub use args::{Cli, OptionArg, parse, print_usage};
pub use run::run;

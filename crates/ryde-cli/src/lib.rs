#![warn(unused_crate_dependencies)]

pub mod cli;
pub mod command;
pub mod repl;
pub mod tracing;

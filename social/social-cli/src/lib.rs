//! Library for the social CLI: command handlers, output helpers and the demo
//! walkthrough.

pub mod commands;
pub mod demo;
pub mod output;

pub use output::OutputFormat;

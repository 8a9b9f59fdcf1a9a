//! Keeps ad campaign tracking custom parameters and final URL suffixes
//! in sync with campaign names.

pub mod ads;
pub mod cli_args;
pub mod processor;
pub mod sanitize;
pub mod settings;
pub mod tracker;

pub use processor::{run, RunStats};
pub use settings::Settings;

//! # feaform
//!
//! Command-line front end of the feaform materialization engine.
//!
//! - [`cli`]: clap argument structure and command implementations
//! - [`config`]: TOML configuration with flag overrides

pub mod cli;
pub mod config;

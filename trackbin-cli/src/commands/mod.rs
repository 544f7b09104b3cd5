//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`add`] - Bin decoded track tables into a TAG database
//! - [`get`] - Track and bin queries by column presence
//! - [`info`] - TAG configuration and database statistics
//! - [`init`] - TAG configuration creation
//! - [`pairs`] - Candidate crossover pairs

pub mod add;
pub mod common;
pub mod get;
pub mod info;
pub mod init;
pub mod pairs;

//! # reconguard-cli
//!
//! Command-line interface for the ReconGuard gateway.
//!
//! ## Commands
//!
//! - **serve**: run the HTTP gateway
//! - **targets**: add, remove and list entries of the general registry
//! - **check**: show how the gate would treat a target at each tier

pub mod cli;
pub mod output;

pub use cli::run;

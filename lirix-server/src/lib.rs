//! Web front end for Lirix.
//!
//! This crate focuses on:
//! - The axum router and its four pages
//! - maud HTML views over `lirix-core` records
//! - Logging setup and the `lirix` command line

pub mod cli;
pub mod logging;
pub mod routes;
pub mod startup;
pub mod templates;

pub use startup::{AppState, app, serve};

//! Binary crate for the `lirix` weather front end.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Serving the web pages
//! - Interactive configuration

use clap::Parser;
use lirix_server::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = Cli::parse();
    cmd.run().await
}

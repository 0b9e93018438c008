//! LocalSEO router
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!   Client Request     │  ┌──────────┐   ┌───────────┐   ┌──────────┐ │
//!   ───────────────────┼─▶│ redirect │──▶│   route   │──▶│  render  │ │
//!                      │  │  table   │   │ resolver  │   │  (HTML)  │ │
//!                      │  └────┬─────┘   └─────┬─────┘   └──────────┘ │
//!                      │       │               │                      │
//!                      │       ▼               ▼                      │
//!                      │  ┌────────────────────────────┐              │
//!                      │  │  SQLite (pages, redirects) │◀── admin API │
//!                      │  └────────────────────────────┘     + AI     │
//!                      └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "localseo-router")]
#[command(about = "Virtual local landing pages served from a page table", long_about = None)]
struct Args {
    /// Path to the TOML config file. Defaults are used when omitted.
    #[arg(short, long, env = "LOCALSEO_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    localseo_router::lifecycle::run(args.config).await?;
    Ok(())
}

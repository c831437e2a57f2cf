//! puppetdb-stencil CLI entry point
//!
//! This is the main executable for puppetdb-stencil. It handles command-line
//! argument parsing, error display, and the per-resource-type render loop.
//!
//! The tool queries exported resources from PuppetDB and renders them into
//! monitoring-system configuration blocks, one Tera template per resource
//! type. All rendered output goes to standard output; diagnostics go to
//! standard error.

use anyhow::Result;
use clap::Parser;
use puppetdb_stencil::cli;
use puppetdb_stencil::core::error::user_friendly_error;

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Execute the render loop
    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            // Convert to user-friendly error with context and suggestions
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}

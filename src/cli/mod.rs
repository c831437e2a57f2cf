//! Command-line interface for puppetdb-stencil
//!
//! One invocation renders one batch: for each requested resource type the
//! tool resolves a template, queries PuppetDB once, and prints the rendered
//! block to standard output. There are no subcommands; the binary is a
//! single-purpose batch filter in the Unix tradition.
//!
//! # Examples
//!
//! ```bash
//! # Render hosts with ./nagios_host.tera
//! puppetdb-stencil nagios_host
//!
//! # Several types, an explicit fallback template, debug diagnostics
//! puppetdb-stencil nagios_host nagios_service -t fallback.tera --debug
//!
//! # Cross-site run against a remote PuppetDB
//! puppetdb-stencil nagios_service -H puppetdb.example.net -l false
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::puppetdb::Database;
use crate::stencil;
use crate::templating::TemplateConfig;

/// Main CLI structure for puppetdb-stencil.
#[derive(Parser, Debug)]
#[command(
    name = "puppetdb-stencil",
    about = "Render PuppetDB exported resources into monitoring configuration",
    version,
    long_about = "puppetdb-stencil queries exported resources from PuppetDB and renders \
                  them into monitoring-system configuration blocks using one Tera \
                  template per resource type."
)]
pub struct Cli {
    /// Resource types to render, e.g. `nagios_host nagios_service`.
    ///
    /// Each type is rendered with the first template that resolves from
    /// `<resource_type>.tera` followed by the `--templates` names, searched
    /// in the current directory and the filesystem root.
    #[arg(value_name = "RESOURCE_TYPE", required = true)]
    resource_types: Vec<String>,

    /// Extra template names tried after the type-derived default.
    #[arg(short, long, value_name = "TEMPLATE", num_args = 0..)]
    templates: Vec<String>,

    /// Enable debug logging (default level is warn).
    #[arg(short, long)]
    debug: bool,

    /// PuppetDB host.
    #[arg(short = 'H', long, default_value = "localhost")]
    host: String,

    /// PuppetDB port.
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Site scope flag, compared verbatim against the literal strings
    /// "true"/"false" by the visibility rules.
    #[arg(short, long, default_value = "true")]
    localsite: String,
}

impl Cli {
    /// Run the batch: one fetch-and-render pass per requested resource type.
    ///
    /// A type whose template cannot be resolved logs an error and prints an
    /// empty block; PuppetDB failures abort the whole run.
    ///
    /// # Errors
    ///
    /// Propagates fatal errors from the stencil pipeline; `main` converts
    /// them into user-facing diagnostics.
    pub fn execute(self) -> Result<()> {
        init_logging(self.debug);

        let config = TemplateConfig::default();
        let database = Database::connect(&self.host, self.port);
        // One snapshot per invocation keeps environment-derived parameters
        // deterministic across the batch.
        let environment: Vec<(String, String)> = std::env::vars().collect();

        for resource_type in &self.resource_types {
            let names = config.candidate_names(resource_type, &self.templates);
            let output = stencil::render_resources(
                &database,
                resource_type,
                &self.localsite,
                &names,
                &config,
                &environment,
            )?;
            println!("{output}");
        }
        Ok(())
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

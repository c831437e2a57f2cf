//! puppetdb-stencil - render PuppetDB exported resources with templates
//!
//! A single-pass batch tool that queries exported resources from a PuppetDB
//! instance and renders them into monitoring-system (Icinga/Nagios)
//! configuration blocks using one Tera template per resource type.
//!
//! # Architecture Overview
//!
//! The tool is a straight pipeline, evaluated once per requested resource
//! type:
//!
//! 1. **Template resolution** - the first candidate template name that
//!    resolves against the configured search paths is used; a type with no
//!    template is logged and skipped.
//! 2. **Resource selection & shaping** - every fetched resource passes
//!    through a visibility predicate (driven by the `exported` flag, the
//!    `only-cross-site`/`no-cross-site` tags, and the `--localsite` flag);
//!    visible resources become flat DTOs merging their declared parameters
//!    with environment-variable defaults.
//! 3. **Dependency linking** - `parent:<service-description>` tags collected
//!    during the selection pass are resolved against the full resource list,
//!    emitting one `servicedependency` fragment per (parent, child) pair.
//!
//! All fragments for a type are concatenated in discovery order and printed
//! as one block.
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface and the per-type render loop
//! - [`core`] - Resource model, parameter values, and error handling
//! - [`puppetdb`] - PuppetDB query client (one blocking fetch per type)
//! - [`stencil`] - Resource selection, DTO shaping, and dependency linking
//! - [`templating`] - Template resolution and rendering with Tera
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Render all exported nagios_host resources using ./nagios_host.tera
//! puppetdb-stencil nagios_host
//!
//! # Several types in one run, with a fallback template and debug logging
//! puppetdb-stencil nagios_host nagios_service -t fallback.tera --debug
//!
//! # Cross-site rendering against a remote PuppetDB
//! puppetdb-stencil nagios_service -H puppetdb.example.net -p 8080 -l false
//! ```

pub mod cli;
pub mod core;
pub mod puppetdb;
pub mod stencil;
pub mod templating;

//! Template resolution and rendering with Tera
//!
//! The engine is configured through an explicit [`TemplateConfig`] value
//! passed to the renderer at construction, not a module-level singleton.
//! Resolution is first-match: candidate names are tried in order, each
//! against the configured search paths in order, and the first readable file
//! wins.
//!
//! # Template input contract
//!
//! Templates receive exactly one value, `dto`, with the fields
//! `object_name`, `parameters` (an ordered sequence of single-key mappings)
//! and, for resource fragments, `named_object` and `name`:
//!
//! ```text
//! define {{ dto.object_name }} {
//! {% for parameter in dto.parameters %}
//! {% for key, value in parameter %}    {{ key }}    {{ value }}
//! {% endfor %}
//! {% endfor %}
//! }
//! ```

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;
use tera::{Context as TeraContext, Tera};

use crate::core::StencilError;

/// Engine configuration: where templates are looked up and which file
/// extensions derive the default template name for a resource type.
#[derive(Debug, Clone)]
pub struct TemplateConfig {
    /// Directories tried in order when resolving a candidate name.
    pub search_paths: Vec<PathBuf>,
    /// Extensions used to derive type-default candidate names
    /// (`<resource_type>.<ext>`).
    pub enabled_extensions: BTreeSet<String>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            // Templates may live anywhere on the filesystem
            search_paths: vec![PathBuf::from("."), PathBuf::from("/")],
            enabled_extensions: BTreeSet::from(["tera".to_string()]),
        }
    }
}

impl TemplateConfig {
    /// Candidate template names for a resource type, in resolution order:
    /// the type-derived defaults first, then any explicitly requested names.
    #[must_use]
    pub fn candidate_names(&self, resource_type: &str, extra: &[String]) -> Vec<String> {
        let mut names: Vec<String> = self
            .enabled_extensions
            .iter()
            .map(|ext| format!("{resource_type}.{ext}"))
            .collect();
        names.extend(extra.iter().cloned());
        names
    }
}

/// Template renderer wrapping a [`Tera`] instance.
///
/// Templates are registered lazily by [`select_template`](Self::select_template)
/// and rendered with a context holding the single `dto` value.
pub struct TemplateRenderer {
    config: TemplateConfig,
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a renderer with no registered templates.
    #[must_use]
    pub fn new(config: TemplateConfig) -> Self {
        Self {
            config,
            tera: Tera::default(),
        }
    }

    /// Resolve the first candidate name that exists under a search path,
    /// register it, and return its name.
    ///
    /// # Errors
    ///
    /// [`StencilError::TemplateNotFound`] when no candidate resolves (the
    /// caller treats this as a per-type skip) and
    /// [`StencilError::TemplateRender`] when the resolved file is not a
    /// valid template (fatal).
    pub fn select_template(
        &mut self,
        resource_type: &str,
        names: &[String],
    ) -> Result<String, StencilError> {
        for name in names {
            for dir in &self.config.search_paths {
                let path = dir.join(name);
                let Ok(text) = std::fs::read_to_string(&path) else {
                    continue;
                };
                tracing::debug!("Resolved template '{}' at {}", name, path.display());
                self.tera
                    .add_raw_template(name, &text)
                    .map_err(|source| StencilError::TemplateRender {
                        name: name.clone(),
                        source,
                    })?;
                return Ok(name.clone());
            }
        }
        Err(StencilError::TemplateNotFound {
            resource_type: resource_type.to_string(),
            candidates: names.to_vec(),
        })
    }

    /// Render a registered template against a single `dto` context value.
    ///
    /// # Errors
    ///
    /// [`StencilError::TemplateRender`] when Tera rejects the render; this
    /// propagates and aborts the run.
    pub fn render<T: Serialize>(&self, name: &str, dto: &T) -> Result<String, StencilError> {
        let mut context = TeraContext::new();
        context.insert("dto", dto);
        self.tera
            .render(name, &context)
            .map_err(|source| StencilError::TemplateRender {
                name: name.to_string(),
                source,
            })
    }
}

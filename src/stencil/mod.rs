//! Resource selection, DTO shaping, and dependency linking
//!
//! This is the heart of the tool. For one resource type,
//! [`render_resources`] resolves a template, fetches the type's resources,
//! renders every visible one, and appends the service-dependency fragments
//! synthesized from `parent:<service-description>` tags. All fragments are
//! concatenated in discovery order into a single output block.
//!
//! The post-fetch pipeline is pure and lives in [`render_batch`], which the
//! unit tests drive directly with in-memory resource lists.

pub mod linker;
pub mod selector;

use anyhow::Result;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::StencilError;
use crate::core::resource::{Resource, is_named_object, object_name};
use crate::puppetdb::Database;
use crate::templating::{TemplateConfig, TemplateRenderer};

/// The flat record handed to the template engine as the single `dto` value.
///
/// Intentionally engine-agnostic: a DTO is constructed, rendered, and
/// discarded per fragment, never reused. Service-dependency fragments carry
/// only `object_name` and `parameters`, so the identity fields are optional
/// and absent keys are omitted from the template context.
#[derive(Debug, Clone, Serialize)]
pub struct Dto {
    /// Monitoring object kind, e.g. `host` or `servicedependency`.
    pub object_name: String,
    /// Whether the object kind is addressed by name in the configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_object: Option<bool>,
    /// The resource instance title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Ordered sequence of single-key mappings; templates may rely on
    /// first-match semantics.
    pub parameters: Vec<Map<String, Value>>,
}

/// Render all resources of one type into a single output block.
///
/// Template resolution runs first; a type with no template logs one error
/// and contributes an empty block (the run continues with the next type).
/// The fetch and any render failure are fatal and propagate.
///
/// # Errors
///
/// PuppetDB transport/decode failures, template registration or render
/// failures, and missing dependency parameters.
pub fn render_resources(
    database: &Database,
    resource_type: &str,
    localsite: &str,
    template_names: &[String],
    config: &TemplateConfig,
    environment: &[(String, String)],
) -> Result<String> {
    let mut renderer = TemplateRenderer::new(config.clone());
    let template = match renderer.select_template(resource_type, template_names) {
        Ok(name) => name,
        Err(StencilError::TemplateNotFound { resource_type, .. }) => {
            tracing::error!("No template found for {resource_type}");
            return Ok(String::new());
        }
        Err(err) => return Err(err.into()),
    };

    let resources = database.resources(resource_type)?;
    render_batch(&renderer, &template, resource_type, localsite, &resources, environment)
}

/// Pure batch rendering over an already-fetched resource list.
pub fn render_batch(
    renderer: &TemplateRenderer,
    template: &str,
    resource_type: &str,
    localsite: &str,
    resources: &[Resource],
    environment: &[(String, String)],
) -> Result<String> {
    let object = object_name(resource_type);
    let named = is_named_object(object);
    let mut output = String::new();
    let mut dependencies = selector::DependencyMap::new();
    let mut rendered = 0usize;

    for (index, resource) in resources.iter().enumerate() {
        if selector::is_resource_visible(resource, localsite) {
            let dto = selector::shape_resource(object, named, resource, environment);
            output.push_str(&renderer.render(template, &dto)?);
            output.push('\n');
            rendered += 1;
        }
        selector::collect_parent_markers(resource, index, &mut dependencies);
    }
    tracing::debug!(
        "Rendered {} of {} {} resources, {} dependency group(s)",
        rendered,
        resources.len(),
        resource_type,
        dependencies.len()
    );

    // Parent candidates are gated on the visibility of whichever resource
    // the selector loop visited last, not the candidate itself. Kept
    // bug-for-bug; see DESIGN.md before changing.
    let parent_gate =
        resources.last().is_some_and(|last| selector::is_resource_visible(last, localsite));

    for fragment in linker::link_dependencies(&dependencies, resources, parent_gate)? {
        output.push_str(&renderer.render(template, &fragment)?);
        output.push('\n');
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    const TEMPLATE: &str = "define {{ dto.object_name }} ({{ dto.name | default(value=\"-\") }}){% for parameter in dto.parameters %}{% for key, value in parameter %} {{ key }}={{ value }}{% endfor %}{% endfor %}\n";

    fn renderer_with_template(dir: &TempDir) -> (TemplateRenderer, String) {
        fs::write(dir.path().join("nagios_service.tera"), TEMPLATE).unwrap();
        let config = TemplateConfig {
            search_paths: vec![dir.path().to_path_buf()],
            enabled_extensions: BTreeSet::from(["tera".to_string()]),
        };
        let mut renderer = TemplateRenderer::new(config);
        let name = renderer
            .select_template("nagios_service", &["nagios_service.tera".to_string()])
            .unwrap();
        (renderer, name)
    }

    fn service(name: &str, description: &str, exported: bool, tags: &[&str]) -> Resource {
        Resource {
            resource_type: "Nagios_service".to_string(),
            name: name.to_string(),
            exported,
            tags: tags.iter().map(ToString::to_string).collect(),
            parameters: json!({
                "host_name": name,
                "service_description": description,
            })
            .as_object()
            .unwrap()
            .clone(),
        }
    }

    #[test]
    fn test_batch_renders_only_visible_resources() {
        let dir = TempDir::new().unwrap();
        let (renderer, template) = renderer_with_template(&dir);
        let resources = vec![
            service("web01", "http", true, &[]),
            service("web02", "http", false, &[]),
        ];

        let output = render_batch(&renderer, &template, "nagios_service", "true", &resources, &[])
            .unwrap();
        assert!(output.contains("(web01)"));
        assert!(!output.contains("(web02)"));
    }

    #[test]
    fn test_batch_appends_dependency_fragments_after_resources() {
        let dir = TempDir::new().unwrap();
        let (renderer, template) = renderer_with_template(&dir);
        let resources = vec![
            service("db02", "disk usage", true, &["parent:db_primary"]),
            service("db01", "db primary", true, &[]),
        ];

        let output = render_batch(&renderer, &template, "nagios_service", "true", &resources, &[])
            .unwrap();
        let lines: Vec<&str> = output.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("(db02)"));
        assert!(lines[1].contains("(db01)"));
        assert!(lines[2].starts_with("define servicedependency (-)"));
        assert!(lines[2].contains("dependent_host_name=db02"));
    }

    #[test]
    fn test_batch_dependency_gate_follows_last_resource() {
        let dir = TempDir::new().unwrap();
        let (renderer, template) = renderer_with_template(&dir);
        // The parent is a perfectly visible candidate, but the last fetched
        // resource is not exported, which gates the whole dependency pass.
        let resources = vec![
            service("db01", "db primary", true, &[]),
            service("db02", "disk usage", false, &["parent:db_primary"]),
        ];

        let output = render_batch(&renderer, &template, "nagios_service", "true", &resources, &[])
            .unwrap();
        assert!(!output.contains("servicedependency"));
    }

    #[test]
    fn test_batch_empty_resource_list_is_empty_output() {
        let dir = TempDir::new().unwrap();
        let (renderer, template) = renderer_with_template(&dir);
        let output =
            render_batch(&renderer, &template, "nagios_service", "true", &[], &[]).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_batch_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let (renderer, template) = renderer_with_template(&dir);
        let resources = vec![
            service("db02", "disk usage", true, &["parent:db_primary"]),
            service("db01", "db primary", true, &[]),
        ];
        let environment = vec![("SERVICE_CONTACT".to_string(), "OPS".to_string())];

        let first =
            render_batch(&renderer, &template, "nagios_service", "true", &resources, &environment)
                .unwrap();
        let second =
            render_batch(&renderer, &template, "nagios_service", "true", &resources, &environment)
                .unwrap();
        assert_eq!(first, second);
        assert!(first.contains("contact=ops"));
    }
}

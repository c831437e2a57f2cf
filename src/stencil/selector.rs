//! Resource selection and DTO shaping
//!
//! The selector decides which fetched resources are rendered and what data
//! the template sees. Visibility is driven by the `exported` flag, the
//! `only-cross-site`/`no-cross-site` tags, and the site-scope flag; shaping
//! merges the declared parameters with environment-variable defaults.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::Dto;
use crate::core::resource::{ALLOWED_METAPARAMS, METAPARAMS, ParamValue, Resource};

/// Children grouped under the service description taken from their parent
/// markers, in first-encounter order. Values index into the fetched
/// resource list.
pub type DependencyMap = IndexMap<String, Vec<usize>>;

/// Whether a resource is rendered in the current site scope.
///
/// `localsite` is compared as a literal string, never parsed as a boolean;
/// the flag arrives as a string on the external interface and any value
/// other than `"true"`/`"false"` simply matches neither scoped branch.
/// A resource carrying both scope markers is never visible.
#[must_use]
pub fn is_resource_visible(resource: &Resource, localsite: &str) -> bool {
    let only_cross_site = resource.has_tag("only-cross-site");
    let no_cross_site = resource.has_tag("no-cross-site");
    resource.exported
        && ((!only_cross_site && !no_cross_site)
            || (only_cross_site && !no_cross_site && localsite == "false")
            || (!only_cross_site && no_cross_site && localsite == "true"))
}

/// Build the DTO for one visible resource.
///
/// Declared parameters are emitted first, in record order. A list value is
/// joined with `,` unless its key is a metaparameter outside the allow-list;
/// the filter gates only the join, the key is emitted either way. Each
/// emitted key marks `<OBJECT>_<KEY>` (uppercased) as covered.
///
/// Environment variables whose name starts with the object name segment
/// (case-insensitively, split on `_`) then contribute defaulted parameters:
/// the remaining segments, lowercased, become the key and the value is
/// lowercased. A variable whose full name is already covered is suppressed,
/// so the environment can add parameters but never override a declared one.
#[must_use]
pub fn shape_resource(
    object_name: &str,
    named_object: bool,
    resource: &Resource,
    environment: &[(String, String)],
) -> Dto {
    let mut parameters: Vec<Map<String, Value>> = Vec::new();
    let mut covered: Vec<String> = Vec::new();

    for (key, value) in &resource.parameters {
        let joinable = !METAPARAMS.contains(&key.as_str())
            || ALLOWED_METAPARAMS.contains(&key.as_str());
        let emitted = match ParamValue::from_wire(value) {
            ParamValue::List(items) if joinable => Value::String(items.join(",")),
            _ => value.clone(),
        };
        let mut entry = Map::new();
        entry.insert(key.clone(), emitted);
        parameters.push(entry);
        covered.push(format!("{object_name}_{key}").to_uppercase());
    }

    for (name, value) in environment {
        let mut segments = name.split('_');
        let first = segments.next().unwrap_or_default();
        if first.to_lowercase() != object_name || covered.iter().any(|c| c == name) {
            continue;
        }
        let derived_key = segments.collect::<Vec<_>>().join("_").to_lowercase();
        let mut entry = Map::new();
        entry.insert(derived_key, Value::String(value.to_lowercase()));
        parameters.push(entry);
    }

    Dto {
        object_name: object_name.to_string(),
        named_object: Some(named_object),
        name: Some(resource.name.clone()),
        parameters,
    }
}

/// Collect `parent:<service-description>` markers from one resource's tags.
///
/// Runs for every resource, visible or not. A tag containing the marker must
/// split on `:` into exactly two parts; any other segment count is silently
/// ignored.
pub fn collect_parent_markers(
    resource: &Resource,
    index: usize,
    dependencies: &mut DependencyMap,
) {
    for tag in &resource.tags {
        if !tag.contains("parent:") {
            continue;
        }
        let parts: Vec<&str> = tag.split(':').collect();
        if parts.len() == 2 {
            dependencies.entry(parts[1].to_string()).or_default().push(index);
        }
    }
}

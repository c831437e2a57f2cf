//! Parent/child service dependency resolution
//!
//! Each dependency-map entry names a parent service; the linker resolves it
//! by scanning the full fetched resource list (visible or not) for resources
//! whose `service_description` parameter contains the description as a
//! case-insensitive substring, then emits one `servicedependency` DTO per
//! (parent, child) pair. Multiple parent matches each produce a full set of
//! child fragments; an unresolved description yields nothing.

use serde_json::{Map, Value};

use super::Dto;
use super::selector::DependencyMap;
use crate::core::error::StencilError;
use crate::core::resource::{ParamValue, Resource};

/// Build one `servicedependency` DTO per resolved (parent, child) pair, in
/// map insertion order, parent fetch order, then child collection order.
///
/// `parent_gate` is the visibility gate applied to every parent candidate;
/// see the call site for why it is a single pass-wide constant.
///
/// # Errors
///
/// [`StencilError::MissingDependencyParameter`] when a matched parent or
/// child lacks `host_name` or `service_description`.
pub fn link_dependencies(
    dependencies: &DependencyMap,
    resources: &[Resource],
    parent_gate: bool,
) -> Result<Vec<Dto>, StencilError> {
    let mut fragments = Vec::new();
    if !parent_gate {
        return Ok(fragments);
    }

    for (key, children) in dependencies {
        // Underscores in the tag stand for spaces in the description.
        let parent_service_description = key.replace('_', " ");

        for parent in resources {
            let matches = parent
                .parameters
                .get("service_description")
                .map(ParamValue::from_wire)
                .as_ref()
                .and_then(ParamValue::as_scalar)
                .is_some_and(|text| text.to_lowercase().contains(&parent_service_description));
            if !matches {
                continue;
            }

            for &child_index in children {
                let child = &resources[child_index];
                let mut parameters = Map::new();
                parameters
                    .insert("host_name".to_string(), dependency_parameter(parent, "host_name")?);
                parameters.insert(
                    "service_description".to_string(),
                    dependency_parameter(parent, "service_description")?,
                );
                parameters.insert(
                    "dependent_host_name".to_string(),
                    dependency_parameter(child, "host_name")?,
                );
                parameters.insert(
                    "dependent_service_description".to_string(),
                    dependency_parameter(child, "service_description")?,
                );
                fragments.push(Dto {
                    object_name: "servicedependency".to_string(),
                    named_object: None,
                    name: None,
                    parameters: vec![parameters],
                });
            }
        }
    }

    Ok(fragments)
}

fn dependency_parameter(resource: &Resource, parameter: &str) -> Result<Value, StencilError> {
    resource.parameters.get(parameter).cloned().ok_or_else(|| {
        StencilError::MissingDependencyParameter {
            resource: resource.name.clone(),
            parameter: parameter.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service(name: &str, host_name: &str, description: &str, tags: &[&str]) -> Resource {
        Resource {
            resource_type: "Nagios_service".to_string(),
            name: name.to_string(),
            exported: true,
            tags: tags.iter().map(ToString::to_string).collect(),
            parameters: json!({
                "host_name": host_name,
                "service_description": description,
            })
            .as_object()
            .unwrap()
            .clone(),
        }
    }

    fn collect(resources: &[Resource]) -> DependencyMap {
        let mut dependencies = DependencyMap::new();
        for (index, resource) in resources.iter().enumerate() {
            super::super::selector::collect_parent_markers(resource, index, &mut dependencies);
        }
        dependencies
    }

    #[test]
    fn test_two_children_one_parent_yields_two_fragments() {
        let resources = vec![
            service("disk", "db01", "disk usage", &["parent:db_primary_check"]),
            service("load", "db01", "load average", &["parent:db_primary_check"]),
            service("primary", "db01", "DB Primary Check", &[]),
        ];
        let fragments =
            link_dependencies(&collect(&resources), &resources, true).unwrap();

        assert_eq!(fragments.len(), 2);
        for fragment in &fragments {
            assert_eq!(fragment.object_name, "servicedependency");
            assert_eq!(fragment.named_object, None);
            assert_eq!(fragment.name, None);
            let parameters = &fragment.parameters[0];
            assert_eq!(parameters["host_name"], json!("db01"));
            assert_eq!(parameters["service_description"], json!("DB Primary Check"));
        }
        assert_eq!(fragments[0].parameters[0]["dependent_service_description"], json!("disk usage"));
        assert_eq!(fragments[1].parameters[0]["dependent_service_description"], json!("load average"));
    }

    #[test]
    fn test_gate_false_yields_nothing() {
        let resources = vec![
            service("disk", "db01", "disk usage", &["parent:db_primary_check"]),
            service("primary", "db01", "db primary check", &[]),
        ];
        let fragments =
            link_dependencies(&collect(&resources), &resources, false).unwrap();
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_unresolved_parent_is_silently_ignored() {
        let resources = vec![
            service("disk", "db01", "disk usage", &["parent:no_such_check"]),
            service("primary", "db01", "db primary check", &[]),
        ];
        let fragments =
            link_dependencies(&collect(&resources), &resources, true).unwrap();
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_multiple_parent_matches_emit_full_sets() {
        let resources = vec![
            service("disk", "db01", "disk usage", &["parent:db_check"]),
            service("primary", "db01", "db check primary", &[]),
            service("replica", "db02", "db check replica", &[]),
        ];
        let fragments =
            link_dependencies(&collect(&resources), &resources, true).unwrap();

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].parameters[0]["host_name"], json!("db01"));
        assert_eq!(fragments[1].parameters[0]["host_name"], json!("db02"));
    }

    #[test]
    fn test_children_may_be_invisible() {
        let mut child = service("disk", "db01", "disk usage", &["parent:db_check"]);
        child.exported = false;
        let resources = vec![child, service("primary", "db01", "db check", &[])];
        let fragments =
            link_dependencies(&collect(&resources), &resources, true).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].parameters[0]["dependent_host_name"], json!("db01"));
    }

    #[test]
    fn test_missing_parent_parameter_is_fatal() {
        let mut parent = service("primary", "db01", "db check", &[]);
        parent.parameters.remove("host_name");
        let resources =
            vec![service("disk", "db01", "disk usage", &["parent:db_check"]), parent];
        let err = link_dependencies(&collect(&resources), &resources, true).unwrap_err();
        match err {
            StencilError::MissingDependencyParameter { resource, parameter } => {
                assert_eq!(resource, "primary");
                assert_eq!(parameter, "host_name");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fragment_parameter_order() {
        let resources = vec![
            service("disk", "web01", "disk usage", &["parent:http_check"]),
            service("http", "lb01", "HTTP Check", &[]),
        ];
        let fragments =
            link_dependencies(&collect(&resources), &resources, true).unwrap();
        let keys: Vec<&String> = fragments[0].parameters[0].keys().collect();
        assert_eq!(
            keys,
            ["host_name", "service_description", "dependent_host_name", "dependent_service_description"]
        );
    }
}

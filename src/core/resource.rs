//! Resource model and parameter values
//!
//! [`Resource`] mirrors the wire format of the PuppetDB v4
//! `/pdb/query/v4/resources/<Type>` endpoint; fields the tool does not use
//! (`certname`, `environment`, `file`, `line`, ...) are ignored during
//! deserialization. Parameter order matters to templates with first-match
//! semantics, so `parameters` relies on `serde_json`'s `preserve_order`
//! feature to keep the record's iteration order.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Reserved Puppet metaparameter names. Excluded from the list-join step of
/// parameter shaping unless allow-listed; the keys themselves are always
/// emitted.
pub static METAPARAMS: &[&str] = &[
    "require",
    "before",
    "subscribe",
    "notify",
    "audit",
    "loglevel",
    "noop",
    "schedule",
    "stage",
    "alias",
    "tag",
];

/// Metaparameters that take part in list joining anyway. A confirmed
/// single-entry allow-list.
pub static ALLOWED_METAPARAMS: &[&str] = &["alias"];

/// First-class monitoring object kinds that are addressed by name in the
/// generated configuration.
pub static NAMED_OBJECTS: &[&str] = &[
    "host",
    "hostgroup",
    "servicegroup",
    "servicedependency",
    "contact",
    "contactgroup",
    "timeperiod",
    "command",
];

/// Byte length of the `Nagios_` type namespace prefix.
const TYPE_PREFIX_LEN: usize = 7;

/// An exported resource as returned by PuppetDB.
///
/// Read-only for the whole run; selection and shaping never mutate it.
#[derive(Debug, Clone, Deserialize)]
pub struct Resource {
    /// Resource type, e.g. `Nagios_host`.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Instance title, e.g. the host or check name.
    #[serde(rename = "title")]
    pub name: String,
    /// Only exported resources are render candidates.
    pub exported: bool,
    /// Free-form tags, in wire order. May carry the `only-cross-site`/
    /// `no-cross-site` scope markers and `parent:<service-description>`
    /// dependency markers.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Declared parameters, in record order.
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl Resource {
    /// Whether the exact tag is present.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Derive the monitoring object name from a resource type by stripping the
/// fixed-length namespace prefix (`Nagios_host` -> `host`). Types shorter
/// than the prefix yield the empty string.
#[must_use]
pub fn object_name(resource_type: &str) -> &str {
    resource_type.get(TYPE_PREFIX_LEN..).unwrap_or_default()
}

/// Whether the object name belongs to the fixed set of named monitoring
/// object kinds.
#[must_use]
pub fn is_named_object(object_name: &str) -> bool {
    NAMED_OBJECTS.contains(&object_name)
}

/// A declared parameter value, discriminated explicitly instead of by
/// runtime type inspection.
///
/// Resolved from the raw wire [`Value`] at DTO-construction time. JSON
/// scalars that are not strings (bools, numbers) coerce to their canonical
/// text form, list elements likewise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// A single string value.
    Scalar(String),
    /// An ordered sequence of string values.
    List(Vec<String>),
}

impl ParamValue {
    /// Resolve a raw wire value into its scalar/list form.
    #[must_use]
    pub fn from_wire(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self::List(items.iter().map(coerce_scalar).collect()),
            other => Self::Scalar(coerce_scalar(other)),
        }
    }

    /// The scalar text, or `None` for lists.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(text) => Some(text),
            Self::List(_) => None,
        }
    }
}

fn coerce_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

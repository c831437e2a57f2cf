//! Error handling for puppetdb-stencil
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** ([`StencilError`]) for precise handling in code
//! 2. **User-friendly messages** ([`ErrorContext`]) with actionable suggestions
//!    for CLI users
//!
//! Only two failure classes are recoverable: a template that cannot be
//! resolved for a resource type (logged, the type is skipped) and a parent
//! marker that matches no resource (silently ignored). Everything else -
//! transport failures, template syntax or render errors, and dependency
//! fragments referencing missing parameters - propagates to the process
//! boundary, where [`user_friendly_error`] turns it into a colored
//! diagnostic with a suggestion.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for puppetdb-stencil operations
#[derive(Error, Debug)]
pub enum StencilError {
    /// No candidate template name resolved against the configured search
    /// paths. Recoverable: the resource type contributes no output.
    #[error("No template found for {resource_type}")]
    TemplateNotFound {
        /// Resource type whose rendering was skipped
        resource_type: String,
        /// Candidate names that were tried, in resolution order
        candidates: Vec<String>,
    },

    /// The PuppetDB query could not be sent or the transport failed mid-flight.
    #[error("PuppetDB request to {url} failed")]
    PuppetDbRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// PuppetDB answered with a non-success status code.
    #[error("PuppetDB request to {url} returned HTTP {status}")]
    PuppetDbStatus { url: String, status: reqwest::StatusCode },

    /// The response body was not a valid resource list.
    #[error("Failed to decode PuppetDB response from {url}")]
    PuppetDbDecode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Tera rejected the template, either at registration or at render time.
    #[error("Failed to render template '{name}'")]
    TemplateRender {
        name: String,
        #[source]
        source: tera::Error,
    },

    /// A resolved dependency parent or child lacks a parameter the
    /// `servicedependency` fragment must copy.
    #[error("Resource '{resource}' is missing parameter '{parameter}' required for a service dependency")]
    MissingDependencyParameter { resource: String, parameter: String },
}

/// Wrapper that pairs an error with user-facing context
///
/// The suggestion is an actionable step (displayed green), the details
/// explain why the error occurred (displayed yellow). Built by
/// [`user_friendly_error`] at the process boundary.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: anyhow::Error,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a basic error context with no suggestion or details.
    #[must_use]
    pub fn new(error: impl Into<anyhow::Error>) -> Self {
        Self {
            error: error.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add an actionable suggestion for resolving the error.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining why the error occurred.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors.
    ///
    /// Error message red and bold, details yellow, suggestion green. This is
    /// the primary way the CLI presents fatal errors to users.
    pub fn display(&self) {
        eprintln!("{}: {:#}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Convert any error into a user-friendly [`ErrorContext`]
///
/// Known [`StencilError`] variants get targeted suggestions; everything else
/// passes through with generic formatting.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let (suggestion, details) = match error.downcast_ref::<StencilError>() {
        Some(StencilError::PuppetDbRequest { .. }) => (
            Some("Check that PuppetDB is running and reachable at the configured --host/--port"),
            Some("The query never received a response; this is usually a connection or DNS problem"),
        ),
        Some(StencilError::PuppetDbStatus { .. }) => (
            Some("Verify the resource type name and that the PuppetDB v4 query API is enabled"),
            Some("PuppetDB accepted the connection but rejected the query"),
        ),
        Some(StencilError::PuppetDbDecode { .. }) => (
            Some("Confirm the endpoint is a PuppetDB v4 query API and not a proxy or error page"),
            Some("The response body could not be decoded as a resource list"),
        ),
        Some(StencilError::TemplateRender { .. }) => (
            Some(
                "Check template syntax: variables use {{ dto.* }}, control flow uses {% %}. \
                 The template receives a single `dto` value with object_name, named_object, \
                 name, and parameters",
            ),
            Some("Tera could not register or render the template"),
        ),
        Some(StencilError::MissingDependencyParameter { .. }) => (
            Some(
                "Declare host_name and service_description on every resource that takes part \
                 in a parent:<service-description> dependency",
            ),
            Some("Service dependency fragments copy these parameters from both parent and child"),
        ),
        Some(StencilError::TemplateNotFound { .. }) | None => (None, None),
    };

    let mut ctx = ErrorContext::new(error);
    if let Some(suggestion) = suggestion {
        ctx = ctx.with_suggestion(suggestion);
    }
    if let Some(details) = details {
        ctx = ctx.with_details(details);
    }
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_not_found_message() {
        let err = StencilError::TemplateNotFound {
            resource_type: "nagios_host".to_string(),
            candidates: vec!["nagios_host.tera".to_string()],
        };
        assert_eq!(err.to_string(), "No template found for nagios_host");
    }

    #[test]
    fn test_context_display_string() {
        let ctx = ErrorContext::new(anyhow::anyhow!("boom"))
            .with_suggestion("try again")
            .with_details("it exploded");
        let rendered = format!("{ctx}");
        assert!(rendered.contains("boom"));
        assert!(rendered.contains("Details: it exploded"));
        assert!(rendered.contains("Suggestion: try again"));
    }

    #[test]
    fn test_user_friendly_error_attaches_suggestion() {
        let err = anyhow::Error::new(StencilError::MissingDependencyParameter {
            resource: "web01".to_string(),
            parameter: "host_name".to_string(),
        });
        let ctx = user_friendly_error(err);
        assert!(ctx.suggestion.is_some());
        assert!(ctx.details.is_some());
    }

    #[test]
    fn test_user_friendly_error_generic_passthrough() {
        let ctx = user_friendly_error(anyhow::anyhow!("unclassified"));
        assert!(ctx.suggestion.is_none());
        assert!(ctx.details.is_none());
    }
}

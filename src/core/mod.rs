//! Core types for puppetdb-stencil
//!
//! This module contains the shared vocabulary of the tool: the wire-level
//! [`Resource`] model fetched from PuppetDB, the explicit
//! [`ParamValue`] scalar/list discrimination used during DTO construction,
//! and the error types surfaced at the process boundary.

pub mod error;
pub mod resource;

pub use error::{ErrorContext, StencilError, user_friendly_error};
pub use resource::{ParamValue, Resource};

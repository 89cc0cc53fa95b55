//! Error types for the graph catalogue.

use promgraph_types::{IntervalError, TemplateError};
use thiserror::Error;

/// Errors raised while assembling, validating or using graph descriptions.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A graph was given an empty (or whitespace-only) id.
    #[error("graph id must not be empty")]
    EmptyId,

    /// A graph was given an empty query template.
    #[error("graph '{id}' has an empty query")]
    EmptyQuery { id: String },

    /// Another graph with the same id is already registered.
    #[error("graph '{0}' is already registered")]
    DuplicateId(String),

    /// No graph with this id exists.
    #[error("unknown graph '{0}'")]
    UnknownGraph(String),

    /// The query template could not be scanned.
    #[error("graph '{id}' has a malformed query template: {source}")]
    MalformedTemplate {
        id: String,
        #[source]
        source: TemplateError,
    },

    /// The template references a placeholder that is not a declared parameter.
    #[error("graph '{id}' references undeclared parameter '{name}'")]
    UnknownParameter { id: String, name: String },

    /// A declared parameter never appears in the template.
    #[error("graph '{id}' declares parameter '{name}' but never uses it")]
    UnusedParameter { id: String, name: String },

    /// A declared parameter was given no value.
    #[error("graph '{id}' requires a value for parameter '{name}'")]
    MissingValue { id: String, name: String },

    /// A value was supplied for a parameter the graph does not declare.
    #[error("graph '{id}' has no parameter '{name}'")]
    UndeclaredValue { id: String, name: String },

    /// A configured default interval could not be parsed.
    #[error("graph '{id}' has an invalid default interval: {source}")]
    InvalidInterval {
        id: String,
        #[source]
        source: IntervalError,
    },

    /// Settings could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
}

impl CatalogError {
    /// True for the errors that describe drift between a template and its
    /// declared parameters.
    pub fn is_template_drift(&self) -> bool {
        matches!(
            self,
            CatalogError::UnknownParameter { .. }
                | CatalogError::UnusedParameter { .. }
                | CatalogError::MalformedTemplate { .. }
        )
    }
}

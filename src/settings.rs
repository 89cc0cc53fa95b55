//! Settings loading.
//!
//! Graphs can be added to the catalogue from a TOML file:
//!
//! ```toml
//! strict_params = true
//! include_defaults = true
//!
//! [[graphs]]
//! id = "consumer-lag"
//! query = 'sum by (group) (kafka_consumergroup_lag{topic="${topic}"})'
//! params = ["topic"]
//!
//! [[graphs]]
//! id = "bytes-out-rate"
//! query = "rate(kafka_bytes_out[$interval])"
//! default_interval = "15m"
//! params = ["interval"]
//! ```
//!
//! Top-level keys can be overridden from the environment with the
//! `PROMGRAPH_` prefix, e.g. `PROMGRAPH_STRICT_PARAMS=false`.

use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use promgraph_types::{parse_interval, GraphDescription};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{defaults, CatalogError, GraphRegistry};

/// Catalogue settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Reject graphs whose params and template placeholders disagree.
    pub strict_params: bool,
    /// Start from the built-in Kafka graphs.
    pub include_defaults: bool,
    /// Additional graphs.
    pub graphs: Vec<GraphEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strict_params: true,
            include_defaults: true,
            graphs: Vec::new(),
        }
    }
}

/// One graph as written in a settings file.
///
/// Unknown keys are rejected so that a misspelled `default_interval` cannot
/// silently turn a range graph into an instant one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphEntry {
    pub id: String,
    pub query: String,
    /// Prometheus duration literal; absent for instant graphs.
    #[serde(default)]
    pub default_interval: Option<String>,
    #[serde(default)]
    pub params: Vec<String>,
}

impl GraphEntry {
    /// Convert into a description, parsing the interval literal.
    pub fn into_description(self) -> Result<GraphDescription, CatalogError> {
        let default_interval = self
            .default_interval
            .as_deref()
            .map(parse_interval)
            .transpose()
            .map_err(|source| CatalogError::InvalidInterval {
                id: self.id.clone(),
                source,
            })?;

        Ok(GraphDescription::new(
            self.id,
            default_interval,
            self.query,
            self.params,
        ))
    }
}

impl Settings {
    /// Load settings from an optional file plus `PROMGRAPH_*` environment variables.
    ///
    /// The file format is inferred from its extension.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!("Loading settings from {}", path.display());
            builder = builder.add_source(File::from(path));
        }

        let settings = builder
            .add_source(Environment::with_prefix("PROMGRAPH"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Parse settings from a TOML string, without consulting the environment.
    pub fn from_toml(content: &str) -> Result<Self, CatalogError> {
        let settings = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Build a registry from these settings.
    ///
    /// Built-in graphs (if enabled) are inserted first, so a configured graph
    /// reusing a built-in id is reported as a duplicate.
    pub fn into_registry(self) -> Result<GraphRegistry, CatalogError> {
        let mut registry = GraphRegistry::with_strictness(self.strict_params);
        if self.include_defaults {
            registry.extend(defaults::kafka_graphs())?;
        }

        let configured = self.graphs.len();
        for entry in self.graphs {
            registry.insert(entry.into_description()?)?;
        }

        info!(
            "Loaded {} graphs ({} configured, strict: {})",
            registry.len(),
            configured,
            registry.is_strict()
        );
        Ok(registry)
    }
}

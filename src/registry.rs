//! In-memory catalogue of graph descriptions keyed by id.

use std::collections::BTreeMap;

use promgraph_types::GraphDescription;
use tracing::{debug, warn};

use crate::{defaults, validate, CatalogError};

/// A collection of graph descriptions with unique, non-empty ids.
///
/// Every inserted description passes [`validate::check_structure`]. In strict
/// mode (the default) it must also pass [`validate::check_template`]; in
/// lenient mode template drift is only logged.
///
/// # Example
///
/// ```
/// use promgraph::GraphRegistry;
/// use promgraph_types::{GraphDescription, NO_PARAMS};
///
/// let mut registry = GraphRegistry::new();
/// let broker_count =
///     GraphDescription::builder("broker-count", r#"count(up{job="kafka"})"#, NO_PARAMS).build();
/// registry.insert(broker_count).unwrap();
///
/// assert!(registry.contains("broker-count"));
/// let clash = GraphDescription::builder("broker-count", "up", NO_PARAMS).build();
/// assert!(registry.insert(clash).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct GraphRegistry {
    graphs: BTreeMap<String, GraphDescription>,
    strict: bool,
}

impl GraphRegistry {
    /// Create an empty registry that rejects template drift.
    pub fn new() -> Self {
        Self::with_strictness(true)
    }

    /// Create an empty registry, choosing whether template drift is an error.
    pub fn with_strictness(strict: bool) -> Self {
        Self {
            graphs: BTreeMap::new(),
            strict,
        }
    }

    /// Create a strict registry pre-loaded with the built-in Kafka graphs.
    pub fn with_defaults() -> Result<Self, CatalogError> {
        let mut registry = Self::new();
        registry.extend(defaults::kafka_graphs())?;
        Ok(registry)
    }

    /// Whether template drift is rejected.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Validate and add a description.
    ///
    /// The registry is left unchanged if this returns an error.
    pub fn insert(&mut self, desc: GraphDescription) -> Result<(), CatalogError> {
        validate::check_structure(&desc)?;

        if let Err(err) = validate::check_template(&desc) {
            if self.strict {
                return Err(err);
            }
            warn!("Accepting graph with template drift: {}", err);
        }

        if self.graphs.contains_key(desc.id()) {
            return Err(CatalogError::DuplicateId(desc.id().to_string()));
        }

        debug!(
            "Registered graph '{}' ({})",
            desc.id(),
            if desc.is_range() { "range" } else { "instant" }
        );
        self.graphs.insert(desc.id().to_string(), desc);
        Ok(())
    }

    /// Insert several descriptions, stopping at the first error.
    ///
    /// Descriptions inserted before the failing one stay registered.
    pub fn extend<I>(&mut self, descs: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = GraphDescription>,
    {
        descs.into_iter().try_for_each(|desc| self.insert(desc))
    }

    /// Remove a description, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<GraphDescription> {
        self.graphs.remove(id)
    }

    /// Get a description by id.
    pub fn get(&self, id: &str) -> Option<&GraphDescription> {
        self.graphs.get(id)
    }

    /// Get a description by id, failing with [`CatalogError::UnknownGraph`].
    pub fn require(&self, id: &str) -> Result<&GraphDescription, CatalogError> {
        self.get(id)
            .ok_or_else(|| CatalogError::UnknownGraph(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.graphs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Iterate over all descriptions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &GraphDescription> {
        self.graphs.values()
    }

    /// Iterate over all ids in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.graphs.keys().map(String::as_str)
    }

    /// Descriptions of range queries.
    pub fn ranged(&self) -> impl Iterator<Item = &GraphDescription> {
        self.iter().filter(|g| g.is_range())
    }

    /// Descriptions of instant queries.
    pub fn instant(&self) -> impl Iterator<Item = &GraphDescription> {
        self.iter().filter(|g| !g.is_range())
    }
}

impl Default for GraphRegistry {
    fn default() -> Self {
        Self::new()
    }
}

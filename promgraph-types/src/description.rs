//! GraphDescription - how to query the metrics backend for one chart.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::template::{self, TemplateError};

/// How a graph is queried from the backend.
///
/// Derived from [`GraphDescription::default_interval`], never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryMode {
    /// A single point-in-time value.
    Instant,
    /// A series of samples over the given window.
    Range(Duration),
}

/// Parameter list for templates without placeholders.
pub const NO_PARAMS: [&str; 0] = [];

/// Immutable description of one queryable graph.
///
/// The query mode is carried by the optional default interval: a graph with
/// an interval is a range query, a graph without one is an instant query.
///
/// # Example
///
/// ```rust
/// use promgraph_types::{GraphDescription, QueryMode, NO_PARAMS};
/// use std::time::Duration;
///
/// let graph = GraphDescription::builder("bytes-in-rate", "rate(kafka_bytes_in[$interval])", NO_PARAMS)
///     .param("interval")
///     .default_interval(Duration::from_secs(300))
///     .build();
///
/// assert!(graph.is_range());
/// assert_eq!(graph.query_mode(), QueryMode::Range(Duration::from_secs(300)));
/// assert!(graph.has_param("interval"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphDescription {
    id: String,

    #[cfg_attr(
        feature = "serde",
        serde(
            with = "crate::interval::serde_opt",
            default,
            skip_serializing_if = "Option::is_none"
        )
    )]
    default_interval: Option<Duration>,

    prometheus_query: String,

    #[cfg_attr(feature = "serde", serde(default))]
    params: BTreeSet<String>,
}

impl GraphDescription {
    /// Create a description from all four fields.
    ///
    /// Duplicate parameter names collapse into one.
    pub fn new<I, S>(
        id: impl Into<String>,
        default_interval: Option<Duration>,
        prometheus_query: impl Into<String>,
        params: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            default_interval,
            prometheus_query: prometheus_query.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a builder with the mandatory id, query template and parameter names.
    ///
    /// Pass [`NO_PARAMS`] for a template without placeholders.
    pub fn builder<I, S>(
        id: impl Into<String>,
        prometheus_query: impl Into<String>,
        params: I,
    ) -> GraphDescriptionBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GraphDescriptionBuilder::new(id, prometheus_query, params)
    }

    /// Stable identifier used as the registry key.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Default window for range queries, `None` for instant queries.
    pub fn default_interval(&self) -> Option<Duration> {
        self.default_interval
    }

    /// Query template sent to the metrics backend.
    pub fn prometheus_query(&self) -> &str {
        &self.prometheus_query
    }

    /// Names of the parameters the template expects.
    pub fn params(&self) -> &BTreeSet<String> {
        &self.params
    }

    /// Check if `name` is a declared parameter.
    pub fn has_param(&self, name: &str) -> bool {
        self.params.contains(name)
    }

    /// True iff a default interval is present.
    pub fn is_range(&self) -> bool {
        self.default_interval.is_some()
    }

    pub fn query_mode(&self) -> QueryMode {
        match self.default_interval {
            Some(interval) => QueryMode::Range(interval),
            None => QueryMode::Instant,
        }
    }

    /// Placeholder names actually present in the query template.
    ///
    /// This does not compare them with [`params`](Self::params); drift
    /// detection is left to callers.
    pub fn placeholders(&self) -> Result<BTreeSet<String>, TemplateError> {
        template::placeholders(&self.prometheus_query)
    }
}

/// Builder for `GraphDescription`.
#[derive(Debug, Clone)]
pub struct GraphDescriptionBuilder {
    id: String,
    default_interval: Option<Duration>,
    prometheus_query: String,
    params: BTreeSet<String>,
}

impl GraphDescriptionBuilder {
    /// Create a new builder. The graph is an instant query until an interval is set.
    pub fn new<I, S>(
        id: impl Into<String>,
        prometheus_query: impl Into<String>,
        params: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            default_interval: None,
            prometheus_query: prometheus_query.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Make this a range query with the given default window.
    pub fn default_interval(mut self, interval: Duration) -> Self {
        self.default_interval = Some(interval);
        self
    }

    /// Declare one more template parameter.
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.insert(name.into());
        self
    }

    /// Build the description.
    pub fn build(self) -> GraphDescription {
        GraphDescription {
            id: self.id,
            default_interval: self.default_interval,
            prometheus_query: self.prometheus_query,
            params: self.params,
        }
    }
}

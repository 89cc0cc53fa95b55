//! Preparing instant and range queries from graph descriptions.
//!
//! Preparation substitutes parameter values into the query template and picks
//! the query mode. Sending the query to a metrics backend is left to the
//! caller.

use std::collections::BTreeMap;
use std::time::Duration;

use promgraph_types::{format_interval, template, GraphDescription, QueryMode, TemplateError};
use serde::Serialize;

use crate::{validate, CatalogError};

/// Parameter that range graphs fill from their default interval when no
/// value is supplied.
pub const INTERVAL_PARAM: &str = "interval";

/// A fully rendered query, ready to be sent to a metrics backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PreparedQuery {
    /// Ask for the current value.
    Instant { id: String, query: String },
    /// Ask for samples covering `range` up to now.
    Range {
        id: String,
        query: String,
        #[serde(serialize_with = "serialize_range")]
        range: Duration,
    },
}

fn serialize_range<S>(range: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&format_interval(*range))
}

impl PreparedQuery {
    /// Id of the graph this query was prepared from.
    pub fn id(&self) -> &str {
        match self {
            PreparedQuery::Instant { id, .. } | PreparedQuery::Range { id, .. } => id,
        }
    }

    /// The rendered query text.
    pub fn query(&self) -> &str {
        match self {
            PreparedQuery::Instant { query, .. } | PreparedQuery::Range { query, .. } => query,
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, PreparedQuery::Range { .. })
    }

    /// Window of a range query.
    pub fn range(&self) -> Option<Duration> {
        match self {
            PreparedQuery::Range { range, .. } => Some(*range),
            PreparedQuery::Instant { .. } => None,
        }
    }

    /// Replace the window of a range query. Instant queries are returned unchanged.
    pub fn with_range(self, new_range: Duration) -> Self {
        match self {
            PreparedQuery::Range { id, query, .. } => PreparedQuery::Range {
                id,
                query,
                range: new_range,
            },
            instant => instant,
        }
    }
}

/// Render `desc` with `values` and choose instant or range mode.
///
/// For range graphs that declare an `interval` parameter, a missing value
/// defaults to the graph's default interval in Prometheus notation.
pub fn prepare(
    desc: &GraphDescription,
    values: &BTreeMap<String, String>,
) -> Result<PreparedQuery, CatalogError> {
    let mut values = values.clone();
    if let QueryMode::Range(interval) = desc.query_mode() {
        if desc.has_param(INTERVAL_PARAM) {
            values
                .entry(INTERVAL_PARAM.to_string())
                .or_insert_with(|| format_interval(interval));
        }
    }

    validate::check_values(desc, &values)?;

    let query = template::render(desc.prometheus_query(), |name| values.get(name).cloned())
        .map_err(|source| match source {
            TemplateError::Unresolved(name) => CatalogError::UnknownParameter {
                id: desc.id().to_string(),
                name,
            },
            source => CatalogError::MalformedTemplate {
                id: desc.id().to_string(),
                source,
            },
        })?;

    let id = desc.id().to_string();
    Ok(match desc.query_mode() {
        QueryMode::Instant => PreparedQuery::Instant { id, query },
        QueryMode::Range(range) => PreparedQuery::Range { id, query, range },
    })
}

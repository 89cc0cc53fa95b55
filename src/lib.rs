//! # promgraph
//!
//! A catalogue of graphs backed by a Prometheus-compatible metrics store.
//!
//! Each graph is a [`GraphDescription`]: an id, a PromQL template, the names
//! of the template's parameters, and an optional default interval that makes
//! the graph a range query instead of an instant one. This crate collects
//! descriptions into a [`GraphRegistry`], checks them, and turns them into
//! [`PreparedQuery`] values that a query executor can send to the backend.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    ┌────────────────┐    ┌──────────────┐
//! │   settings   │───▶│    registry    │───▶│    query     │───▶ PreparedQuery
//! │ (TOML + env) │    │ (id → graph)   │    │  (render)    │
//! └──────────────┘    └───────┬────────┘    └──────────────┘
//!        ▲                    │
//!    defaults                 ▼
//!  (Kafka graphs)         validate
//! ```
//!
//! - **[`settings`]**: loads extra graphs and strictness from a file via the `config` crate
//! - **[`defaults`]**: the bundled Kafka cluster graphs
//! - **[`registry`]**: id-keyed collection enforcing unique, non-empty ids
//! - **[`validate`]**: structural checks and params/placeholder drift detection
//! - **[`query`]**: parameter substitution and instant/range selection
//!
//! ## Usage
//!
//! ```
//! use std::collections::BTreeMap;
//! use promgraph::{prepare, GraphRegistry};
//!
//! let registry = GraphRegistry::with_defaults().unwrap();
//! let graph = registry.require("bytes-in-rate").unwrap();
//!
//! let query = prepare(graph, &BTreeMap::new()).unwrap();
//! assert!(query.is_range());
//! assert_eq!(query.query(), "rate(kafka_bytes_in[5m])");
//! ```

pub mod defaults;
pub mod error;
pub mod query;
pub mod registry;
pub mod settings;
pub mod validate;

pub use error::CatalogError;
pub use query::{prepare, PreparedQuery};
pub use registry::GraphRegistry;
pub use settings::{GraphEntry, Settings};

// Re-export types for convenience
pub use promgraph_types::{GraphDescription, GraphDescriptionBuilder, QueryMode, NO_PARAMS};

//! # promgraph-types
//!
//! Core types for describing graphs backed by a Prometheus-compatible
//! metrics store. A [`GraphDescription`] names one chart, carries the query
//! template sent to the backend, and tells consumers whether the chart is an
//! instant value or a time-ranged series.
//!
//! ## Design Goals
//!
//! - **Immutable values**: descriptions are built once and only read afterwards
//! - **No mode flag**: the query mode is derived from the optional default interval
//! - **Optional serialization**: enable the `serde` feature as needed
//! - **Ergonomic builders**: fluent API with the mandatory fields up front
//!
//! ## Features
//!
//! - `serde`: JSON/TOML/etc. serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use promgraph_types::{GraphDescription, NO_PARAMS};
//! use std::time::Duration;
//!
//! let instant =
//!     GraphDescription::builder("broker-count", r#"count(up{job="kafka"})"#, NO_PARAMS).build();
//! assert!(!instant.is_range());
//!
//! let ranged = GraphDescription::builder("bytes-in-rate", "rate(kafka_bytes_in[$interval])", ["interval"])
//!     .default_interval(Duration::from_secs(300))
//!     .build();
//! assert!(ranged.is_range());
//! ```

mod description;
pub mod interval;
pub mod template;

pub use description::*;
pub use interval::{format_interval, parse_interval, IntervalError};
pub use template::TemplateError;

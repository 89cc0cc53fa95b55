//! Built-in graphs for Kafka clusters.

use std::time::Duration;

use promgraph_types::{GraphDescription, NO_PARAMS};

/// Window for the long-running disk usage series.
const DISK_USAGE_RANGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Window for throughput graphs.
const THROUGHPUT_RANGE: Duration = Duration::from_secs(5 * 60);

/// The graphs bundled with promgraph.
///
/// Ids are unique and every entry passes strict template validation.
pub fn kafka_graphs() -> Vec<GraphDescription> {
    vec![
        GraphDescription::builder("broker-count", r#"count(up{job="kafka"})"#, NO_PARAMS).build(),
        GraphDescription::builder(
            "bytes-in-rate",
            "rate(kafka_bytes_in[$interval])",
            ["interval"],
        )
        .default_interval(THROUGHPUT_RANGE)
        .build(),
        GraphDescription::builder(
            "messages-in-rate",
            r#"sum by (topic) (rate(kafka_server_brokertopicmetrics_messagesin_total{cluster="${cluster}"}[$interval]))"#,
            ["cluster", "interval"],
        )
        .default_interval(THROUGHPUT_RANGE)
        .build(),
        GraphDescription::builder(
            "broker-bytes-disk",
            r#"broker_bytes_disk{cluster="${cluster}"}"#,
            ["cluster"],
        )
        .build(),
        GraphDescription::builder(
            "broker-bytes-disk-ts",
            r#"broker_bytes_disk{cluster="${cluster}"}"#,
            ["cluster"],
        )
        .default_interval(DISK_USAGE_RANGE)
        .build(),
        GraphDescription::builder(
            "topic-bytes-disk",
            r#"topic_bytes_disk{cluster="${cluster}",topic="${topic}"}"#,
            ["cluster", "topic"],
        )
        .build(),
        GraphDescription::builder(
            "topic-bytes-disk-ts",
            r#"topic_bytes_disk{cluster="${cluster}",topic="${topic}"}"#,
            ["cluster", "topic"],
        )
        .default_interval(DISK_USAGE_RANGE)
        .build(),
        GraphDescription::builder(
            "under-replicated-partitions",
            r#"sum(kafka_server_replicamanager_underreplicatedpartitions{cluster="${cluster}"})"#,
            ["cluster"],
        )
        .build(),
    ]
}

//! Checks applied to graph descriptions before they are registered or queried.
//!
//! [`GraphDescription`] itself never validates anything. These checks are the
//! caller-level contract: a description entering a registry must have a
//! non-empty id and query, and its declared parameters should match the
//! placeholders in its template.

use std::collections::BTreeMap;

use promgraph_types::GraphDescription;

use crate::CatalogError;

/// Reject an empty id or an empty query template.
pub fn check_structure(desc: &GraphDescription) -> Result<(), CatalogError> {
    if desc.id().trim().is_empty() {
        return Err(CatalogError::EmptyId);
    }
    if desc.prometheus_query().trim().is_empty() {
        return Err(CatalogError::EmptyQuery {
            id: desc.id().to_string(),
        });
    }
    Ok(())
}

/// Compare the declared parameters with the placeholders in the template.
///
/// Undeclared placeholders are reported before unused parameters, each in
/// name order; only the first problem is returned.
pub fn check_template(desc: &GraphDescription) -> Result<(), CatalogError> {
    let found = desc
        .placeholders()
        .map_err(|source| CatalogError::MalformedTemplate {
            id: desc.id().to_string(),
            source,
        })?;

    if let Some(name) = found.difference(desc.params()).next() {
        return Err(CatalogError::UnknownParameter {
            id: desc.id().to_string(),
            name: name.clone(),
        });
    }
    if let Some(name) = desc.params().difference(&found).next() {
        return Err(CatalogError::UnusedParameter {
            id: desc.id().to_string(),
            name: name.clone(),
        });
    }
    Ok(())
}

/// Structural and template checks together.
pub fn check(desc: &GraphDescription) -> Result<(), CatalogError> {
    check_structure(desc)?;
    check_template(desc)
}

/// Check that every declared parameter has a value and nothing extra was supplied.
///
/// Values are only checked for presence, never for content.
pub fn check_values(
    desc: &GraphDescription,
    values: &BTreeMap<String, String>,
) -> Result<(), CatalogError> {
    if let Some(name) = desc.params().iter().find(|p| !values.contains_key(*p)) {
        return Err(CatalogError::MissingValue {
            id: desc.id().to_string(),
            name: name.clone(),
        });
    }
    if let Some(name) = values.keys().find(|k| !desc.has_param(k)) {
        return Err(CatalogError::UndeclaredValue {
            id: desc.id().to_string(),
            name: name.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use promgraph_types::NO_PARAMS;
    use std::time::Duration;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn structure_accepts_valid() {
        let desc = GraphDescription::builder("broker-count", "count(up)", NO_PARAMS).build();
        assert!(check_structure(&desc).is_ok());
    }

    #[test]
    fn structure_rejects_empty_id() {
        let desc = GraphDescription::builder("  ", "up", NO_PARAMS).build();
        assert!(matches!(check_structure(&desc), Err(CatalogError::EmptyId)));
    }

    #[test]
    fn structure_rejects_empty_query() {
        let desc = GraphDescription::builder("g", "", NO_PARAMS).build();
        match check_structure(&desc) {
            Err(CatalogError::EmptyQuery { id }) => assert_eq!(id, "g"),
            other => panic!("expected EmptyQuery, got {:?}", other),
        }
    }

    #[test]
    fn template_matching_params() {
        let desc = GraphDescription::builder(
            "bytes-in-rate",
            "rate(kafka_bytes_in[$interval])",
            ["interval"],
        )
        .default_interval(Duration::from_secs(300))
        .build();
        assert!(check(&desc).is_ok());
    }

    #[test]
    fn template_unknown_parameter() {
        let desc =
            GraphDescription::builder("g", r#"x{topic="${topic}"}[$interval]"#, ["interval"])
                .build();
        match check_template(&desc) {
            Err(CatalogError::UnknownParameter { id, name }) => {
                assert_eq!(id, "g");
                assert_eq!(name, "topic");
            }
            other => panic!("expected UnknownParameter, got {:?}", other),
        }
    }

    #[test]
    fn template_unused_parameter() {
        let desc = GraphDescription::builder("g", "count(up)", ["cluster"]).build();
        let err = check_template(&desc).unwrap_err();
        assert!(err.is_template_drift());
        assert!(matches!(err, CatalogError::UnusedParameter { ref name, .. } if name == "cluster"));
    }

    #[test]
    fn template_unknown_reported_before_unused() {
        let desc = GraphDescription::builder("g", "x[$interval]", ["topic"]).build();
        assert!(matches!(
            check_template(&desc),
            Err(CatalogError::UnknownParameter { .. })
        ));
    }

    #[test]
    fn template_malformed() {
        let desc = GraphDescription::builder("g", "x{a=\"${a\"", ["a"]).build();
        let err = check_template(&desc).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedTemplate { .. }));
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn values_present() {
        let desc =
            GraphDescription::builder("g", "x{t=\"$topic\"}[$interval]", ["topic", "interval"])
                .build();
        let supplied = values(&[("topic", "orders"), ("interval", "1m")]);
        assert!(check_values(&desc, &supplied).is_ok());
    }

    #[test]
    fn values_missing() {
        let desc = GraphDescription::builder("g", "x{t=\"$topic\"}", ["topic"]).build();
        let err = check_values(&desc, &BTreeMap::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "graph 'g' requires a value for parameter 'topic'"
        );
    }

    #[test]
    fn values_undeclared() {
        let desc = GraphDescription::builder("g", "count(up)", NO_PARAMS).build();
        let err = check_values(&desc, &values(&[("topic", "orders")])).unwrap_err();
        assert!(matches!(err, CatalogError::UndeclaredValue { ref name, .. } if name == "topic"));
    }

    #[test]
    fn values_content_is_not_checked() {
        let desc = GraphDescription::builder("g", "x[$interval]", ["interval"]).build();
        assert!(check_values(&desc, &values(&[("interval", "")])).is_ok());
    }
}

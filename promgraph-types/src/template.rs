//! Query template placeholders.
//!
//! A placeholder is written `${name}` or `$name`, where `name` starts with an
//! ASCII letter or underscore followed by letters, digits or underscores.
//! `$$` stands for a literal `$`. Any other `$` (for example the end-of-line
//! anchor in a PromQL regex matcher) is kept as plain text.

use std::collections::BTreeSet;

use thiserror::Error;

/// Errors produced while scanning or rendering a query template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A `${` without a matching `}`.
    #[error("unterminated placeholder starting at byte {position}")]
    Unterminated { position: usize },

    /// The text between `${` and `}` is not a valid parameter name.
    #[error("invalid placeholder name {name:?} at byte {position}")]
    InvalidName { position: usize, name: String },

    /// Rendering found a placeholder with no value.
    #[error("no value for placeholder {0:?}")]
    Unresolved(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Placeholder(&'a str),
}

/// Length of the parameter name at the start of `s`, or 0 if there is none.
fn name_len(s: &str) -> usize {
    s.bytes()
        .enumerate()
        .take_while(|(idx, b)| {
            if *idx == 0 {
                b.is_ascii_alphabetic() || *b == b'_'
            } else {
                b.is_ascii_alphanumeric() || *b == b'_'
            }
        })
        .count()
}

fn segments(template: &str) -> Result<Vec<Segment<'_>>, TemplateError> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut cursor = 0;

    while let Some(offset) = template[cursor..].find('$') {
        let at = cursor + offset;
        let after = &template[at + 1..];

        if after.starts_with('$') {
            // keep the first '$' of the pair as text, drop the second
            out.push(Segment::Text(&template[start..=at]));
            cursor = at + 2;
            start = cursor;
        } else if let Some(braced) = after.strip_prefix('{') {
            let close = braced
                .find('}')
                .ok_or(TemplateError::Unterminated { position: at })?;
            let name = &braced[..close];
            if name.is_empty() || name_len(name) != name.len() {
                return Err(TemplateError::InvalidName {
                    position: at,
                    name: name.to_string(),
                });
            }
            push_text(&mut out, &template[start..at]);
            out.push(Segment::Placeholder(name));
            cursor = at + 2 + close + 1;
            start = cursor;
        } else {
            let len = name_len(after);
            if len > 0 {
                push_text(&mut out, &template[start..at]);
                out.push(Segment::Placeholder(&after[..len]));
                cursor = at + 1 + len;
                start = cursor;
            } else {
                cursor = at + 1;
            }
        }
    }

    push_text(&mut out, &template[start..]);
    Ok(out)
}

fn push_text<'a>(out: &mut Vec<Segment<'a>>, text: &'a str) {
    if !text.is_empty() {
        out.push(Segment::Text(text));
    }
}

/// Collect the distinct placeholder names referenced by `template`.
///
/// ```rust
/// use promgraph_types::template::placeholders;
///
/// let names = placeholders(r#"sum(rate(x{topic="${topic}"}[$interval]))"#).unwrap();
/// assert_eq!(names.into_iter().collect::<Vec<_>>(), ["interval", "topic"]);
/// ```
pub fn placeholders(template: &str) -> Result<BTreeSet<String>, TemplateError> {
    Ok(segments(template)?
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.to_string()),
            Segment::Text(_) => None,
        })
        .collect())
}

/// Substitute every placeholder in `template` with the value from `lookup`.
///
/// Fails with [`TemplateError::Unresolved`] on the first placeholder for which
/// `lookup` returns `None`.
pub fn render<F>(template: &str, mut lookup: F) -> Result<String, TemplateError>
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    for segment in segments(template)? {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Placeholder(name) => {
                let value =
                    lookup(name).ok_or_else(|| TemplateError::Unresolved(name.to_string()))?;
                out.push_str(&value);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn names(template: &str) -> Vec<String> {
        placeholders(template).unwrap().into_iter().collect()
    }

    #[test]
    fn bare_placeholder() {
        assert_eq!(names("rate(kafka_bytes_in[$interval])"), ["interval"]);
    }

    #[test]
    fn braced_placeholder() {
        assert_eq!(
            names(r#"broker_bytes_disk{cluster="${cluster}"}"#),
            ["cluster"]
        );
    }

    #[test]
    fn duplicates_collapse() {
        assert_eq!(names("$a + ${a} + $b"), ["a", "b"]);
    }

    #[test]
    fn no_placeholders() {
        assert!(placeholders(r#"count(up{job="kafka"})"#).unwrap().is_empty());
    }

    #[test]
    fn double_dollar_is_literal() {
        assert!(placeholders("cost_$$total").unwrap().is_empty());
        let out = render("cost_$$total", |_| None).unwrap();
        assert_eq!(out, "cost_$total");
    }

    #[test]
    fn regex_anchor_is_text() {
        let template = r#"up{job=~"kafka.*$"}"#;
        assert!(placeholders(template).unwrap().is_empty());
        assert_eq!(render(template, |_| None).unwrap(), template);
    }

    #[test]
    fn unterminated_brace_fails() {
        assert_eq!(
            placeholders("sum(${job"),
            Err(TemplateError::Unterminated { position: 4 })
        );
    }

    #[test]
    fn invalid_braced_name_fails() {
        assert_eq!(
            placeholders("x{a=\"${}\"}"),
            Err(TemplateError::InvalidName {
                position: 5,
                name: String::new(),
            })
        );
        assert!(matches!(
            placeholders("${1abc}"),
            Err(TemplateError::InvalidName { .. })
        ));
        assert!(matches!(
            placeholders("${a-b}"),
            Err(TemplateError::InvalidName { .. })
        ));
    }

    #[test]
    fn render_substitutes_values() {
        let values: BTreeMap<&str, &str> = [("interval", "5m"), ("topic", "orders")].into();
        let out = render(
            r#"rate(bytes{topic="${topic}"}[$interval])"#,
            |name| values.get(name).map(|v| v.to_string()),
        )
        .unwrap();
        assert_eq!(out, r#"rate(bytes{topic="orders"}[5m])"#);
    }

    #[test]
    fn render_unresolved_fails() {
        let err = render("rate(x[$interval])", |_| None).unwrap_err();
        assert_eq!(err, TemplateError::Unresolved("interval".to_string()));
    }

    #[test]
    fn bare_name_stops_at_punctuation() {
        assert_eq!(names("$topic_name-suffix"), ["topic_name"]);
    }
}

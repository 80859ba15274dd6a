//! Filter expression rendering.
//!
//! The backend accepts a restricted grammar: `field op 'value'` clauses,
//! operators in {eq, ne, gt, ge, lt, le}, string values single-quoted
//! with embedded single quotes doubled. Client text reaches the wire
//! only through `render`, which quotes it; nothing else in this crate
//! concatenates query text into an expression.

use quarry_core::errors::BackendError;
use quarry_core::models::FieldFilter;

/// Render clauses into one backend filter expression, or `None` when
/// there are no clauses.
pub fn render(filters: &[FieldFilter]) -> Result<Option<String>, BackendError> {
    if filters.is_empty() {
        return Ok(None);
    }
    let clauses: Vec<String> = filters
        .iter()
        .map(render_clause)
        .collect::<Result<_, _>>()?;
    Ok(Some(clauses.join(" and ")))
}

fn render_clause(filter: &FieldFilter) -> Result<String, BackendError> {
    validate_field(&filter.field)?;
    validate_value(&filter.value)?;
    Ok(format!(
        "{} {} '{}'",
        filter.field,
        filter.op.as_str(),
        escape(&filter.value)
    ))
}

/// Field names come from the engine, never from clients, but a typo must
/// not become an injection vector either.
fn validate_field(field: &str) -> Result<(), BackendError> {
    let ok = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ok {
        Ok(())
    } else {
        Err(BackendError::InvalidFilter {
            reason: format!("bad filter field name: {field:?}"),
        })
    }
}

fn validate_value(value: &str) -> Result<(), BackendError> {
    if value.chars().any(char::is_control) {
        return Err(BackendError::InvalidFilter {
            reason: "filter value contains control characters".into(),
        });
    }
    Ok(())
}

/// Double embedded single quotes, the grammar's only escape.
fn escape(value: &str) -> String {
    value.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_core::models::{FieldFilter, FilterOp};

    #[test]
    fn plain_value_renders_quoted() {
        let rendered = render(&[FieldFilter::eq("repository", "my-repo")])
            .unwrap()
            .unwrap();
        assert_eq!(rendered, "repository eq 'my-repo'");
    }

    #[test]
    fn injection_attempt_stays_inside_the_literal() {
        let rendered = render(&[FieldFilter::eq("repository", "x' or 1 eq 1 --")])
            .unwrap()
            .unwrap();
        assert_eq!(rendered, "repository eq 'x'' or 1 eq 1 --'");
    }

    #[test]
    fn multiple_clauses_join_with_and() {
        let filters = vec![
            FieldFilter::eq("repository", "repo"),
            FieldFilter {
                field: "language".into(),
                op: FilterOp::Ne,
                value: "markdown".into(),
            },
        ];
        let rendered = render(&filters).unwrap().unwrap();
        assert_eq!(rendered, "repository eq 'repo' and language ne 'markdown'");
    }

    #[test]
    fn control_characters_are_rejected() {
        let err = render(&[FieldFilter::eq("repository", "a\nb")]).unwrap_err();
        assert!(matches!(err, BackendError::InvalidFilter { .. }));
    }

    #[test]
    fn bad_field_name_is_rejected() {
        let err = render(&[FieldFilter::eq("repo name", "x")]).unwrap_err();
        assert!(matches!(err, BackendError::InvalidFilter { .. }));
    }

    #[test]
    fn no_filters_renders_nothing() {
        assert_eq!(render(&[]).unwrap(), None);
    }
}

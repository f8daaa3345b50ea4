//! Props extraction from a component's parameter list.
//!
//! Destructured props are split with an explicit depth-tracking scan: nested
//! object/array defaults (`b = { c: 1, d: [2, 3] }`) and nested
//! destructuring must not end the scan early, which a single regex cannot
//! guarantee.

use super::source::{find_matching, ident_len, split_top_level};

/// What the first parameter of a component looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropsShape {
    /// No parameters at all.
    None,
    /// `({ a, b })` - top-level keys in source order.
    Destructured(Vec<String>),
    /// `(props)` - props are read off the object as a whole.
    Identifier(String),
}

impl PropsShape {
    /// Prop names as recorded in a component record.
    pub fn into_names(self) -> Vec<String> {
        match self {
            PropsShape::Destructured(names) => names,
            PropsShape::None | PropsShape::Identifier(_) => Vec::new(),
        }
    }
}

/// The parameter text could not be scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PropsError {
    /// A bracket in the parameter list never closes (or closes twice).
    #[error("unbalanced brackets in parameter list")]
    Unbalanced,
}

/// Inspect the first parameter in `params` (masked text between the parens).
pub fn extract_props(params: &str) -> Result<PropsShape, PropsError> {
    let parts = split_top_level(params).ok_or(PropsError::Unbalanced)?;
    let first = parts.first().map(|p| p.trim()).unwrap_or("");

    if first.is_empty() {
        return Ok(PropsShape::None);
    }

    if first.starts_with('{') {
        let close = find_matching(first, 0).ok_or(PropsError::Unbalanced)?;
        return destructured_keys(&first[1..close]).map(PropsShape::Destructured);
    }

    let n = ident_len(first);
    if n > 0 {
        return Ok(PropsShape::Identifier(first[..n].to_string()));
    }

    // array destructuring or something exotic
    Ok(PropsShape::None)
}

/// Top-level keys of an object pattern body, deduplicated in order.
fn destructured_keys(inner: &str) -> Result<Vec<String>, PropsError> {
    let entries = split_top_level(inner).ok_or(PropsError::Unbalanced)?;
    let mut keys: Vec<String> = Vec::new();

    for entry in entries {
        let entry = entry.trim();
        if entry.is_empty() || entry.starts_with("...") {
            continue;
        }
        let n = ident_len(entry);
        if n == 0 {
            continue;
        }
        let key = &entry[..n];
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }

    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(params: &str) -> Vec<String> {
        extract_props(params).unwrap().into_names()
    }

    #[test]
    fn test_simple_destructuring() {
        assert_eq!(names("{ user, onSelect }"), vec!["user", "onSelect"]);
    }

    #[test]
    fn test_nested_defaults_do_not_split_early() {
        assert_eq!(names("{ a, b = { c: 1, d: [2,3] } }"), vec!["a", "b"]);
    }

    #[test]
    fn test_nested_destructuring_and_renames() {
        assert_eq!(
            names("{ user: { name, email }, items = [], onClick: handle, ...rest }"),
            vec!["user", "items", "onClick"]
        );
    }

    #[test]
    fn test_type_annotation_after_pattern() {
        assert_eq!(
            names("{ title, size = 'md' }: { title: string; size?: Size }"),
            vec!["title", "size"]
        );
    }

    #[test]
    fn test_default_callbacks_with_parens() {
        assert_eq!(
            names("{ onChange = (v) => set(v, { silent: true }), label }"),
            vec!["onChange", "label"]
        );
    }

    #[test]
    fn test_identifier_and_empty() {
        assert_eq!(
            extract_props("props").unwrap(),
            PropsShape::Identifier("props".to_string())
        );
        assert_eq!(extract_props("  ").unwrap(), PropsShape::None);
        assert!(names("props, ref").is_empty());
    }

    #[test]
    fn test_second_parameter_ignored() {
        assert_eq!(names("{ label }, ref"), vec!["label"]);
    }

    #[test]
    fn test_unbalanced_reports_error() {
        assert_eq!(extract_props("{ a, b = { c: 1 }"), Err(PropsError::Unbalanced));
        assert_eq!(extract_props("{ a ] }"), Err(PropsError::Unbalanced));
    }

    #[test]
    fn test_error_message() {
        let err: Box<dyn std::error::Error> = Box::new(PropsError::Unbalanced);
        assert_eq!(err.to_string(), "unbalanced brackets in parameter list");
    }

    #[test]
    fn test_duplicates_removed() {
        assert_eq!(names("{ a, a, b }"), vec!["a", "b"]);
    }
}

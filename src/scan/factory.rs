//! Body-based rejection of factories, instances and utility functions.
//!
//! Runs after the name rules. Checks are ordered: an object-literal return
//! is a stronger signal than the absence of markup, so `factory` is tested
//! before `utility`.

use lazy_static::lazy_static;
use regex::Regex;

use super::declarations::{CandidateDeclaration, DeclarationKind};
use super::source::{find_matching, skip_ws, DepthCursor};
use super::{ReasonCode, Verdict};

lazy_static! {
    /// `<Tag` or `<>` in expression position.
    static ref MARKUP: Regex =
        Regex::new(r"(?:^|[(\[{,?:=&|>]|\breturn)\s*<(?:[A-Za-z][\w.:-]*|>)").unwrap();

    /// `return {` or `return ({`
    static ref RETURN_OBJECT: Regex = Regex::new(r"\breturn\s*\(?\s*\{").unwrap();
}

/// One entry of the body rule table.
pub struct BodyRule {
    pub reason: ReasonCode,
    pub rejects: fn(&CandidateDeclaration<'_>) -> bool,
}

/// The ordered body rule table.
pub static BODY_RULES: &[BodyRule] = &[
    BodyRule {
        reason: ReasonCode::Factory,
        rejects: returns_plain_object,
    },
    BodyRule {
        reason: ReasonCode::Instance,
        rejects: is_instance,
    },
    BodyRule {
        reason: ReasonCode::Utility,
        rejects: |c| !contains_markup(c.masked_body),
    },
];

/// Run the body rules against a candidate that passed the name rules.
pub fn detect_factory(candidate: &CandidateDeclaration<'_>) -> Verdict {
    BODY_RULES
        .iter()
        .find(|rule| (rule.rejects)(candidate))
        .map_or(Verdict::Accepted, |rule| Verdict::Rejected(rule.reason))
}

/// True if the masked text contains a markup-shaped expression.
///
/// Comparisons (`a < b`) and type arguments (`useState<string>()`) do not
/// count: the `<` must follow an operator, an opening bracket or `return`.
pub fn contains_markup(masked: &str) -> bool {
    MARKUP.is_match(masked)
}

/// `const x = Name(...)` where `Name` is PascalCase.
pub fn is_instance(candidate: &CandidateDeclaration<'_>) -> bool {
    match &candidate.kind {
        DeclarationKind::ConstCall { callee } => is_pascal_case(callee),
        _ => false,
    }
}

/// Uppercase initial, alphanumeric only, with at least one lowercase letter.
pub fn is_pascal_case(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase())
        && name.chars().all(|c| c.is_ascii_alphanumeric())
        && name.chars().any(|c| c.is_ascii_lowercase())
}

/// A top-level `return { ... }` (or `=> ({ ... })`) without markup inside.
fn returns_plain_object(candidate: &CandidateDeclaration<'_>) -> bool {
    let body = candidate.masked_body;

    if candidate.expression_body {
        let open = skip_ws(body, 0);
        if body.as_bytes().get(open) != Some(&b'(') {
            return false;
        }
        let brace = skip_ws(body, open + 1);
        return body.as_bytes().get(brace) == Some(&b'{') && object_without_markup(body, brace);
    }

    if !candidate.kind.is_function_like() {
        return false;
    }

    // Only statements directly in the function block count; returns inside
    // callbacks or nested blocks belong to other scopes.
    let mut cursor = DepthCursor::new(body);
    RETURN_OBJECT.find_iter(body).any(|m| {
        cursor.depth_at(m.start()) == 1 && object_without_markup(body, m.end() - 1)
    })
}

fn object_without_markup(body: &str, brace: usize) -> bool {
    match find_matching(body, brace) {
        Some(close) => !contains_markup(&body[brace + 1..close]),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::declarations::scan_declarations;
    use crate::scan::source::PreparedSource;

    fn verdict(src: &str) -> Verdict {
        let prepared = PreparedSource::new(src);
        let candidates = scan_declarations(&prepared);
        detect_factory(&candidates[0])
    }

    #[test]
    fn test_markup_shapes() {
        assert!(contains_markup("return <div />"));
        assert!(contains_markup("<>{children}</>"));
        assert!(contains_markup("(<Foo.Bar x={1} />)"));
        assert!(contains_markup("cond && <Spinner />"));
        assert!(contains_markup("ok ? <A /> : <B />"));
        assert!(!contains_markup("if (a < b) return a"));
        assert!(!contains_markup("const [s] = useState<string>('')"));
        assert!(!contains_markup("return i<length"));
    }

    #[test]
    fn test_factory_return_rejected() {
        let v = verdict(
            "function OpenPay() { const generateToken = () => 1; return { generateToken }; }",
        );
        assert_eq!(v, Verdict::Rejected(ReasonCode::Factory));
    }

    #[test]
    fn test_factory_wins_over_incidental_markup() {
        let v = verdict(
            "function Api() { const tpl = (<div />); return { render: () => tpl, url: 'x' }; }",
        );
        assert_eq!(v, Verdict::Rejected(ReasonCode::Factory));
    }

    #[test]
    fn test_arrow_returning_object_literal() {
        let v = verdict("const Store = () => ({ items: [], add(x) { this.items.push(x); } });");
        assert_eq!(v, Verdict::Rejected(ReasonCode::Factory));
    }

    #[test]
    fn test_object_with_markup_is_not_factory() {
        let v = verdict("function Slots() { return { header: <Header />, body: null }; }");
        assert_eq!(v, Verdict::Accepted);
    }

    #[test]
    fn test_nested_object_returns_ignored() {
        let v = verdict(
            r#"function Counter() {
  const [s, set] = useState({ n: 0 });
  const inc = () => set(prev => { return { n: prev.n + 1 }; });
  return <button onClick={inc}>{s.n}</button>;
}"#,
        );
        assert_eq!(v, Verdict::Accepted);
    }

    #[test]
    fn test_instance_rejected() {
        let v = verdict("const openPay = OpenPay();");
        assert_eq!(v, Verdict::Rejected(ReasonCode::Instance));
        let v = verdict("const client = createClient();");
        assert_eq!(v, Verdict::Rejected(ReasonCode::Utility));
    }

    #[test]
    fn test_utility_without_markup() {
        let v = verdict("function Formatter(value) { return String(value).trim(); }");
        assert_eq!(v, Verdict::Rejected(ReasonCode::Utility));
    }

    #[test]
    fn test_markup_in_strings_does_not_count() {
        let v = verdict("function Template() { return '<div>' + \"<span/>\"; }");
        assert_eq!(v, Verdict::Rejected(ReasonCode::Utility));
    }

    #[test]
    fn test_pascal_case() {
        assert!(is_pascal_case("OpenPay"));
        assert!(is_pascal_case("Form2FA"));
        assert!(!is_pascal_case("OPEN_PAY"));
        assert!(!is_pascal_case("URL"));
        assert!(!is_pascal_case("openPay"));
        assert!(!is_pascal_case("Api.create"));
    }
}

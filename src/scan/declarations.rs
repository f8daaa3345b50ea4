//! Enumeration of top-level candidate declarations.
//!
//! Recognized shapes:
//! - `function Name(...) { ... }` (optionally `export`, `export default`, `async`)
//! - `const Name = (...) => ...` and `const Name = param => ...`
//! - `const Name = function (...) { ... }`
//! - `const Name = memo(...)` / `forwardRef(...)` wrapping one of the above
//! - `const name = Callee(...)` and any other `const`/`let`/`var` initializer
//!
//! All matching runs on the masked text, so declarations inside comments or
//! strings are never picked up.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::ops::Range;

use super::source::{find_matching, ident_len, skip_ws, DepthCursor, PreparedSource};

lazy_static! {
    static ref FUNCTION_DECL: Regex = Regex::new(
        r"\b(?:(export)\s+(?:(default)\s+)?)?(?:async\s+)?function\b\s*\*?\s*([A-Za-z_$][\w$]*)"
    )
    .unwrap();
    static ref VARIABLE_DECL: Regex = Regex::new(
        r"\b(?:(export)\s+)?(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*"
    )
    .unwrap();
    static ref EXPORT_DEFAULT_IDENT: Regex =
        Regex::new(r"(?m)\bexport\s+default\s+([A-Za-z_$][\w$]*)\s*(?:;|$)").unwrap();
    static ref EXPORT_LIST: Regex = Regex::new(r"\bexport\s*\{([^}]*)\}").unwrap();
    static ref STATEMENT_START: Regex = Regex::new(
        r"^(?:export|const|let|var|function|import|class|async|type|interface|enum|declare)\b"
    )
    .unwrap();
    static ref CALLEE_PATH: Regex = Regex::new(r"^[A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*").unwrap();
}

/// Wrappers whose first argument is the component function itself.
const COMPONENT_WRAPPERS: &[&str] = &["memo", "forwardRef"];

/// Syntactic shape of a candidate declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationKind {
    /// `function Name(...) { ... }`
    FunctionDeclaration,
    /// `const Name = (...) => ...`
    ConstArrow,
    /// `const Name = function (...) { ... }`
    ConstFunctionExpr,
    /// `const name = Callee(...)`
    ConstCall { callee: String },
    /// Any other initializer (literal, object, tagged template, ...).
    ConstValue,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::FunctionDeclaration => "function_declaration",
            DeclarationKind::ConstArrow => "const_arrow",
            DeclarationKind::ConstFunctionExpr => "const_function_expr",
            DeclarationKind::ConstCall { .. } => "const_call",
            DeclarationKind::ConstValue => "const_value",
        }
    }

    /// True for declarations that define a function.
    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            DeclarationKind::FunctionDeclaration
                | DeclarationKind::ConstArrow
                | DeclarationKind::ConstFunctionExpr
        )
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Byte range of a declaration plus its starting line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    pub start_byte: usize,
    pub end_byte: usize,
    /// 1-indexed.
    pub line: usize,
}

/// One scanned declaration, borrowing from the prepared source.
#[derive(Debug, Clone)]
pub struct CandidateDeclaration<'a> {
    pub name: &'a str,
    pub kind: DeclarationKind,
    /// Original body text (block, expression or initializer).
    pub body_text: &'a str,
    /// Masked view of the body.
    pub masked_body: &'a str,
    /// Masked text between the parameter parens, or a bare parameter name.
    /// `None` when the declaration has no parameter list.
    pub params_text: Option<&'a str>,
    /// Arrow function with an expression body (`=> (...)`).
    pub expression_body: bool,
    /// The parameter list or body never closed before end of input.
    pub header_unbalanced: bool,
    pub is_exported: bool,
    pub is_default_export: bool,
    pub span: SourceSpan,
}

/// Parsed function signature and body ranges.
#[derive(Debug, Clone)]
struct FunctionShape {
    kind: DeclarationKind,
    params: Option<Range<usize>>,
    body: Range<usize>,
    expression_body: bool,
    unbalanced: bool,
}

impl FunctionShape {
    /// Parameter list that never closes: the body runs to end of input.
    fn unclosed(kind: DeclarationKind, open: usize, len: usize) -> Self {
        Self {
            kind,
            params: None,
            body: open..len,
            expression_body: false,
            unbalanced: true,
        }
    }
}

enum RawMatch {
    Function {
        start: usize,
        exported: bool,
        default: bool,
        name: Range<usize>,
    },
    Variable {
        start: usize,
        exported: bool,
        name: Range<usize>,
        init: usize,
    },
}

impl RawMatch {
    fn start(&self) -> usize {
        match self {
            RawMatch::Function { start, .. } | RawMatch::Variable { start, .. } => *start,
        }
    }
}

/// Enumerate top-level candidate declarations in source order.
pub fn scan_declarations<'a>(source: &'a PreparedSource<'_>) -> Vec<CandidateDeclaration<'a>> {
    let masked = source.masked();
    let mut raw: Vec<RawMatch> = Vec::new();

    for caps in FUNCTION_DECL.captures_iter(masked) {
        let (Some(all), Some(name)) = (caps.get(0), caps.get(3)) else {
            continue;
        };
        raw.push(RawMatch::Function {
            start: all.start(),
            exported: caps.get(1).is_some(),
            default: caps.get(2).is_some(),
            name: name.range(),
        });
    }

    for caps in VARIABLE_DECL.captures_iter(masked) {
        let (Some(all), Some(name)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let Some(init) = initializer_start(masked, all.end()) else {
            continue;
        };
        raw.push(RawMatch::Variable {
            start: all.start(),
            exported: caps.get(1).is_some(),
            name: name.range(),
            init,
        });
    }

    raw.sort_by_key(RawMatch::start);

    let mut cursor = DepthCursor::new(masked);
    let mut last_end = 0;
    let mut candidates = Vec::new();

    for m in raw {
        if m.start() < last_end || cursor.depth_at(m.start()) != 0 {
            continue;
        }
        let candidate = match m {
            RawMatch::Function {
                start,
                exported,
                default,
                name,
            } => function_declaration(source, start, exported, default, name),
            RawMatch::Variable {
                start,
                exported,
                name,
                init,
            } => variable_declaration(source, start, exported, name, init),
        };
        if let Some(c) = candidate {
            last_end = c.span.end_byte;
            candidates.push(c);
        }
    }

    mark_exports(masked, &mut candidates);
    candidates
}

fn function_declaration<'a>(
    source: &'a PreparedSource<'_>,
    start: usize,
    exported: bool,
    default: bool,
    name: Range<usize>,
) -> Option<CandidateDeclaration<'a>> {
    let masked = source.masked();
    if !at_statement_position(masked, start) {
        return None;
    }
    let shape = parse_function_tail(
        masked,
        skip_ws(masked, name.end),
        DeclarationKind::FunctionDeclaration,
    )?;
    let end = shape.body.end;
    Some(build_candidate(
        source, start, end, name, shape, exported, default,
    ))
}

fn variable_declaration<'a>(
    source: &'a PreparedSource<'_>,
    start: usize,
    exported: bool,
    name: Range<usize>,
    init: usize,
) -> Option<CandidateDeclaration<'a>> {
    let masked = source.masked();
    let init = skip_ws(masked, init);

    if let Some(shape) = parse_arrow_or_function(masked, init) {
        let end = if shape.expression_body {
            shape.body.end
        } else {
            statement_end(masked, shape.body.end)
        };
        return Some(build_candidate(
            source, start, end, name, shape, exported, false,
        ));
    }

    let end = statement_end(masked, init);
    let call_open = |path_end: usize| skip_generics(masked, skip_ws(masked, init + path_end));
    let kind = match CALLEE_PATH.find(&masked[init..]) {
        Some(path) if masked.as_bytes().get(call_open(path.end())) == Some(&b'(') => {
            let callee = path.as_str();
            let open = call_open(path.end());
            let last_segment = callee.rsplit('.').next().unwrap_or(callee);
            if COMPONENT_WRAPPERS.contains(&last_segment) {
                let inner = parse_arrow_or_function(masked, skip_ws(masked, open + 1));
                if let Some(shape) = inner {
                    return Some(build_candidate(
                        source, start, end, name, shape, exported, false,
                    ));
                }
            }
            DeclarationKind::ConstCall {
                callee: callee.to_string(),
            }
        }
        _ => DeclarationKind::ConstValue,
    };

    let shape = FunctionShape {
        kind,
        params: None,
        body: init..end.max(init),
        expression_body: false,
        unbalanced: false,
    };
    Some(build_candidate(
        source, start, end, name, shape, exported, false,
    ))
}

fn build_candidate<'a>(
    source: &'a PreparedSource<'_>,
    start: usize,
    end: usize,
    name: Range<usize>,
    shape: FunctionShape,
    exported: bool,
    default: bool,
) -> CandidateDeclaration<'a> {
    let text = source.text();
    let masked = source.masked();
    let body = shape.body.start.min(text.len())..shape.body.end.min(text.len());

    CandidateDeclaration {
        name: &text[name],
        kind: shape.kind,
        body_text: &text[body.clone()],
        masked_body: &masked[body],
        params_text: shape.params.map(|p| &masked[p]),
        expression_body: shape.expression_body,
        header_unbalanced: shape.unbalanced,
        is_exported: exported || default,
        is_default_export: default,
        span: SourceSpan {
            start_byte: start,
            end_byte: end.max(start),
            line: source.line_of(start),
        },
    }
}

/// Parse `<T>(params): Ret { body }` beginning at `pos`.
///
/// Returns `None` for bodiless signatures (`function f(a): T;`).
fn parse_function_tail(masked: &str, pos: usize, kind: DeclarationKind) -> Option<FunctionShape> {
    let open = skip_generics(masked, pos);
    if masked.as_bytes().get(open) != Some(&b'(') {
        return None;
    }
    let Some(close) = find_matching(masked, open) else {
        return Some(FunctionShape::unclosed(kind, open, masked.len()));
    };

    let brace = close + 1 + masked[close + 1..].find(|c| c == '{' || c == ';')?;
    if masked.as_bytes()[brace] == b';' {
        return None;
    }

    let (body_end, unbalanced) = match find_matching(masked, brace) {
        Some(end) => (end + 1, false),
        None => (masked.len(), true),
    };

    Some(FunctionShape {
        kind,
        params: Some(open + 1..close),
        body: brace..body_end,
        expression_body: false,
        unbalanced,
    })
}

/// Parse an arrow function or function expression starting at `pos`.
fn parse_arrow_or_function(masked: &str, pos: usize) -> Option<FunctionShape> {
    let bytes = masked.as_bytes();
    let mut pos = pos;
    if word_at(masked, pos, "async") {
        pos = skip_ws(masked, pos + "async".len());
    }

    if word_at(masked, pos, "function") {
        let mut p = skip_ws(masked, pos + "function".len());
        if bytes.get(p) == Some(&b'*') {
            p = skip_ws(masked, p + 1);
        }
        p = skip_ws(masked, p + ident_len(&masked[p..]));
        return parse_function_tail(masked, p, DeclarationKind::ConstFunctionExpr);
    }

    let p = skip_generics(masked, pos);
    let (params, after) = match bytes.get(p) {
        Some(b'(') => {
            let close = find_matching(masked, p)?;
            (p + 1..close, skip_ws(masked, close + 1))
        }
        Some(&b) if b.is_ascii_alphabetic() || b == b'_' || b == b'$' => {
            let n = ident_len(&masked[p..]);
            (p..p + n, skip_ws(masked, p + n))
        }
        _ => return None,
    };

    let arrow = if masked[after..].starts_with("=>") {
        after
    } else if masked[after..].starts_with(':') {
        // return type annotation
        let rel = masked[after..].find("=>")?;
        if masked[after..after + rel].contains(';') {
            return None;
        }
        after + rel
    } else {
        return None;
    };

    let body_start = skip_ws(masked, arrow + 2);
    if bytes.get(body_start) == Some(&b'{') {
        let (body_end, unbalanced) = match find_matching(masked, body_start) {
            Some(end) => (end + 1, false),
            None => (masked.len(), true),
        };
        return Some(FunctionShape {
            kind: DeclarationKind::ConstArrow,
            params: Some(params),
            body: body_start..body_end,
            expression_body: false,
            unbalanced,
        });
    }

    Some(FunctionShape {
        kind: DeclarationKind::ConstArrow,
        params: Some(params),
        body: body_start..statement_end(masked, body_start),
        expression_body: true,
        unbalanced: false,
    })
}

/// Skip a `<...>` type parameter list at `pos`, if present.
fn skip_generics(masked: &str, pos: usize) -> usize {
    let bytes = masked.as_bytes();
    if bytes.get(pos) != Some(&b'<') {
        return pos;
    }
    // object types inside the list (`<P, { a: T }>`) nest with braces
    let mut angle = 0usize;
    let mut brace = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(pos) {
        match b {
            b'{' => brace += 1,
            b'}' => match brace.checked_sub(1) {
                Some(d) => brace = d,
                None => break,
            },
            b'<' if brace == 0 => angle += 1,
            b'>' if brace == 0 && bytes[i - 1] != b'=' => {
                angle -= 1;
                if angle == 0 {
                    return skip_ws(masked, i + 1);
                }
            }
            b';' | b'(' if brace == 0 => break,
            _ => {}
        }
    }
    pos
}

/// Offset just past the `=` that opens a variable's initializer.
///
/// `pos` is right after the variable name. A type annotation is skipped
/// bracket by bracket, so function types (`(v: string) => void`) and object
/// types inside it do not end it early.
fn initializer_start(masked: &str, pos: usize) -> Option<usize> {
    let bytes = masked.as_bytes();
    let assignment =
        |i: usize| bytes.get(i) == Some(&b'=') && !matches!(bytes.get(i + 1), Some(b'=' | b'>'));
    if bytes.get(pos) != Some(&b':') {
        return assignment(pos).then_some(pos + 1);
    }

    let mut depth = 0usize;
    for i in pos + 1..bytes.len() {
        match bytes[i] {
            b'<' | b'{' | b'(' | b'[' => depth += 1,
            b'>' if bytes[i - 1] == b'=' => {}
            b'>' | b'}' | b')' | b']' => depth = depth.checked_sub(1)?,
            b';' if depth == 0 => return None,
            b'=' if depth == 0 && assignment(i) => return Some(i + 1),
            // `let x: number` followed by another statement
            b'\n' if depth == 0 => {
                if STATEMENT_START.is_match(&masked[skip_ws(masked, i + 1)..]) {
                    return None;
                }
            }
            _ => {}
        }
    }
    None
}

/// End of the statement or expression starting at `from` (exclusive).
///
/// Stops at a depth-zero `;`, at a bracket closing something opened before
/// `from`, or at a depth-zero line break followed by a new statement.
fn statement_end(masked: &str, from: usize) -> usize {
    let bytes = masked.as_bytes();
    let mut depth = 0usize;
    let mut i = from;

    while i < bytes.len() {
        match bytes[i] {
            b'{' | b'(' | b'[' => depth += 1,
            b'}' | b')' | b']' => {
                if depth == 0 {
                    return i;
                }
                depth -= 1;
            }
            b';' if depth == 0 => return i,
            b'\n' if depth == 0 => {
                let next = skip_ws(masked, i + 1);
                if next >= bytes.len() || STATEMENT_START.is_match(&masked[next..]) {
                    return i;
                }
            }
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}

/// Whether `function` at `start` begins a statement rather than an expression.
fn at_statement_position(masked: &str, start: usize) -> bool {
    let before = masked[..start].trim_end();
    if before.ends_with("return") {
        return false;
    }
    !matches!(
        before.bytes().last(),
        Some(b'=' | b'(' | b',' | b':' | b'?' | b'&' | b'|' | b'!' | b'[' | b'+' | b'-' | b'*')
    )
}

/// Whether `word` appears at `pos` as a whole word.
fn word_at(masked: &str, pos: usize, word: &str) -> bool {
    masked[pos.min(masked.len())..].starts_with(word)
        && masked[pos + word.len()..]
            .chars()
            .next()
            .map_or(true, |c| !(c.is_alphanumeric() || c == '_' || c == '$'))
}

/// Apply `export default Name;` and `export { A, B as C }` statements.
fn mark_exports(masked: &str, candidates: &mut [CandidateDeclaration<'_>]) {
    let mut exported: HashSet<&str> = HashSet::new();
    let mut default_exported: HashSet<&str> = HashSet::new();

    for caps in EXPORT_DEFAULT_IDENT.captures_iter(masked) {
        if let Some(name) = caps.get(1) {
            default_exported.insert(name.as_str());
        }
    }

    for caps in EXPORT_LIST.captures_iter(masked) {
        let (Some(all), Some(list)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        // re-exports name bindings of another module
        if masked[skip_ws(masked, all.end())..].starts_with("from") {
            continue;
        }
        for entry in list.as_str().split(',') {
            let mut parts = entry.split_whitespace();
            let Some(local) = parts.next() else {
                continue;
            };
            let alias = match (parts.next(), parts.next()) {
                (Some("as"), Some(alias)) => alias,
                _ => local,
            };
            if alias == "default" {
                default_exported.insert(local);
            } else {
                exported.insert(local);
            }
        }
    }

    for c in candidates.iter_mut() {
        if default_exported.contains(c.name) {
            c.is_default_export = true;
            c.is_exported = true;
        } else if exported.contains(c.name) {
            c.is_exported = true;
        }
    }
}

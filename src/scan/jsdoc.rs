//! Documentation comments attached to declarations.
//!
//! `/** ... */` blocks are parsed into a [`DocBlock`]. Parsing is
//! tag-driven: unknown tags are skipped, and a malformed tag only degrades
//! its own field. Each degradation is reported back as an issue string so
//! the engine can surface it as a `malformed_doc` warning.

use super::{DocBlock, ParamDoc, ReturnsDoc};

/// Longest description kept on a record, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// Comment found directly above a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocComment<'a> {
    /// A `/** ... */` block, delimiters included.
    Block(&'a str),
    /// Consecutive `//` lines, markers stripped and joined with spaces.
    Line(String),
}

impl<'a> DocComment<'a> {
    pub fn block(&self) -> Option<&'a str> {
        match self {
            DocComment::Block(raw) => Some(raw),
            DocComment::Line(_) => None,
        }
    }
}

/// Locate the comment attached to the declaration starting at `decl_start`.
///
/// Only whitespace may separate the comment from the declaration. A plain
/// `/* */` block does not count as documentation.
pub fn find_doc_comment<'a>(text: &'a str, masked: &str, decl_start: usize) -> Option<DocComment<'a>> {
    let decl_start = decl_start.min(text.len());
    // comments are blank in the masked view, so this finds the end of code
    let code_end = masked[..decl_start].trim_end().len();
    let gap = &text[code_end..decl_start];
    let trimmed = gap.trim_end();

    if let Some(before_close) = trimmed.strip_suffix("*/") {
        let open = before_close.rfind("/*")?;
        let raw = &trimmed[open..];
        return if raw.starts_with("/**") && !raw.starts_with("/**/") {
            Some(DocComment::Block(raw))
        } else {
            None
        };
    }

    // the declaration must start its own line for a line comment to attach
    if !gap[trimmed.len()..].contains('\n') {
        return None;
    }
    // a comment sharing a line with earlier code belongs to that code
    let own_lines = match (code_end, trimmed.find('\n')) {
        (0, _) => trimmed,
        (_, Some(newline)) => &trimmed[newline + 1..],
        (_, None) => "",
    };
    let mut lines: Vec<&str> = Vec::new();
    for line in own_lines.lines().rev() {
        match line.trim().strip_prefix("//") {
            Some(content) => lines.push(content.trim_start_matches('/').trim()),
            None => break,
        }
    }
    lines.reverse();
    let joined = lines
        .into_iter()
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!joined.is_empty()).then_some(DocComment::Line(joined))
}

/// Parse a raw comment block. `None` in, `None` out.
pub fn parse_doc(raw: Option<&str>) -> Option<DocBlock> {
    parse_doc_with_issues(raw).map(|(doc, _)| doc)
}

/// Parse a raw comment block and report every degraded tag.
pub fn parse_doc_with_issues(raw: Option<&str>) -> Option<(DocBlock, Vec<String>)> {
    let raw = raw?;
    let mut doc = DocBlock::default();
    let mut issues = Vec::new();

    let sections = split_sections(&clean_lines(raw));
    for section in &sections {
        match section.tag.as_deref() {
            None => doc.description = join_words(&section.lines),
            Some("param") | Some("arg") | Some("argument") => {
                match parse_param(&join_words(&section.lines)) {
                    Ok((param, issue)) => {
                        issues.extend(issue);
                        doc.params.push(param);
                    }
                    Err(issue) => issues.push(issue),
                }
            }
            Some("returns") | Some("return") => {
                if doc.returns.is_some() {
                    continue;
                }
                let (type_name, rest, issue) = take_type(&join_words(&section.lines));
                issues.extend(issue);
                doc.returns = Some(ReturnsDoc {
                    type_name,
                    description: non_empty(rest.trim_start_matches('-').trim()),
                });
            }
            Some("example") => {
                let example = section.lines.join("\n");
                let example = example.trim_matches('\n').trim_end();
                if !example.is_empty() {
                    doc.examples.push(example.to_string());
                }
            }
            Some("deprecated") => doc.deprecated = true,
            Some("author") => doc.author = non_empty(&join_words(&section.lines)),
            Some("version") => doc.version = non_empty(&join_words(&section.lines)),
            Some(_) => {}
        }
    }

    Some((doc, issues))
}

/// First sentence of a description, capped at [`MAX_DESCRIPTION_CHARS`].
pub fn first_sentence(text: &str) -> Option<String> {
    let text = text.trim();
    let mut end = text.len();
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            match chars.peek() {
                None => break,
                Some((_, next)) if next.is_whitespace() => {
                    end = i + c.len_utf8();
                    break;
                }
                _ => {}
            }
        }
    }
    let sentence: String = text[..end].chars().take(MAX_DESCRIPTION_CHARS).collect();
    non_empty(sentence.trim())
}

struct Section {
    tag: Option<String>,
    lines: Vec<String>,
}

/// Comment body lines without delimiters and leading `*` gutters.
fn clean_lines(raw: &str) -> Vec<String> {
    let body = raw.trim();
    let body = body.strip_prefix("/**").unwrap_or(body);
    let body = body.strip_suffix("*/").unwrap_or(body);

    body.lines()
        .map(|line| {
            let line = line.trim_start();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line).trim_end().to_string()
        })
        .collect()
}

fn split_sections(lines: &[String]) -> Vec<Section> {
    let mut sections = vec![Section {
        tag: None,
        lines: Vec::new(),
    }];

    for line in lines {
        let in_example = sections.last().and_then(|s| s.tag.as_deref()) == Some("example");
        let starts = tag_starts(line);
        let line_start_tag = starts.first() == Some(&(line.len() - line.trim_start().len()));

        if starts.is_empty() || (in_example && !line_start_tag) {
            if let Some(current) = sections.last_mut() {
                current.lines.push(line.clone());
            }
            continue;
        }

        let head = line[..starts[0]].trim_end();
        if !head.is_empty() {
            if let Some(current) = sections.last_mut() {
                current.lines.push(head.to_string());
            }
        }
        for (i, &start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).copied().unwrap_or(line.len());
            let chunk = &line[start + 1..end];
            let name_len = chunk
                .find(|c: char| !c.is_ascii_alphanumeric())
                .unwrap_or(chunk.len());
            let body = chunk[name_len..].trim();
            sections.push(Section {
                tag: Some(chunk[..name_len].to_ascii_lowercase()),
                lines: if body.is_empty() {
                    Vec::new()
                } else {
                    vec![body.to_string()]
                },
            });
        }
    }

    sections
}

/// Byte offsets of `@tag` markers outside `{...}` type expressions.
fn tag_starts(line: &str) -> Vec<usize> {
    let bytes = line.as_bytes();
    let mut depth = 0usize;
    let mut starts = Vec::new();
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b'@' if depth == 0
                && (i == 0 || bytes[i - 1].is_ascii_whitespace())
                && bytes.get(i + 1).is_some_and(|c| c.is_ascii_alphabetic()) =>
            {
                starts.push(i)
            }
            _ => {}
        }
    }
    starts
}

/// Split an optional leading `{Type}` off a tag body.
fn take_type(body: &str) -> (Option<String>, String, Option<String>) {
    let body = body.trim();
    if !body.starts_with('{') {
        return (None, body.to_string(), None);
    }

    let mut depth = 0usize;
    for (i, c) in body.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let type_name = non_empty(body[1..i].trim());
                    return (type_name, body[i + 1..].trim().to_string(), None);
                }
            }
            _ => {}
        }
    }

    // unclosed: drop the first token and keep going
    let rest = body
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim())
        .unwrap_or("");
    (
        None,
        rest.to_string(),
        Some(format!("unclosed type expression in `{body}`")),
    )
}

fn parse_param(body: &str) -> Result<(ParamDoc, Option<String>), String> {
    let (type_name, rest, issue) = take_type(body);

    let (name, rest) = if let Some(optional) = rest.strip_prefix('[') {
        match optional.find(']') {
            Some(close) => {
                let inner = &optional[..close];
                let name = inner.split('=').next().unwrap_or("").trim();
                (name.to_string(), optional[close + 1..].to_string())
            }
            None => {
                let (name, tail) = optional
                    .split_once(char::is_whitespace)
                    .unwrap_or((optional, ""));
                (
                    name.split('=').next().unwrap_or("").to_string(),
                    tail.to_string(),
                )
            }
        }
    } else {
        let (name, tail) = rest.split_once(char::is_whitespace).unwrap_or((&rest, ""));
        (name.to_string(), tail.to_string())
    };

    if name.is_empty() || name.starts_with('-') {
        return Err(format!("@param without a name: `{}`", body.trim()));
    }

    let description = rest.trim();
    let description = description.strip_prefix('-').unwrap_or(description).trim();

    Ok((
        ParamDoc {
            name,
            type_name,
            description: non_empty(description),
        },
        issue,
    ))
}

fn join_words(lines: &[String]) -> String {
    lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::source::mask;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_absent_comment_is_none() {
        assert_eq!(parse_doc(None), None);
    }

    #[test]
    fn test_empty_block_is_documented_but_empty() {
        let doc = parse_doc(Some("/** */")).unwrap();
        assert_eq!(doc, DocBlock::default());
    }

    #[test]
    fn test_one_line_block_with_inline_param() {
        let doc = parse_doc(Some("/** Renders a user card. @param {Object} user - the user */")).unwrap();
        assert_eq!(doc.description, "Renders a user card.");
        assert_eq!(
            doc.params,
            vec![ParamDoc {
                name: "user".to_string(),
                type_name: Some("Object".to_string()),
                description: Some("the user".to_string()),
            }]
        );
    }

    #[test]
    fn test_full_block() {
        let raw = r#"/**
 * A button component.
 * Supports icons.
 *
 * @param {string} label - Text shown on the button
 * @param {{ x: number }} [offset={ x: 0 }] Optional offset
 * @arg onClick
 * @returns {JSX.Element} The rendered button
 * @example
 *   <Button label="Save" />
 *   <Button label="Cancel" />
 * @deprecated use IconButton
 * @author Jane Doe <jane@example.com>
 * @version 2.1.0
 * @see Other
 */"#;
        let doc = parse_doc(Some(raw)).unwrap();
        assert_eq!(doc.description, "A button component. Supports icons.");
        assert_eq!(doc.params.len(), 3);
        assert_eq!(doc.params[0].type_name.as_deref(), Some("string"));
        assert_eq!(
            doc.params[0].description.as_deref(),
            Some("Text shown on the button")
        );
        assert_eq!(doc.params[1].name, "offset");
        assert_eq!(doc.params[1].type_name.as_deref(), Some("{ x: number }"));
        assert_eq!(doc.params[2].name, "onClick");
        assert_eq!(doc.params[2].type_name, None);
        assert_eq!(doc.params[2].description, None);
        let returns = doc.returns.unwrap();
        assert_eq!(returns.type_name.as_deref(), Some("JSX.Element"));
        assert_eq!(returns.description.as_deref(), Some("The rendered button"));
        assert_eq!(
            doc.examples,
            vec!["  <Button label=\"Save\" />\n  <Button label=\"Cancel\" />"]
        );
        assert!(doc.deprecated);
        assert_eq!(doc.author.as_deref(), Some("Jane Doe <jane@example.com>"));
        assert_eq!(doc.version.as_deref(), Some("2.1.0"));
    }

    #[test]
    fn test_malformed_tags_degrade() {
        let raw = "/**\n * Card.\n * @param {Object user - the user\n * @param\n * @returns {Node\n */";
        let (doc, issues) = parse_doc_with_issues(Some(raw)).unwrap();
        assert_eq!(doc.description, "Card.");
        assert_eq!(doc.params.len(), 1);
        assert_eq!(doc.params[0].name, "user");
        assert_eq!(doc.params[0].type_name, None);
        assert_eq!(doc.returns.as_ref().unwrap().type_name, None);
        assert_eq!(issues.len(), 3);
    }

    #[test]
    fn test_first_sentence() {
        assert_eq!(
            first_sentence("Renders a user card. Clicking selects it."),
            Some("Renders a user card.".to_string())
        );
        assert_eq!(
            first_sentence("Version 1.2 of the card"),
            Some("Version 1.2 of the card".to_string())
        );
        assert_eq!(first_sentence("   "), None);
        let long = "x".repeat(300);
        assert_eq!(first_sentence(&long).unwrap().len(), MAX_DESCRIPTION_CHARS);
    }

    fn find(src: &str, decl: &str) -> Option<DocComment<'static>> {
        let src: &'static str = Box::leak(src.to_string().into_boxed_str());
        let masked = mask(src);
        let start = src.find(decl).unwrap();
        find_doc_comment(src, &masked, start)
    }

    #[test]
    fn test_find_block_directly_above() {
        let src = "import x from 'x';\n\n/** Card. */\nexport const Card = () => <div />;";
        assert_eq!(
            find(src, "export const"),
            Some(DocComment::Block("/** Card. */"))
        );
    }

    #[test]
    fn test_plain_block_and_code_between_do_not_attach() {
        assert_eq!(find("/* license */\nfunction A() {}", "function"), None);
        assert_eq!(find("/** Doc. */\nconst x = 1;\nfunction A() {}", "function"), None);
    }

    #[test]
    fn test_line_comment_fallback() {
        let src = "const x = 1;\n// Shows the header.\n// Sticky on scroll.\nfunction Header() {}";
        assert_eq!(
            find(src, "function"),
            Some(DocComment::Line("Shows the header. Sticky on scroll.".to_string()))
        );
        assert_eq!(find("const y = 2; // trailing\nfunction A() {}", "function"), None);
    }
}

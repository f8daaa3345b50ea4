//! The per-file scan pipeline.
//!
//! `scan` is pure: it performs no I/O and keeps no state between calls, so
//! callers may run it over many files in parallel.

use std::collections::HashSet;

use tracing::debug;

use super::declarations::{scan_declarations, CandidateDeclaration, DeclarationKind};
use super::extract::{extract, FileContext};
use super::factory::{contains_markup, detect_factory, is_instance};
use super::hooks::{is_hook_file, is_hook_name};
use super::imports::FileFacts;
use super::jsdoc::{find_doc_comment, parse_doc_with_issues, DocComment};
use super::naming::{classify_name_with, NameContext};
use super::source::PreparedSource;
use super::{ComponentType, ExtractionWarning, ReasonCode, ScanOutput, Verdict};

/// Knobs for a scan run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Emit hook records for `useX` functions defined in hook files.
    pub include_hooks: bool,
    /// Names rejected as `reserved_word` on top of the built-in set.
    pub extra_reserved: Vec<String>,
}

/// Classification outcome for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Component,
    Hook,
    Rejected(ReasonCode),
}

/// Configured scan pipeline.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    options: ScanOptions,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Scan one source unit.
    pub fn scan(&self, file_path: &str, source_text: &str) -> ScanOutput {
        let source = PreparedSource::new(source_text);
        let facts = FileFacts::collect(&source);
        let file = FileContext {
            file_path,
            facts: &facts,
        };
        let hook_file = is_hook_file(file_path);

        let mut output = ScanOutput {
            container: facts.container.clone(),
            ..ScanOutput::default()
        };
        let mut seen: HashSet<&str> = HashSet::new();

        for candidate in scan_declarations(&source) {
            let line = candidate.span.line;
            if !seen.insert(candidate.name) {
                output.warnings.push(ExtractionWarning {
                    file_path: file_path.to_string(),
                    candidate_name: Some(candidate.name.to_string()),
                    reason_code: ReasonCode::DuplicateDeclaration,
                    message: format!(
                        "`{}` is declared more than once; keeping the first declaration",
                        candidate.name
                    ),
                    line,
                });
                continue;
            }

            let decision = self.decide(&candidate, hook_file);
            debug!(
                file = file_path,
                name = candidate.name,
                kind = %candidate.kind,
                line,
                ?decision,
                "classified candidate"
            );

            if let Decision::Rejected(reason) = decision {
                output.warnings.push(ExtractionWarning {
                    file_path: file_path.to_string(),
                    candidate_name: Some(candidate.name.to_string()),
                    reason_code: reason,
                    message: rejection_message(reason, &candidate),
                    line,
                });
                continue;
            }

            let comment = find_doc_comment(source.text(), source.masked(), candidate.span.start_byte);
            let (doc, issues) = match parse_doc_with_issues(comment.as_ref().and_then(DocComment::block)) {
                Some((doc, issues)) => (Some(doc), issues),
                None => (None, Vec::new()),
            };
            let line_comment = match &comment {
                Some(DocComment::Line(text)) => Some(text.as_str()),
                _ => None,
            };

            let mut extraction = extract(&candidate, &file, doc, line_comment);
            if decision == Decision::Hook {
                extraction.record.component_type = ComponentType::Hook;
            }

            for issue in issues {
                output.warnings.push(ExtractionWarning {
                    file_path: file_path.to_string(),
                    candidate_name: Some(candidate.name.to_string()),
                    reason_code: ReasonCode::MalformedDoc,
                    message: issue,
                    line,
                });
            }
            if let Some(err) = extraction.props_error {
                output.warnings.push(ExtractionWarning {
                    file_path: file_path.to_string(),
                    candidate_name: Some(candidate.name.to_string()),
                    reason_code: ReasonCode::UnbalancedBraces,
                    message: format!("props left empty: {err}"),
                    line,
                });
            }

            output.records.push(extraction.record);
        }

        output
    }

    /// Scan raw file content, rejecting binary or non-UTF-8 input.
    pub fn scan_bytes(&self, file_path: &str, bytes: &[u8]) -> ScanOutput {
        if bytes.contains(&0) {
            return unreadable(file_path, "binary content (NUL byte)".to_string());
        }
        match std::str::from_utf8(bytes) {
            Ok(text) => self.scan(file_path, text.strip_prefix('\u{feff}').unwrap_or(text)),
            Err(err) => unreadable(file_path, format!("invalid UTF-8: {err}")),
        }
    }

    fn decide(&self, candidate: &CandidateDeclaration<'_>, hook_file: bool) -> Decision {
        let function_like = candidate.kind.is_function_like();

        if self.options.include_hooks && hook_file && function_like && is_hook_name(candidate.name) {
            return Decision::Hook;
        }

        // a call result is never a component, whatever its name
        if is_instance(candidate) {
            return Decision::Rejected(ReasonCode::Instance);
        }

        let ctx = NameContext {
            is_function_like: function_like,
            returns_markup: contains_markup(candidate.masked_body),
        };
        let verdict = match classify_name_with(candidate.name, &ctx, &self.options.extra_reserved) {
            Verdict::Accepted => detect_factory(candidate),
            rejected => rejected,
        };

        match verdict {
            Verdict::Accepted => Decision::Component,
            Verdict::Rejected(reason) => Decision::Rejected(reason),
        }
    }
}

/// Scan with default options.
pub fn scan(file_path: &str, source_text: &str) -> ScanOutput {
    Scanner::default().scan(file_path, source_text)
}

/// Scan raw bytes with default options.
pub fn scan_bytes(file_path: &str, bytes: &[u8]) -> ScanOutput {
    Scanner::default().scan_bytes(file_path, bytes)
}

/// Output for a file that could not be read as text.
pub fn unreadable(file_path: &str, message: String) -> ScanOutput {
    ScanOutput {
        records: Vec::new(),
        warnings: vec![ExtractionWarning {
            file_path: file_path.to_string(),
            candidate_name: None,
            reason_code: ReasonCode::UnreadableSource,
            message,
            line: 0,
        }],
        container: None,
    }
}

fn rejection_message(reason: ReasonCode, candidate: &CandidateDeclaration<'_>) -> String {
    let name = candidate.name;
    match reason {
        ReasonCode::NotPascalCase => format!("`{name}` does not start with an uppercase letter"),
        ReasonCode::LeadingDigit => format!("`{name}` starts with a digit"),
        ReasonCode::LeadingUnderscore => format!("`{name}` starts with an underscore"),
        ReasonCode::ScreamingSnakeCase => format!("`{name}` is a SCREAMING_SNAKE_CASE constant"),
        ReasonCode::EnvPrefix => format!("`{name}` has an environment variable prefix"),
        ReasonCode::VerbPrefix => format!("`{name}` is named like a function, not a component"),
        ReasonCode::ConfigSuffix => format!("`{name}` has a configuration suffix"),
        ReasonCode::ReservedWord => format!("`{name}` is a reserved name"),
        ReasonCode::NotFunctionLike => format!("`{name}` is not a function"),
        ReasonCode::Factory => format!("`{name}` returns a plain object"),
        ReasonCode::Instance => match &candidate.kind {
            DeclarationKind::ConstCall { callee } => {
                format!("`{name}` holds the result of calling `{callee}()`")
            }
            _ => format!("`{name}` holds the result of a call"),
        },
        ReasonCode::Utility => format!("`{name}` never renders markup"),
        other => format!("`{name}`: {other}"),
    }
}

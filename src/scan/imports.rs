//! File-level import and export extraction.
//!
//! Computed once per file and shared by every record extracted from it.
//! Keywords are located in the masked text (so commented-out imports are
//! ignored) and the statement itself is read from the original text, where
//! module specifiers are still intact.

use lazy_static::lazy_static;
use regex::Regex;

use super::containers::detect_container;
use super::source::PreparedSource;
use super::{ContainerInfo, ImportStatement, ImportType};

lazy_static! {
    static ref IMPORT_KEYWORD: Regex = Regex::new(r"\bimport\b").unwrap();
    static ref EXPORT_KEYWORD: Regex = Regex::new(r"\bexport\b").unwrap();

    static ref IMPORT_STMT: Regex = Regex::new(
        r#"^import\s+(?:type\s+)?(?:([\w$*{}\s,]+?)\s*from\s*)?['"]([^'"\n]+)['"]"#
    )
    .unwrap();
    static ref REEXPORT_STMT: Regex = Regex::new(
        r#"^export\s+(?:type\s+)?(?:\*(?:\s+as\s+[\w$]+)?|\{[^}]*\})\s*from\s*['"]([^'"\n]+)['"]"#
    )
    .unwrap();

    static ref EXPORT_DECL: Regex = Regex::new(
        r"\bexport\s+(?:default\s+)?(?:declare\s+)?(?:async\s+)?(?:function\s*\*?|const|let|var|class)\s*([A-Za-z_$][\w$]*)"
    )
    .unwrap();
    static ref EXPORT_DEFAULT_IDENT: Regex =
        Regex::new(r"(?m)\bexport\s+default\s+([A-Za-z_$][\w$]*)\s*(?:;|$)").unwrap();
    static ref EXPORT_LIST: Regex = Regex::new(r"\bexport\s*\{([^}]*)\}").unwrap();
}

/// Words that can follow `export default` without naming a binding.
const NON_BINDING_WORDS: &[&str] = &["function", "class", "async", "new", "await", "null", "true", "false"];

/// Imports and exports of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileFacts {
    /// Module specifiers, deduplicated in source order.
    pub imports: Vec<String>,
    /// Exported identifiers, deduplicated in source order.
    pub exports: Vec<String>,
    /// Structured import statements in source order.
    pub component_imports: Vec<ImportStatement>,
    /// Set when the file is a Redux container.
    pub container: Option<ContainerInfo>,
}

impl FileFacts {
    /// Extract imports and exports from a prepared source.
    pub fn collect(source: &PreparedSource<'_>) -> Self {
        let component_imports = extract_import_statements(source);
        let mut imports: Vec<String> = Vec::new();

        let mut specifiers: Vec<(usize, String)> = Vec::new();
        for m in IMPORT_KEYWORD.find_iter(source.masked()) {
            if let Some(caps) = IMPORT_STMT.captures(&source.text()[m.start()..]) {
                if let Some(spec) = caps.get(2) {
                    specifiers.push((m.start(), spec.as_str().to_string()));
                }
            }
        }
        for m in EXPORT_KEYWORD.find_iter(source.masked()) {
            if let Some(caps) = REEXPORT_STMT.captures(&source.text()[m.start()..]) {
                if let Some(spec) = caps.get(1) {
                    specifiers.push((m.start(), spec.as_str().to_string()));
                }
            }
        }
        specifiers.sort_by_key(|(pos, _)| *pos);
        for (_, spec) in specifiers {
            if !imports.contains(&spec) {
                imports.push(spec);
            }
        }

        Self {
            imports,
            exports: extract_exports(source.masked()),
            container: detect_container(source.masked(), &component_imports),
            component_imports,
        }
    }
}

/// Parse every real `import` statement into its structured form.
pub fn extract_import_statements(source: &PreparedSource<'_>) -> Vec<ImportStatement> {
    IMPORT_KEYWORD
        .find_iter(source.masked())
        .filter_map(|m| IMPORT_STMT.captures(&source.text()[m.start()..]))
        .filter_map(|caps| {
            let from_path = caps.get(2)?.as_str().to_string();
            let clause = caps.get(1).map(|c| c.as_str().trim()).unwrap_or("");
            Some(parse_import_clause(clause, from_path))
        })
        .collect()
}

/// Interpret the part between `import` and `from`.
fn parse_import_clause(clause: &str, from_path: String) -> ImportStatement {
    if clause.is_empty() {
        return ImportStatement {
            from_path,
            import_type: ImportType::SideEffect,
            imported_names: Vec::new(),
        };
    }

    let (default_part, rest) = if clause.starts_with('{') || clause.starts_with('*') {
        (None, clause)
    } else {
        match clause.split_once(',') {
            Some((head, tail)) => (Some(head.trim()), tail.trim()),
            None => (Some(clause), ""),
        }
    };

    let mut imported_names: Vec<String> = default_part
        .filter(|d| !d.is_empty())
        .map(|d| vec![d.to_string()])
        .unwrap_or_default();

    let mut namespace = false;
    let mut named = false;
    if let Some(ns) = rest.strip_prefix('*') {
        namespace = true;
        if let Some(alias) = ns.split_whitespace().skip_while(|w| *w != "as").nth(1) {
            imported_names.push(alias.to_string());
        }
    } else if let Some(list) = rest.strip_prefix('{') {
        named = true;
        let list = list.trim_end().trim_end_matches('}');
        for entry in list.split(',') {
            let entry = entry.trim();
            let entry = entry.strip_prefix("type ").unwrap_or(entry).trim();
            if let Some(original) = entry.split_whitespace().next() {
                imported_names.push(original.to_string());
            }
        }
    }

    let import_type = match (imported_names.is_empty(), default_part.is_some(), named || namespace) {
        (true, _, _) => ImportType::SideEffect,
        (false, true, true) => ImportType::Mixed,
        (false, true, false) => ImportType::Default,
        (false, false, _) if namespace => ImportType::Namespace,
        (false, false, _) => ImportType::Named,
    };

    ImportStatement {
        from_path,
        import_type,
        imported_names,
    }
}

/// Exported identifiers from declarations, default exports and export lists.
pub fn extract_exports(masked: &str) -> Vec<String> {
    let mut found: Vec<(usize, &str)> = Vec::new();

    for caps in EXPORT_DECL.captures_iter(masked) {
        if let (Some(all), Some(name)) = (caps.get(0), caps.get(1)) {
            found.push((all.start(), name.as_str()));
        }
    }

    for caps in EXPORT_DEFAULT_IDENT.captures_iter(masked) {
        if let (Some(all), Some(name)) = (caps.get(0), caps.get(1)) {
            if !NON_BINDING_WORDS.contains(&name.as_str()) {
                found.push((all.start(), name.as_str()));
            }
        }
    }

    for caps in EXPORT_LIST.captures_iter(masked) {
        let (Some(all), Some(list)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        for entry in list.as_str().split(',') {
            let words: Vec<&str> = entry.split_whitespace().collect();
            let name = match words.as_slice() {
                [] => continue,
                [local, "as", "default"] => *local,
                [_, "as", alias] => *alias,
                [local, ..] => *local,
            };
            found.push((all.start(), name));
        }
    }

    found.sort_by_key(|(pos, _)| *pos);
    let mut exports: Vec<String> = Vec::new();
    for (_, name) in found {
        if !exports.iter().any(|e| e == name) {
            exports.push(name.to_string());
        }
    }
    exports
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(src: &str) -> FileFacts {
        FileFacts::collect(&PreparedSource::new(src))
    }

    #[test]
    fn test_import_specifiers() {
        let f = facts(
            r#"
import React from 'react';
import { Button } from './Button';
import {
  useAuth,
  useSession,
} from "./hooks/useAuth";
import './styles.css';
// import Ghost from './ghost';
import React2 from 'react';
"#,
        );
        assert_eq!(
            f.imports,
            vec!["react", "./Button", "./hooks/useAuth", "./styles.css"]
        );
    }

    #[test]
    fn test_reexports_count_as_imports() {
        let f = facts("export * from './a';\nexport { B } from './b';\n");
        assert_eq!(f.imports, vec!["./a", "./b"]);
        assert_eq!(f.exports, vec!["B"]);
    }

    #[test]
    fn test_dynamic_import_ignored() {
        let f = facts("const Lazy = React.lazy(() => import('./Lazy'));");
        assert!(f.imports.is_empty());
    }

    #[test]
    fn test_exports() {
        let f = facts(
            r#"
export function Button() { return <button />; }
export const Header = () => <header />;
export default async function Page() { return <main />; }
const Card = () => <div />;
const Tile = () => <i />;
export default Card;
export { Tile as Square, Card as default };
export class Store {}
"#,
        );
        assert_eq!(
            f.exports,
            vec!["Button", "Header", "Page", "Card", "Square", "Store"]
        );
    }

    #[test]
    fn test_structured_named_import_resolves_aliases() {
        let f = facts("import { Button as Btn, Card } from './components'");
        assert_eq!(f.component_imports.len(), 1);
        let stmt = &f.component_imports[0];
        assert_eq!(stmt.import_type, ImportType::Named);
        assert_eq!(stmt.from_path, "./components");
        assert_eq!(stmt.imported_names, vec!["Button", "Card"]);
    }

    #[test]
    fn test_structured_import_kinds() {
        let f = facts(
            r#"
import Button from './Button';
import Button2, { Card } from './components';
import * as Components from './components';
import 'polyfill';
import type { Props } from './types';
"#,
        );
        let kinds: Vec<_> = f.component_imports.iter().map(|s| s.import_type).collect();
        assert_eq!(
            kinds,
            vec![
                ImportType::Default,
                ImportType::Mixed,
                ImportType::Namespace,
                ImportType::SideEffect,
                ImportType::Named,
            ]
        );
        assert_eq!(f.component_imports[1].imported_names, vec!["Button2", "Card"]);
        assert_eq!(f.component_imports[2].imported_names, vec!["Components"]);
        assert_eq!(f.component_imports[4].imported_names, vec!["Props"]);
    }
}

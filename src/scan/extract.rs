//! Record extraction for accepted candidates.

use std::path::Path;

use super::declarations::CandidateDeclaration;
use super::hooks::{extract_hooks, is_hook_name};
use super::imports::FileFacts;
use super::jsdoc::first_sentence;
use super::props::{extract_props, PropsError};
use super::{ComponentRecord, ComponentType, DocBlock};

/// Path segments that mark routed pages.
const PAGE_DIRS: &[&str] = &["pages", "app"];

/// Per-file inputs shared by every record from the same file.
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'f> {
    pub file_path: &'f str,
    pub facts: &'f FileFacts,
}

/// An extracted record plus any degradation hit on the way.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub record: ComponentRecord,
    pub props_error: Option<PropsError>,
}

/// Build the record for an accepted candidate.
///
/// `line_comment` is the text of `//` comments directly above the
/// declaration; it only supplies `description` when there is no doc block.
pub fn extract(
    candidate: &CandidateDeclaration<'_>,
    file: &FileContext<'_>,
    doc: Option<DocBlock>,
    line_comment: Option<&str>,
) -> Extraction {
    let (props, props_error) = if candidate.header_unbalanced {
        (Vec::new(), Some(PropsError::Unbalanced))
    } else {
        match candidate.params_text.map(extract_props) {
            Some(Ok(shape)) => (shape.into_names(), None),
            Some(Err(err)) => (Vec::new(), Some(err)),
            None => (Vec::new(), None),
        }
    };

    let hooks = extract_hooks(candidate.masked_body);

    let description = match &doc {
        Some(doc) => first_sentence(&doc.description),
        None => line_comment.and_then(first_sentence),
    };

    let record = ComponentRecord {
        name: candidate.name.to_string(),
        file_path: file.file_path.to_string(),
        component_type: component_type_for(file.file_path, candidate.name),
        props,
        native_hooks_used: hooks.native,
        custom_hooks_used: hooks.custom,
        imports: file.facts.imports.clone(),
        exports: file.facts.exports.clone(),
        component_imports: file.facts.component_imports.clone(),
        description,
        jsdoc: doc,
    };

    Extraction {
        record,
        props_error,
    }
}

/// Infer the component category from its path, then its name.
pub fn component_type_for(file_path: &str, name: &str) -> ComponentType {
    let lower = file_path.replace('\\', "/").to_lowercase();
    let path = Path::new(&lower);

    let in_page_dir = path
        .parent()
        .into_iter()
        .flat_map(|dir| dir.iter())
        .filter_map(|seg| seg.to_str())
        .any(|seg| PAGE_DIRS.contains(&seg));
    if in_page_dir {
        return ComponentType::Page;
    }

    if lower.split('/').any(|seg| seg.contains("layout")) {
        return ComponentType::Layout;
    }

    if is_hook_name(name) {
        return ComponentType::Hook;
    }

    ComponentType::Component
}

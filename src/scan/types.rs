//! Core types for scan results.

use serde::{Deserialize, Serialize};

/// Coarse component category, inferred from file path and naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Component,
    Page,
    Layout,
    Hook,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Component => "component",
            ComponentType::Page => "page",
            ComponentType::Layout => "layout",
            ComponentType::Hook => "hook",
        }
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a candidate was rejected, or why an extraction was degraded.
///
/// The first nine codes mirror the naming rule table in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    // Naming rules
    NotPascalCase,
    LeadingDigit,
    LeadingUnderscore,
    ScreamingSnakeCase,
    EnvPrefix,
    VerbPrefix,
    ConfigSuffix,
    ReservedWord,
    NotFunctionLike,
    // Body rules
    Factory,
    Instance,
    Utility,
    // Scanner / extraction notes
    DuplicateDeclaration,
    UnbalancedBraces,
    MalformedDoc,
    UnreadableSource,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::NotPascalCase => "not_pascal_case",
            ReasonCode::LeadingDigit => "leading_digit",
            ReasonCode::LeadingUnderscore => "leading_underscore",
            ReasonCode::ScreamingSnakeCase => "screaming_snake_case",
            ReasonCode::EnvPrefix => "env_prefix",
            ReasonCode::VerbPrefix => "verb_prefix",
            ReasonCode::ConfigSuffix => "config_suffix",
            ReasonCode::ReservedWord => "reserved_word",
            ReasonCode::NotFunctionLike => "not_function_like",
            ReasonCode::Factory => "factory",
            ReasonCode::Instance => "instance",
            ReasonCode::Utility => "utility",
            ReasonCode::DuplicateDeclaration => "duplicate_declaration",
            ReasonCode::UnbalancedBraces => "unbalanced_braces",
            ReasonCode::MalformedDoc => "malformed_doc",
            ReasonCode::UnreadableSource => "unreadable_source",
        }
    }

    /// True for codes that reject a candidate outright.
    ///
    /// The remaining codes describe degraded output or skipped input.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            ReasonCode::DuplicateDeclaration
                | ReasonCode::UnbalancedBraces
                | ReasonCode::MalformedDoc
                | ReasonCode::UnreadableSource
        )
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of classifying one candidate declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(ReasonCode),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    /// The rejection reason, if any.
    pub fn reason(&self) -> Option<ReasonCode> {
        match self {
            Verdict::Accepted => None,
            Verdict::Rejected(code) => Some(*code),
        }
    }
}

/// One `@param` entry of a doc block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDoc {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub description: Option<String>,
}

/// The `@returns` entry of a doc block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnsDoc {
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub description: Option<String>,
}

/// Structured form of a `/** ... */` comment attached to a declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocBlock {
    pub description: String,
    pub params: Vec<ParamDoc>,
    pub returns: Option<ReturnsDoc>,
    pub examples: Vec<String>,
    pub deprecated: bool,
    pub author: Option<String>,
    pub version: Option<String>,
}

/// How an import statement binds names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportType {
    Named,
    Default,
    Mixed,
    Namespace,
    SideEffect,
}

/// A single import statement with the names it brings in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStatement {
    pub from_path: String,
    pub import_type: ImportType,
    /// Original (un-aliased) names, or the namespace/default binding.
    pub imported_names: Vec<String>,
}

/// One accepted component. Field order is the interchange order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub name: String,
    pub file_path: String,
    pub component_type: ComponentType,
    pub props: Vec<String>,
    pub native_hooks_used: Vec<String>,
    pub custom_hooks_used: Vec<String>,
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub component_imports: Vec<ImportStatement>,
    pub description: Option<String>,
    pub jsdoc: Option<DocBlock>,
}

/// A non-fatal note about a rejected candidate or a degraded extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionWarning {
    pub file_path: String,
    /// None for file-level warnings.
    pub candidate_name: Option<String>,
    pub reason_code: ReasonCode,
    pub message: String,
    /// 1-indexed; 0 for file-level warnings.
    pub line: usize,
}

/// A Redux container: a file whose export wraps a component in
/// `connect(...)` directly or through `compose(...)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInfo {
    /// Name of the component passed to the HOC chain.
    pub wrapped_component: String,
    /// Module the wrapped component is imported from, when it is imported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapped_from: Option<String>,
    /// Outer HOC first, then the HOCs composed inside it, deduplicated.
    pub hocs_used: Vec<String>,
    /// `connect` received a third (merge props) argument.
    pub has_merge_props: bool,
}

/// Everything the engine produces for one source unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOutput {
    pub records: Vec<ComponentRecord>,
    pub warnings: Vec<ExtractionWarning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerInfo>,
}

impl ScanOutput {
    /// Warnings for rejected candidates only.
    pub fn rejections(&self) -> impl Iterator<Item = &ExtractionWarning> {
        self.warnings.iter().filter(|w| w.reason_code.is_rejection())
    }

    /// Find a record by component name.
    pub fn record(&self, name: &str) -> Option<&ComponentRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// The first warning for a candidate, if any.
    pub fn warning_for(&self, name: &str) -> Option<&ExtractionWarning> {
        self.warnings
            .iter()
            .find(|w| w.candidate_name.as_deref() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_code_serializes_snake_case() {
        let json = serde_json::to_string(&ReasonCode::ScreamingSnakeCase).unwrap();
        assert_eq!(json, "\"screaming_snake_case\"");
    }

    #[test]
    fn test_rejection_split() {
        assert!(ReasonCode::Instance.is_rejection());
        assert!(!ReasonCode::DuplicateDeclaration.is_rejection());
        assert!(!ReasonCode::MalformedDoc.is_rejection());
        assert!(!ReasonCode::UnbalancedBraces.is_rejection());
    }

    #[test]
    fn test_param_doc_uses_type_key() {
        let p = ParamDoc {
            name: "user".to_string(),
            type_name: Some("Object".to_string()),
            description: None,
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["type"], "Object");
        assert!(v["description"].is_null());
    }
}

//! Name-based component classification.
//!
//! Rules are evaluated in table order and the first one that fires decides
//! the verdict. A name that survives every rule moves on to the body checks
//! in `factory`.

use phf::phf_set;

use super::{ReasonCode, Verdict};

/// Syntactic context available to the name rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NameContext {
    /// The declaration defines a function (declaration, arrow or expression).
    pub is_function_like: bool,
    /// The body contains a markup-shaped expression.
    pub returns_markup: bool,
}

/// One entry of the rule table.
pub struct NameRule {
    pub reason: ReasonCode,
    pub rejects: fn(&str, &NameContext) -> bool,
}

/// Build-tool prefixes used for injected environment variables.
pub const ENV_PREFIXES: &[&str] = &[
    "REACT_APP_",
    "NEXT_PUBLIC_",
    "VITE_",
    "VUE_APP_",
    "GATSBY_",
    "EXPO_PUBLIC_",
    "STORYBOOK_",
];

/// Verbs that mark a function or predicate name.
pub const VERB_PREFIXES: &[&str] = &[
    "is", "has", "can", "should", "get", "set", "make", "create", "add", "remove", "delete",
    "update", "fetch", "load", "save", "parse", "format", "validate", "check", "compute",
    "calculate",
];

/// Suffixes of constant/config identifiers.
pub const CONFIG_SUFFIXES: &[&str] = &[
    "_DEFAULT", "_CONFIG", "_SETTINGS", "_OPTIONS", "_DARK", "_LIGHT", "_THEME", "_KEYS",
    "_TYPES", "_MAX", "_MIN", "_WIDTH", "_HEIGHT", "_SIZE", "_URL", "_API", "_HOST", "_PORT",
    "_TIMEOUT",
];

/// Language built-ins and framework internals that are never user components.
static RESERVED_NAMES: phf::Set<&'static str> = phf_set! {
    "React", "Component", "PureComponent", "Fragment", "StrictMode", "Suspense", "Profiler",
    "Children", "Context", "Provider", "Consumer",
    "Object", "Array", "String", "Number", "Boolean", "Symbol", "BigInt", "Date", "Math",
    "JSON", "Promise", "Map", "Set", "WeakMap", "WeakSet", "Error", "TypeError", "RegExp",
    "Function", "Proxy", "Reflect", "Intl", "Infinity", "NaN",
};

/// The ordered rule table.
pub static NAME_RULES: &[NameRule] = &[
    NameRule {
        reason: ReasonCode::NotPascalCase,
        rejects: |name, _| match name.chars().next() {
            Some(c) => !c.is_ascii_uppercase() && !c.is_ascii_digit() && c != '_',
            None => true,
        },
    },
    NameRule {
        reason: ReasonCode::LeadingDigit,
        rejects: |name, _| name.starts_with(|c: char| c.is_ascii_digit()),
    },
    NameRule {
        reason: ReasonCode::LeadingUnderscore,
        rejects: |name, _| name.starts_with('_'),
    },
    NameRule {
        reason: ReasonCode::ScreamingSnakeCase,
        rejects: |name, _| is_screaming_snake(name),
    },
    NameRule {
        reason: ReasonCode::EnvPrefix,
        rejects: |name, _| ENV_PREFIXES.iter().any(|p| name.starts_with(p)),
    },
    NameRule {
        reason: ReasonCode::VerbPrefix,
        rejects: |name, ctx| !ctx.returns_markup && has_verb_prefix(name),
    },
    NameRule {
        reason: ReasonCode::ConfigSuffix,
        rejects: |name, _| CONFIG_SUFFIXES.iter().any(|s| name.ends_with(s)),
    },
    NameRule {
        reason: ReasonCode::ReservedWord,
        rejects: |name, _| RESERVED_NAMES.contains(name),
    },
    NameRule {
        reason: ReasonCode::NotFunctionLike,
        rejects: |_, ctx| !ctx.is_function_like,
    },
];

/// Classify a declaration name using the built-in rule table.
pub fn classify_name(name: &str, ctx: &NameContext) -> Verdict {
    classify_name_with(name, ctx, &[])
}

/// Classify a name, treating `extra_reserved` as additional reserved words.
pub fn classify_name_with(name: &str, ctx: &NameContext, extra_reserved: &[String]) -> Verdict {
    for rule in NAME_RULES {
        let fires = (rule.rejects)(name, ctx)
            || (rule.reason == ReasonCode::ReservedWord
                && extra_reserved.iter().any(|r| r == name));
        if fires {
            return Verdict::Rejected(rule.reason);
        }
    }
    Verdict::Accepted
}

/// Contains `_` and every letter is uppercase.
fn is_screaming_snake(name: &str) -> bool {
    name.contains('_')
        && name
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(|c| c.is_uppercase())
}

/// A verb prefix followed by an uppercase letter (`isOpen`, `GetUser`).
///
/// The first letter of the verb is matched case-insensitively so the rule
/// also sees PascalCase names that got past the case rule.
fn has_verb_prefix(name: &str) -> bool {
    VERB_PREFIXES.iter().any(|verb| {
        let Some(head) = name.get(..verb.len()) else {
            return false;
        };
        head.eq_ignore_ascii_case(verb)
            && head[1..] == verb[1..]
            && name[verb.len()..].starts_with(|c: char| c.is_ascii_uppercase())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FN_CTX: NameContext = NameContext {
        is_function_like: true,
        returns_markup: true,
    };

    fn reason(name: &str) -> Option<ReasonCode> {
        classify_name(name, &FN_CTX).reason()
    }

    #[test]
    fn test_lowercase_names_rejected() {
        for name in ["button", "isEnabled", "userCard", "$wrapper", ""] {
            assert_eq!(reason(name), Some(ReasonCode::NotPascalCase), "{name}");
        }
    }

    #[test]
    fn test_distinct_leading_reasons() {
        assert_eq!(reason("2FActor"), Some(ReasonCode::LeadingDigit));
        assert_eq!(reason("_Private"), Some(ReasonCode::LeadingUnderscore));
    }

    #[test]
    fn test_screaming_snake_rejected() {
        for name in ["API_URL", "MAX_RETRIES", "DB_HOST", "CONSTANT_NAME"] {
            assert_eq!(reason(name), Some(ReasonCode::ScreamingSnakeCase), "{name}");
        }
    }

    #[test]
    fn test_acronyms_and_digits_accepted() {
        for name in ["Form2FA", "APIClient", "HTTPStatus", "UserProfile", "Card"] {
            assert_eq!(classify_name(name, &FN_CTX), Verdict::Accepted, "{name}");
        }
    }

    #[test]
    fn test_env_prefix_with_mixed_case() {
        assert_eq!(reason("REACT_APP_apiBase"), Some(ReasonCode::EnvPrefix));
        // all-caps env vars are already screaming snake
        assert_eq!(
            reason("REACT_APP_CONFIG"),
            Some(ReasonCode::ScreamingSnakeCase)
        );
    }

    #[test]
    fn test_verb_prefix_needs_missing_markup() {
        let no_markup = NameContext {
            is_function_like: true,
            returns_markup: false,
        };
        assert_eq!(
            classify_name("GetUser", &no_markup).reason(),
            Some(ReasonCode::VerbPrefix)
        );
        assert_eq!(
            classify_name("IsMobile", &no_markup).reason(),
            Some(ReasonCode::VerbPrefix)
        );
        // markup wins: AddButton renders something
        assert_eq!(classify_name("AddButton", &FN_CTX), Verdict::Accepted);
        // not a verb boundary
        assert_eq!(classify_name("Canvas", &no_markup), Verdict::Accepted);
        assert_eq!(classify_name("Settings", &no_markup), Verdict::Accepted);
    }

    #[test]
    fn test_config_suffix() {
        assert_eq!(reason("Button_CONFIG"), Some(ReasonCode::ConfigSuffix));
        assert_eq!(reason("Header_HEIGHT"), Some(ReasonCode::ConfigSuffix));
    }

    #[test]
    fn test_reserved_words() {
        for name in ["React", "Fragment", "StrictMode", "Component", "Promise"] {
            assert_eq!(reason(name), Some(ReasonCode::ReservedWord), "{name}");
        }
        let extra = vec!["Layout".to_string()];
        assert_eq!(
            classify_name_with("Layout", &FN_CTX, &extra).reason(),
            Some(ReasonCode::ReservedWord)
        );
    }

    #[test]
    fn test_non_function_rejected_last() {
        let value = NameContext {
            is_function_like: false,
            returns_markup: false,
        };
        assert_eq!(
            classify_name("Theme", &value).reason(),
            Some(ReasonCode::NotFunctionLike)
        );
        // earlier rules still win
        assert_eq!(
            classify_name("API_URL", &value).reason(),
            Some(ReasonCode::ScreamingSnakeCase)
        );
    }

    #[test]
    fn test_rule_table_order() {
        let order: Vec<_> = NAME_RULES.iter().map(|r| r.reason).collect();
        assert_eq!(
            order,
            vec![
                ReasonCode::NotPascalCase,
                ReasonCode::LeadingDigit,
                ReasonCode::LeadingUnderscore,
                ReasonCode::ScreamingSnakeCase,
                ReasonCode::EnvPrefix,
                ReasonCode::VerbPrefix,
                ReasonCode::ConfigSuffix,
                ReasonCode::ReservedWord,
                ReasonCode::NotFunctionLike,
            ]
        );
    }
}

//! Hook usage detection and the native/custom partition.

use lazy_static::lazy_static;
use phf::phf_set;
use regex::Regex;
use std::path::Path;

lazy_static! {
    static ref HOOK_CALL: Regex = Regex::new(r"\buse[A-Z]\w*").unwrap();
}

/// Hooks shipped by the framework itself. Closed set.
pub static NATIVE_HOOKS: phf::Set<&'static str> = phf_set! {
    "useState",
    "useEffect",
    "useContext",
    "useReducer",
    "useCallback",
    "useMemo",
    "useRef",
    "useImperativeHandle",
    "useLayoutEffect",
    "useInsertionEffect",
    "useDebugValue",
    "useDeferredValue",
    "useTransition",
    "useId",
    "useSyncExternalStore",
    "useOptimistic",
    "useActionState",
    "useFormStatus",
};

/// Hooks referenced by a body, split by origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookUsage {
    pub native: Vec<String>,
    pub custom: Vec<String>,
}

/// Collect hook identifiers from masked body text.
///
/// Both lists are deduplicated and keep first-appearance order.
pub fn extract_hooks(masked_body: &str) -> HookUsage {
    let mut usage = HookUsage::default();

    for m in HOOK_CALL.find_iter(masked_body) {
        let name = m.as_str();
        let bucket = if NATIVE_HOOKS.contains(name) {
            &mut usage.native
        } else {
            &mut usage.custom
        };
        if !bucket.iter().any(|h| h == name) {
            bucket.push(name.to_string());
        }
    }

    usage
}

/// `use` followed by an uppercase letter.
pub fn is_hook_name(name: &str) -> bool {
    name.strip_prefix("use")
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()))
}

/// Files following the hook naming convention (`useAuth.ts`).
pub fn is_hook_file(path: &str) -> bool {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(is_hook_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_and_dedupe() {
        let body = r#"{
  const [a, setA] = useState(0);
  const [b] = useState(1);
  useEffect(() => {}, []);
  const auth = useCustomAuth();
  useCustomAuth();
  return <div />;
}"#;
        let usage = extract_hooks(body);
        assert_eq!(usage.native, vec!["useState", "useEffect"]);
        assert_eq!(usage.custom, vec!["useCustomAuth"]);
    }

    #[test]
    fn test_member_access_and_non_hooks() {
        let usage = extract_hooks("React.useMemo(() => x, []); const user = 1; reuseItem(); useless();");
        assert_eq!(usage.native, vec!["useMemo"]);
        assert!(usage.custom.is_empty());
    }

    #[test]
    fn test_hook_names_and_files() {
        assert!(is_hook_name("useAuth"));
        assert!(!is_hook_name("user"));
        assert!(!is_hook_name("use"));
        assert!(is_hook_file("src/hooks/useAuth.js"));
        assert!(is_hook_file("src/hooks/useUserData.ts"));
        assert!(!is_hook_file("src/components/Button.jsx"));
        assert!(!is_hook_file("src/pages/HomePage.jsx"));
    }
}

//! Redux container detection.
//!
//! A container file exports (or binds at top level) a curried HOC chain that
//! ends in a component:
//!
//! ```text
//! export default connect(mapStateToProps, mapDispatchToProps)(Purchase);
//! export default compose(connect(...), withTranslation('ns'))(Passengers);
//! const CheckoutContainer = connect(mapStateToProps)(Checkout);
//! ```
//!
//! Only chains that involve `connect` count as containers.

use lazy_static::lazy_static;
use regex::Regex;

use super::source::{find_matching, ident_len, skip_ws, split_top_level, DepthCursor};
use super::{ContainerInfo, ImportStatement};

lazy_static! {
    static ref CHAIN_START: Regex =
        Regex::new(r"\b(?:export\s+default|(?:const|let|var)\s+[A-Za-z_$][\w$]*\s*=)\s*").unwrap();
}

/// Functions that fold several HOCs into one.
const COMPOSERS: &[&str] = &["compose", "flow", "flowRight"];

const CONNECT: &str = "connect";

/// Arguments to `connect` from the third on are the merge props function.
const MERGE_PROPS_ARG: usize = 3;

/// The first top-level container chain in `masked`, if any.
pub fn detect_container(masked: &str, imports: &[ImportStatement]) -> Option<ContainerInfo> {
    let mut cursor = DepthCursor::new(masked);
    let mut info = CHAIN_START.find_iter(masked).find_map(|m| {
        if cursor.depth_at(m.start()) != 0 {
            return None;
        }
        hoc_chain(masked, m.end())
    })?;

    info.wrapped_from = imports
        .iter()
        .find(|stmt| stmt.imported_names.contains(&info.wrapped_component))
        .map(|stmt| stmt.from_path.clone());
    Some(info)
}

/// Parse `head(args)(Wrapped)` starting at `pos`.
fn hoc_chain(masked: &str, pos: usize) -> Option<ContainerInfo> {
    let bytes = masked.as_bytes();
    let head_len = ident_len(&masked[pos..]);
    if head_len == 0 {
        return None;
    }
    let head = &masked[pos..pos + head_len];

    let open = skip_ws(masked, pos + head_len);
    if bytes.get(open) != Some(&b'(') {
        return None;
    }
    let close = find_matching(masked, open)?;
    let wrap_open = skip_ws(masked, close + 1);
    if bytes.get(wrap_open) != Some(&b'(') {
        return None;
    }
    let wrap_close = find_matching(masked, wrap_open)?;
    let wrapped = masked[wrap_open + 1..wrap_close].trim();
    if wrapped.is_empty()
        || ident_len(wrapped) != wrapped.len()
        || !wrapped.starts_with(|c: char| c.is_ascii_uppercase())
    {
        return None;
    }

    let args = split_top_level(&masked[open + 1..close])?;
    let mut hocs_used = vec![head.to_string()];
    let mut connected = false;
    let mut has_merge_props = false;

    if head == CONNECT {
        connected = true;
        has_merge_props = argument_count(&args) >= MERGE_PROPS_ARG;
    } else if COMPOSERS.contains(&head) {
        for arg in &args {
            let arg = arg.trim();
            let n = ident_len(arg);
            if n == 0 {
                continue;
            }
            let name = &arg[..n];
            if !hocs_used.iter().any(|h| h == name) {
                hocs_used.push(name.to_string());
            }
            if name == CONNECT {
                connected = true;
                has_merge_props |= call_arguments(arg, n)
                    .map_or(false, |inner| argument_count(&inner) >= MERGE_PROPS_ARG);
            }
        }
    }

    connected.then(|| ContainerInfo {
        wrapped_component: wrapped.to_string(),
        wrapped_from: None,
        hocs_used,
        has_merge_props,
    })
}

/// Top-level arguments of a call whose callee ends at `callee_end`.
fn call_arguments(expr: &str, callee_end: usize) -> Option<Vec<&str>> {
    let open = skip_ws(expr, callee_end);
    if expr.as_bytes().get(open) != Some(&b'(') {
        return None;
    }
    let close = find_matching(expr, open)?;
    split_top_level(&expr[open + 1..close])
}

fn argument_count(args: &[&str]) -> usize {
    args.iter().filter(|a| !a.trim().is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::imports::extract_import_statements;
    use crate::scan::source::PreparedSource;

    fn detect(src: &str) -> Option<ContainerInfo> {
        let source = PreparedSource::new(src);
        detect_container(source.masked(), &extract_import_statements(&source))
    }

    #[test]
    fn test_connect_default_export() {
        let info = detect(
            r#"
import { connect } from 'react-redux';
import Purchase from './Purchase';

const mapStateToProps = (state) => ({});
const mapDispatchToProps = {};

export default connect(mapStateToProps, mapDispatchToProps)(Purchase);
"#,
        )
        .unwrap();
        assert_eq!(info.wrapped_component, "Purchase");
        assert_eq!(info.wrapped_from.as_deref(), Some("./Purchase"));
        assert_eq!(info.hocs_used, vec!["connect"]);
        assert!(!info.has_merge_props);
    }

    #[test]
    fn test_compose_collects_hocs() {
        let info = detect(
            r#"
import { compose } from 'redux';
import Component from './Component';

export default compose(
  connect(() => ({}), {}),
  reduxForm({ form: 'test' }),
  withTranslation('namespace')
)(Component);
"#,
        )
        .unwrap();
        assert_eq!(info.wrapped_component, "Component");
        assert_eq!(
            info.hocs_used,
            vec!["compose", "connect", "reduxForm", "withTranslation"]
        );
        assert!(!info.has_merge_props);
    }

    #[test]
    fn test_merge_props() {
        let info = detect(
            "const mergeProps = (s, d, own) => ({});\nexport default connect(mapState, mapDispatch, mergeProps)(Component);\n",
        )
        .unwrap();
        assert!(info.has_merge_props);

        let composed = detect("export default compose(connect(a, b, merge), withRouter)(Panel);").unwrap();
        assert!(composed.has_merge_props);
        assert_eq!(composed.hocs_used, vec!["compose", "connect", "withRouter"]);
    }

    #[test]
    fn test_container_held_in_variable() {
        let info = detect(
            r#"
import Checkout from './Checkout';

const CheckoutContainer = connect(mapStateToProps, mapDispatchToProps)(Checkout);

const CheckoutWithPaymentProviders = (routerProps) => {
  return <CheckoutContainer {...routerProps} />;
};

export default CheckoutWithPaymentProviders;
"#,
        )
        .unwrap();
        assert_eq!(info.wrapped_component, "Checkout");
        assert_eq!(info.hocs_used, vec!["connect"]);
    }

    #[test]
    fn test_plain_component_is_not_a_container() {
        assert_eq!(
            detect("const Component = () => {\n  return <div>Hello</div>;\n};\nexport default Component;\n"),
            None
        );
        // a HOC chain without connect
        assert_eq!(detect("export default withRouter(withStyles(styles)(Panel));"), None);
        assert_eq!(detect("// export default connect(a)(Commented);"), None);
    }
}

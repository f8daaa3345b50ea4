//! Integration tests for directory scanning against the fixture project.

use std::path::PathBuf;

use pretty_assertions::assert_eq;

use jsxscan::batch::relative_path;
use jsxscan::{collect_files, scan_paths, ComponentType, Config, ReasonCode, ScanOptions};

fn project_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join("project")
}

fn project_config() -> Config {
    Config::parse_file(project_path().join("jsxscan.yaml")).expect("should parse config")
}

#[test]
fn test_collect_files_honors_ignore_rules() {
    let root = project_path();
    let files = collect_files(&root, &project_config()).expect("walk should succeed");
    let rel: Vec<_> = files.iter().map(|f| relative_path(&root, f)).collect();
    assert_eq!(
        rel,
        vec![
            "src/components/Modal.tsx",
            "src/components/OpenPay.js",
            "src/components/UserCard.jsx",
            "src/components/logo.js",
            "src/hooks/useAuth.js",
            "src/layouts/MainLayout.tsx",
            "src/pages/Dashboard.jsx",
            "src/utils/format.ts",
        ]
    );
}

#[test]
fn test_scan_project_with_hooks() {
    let root = project_path();
    let config = project_config();
    let files = collect_files(&root, &config).unwrap();
    let report = scan_paths(&root, &files, &config.scan_options());

    let names: Vec<_> = report.records().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Modal", "Input", "UserCard", "UserBadge", "useAuth", "MainLayout", "Dashboard"]
    );

    let hook = report.records().find(|r| r.name == "useAuth").unwrap();
    assert_eq!(hook.component_type, ComponentType::Hook);
    assert_eq!(hook.file_path, "src/hooks/useAuth.js");
    assert_eq!(hook.native_hooks_used, vec!["useContext", "useState"]);
    assert_eq!(hook.description.as_deref(), Some("Current session."));
    let returns = hook.jsdoc.as_ref().unwrap().returns.as_ref().unwrap();
    assert_eq!(returns.type_name.as_deref(), Some("{ user: object }"));

    let layout = report.records().find(|r| r.name == "MainLayout").unwrap();
    assert_eq!(layout.component_type, ComponentType::Layout);
    assert_eq!(layout.props, vec!["children"]);

    let page = report.records().find(|r| r.name == "Dashboard").unwrap();
    assert_eq!(page.component_type, ComponentType::Page);

    // the binary file is reported, not fatal
    assert_eq!(report.problem_count(), 1);
    let unreadable = report
        .warnings()
        .find(|w| w.reason_code == ReasonCode::UnreadableSource)
        .unwrap();
    assert_eq!(unreadable.file_path, "src/components/logo.js");
    assert_eq!(unreadable.candidate_name, None);
}

#[test]
fn test_hooks_rejected_by_default() {
    let root = project_path();
    let files = vec![root.join("src/hooks/useAuth.js")];
    let report = scan_paths(&root, &files, &ScanOptions::default());
    assert_eq!(report.record_count(), 0);
    let w = report.warnings().next().unwrap();
    assert_eq!(w.candidate_name.as_deref(), Some("useAuth"));
    assert_eq!(w.reason_code, ReasonCode::NotPascalCase);
}

#[test]
fn test_batch_output_is_deterministic() {
    let root = project_path();
    let config = project_config();
    let files = collect_files(&root, &config).unwrap();
    let mut reversed = files.clone();
    reversed.reverse();

    let a = scan_paths(&root, &files, &config.scan_options());
    let b = scan_paths(&root, &reversed, &config.scan_options());
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

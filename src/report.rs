//! Output formatting for scan results.
//!
//! - Pretty: colored terminal output grouped by file
//! - JSON: the full batch report for programmatic consumption

use colored::*;
use serde::Serialize;

use crate::batch::{BatchReport, FileReport};
use crate::error::Result;
use crate::scan::{ComponentRecord, ExtractionWarning};

// =============================================================================
// JSON Format
// =============================================================================

/// JSON envelope around a [`BatchReport`].
#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub version: &'static str,
    pub config: Option<&'a str>,
    pub files_scanned: usize,
    pub component_count: usize,
    pub rejected_count: usize,
    pub problem_count: usize,
    #[serde(flatten)]
    pub report: &'a BatchReport,
}

impl<'a> JsonReport<'a> {
    pub fn new(report: &'a BatchReport, config: Option<&'a str>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            config,
            files_scanned: report.files.len(),
            component_count: report.record_count(),
            rejected_count: report.rejection_count(),
            problem_count: report.problem_count(),
            report,
        }
    }
}

/// Render the JSON report as a pretty-printed string.
pub fn render_json(report: &BatchReport, config: Option<&str>) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonReport::new(report, config))?)
}

/// Write results in JSON format to stdout.
pub fn write_json(report: &BatchReport, config: Option<&str>) -> Result<()> {
    println!("{}", render_json(report, config)?);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in human-readable form to stdout.
pub fn write_pretty(report: &BatchReport, config: Option<&str>, show_rejected: bool) {
    // Header
    println!();
    print!("  ");
    print!("{}", "jsxscan".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Scanning: ".dimmed());
    println!("{}", report.root);
    print!("  {}", "Config:   ".dimmed());
    println!("{}", config.unwrap_or("(defaults)"));
    println!();

    for file in &report.files {
        write_file(file, show_rejected);
    }

    write_summary(report, show_rejected);
    println!();
}

fn write_file(file: &FileReport, show_rejected: bool) {
    let problems: Vec<&ExtractionWarning> = file
        .output
        .warnings
        .iter()
        .filter(|w| !w.reason_code.is_rejection())
        .collect();
    let rejected: Vec<&ExtractionWarning> = file.output.rejections().collect();

    let nothing_to_show = file.output.records.is_empty()
        && file.output.container.is_none()
        && problems.is_empty()
        && (!show_rejected || rejected.is_empty());
    if nothing_to_show {
        return;
    }

    println!("  {}", file.file_path.blue().bold());

    if let Some(container) = &file.output.container {
        print!("    {} ", "⇢".cyan());
        print!("container of {}", container.wrapped_component.bold());
        println!(" {}", format!("via {}", container.hocs_used.join(", ")).dimmed());
    }
    for record in &file.output.records {
        write_record(record);
    }
    for w in problems {
        write_warning(w, "WARN ".yellow());
    }
    if show_rejected {
        for w in rejected {
            write_warning(w, "SKIP ".dimmed());
        }
    }
    println!();
}

fn write_record(record: &ComponentRecord) {
    print!("    {} ", "✓".green());
    print!("{:<28}", record.name.bold());
    print!("{}", format!("{:<10}", record.component_type.as_str()).dimmed());
    if !record.props.is_empty() {
        print!(" props: {}", record.props.join(", "));
    }
    println!();

    let hooks: Vec<&str> = record
        .native_hooks_used
        .iter()
        .chain(&record.custom_hooks_used)
        .map(String::as_str)
        .collect();
    if !hooks.is_empty() {
        println!("      {} {}", "hooks:".dimmed(), hooks.join(", "));
    }
    if let Some(description) = &record.description {
        println!("      {}", description.italic());
    }
}

fn write_warning(w: &ExtractionWarning, tag: ColoredString) {
    print!("    {} ", tag);
    print!("{:<22}", w.reason_code.as_str().dimmed());
    if let Some(name) = &w.candidate_name {
        print!("{}", name);
    }
    if w.line > 0 {
        print!("{}", format!(":{}", w.line).dimmed());
    }
    println!();
    println!("            {}", w.message);
}

fn write_summary(report: &BatchReport, show_rejected: bool) {
    print!(
        "  {} component(s) in {} file(s)",
        report.record_count().to_string().green().bold(),
        report.files.len()
    );
    let problems = report.problem_count();
    if problems > 0 {
        print!("  {}", format!("{} warning(s)", problems).yellow());
    }
    let rejected = report.rejection_count();
    if rejected > 0 {
        print!("  {}", format!("({} rejected)", rejected).dimmed());
    }
    println!();
    if rejected > 0 && !show_rejected {
        println!("    {}", "(use --show-rejected to see details)".dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scan;

    #[test]
    fn test_json_envelope_flattens_report() {
        let output = scan("src/Button.jsx", "export const Button = () => <button />;\nconst x = 1;");
        let report = BatchReport {
            root: "/repo".to_string(),
            files: vec![FileReport {
                file_path: "src/Button.jsx".to_string(),
                output,
            }],
        };
        let json = render_json(&report, Some("jsxscan.yaml")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["config"], "jsxscan.yaml");
        assert_eq!(value["root"], "/repo");
        assert_eq!(value["files_scanned"], 1);
        assert_eq!(value["component_count"], 1);
        assert_eq!(value["rejected_count"], 1);
        assert_eq!(value["problem_count"], 0);
        let file = &value["files"][0];
        assert_eq!(file["file_path"], "src/Button.jsx");
        assert_eq!(file["records"][0]["name"], "Button");
        assert_eq!(file["records"][0]["jsdoc"], serde_json::Value::Null);
        assert_eq!(file["warnings"][0]["reason_code"], "not_pascal_case");
    }
}

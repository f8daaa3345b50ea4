//! Directory walking and parallel scanning of many files.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::scan::engine::unreadable;
use crate::scan::{ComponentRecord, ExtractionWarning, ScanOptions, ScanOutput, Scanner};

/// Scan output for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    /// Path relative to the scan root, `/`-separated.
    pub file_path: String,
    #[serde(flatten)]
    pub output: ScanOutput,
}

/// Scan output for a whole tree, sorted by file path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub root: String,
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn records(&self) -> impl Iterator<Item = &ComponentRecord> {
        self.files.iter().flat_map(|f| f.output.records.iter())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ExtractionWarning> {
        self.files.iter().flat_map(|f| f.output.warnings.iter())
    }

    pub fn record_count(&self) -> usize {
        self.files.iter().map(|f| f.output.records.len()).sum()
    }

    /// Warnings that describe degraded or skipped input, not rejections.
    pub fn problem_count(&self) -> usize {
        self.warnings().filter(|w| !w.reason_code.is_rejection()).count()
    }

    pub fn rejection_count(&self) -> usize {
        self.warnings().filter(|w| w.reason_code.is_rejection()).count()
    }
}

/// Collect the files under `root` that should be scanned, sorted.
///
/// A `root` that is itself a file is returned as is.
pub fn collect_files(root: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let extensions = config.extensions();
    let excluded = config.exclusion_set()?;
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && !config.is_ignored_dir(&name)
        })
    {
        let entry = entry.map_err(|source| Error::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if !extensions.contains(&ext) {
            continue;
        }
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if config.is_ignored_file(name) {
            continue;
        }
        if excluded.is_match(relative_path(root, path)) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

/// Scan `files` in parallel. Paths in the report are relative to `root`.
///
/// Read failures become `unreadable_source` warnings for that file.
pub fn scan_paths(root: &Path, files: &[PathBuf], options: &ScanOptions) -> BatchReport {
    let scanner = Scanner::new(options.clone());

    let mut reports: Vec<FileReport> = files
        .par_iter()
        .map(|path| {
            let file_path = relative_path(root, path);
            let output = match fs::read(path) {
                Ok(bytes) => scanner.scan_bytes(&file_path, &bytes),
                Err(e) => unreadable(&file_path, format!("cannot read file: {e}")),
            };
            FileReport { file_path, output }
        })
        .collect();

    reports.sort_by(|a, b| a.file_path.cmp(&b.file_path));

    for report in &reports {
        for w in report.output.warnings.iter().filter(|w| w.candidate_name.is_none()) {
            warn!(file = %w.file_path, "{}", w.message);
        }
    }

    let report = BatchReport {
        root: root.display().to_string(),
        files: reports,
    };
    info!(
        files = report.files.len(),
        records = report.record_count(),
        rejected = report.rejection_count(),
        problems = report.problem_count(),
        "scan complete"
    );
    report
}

/// `path` relative to `root`, joined with `/`.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let rel = if rel.as_os_str().is_empty() {
        Path::new(path.file_name().unwrap_or(path.as_os_str()))
    } else {
        rel
    };
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

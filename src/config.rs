//! Configuration file schema for jsxscan.
//!
//! Every field is optional; an absent file behaves like an empty one.

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::scan::ScanOptions;

/// File names searched for in the working directory, in order.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["jsxscan.yaml", ".jsxscan.yaml"];

/// Extensions scanned when the config does not list any.
pub const DEFAULT_EXTENSIONS: &[&str] = &["jsx", "tsx", "js", "ts"];

/// Build output, dependencies and VCS metadata.
pub const BASE_IGNORE_DIRS: &[&str] = &["node_modules", ".git", ".next", "dist", "build", ".venv", "venv"];

/// Directories that hold constants, types, tests and static assets rather
/// than components.
pub const COMPONENT_IGNORE_DIRS: &[&str] = &[
    "constants", "consts", "const", "config", "configs", "configuration", "types", "interfaces",
    "enums", "__tests__", "tests", "test", ".storybook", "vendor", "public", "static", "assets",
    "images", "icons", "logos", "fonts", "videos",
];

/// Directories only skipped while test files are excluded.
const TEST_DIRS: &[&str] = &["__tests__", "tests", "test"];

/// File name markers of tests and stories (`Button.test.jsx`).
const TEST_FILE_MARKERS: &[&str] = &[".test.", ".spec.", ".stories."];

/// Template written by `jsxscan init`.
pub const TEMPLATE: &str = r#"# jsxscan configuration
#
# Every field is optional. Remove a field to fall back to its default.

# File extensions to scan.
extensions: [jsx, tsx, js, ts]

# Extra directory names to skip, on top of the built-in list
# (node_modules, dist, build, constants, types, assets, ...).
ignore_dirs: []

# Glob patterns, relative to the scanned root, for paths to leave out.
excluded_paths:
  - "**/*.d.ts"
  # - "src/legacy/**"

# Emit records for custom hooks (useX functions in useX files).
include_hooks: false

# Names that are never components in this project.
reserved_names: []
  # - Trans

# Scan test files and test directories too.
include_test_files: false
"#;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Extensions to scan, without the dot. Empty means the defaults.
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Directory names skipped in addition to the built-in ones.
    #[serde(default)]
    pub ignore_dirs: Vec<String>,
    /// Glob patterns for paths to exclude (e.g. "**/legacy/**").
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    #[serde(default)]
    pub include_hooks: Option<bool>,
    /// Additional names rejected as reserved words.
    #[serde(default)]
    pub reserved_names: Vec<String>,
    /// Whether to include test files (default: false)
    #[serde(default)]
    pub include_test_files: Option<bool>,
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    /// Parse a config from YAML text. Blank text yields the defaults.
    pub fn parse_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load `explicit` if given, otherwise the first discovered file,
    /// otherwise the defaults. Returns the config and where it came from.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => discover(dir),
        };
        match path {
            Some(p) => {
                let config = Self::parse_file(&p)?;
                config.validate()?;
                Ok((config, Some(p)))
            }
            None => Ok((Self::default(), None)),
        }
    }

    /// Check that globs compile and the extension list is usable.
    pub fn validate(&self) -> Result<()> {
        for ext in &self.extensions {
            if ext.trim_start_matches('.').is_empty() {
                return Err(Error::Config("empty entry in extensions".to_string()));
            }
        }
        self.exclusion_set().map(|_| ())
    }

    /// Extensions to scan, normalized without a leading dot.
    pub fn extensions(&self) -> Vec<String> {
        if self.extensions.is_empty() {
            return DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect();
        }
        self.extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect()
    }

    /// Returns whether to include test files (defaults to false).
    pub fn should_include_test_files(&self) -> bool {
        self.include_test_files.unwrap_or(false)
    }

    /// Returns whether hook records are emitted (defaults to false).
    pub fn should_include_hooks(&self) -> bool {
        self.include_hooks.unwrap_or(false)
    }

    /// True if a directory with this name is never descended into.
    pub fn is_ignored_dir(&self, name: &str) -> bool {
        if TEST_DIRS.contains(&name) {
            return !self.should_include_test_files();
        }
        BASE_IGNORE_DIRS.contains(&name)
            || COMPONENT_IGNORE_DIRS.contains(&name)
            || self.ignore_dirs.iter().any(|d| d == name)
    }

    /// True for `*.test.*`, `*.spec.*` and `*.stories.*` files while test
    /// files are excluded.
    pub fn is_ignored_file(&self, file_name: &str) -> bool {
        !self.should_include_test_files() && TEST_FILE_MARKERS.iter().any(|m| file_name.contains(m))
    }

    /// Compile `excluded_paths` into a single matcher.
    pub fn exclusion_set(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            let glob = Glob::new(pattern).map_err(|e| {
                Error::Config(format!("invalid excluded_paths pattern {:?}: {}", pattern, e))
            })?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|e| Error::Config(format!("invalid excluded_paths: {}", e)))
    }

    /// Engine options derived from this config.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            include_hooks: self.should_include_hooks(),
            extra_reserved: self.reserved_names.clone(),
        }
    }
}

/// Find a config file in `dir`, then in the user config directory.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .chain(user_config_path())
        .find(|p| p.is_file())
}

/// `<config dir>/jsxscan/config.yaml` for the current user.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "jsxscan").map(|dirs| dirs.config_dir().join("config.yaml"))
}

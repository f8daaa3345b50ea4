//! jsxscan - component metadata extraction for JSX/TSX sources.
//!
//! Given the text of a `.jsx`, `.tsx`, `.js` or `.ts` file, jsxscan decides
//! which top-level declarations are genuine UI components and extracts their
//! props, hooks, imports, exports and doc comments into stable
//! [`ComponentRecord`]s. Redux container files are reported as such. Everything else (constants, factories, instances,
//! helpers) is rejected with a reason code.
//!
//! # Architecture
//!
//! - `scan`: the pure per-file engine (no I/O, no shared state)
//! - `batch`: directory walking and parallel scanning with rayon
//! - `config`: YAML configuration schema and discovery
//! - `report`: output formatting (pretty, JSON)
//! - `cli`: the `jsxscan` command
//!
//! # Example
//!
//! ```
//! let out = jsxscan::scan(
//!     "src/Greeting.jsx",
//!     "export const Greeting = ({ name }) => <h1>Hello {name}</h1>;",
//! );
//! assert_eq!(out.records[0].props, vec!["name"]);
//! ```

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod scan;

pub use batch::{collect_files, scan_paths, BatchReport, FileReport};
pub use config::Config;
pub use error::{Error, Result};
pub use scan::{
    scan, scan_bytes, ComponentRecord, ComponentType, ContainerInfo, DocBlock, ExtractionWarning,
    ReasonCode, ScanOptions, ScanOutput, Scanner, Verdict,
};

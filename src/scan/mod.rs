//! Component classification and extraction engine.
//!
//! Each source file flows through the same stages:
//!
//! 1. [`source`] masks comments and string contents,
//! 2. [`declarations`] enumerates top-level candidates,
//! 3. [`naming`] and [`factory`] decide whether a candidate is a component,
//! 4. [`extract`] builds the [`ComponentRecord`] using [`props`], [`hooks`],
//!    [`imports`] and [`jsdoc`].
//!
//! File-level facts (imports, exports and [`containers`]) are computed once
//! per file.
//!
//! Rejections and degraded extractions come back as [`ExtractionWarning`]s.

pub mod containers;
pub mod declarations;
pub mod engine;
pub mod extract;
pub mod factory;
pub mod hooks;
pub mod imports;
pub mod jsdoc;
pub mod naming;
pub mod props;
pub mod source;
mod types;

pub use engine::{scan, scan_bytes, ScanOptions, Scanner};
pub use types::*;

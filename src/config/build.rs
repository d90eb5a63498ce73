//! `[build]` section configuration.
//!
//! Where artifacts are read from, where the page is written, and how entries
//! are grouped and reconciled.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How entries are partitioned into collapsible sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GroupMode {
    /// By group size parsed from the filename, ascending, unknown last (default).
    #[default]
    Size,
    /// By calendar day of the resolved timestamp, most recent first.
    Date,
}

/// `[build]` section in vizindex.toml.
///
/// # Example
/// ```toml
/// [build]
/// input = "results"
/// output = "index.html"
/// extensions = ["html"]
/// group = "size"
/// threshold = 1.0
///
/// [build.ledger]
/// enable = true
/// path = "index.json"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Directory scanned for visualization files (not recursive).
    #[serde(default = "defaults::build::input")]
    #[educe(Default = defaults::build::input())]
    pub input: PathBuf,

    /// Generated index page. Also read back for previously recorded timestamps.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// File extensions (without dot) treated as visualizations.
    #[serde(default = "defaults::build::extensions")]
    #[educe(Default = defaults::build::extensions())]
    pub extensions: Vec<String>,

    /// Section grouping.
    #[serde(default)]
    pub group: GroupMode,

    /// Minimum mtime advance, in seconds, that counts as a real edit.
    #[serde(default = "defaults::build::threshold")]
    #[educe(Default = defaults::build::threshold())]
    pub threshold: f64,

    /// Structured timestamp record.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// `[build.ledger]` - JSON sidecar holding resolved timestamps.
///
/// When enabled the ledger is preferred over scraping the previous page;
/// scraping still fills in identifiers the ledger does not know.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    #[serde(default = "defaults::r#true")]
    #[educe(Default = defaults::r#true())]
    pub enable: bool,

    /// Ledger file path (relative to root).
    #[serde(default = "defaults::build::ledger::path")]
    #[educe(Default = defaults::build::ledger::path())]
    pub path: PathBuf,
}

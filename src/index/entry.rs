//! Artifacts as discovered on disk, and entries once their timestamp is resolved.

use super::{classify::GroupKey, reconcile::Resolved};
use chrono::NaiveDateTime;
use std::path::PathBuf;

/// A visualization file found in the input directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    /// Display name: the file name up to its first `.`.
    pub identifier: String,
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Modification time, `None` when it could not be read.
    pub modified: Option<NaiveDateTime>,
}

impl Artifact {
    pub fn new(identifier: impl Into<String>, path: impl Into<PathBuf>, modified: Option<NaiveDateTime>) -> Self {
        Self {
            identifier: identifier.into(),
            path: path.into(),
            modified,
        }
    }
}

/// An artifact with its reconciled timestamp and section key.
///
/// Built once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub identifier: String,
    pub artifact_path: PathBuf,
    pub group_key: GroupKey,
    /// Value read back from the previous run, if any.
    pub recorded: Option<NaiveDateTime>,
    /// Value read from disk in this run, if readable.
    pub filesystem: Option<NaiveDateTime>,
    pub resolved: Resolved,
}

impl Entry {
    #[inline]
    pub fn timestamp(&self) -> NaiveDateTime {
        self.resolved.timestamp
    }

    #[inline]
    pub fn is_fresh(&self) -> bool {
        self.resolved.is_fresh
    }
}

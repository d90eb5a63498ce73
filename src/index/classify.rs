//! Section keys: group size parsed from the filename, or calendar day.

use crate::config::GroupMode;
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::{cmp::Ordering, fmt, sync::LazyLock};

/// Filename conventions carrying a group size, most specific first.
///
/// - `gdance_sample_{split}_p{n}_{name}`
/// - `{prefix}_person{n}`
/// - `{prefix}_p{n}_{suffix}`
/// - `{prefix}person{n}`
static SIZE_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new(r"gdance_sample_[^_]+_p(\d+)_").unwrap(),
        Regex::new(r"_person(\d+)").unwrap(),
        Regex::new(r"_p(\d+)_").unwrap(),
        Regex::new(r"person(\d+)").unwrap(),
    ]
});

/// Key of the section an entry is listed under.
///
/// The ordering is the display order: sizes ascending, days most recent
/// first, `Unknown` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Size(u32),
    Date(NaiveDate),
    Unknown,
}

impl GroupKey {
    const fn rank(&self) -> u8 {
        match self {
            Self::Size(_) => 0,
            Self::Date(_) => 1,
            Self::Unknown => 2,
        }
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Size(a), Self::Size(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => b.cmp(a),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size(n) => write!(f, "{n} people"),
            Self::Date(day) => write!(f, "{}", day.format("%Y-%m-%d")),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// Group size encoded in a filename, if any convention matches.
pub fn group_size(name: &str) -> Option<u32> {
    SIZE_PATTERNS
        .iter()
        .find_map(|re| re.captures(name))
        .and_then(|caps| caps[1].parse().ok())
}

/// Section key for an entry under the given grouping mode.
pub fn group_key(mode: GroupMode, identifier: &str, resolved: NaiveDateTime) -> GroupKey {
    match mode {
        GroupMode::Size => group_size(identifier).map_or(GroupKey::Unknown, GroupKey::Size),
        GroupMode::Date => GroupKey::Date(resolved.date()),
    }
}

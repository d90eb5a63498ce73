//! Where recorded timestamps come from and go to.
//!
//! Reconciliation only sees a [`RecordedTimes`] map. Two sources can fill
//! it: the previous page itself (scraped) and the JSON ledger written next
//! to it. The page is what was last published, so it decides each value to
//! the second; the ledger adds sub-second precision where it agrees, and
//! names the page lacks. Pages produced before the ledger existed migrate
//! transparently, and a ledger left behind by runs with it disabled cannot
//! roll a time back.

use super::{entry::Entry, scrape::scrape};
use crate::{
    config::IndexConfig,
    log,
    utils::{date, persist::write_atomic},
};
use anyhow::{Context, Result, bail};
use chrono::{NaiveDateTime, SubsecRound};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::PathBuf,
};

/// Recorded timestamp per identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedTimes(FxHashMap<String, NaiveDateTime>);

impl RecordedTimes {
    pub fn get(&self, identifier: &str) -> Option<NaiveDateTime> {
        self.0.get(identifier).copied()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.0.contains_key(identifier)
    }

    /// Insert unless the identifier is already known. Returns whether it was inserted.
    pub fn insert_if_absent(&mut self, identifier: String, ts: NaiveDateTime) -> bool {
        match self.0.entry(identifier) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(ts);
                true
            }
        }
    }

    /// Add every identifier of `other` not present here. Returns how many were added.
    pub fn fill_from(&mut self, other: RecordedTimes) -> usize {
        other
            .0
            .into_iter()
            .filter(|(id, ts)| self.insert_if_absent(id.clone(), *ts))
            .count()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A place recorded timestamps can be loaded from.
pub trait TimestampSource {
    /// Short label for log lines.
    fn label(&self) -> &'static str;

    /// Load recorded times. A missing source is an empty map, not an error.
    fn load(&self) -> Result<RecordedTimes>;
}

// ============================================================================
// Previous page
// ============================================================================

/// The previously generated index page.
pub struct PageSource {
    path: PathBuf,
}

impl PageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TimestampSource for PageSource {
    fn label(&self) -> &'static str {
        "page"
    }

    fn load(&self) -> Result<RecordedTimes> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(scrape(&text)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log!("scrape"; "no previous {}, using file times", self.path.display());
                Ok(RecordedTimes::default())
            }
            Err(err) => Err(err).with_context(|| format!("Failed to read {}", self.path.display())),
        }
    }
}

// ============================================================================
// Ledger
// ============================================================================

const LEDGER_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct LedgerFile {
    version: u32,
    entries: BTreeMap<String, String>,
}

/// JSON sidecar mapping identifiers to resolved timestamps.
///
/// ```json
/// { "version": 1, "entries": { "run_person2": "2025-03-21T12:59:18.250000" } }
/// ```
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Replace the ledger with the resolved timestamps of `entries`.
    pub fn save<'a>(&self, entries: impl IntoIterator<Item = &'a Entry>) -> Result<()> {
        let file = LedgerFile {
            version: LEDGER_VERSION,
            entries: entries
                .into_iter()
                .map(|e| (e.identifier.clone(), date::format_ledger(e.timestamp())))
                .collect(),
        };
        let mut json = serde_json::to_string_pretty(&file).context("Failed to serialize ledger")?;
        json.push('\n');
        write_atomic(&self.path, json.as_bytes())?;
        log!("ledger"; "wrote {} timestamp(s) to {}", file.entries.len(), self.path.display());
        Ok(())
    }
}

impl TimestampSource for Ledger {
    fn label(&self) -> &'static str {
        "ledger"
    }

    fn load(&self) -> Result<RecordedTimes> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(RecordedTimes::default()),
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read {}", self.path.display()));
            }
        };

        let file: LedgerFile = serde_json::from_str(&text)
            .with_context(|| format!("Malformed ledger {}", self.path.display()))?;
        if file.version != LEDGER_VERSION {
            bail!(
                "Unsupported ledger version {} in {}",
                file.version,
                self.path.display()
            );
        }

        let mut times = RecordedTimes::default();
        for (id, raw) in file.entries {
            match date::parse_recorded(&raw) {
                Some(ts) => {
                    times.insert_if_absent(id, ts);
                }
                None => log!("warn"; "ledger: cannot parse time `{}` for {}", raw, id),
            }
        }
        Ok(times)
    }
}

// ============================================================================
// Combined loading
// ============================================================================

/// Load one source. A failing source is reported and treated as empty:
/// previous state is best-effort.
pub fn load_or_empty(source: &dyn TimestampSource) -> RecordedTimes {
    match source.load() {
        Ok(times) => {
            log!("store"; "{}: {} recorded", source.label(), times.len());
            times
        }
        Err(err) => {
            log!("warn"; "{}: {:#}, ignoring it", source.label(), err);
            RecordedTimes::default()
        }
    }
}

/// Combine the scraped page with the ledger.
///
/// A ledger value is used only when it shows as the same second the page
/// shows; otherwise the page wins. Names only the ledger knows are kept.
pub fn merge(page: RecordedTimes, ledger: RecordedTimes) -> RecordedTimes {
    if ledger.is_empty() {
        return page;
    }

    let mut merged = RecordedTimes::default();
    let mut stale = 0;
    for (id, shown) in page.0 {
        let ts = match ledger.get(&id) {
            Some(precise) if precise.trunc_subsecs(0) == shown.trunc_subsecs(0) => precise,
            Some(precise) => {
                log!("warn"; "{}: ledger has {}, page shows {}, using the page", id, precise, shown);
                stale += 1;
                shown
            }
            None => shown,
        };
        merged.0.insert(id, ts);
    }
    let ledger_only = merged.fill_from(ledger);

    log!(
        "store";
        "{} from page, {} only in ledger, {} stale ledger value(s)",
        merged.len() - ledger_only, ledger_only, stale
    );
    merged
}

/// Recorded times for this run according to the configuration.
pub fn load_recorded(config: &IndexConfig) -> RecordedTimes {
    let page = load_or_empty(&PageSource::new(&config.build.output));
    if !config.build.ledger.enable {
        return page;
    }
    let ledger = load_or_empty(&Ledger::new(&config.build.ledger.path));
    merge(page, ledger)
}

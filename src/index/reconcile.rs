//! Timestamp reconciliation.
//!
//! Decides, per artifact, whether the page shows the time the artifact was
//! first recorded or its current modification time.
//!
//! # Rules
//!
//! | recorded | mtime day | delta (mtime - recorded)  | result    | fresh | verdict       |
//! |----------|-----------|---------------------------|-----------|-------|---------------|
//! | none     | any       | -                         | mtime     | no    | `New`         |
//! | some     | today     | > threshold               | mtime     | yes   | `Updated`     |
//! | some     | today     | (0, threshold]            | recorded  | no    | `Jitter`      |
//! | some     | today     | <= 0                      | recorded  | no    | `NotAdvanced` |
//! | some     | not today | any                       | recorded  | no    | `Preserved`   |
//! | some     | unreadable| -                         | recorded  | no    | `Unreadable`  |
//! | none     | unreadable| -                         | now       | no    | `Unreadable`  |
//!
//! Only the day of the modification time matters, not the day of the
//! recorded value: an entry recorded last week and edited today is updated.
//! Re-running the generator on the same day without edits leaves every
//! timestamp unchanged.

use super::{
    classify::GroupKey,
    entry::{Artifact, Entry},
    store::RecordedTimes,
};
use crate::log;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// Default minimum mtime advance, in seconds, that counts as a real edit.
pub const DEFAULT_THRESHOLD: f64 = 1.0;

/// Which rule produced a [`Resolved`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No recorded value; the mtime is used.
    New,
    /// Modified today by more than the threshold.
    Updated,
    /// Modified today, but within the threshold of the recorded value.
    Jitter,
    /// Modified today without advancing past the recorded value.
    NotAdvanced,
    /// Not modified today.
    Preserved,
    /// The mtime could not be read.
    Unreadable,
}

impl Verdict {
    pub const fn describe(self) -> &'static str {
        match self {
            Self::New => "new file",
            Self::Updated => "modified today",
            Self::Jitter => "modified today within threshold, kept",
            Self::NotAdvanced => "modified today but not newer, kept",
            Self::Preserved => "kept recorded time",
            Self::Unreadable => "mtime unreadable",
        }
    }
}

/// Outcome of reconciling one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    /// Either the recorded value or the filesystem value, never a blend.
    pub timestamp: NaiveDateTime,
    /// True only for [`Verdict::Updated`].
    pub is_fresh: bool,
    pub verdict: Verdict,
}

impl Resolved {
    const fn kept(recorded: NaiveDateTime, verdict: Verdict) -> Self {
        Self {
            timestamp: recorded,
            is_fresh: false,
            verdict,
        }
    }
}

/// Signed difference in seconds, with microsecond precision.
fn seconds(delta: TimeDelta) -> f64 {
    delta
        .num_microseconds()
        .map_or(delta.num_seconds() as f64, |us| us as f64 / 1_000_000.0)
}

/// Reconcile one artifact's readable mtime against its recorded value.
pub fn reconcile(
    recorded: Option<NaiveDateTime>,
    filesystem: NaiveDateTime,
    today: NaiveDate,
    threshold: f64,
) -> Resolved {
    let Some(recorded) = recorded else {
        return Resolved {
            timestamp: filesystem,
            is_fresh: false,
            verdict: Verdict::New,
        };
    };

    if filesystem.date() != today {
        return Resolved::kept(recorded, Verdict::Preserved);
    }

    let delta = seconds(filesystem - recorded);
    if delta > threshold {
        Resolved {
            timestamp: filesystem,
            is_fresh: true,
            verdict: Verdict::Updated,
        }
    } else if delta > 0.0 {
        Resolved::kept(recorded, Verdict::Jitter)
    } else {
        Resolved::kept(recorded, Verdict::NotAdvanced)
    }
}

/// Reconciliation policy bound to a single generation clock.
///
/// "Now" is captured once so every artifact in a run is judged against the
/// same day.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler {
    now: NaiveDateTime,
    threshold: f64,
}

impl Reconciler {
    pub const fn new(now: NaiveDateTime, threshold: f64) -> Self {
        Self { now, threshold }
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    /// Like [`reconcile`], with an explicit state for an unreadable mtime.
    pub fn resolve(&self, recorded: Option<NaiveDateTime>, filesystem: Option<NaiveDateTime>) -> Resolved {
        match filesystem {
            Some(fs) => reconcile(recorded, fs, self.today(), self.threshold),
            None => Resolved::kept(recorded.unwrap_or(self.now), Verdict::Unreadable),
        }
    }
}

/// Counts of each verdict in one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub new: usize,
    pub updated: usize,
    pub kept: usize,
    pub unreadable: usize,
}

impl Summary {
    fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::New => self.new += 1,
            Verdict::Updated => self.updated += 1,
            Verdict::Jitter | Verdict::NotAdvanced | Verdict::Preserved => self.kept += 1,
            Verdict::Unreadable => self.unreadable += 1,
        }
    }

    pub const fn total(&self) -> usize {
        self.new + self.updated + self.kept + self.unreadable
    }
}

/// Resolve every artifact and attach its section key.
///
/// Discovery order is preserved.
pub fn reconcile_all<F>(
    artifacts: Vec<Artifact>,
    recorded: &RecordedTimes,
    reconciler: &Reconciler,
    classify: F,
) -> (Vec<Entry>, Summary)
where
    F: Fn(&str, NaiveDateTime) -> GroupKey,
{
    let mut summary = Summary::default();

    let entries = artifacts
        .into_iter()
        .map(|artifact| {
            let previous = recorded.get(&artifact.identifier);
            let resolved = reconciler.resolve(previous, artifact.modified);
            summary.record(resolved.verdict);
            log_resolution(&artifact, previous, &resolved);

            Entry {
                group_key: classify(&artifact.identifier, resolved.timestamp),
                identifier: artifact.identifier,
                artifact_path: artifact.path,
                recorded: previous,
                filesystem: artifact.modified,
                resolved,
            }
        })
        .collect();

    log!(
        "reconcile";
        "{} kept, {} updated today, {} new, {} unreadable",
        summary.kept, summary.updated, summary.new, summary.unreadable
    );
    if summary.updated > 0 {
        log!("reconcile"; "refreshed {} timestamp(s)", summary.updated);
    }

    (entries, summary)
}

fn log_resolution(artifact: &Artifact, recorded: Option<NaiveDateTime>, resolved: &Resolved) {
    let shown = resolved.timestamp.format("%Y-%m-%d %H:%M:%S");
    match (resolved.verdict, recorded, artifact.modified) {
        (Verdict::Unreadable, _, _) => log!(
            "warn";
            "{}: {}, showing {}",
            artifact.identifier, resolved.verdict.describe(), shown
        ),
        (Verdict::New, _, _) | (_, None, _) | (_, _, None) => log!(
            "reconcile";
            "{} -> {} ({})",
            artifact.identifier, shown, resolved.verdict.describe()
        ),
        (verdict, Some(rec), Some(fs)) => log!(
            "reconcile";
            "{} -> {} ({}, delta {:.1}s)",
            artifact.identifier, shown, verdict.describe(), seconds(fs - rec)
        ),
    }
}

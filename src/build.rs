//! Index page generation.
//!
//! # Pipeline
//!
//! ```text
//! build_index()
//!     │
//!     ├── scan::discover()        input dir → artifacts (name order)
//!     ├── store::load_recorded()  previous page, refined by the ledger
//!     ├── reconcile_all()         recorded vs mtime → entries
//!     ├── group_and_order()       sections in display order
//!     ├── render()                → HTML
//!     └── write_atomic()          page, then ledger
//! ```
//!
//! Nothing is written unless every earlier step succeeded.

use crate::{
    config::IndexConfig,
    index::{
        classify::group_key,
        group::{Group, group_and_order},
        reconcile::{Reconciler, Summary, reconcile_all},
        render::{Page, render},
        scan::discover,
        store::{Ledger, load_recorded},
    },
    log,
    utils::{date, persist::write_atomic},
};
use anyhow::{Result, bail};
use std::path::PathBuf;

/// What a build produced.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub output: PathBuf,
    pub summary: Summary,
    pub groups: usize,
}

/// Regenerate the index page (and ledger) from the input directory.
pub fn build_index(config: &IndexConfig) -> Result<BuildReport> {
    let build = &config.build;

    let artifacts: Vec<_> = discover(&build.input, &build.extensions)?
        .into_iter()
        .filter(|a| a.path != build.output && a.path != build.ledger.path)
        .collect();
    if artifacts.is_empty() {
        bail!(
            "No visualization files (*.{}) found in `{}`",
            build.extensions.join(", *."),
            build.input.display()
        );
    }

    let recorded = load_recorded(config);
    let reconciler = Reconciler::new(date::now(), build.threshold);
    let (entries, summary) = reconcile_all(artifacts, &recorded, &reconciler, |id, ts| {
        group_key(build.group, id, ts)
    });

    let groups: Vec<Group> = group_and_order(entries).collect();
    for group in &groups {
        log!("group"; "{}: {} entries", group.key, group.entries.len());
    }

    let html = render(&groups, &summary, &Page::from_config(config));
    write_atomic(&build.output, html.as_bytes())?;
    log!("write"; "{} ({} entries in {} sections)", build.output.display(), summary.total(), groups.len());

    if build.ledger.enable {
        Ledger::new(&build.ledger.path).save(groups.iter().flat_map(|g| &g.entries))?;
    }

    Ok(BuildReport {
        output: build.output.clone(),
        summary,
        groups: groups.len(),
    })
}

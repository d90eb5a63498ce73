//! Artifact discovery in the input directory.

use super::entry::Artifact;
use crate::{log, utils::date};
use anyhow::{Result, bail};
use rustc_hash::FxHashSet;
use std::path::Path;
use walkdir::WalkDir;

/// List the visualization files directly inside `input`.
///
/// Only regular files whose name ends in `.{ext}` for one of `extensions`
/// (compared case-insensitively) are kept. Files are visited in name order,
/// so when two files share an identifier the first one wins.
pub fn discover(input: &Path, extensions: &[String]) -> Result<Vec<Artifact>> {
    if !input.is_dir() {
        bail!("Input directory `{}` not found", input.display());
    }

    let suffixes: Vec<String> = extensions
        .iter()
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .collect();

    let mut seen = FxHashSet::default();
    let mut artifacts = Vec::new();

    for entry in WalkDir::new(input)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let Some(name) = entry.file_name().to_str() else {
            log!("warn"; "skipping non UTF-8 file name {:?}", entry.file_name());
            continue;
        };
        if !has_suffix(name, &suffixes) {
            continue;
        }

        let identifier = identifier_of(name).to_owned();
        if identifier.is_empty() {
            log!("warn"; "{} has no name before the extension, skipping it", name);
            continue;
        }
        if !seen.insert(identifier.clone()) {
            log!("warn"; "{} also maps to `{}`, skipping it", name, identifier);
            continue;
        }

        let modified = match entry
            .metadata()
            .map_err(std::io::Error::from)
            .and_then(|meta| date::modified(&meta))
        {
            Ok(ts) => Some(ts),
            Err(err) => {
                log!("warn"; "cannot read mtime of {}: {}", name, err);
                None
            }
        };

        artifacts.push(Artifact::new(identifier, entry.into_path(), modified));
    }

    log!("scan"; "found {} artifact(s) in {}", artifacts.len(), input.display());
    Ok(artifacts)
}

fn has_suffix(name: &str, suffixes: &[String]) -> bool {
    let lower = name.to_ascii_lowercase();
    suffixes.iter().any(|s| lower.ends_with(s.as_str()))
}

/// File name up to its first `.`.
fn identifier_of(name: &str) -> &str {
    name.split_once('.').map_or(name, |(stem, _)| stem)
}

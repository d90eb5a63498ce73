//! Partition entries into sections and order them for display.

use super::{classify::GroupKey, entry::Entry};
use std::{cmp::Reverse, collections::BTreeMap};

/// One page section: a key and its entries, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: GroupKey,
    pub entries: Vec<Entry>,
}

/// Group entries by key, in display order.
///
/// Sections follow [`GroupKey`]'s ordering. Inside a section entries are
/// sorted by resolved timestamp, newest first; the sort is stable so equal
/// timestamps keep discovery order.
pub fn group_and_order(entries: Vec<Entry>) -> impl Iterator<Item = Group> {
    let mut buckets: BTreeMap<GroupKey, Vec<Entry>> = BTreeMap::new();
    for entry in entries {
        buckets.entry(entry.group_key).or_default().push(entry);
    }

    buckets.into_iter().map(|(key, mut entries)| {
        entries.sort_by_key(|e| Reverse(e.timestamp()));
        Group { key, entries }
    })
}

//! Partitioning a page of entries into ordered groups
//!
//! The pipeline runs in a fixed order:
//! 1. group by key, keeping first-occurrence order of keys and arrival
//!    order of entries within a group
//! 2. restrict to the display filter when it is non-empty
//! 3. stable-sort export-pinned groups first
//! 4. restrict to pinned groups when only-pinned is set

use std::collections::HashMap;

use tflens_core::{GroupKey, LogEntry, PairingMode};

use crate::store::SelectionSnapshot;

/// One group of entries sharing a key
#[derive(Debug, Clone, PartialEq)]
pub struct Group<'a> {
    pub key: GroupKey,
    /// Persisted form of `key`, used for selection lookups
    pub storage_key: String,
    pub entries: Vec<&'a LogEntry>,
    pub pinned: bool,
}

/// Result of one build pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedPage<'a> {
    /// Groups to render, in render order
    pub groups: Vec<Group<'a>>,
    /// Number of distinct keys on the page before any restriction
    pub available: usize,
    /// Display-filter keys that match no group on this page
    pub unmatched_filter_keys: usize,
    pub filter_active: bool,
    pub only_pinned: bool,
}

/// Builds ordered groups for a pairing mode
#[derive(Debug, Clone, Copy)]
pub struct GroupBuilder {
    mode: PairingMode,
}

impl GroupBuilder {
    pub fn new(mode: PairingMode) -> Self {
        Self { mode }
    }

    /// Step 1 only: group by key in first-seen order
    pub fn partition<'a>(&self, entries: &'a [LogEntry]) -> Vec<Group<'a>> {
        let mut groups: Vec<Group<'a>> = Vec::new();
        let mut index: HashMap<GroupKey, usize> = HashMap::new();

        for entry in entries {
            let key = GroupKey::for_entry(self.mode, entry);
            match index.get(&key) {
                Some(&i) => groups[i].entries.push(entry),
                None => {
                    index.insert(key.clone(), groups.len());
                    let storage_key = key.storage_key();
                    groups.push(Group {
                        key,
                        storage_key,
                        entries: vec![entry],
                        pinned: false,
                    });
                }
            }
        }
        groups
    }

    /// Full pipeline against a selection snapshot
    pub fn build<'a>(&self, entries: &'a [LogEntry], selection: &SelectionSnapshot) -> GroupedPage<'a> {
        let mut groups = self.partition(entries);
        let available = groups.len();

        let filter = &selection.display_filter;
        let filter_active = !filter.is_empty();
        let mut unmatched_filter_keys = 0;
        if filter_active {
            unmatched_filter_keys = filter
                .iter()
                .filter(|k| !groups.iter().any(|g| g.storage_key == *k))
                .count();
            groups.retain(|g| filter.contains(&g.storage_key));
        }

        for group in &mut groups {
            group.pinned = selection.export_pins.contains(&group.storage_key);
        }
        // `sort_by_key` is stable, so unpinned groups keep their relative order
        groups.sort_by_key(|g| !g.pinned);

        if selection.only_pinned {
            groups.retain(|g| g.pinned);
        }

        GroupedPage {
            groups,
            available,
            unmatched_filter_keys,
            filter_active,
            only_pinned: selection.only_pinned,
        }
    }
}

//! Persisted selection state: export pins, display filter, collapse map,
//! only-pinned flag and read markers
//!
//! Every category lives under its own scope key built from the category
//! name, the run id and (for per-mode state) the pairing mode:
//!
//! | key                             | value                     |
//! |---------------------------------|---------------------------|
//! | `export-pin:{run}:{pairBy}`     | JSON array of group keys  |
//! | `display-filter:{run}:{pairBy}` | JSON array of group keys  |
//! | `collapse-state:{run}:{pairBy}` | JSON object `{key: bool}` |
//! | `only-pinned:{run}`             | `"1"` / `"0"`             |
//! | `read-marks:{run}`              | JSON array of entry ids   |
//!
//! Stored text that is missing or unparsable reads as empty.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use tflens_core::prelude::*;
use tflens_core::{EntryId, PairingMode, RunId};

use super::KvStore;

const COLLAPSE_CATEGORY: &str = "collapse-state";
const ONLY_PINNED_CATEGORY: &str = "only-pinned";
const READ_MARKS_CATEGORY: &str = "read-marks";

/// Purpose of a persisted group-key set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySetPurpose {
    /// Groups marked for a later export request
    ExportPin,
    /// Groups the view is restricted to; empty means no restriction
    DisplayFilter,
}

impl KeySetPurpose {
    fn category(&self) -> &'static str {
        match self {
            KeySetPurpose::ExportPin => "export-pin",
            KeySetPurpose::DisplayFilter => "display-filter",
        }
    }
}

/// (run, pairing mode) pair that per-mode state is scoped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionScope {
    pub run_id: RunId,
    pub pairing: PairingMode,
}

impl SelectionScope {
    pub fn new(run_id: RunId, pairing: PairingMode) -> Self {
        Self { run_id, pairing }
    }

    fn storage_key(&self, category: &str) -> String {
        format!("{category}:{}:{}", self.run_id, self.pairing.as_wire())
    }
}

/// Ordered set of group keys. Keeps insertion order, no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    keys: Vec<String>,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Returns false when the key was already present
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        let key = key.into();
        if self.contains(&key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.keys.len();
        self.keys.retain(|k| k != key);
        self.keys.len() != before
    }

    /// Flip membership and return the new state
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.remove(key) {
            false
        } else {
            self.keys.push(key.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.keys.clone()
    }

    fn decode(text: &str) -> Option<Self> {
        let keys: Vec<String> = serde_json::from_str(text).ok()?;
        Some(keys.into_iter().collect())
    }

    fn encode(&self) -> String {
        serde_json::to_string(&self.keys).unwrap_or_else(|_| "[]".to_string())
    }
}

impl FromIterator<String> for KeySet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = KeySet::new();
        for key in iter {
            set.insert(key);
        }
        set
    }
}

impl<'a> FromIterator<&'a str> for KeySet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}

/// Per-group fold state. Keys absent from the map are expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseMap {
    flags: BTreeMap<String, bool>,
}

impl CollapseMap {
    pub fn is_collapsed(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: impl Into<String>, collapsed: bool) {
        self.flags.insert(key.into(), collapsed);
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Accepts booleans and the numeric `1`/`0` flags older files carry
    fn decode(text: &str) -> Option<Self> {
        let object = match serde_json::from_str::<Value>(text).ok()? {
            Value::Object(object) => object,
            _ => return None,
        };
        let flags = object
            .into_iter()
            .filter_map(|(key, value)| {
                let collapsed = match value {
                    Value::Bool(b) => b,
                    Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
                    _ => return None,
                };
                Some((key, collapsed))
            })
            .collect();
        Some(Self { flags })
    }

    fn encode(&self) -> String {
        serde_json::to_string(&self.flags).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Read-only copy of the state one render pass needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSnapshot {
    pub export_pins: KeySet,
    pub display_filter: KeySet,
    pub collapsed: CollapseMap,
    pub only_pinned: bool,
    pub read_marks: BTreeSet<EntryId>,
}

/// Selection state over a [`KvStore`]
pub struct SelectionStore {
    kv: Box<dyn KvStore>,
}

impl std::fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionStore").finish_non_exhaustive()
    }
}

impl SelectionStore {
    pub fn new(kv: impl KvStore + 'static) -> Self {
        Self { kv: Box::new(kv) }
    }

    /// Store backed by process memory only
    pub fn in_memory() -> Self {
        Self::new(super::MemoryKvStore::new())
    }

    // ─────────────────────────────────────────────────────────────
    // Key sets
    // ─────────────────────────────────────────────────────────────

    pub fn key_set(&self, purpose: KeySetPurpose, scope: SelectionScope) -> KeySet {
        let key = scope.storage_key(purpose.category());
        self.read(&key, KeySet::decode).unwrap_or_default()
    }

    /// Flip `group` in the set and return its new membership
    pub fn toggle_key(&mut self, purpose: KeySetPurpose, scope: SelectionScope, group: &str) -> bool {
        let mut set = self.key_set(purpose, scope);
        let member = set.toggle(group);
        self.write_key_set(purpose, scope, &set);
        member
    }

    /// Replace the whole set in one write
    pub fn replace_key_set(&mut self, purpose: KeySetPurpose, scope: SelectionScope, set: &KeySet) {
        self.write_key_set(purpose, scope, set);
    }

    pub fn clear_key_set(&mut self, purpose: KeySetPurpose, scope: SelectionScope) {
        let key = scope.storage_key(purpose.category());
        self.remove(&key);
    }

    fn write_key_set(&mut self, purpose: KeySetPurpose, scope: SelectionScope, set: &KeySet) {
        let key = scope.storage_key(purpose.category());
        self.write(&key, set.encode());
    }

    // ─────────────────────────────────────────────────────────────
    // Collapse state
    // ─────────────────────────────────────────────────────────────

    pub fn collapse_map(&self, scope: SelectionScope) -> CollapseMap {
        let key = scope.storage_key(COLLAPSE_CATEGORY);
        self.read(&key, CollapseMap::decode).unwrap_or_default()
    }

    /// Flip one group's fold state and return the new value
    pub fn toggle_collapsed(&mut self, scope: SelectionScope, group: &str) -> bool {
        let mut map = self.collapse_map(scope);
        let collapsed = !map.is_collapsed(group);
        map.set(group, collapsed);
        self.write(&scope.storage_key(COLLAPSE_CATEGORY), map.encode());
        collapsed
    }

    /// Replace the map with every given group collapsed
    pub fn collapse_all<'a>(&mut self, scope: SelectionScope, groups: impl IntoIterator<Item = &'a str>) {
        let mut map = CollapseMap::default();
        for group in groups {
            map.set(group, true);
        }
        self.write(&scope.storage_key(COLLAPSE_CATEGORY), map.encode());
    }

    /// Replace the map with an empty one
    pub fn expand_all(&mut self, scope: SelectionScope) {
        self.write(
            &scope.storage_key(COLLAPSE_CATEGORY),
            CollapseMap::default().encode(),
        );
    }

    // ─────────────────────────────────────────────────────────────
    // Per-run flags
    // ─────────────────────────────────────────────────────────────

    pub fn only_pinned(&self, run_id: RunId) -> bool {
        self.kv
            .get(&run_key(ONLY_PINNED_CATEGORY, run_id))
            .is_some_and(|v| v == "1")
    }

    pub fn set_only_pinned(&mut self, run_id: RunId, only_pinned: bool) {
        let value = if only_pinned { "1" } else { "0" };
        self.write(&run_key(ONLY_PINNED_CATEGORY, run_id), value.to_string());
    }

    pub fn read_marks(&self, run_id: RunId) -> BTreeSet<EntryId> {
        self.read(&run_key(READ_MARKS_CATEGORY, run_id), |text| {
            serde_json::from_str::<BTreeSet<EntryId>>(text).ok()
        })
        .unwrap_or_default()
    }

    /// Returns false when the entry was already read
    pub fn mark_read(&mut self, run_id: RunId, entry_id: EntryId) -> bool {
        let mut marks = self.read_marks(run_id);
        if !marks.insert(entry_id) {
            return false;
        }
        let value = serde_json::to_string(&marks).unwrap_or_else(|_| "[]".to_string());
        self.write(&run_key(READ_MARKS_CATEGORY, run_id), value);
        true
    }

    /// Everything a render pass of `scope` needs
    pub fn snapshot(&self, scope: SelectionScope) -> SelectionSnapshot {
        SelectionSnapshot {
            export_pins: self.key_set(KeySetPurpose::ExportPin, scope),
            display_filter: self.key_set(KeySetPurpose::DisplayFilter, scope),
            collapsed: self.collapse_map(scope),
            only_pinned: self.only_pinned(scope.run_id),
            read_marks: self.read_marks(scope.run_id),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Fail-open plumbing
    // ─────────────────────────────────────────────────────────────

    fn read<T>(&self, key: &str, decode: impl FnOnce(&str) -> Option<T>) -> Option<T> {
        let text = self.kv.get(key)?;
        let value = decode(&text);
        if value.is_none() {
            debug!("Ignoring unparsable state under {}: {:?}", key, text);
        }
        value
    }

    fn write(&mut self, key: &str, value: String) {
        if let Err(e) = self.kv.set(key, value) {
            warn!("Failed to persist {}: {}", key, e);
        }
    }

    fn remove(&mut self, key: &str) {
        if let Err(e) = self.kv.remove(key) {
            warn!("Failed to remove {}: {}", key, e);
        }
    }
}

fn run_key(category: &str, run_id: RunId) -> String {
    format!("{category}:{run_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FileKvStore, MemoryKvStore};
    use tempfile::tempdir;

    fn scope() -> SelectionScope {
        SelectionScope::new(7, PairingMode::Correlation)
    }

    #[test]
    fn test_scope_keys_are_exact() {
        let s = SelectionScope::new(3, PairingMode::Resource);
        assert_eq!(
            s.storage_key(KeySetPurpose::ExportPin.category()),
            "export-pin:3:resource"
        );
        assert_eq!(
            s.storage_key(KeySetPurpose::DisplayFilter.category()),
            "display-filter:3:resource"
        );
        assert_eq!(s.storage_key(COLLAPSE_CATEGORY), "collapse-state:3:resource");
        assert_eq!(run_key(ONLY_PINNED_CATEGORY, 3), "only-pinned:3");
    }

    #[test]
    fn test_toggle_writes_only_its_own_set() {
        let mut store = SelectionStore::in_memory();
        assert!(store.toggle_key(KeySetPurpose::ExportPin, scope(), "r1"));

        let pins = store.key_set(KeySetPurpose::ExportPin, scope());
        assert!(pins.contains("r1"));
        assert!(store
            .key_set(KeySetPurpose::DisplayFilter, scope())
            .is_empty());
        assert!(store.collapse_map(scope()).is_empty());

        assert!(!store.toggle_key(KeySetPurpose::ExportPin, scope(), "r1"));
        assert!(store.key_set(KeySetPurpose::ExportPin, scope()).is_empty());
    }

    #[test]
    fn test_scopes_do_not_collide() {
        let mut store = SelectionStore::in_memory();
        let other_mode = SelectionScope::new(7, PairingMode::Phase);
        let other_run = SelectionScope::new(8, PairingMode::Correlation);

        store.toggle_key(KeySetPurpose::ExportPin, scope(), "r1");

        assert!(store.key_set(KeySetPurpose::ExportPin, other_mode).is_empty());
        assert!(store.key_set(KeySetPurpose::ExportPin, other_run).is_empty());
    }

    #[test]
    fn test_unparsable_values_read_as_empty() {
        let mut kv = MemoryKvStore::new();
        kv.set("export-pin:7:tf_req_id", "{oops".into()).unwrap();
        kv.set("collapse-state:7:tf_req_id", "[1,2]".into()).unwrap();
        kv.set("read-marks:7", "\"x\"".into()).unwrap();
        let store = SelectionStore::new(kv);

        assert!(store.key_set(KeySetPurpose::ExportPin, scope()).is_empty());
        assert!(store.collapse_map(scope()).is_empty());
        assert!(store.read_marks(7).is_empty());
        assert!(!store.only_pinned(7));
    }

    #[test]
    fn test_collapse_map_accepts_numeric_flags() {
        let mut kv = MemoryKvStore::new();
        kv.set("collapse-state:7:tf_req_id", r#"{"a":1,"b":0,"c":true}"#.into())
            .unwrap();
        let store = SelectionStore::new(kv);
        let map = store.collapse_map(scope());
        assert!(map.is_collapsed("a"));
        assert!(!map.is_collapsed("b"));
        assert!(map.is_collapsed("c"));
        assert!(!map.is_collapsed("missing"));
    }

    #[test]
    fn test_collapse_all_replaces_and_expand_all_clears() {
        let mut store = SelectionStore::in_memory();
        store.toggle_collapsed(scope(), "old");
        store.collapse_all(scope(), ["a", "b"]);

        let map = store.collapse_map(scope());
        assert!(map.is_collapsed("a"));
        assert!(map.is_collapsed("b"));
        assert!(!map.is_collapsed("old"));

        store.expand_all(scope());
        assert!(store.collapse_map(scope()).is_empty());
    }

    #[test]
    fn test_toggle_collapsed_round_trip() {
        let mut store = SelectionStore::in_memory();
        assert!(store.toggle_collapsed(scope(), "g"));
        assert!(store.collapse_map(scope()).is_collapsed("g"));
        assert!(!store.toggle_collapsed(scope(), "g"));
    }

    #[test]
    fn test_only_pinned_and_read_marks() {
        let mut store = SelectionStore::in_memory();
        store.set_only_pinned(7, true);
        assert!(store.only_pinned(7));
        assert!(!store.only_pinned(8));

        assert!(store.mark_read(7, 42));
        assert!(!store.mark_read(7, 42));
        assert!(store.read_marks(7).contains(&42));
        assert!(store.read_marks(8).is_empty());
    }

    #[test]
    fn test_selection_survives_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut store = SelectionStore::new(FileKvStore::open(&path));
        let keys: KeySet = ["r2", "r1", "no-correlation"].into_iter().collect();
        store.replace_key_set(KeySetPurpose::DisplayFilter, scope(), &keys);
        store.toggle_key(KeySetPurpose::ExportPin, scope(), "r1");
        store.set_only_pinned(7, true);
        let before = store.snapshot(scope());
        drop(store);

        let reloaded = SelectionStore::new(FileKvStore::open(&path));
        let after = reloaded.snapshot(scope());
        assert_eq!(after, before);
        assert_eq!(
            after.display_filter.to_vec(),
            vec!["r2", "r1", "no-correlation"]
        );
    }

    #[test]
    fn test_key_set_preserves_insertion_order() {
        let mut set = KeySet::new();
        set.insert("b");
        set.insert("a");
        assert!(!set.insert("b"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(!set.toggle("b"));
        assert!(set.toggle("c"));
        assert_eq!(set.to_vec(), vec!["a", "c"]);
    }

    #[test]
    fn test_clear_key_set() {
        let mut store = SelectionStore::in_memory();
        store.toggle_key(KeySetPurpose::DisplayFilter, scope(), "x");
        store.clear_key_set(KeySetPurpose::DisplayFilter, scope());
        assert!(store
            .key_set(KeySetPurpose::DisplayFilter, scope())
            .is_empty());
    }
}

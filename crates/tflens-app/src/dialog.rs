//! Group selection dialogs (export and display)
//!
//! A dialog lists every group of the run under its own pairing mode, as
//! reported by the backend. The checked set is seeded from the persisted
//! key set of the matching purpose and re-seeded whenever the dialog's
//! pairing mode changes.

use tflens_core::{GroupSummary, PairingMode, RunId};

use crate::context::GroupListContext;
use crate::store::{KeySet, KeySetPurpose};

/// Which selection the dialog edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Export,
    Display,
}

impl DialogKind {
    pub fn purpose(&self) -> KeySetPurpose {
        match self {
            DialogKind::Export => KeySetPurpose::ExportPin,
            DialogKind::Display => KeySetPurpose::DisplayFilter,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DialogKind::Export => "Export groups",
            DialogKind::Display => "Display groups",
        }
    }

    /// Label of the confirm action
    pub fn confirm_label(&self) -> &'static str {
        match self {
            DialogKind::Export => "export",
            DialogKind::Display => "apply",
        }
    }
}

/// Group list load state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogLoad {
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupDialog {
    pub kind: DialogKind,
    pub run_id: RunId,
    pub pairing: PairingMode,
    pub groups: Vec<GroupSummary>,
    pub selected: KeySet,
    pub cursor: usize,
    pub load: DialogLoad,
}

impl GroupDialog {
    pub fn new(kind: DialogKind, run_id: RunId, pairing: PairingMode, seed: KeySet) -> Self {
        Self {
            kind,
            run_id,
            pairing,
            groups: Vec::new(),
            selected: seed,
            cursor: 0,
            load: DialogLoad::Loading,
        }
    }

    /// Context the group listing for this dialog is fetched under
    pub fn context(&self) -> GroupListContext {
        GroupListContext {
            run_id: self.run_id,
            pairing: self.pairing,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.load == DialogLoad::Loading
    }

    pub fn set_groups(&mut self, groups: Vec<GroupSummary>) {
        self.groups = groups;
        self.cursor = self.cursor.min(self.groups.len().saturating_sub(1));
        self.load = DialogLoad::Loaded;
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.groups.clear();
        self.cursor = 0;
        self.load = DialogLoad::Failed(error.into());
    }

    /// Switch pairing mode; the list reloads and the checked set is
    /// replaced by `seed`
    pub fn switch_pairing(&mut self, pairing: PairingMode, seed: KeySet) {
        self.pairing = pairing;
        self.selected = seed;
        self.groups.clear();
        self.cursor = 0;
        self.load = DialogLoad::Loading;
    }

    pub fn reload(&mut self) {
        self.load = DialogLoad::Loading;
    }

    pub fn current(&self) -> Option<&GroupSummary> {
        self.groups.get(self.cursor)
    }

    pub fn is_checked(&self, key: &str) -> bool {
        self.selected.contains(key)
    }

    /// Toggle the group under the cursor and return its new state
    pub fn toggle_current(&mut self) -> Option<bool> {
        let key = self.current()?.key.clone();
        Some(self.selected.toggle(&key))
    }

    pub fn select_all(&mut self) {
        for group in &self.groups {
            self.selected.insert(group.key.clone());
        }
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.groups.len() {
            self.cursor += 1;
        }
    }

    /// Every checked key: listed groups in listing order, then checked keys
    /// the listing does not show (still loading, failed, or gone)
    pub fn chosen(&self) -> KeySet {
        let mut chosen: KeySet = self
            .groups
            .iter()
            .filter(|g| self.selected.contains(&g.key))
            .map(|g| g.key.clone())
            .collect();
        for key in self.selected.iter() {
            chosen.insert(key);
        }
        chosen
    }
}

//! Pure projection of a fetched page and selection state into a view tree
//!
//! `render` is recomputed on every state change; nothing here mutates
//! state. Controls carried by a group header (export pin, collapse) only
//! describe their current value. Activating them goes through messages.

use serde::Serialize;

use tflens_core::{EntryId, EntryStatus, LogEntry, LogsPage};

use crate::context::RequestContext;
use crate::grouping::{Group, GroupBuilder};
use crate::store::SelectionSnapshot;

/// Characters of the message shown in a row
const MESSAGE_PREVIEW_CHARS: usize = 200;

/// One log row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    pub entry_id: EntryId,
    pub time: String,
    pub level: String,
    pub phase: String,
    pub correlation_id: String,
    pub resource_type: String,
    pub resource_name: String,
    pub message: String,
    pub status: EntryStatus,
    /// Added by the backend because it shares a key with the page
    pub extra: bool,
    /// Not yet viewed in this run
    pub unread: bool,
}

impl RowView {
    fn from_entry(entry: &LogEntry, selection: &SelectionSnapshot) -> Self {
        Self {
            entry_id: entry.id,
            time: entry.formatted_time(),
            level: entry.level.clone().unwrap_or_default(),
            phase: entry.phase.clone().unwrap_or_default(),
            correlation_id: entry.correlation_id.clone().unwrap_or_default(),
            resource_type: entry.resource_type.clone().unwrap_or_default(),
            resource_name: entry.resource_name.clone().unwrap_or_default(),
            message: entry.message_preview(MESSAGE_PREVIEW_CHARS),
            status: entry.status(),
            extra: entry.is_extra,
            unread: !selection.read_marks.contains(&entry.id),
        }
    }
}

/// One group header plus its rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupView {
    /// Persisted key, used by pin/collapse messages
    pub key: String,
    pub label: String,
    pub sentinel: bool,
    /// Export-pin control state
    pub pinned: bool,
    /// Collapse control state; rows are hidden while set
    pub collapsed: bool,
    pub error_count: usize,
    pub rows: Vec<RowView>,
}

impl GroupView {
    fn from_group(group: &Group<'_>, selection: &SelectionSnapshot) -> Self {
        Self {
            key: group.storage_key.clone(),
            label: group.key.label(),
            sentinel: group.key.is_sentinel(),
            pinned: group.pinned,
            collapsed: selection.collapsed.is_collapsed(&group.storage_key),
            error_count: group
                .entries
                .iter()
                .filter(|e| e.status() != EntryStatus::Ok)
                .count(),
            rows: group
                .entries
                .iter()
                .map(|e| RowView::from_entry(e, selection))
                .collect(),
        }
    }
}

/// Informational line shown above the rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum Notice {
    /// The page came back with no entries
    NoEntries,
    /// A display filter is active and shows `shown` of `available` groups
    DisplayFilterActive { shown: usize, available: usize },
    /// None of the display-filter keys exist on this page
    DisplayFilterUnmatched { unmatched: usize },
    /// Only-pinned is on but no shown group is pinned
    NoPinnedGroups,
}

impl Notice {
    pub fn text(&self) -> String {
        match self {
            Notice::NoEntries => "No entries match the current filters".to_string(),
            Notice::DisplayFilterActive { shown, available } => {
                format!("Display filter: showing {shown} of {available} groups")
            }
            Notice::DisplayFilterUnmatched { unmatched } => format!(
                "Display filter matches no group on this page ({unmatched} selected keys not present)"
            ),
            Notice::NoPinnedGroups => "Only pinned groups shown, and none are pinned".to_string(),
        }
    }
}

/// Rendered body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum ViewBody {
    /// Nothing fetched yet
    NotLoaded,
    /// Rows in page order, no grouping
    Flat(Vec<RowView>),
    /// Groups in render order; may be empty
    Grouped(Vec<GroupView>),
}

/// A navigable line of the body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewLine {
    Header { group: usize },
    Row { group: Option<usize>, row: usize },
}

/// Complete view of the log pane
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewTree {
    /// `page P, size S, total T (+E extra)`
    pub status_line: String,
    /// `(N selected for export)` when any group is pinned
    pub pinned_indicator: Option<String>,
    pub notices: Vec<Notice>,
    pub body: ViewBody,
}

impl ViewTree {
    pub fn not_loaded() -> Self {
        Self {
            status_line: String::new(),
            pinned_indicator: None,
            notices: Vec::new(),
            body: ViewBody::NotLoaded,
        }
    }

    /// Visible lines in display order. Rows of collapsed groups are skipped.
    pub fn lines(&self) -> Vec<ViewLine> {
        match &self.body {
            ViewBody::NotLoaded => Vec::new(),
            ViewBody::Flat(rows) => (0..rows.len())
                .map(|row| ViewLine::Row { group: None, row })
                .collect(),
            ViewBody::Grouped(groups) => {
                let mut lines = Vec::new();
                for (gi, group) in groups.iter().enumerate() {
                    lines.push(ViewLine::Header { group: gi });
                    if !group.collapsed {
                        lines.extend((0..group.rows.len()).map(|row| ViewLine::Row {
                            group: Some(gi),
                            row,
                        }));
                    }
                }
                lines
            }
        }
    }

    pub fn group(&self, index: usize) -> Option<&GroupView> {
        match &self.body {
            ViewBody::Grouped(groups) => groups.get(index),
            _ => None,
        }
    }

    pub fn row(&self, line: ViewLine) -> Option<&RowView> {
        match (line, &self.body) {
            (ViewLine::Row { group: None, row }, ViewBody::Flat(rows)) => rows.get(row),
            (ViewLine::Row { group: Some(g), row }, ViewBody::Grouped(groups)) => {
                groups.get(g).and_then(|group| group.rows.get(row))
            }
            _ => None,
        }
    }

    /// Keys of every rendered group, for bulk collapse
    pub fn group_keys(&self) -> Vec<String> {
        match &self.body {
            ViewBody::Grouped(groups) => groups.iter().map(|g| g.key.clone()).collect(),
            _ => Vec::new(),
        }
    }
}

/// Project a page and selection state into a view tree
pub fn render(
    page: Option<&LogsPage>,
    context: &RequestContext,
    selection: &SelectionSnapshot,
) -> ViewTree {
    let Some(page) = page else {
        return ViewTree::not_loaded();
    };

    let extras = if page.extras > 0 {
        format!(" (+{} extra)", page.extras)
    } else {
        String::new()
    };
    let status_line = format!(
        "page {}, size {}, total {}{}",
        context.page, context.page_size, page.total, extras
    );

    let pinned_indicator = (!selection.export_pins.is_empty())
        .then(|| format!("({} selected for export)", selection.export_pins.len()));

    let mut notices = Vec::new();
    if page.items.is_empty() {
        notices.push(Notice::NoEntries);
    }

    let body = if context.group_rows {
        let grouped = GroupBuilder::new(context.pairing).build(&page.items, selection);
        if grouped.filter_active && grouped.available > 0 {
            let shown_by_filter = selection.display_filter.len() - grouped.unmatched_filter_keys;
            if shown_by_filter == 0 {
                notices.push(Notice::DisplayFilterUnmatched {
                    unmatched: grouped.unmatched_filter_keys,
                });
            } else {
                notices.push(Notice::DisplayFilterActive {
                    shown: shown_by_filter,
                    available: grouped.available,
                });
            }
        }
        if grouped.only_pinned && grouped.groups.is_empty() && grouped.available > 0 {
            notices.push(Notice::NoPinnedGroups);
        }
        ViewBody::Grouped(
            grouped
                .groups
                .iter()
                .map(|g| GroupView::from_group(g, selection))
                .collect(),
        )
    } else {
        ViewBody::Flat(
            page.items
                .iter()
                .map(|e| RowView::from_entry(e, selection))
                .collect(),
        )
    };

    ViewTree {
        status_line,
        pinned_indicator,
        notices,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tflens_core::{LogFilters, PairingMode};

    fn ctx(group_rows: bool) -> RequestContext {
        RequestContext {
            run_id: 1,
            pairing: PairingMode::Correlation,
            page: 1,
            page_size: 50,
            include_pairs: false,
            filters: LogFilters::default(),
            group_rows,
        }
    }

    fn entry(id: i64, corr: Option<&str>) -> LogEntry {
        let mut e = LogEntry::new(id, 1, format!("e{id}"));
        e.correlation_id = corr.map(str::to_string);
        e
    }

    fn page(items: Vec<LogEntry>) -> LogsPage {
        LogsPage {
            total: items.len() as u64,
            items,
            extras: 0,
        }
    }

    fn groups(tree: &ViewTree) -> &[GroupView] {
        match &tree.body {
            ViewBody::Grouped(g) => g,
            other => panic!("expected groups, got {other:?}"),
        }
    }

    #[test]
    fn test_not_loaded_is_distinct_from_empty() {
        let tree = render(None, &ctx(true), &SelectionSnapshot::default());
        assert_eq!(tree.body, ViewBody::NotLoaded);

        let tree = render(Some(&page(vec![])), &ctx(true), &SelectionSnapshot::default());
        assert_eq!(tree.body, ViewBody::Grouped(vec![]));
        assert_eq!(tree.notices, vec![Notice::NoEntries]);
    }

    #[test]
    fn test_headers_carry_pin_and_collapse_state() {
        let mut selection = SelectionSnapshot::default();
        selection.export_pins.insert("r2");
        selection.collapsed.set("r1", true);

        let p = page(vec![entry(1, Some("r1")), entry(2, Some("r2"))]);
        let tree = render(Some(&p), &ctx(true), &selection);
        let gs = groups(&tree);

        assert_eq!(gs[0].key, "r2");
        assert!(gs[0].pinned);
        assert!(!gs[0].collapsed);
        assert_eq!(gs[1].key, "r1");
        assert!(gs[1].collapsed);
        assert_eq!(tree.pinned_indicator.as_deref(), Some("(1 selected for export)"));
    }

    #[test]
    fn test_collapsed_rows_are_not_navigable() {
        let mut selection = SelectionSnapshot::default();
        selection.collapsed.set("a", true);
        let p = page(vec![entry(1, Some("a")), entry(2, Some("a")), entry(3, Some("b"))]);
        let tree = render(Some(&p), &ctx(true), &selection);
        assert_eq!(
            tree.lines(),
            vec![
                ViewLine::Header { group: 0 },
                ViewLine::Header { group: 1 },
                ViewLine::Row {
                    group: Some(1),
                    row: 0
                },
            ]
        );
        assert_eq!(tree.group_keys(), vec!["a", "b"]);
    }

    #[test]
    fn test_unread_flag_follows_read_marks() {
        let mut selection = SelectionSnapshot::default();
        selection.read_marks.insert(2);
        let p = page(vec![entry(1, None), entry(2, None)]);
        let tree = render(Some(&p), &ctx(false), &selection);
        match &tree.body {
            ViewBody::Flat(rows) => {
                assert!(rows[0].unread);
                assert!(!rows[1].unread);
            }
            other => panic!("expected flat rows, got {other:?}"),
        }
    }

    #[test]
    fn test_flat_mode_ignores_pins() {
        let mut selection = SelectionSnapshot::default();
        selection.export_pins.insert("b");
        let p = page(vec![entry(1, Some("a")), entry(2, Some("b"))]);
        let tree = render(Some(&p), &ctx(false), &selection);
        let ids: Vec<i64> = match &tree.body {
            ViewBody::Flat(rows) => rows.iter().map(|r| r.entry_id).collect(),
            other => panic!("expected flat rows, got {other:?}"),
        };
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_status_line_with_extras() {
        let mut p = page(vec![entry(1, None)]);
        p.total = 120;
        p.extras = 4;
        let mut c = ctx(true);
        c.page = 3;
        let tree = render(Some(&p), &c, &SelectionSnapshot::default());
        assert_eq!(tree.status_line, "page 3, size 50, total 120 (+4 extra)");
    }

    #[test]
    fn test_unmatched_display_filter_notice() {
        let mut selection = SelectionSnapshot::default();
        selection.display_filter.insert("gone-1");
        selection.display_filter.insert("gone-2");
        let p = page(vec![entry(1, Some("a"))]);
        let tree = render(Some(&p), &ctx(true), &selection);
        assert!(groups(&tree).is_empty());
        assert_eq!(
            tree.notices,
            vec![Notice::DisplayFilterUnmatched { unmatched: 2 }]
        );
    }

    #[test]
    fn test_display_filter_count_equals_intersection() {
        let mut selection = SelectionSnapshot::default();
        for k in ["a", "c", "x"] {
            selection.display_filter.insert(k);
        }
        let p = page(vec![
            entry(1, Some("a")),
            entry(2, Some("b")),
            entry(3, Some("c")),
        ]);
        let tree = render(Some(&p), &ctx(true), &selection);
        assert_eq!(groups(&tree).len(), 2);
        assert_eq!(
            tree.notices,
            vec![Notice::DisplayFilterActive {
                shown: 2,
                available: 3
            }]
        );
    }

    #[test]
    fn test_render_is_pure() {
        let mut selection = SelectionSnapshot::default();
        selection.export_pins.insert("a");
        let p = page(vec![entry(1, Some("a")), entry(2, None)]);
        let first = render(Some(&p), &ctx(true), &selection);
        let second = render(Some(&p), &ctx(true), &selection);
        assert_eq!(first, second);
    }
}

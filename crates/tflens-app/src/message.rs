//! Message types for the application (TEA pattern)

use std::path::PathBuf;

use tflens_backend::ExportRequest;
use tflens_core::{EntryId, GroupSummary, LogsPage, RunId, TimelineBar};

use crate::context::{GroupListContext, RequestContext, TimelineContext};
use crate::dialog::DialogKind;
use crate::input_key::InputKey;

/// Timeline export format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineFormat {
    Json,
    Csv,
}

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Periodic tick, drives the loading spinner
    Tick,

    /// Quit immediately (q, Ctrl+C, signal handler)
    Quit,

    /// Close the blocking message box
    DismissMessage,

    // ─────────────────────────────────────────────────────────
    // Run & paging
    // ─────────────────────────────────────────────────────────
    /// Switch to a run; resets page and fetches page and timeline
    SelectRun(RunId),
    OpenRunInput,
    RunInputChanged { text: String },
    RunInputSubmit,
    RunInputCancel,

    NextPage,
    PrevPage,
    /// Change page size by `delta` entries
    ResizePage(i32),
    /// Re-fetch the current page and timeline
    Refresh,

    // ─────────────────────────────────────────────────────────
    // Log view
    // ─────────────────────────────────────────────────────────
    CursorUp,
    CursorDown,
    CursorTop,
    CursorBottom,
    /// Enter on the cursor line: fold a header or open a row
    ActivateLine,
    /// Toggle export pin of the group under the cursor
    TogglePinAtCursor,
    TogglePin { key: String },
    ToggleCollapse { key: String },
    CollapseAll,
    ExpandAll,
    MarkRead { entry_id: EntryId },
    CloseDetail,
    CyclePairing,
    ToggleGroupRows,
    ToggleIncludePairs,
    ToggleOnlyPinned,

    // ─────────────────────────────────────────────────────────
    // Filters
    // ─────────────────────────────────────────────────────────
    OpenFilterForm,
    FilterFormChar(char),
    FilterFormBackspace,
    FilterFormClearField,
    FilterFormNextField,
    FilterFormPrevField,
    FilterFormApply,
    FilterFormCancel,
    CycleStatusFilter,
    ClearFilters,

    // ─────────────────────────────────────────────────────────
    // Selection dialogs
    // ─────────────────────────────────────────────────────────
    OpenDialog(DialogKind),
    DialogUp,
    DialogDown,
    DialogToggle,
    DialogSelectAll,
    DialogDeselectAll,
    DialogCyclePairing,
    DialogReload,
    DialogConfirm,
    DialogCancel,
    ClearDisplayFilter,

    // ─────────────────────────────────────────────────────────
    // Timeline
    // ─────────────────────────────────────────────────────────
    FocusTimeline,
    BlurTimeline,
    TimelineUp,
    TimelineDown,
    /// Click the bar under the timeline cursor
    TimelineActivate,
    /// Click a bar by key
    TimelineClick { key: String },
    CycleTimelinePairing,
    /// Re-fetch the timeline for the current run
    ReloadTimeline,

    // ─────────────────────────────────────────────────────────
    // Exports
    // ─────────────────────────────────────────────────────────
    ExportRun,
    ExportTimeline(TimelineFormat),

    // ─────────────────────────────────────────────────────────
    // Backend completions
    // ─────────────────────────────────────────────────────────
    LogsLoaded {
        context: RequestContext,
        page: LogsPage,
    },
    LogsFailed {
        context: RequestContext,
        error: String,
    },
    TimelineLoaded {
        context: TimelineContext,
        bars: Vec<TimelineBar>,
    },
    TimelineFailed {
        context: TimelineContext,
        error: String,
    },
    GroupsLoaded {
        context: GroupListContext,
        groups: Vec<GroupSummary>,
    },
    GroupsFailed {
        context: GroupListContext,
        error: String,
    },
    ExportFinished {
        request: ExportRequest,
        path: PathBuf,
        bytes: u64,
    },
    ExportFailed {
        request: ExportRequest,
        error: String,
    },
}

//! End-to-end selection flows across a simulated reload
//!
//! Drives the real update loop against the scripted backend with a
//! file-backed store, then rebuilds the state from the same file.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;

use tflens_app::config::Settings;
use tflens_app::message::Message;
use tflens_app::process::process_message;
use tflens_app::view::ViewBody;
use tflens_app::{AppState, DialogKind, FileKvStore, SelectionStore, UiMode};
use tflens_backend::test_utils::{test_entry, test_group, BackendCall, ScriptedBackend};
use tflens_backend::{Endpoints, ExportRequest};
use tflens_core::PairingMode;

fn backend() -> Arc<ScriptedBackend> {
    Arc::new(
        ScriptedBackend::new()
            .with_entries(vec![
                test_entry(1, Some("r1")),
                test_entry(2, Some("r2")),
                test_entry(3, Some("r1")),
            ])
            .with_groups(vec![test_group("r1", 2), test_group("r2", 1)])
            .with_export_body("{\"id\":1}\n{\"id\":3}\n"),
    )
}

fn fresh_state(state_file: &Path, export_dir: &Path) -> AppState {
    let mut settings = Settings::default();
    settings.export.directory = Some(export_dir.to_path_buf());
    let store = SelectionStore::new(FileKvStore::open(state_file));
    AppState::with_store(settings, store)
}

/// Feed `message` through the loop and wait until nothing is in flight
async fn settle(
    state: &mut AppState,
    message: Message,
    backend: &Arc<ScriptedBackend>,
    tx: &mpsc::Sender<Message>,
    rx: &mut mpsc::Receiver<Message>,
) {
    process_message(state, message, backend, tx);
    while state.is_busy() {
        let msg = rx.recv().await.expect("channel closed");
        process_message(state, msg, backend, tx);
    }
}

#[tokio::test]
async fn test_selection_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let state_file = dir.path().join("state.json");
    let backend = backend();
    let (tx, mut rx) = mpsc::channel(32);

    {
        let mut state = fresh_state(&state_file, dir.path());
        settle(&mut state, Message::SelectRun(1), &backend, &tx, &mut rx).await;
        settle(&mut state, Message::TogglePin { key: "r2".into() }, &backend, &tx, &mut rx).await;
        settle(&mut state, Message::ToggleCollapse { key: "r1".into() }, &backend, &tx, &mut rx).await;
        settle(&mut state, Message::MarkRead { entry_id: 2 }, &backend, &tx, &mut rx).await;
    }

    let mut state = fresh_state(&state_file, dir.path());
    settle(&mut state, Message::SelectRun(1), &backend, &tx, &mut rx).await;

    let tree = state.view();
    assert_eq!(tree.group_keys(), vec!["r2", "r1"]);
    assert_eq!(tree.pinned_indicator.as_deref(), Some("(1 selected for export)"));
    let ViewBody::Grouped(groups) = &tree.body else {
        panic!("expected grouped body");
    };
    assert!(groups[0].pinned);
    assert!(!groups[0].rows[0].unread);
    assert!(groups[1].collapsed);
}

#[tokio::test]
async fn test_pinned_group_exports_alone_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let state_file = dir.path().join("state.json");
    let backend = backend();
    let (tx, mut rx) = mpsc::channel(32);

    {
        let mut state = fresh_state(&state_file, dir.path());
        settle(&mut state, Message::SelectRun(1), &backend, &tx, &mut rx).await;
        settle(&mut state, Message::TogglePin { key: "r1".into() }, &backend, &tx, &mut rx).await;
    }

    let mut state = fresh_state(&state_file, dir.path());
    settle(&mut state, Message::SelectRun(1), &backend, &tx, &mut rx).await;
    settle(&mut state, Message::OpenDialog(DialogKind::Export), &backend, &tx, &mut rx).await;

    let dialog = state.dialog.as_ref().expect("dialog open");
    assert!(dialog.is_checked("r1"));
    assert!(!dialog.is_checked("r2"));

    settle(&mut state, Message::DialogConfirm, &backend, &tx, &mut rx).await;
    assert_eq!(state.ui_mode, UiMode::Normal);

    let request = backend
        .calls()
        .into_iter()
        .find_map(|call| match call {
            BackendCall::Download(request) => Some(request),
            _ => None,
        })
        .expect("export issued");
    assert_eq!(
        request,
        ExportRequest::ByKeys {
            run_id: 1,
            pairing: PairingMode::Correlation,
            keys: vec!["r1".into()],
        }
    );

    let url = Endpoints::new("http://127.0.0.1:8000/api")
        .unwrap()
        .export(&request);
    assert_eq!(url.path(), "/api/export/jsonl_by_keys");
    let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert!(query.contains(&("run_id".into(), "1".into())));
    assert!(query.contains(&("keys".into(), "r1".into())));

    let saved = dir.path().join(request.file_name());
    assert_eq!(std::fs::read_to_string(saved).unwrap().lines().count(), 2);
    assert!(state.status_message.as_deref().unwrap().starts_with("Saved"));
}

#[tokio::test]
async fn test_display_filter_applies_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let state_file = dir.path().join("state.json");
    let backend = backend();
    let (tx, mut rx) = mpsc::channel(32);

    {
        let mut state = fresh_state(&state_file, dir.path());
        settle(&mut state, Message::SelectRun(1), &backend, &tx, &mut rx).await;
        settle(&mut state, Message::OpenDialog(DialogKind::Display), &backend, &tx, &mut rx).await;
        settle(&mut state, Message::DialogDown, &backend, &tx, &mut rx).await;
        settle(&mut state, Message::DialogToggle, &backend, &tx, &mut rx).await;
        settle(&mut state, Message::DialogConfirm, &backend, &tx, &mut rx).await;
        assert_eq!(state.view().group_keys(), vec!["r2"]);
    }

    let mut state = fresh_state(&state_file, dir.path());
    settle(&mut state, Message::SelectRun(1), &backend, &tx, &mut rx).await;
    assert_eq!(state.view().group_keys(), vec!["r2"]);

    settle(&mut state, Message::ClearDisplayFilter, &backend, &tx, &mut rx).await;
    assert_eq!(state.view().group_keys(), vec!["r1", "r2"]);
}

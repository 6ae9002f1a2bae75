//! Headless runner: drive the update loop until the first page and the
//! timeline have settled, then emit them

use std::sync::Arc;

use tokio::sync::mpsc;

use tflens_app::message::Message;
use tflens_app::process::process_message;
use tflens_app::state::LogsStatus;
use tflens_app::AppState;
use tflens_backend::LogBackend;
use tflens_core::prelude::*;
use tflens_core::RunId;

use super::HeadlessEvent;

/// Load `run_id` and print its view tree and timeline as NDJSON
pub async fn run_headless<B>(state: AppState, backend: Arc<B>, run_id: RunId) -> Result<()>
where
    B: LogBackend + Sync + 'static,
{
    info!("tflens starting in headless mode (run {})", run_id);
    for event in collect_events(state, backend, run_id).await? {
        event.emit();
    }
    Ok(())
}

/// Events for `run_id` once no fetch is in flight
pub async fn collect_events<B>(
    mut state: AppState,
    backend: Arc<B>,
    run_id: RunId,
) -> Result<Vec<HeadlessEvent>>
where
    B: LogBackend + Sync + 'static,
{
    let (msg_tx, mut msg_rx) = mpsc::channel::<Message>(16);
    process_message(&mut state, Message::SelectRun(run_id), &backend, &msg_tx);

    while state.is_busy() {
        let Some(msg) = msg_rx.recv().await else {
            return Err(Error::ChannelClosed);
        };
        process_message(&mut state, msg, &backend, &msg_tx);
    }

    let mut events = Vec::new();
    if let LogsStatus::Failed(error) = &state.logs_status {
        warn!("Headless page fetch failed: {}", error);
        events.push(HeadlessEvent::error(error.clone(), false));
    }
    let view = state.view();
    let status = (!view.status_line.is_empty()).then(|| view.status_line.clone());
    events.push(HeadlessEvent::page(run_id, state.pairing, status, view));
    events.push(HeadlessEvent::timeline(
        run_id,
        state.timeline_pairing,
        state.timeline.layout().cloned(),
        state.timeline.placeholder(),
    ));
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tflens_backend::test_utils::{test_bar, test_entry, ScriptedBackend};

    #[tokio::test]
    async fn test_collects_page_and_timeline() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .with_entries(vec![test_entry(1, Some("r1")), test_entry(2, Some("r1"))])
                .with_bars(vec![test_bar("r1", 0, 2_000, 2)]),
        );
        let events = collect_events(AppState::new(), backend, 1).await.unwrap();

        assert_eq!(events.len(), 2);
        match &events[0] {
            HeadlessEvent::Page { view, .. } => assert_eq!(view.group_keys(), vec!["r1"]),
            other => panic!("unexpected event: {other:?}"),
        }
        match &events[1] {
            HeadlessEvent::Timeline { layout, message, .. } => {
                assert_eq!(layout.as_ref().map(|l| l.bars.len()), Some(1));
                assert!(message.is_none());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_backend_failure_becomes_error_event() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.fail_with("connection refused");
        let events = collect_events(AppState::new(), backend, 1).await.unwrap();

        assert!(matches!(&events[0], HeadlessEvent::Error { message, .. } if message.contains("connection refused")));
        match events.last() {
            Some(HeadlessEvent::Timeline { layout, message, .. }) => {
                assert!(layout.is_none());
                assert!(message.as_deref().unwrap().starts_with("Timeline unavailable"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}

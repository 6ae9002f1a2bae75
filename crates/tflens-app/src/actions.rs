//! Action handlers: UpdateAction dispatch and background task spawning
//!
//! Every backend call runs as its own task and reports back through the
//! message channel. Completions carry the context they were issued under;
//! deciding whether a completion is still current is the update
//! function's job.

use std::sync::Arc;

use tokio::sync::mpsc;

use tflens_backend::LogBackend;
use tflens_core::prelude::*;

use crate::handler::UpdateAction;
use crate::message::Message;

/// Execute an action by spawning a background task
pub fn handle_action<B>(action: UpdateAction, backend: Arc<B>, msg_tx: mpsc::Sender<Message>)
where
    B: LogBackend + Sync + 'static,
{
    tokio::spawn(async move {
        let message = execute_action(action, backend.as_ref()).await;
        if msg_tx.send(message).await.is_err() {
            debug!("Message channel closed; dropping backend completion");
        }
    });
}

/// Run one action to completion and return the message describing its
/// outcome
pub async fn execute_action<B>(action: UpdateAction, backend: &B) -> Message
where
    B: LogBackend + Sync,
{
    match action {
        UpdateAction::FetchLogs(context) => match backend.fetch_logs(&context.query()).await {
            Ok(page) => Message::LogsLoaded { context, page },
            Err(e) => Message::LogsFailed {
                context,
                error: e.to_string(),
            },
        },

        UpdateAction::FetchTimeline(context) => {
            match backend.fetch_timeline(context.run_id, context.pairing).await {
                Ok(bars) => Message::TimelineLoaded { context, bars },
                Err(e) => Message::TimelineFailed {
                    context,
                    error: e.to_string(),
                },
            }
        }

        UpdateAction::FetchGroups(context) => {
            match backend.fetch_groups(context.run_id, context.pairing).await {
                Ok(groups) => Message::GroupsLoaded { context, groups },
                Err(e) => Message::GroupsFailed {
                    context,
                    error: e.to_string(),
                },
            }
        }

        UpdateAction::Download { request, dest } => {
            match backend.download(&request, &dest).await {
                Ok(bytes) => Message::ExportFinished {
                    request,
                    path: dest,
                    bytes,
                },
                Err(e) => {
                    if e.is_recoverable() {
                        warn!("Download to {} failed: {}", dest.display(), e);
                    } else {
                        error!("Download to {} failed: {}", dest.display(), e);
                    }
                    Message::ExportFailed {
                        request,
                        error: e.to_string(),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{RequestContext, TimelineContext};
    use tflens_backend::test_utils::{test_bar, test_entry, ScriptedBackend};
    use tflens_backend::ExportRequest;
    use tflens_core::{LogFilters, PairingMode};

    fn ctx() -> RequestContext {
        RequestContext {
            run_id: 1,
            pairing: PairingMode::Correlation,
            page: 1,
            page_size: 10,
            include_pairs: false,
            filters: LogFilters::default(),
            group_rows: true,
        }
    }

    #[tokio::test]
    async fn test_fetch_logs_carries_context_back() {
        let backend = ScriptedBackend::new().with_entries(vec![test_entry(1, Some("r1"))]);
        let message = execute_action(UpdateAction::FetchLogs(ctx()), &backend).await;
        match message {
            Message::LogsLoaded { context, page } => {
                assert_eq!(context, ctx());
                assert_eq!(page.items.len(), 1);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failures_become_failure_messages() {
        let backend = ScriptedBackend::new();
        backend.fail_with("connection refused");
        let context = TimelineContext {
            run_id: 1,
            pairing: PairingMode::Phase,
        };
        let message = execute_action(UpdateAction::FetchTimeline(context), &backend).await;
        match message {
            Message::TimelineFailed { context: c, error } => {
                assert_eq!(c, context);
                assert!(error.contains("connection refused"));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_download_reports_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.jsonl");
        let backend = ScriptedBackend::new().with_export_body("{}\n{}\n");
        let action = UpdateAction::Download {
            request: ExportRequest::Run { run_id: 1 },
            dest: dest.clone(),
        };
        match execute_action(action, &backend).await {
            Message::ExportFinished { bytes, path, .. } => {
                assert_eq!(bytes, 6);
                assert_eq!(path, dest);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_spawned_action_sends_completion() {
        let backend = Arc::new(ScriptedBackend::new().with_bars(vec![test_bar("a", 0, 10, 1)]));
        let (tx, mut rx) = mpsc::channel(4);
        let context = TimelineContext {
            run_id: 1,
            pairing: PairingMode::Correlation,
        };
        handle_action(UpdateAction::FetchTimeline(context), backend, tx);
        match rx.recv().await {
            Some(Message::TimelineLoaded { bars, .. }) => assert_eq!(bars.len(), 1),
            other => panic!("unexpected message: {other:?}"),
        }
    }
}

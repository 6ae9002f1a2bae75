//! Download requests and their completions

use std::path::PathBuf;

use tflens_backend::ExportRequest;
use tflens_core::prelude::*;

use crate::message::TimelineFormat;
use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

/// Start a download into the configured export directory
pub(crate) fn download(state: &mut AppState, request: ExportRequest) -> UpdateResult {
    let dest = state
        .settings
        .export
        .resolved_directory()
        .join(request.file_name());
    info!("Exporting {} to {}", request.describe(), dest.display());
    state.exports_in_flight += 1;
    state.status_message = Some(format!("Exporting {}...", request.describe()));
    UpdateResult::action(UpdateAction::Download { request, dest })
}

pub fn handle_export_run(state: &mut AppState) -> UpdateResult {
    let Some(run_id) = state.run_id else {
        state.block(Error::NoActiveRun.to_string());
        return UpdateResult::none();
    };
    download(state, ExportRequest::Run { run_id })
}

pub fn handle_export_timeline(state: &mut AppState, format: TimelineFormat) -> UpdateResult {
    let Some(run_id) = state.run_id else {
        state.block(Error::NoActiveRun.to_string());
        return UpdateResult::none();
    };
    let pairing = state.timeline_pairing;
    let request = match format {
        TimelineFormat::Json => ExportRequest::TimelineJson { run_id, pairing },
        TimelineFormat::Csv => ExportRequest::TimelineCsv { run_id, pairing },
    };
    download(state, request)
}

pub fn handle_finished(
    state: &mut AppState,
    request: ExportRequest,
    path: PathBuf,
    bytes: u64,
) -> UpdateResult {
    state.exports_in_flight = state.exports_in_flight.saturating_sub(1);
    info!(
        "Export of {} for run {} saved ({} bytes)",
        request.describe(),
        request.run_id(),
        bytes
    );
    state.status_message = Some(format!(
        "Saved {} to {} ({} bytes)",
        request.describe(),
        path.display(),
        bytes
    ));
    UpdateResult::none()
}

pub fn handle_failed(state: &mut AppState, request: ExportRequest, error: String) -> UpdateResult {
    state.exports_in_flight = state.exports_in_flight.saturating_sub(1);
    warn!("Export of {} failed: {}", request.describe(), error);
    state.status_message = Some(format!("Export of {} failed: {}", request.describe(), error));
    UpdateResult::none()
}

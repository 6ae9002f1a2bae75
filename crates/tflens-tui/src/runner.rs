//! Main TUI runner: terminal lifecycle and the event loop

use std::sync::Arc;

use tokio::sync::mpsc;

use tflens_app::message::Message;
use tflens_app::process::process_message;
use tflens_app::{signals, AppState};
use tflens_backend::LogBackend;
use tflens_core::prelude::*;
use tflens_core::RunId;

use crate::{event, render, terminal};

/// Run the TUI until the user quits, optionally opening `initial_run`
pub async fn run<B>(mut state: AppState, backend: Arc<B>, initial_run: Option<RunId>) -> Result<()>
where
    B: LogBackend + Sync + 'static,
{
    terminal::install_panic_hook();
    let mut term = ratatui::init();

    // Backend completions and the signal handler report here
    let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
    signals::spawn_signal_handler(msg_tx.clone());

    if let Some(run_id) = initial_run {
        process_message(&mut state, Message::SelectRun(run_id), &backend, &msg_tx);
    }

    let result = run_loop(&mut term, &mut state, msg_rx, &backend, &msg_tx);

    ratatui::restore();
    info!("tflens exiting");
    result
}

fn run_loop<B>(
    terminal: &mut ratatui::DefaultTerminal,
    state: &mut AppState,
    mut msg_rx: mpsc::Receiver<Message>,
    backend: &Arc<B>,
    msg_tx: &mpsc::Sender<Message>,
) -> Result<()>
where
    B: LogBackend + Sync + 'static,
{
    while !state.should_quit() {
        while let Ok(msg) = msg_rx.try_recv() {
            process_message(state, msg, backend, msg_tx);
        }

        terminal.draw(|frame| render::view(frame, state))?;

        if let Some(message) = event::poll()? {
            process_message(state, message, backend, msg_tx);
        }
    }
    Ok(())
}

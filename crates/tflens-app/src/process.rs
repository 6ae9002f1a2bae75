//! Message processing: runs the TEA update loop and dispatches actions

use std::sync::Arc;

use tokio::sync::mpsc;

use tflens_backend::LogBackend;

use crate::actions::handle_action;
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message and every follow-up it produces
pub fn process_message<B>(
    state: &mut AppState,
    message: Message,
    backend: &Arc<B>,
    msg_tx: &mpsc::Sender<Message>,
) where
    B: LogBackend + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, Arc::clone(backend), msg_tx.clone());
        }

        // Continue with follow-up message
        msg = result.message;
    }
}

// Application state for HTTP handlers
use crate::application::console_session::ConsoleSession;
use tokio::sync::Mutex;

pub struct AppState {
    pub session: Mutex<ConsoleSession>,
    pub stream_compression: bool,
}

impl AppState {
    pub fn new(session: ConsoleSession, stream_compression: bool) -> Self {
        Self {
            session: Mutex::new(session),
            stream_compression,
        }
    }
}

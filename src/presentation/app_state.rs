// Application state for HTTP handlers
use crate::application::session_store::SessionStateStore;

pub struct AppState {
    pub session: SessionStateStore,
}

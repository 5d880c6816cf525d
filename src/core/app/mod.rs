pub mod actions;
pub mod conversation;
pub mod ui_state;


pub use actions::{apply_action, AppAction, AppActionContext, AppCommand};
pub use conversation::ConversationController;
pub use ui_state::UiState;

use crate::utils::logging::LoggingState;

/// Session-scoped resources that outlive individual queries.
pub struct SessionContext {
    /// Short label for the header: "simulated" or the backend URL.
    pub backend_label: String,
    pub logging: LoggingState,
    current_query_id: u64,
}

impl SessionContext {
    pub fn new(backend_label: String, logging: LoggingState) -> Self {
        Self {
            backend_label,
            logging,
            current_query_id: 0,
        }
    }

    /// Allocate the id for a new query and make it the current one.
    pub fn begin_query(&mut self) -> u64 {
        self.current_query_id += 1;
        self.current_query_id
    }

    pub fn current_query_id(&self) -> u64 {
        self.current_query_id
    }
}

/// The chat widget: session context plus all interactive UI state.
pub struct App {
    pub session: SessionContext,
    pub ui: UiState,
}

impl App {
    pub fn new(backend_label: String, logging: LoggingState) -> Self {
        Self {
            session: SessionContext::new(backend_label, logging),
            ui: UiState::new(),
        }
    }

    pub fn conversation(&mut self) -> ConversationController<'_> {
        ConversationController::new(&mut self.session, &mut self.ui)
    }

    /// Whether a query outcome is for the query the widget is waiting on.
    pub fn is_current_query(&self, query_id: u64) -> bool {
        self.ui.pending && query_id == self.session.current_query_id()
    }
}

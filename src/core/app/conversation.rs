use chrono::Utc;
use tracing::warn;

use super::actions::AppActionContext;
use super::ui_state::UiState;
use super::SessionContext;
use crate::core::message::Message;
use crate::core::query::Answer;
use crate::ui::renderer;

/// Fixed transcript text shown for any failed query, whatever the cause.
pub const QUERY_ERROR_TEXT: &str =
    "Sorry, I encountered an error processing your request. Please try again.";

/// Applies transcript transitions on behalf of the action layer. Borrowed
/// from the [`super::App`] for the duration of one transition.
pub struct ConversationController<'a> {
    session: &'a mut SessionContext,
    ui: &'a mut UiState,
}

impl<'a> ConversationController<'a> {
    pub fn new(session: &'a mut SessionContext, ui: &'a mut UiState) -> Self {
        Self { session, ui }
    }

    fn next_message_id(&mut self) -> u64 {
        let now_ms = Utc::now().timestamp_millis().max(0) as u64;
        self.ui.message_ids.next(now_ms)
    }

    fn log_transcript(&self, content: &str) {
        if let Err(e) = self.session.logging.log_message(content) {
            warn!(error = %e, "failed to write transcript log");
        }
    }

    pub fn add_user_message(&mut self, text: String) {
        let id = self.next_message_id();
        self.log_transcript(&format!("You: {text}"));
        self.ui.messages.push_back(Message::user(id, text));
    }

    pub fn add_bot_message(&mut self, answer: Answer) {
        let id = self.next_message_id();
        self.log_transcript(&answer.text);
        self.ui
            .messages
            .push_back(Message::bot(id, answer.text, answer.sources));
    }

    pub fn add_error_message(&mut self) {
        let id = self.next_message_id();
        self.log_transcript(QUERY_ERROR_TEXT);
        self.ui
            .messages
            .push_back(Message::bot_error(id, QUERY_ERROR_TEXT));
    }

    pub fn set_pending(&mut self) {
        self.ui.pending = true;
        self.ui.pulse_start = std::time::Instant::now();
    }

    pub fn clear_pending(&mut self) {
        self.ui.pending = false;
    }

    /// Keep the newest transcript line visible unless the user has scrolled
    /// away on purpose.
    pub fn update_scroll_position(&mut self, ctx: AppActionContext) {
        if !self.ui.auto_scroll {
            return;
        }
        let metrics = renderer::transcript_metrics(self.ui, ctx.term_width, ctx.term_height);
        self.ui.scroll_offset = metrics.max_scroll;
    }
}

use super::App;
use crate::core::dispatch::QueryParams;
use crate::core::query::Answer;

/// Terminal geometry captured when an action is applied, used for scroll
/// bookkeeping.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppActionContext {
    pub term_width: u16,
    pub term_height: u16,
}

/// Every state transition the chat widget can make.
#[derive(Debug, Clone)]
pub enum AppAction {
    /// The user submitted the input buffer.
    SubmitQuery { text: String },
    /// The query identified by `query_id` produced an answer.
    QueryCompleted { query_id: u64, answer: Answer },
    /// The query identified by `query_id` failed.
    QueryFailed { query_id: u64 },
    /// A mouse release produced a new selection snapshot.
    SetSelection { text: String },
}

/// Side effect requested by a transition. The event loop executes these so
/// the transitions themselves stay pure.
#[derive(Debug)]
pub enum AppCommand {
    SpawnQuery(QueryParams),
}

pub fn apply_action(app: &mut App, action: AppAction, ctx: AppActionContext) -> Option<AppCommand> {
    match action {
        AppAction::SubmitQuery { text } => {
            // Whitespace-only submissions are a no-op, and submission is
            // gated while a query is already pending.
            if text.trim().is_empty() || app.ui.pending {
                return None;
            }

            let query_id = app.session.begin_query();
            {
                let mut conversation = app.conversation();
                conversation.add_user_message(text.clone());
                conversation.set_pending();
                conversation.update_scroll_position(ctx);
            }

            Some(AppCommand::SpawnQuery(QueryParams { query_id, text }))
        }
        AppAction::QueryCompleted { query_id, answer } => {
            if !app.is_current_query(query_id) {
                return None;
            }
            let mut conversation = app.conversation();
            conversation.add_bot_message(answer);
            conversation.clear_pending();
            conversation.update_scroll_position(ctx);
            None
        }
        AppAction::QueryFailed { query_id } => {
            if !app.is_current_query(query_id) {
                return None;
            }
            let mut conversation = app.conversation();
            conversation.add_error_message();
            conversation.clear_pending();
            conversation.update_scroll_position(ctx);
            None
        }
        AppAction::SetSelection { text } => {
            app.ui.set_selection(&text);
            None
        }
    }
}

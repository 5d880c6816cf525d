use std::collections::VecDeque;
use std::time::Instant;

use ratatui::widgets::Block;
use tui_textarea::TextArea;

use crate::core::message::{Message, MessageIdAllocator};

/// Maximum characters of the selection snapshot shown above the input box.
pub const SELECTION_PREVIEW_MAX: usize = 100;

/// Input area grows with its content up to this many text rows.
pub const MAX_INPUT_ROWS: u16 = 6;

const INPUT_PLACEHOLDER: &str = "Ask a question about the robotics book...";

/// All interactive state owned by the chat widget. Mutations happen through
/// [`crate::core::app::actions::apply_action`] and the conversation
/// controller, which keeps the transitions testable without a terminal.
pub struct UiState {
    pub messages: VecDeque<Message>,
    textarea: TextArea<'static>,
    /// True between a submission and its response or error.
    pub pending: bool,
    pub pulse_start: Instant,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub selected_text: Option<String>,
    pub exit_requested: bool,
    pub message_ids: MessageIdAllocator,
}

impl UiState {
    pub fn new() -> Self {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text(INPUT_PLACEHOLDER);
        Self {
            messages: VecDeque::new(),
            textarea,
            pending: false,
            pulse_start: Instant::now(),
            scroll_offset: 0,
            auto_scroll: true,
            selected_text: None,
            exit_requested: false,
            message_ids: MessageIdAllocator::default(),
        }
    }

    pub fn input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn clear_input(&mut self) {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text(INPUT_PLACEHOLDER);
        self.textarea = textarea;
    }

    pub fn apply_key(&mut self, input: impl Into<tui_textarea::Input>) {
        self.textarea.input(input);
    }

    pub fn insert_newline(&mut self) {
        self.textarea.insert_str("\n");
    }

    pub fn insert_str(&mut self, text: &str) {
        self.textarea.insert_str(text);
    }

    pub fn set_input_block(&mut self, block: Block<'static>) {
        self.textarea.set_block(block);
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    /// Text rows the input area currently needs, before borders.
    pub fn input_row_count(&self) -> u16 {
        (self.textarea.lines().len() as u16).clamp(1, MAX_INPUT_ROWS)
    }

    /// Store a selection snapshot. Surrounding whitespace is stripped and an
    /// empty result clears the snapshot entirely.
    pub fn set_selection(&mut self, text: &str) {
        let trimmed = text.trim();
        self.selected_text = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    /// Selection snapshot capped for display above the input box.
    pub fn selection_preview(&self) -> Option<String> {
        let text = self.selected_text.as_deref()?;
        let mut preview: String = text.chars().take(SELECTION_PREVIEW_MAX).collect();
        if text.chars().count() > SELECTION_PREVIEW_MAX {
            preview.push_str("...");
        }
        Some(preview)
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_is_trimmed_and_empty_selection_clears() {
        let mut ui = UiState::new();
        ui.set_selection("  ROS 2 nodes  ");
        assert_eq!(ui.selected_text.as_deref(), Some("ROS 2 nodes"));

        ui.set_selection("   \n  ");
        assert!(ui.selected_text.is_none());
        assert!(ui.selection_preview().is_none());
    }

    #[test]
    fn long_selection_previews_are_truncated_with_ellipsis() {
        let mut ui = UiState::new();
        let long = "x".repeat(150);
        ui.set_selection(&long);
        let preview = ui.selection_preview().unwrap();
        assert_eq!(preview.chars().count(), SELECTION_PREVIEW_MAX + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn short_selection_previews_are_untouched() {
        let mut ui = UiState::new();
        ui.set_selection("Gazebo");
        assert_eq!(ui.selection_preview().as_deref(), Some("Gazebo"));
    }

    #[test]
    fn input_rows_grow_with_newlines_up_to_the_cap() {
        let mut ui = UiState::new();
        assert_eq!(ui.input_row_count(), 1);
        for _ in 0..10 {
            ui.insert_newline();
        }
        assert_eq!(ui.input_row_count(), MAX_INPUT_ROWS);
    }

    #[test]
    fn clear_input_empties_the_buffer() {
        let mut ui = UiState::new();
        ui.insert_str("draft question");
        assert_eq!(ui.input_text(), "draft question");
        ui.clear_input();
        assert_eq!(ui.input_text(), "");
    }
}

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::core::app::ui_state::UiState;
use crate::core::app::App;
use crate::core::message::Sender;
use crate::utils::scroll::ScrollCalculator;

/// Rows reserved for the title and subtitle above the transcript.
pub const HEADER_HEIGHT: u16 = 2;

const SUBTITLE: &str = "Ask questions about the Physical AI & Humanoid Robotics book";

const WELCOME: [&str; 2] = [
    "Hello! I'm your Robotics RAG assistant. Ask me anything about the Physical AI & \
     Humanoid Robotics book.",
    "Try asking about ROS 2, Gazebo, NVIDIA Isaac, Vision-Language-Action, or any other \
     robotics concept covered in the book.",
];

const INPUT_HINT: &str = "Ask a question (Enter to send, Shift+Enter for new line, Ctrl+C to quit)";

/// Transcript geometry for one frame: where the viewport sits, how many
/// wrapped lines exist, and how far it can scroll. Shared by the renderer,
/// the scroll keys, and mouse selection so they always agree.
#[derive(Debug, Clone, Copy)]
pub struct TranscriptMetrics {
    pub viewport_y: u16,
    pub viewport_height: u16,
    pub total_lines: u16,
    pub max_scroll: u16,
}

pub fn input_area_height(ui: &UiState) -> u16 {
    ui.input_row_count() + 2
}

fn selection_area_height(ui: &UiState) -> u16 {
    if ui.selection_preview().is_some() {
        1
    } else {
        0
    }
}

pub fn transcript_metrics(ui: &UiState, term_width: u16, term_height: u16) -> TranscriptMetrics {
    let viewport_height = term_height
        .saturating_sub(HEADER_HEIGHT)
        .saturating_sub(selection_area_height(ui))
        .saturating_sub(input_area_height(ui));
    let total_lines = build_transcript_lines(ui, term_width)
        .len()
        .min(u16::MAX as usize) as u16;
    TranscriptMetrics {
        viewport_y: HEADER_HEIGHT,
        viewport_height,
        total_lines,
        max_scroll: ScrollCalculator::max_scroll_offset(total_lines, viewport_height),
    }
}

/// Build the transcript as pre-wrapped display lines: the welcome panel when
/// the transcript is empty, one block per message (with its sources), and
/// the thinking indicator while a query is pending.
pub fn build_transcript_lines(ui: &UiState, width: u16) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    if ui.messages.is_empty() {
        for text in WELCOME {
            lines.push(Line::from(Span::styled(
                text,
                Style::default().fg(Color::DarkGray),
            )));
            lines.push(Line::from(""));
        }
    }

    for msg in &ui.messages {
        match msg.sender {
            Sender::User => {
                let user_style = Style::default().fg(Color::Cyan);
                let mut first = true;
                for text_line in msg.text.lines() {
                    if first {
                        lines.push(Line::from(vec![
                            Span::styled(
                                "You: ",
                                user_style.add_modifier(Modifier::BOLD),
                            ),
                            Span::styled(text_line.to_string(), user_style),
                        ]));
                        first = false;
                    } else {
                        lines.push(Line::from(Span::styled(
                            text_line.to_string(),
                            user_style,
                        )));
                    }
                }
                if first {
                    lines.push(Line::from(Span::styled(
                        "You: ",
                        user_style.add_modifier(Modifier::BOLD),
                    )));
                }
                lines.push(Line::from(""));
            }
            Sender::Bot => {
                let bot_style = if msg.is_error {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default().fg(Color::White)
                };
                for text_line in msg.text.lines() {
                    if text_line.trim().is_empty() {
                        lines.push(Line::from(""));
                    } else {
                        lines.push(Line::from(Span::styled(text_line.to_string(), bot_style)));
                    }
                }
                if !msg.sources.is_empty() {
                    lines.push(Line::from(Span::styled(
                        "Sources:",
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::BOLD),
                    )));
                    for source in &msg.sources {
                        lines.push(Line::from(Span::styled(
                            format!("  - {} ({})", source.title, source.section),
                            Style::default().fg(Color::DarkGray),
                        )));
                    }
                }
                lines.push(Line::from(""));
            }
        }
    }

    if ui.pending {
        lines.push(Line::from(Span::styled(
            thinking_label(ui),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    ScrollCalculator::prewrap_lines(&lines, width)
}

fn thinking_label(ui: &UiState) -> String {
    let dots = (ui.pulse_start.elapsed().as_millis() / 400) % 3 + 1;
    format!("Thinking{}", ".".repeat(dots as usize))
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let selection_height = selection_area_height(&app.ui);
    let input_height = input_area_height(&app.ui);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(selection_height),
            Constraint::Length(input_height),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_transcript(f, app, chunks[1]);
    if selection_height > 0 {
        render_selection_preview(f, app, chunks[2]);
    }
    render_input(f, app, chunks[3]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            "Robotics Book Chat",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                " v{} - backend: {} - logging: {}",
                env!("CARGO_PKG_VERSION"),
                app.session.backend_label,
                app.session.logging.get_status_string()
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let subtitle = Line::from(Span::styled(
        SUBTITLE,
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(vec![title, subtitle]), area);
}

fn render_transcript(f: &mut Frame, app: &App, area: Rect) {
    let lines = build_transcript_lines(&app.ui, area.width);
    let total_lines = lines.len().min(u16::MAX as usize) as u16;
    let max_offset = ScrollCalculator::max_scroll_offset(total_lines, area.height);
    let scroll_offset = app.ui.scroll_offset.min(max_offset);

    let transcript = Paragraph::new(lines).scroll((scroll_offset, 0));
    f.render_widget(transcript, area);
}

fn render_selection_preview(f: &mut Frame, app: &App, area: Rect) {
    let Some(preview) = app.ui.selection_preview() else {
        return;
    };
    let line = Line::from(vec![
        Span::styled(
            "Selected text: ",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("\"{preview}\""),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_input(f: &mut Frame, app: &mut App, area: Rect) {
    let title = if app.ui.pending {
        "Sending..."
    } else {
        INPUT_HINT
    };
    app.ui
        .set_input_block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(app.ui.textarea(), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Message;
    use crate::core::query::Answer;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn transcript_text(ui: &UiState, width: u16) -> Vec<String> {
        build_transcript_lines(ui, width).iter().map(line_text).collect()
    }

    #[test]
    fn empty_transcript_shows_the_welcome_panel() {
        let ui = UiState::new();
        let text = transcript_text(&ui, 200);
        assert!(text[0].contains("Robotics RAG assistant"));
        assert!(text.iter().any(|l| l.contains("Vision-Language-Action")));
    }

    #[test]
    fn welcome_panel_disappears_once_messages_exist() {
        let mut ui = UiState::new();
        ui.messages.push_back(Message::user(1, "hi"));
        let text = transcript_text(&ui, 200);
        assert!(!text.iter().any(|l| l.contains("Robotics RAG assistant")));
        assert_eq!(text[0], "You: hi");
    }

    #[test]
    fn bot_sources_render_beneath_the_answer() {
        let mut ui = UiState::new();
        let answer = Answer {
            text: "See chapter one.".to_string(),
            sources: vec![crate::api::SourceRef {
                title: "The Robotic Nervous System (ROS 2)".to_string(),
                section: "chapter-1".to_string(),
            }],
        };
        ui.messages
            .push_back(Message::bot(1, answer.text.clone(), answer.sources));
        let text = transcript_text(&ui, 200);
        assert_eq!(text[0], "See chapter one.");
        assert_eq!(text[1], "Sources:");
        assert!(text[2].contains("The Robotic Nervous System (ROS 2) (chapter-1)"));
    }

    #[test]
    fn pending_transcripts_end_with_a_thinking_line() {
        let mut ui = UiState::new();
        ui.messages.push_back(Message::user(1, "hello"));
        ui.pending = true;
        let text = transcript_text(&ui, 200);
        assert!(text.last().unwrap().starts_with("Thinking"));
    }

    #[test]
    fn metrics_account_for_the_selection_preview_row() {
        let mut ui = UiState::new();
        let without = transcript_metrics(&ui, 80, 24);
        ui.set_selection("some selected text");
        let with = transcript_metrics(&ui, 80, 24);
        assert_eq!(with.viewport_height, without.viewport_height - 1);
    }
}

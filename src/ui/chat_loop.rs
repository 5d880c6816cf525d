//! Main chat event loop and terminal lifecycle.
//!
//! Terminal events are read by a dedicated task and drained here together
//! with query outcomes, so all state mutation happens on this loop.

use std::error::Error;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::Size;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::core::app::{apply_action, App, AppAction, AppActionContext, AppCommand};
use crate::core::dispatch::{QueryDispatcher, QueryOutcome};
use crate::core::query::QueryService;
use crate::ui::renderer::{self, ui, TranscriptMetrics};
use crate::ui::selection::{CellPos, SelectionTracker};
use crate::utils::input::sanitize_text_input;
use crate::utils::logging::LoggingState;

const MAX_FPS: u64 = 60;
const INDICATOR_INTERVAL: Duration = Duration::from_millis(250);

/// Enter submits unless Shift is held; Shift+Enter inserts a newline.
fn submit_on_enter(modifiers: KeyModifiers) -> bool {
    !modifiers.contains(KeyModifiers::SHIFT)
}

pub async fn run_chat(
    service: Arc<dyn QueryService>,
    backend_label: String,
    logging: LoggingState,
) -> Result<(), Box<dyn Error>> {
    let mut app = App::new(backend_label, logging);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableBracketedPaste,
        EnableMouseCapture
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (dispatcher, mut outcome_rx) = QueryDispatcher::new(service);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let event_reader = tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    });

    let result = run_event_loop(
        &mut terminal,
        &mut app,
        &dispatcher,
        &mut event_rx,
        &mut outcome_rx,
    )
    .await;

    event_reader.abort();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    dispatcher: &QueryDispatcher,
    event_rx: &mut mpsc::UnboundedReceiver<Event>,
    outcome_rx: &mut mpsc::UnboundedReceiver<(QueryOutcome, u64)>,
) -> Result<(), Box<dyn Error>> {
    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;
    let mut last_indicator_frame = Instant::now();
    let mut selection = SelectionTracker::default();

    loop {
        if app.ui.exit_requested {
            break;
        }

        if request_redraw && last_draw.elapsed() >= frame_duration {
            terminal.draw(|f| ui(f, app))?;
            last_draw = Instant::now();
            request_redraw = false;
        }

        let term_size = terminal.size().unwrap_or_default();
        let ctx = AppActionContext {
            term_width: term_size.width,
            term_height: term_size.height,
        };

        let mut events_processed = false;
        while let Ok(ev) = event_rx.try_recv() {
            events_processed = true;
            match ev {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key_event(app, dispatcher, key, term_size, ctx);
                }
                Event::Mouse(mouse) => {
                    handle_mouse_event(app, &mut selection, mouse, term_size, ctx);
                }
                Event::Paste(text) => {
                    app.ui.insert_str(&sanitize_text_input(&text));
                }
                _ => {}
            }
        }
        if events_processed {
            request_redraw = true;
        }

        let mut outcomes_processed = false;
        while let Ok((outcome, query_id)) = outcome_rx.try_recv() {
            let action = match outcome {
                QueryOutcome::Completed(answer) => AppAction::QueryCompleted { query_id, answer },
                QueryOutcome::Failed(_) => AppAction::QueryFailed { query_id },
            };
            apply_action(app, action, ctx);
            outcomes_processed = true;
        }
        if outcomes_processed {
            request_redraw = true;
        }

        // Keep the thinking indicator animating while a query is pending.
        if app.ui.pending && last_indicator_frame.elapsed() >= INDICATOR_INTERVAL {
            request_redraw = true;
            last_indicator_frame = Instant::now();
        }

        if !events_processed && !outcomes_processed && !request_redraw {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    }

    Ok(())
}

fn handle_key_event(
    app: &mut App,
    dispatcher: &QueryDispatcher,
    key: KeyEvent,
    term_size: Size,
    ctx: AppActionContext,
) {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.ui.exit_requested = true;
        }
        KeyCode::Enter => {
            if submit_on_enter(key.modifiers) {
                let text = app.ui.input_text();
                if let Some(AppCommand::SpawnQuery(params)) =
                    apply_action(app, AppAction::SubmitQuery { text }, ctx)
                {
                    app.ui.clear_input();
                    dispatcher.spawn_query(params);
                }
            } else {
                app.ui.insert_newline();
            }
        }
        KeyCode::Up => {
            app.ui.auto_scroll = false;
            app.ui.scroll_offset = app.ui.scroll_offset.saturating_sub(1);
        }
        KeyCode::Down => {
            let metrics =
                renderer::transcript_metrics(&app.ui, term_size.width, term_size.height);
            app.ui.scroll_offset = app
                .ui
                .scroll_offset
                .saturating_add(1)
                .min(metrics.max_scroll);
            if app.ui.scroll_offset >= metrics.max_scroll {
                app.ui.auto_scroll = true;
            }
        }
        _ => {
            app.ui.apply_key(tui_textarea::Input::from(key));
        }
    }
}

fn handle_mouse_event(
    app: &mut App,
    selection: &mut SelectionTracker,
    mouse: MouseEvent,
    term_size: Size,
    ctx: AppActionContext,
) {
    let metrics = renderer::transcript_metrics(&app.ui, term_size.width, term_size.height);
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.ui.auto_scroll = false;
            app.ui.scroll_offset = app.ui.scroll_offset.saturating_sub(3);
        }
        MouseEventKind::ScrollDown => {
            app.ui.scroll_offset = app
                .ui
                .scroll_offset
                .saturating_add(3)
                .min(metrics.max_scroll);
            if app.ui.scroll_offset >= metrics.max_scroll {
                app.ui.auto_scroll = true;
            }
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(pos) = transcript_cell(&metrics, app.ui.scroll_offset, &mouse) {
                selection.begin(pos);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if selection.is_dragging() {
                selection.update(clamped_transcript_cell(
                    &metrics,
                    app.ui.scroll_offset,
                    &mouse,
                ));
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            // Every release refreshes the snapshot; a plain click clears it.
            let lines = renderer::build_transcript_lines(&app.ui, term_size.width);
            let text = selection.finish(&lines).unwrap_or_default();
            apply_action(app, AppAction::SetSelection { text }, ctx);
        }
        _ => {}
    }
}

/// Mouse position mapped into transcript coordinates, if it falls inside
/// the transcript viewport.
fn transcript_cell(
    metrics: &TranscriptMetrics,
    scroll_offset: u16,
    mouse: &MouseEvent,
) -> Option<CellPos> {
    if mouse.row < metrics.viewport_y
        || mouse.row >= metrics.viewport_y + metrics.viewport_height
    {
        return None;
    }
    Some(CellPos {
        row: scroll_offset + (mouse.row - metrics.viewport_y),
        col: mouse.column,
    })
}

/// Same mapping for drag updates, clamped into the viewport so drags that
/// wander over the header or input area still resolve.
fn clamped_transcript_cell(
    metrics: &TranscriptMetrics,
    scroll_offset: u16,
    mouse: &MouseEvent,
) -> CellPos {
    let bottom = metrics.viewport_y + metrics.viewport_height.saturating_sub(1);
    let clamped_row = mouse.row.clamp(metrics.viewport_y, bottom.max(metrics.viewport_y));
    CellPos {
        row: scroll_offset + (clamped_row - metrics.viewport_y),
        col: mouse.column,
    }
}

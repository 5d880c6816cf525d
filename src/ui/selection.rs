use ratatui::text::Line;

use crate::utils::scroll::char_width;

/// A position in the transcript, addressed in wrapped display lines: `row`
/// is an index into the pre-wrapped line list (scroll already applied) and
/// `col` is a terminal cell column within that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CellPos {
    pub row: u16,
    pub col: u16,
}

/// Tracks a mouse drag over the transcript so the covered text can be
/// captured when the button is released. The capture happens against the
/// same pre-wrapped lines the renderer draws, so what is highlighted by the
/// terminal is what ends up in the snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionTracker {
    drag: Option<(CellPos, CellPos)>,
}

impl SelectionTracker {
    pub fn begin(&mut self, pos: CellPos) {
        self.drag = Some((pos, pos));
    }

    pub fn update(&mut self, pos: CellPos) {
        if let Some((_, head)) = self.drag.as_mut() {
            *head = pos;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Finish the drag and return the raw text it covered. Returns an empty
    /// string for a plain click (anchor == head on a single cell is still a
    /// one-cell selection, matching terminal conventions, but a release
    /// without a preceding press yields nothing).
    pub fn finish(&mut self, lines: &[Line]) -> Option<String> {
        let (anchor, head) = self.drag.take()?;
        let (start, end) = if anchor <= head {
            (anchor, head)
        } else {
            (head, anchor)
        };
        Some(extract_text(lines, start, end))
    }
}

pub fn line_text(line: &Line) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

/// Extract the text covered by an inclusive cell range across one or more
/// display lines. Rows outside the line list are ignored.
pub fn extract_text(lines: &[Line], start: CellPos, end: CellPos) -> String {
    let mut parts = Vec::new();
    for row in start.row..=end.row {
        let Some(line) = lines.get(row as usize) else {
            break;
        };
        let text = line_text(line);
        let piece = if start.row == end.row {
            slice_columns(&text, start.col as usize, end.col as usize + 1)
        } else if row == start.row {
            slice_columns(&text, start.col as usize, usize::MAX)
        } else if row == end.row {
            slice_columns(&text, 0, end.col as usize + 1)
        } else {
            text
        };
        parts.push(piece);
    }
    parts.join("\n")
}

/// Take the characters whose display cells intersect the half-open column
/// range `[start, end)`. Zero-width characters never intersect and are
/// dropped.
fn slice_columns(text: &str, start: usize, end: usize) -> String {
    let mut out = String::new();
    let mut col = 0usize;
    for ch in text.chars() {
        if col >= end {
            break;
        }
        let w = char_width(ch);
        if w > 0 && col + w > start && col < end {
            out.push(ch);
        }
        col += w;
    }
    out
}

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

/// Scroll math shared by the renderer and the event loop.
pub struct ScrollCalculator;

impl ScrollCalculator {
    /// Pre-wrap styled lines to `width` columns, breaking at word boundaries
    /// and splitting words wider than a full row. Rendering the result
    /// without ratatui's built-in wrapping keeps line counts in step with
    /// scroll offsets and selection coordinates.
    pub fn prewrap_lines(lines: &[Line], width: u16) -> Vec<Line<'static>> {
        let width = width as usize;
        let mut out: Vec<Line<'static>> = Vec::with_capacity(lines.len());

        if width == 0 {
            for line in lines {
                out.push(owned_copy(line));
            }
            return out;
        }

        for line in lines {
            wrap_line(line, width, &mut out);
        }
        out
    }

    pub fn wrapped_line_count(lines: &[Line], width: u16) -> u16 {
        Self::prewrap_lines(lines, width).len().min(u16::MAX as usize) as u16
    }

    pub fn max_scroll_offset(total_lines: u16, viewport_height: u16) -> u16 {
        total_lines.saturating_sub(viewport_height)
    }
}

pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

fn owned_copy(line: &Line) -> Line<'static> {
    if line.spans.is_empty() {
        return Line::from("");
    }
    let spans: Vec<Span<'static>> = line
        .spans
        .iter()
        .map(|s| Span::styled(s.content.to_string(), s.style))
        .collect();
    Line::from(spans)
}

fn push_run(row: &mut Vec<Span<'static>>, style: Style, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = row.last_mut() {
        if last.style == style {
            let mut merged = last.content.to_string();
            merged.push_str(text);
            *last = Span::styled(merged, style);
            return;
        }
    }
    row.push(Span::styled(text.to_string(), style));
}

struct RowBuilder {
    row: Vec<Span<'static>>,
    row_width: usize,
    emitted: bool,
}

impl RowBuilder {
    fn new() -> Self {
        Self {
            row: Vec::new(),
            row_width: 0,
            emitted: false,
        }
    }

    fn emit(&mut self, out: &mut Vec<Line<'static>>) {
        out.push(Line::from(std::mem::take(&mut self.row)));
        self.row_width = 0;
        self.emitted = true;
    }

    /// Place a word on the current row, wrapping first if it does not fit
    /// and hard-splitting words wider than the whole row.
    fn place_word(
        &mut self,
        out: &mut Vec<Line<'static>>,
        word: &mut Vec<(String, Style)>,
        word_width: &mut usize,
        width: usize,
    ) {
        if word.is_empty() {
            return;
        }
        if self.row_width > 0 && self.row_width + *word_width > width {
            self.emit(out);
        }
        if *word_width <= width {
            for (text, style) in word.drain(..) {
                push_run(&mut self.row, style, &text);
            }
            self.row_width += *word_width;
        } else {
            let mut buf = [0u8; 4];
            for (text, style) in word.drain(..) {
                for ch in text.chars() {
                    let w = char_width(ch);
                    if self.row_width > 0 && self.row_width + w > width {
                        self.emit(out);
                    }
                    push_run(&mut self.row, style, ch.encode_utf8(&mut buf));
                    self.row_width += w;
                }
            }
        }
        *word_width = 0;
    }
}

fn wrap_line(line: &Line, width: usize, out: &mut Vec<Line<'static>>) {
    if line.spans.is_empty() {
        out.push(Line::from(""));
        return;
    }

    let mut builder = RowBuilder::new();
    let mut word: Vec<(String, Style)> = Vec::new();
    let mut word_width = 0usize;

    for span in &line.spans {
        for ch in span.content.chars() {
            if ch == ' ' {
                builder.place_word(out, &mut word, &mut word_width, width);
                if builder.row_width < width {
                    push_run(&mut builder.row, span.style, " ");
                    builder.row_width += 1;
                } else {
                    builder.emit(out);
                }
            } else {
                match word.last_mut() {
                    Some((text, style)) if *style == span.style => text.push(ch),
                    _ => word.push((ch.to_string(), span.style)),
                }
                word_width += char_width(ch);
            }
        }
    }
    builder.place_word(out, &mut word, &mut word_width, width);

    if !builder.row.is_empty() || !builder.emitted {
        out.push(Line::from(builder.row));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::{Color, Style};

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn short_lines_are_untouched() {
        let lines = vec![Line::from("hello world")];
        let wrapped = ScrollCalculator::prewrap_lines(&lines, 40);
        assert_eq!(wrapped.len(), 1);
        assert_eq!(line_text(&wrapped[0]), "hello world");
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let lines = vec![Line::from("the robot arm moves slowly")];
        let wrapped = ScrollCalculator::prewrap_lines(&lines, 10);
        assert!(wrapped.len() > 1);
        for line in &wrapped {
            assert!(line_text(line).trim_end().len() <= 10);
        }
        let rejoined: Vec<String> = wrapped.iter().map(line_text).collect();
        assert_eq!(
            rejoined.join(" ").split_whitespace().collect::<Vec<_>>(),
            vec!["the", "robot", "arm", "moves", "slowly"]
        );
    }

    #[test]
    fn splits_words_wider_than_the_row() {
        let lines = vec![Line::from("abcdefghijklmnop")];
        let wrapped = ScrollCalculator::prewrap_lines(&lines, 5);
        assert_eq!(wrapped.len(), 4);
        assert_eq!(line_text(&wrapped[0]), "abcde");
        assert_eq!(line_text(&wrapped[3]), "p");
    }

    #[test]
    fn styles_survive_wrapping() {
        let styled = Style::default().fg(Color::Cyan);
        let lines = vec![Line::from(vec![
            Span::styled("You: ", styled),
            Span::styled("tell me about humanoid robots", Style::default()),
        ])];
        let wrapped = ScrollCalculator::prewrap_lines(&lines, 12);
        assert!(wrapped.len() > 1);
        assert_eq!(wrapped[0].spans[0].style, styled);
    }

    #[test]
    fn empty_lines_are_preserved() {
        let lines = vec![Line::from(""), Line::from("x"), Line::from("")];
        let wrapped = ScrollCalculator::prewrap_lines(&lines, 10);
        assert_eq!(wrapped.len(), 3);
    }

    #[test]
    fn max_scroll_offset_clamps_at_zero() {
        assert_eq!(ScrollCalculator::max_scroll_offset(3, 10), 0);
        assert_eq!(ScrollCalculator::max_scroll_offset(15, 10), 5);
    }
}

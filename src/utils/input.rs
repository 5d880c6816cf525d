//! Keyboard and paste input helpers.

/// Sanitize text before it enters the input area. Tabs become four spaces,
/// carriage returns become newlines, and other control characters are
/// dropped so pasted content cannot corrupt the terminal.
pub fn sanitize_text_input(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\t' => sanitized.push_str("    "),
            '\r' | '\n' => sanitized.push('\n'),
            _ if c.is_control() => {}
            _ => sanitized.push(c),
        }
    }
    sanitized
}

//! Terminal output sanitization
//!
//! Titles and excerpts come straight from exported chat text. Before they are printed
//! (`analyze` summary, `list` table and list formats) they go through
//! [`sanitize_for_terminal`] so escape sequences embedded in a conversation cannot move the
//! cursor, clear the screen or recolor the terminal.

/// Strips ANSI CSI escape sequences and control characters (tab, newline and carriage
/// return are kept)
///
/// # Examples
///
/// ```
/// use ai_history_analyser::utils::terminal::strip_ansi_codes;
///
/// let text = "\x1b[31mRed text\x1b[0m";
/// assert_eq!(strip_ansi_codes(text), "Red text");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // CSI sequences end at the first letter
            while let Some(&next_ch) = chars.peek() {
                chars.next();
                if next_ch.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }

        if ch.is_control() && ch != '\t' && ch != '\n' && ch != '\r' {
            continue;
        }

        result.push(ch);
    }

    result
}

/// Single-line, escape-free rendering of user text, cut to `max_chars` with an ellipsis
pub fn sanitize_for_terminal(text: &str, max_chars: usize) -> String {
    let clean = strip_ansi_codes(text);
    let single_line = clean.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let keep = max_chars.saturating_sub(3);
    let mut cut: String = single_line.chars().take(keep).collect();
    cut.push_str("...");
    cut
}

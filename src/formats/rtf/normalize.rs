//! Text normalization
//!
//! Cleans up the whitespace left behind by deleted markup.

use crate::document::WhitespacePolicy;

/// Paragraph breaks are capped at one blank line
const MAX_CONSECUTIVE_NEWLINES: usize = 2;

/// Normalize extracted text
///
/// - NUL characters are removed and CR / CRLF become LF
/// - spaces and tabs directly before a line break are removed
/// - runs of three or more line breaks become exactly two
/// - leading and trailing whitespace is trimmed
/// - under [`WhitespacePolicy::Collapse`], runs of spaces inside a line
///   become a single space; tabs are never touched
pub fn normalize(text: &str, policy: WhitespacePolicy) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_ws = String::new();
    let mut newlines = 0usize;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\0' => {}
            '\r' => {
                if chars.peek() != Some(&'\n') {
                    pending_ws.clear();
                    newlines += 1;
                }
            }
            '\n' => {
                pending_ws.clear();
                newlines += 1;
            }
            ' ' | '\t' => pending_ws.push(ch),
            _ => {
                if !out.is_empty() {
                    for _ in 0..newlines.min(MAX_CONSECUTIVE_NEWLINES) {
                        out.push('\n');
                    }
                    push_whitespace(&mut out, &pending_ws, policy);
                }
                newlines = 0;
                pending_ws.clear();
                out.push(ch);
            }
        }
    }

    // Unicode whitespace (NBSP and friends) can still sit at the edges
    let trimmed = out.trim();
    if trimmed.len() == out.len() {
        out
    } else {
        trimmed.to_string()
    }
}

fn push_whitespace(out: &mut String, ws: &str, policy: WhitespacePolicy) {
    match policy {
        WhitespacePolicy::Preserve => out.push_str(ws),
        WhitespacePolicy::Collapse => {
            let mut last_space = false;
            for ch in ws.chars() {
                if ch == ' ' && last_space {
                    continue;
                }
                last_space = ch == ' ';
                out.push(ch);
            }
        }
    }
}

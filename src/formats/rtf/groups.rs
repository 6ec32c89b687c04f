//! Group-scope stripping
//!
//! Removes whole destination groups (font table, color table, styles,
//! document info, pictures, headers, footers, `{\*...}` extensions) from
//! raw RTF bytes. A single left-to-right pass keeps a stack of frames;
//! once a frame is ignorable everything nested inside it is dropped too,
//! however deep the braces go.

use std::collections::HashSet;

use super::lex;

/// Destinations that never carry body text
pub const DEFAULT_IGNORED_DESTINATIONS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "stylesheet",
    "info",
    "pict",
    "header",
    "footer",
    "headerl",
    "headerr",
    "headerf",
    "footerl",
    "footerr",
    "footerf",
    "listtable",
    "listoverridetable",
    "revtbl",
    "rsidtbl",
    "filetbl",
    "object",
    "xmlnstbl",
];

/// Build the default ignore-set
pub fn default_ignored_destinations() -> HashSet<String> {
    DEFAULT_IGNORED_DESTINATIONS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Group stack. Only the ignore flags matter, so the stack stores them
/// directly and keeps a count of ignorable frames for O(1) lookups.
#[derive(Debug, Default)]
struct GroupStack {
    frames: Vec<bool>,
    ignored: usize,
}

impl GroupStack {
    fn push(&mut self, ignore: bool) {
        if ignore {
            self.ignored += 1;
        }
        self.frames.push(ignore);
    }

    /// Pop the innermost frame. An unmatched `}` pops an implicit
    /// non-ignorable frame.
    fn pop(&mut self) -> bool {
        let ignore = self.frames.pop().unwrap_or(false);
        if ignore {
            self.ignored -= 1;
        }
        ignore
    }

    fn any_ignored(&self) -> bool {
        self.ignored > 0
    }
}

/// Strip ignorable groups from raw RTF
///
/// Groups opened with `{\*` are always dropped. Other groups are dropped
/// when their leading control word (lower-cased) is in `ignore`; entries
/// of `ignore` are expected in lower case.
///
/// Escaped `\{`, `\}` and `\\` are opaque two-byte units and never touch
/// the stack. `\binN` and its `N` payload bytes are dropped outright.
/// Unbalanced input never fails.
pub fn strip_groups(src: &[u8], ignore: &HashSet<String>) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.len());
    let mut stack = GroupStack::default();
    let mut i = 0;

    while i < src.len() {
        match src[i] {
            b'{' => {
                stack.push(opens_ignorable(src, i + 1, ignore));
                if !stack.any_ignored() {
                    out.push(b'{');
                }
                i += 1;
            }
            b'}' => {
                let popped = stack.pop();
                if !popped && !stack.any_ignored() {
                    out.push(b'}');
                }
                i += 1;
            }
            b'\\' => {
                let next = skip_escape(src, i);
                if !stack.any_ignored() && !is_binary_word(src, i) {
                    out.extend_from_slice(&src[i..next]);
                }
                i = next;
            }
            b => {
                if !stack.any_ignored() {
                    out.push(b);
                }
                i += 1;
            }
        }
    }

    out
}

/// Decide whether the group whose first byte after `{` is at `pos` is
/// ignorable
fn opens_ignorable(src: &[u8], pos: usize, ignore: &HashSet<String>) -> bool {
    let mut j = pos;
    if src.get(j) == Some(&b'\\') {
        j += 1;
    }
    if src.get(j) == Some(&b'*') {
        return true;
    }

    let start = j;
    while j < src.len() && src[j].is_ascii_alphabetic() {
        j += 1;
    }
    if j == start {
        return false;
    }

    // Letters are ASCII, so this is always valid UTF-8
    let word = String::from_utf8_lossy(&src[start..j]).to_ascii_lowercase();
    ignore.contains(&word)
}

/// Index just past the backslash construct at `pos`
fn skip_escape(src: &[u8], pos: usize) -> usize {
    match src.get(pos + 1) {
        Some(b'\\' | b'{' | b'}') => pos + 2,
        Some(_) => match lex::control_word(src, pos) {
            Some(word) if word.is("bin") => {
                // Raw payload follows the delimiter; its bytes are not RTF
                let payload = lex::skip_delimiter(src, word.end);
                let len = word.param.unwrap_or(0).max(0) as usize;
                payload.saturating_add(len).min(src.len())
            }
            Some(word) => word.end,
            None => pos + 1,
        },
        None => pos + 1,
    }
}

fn is_binary_word(src: &[u8], pos: usize) -> bool {
    lex::control_word(src, pos).is_some_and(|word| word.is("bin"))
}

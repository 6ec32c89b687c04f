//! Control-word elimination
//!
//! Final markup pass over decoded RTF. Paragraph and tab words become
//! `\n` and `\t`, literal escapes are unescaped, and every other control
//! word, control symbol and structural brace is deleted.

use super::lex;

/// Remove the remaining RTF markup from decoded text
pub fn strip_control_words(text: &str) -> String {
    let src = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut run_start = 0;
    let mut i = 0;

    // Only ASCII bytes are ever skipped, so every copied run stays on
    // char boundaries
    while i < src.len() {
        match src[i] {
            b'\\' => {
                out.push_str(&text[run_start..i]);
                i = markup(src, i, &mut out);
                run_start = i;
            }
            // Braces are structural once groups are resolved; raw line
            // breaks in RTF source carry no content
            b'{' | b'}' | b'\r' | b'\n' => {
                out.push_str(&text[run_start..i]);
                i += 1;
                run_start = i;
            }
            _ => i += 1,
        }
    }
    out.push_str(&text[run_start..]);

    out
}

/// Translate the backslash construct at `pos`, returning the index past it
fn markup(src: &[u8], pos: usize, out: &mut String) -> usize {
    match src.get(pos + 1) {
        // Literal escapes take priority over every other rule
        Some(&c @ (b'\\' | b'{' | b'}')) => {
            out.push(c as char);
            pos + 2
        }
        Some(c) if c.is_ascii_alphabetic() => match lex::control_word(src, pos) {
            Some(word) => {
                if word.is("par") || word.is("pard") {
                    out.push('\n');
                } else if word.is("tab") {
                    out.push('\t');
                }
                lex::skip_delimiter(src, word.end)
            }
            None => pos + 1,
        },
        // Backslash before a source line break is a paragraph mark
        Some(b'\r' | b'\n') => {
            out.push('\n');
            pos + 2
        }
        Some(b'~') => {
            out.push(' ');
            pos + 2
        }
        Some(b'_') => {
            out.push('-');
            pos + 2
        }
        // Remaining control symbols: \- \* \: \| and leftovers of
        // truncated escapes
        Some(c) if c.is_ascii() => pos + 2,
        _ => pos + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_and_tabs() {
        assert_eq!(strip_control_words("\\pard One\\par Two\\tab Three"), "\nOne\nTwo\tThree");
    }

    #[test]
    fn test_formatting_words_deleted() {
        assert_eq!(
            strip_control_words("{\\b\\fs24 Bold} {\\i0 plain}\\cf1  x"),
            "Bold plain x"
        );
    }

    #[test]
    fn test_word_with_negative_parameter() {
        assert_eq!(strip_control_words("\\fi-360\\li720 Item"), "Item");
    }

    #[test]
    fn test_word_followed_by_punctuation() {
        assert_eq!(strip_control_words("\\b0,then"), ",then");
    }

    #[test]
    fn test_par_is_whole_word() {
        // `\pardeftab` is a different word and is deleted
        assert_eq!(strip_control_words("\\pardeftab720 x\\partightenfactor0 y"), "xy");
    }

    #[test]
    fn test_literal_escapes() {
        assert_eq!(
            strip_control_words("\\{braces\\} and \\\\backslash"),
            "{braces} and \\backslash"
        );
        // An escaped backslash followed by letters is not a control word
        assert_eq!(strip_control_words("C:\\\\par"), "C:\\par");
    }

    #[test]
    fn test_control_symbols() {
        assert_eq!(strip_control_words("a\\~b\\_c\\-d\\*e"), "a b-cde");
        assert_eq!(strip_control_words("line\\\nnext"), "line\nnext");
    }

    #[test]
    fn test_source_line_breaks_dropped() {
        assert_eq!(strip_control_words("Hel\r\nlo\\par\r\nWorld"), "Hello\nWorld");
    }

    #[test]
    fn test_non_ascii_preserved() {
        assert_eq!(strip_control_words("{\\f1 Привет}\\tab мир"), "Привет\tмир");
        assert_eq!(strip_control_words("\\é"), "é");
    }

    #[test]
    fn test_dangling_backslash() {
        assert_eq!(strip_control_words("end\\"), "end");
    }
}

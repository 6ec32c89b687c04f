//! Escape decoding
//!
//! Turns the byte-oriented RTF stream into Unicode text by resolving
//! `\uN` (UTF-16 code units) and `\'hh` (bytes in the document code page).
//! Everything else is copied through unchanged for the control-word stage.
//!
//! Decoded characters that RTF treats as structural (`\`, `{`, `}`) are
//! written back escaped, so later stages read them as literal content.

use super::codepage::CodePage;
use super::lex;
use crate::document::Result;

/// Fallback characters following `\uN` when no `\ucN` has been seen
const DEFAULT_UNICODE_SKIP: usize = 1;

/// Decode `\uN` and `\'hh` escapes in stripped RTF
///
/// Adjacent `\'hh` escapes are decoded together so double-byte code pages
/// work; raw bytes above 0x7F join the same run. Adjacent `\uN` escapes are
/// combined so surrogate pairs produce one character.
///
/// Fails only when bytes must be decoded under a code page that has no
/// decoder.
pub fn decode_escapes(src: &[u8], codepage: CodePage) -> Result<String> {
    EscapeDecoder::new(src, codepage).run()
}

struct EscapeDecoder<'a> {
    src: &'a [u8],
    pos: usize,
    codepage: CodePage,
    out: String,
    /// Pending bytes awaiting code page decoding
    bytes: Vec<u8>,
    /// Pending UTF-16 code units
    units: Vec<u16>,
    /// Fallback characters to drop after each `\uN`
    unicode_skip: usize,
    /// `\ucN` values of the enclosing groups
    saved_skips: Vec<usize>,
}

impl<'a> EscapeDecoder<'a> {
    fn new(src: &'a [u8], codepage: CodePage) -> Self {
        Self {
            src,
            pos: 0,
            codepage,
            out: String::with_capacity(src.len()),
            bytes: Vec::new(),
            units: Vec::new(),
            unicode_skip: DEFAULT_UNICODE_SKIP,
            saved_skips: Vec::new(),
        }
    }

    fn run(mut self) -> Result<String> {
        while self.pos < self.src.len() {
            let b = self.src[self.pos];
            if b == b'\\' {
                self.backslash()?;
            } else if b.is_ascii() {
                // `\ucN` is scoped to its group
                match b {
                    b'{' => self.saved_skips.push(self.unicode_skip),
                    b'}' => {
                        if let Some(skip) = self.saved_skips.pop() {
                            self.unicode_skip = skip;
                        }
                    }
                    _ => {}
                }
                self.flush()?;
                self.out.push(b as char);
                self.pos += 1;
            } else {
                self.flush_units();
                self.bytes.push(b);
                self.pos += 1;
            }
        }
        self.flush()?;
        Ok(self.out)
    }

    fn backslash(&mut self) -> Result<()> {
        let src = self.src;
        let pos = self.pos;

        match src.get(pos + 1) {
            Some(b'\'') => {
                if let Some(byte) = lex::hex_byte(src, pos + 2) {
                    self.flush_units();
                    self.bytes.push(byte);
                    self.pos += 4;
                    return Ok(());
                }
            }
            Some(b'\\' | b'{' | b'}') => {
                self.flush()?;
                self.out.push('\\');
                self.out.push(src[pos + 1] as char);
                self.pos += 2;
                return Ok(());
            }
            _ => {}
        }

        match lex::control_word(src, pos) {
            Some(word) if word.is("u") && word.param.is_some() => {
                self.flush_bytes()?;
                let value = word.param.unwrap_or_default();
                // Negative values encode code units >= 32768
                self.units.push(value.rem_euclid(0x1_0000) as u16);
                self.pos = lex::skip_delimiter(src, word.end);
                self.skip_fallback();
            }
            Some(word) => {
                if word.is("uc") {
                    self.unicode_skip = word.param.unwrap_or(1).max(0) as usize;
                }
                self.flush()?;
                self.out.push_str(&String::from_utf8_lossy(&src[pos..word.end]));
                // Decoded text must not run into the word, so give it an
                // explicit delimiter when the source has none
                if src.get(word.end).is_some_and(|&next| next != b' ') {
                    self.out.push(' ');
                }
                self.pos = word.end;
            }
            None => {
                // Control symbol or truncated escape; left for the next stage
                self.flush()?;
                self.out.push('\\');
                self.pos += 1;
            }
        }
        Ok(())
    }

    /// Drop the ANSI fallback that follows a `\uN` escape
    fn skip_fallback(&mut self) {
        let mut remaining = self.unicode_skip;
        while remaining > 0 && self.pos < self.src.len() {
            match self.src[self.pos] {
                b'\\' if self.src.get(self.pos + 1) == Some(&b'\'')
                    && lex::hex_byte(self.src, self.pos + 2).is_some() =>
                {
                    self.pos += 4;
                }
                b'\\' | b'{' | b'}' => return,
                // Source line breaks are not content and do not count
                b'\r' | b'\n' => {
                    self.pos += 1;
                    continue;
                }
                _ => self.pos += 1,
            }
            remaining -= 1;
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.flush_bytes()?;
        self.flush_units();
        Ok(())
    }

    fn flush_bytes(&mut self) -> Result<()> {
        if self.bytes.is_empty() {
            return Ok(());
        }
        let text = self.codepage.decode(&self.bytes)?;
        self.bytes.clear();
        push_literal(&mut self.out, text.chars());
        Ok(())
    }

    fn flush_units(&mut self) {
        if self.units.is_empty() {
            return;
        }
        let chars = char::decode_utf16(self.units.drain(..))
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER));
        push_literal(&mut self.out, chars);
    }
}

/// Append decoded characters, escaping the ones RTF treats as markup
fn push_literal(out: &mut String, chars: impl Iterator<Item = char>) {
    for ch in chars {
        if matches!(ch, '\\' | '{' | '}') {
            out.push('\\');
        }
        out.push(ch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(src: &str, codepage: u32) -> String {
        decode_escapes(src.as_bytes(), CodePage(codepage)).unwrap()
    }

    /// Encode a BMP character the way RTF writers do
    fn rtf_unicode(ch: char) -> String {
        let unit = ch as u32;
        assert!(unit <= 0xFFFF);
        let signed = if unit >= 0x8000 { unit as i64 - 0x1_0000 } else { unit as i64 };
        format!("\\u{}?", signed)
    }

    #[test]
    fn test_unicode_escape() {
        assert_eq!(decode("\\u1055?\\u1088?\\u1080?", 1252), "При");
    }

    #[test]
    fn test_unicode_negative_value() {
        // U+FF21 FULLWIDTH LATIN CAPITAL LETTER A, written as 65313 - 65536
        assert_eq!(decode("\\u-223?", 1252), "\u{FF21}");
    }

    #[test]
    fn test_unicode_round_trip() {
        for ch in ['é', 'Ж', 'ש', '中', '\u{20AC}', '\u{FB01}', '\u{FFFD}', '\u{8000}'] {
            let encoded = rtf_unicode(ch);
            assert_eq!(decode(&encoded, 1251), ch.to_string(), "round trip of {}", encoded);
        }
    }

    #[test]
    fn test_unicode_surrogate_pair() {
        // U+1F600 = D83D DE00 = -10179, -8704
        assert_eq!(decode("\\u-10179?\\u-8704?", 1252), "\u{1F600}");
    }

    #[test]
    fn test_unicode_lone_surrogate() {
        assert_eq!(decode("\\u-10179?x", 1252), "\u{FFFD}x");
    }

    #[test]
    fn test_unicode_space_delimiter_and_fallback() {
        // The space ends the control word, the next character is the fallback
        assert_eq!(decode("\\u1078 zok", 1252), "\u{436}ok");
    }

    #[test]
    fn test_unicode_hex_fallback() {
        assert_eq!(decode("\\u1046\\'c6 rest", 1251), "\u{416} rest");
    }

    #[test]
    fn test_uc_zero_has_no_fallback() {
        assert_eq!(decode("\\uc0\\u1046 rest", 1252), "\\uc0 \u{416}rest");
    }

    #[test]
    fn test_uc_two() {
        assert_eq!(decode("\\uc2\\u1046??x", 1252), "\\uc2 \u{416}x");
    }

    #[test]
    fn test_uc_scoped_to_group() {
        assert_eq!(
            decode("{\\uc0 \\u1046}\\u1047?x", 1252),
            "{\\uc0 \u{416}}\u{417}x"
        );
        assert_eq!(decode("{\\uc2 {\\u1046??}\\u1047??}", 1252), "{\\uc2 {\u{416}}\u{417}}");
    }

    #[test]
    fn test_decoded_text_gets_word_delimiter() {
        assert_eq!(decode("\\b\\'41BC", 1252), "\\b ABC");
        assert_eq!(decode("\\i\\u65?bc", 1252), "\\i Abc");
        assert_eq!(decode("a\\b\\'20b", 1252), "a\\b  b");
        // An existing space delimiter is left alone
        assert_eq!(decode("\\b \\'41", 1252), "\\b A");
    }

    #[test]
    fn test_fallback_stops_at_group_boundary() {
        assert_eq!(decode("{\\u1046}", 1252), "{\u{416}}");
    }

    #[test]
    fn test_hex_escape_cyrillic() {
        let src: String = (0xC0u8..=0xFF).map(|b| format!("\\'{:02x}", b)).collect();
        let expected: String = ('А'..='я').collect();
        assert_eq!(decode(&src, 1251), expected);
    }

    #[test]
    fn test_hex_escape_uppercase_digits() {
        assert_eq!(decode("caf\\'E9", 1252), "café");
    }

    #[test]
    fn test_hex_escape_double_byte_run() {
        assert_eq!(decode("\\'93\\'fa\\'96\\'7b", 932), "日本");
    }

    #[test]
    fn test_raw_high_bytes_use_code_page() {
        let out = decode_escapes(b"\xcf\xf0\xe8\xe2\xe5\xf2", CodePage(1251)).unwrap();
        assert_eq!(out, "Привет");
    }

    #[test]
    fn test_decoded_markup_characters_are_escaped() {
        assert_eq!(decode("\\'5c\\'7b\\'7d", 1252), "\\\\\\{\\}");
        assert_eq!(decode("\\u92?", 1252), "\\\\");
    }

    #[test]
    fn test_literal_escapes_pass_through() {
        // `\\'e9` is an escaped backslash followed by text, not a hex escape
        assert_eq!(decode("\\\\'e9 \\{ \\}", 1252), "\\\\'e9 \\{ \\}");
    }

    #[test]
    fn test_control_words_pass_through() {
        assert_eq!(decode("\\b\\fs24 Hi\\par", 1252), "\\b \\fs24 Hi\\par");
        assert_eq!(decode("\\ul text\\ulnone", 1252), "\\ul text\\ulnone");
    }

    #[test]
    fn test_truncated_escapes_pass_through() {
        assert_eq!(decode("a\\'4", 1252), "a\\'4");
        assert_eq!(decode("a\\'", 1252), "a\\'");
        assert_eq!(decode("a\\u", 1252), "a\\u");
        assert_eq!(decode("a\\", 1252), "a\\");
    }

    #[test]
    fn test_unsupported_code_page_only_fails_when_used() {
        assert_eq!(decode("plain \\u1046?", 437), "plain \u{416}");
        assert!(decode_escapes(b"\\'e9", CodePage(437)).is_err());
    }
}

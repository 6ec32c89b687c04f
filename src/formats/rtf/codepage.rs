//! Document code page resolution
//!
//! RTF declares its ANSI code page once in the header (`\ansicpg1251`).
//! `\'hh` escapes and raw 8-bit bytes are interpreted under it.

use std::fmt;

use encoding_rs::{
    Encoding, BIG5, EUC_JP, EUC_KR, GB18030, GBK, IBM866, ISO_2022_JP, ISO_8859_13,
    ISO_8859_15, ISO_8859_2, ISO_8859_3, ISO_8859_4, ISO_8859_5, ISO_8859_6, ISO_8859_7,
    ISO_8859_8, KOI8_R, KOI8_U, MACINTOSH, SHIFT_JIS, UTF_8, WINDOWS_1250, WINDOWS_1251,
    WINDOWS_1252, WINDOWS_1253, WINDOWS_1254, WINDOWS_1255, WINDOWS_1256, WINDOWS_1257,
    WINDOWS_1258, WINDOWS_874, X_MAC_CYRILLIC,
};

use super::lex;
use crate::document::{ConversionError, Result};

/// Code page used when the document does not declare one
pub const DEFAULT_CODEPAGE: u32 = 1251;

/// Numeric Windows code page identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodePage(pub u32);

impl Default for CodePage {
    fn default() -> Self {
        CodePage(DEFAULT_CODEPAGE)
    }
}

impl fmt::Display for CodePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cp{}", self.0)
    }
}

impl CodePage {
    /// Find the first `\ansicpgN` in the document
    ///
    /// Later declarations are ignored. Escaped backslashes are skipped so
    /// that literal text reading `\\ansicpg` does not count.
    pub fn detect(src: &[u8]) -> Option<Self> {
        let mut i = 0;
        while i < src.len() {
            if src[i] != b'\\' {
                i += 1;
                continue;
            }
            if src.get(i + 1) == Some(&b'\\') {
                i += 2;
                continue;
            }
            match lex::control_word(src, i) {
                Some(word) if word.is("ansicpg") => {
                    if let Some(id) = word.param.and_then(|p| u32::try_from(p).ok()) {
                        return Some(CodePage(id));
                    }
                    i = word.end;
                }
                Some(word) => i = word.end,
                None => i += 1,
            }
        }
        None
    }

    /// Code page declared by the document, or `default`
    pub fn resolve(src: &[u8], default: u32) -> Self {
        Self::detect(src).unwrap_or(CodePage(default))
    }

    /// Look up the decoder for this code page
    pub fn encoding(self) -> Result<&'static Encoding> {
        let encoding = match self.0 {
            874 => WINDOWS_874,
            932 => SHIFT_JIS,
            936 => GBK,
            949 => EUC_KR,
            950 => BIG5,
            866 => IBM866,
            1250 => WINDOWS_1250,
            1251 => WINDOWS_1251,
            1252 => WINDOWS_1252,
            1253 => WINDOWS_1253,
            1254 => WINDOWS_1254,
            1255 => WINDOWS_1255,
            1256 => WINDOWS_1256,
            1257 => WINDOWS_1257,
            1258 => WINDOWS_1258,
            10000 => MACINTOSH,
            10007 => X_MAC_CYRILLIC,
            20866 => KOI8_R,
            21866 => KOI8_U,
            // encoding_rs folds Latin-1 and Latin-5 into their Windows supersets
            28591 => WINDOWS_1252,
            28592 => ISO_8859_2,
            28593 => ISO_8859_3,
            28594 => ISO_8859_4,
            28595 => ISO_8859_5,
            28596 => ISO_8859_6,
            28597 => ISO_8859_7,
            28598 => ISO_8859_8,
            28599 => WINDOWS_1254,
            28603 => ISO_8859_13,
            28605 => ISO_8859_15,
            50220 => ISO_2022_JP,
            51932 => EUC_JP,
            54936 => GB18030,
            65001 => UTF_8,
            other => return Err(ConversionError::UnsupportedCodePage(other)),
        };
        Ok(encoding)
    }

    /// Decode a run of bytes under this code page
    ///
    /// Undecodable sequences become U+FFFD; only an unknown code page fails.
    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        let (text, _had_errors) = self.encoding()?.decode_without_bom_handling(bytes);
        Ok(text.into_owned())
    }
}

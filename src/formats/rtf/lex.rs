//! Byte-level RTF token helpers shared by the pipeline stages
//!
//! Every stage walks the document itself; these helpers only answer
//! "what control word starts here" so the stages agree on token
//! boundaries.

/// Longest parameter we bother to parse; RTF caps parameters at 16 bits
/// but malformed input can carry arbitrarily long digit runs
const MAX_PARAM_DIGITS: usize = 10;

/// A control word: backslash, ASCII letters, optional signed number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ControlWord<'a> {
    /// Letters of the word, as written
    pub name: &'a [u8],
    /// Numeric parameter, if present
    pub param: Option<i64>,
    /// Index just past the parameter (or the name when there is none).
    /// The optional space delimiter is not included.
    pub end: usize,
}

impl ControlWord<'_> {
    pub fn is(&self, name: &str) -> bool {
        self.name == name.as_bytes()
    }
}

/// Read the control word whose backslash sits at `pos`
///
/// Returns `None` when `pos` is not a backslash followed by a letter
/// (control symbols, escapes, end of input).
pub(crate) fn control_word(src: &[u8], pos: usize) -> Option<ControlWord<'_>> {
    if src.get(pos) != Some(&b'\\') {
        return None;
    }

    let start = pos + 1;
    let mut i = start;
    while i < src.len() && src[i].is_ascii_alphabetic() {
        i += 1;
    }
    if i == start {
        return None;
    }
    let name = &src[start..i];

    let negative = src.get(i) == Some(&b'-')
        && src.get(i + 1).is_some_and(|b| b.is_ascii_digit());
    let digits_start = if negative { i + 1 } else { i };
    let mut j = digits_start;
    while j < src.len() && src[j].is_ascii_digit() {
        j += 1;
    }

    if j == digits_start {
        return Some(ControlWord {
            name,
            param: None,
            end: i,
        });
    }

    let value = src[digits_start..j]
        .iter()
        .take(MAX_PARAM_DIGITS)
        .fold(0i64, |acc, d| acc * 10 + i64::from(d - b'0'));

    Some(ControlWord {
        name,
        param: Some(if negative { -value } else { value }),
        end: j,
    })
}

/// Skip the single space that may terminate a control word
pub(crate) fn skip_delimiter(src: &[u8], end: usize) -> usize {
    if src.get(end) == Some(&b' ') {
        end + 1
    } else {
        end
    }
}

/// Decode the two hex digits of a `\'hh` escape starting at `pos`
pub(crate) fn hex_byte(src: &[u8], pos: usize) -> Option<u8> {
    let hi = hex_digit(*src.get(pos)?)?;
    let lo = hex_digit(*src.get(pos + 1)?)?;
    Some((hi << 4) | lo)
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

use std::fmt;

use aws_sdk_route53::model::RrType;

/// DNS 255-byte character-string limit for a single TXT segment.
const MAX_TXT_SEGMENT: usize = 255;

/// Record types this crate manages.
///
/// Each type carries its value transform: TXT values are quoted and chunked
/// on the way in and unquoted on the way out, everything else passes values
/// through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
}

impl RecordType {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Txt => "TXT",
        }
    }

    pub(crate) fn rr_type(self) -> RrType {
        match self {
            RecordType::A => RrType::A,
            RecordType::Aaaa => RrType::Aaaa,
            RecordType::Cname => RrType::Cname,
            RecordType::Mx => RrType::Mx,
            RecordType::Txt => RrType::Txt,
        }
    }

    /// Transform logical values into their stored form.
    pub(crate) fn encode(self, values: Vec<String>) -> Vec<String> {
        match self {
            RecordType::Txt => values.iter().map(|v| quote_txt(v)).collect(),
            _ => values,
        }
    }

    /// Transform stored values back into logical form.
    pub(crate) fn decode(self, values: Vec<String>) -> Vec<String> {
        match self {
            RecordType::Txt => values.iter().map(|v| unquote_txt(v)).collect(),
            _ => values,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One or more record values. Lets callers pass a single `&str` where the
/// record only has one value, or a `Vec` where it has several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordValues(pub(crate) Vec<String>);

impl From<&str> for RecordValues {
    fn from(value: &str) -> Self {
        Self(vec![value.to_owned()])
    }
}

impl From<String> for RecordValues {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl<S: Into<String>> From<Vec<S>> for RecordValues {
    fn from(values: Vec<S>) -> Self {
        Self(values.into_iter().map(Into::into).collect())
    }
}

/// Quote a TXT value, splitting into two adjacent quoted segments when the
/// quoted form exceeds the 255-byte limit. The split lands on the last space
/// within the first 254 bytes so the seam is removable on the way back out;
/// a value with no space there is split at the byte limit itself. Values
/// needing more than two segments are not handled.
fn quote_txt(value: &str) -> String {
    let quoted = format!("\"{value}\"");
    if quoted.len() <= MAX_TXT_SEGMENT {
        return quoted;
    }

    let split = match quoted.as_bytes()[..MAX_TXT_SEGMENT - 1]
        .iter()
        .rposition(|&b| b == b' ')
    {
        Some(i) => i,
        None => floor_char_boundary(&quoted, MAX_TXT_SEGMENT - 1),
    };

    format!("{}\" \"{}", &quoted[..split], &quoted[split..])
}

/// Best-effort inverse of [`quote_txt`]: strip the outer quotes and, for
/// stored strings past the segment limit, drop the `" "` seam inserted by
/// the split. Not exact for values containing literal quote-space-quote
/// sequences.
fn unquote_txt(stored: &str) -> String {
    let was_split = stored.len() > MAX_TXT_SEGMENT;

    let inner = stored.strip_prefix('"').unwrap_or(stored);
    let inner = inner.strip_suffix('"').unwrap_or(inner);

    if was_split {
        // The quoting split lands no later than byte 253 of the inner
        // string, so the 3-byte seam always ends within the first 256.
        let window = floor_char_boundary(inner, MAX_TXT_SEGMENT + 1);
        if let Some(i) = inner[..window].rfind("\" \"") {
            let mut value = String::with_capacity(inner.len() - 3);
            value.push_str(&inner[..i]);
            value.push_str(&inner[i + 3..]);
            return value;
        }
    }

    inner.to_owned()
}

/// Largest index `<= at` that falls on a char boundary of `s`.
fn floor_char_boundary(s: &str, at: usize) -> usize {
    if at >= s.len() {
        return s.len();
    }
    let mut i = at;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

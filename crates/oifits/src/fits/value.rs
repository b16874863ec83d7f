//! Header card values: parsing the 70-byte value field and formatting it back.

use std::str;

/// A parsed FITS header value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// FITS logical value (`T` or `F`).
    Logical(bool),
    /// FITS integer value.
    Integer(i64),
    /// FITS floating-point value.
    Float(f64),
    /// FITS character string (content between single quotes, trailing
    /// blanks removed).
    String(String),
}

impl Value {
    /// Text form of the value as it would be read back from a header,
    /// without quotes. Floats always render with a fractional part or an
    /// exponent so they never look like integers.
    pub fn raw_text(&self) -> String {
        match self {
            Value::Logical(true) => String::from("T"),
            Value::Logical(false) => String::from("F"),
            Value::Integer(n) => n.to_string(),
            Value::Float(f) => format!("{f:?}"),
            Value::String(s) => s.clone(),
        }
    }
}

/// Find a ` /` comment separator in `field` and return the text after it.
///
/// Real-world files omit the space after the slash, so only ` /` is required.
fn find_comment(field: &[u8]) -> Option<(usize, &str)> {
    let len = field.len();
    let mut i = 0;
    while i + 1 < len {
        if field[i] == b' ' && field[i + 1] == b'/' {
            let mut start = i + 2;
            if start < len && field[start] == b' ' {
                start += 1;
            }
            let comment = str::from_utf8(&field[start..])
                .ok()
                .map(|s| s.trim_end())
                .filter(|s| !s.is_empty());
            return Some((i, comment.unwrap_or("")));
        }
        i += 1;
    }
    None
}

/// Parse a quoted string value. Doubled quotes inside the string are a
/// literal quote; an unterminated string is accepted as-is.
fn parse_string(field: &[u8]) -> (Value, Option<&str>) {
    let mut value = String::new();
    let mut i = 1;
    let len = field.len();

    while i < len {
        if field[i] == b'\'' {
            if i + 1 < len && field[i + 1] == b'\'' {
                value.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            break;
        }
        value.push(field[i] as char);
        i += 1;
    }

    let comment = find_comment(&field[i..])
        .map(|(_, c)| c)
        .filter(|c| !c.is_empty());
    (Value::String(value.trim_end().to_string()), comment)
}

/// Parse a float string, handling FITS `D` exponent notation.
fn parse_float_str(s: &str) -> Option<f64> {
    let normalized = s.replace('D', "E").replace('d', "e");
    normalized.parse::<f64>().ok()
}

/// Parse a FITS header value from the 70-byte value portion of a card
/// (bytes 10..80).
///
/// Returns the parsed [`Value`] and an optional comment. The caller checks
/// the `= ` value indicator beforehand.
pub fn parse_value(value_bytes: &[u8]) -> Option<(Value, Option<&str>)> {
    let start = value_bytes.iter().position(|&b| b != b' ')?;
    let field = &value_bytes[start..];

    if field[0] == b'\'' {
        return Some(parse_string(field));
    }

    let (val_part, comment) = match find_comment(field) {
        Some((idx, c)) => (&field[..idx], Some(c).filter(|c| !c.is_empty())),
        None => (field, None),
    };
    let val_text = str::from_utf8(val_part).ok()?.trim();
    if val_text.is_empty() {
        return None;
    }

    match val_text {
        "T" => return Some((Value::Logical(true), comment)),
        "F" => return Some((Value::Logical(false), comment)),
        _ => {}
    }

    if !val_text.contains(['.', 'E', 'e', 'D', 'd']) {
        if let Ok(n) = val_text.parse::<i64>() {
            return Some((Value::Integer(n), comment));
        }
    }

    parse_float_str(val_text).map(|f| (Value::Float(f), comment))
}

/// Serialize a [`Value`] into the 70-byte value field of a card.
///
/// Numbers and logicals are right-justified in the first 20 bytes (card
/// columns 11-30); strings start with a quote and are padded to at least
/// 8 characters.
pub fn format_value(value: &Value) -> [u8; 70] {
    let mut buf = [b' '; 70];

    match value {
        Value::Logical(b) => {
            buf[19] = if *b { b'T' } else { b'F' };
        }
        Value::Integer(n) => right_justify(n.to_string().as_bytes(), &mut buf[..20]),
        Value::Float(f) => right_justify(format_float(*f).as_bytes(), &mut buf[..20]),
        Value::String(s) => write_string(s, &mut buf),
    }

    buf
}

fn right_justify(src: &[u8], dest: &mut [u8]) {
    let len = src.len().min(dest.len());
    let start = dest.len() - len;
    dest[start..].copy_from_slice(&src[..len]);
}

/// Shortest scientific representation that fits in 20 characters.
fn format_float(f: f64) -> String {
    if f == 0.0 {
        return String::from("0.0");
    }
    let mut precision = 15usize;
    loop {
        let s = format!("{:.prec$E}", f, prec = precision);
        if s.len() <= 20 || precision == 0 {
            return s;
        }
        precision -= 1;
    }
}

fn write_string(s: &str, buf: &mut [u8; 70]) {
    let mut pos = 1;
    buf[0] = b'\'';

    for ch in s.bytes() {
        let needed = if ch == b'\'' { 2 } else { 1 };
        if pos + needed >= 69 {
            break;
        }
        buf[pos] = ch;
        if ch == b'\'' {
            buf[pos + 1] = b'\'';
        }
        pos += needed;
    }

    // closing quote no earlier than column 20 of the card
    pos = pos.max(9);
    buf[pos] = b'\'';
}

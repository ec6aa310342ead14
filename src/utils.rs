use std::io::{Read, Write};

use crate::error::{EdfError, Result};

/// Reads exactly `width` bytes and returns them as a whitespace-trimmed
/// string. Non-ASCII content is rejected.
pub(crate) fn read_field<R: Read>(reader: &mut R, width: usize) -> Result<String> {
    let mut buf = vec![0u8; width];
    reader.read_exact(&mut buf)?;
    if !buf.is_ascii() {
        return Err(EdfError::NonAsciiField(
            String::from_utf8_lossy(&buf).into_owned(),
        ));
    }
    Ok(String::from_utf8_lossy(&buf).trim().to_string())
}

/// Writes `text` left-justified into a field of `width` bytes, padded with
/// spaces and truncated if too long. Returns the number of bytes written.
pub(crate) fn write_padded_str<W: Write>(writer: &mut W, text: &str, width: usize) -> Result<usize> {
    let mut buf = vec![b' '; width];
    let bytes = text.as_bytes();
    let n = bytes.len().min(width);
    buf[..n].copy_from_slice(&bytes[..n]);
    writer.write_all(&buf)?;
    Ok(width)
}

pub(crate) fn write_padded_int<W: Write>(writer: &mut W, value: i64, width: usize) -> Result<usize> {
    write_padded_str(writer, &value.to_string(), width)
}

pub(crate) fn write_padded_float<W: Write>(writer: &mut W, value: f64, width: usize) -> Result<usize> {
    write_padded_str(writer, &format_float_field(value, width), width)
}

/// Shortest decimal rendering of `value` that fits in `width` bytes,
/// dropping fractional precision as needed.
///
/// When the integer part alone is wider than `width` the result still
/// overflows the field and the padded write truncates it to a different
/// number. Callers keep values inside the format's digital/physical
/// magnitudes to stay clear of this.
pub(crate) fn format_float_field(value: f64, width: usize) -> String {
    let text = format!("{}", value);
    if text.len() <= width {
        return text;
    }
    let mut precision = width.saturating_sub(1);
    loop {
        let text = format!("{:.*}", precision, value);
        if text.len() <= width || precision == 0 {
            return text;
        }
        precision -= 1;
    }
}

/// Validates and normalizes a header text field: ASCII only, trimmed,
/// truncated to the on-disk field width.
pub(crate) fn sanitize_field(text: &str, width: usize) -> Result<String> {
    if !text.is_ascii() {
        return Err(EdfError::NonAsciiField(text.to_string()));
    }
    let trimmed = text.trim();
    let end = trimmed.len().min(width);
    Ok(trimmed[..end].to_string())
}

/// Non-localized integer parse with strtoll semantics: leading whitespace
/// skipped, trailing garbage ignored, no digits yields 0.
pub(crate) fn parse_int_lossy(text: &str) -> i64 {
    let text = text.trim_start();
    let mut end = 0;
    for (i, c) in text.char_indices() {
        if i == 0 && (c == '+' || c == '-') {
            end = 1;
            continue;
        }
        if c.is_ascii_digit() {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    let head = &text[..end];
    if head.is_empty() || head == "+" || head == "-" {
        return 0;
    }
    head.parse().unwrap_or(0)
}

/// Non-localized float parse with strtod semantics: the longest prefix that
/// parses as a number wins, anything else yields 0.0.
pub(crate) fn parse_float_lossy(text: &str) -> f64 {
    let text = text.trim();
    for end in (1..=text.len()).rev() {
        if !text.is_char_boundary(end) {
            continue;
        }
        if let Ok(value) = text[..end].parse::<f64>() {
            return value;
        }
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_lossy() {
        assert_eq!(parse_int_lossy("123"), 123);
        assert_eq!(parse_int_lossy("  -456  "), -456);
        assert_eq!(parse_int_lossy("+789"), 789);
        assert_eq!(parse_int_lossy("42abc"), 42);
        assert_eq!(parse_int_lossy("abc"), 0);
        assert_eq!(parse_int_lossy(""), 0);
        assert_eq!(parse_int_lossy("-"), 0);
    }

    #[test]
    fn test_parse_float_lossy() {
        assert_eq!(parse_float_lossy("1.5"), 1.5);
        assert_eq!(parse_float_lossy("  -2.25 "), -2.25);
        assert_eq!(parse_float_lossy("3.5junk"), 3.5);
        assert_eq!(parse_float_lossy("1e3"), 1000.0);
        assert_eq!(parse_float_lossy("nope"), 0.0);
        assert_eq!(parse_float_lossy(""), 0.0);
    }

    #[test]
    fn test_format_float_field() {
        assert_eq!(format_float_field(1.0, 8), "1");
        assert_eq!(format_float_field(-1000.0, 8), "-1000");
        assert_eq!(format_float_field(0.5, 8), "0.5");
        assert!(format_float_field(123.456789012, 8).len() <= 8);
        assert!(format_float_field(-8388608.0, 8).len() <= 8);
    }

    #[test]
    fn test_format_float_field_integer_overflow_truncates() {
        // an integer part wider than the field cannot be shortened; the
        // padded write then clips it to the leading digits
        let text = format_float_field(-123456789.0, 8);
        assert_eq!(text, "-123456789");

        let mut buf = Vec::new();
        write_padded_float(&mut buf, -123456789.0, 8).unwrap();
        assert_eq!(buf, b"-1234567");
    }

    #[test]
    fn test_write_padded_str() {
        let mut buf = Vec::new();
        write_padded_str(&mut buf, "EEG", 8).unwrap();
        assert_eq!(buf, b"EEG     ");

        let mut buf = Vec::new();
        write_padded_str(&mut buf, "too long for the field", 8).unwrap();
        assert_eq!(buf, b"too long");
    }

    #[test]
    fn test_read_field_trims_and_checks_ascii() {
        let mut cursor = std::io::Cursor::new(b"EEG Fpz-Cz      ".to_vec());
        assert_eq!(read_field(&mut cursor, 16).unwrap(), "EEG Fpz-Cz");

        let mut cursor = std::io::Cursor::new(vec![0xFFu8; 8]);
        assert!(matches!(
            read_field(&mut cursor, 8),
            Err(EdfError::NonAsciiField(_))
        ));
    }
}

//! Single-line CSV field codec.
//!
//! # Responsibility
//! - Quote fields containing the separator or a double quote.
//! - Split one physical line back into its fields.
//!
//! # Invariants
//! - One record occupies exactly one physical line.
//! - Fields containing `\n` or `\r` are rejected on encode.
//! - Quoted fields double their inner quotes (RFC 4180 style).

use std::error::Error;
use std::fmt::{Display, Formatter};

const SEPARATOR: char = ',';
const QUOTE: char = '"';

/// Codec errors for a single CSV line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvCodecError {
    /// Field contains a line break, which cannot fit on one line.
    LineBreakInField,
    /// Quoted field is missing its closing quote.
    UnterminatedQuote,
    /// A bare quote appeared inside an unquoted field.
    StrayQuote { column: usize },
    /// Text follows the closing quote of a field.
    TrailingAfterQuote { column: usize },
}

impl Display for CsvCodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LineBreakInField => write!(f, "field contains a line break"),
            Self::UnterminatedQuote => write!(f, "quoted field is not terminated"),
            Self::StrayQuote { column } => write!(f, "unexpected quote at column {column}"),
            Self::TrailingAfterQuote { column } => {
                write!(f, "unexpected character after closing quote at column {column}")
            }
        }
    }
}

impl Error for CsvCodecError {}

/// Encodes one field, quoting it only when required.
pub fn encode_field(value: &str) -> Result<String, CsvCodecError> {
    if value.contains(['\n', '\r']) {
        return Err(CsvCodecError::LineBreakInField);
    }
    if !value.contains([SEPARATOR, QUOTE]) {
        return Ok(value.to_string());
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push(QUOTE);
    for ch in value.chars() {
        if ch == QUOTE {
            quoted.push(QUOTE);
        }
        quoted.push(ch);
    }
    quoted.push(QUOTE);
    Ok(quoted)
}

/// Encodes fields into one line without a trailing newline.
pub fn encode_line<S: AsRef<str>>(fields: &[S]) -> Result<String, CsvCodecError> {
    let encoded = fields
        .iter()
        .map(|field| encode_field(field.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(encoded.join(","))
}

/// Splits one line into unescaped fields.
///
/// An empty line decodes to a single empty field.
pub fn decode_line(line: &str) -> Result<Vec<String>, CsvCodecError> {
    let mut fields = Vec::new();
    let mut chars = line.chars().enumerate().peekable();

    loop {
        let mut field = String::new();

        if matches!(chars.peek(), Some((_, QUOTE))) {
            chars.next();
            loop {
                match chars.next() {
                    Some((_, QUOTE)) => {
                        if matches!(chars.peek(), Some((_, QUOTE))) {
                            chars.next();
                            field.push(QUOTE);
                        } else {
                            break;
                        }
                    }
                    Some((_, ch)) => field.push(ch),
                    None => return Err(CsvCodecError::UnterminatedQuote),
                }
            }
            match chars.next() {
                None => {
                    fields.push(field);
                    return Ok(fields);
                }
                Some((_, SEPARATOR)) => fields.push(field),
                Some((column, _)) => return Err(CsvCodecError::TrailingAfterQuote { column }),
            }
        } else {
            loop {
                match chars.next() {
                    None => {
                        fields.push(field);
                        return Ok(fields);
                    }
                    Some((_, SEPARATOR)) => {
                        fields.push(field);
                        break;
                    }
                    Some((column, QUOTE)) => return Err(CsvCodecError::StrayQuote { column }),
                    Some((_, ch)) => field.push(ch),
                }
            }
        }
    }
}

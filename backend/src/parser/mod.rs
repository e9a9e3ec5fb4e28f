//! CSV parser for the artist and artwork datasets, with encoding detection.
//!
//! The dialect is deliberately small:
//!
//! - comma delimited, first non-blank line is the header
//! - `"` toggles quoted mode, `""` inside quotes is a literal quote
//! - every field (header included) is trimmed after assembly
//! - blank lines are discarded before splitting, so a quoted field
//!   cannot span lines
//! - rows whose field count differs from the header are dropped
//!
//! Values stay strings. Nothing here is fatal: bad rows disappear and empty
//! input yields an empty [`Table`].

use std::path::Path;
use std::sync::Arc;

use crate::error::{LoadError, LoadResult};
use crate::models::{Record, Schema};

/// Field separator.
pub const DELIMITER: char = ',';

const QUOTE: char = '"';

/// Encoding for non-UTF-8 input that detection cannot name.
const FALLBACK_ENCODING: &str = "windows-1252";

/// A parsed dataset.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Columns declared by the header
    pub schema: Arc<Schema>,
    /// Rows matching the header shape, in input order
    pub records: Vec<Record>,
    /// Data rows discarded for having the wrong field count
    pub dropped_rows: usize,
}

impl Table {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Columns as seen through the data: a table without rows has none.
    pub fn effective_columns(&self) -> &[String] {
        if self.records.is_empty() {
            &[]
        } else {
            self.schema.columns()
        }
    }
}

/// Parse CSV text into a [`Table`].
///
/// # Example
/// ```
/// use artjoin::parser::parse;
///
/// let table = parse("ConstituentID,DisplayName\n1,\"Albers, Anni\"\n");
///
/// assert_eq!(table.records.len(), 1);
/// assert_eq!(table.records[0].get("DisplayName"), Some("Albers, Anni"));
/// ```
pub fn parse(text: &str) -> Table {
    let mut lines = text.split('\n').filter(|line| !line.trim().is_empty());

    let header_line = match lines.next() {
        Some(line) => line,
        None => return Table::default(),
    };

    let header = split_line(header_line);
    let width = header.len();
    let (schema, slots) = Schema::from_header(header);
    let schema = Arc::new(schema);

    let mut records = Vec::new();
    let mut dropped_rows = 0;

    for line in lines {
        let fields = split_line(line);
        if fields.len() != width {
            dropped_rows += 1;
            continue;
        }

        let mut values = vec![String::new(); schema.len()];
        for (slot, value) in slots.iter().zip(fields) {
            values[*slot] = value;
        }

        match Record::new(Arc::clone(&schema), values) {
            Ok(record) => records.push(record),
            Err(_) => dropped_rows += 1,
        }
    }

    Table {
        schema,
        records,
        dropped_rows,
    }
}

/// Parse CSV text and keep only the records.
pub fn parse_records(text: &str) -> Vec<Record> {
    parse(text).records
}

/// Split one line into trimmed fields, honoring double-quote escaping.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            QUOTE if in_quotes && chars.peek() == Some(&QUOTE) => {
                current.push(QUOTE);
                chars.next();
            }
            QUOTE => in_quotes = !in_quotes,
            DELIMITER if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }

    fields.push(current.trim().to_string());
    fields
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to text using the named encoding.
pub fn decode_content(bytes: &[u8], encoding: &str) -> LoadResult<String> {
    let text = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8_lossy(bytes).into_owned(),
        label => {
            let codec = encoding_rs::Encoding::for_label(label.as_bytes())
                .ok_or_else(|| LoadError::Encoding(format!("unsupported encoding '{}'", label)))?;
            codec.decode(bytes).0.into_owned()
        }
    };

    Ok(strip_bom(text))
}

/// Decode bytes to text.
///
/// Valid UTF-8 is taken as is. Anything else goes through encoding
/// detection, and bytes no detected encoding can decode are read as
/// Windows-1252, which maps every byte.
pub fn decode_bytes(bytes: &[u8]) -> String {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return strip_bom(text.to_string());
    }

    let encoding = match detect_encoding(bytes).as_str() {
        "utf-8" => FALLBACK_ENCODING.to_string(),
        other => other.to_string(),
    };
    decode_content(bytes, &encoding)
        .unwrap_or_else(|_| encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned())
}

/// Read and parse a CSV file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> LoadResult<Table> {
    let text = read_text(path)?;
    Ok(parse(&text))
}

/// Read a file as text with encoding detection.
pub fn read_text<P: AsRef<Path>>(path: P) -> LoadResult<String> {
    let bytes = std::fs::read(path.as_ref())?;
    Ok(decode_bytes(&bytes))
}

fn strip_bom(text: String) -> String {
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

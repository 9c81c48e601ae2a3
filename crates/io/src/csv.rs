// CSV import/export
//
// Plain comma splitting: no quoting, no escaping. A `"` is an ordinary
// character and a field containing `,` or a newline does not survive a
// round trip.

use std::io::Read;
use std::path::Path;

use gridpad_engine::collate::is_blank_char;
use gridpad_engine::Table;
use log::{debug, warn};

use crate::error::CsvError;

/// Header row plus data rows, every row already padded/truncated to the
/// header count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn into_table(self) -> Table {
        Table::from_parts(self.headers, self.rows)
    }
}

/// Whitespace trimmed from every field; U+0085 is kept, the BOM is not.
fn trim_field(field: &str) -> &str {
    field.trim_matches(is_blank_char)
}

/// A record is a blank line when it holds a single field with nothing
/// but whitespace. Any comma makes a line non-blank.
fn is_blank_line(record: &::csv::StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|f| trim_field(f).is_empty())
}

/// Parse CSV text into a header row and data rows.
///
/// Records are separated by `\n` only; a trailing `\r` is removed by
/// field trimming. Blank lines are skipped. The first remaining line is
/// the header. Short rows are padded with empty cells, extra fields are
/// dropped.
pub fn parse(text: &str) -> Result<CsvTable, CsvError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_reader(text.as_bytes());

    let mut lines = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| CsvError::Malformed(e.to_string()))?;
        if is_blank_line(&record) {
            continue;
        }
        lines.push(record);
    }

    let mut lines = lines.into_iter();
    let Some(header_record) = lines.next() else {
        return Err(CsvError::Empty);
    };

    let headers: Vec<String> = header_record
        .iter()
        .map(|h| trim_field(h).to_string())
        .collect();
    let width = headers.len();

    let rows: Vec<Vec<String>> = lines
        .map(|record| {
            let mut row = vec![String::new(); width];
            for (cell, field) in row.iter_mut().zip(record.iter()) {
                *cell = trim_field(field).to_string();
            }
            row
        })
        .collect();

    debug!("parsed CSV: {} columns x {} rows", width, rows.len());
    Ok(CsvTable { headers, rows })
}

fn push_record<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(field.as_ref());
    }
    out.push('\n');
}

/// Serialize headers and rows. Every record, the last included, ends with
/// `\n`. Values are written verbatim.
pub fn serialize<H, C>(headers: &[H], rows: &[Vec<C>]) -> String
where
    H: AsRef<str>,
    C: AsRef<str>,
{
    let mut out = String::new();
    push_record(&mut out, headers);
    for row in rows {
        push_record(&mut out, row);
    }
    out
}

/// Serialize the current contents of a table.
pub fn serialize_table(table: &Table) -> String {
    serialize(table.headers(), table.rows())
}

/// Parse `text` and load it into `table`. On failure the table is left as
/// it was and `false` is returned.
pub fn load_into(table: &mut Table, text: &str) -> bool {
    match parse(text) {
        Ok(parsed) => {
            table.replace(parsed.headers, parsed.rows);
            true
        }
        Err(e) => {
            debug!("CSV load ignored: {e}");
            false
        }
    }
}

pub fn import(path: &Path) -> Result<Table, CsvError> {
    let content = read_file_as_utf8(path)?;
    let table = parse(&content)?.into_table();
    debug!("imported {}", path.display());
    Ok(table)
}

pub fn export(table: &Table, path: &Path) -> Result<(), CsvError> {
    std::fs::write(path, serialize_table(table))?;
    debug!("exported {} rows to {}", table.row_count(), path.display());
    Ok(())
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, CsvError> {
    let mut file = std::fs::File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            warn!("{} is not valid UTF-8, decoding as Windows-1252", path.display());
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

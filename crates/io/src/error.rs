use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvError {
    /// No non-blank lines, so there is not even a header row.
    Empty,
    /// The reader could not split the input into records.
    Malformed(String),
    /// IO error (file read/write).
    Io(String),
}

impl fmt::Display for CsvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "CSV input has no header row"),
            Self::Malformed(msg) => write!(f, "malformed CSV: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for CsvError {}

impl From<std::io::Error> for CsvError {
    fn from(err: std::io::Error) -> Self {
        CsvError::Io(err.to_string())
    }
}

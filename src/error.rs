use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EdfError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("File already exists: {0}")]
    FileExists(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("Header size {0} is not a multiple of 256")]
    InvalidHeaderSize(i64),

    #[error("Header field contains non-ASCII text: {0:?}")]
    NonAsciiField(String),

    #[error("Malformed date/time field: {0:?}")]
    InvalidDateTime(String),

    #[error("Unrecognized version marker in header")]
    UnknownVersion,

    #[error("Invalid number of signals: {0}")]
    InvalidSignalCount(i64),

    #[error("Record duration must be positive, got {0}")]
    InvalidRecordDuration(f64),

    #[error("Invalid physical range: minimum {min} is not below maximum {max}")]
    InvalidPhysicalRange { min: f64, max: f64 },

    #[error("Invalid digital range [{min}, {max}] for this format")]
    InvalidDigitalRange { min: i32, max: i32 },

    #[error("Sample value {value} is outside the digital range [{min}, {max}]")]
    SampleOutOfRange { value: i32, min: i32, max: i32 },

    #[error("Signal {signal} holds {actual} records where {expected} were expected")]
    RecordsOutOfSync {
        signal: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Record index {0} is out of range")]
    InvalidRecordIndex(usize),

    #[error("Signal format does not match the file format")]
    FormatMismatch,
}

pub type Result<T> = std::result::Result<T, EdfError>;

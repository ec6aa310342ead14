//! # edfio
//!
//! A pure Rust reader and writer for EDF (European Data Format) and BDF
//! (BioSemi Data Format) biosignal files.
//!
//! A file is a fixed-width ASCII header followed by binary data records.
//! The header is a 256-byte fixed block plus one 256-byte block per signal,
//! stored column-wise (all labels, then all transducers, and so on). Data
//! records hold each signal's samples for one record duration, in
//! record-major, signal-minor order. EDF stores 16-bit little-endian
//! samples; BDF stores 24-bit samples and carries the `0xFF BIOSEMI`
//! version marker and the `24BIT` reserved literal.
//!
//! ## Quick Start
//!
//! ### Writing a file
//!
//! ```rust
//! use edfio::{EdfFile, FormatVariant, Signal, Result};
//! # use std::fs;
//!
//! fn main() -> Result<()> {
//!     let mut file = EdfFile::new("quickstart_write.edf");
//!     file.header_mut().set_patient("P001 Jane Doe")?;
//!     file.header_mut().set_recording("Startdate 03-JUL-2021 PSG")?;
//!
//!     let mut signal = Signal::new_full(
//!         FormatVariant::Edf,
//!         "EEG Fpz-Cz",
//!         "AgAgCl cup electrodes",
//!         "uV",
//!         -440.0,
//!         510.0,
//!         -2048,
//!         2047,
//!         "HP:0.1Hz LP:75Hz",
//!         256,
//!     )?;
//!
//!     // one second of a ramp, one full data record
//!     for i in 0..256 {
//!         signal.append_digital(i - 128)?;
//!     }
//!     file.add_signal(signal)?;
//!     file.replace()?;
//!
//!     # fs::remove_file("quickstart_write.edf").ok();
//!     Ok(())
//! }
//! ```
//!
//! ### Reading a file
//!
//! ```rust
//! use edfio::{EdfFile, FormatVariant, Signal, Result};
//! # use std::fs;
//!
//! fn main() -> Result<()> {
//!     # let mut writer = EdfFile::new("quickstart_read.edf");
//!     # let mut signal = Signal::new_full(
//!     #     FormatVariant::Edf, "EEG Fpz-Cz", "", "uV",
//!     #     -1000.0, 1000.0, 0, 1023, "", 4,
//!     # )?;
//!     # for v in [0, 256, 512, 1023] { signal.append_digital(v)?; }
//!     # writer.add_signal(signal)?;
//!     # writer.replace()?;
//!     let mut file = EdfFile::new("quickstart_read.edf");
//!     file.read()?;
//!
//!     println!("patient: {}", file.header().patient());
//!     println!("records: {}", file.header().num_records());
//!     for signal in file.signals() {
//!         // calibrated physical values, in append order
//!         let values = signal.values();
//!         println!("{}: {} samples", signal.label(), values.len());
//!     }
//!     # fs::remove_file("quickstart_read.edf").ok();
//!     Ok(())
//! }
//! ```
//!
//! ## Digital vs physical values
//!
//! Samples are stored as integers in the signal's digital range and mapped
//! to physical units by the linear calibration the header defines:
//!
//! ```rust
//! use edfio::{FormatVariant, Signal};
//!
//! let mut signal = Signal::new(FormatVariant::Edf);
//! signal.set_physical_range(-1000.0, 1000.0).unwrap();
//! signal.set_digital_range(0, 1023).unwrap();
//! signal.set_samples_per_record(4).unwrap();
//!
//! signal.append_digital(0).unwrap();
//! signal.append_digital(1023).unwrap();
//! assert_eq!(signal.values(), vec![-1000.0, 1000.0]);
//!
//! // out-of-range samples are rejected and nothing is stored
//! assert!(signal.append_digital(1024).is_err());
//! assert_eq!(signal.values().len(), 2);
//! ```

pub mod error;
pub mod file;
pub mod format;
pub mod header;
pub mod signal;

mod record;
mod utils;

pub use error::{EdfError, Result};
pub use file::EdfFile;
pub use format::FormatVariant;
pub use header::{header_size, Header, BASE_HEADER_SIZE, MAX_SIGNALS, SIGNAL_HEADER_SIZE};
pub use signal::Signal;

/// Library version
///
/// # Examples
///
/// ```rust
/// let version = edfio::version();
/// assert!(!version.is_empty());
/// assert!(version.contains('.'));
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

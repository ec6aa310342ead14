use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{EdfError, Result};
use crate::format::FormatVariant;
use crate::header::Header;
use crate::signal::Signal;

/// An EDF or BDF file: a path, a header and the signals it describes.
///
/// The struct is a plain in-memory model; nothing touches the filesystem
/// until [`read`](EdfFile::read), [`create`](EdfFile::create) or
/// [`replace`](EdfFile::replace) is called.
///
/// # Examples
///
/// Writing a file and reading it back:
///
/// ```rust
/// use edfio::{EdfFile, FormatVariant, Signal};
///
/// # fn main() -> edfio::Result<()> {
/// let mut file = EdfFile::new("doc_example.edf");
/// file.header_mut().set_patient("P001 Jane Doe")?;
///
/// let mut signal = Signal::new_full(
///     FormatVariant::Edf,
///     "EEG Fpz-Cz",
///     "AgAgCl cup electrodes",
///     "uV",
///     -440.0,
///     510.0,
///     -2048,
///     2047,
///     "HP:0.1Hz LP:75Hz",
///     4,
/// )?;
/// for value in [0, 5, -5, 100, 7, 7, 7, 7] {
///     signal.append_digital(value)?;
/// }
/// file.add_signal(signal)?;
/// file.replace()?;
///
/// let mut copy = EdfFile::new("doc_example.edf");
/// copy.read()?;
/// assert_eq!(copy.signals().len(), 1);
/// assert_eq!(copy.signals()[0].label(), "EEG Fpz-Cz");
/// # std::fs::remove_file("doc_example.edf").ok();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct EdfFile {
    path: PathBuf,
    header: Header,
    signals: Vec<Signal>,
}

impl EdfFile {
    /// Creates an empty in-memory EDF file bound to `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        EdfFile::with_variant(path, FormatVariant::Edf)
    }

    /// Creates an empty in-memory BDF (BioSemi, 24-bit) file bound to `path`.
    pub fn new_bdf<P: AsRef<Path>>(path: P) -> Self {
        EdfFile::with_variant(path, FormatVariant::Bdf)
    }

    pub fn with_variant<P: AsRef<Path>>(path: P, variant: FormatVariant) -> Self {
        EdfFile {
            path: path.as_ref().to_path_buf(),
            header: Header::new(variant),
            signals: Vec::new(),
        }
    }

    pub fn variant(&self) -> FormatVariant {
        self.header.variant()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Retargets the in-memory file to another path.
    pub fn set_path<P: AsRef<Path>>(&mut self, path: P) {
        self.path = path.as_ref().to_path_buf();
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn signals_mut(&mut self) -> &mut [Signal] {
        &mut self.signals
    }

    /// Adds a signal; its format must match the file's.
    pub fn add_signal(&mut self, signal: Signal) -> Result<()> {
        if signal.variant() != self.variant() {
            return Err(EdfError::FormatMismatch);
        }
        if self.signals.len() + 1 >= crate::header::MAX_SIGNALS {
            return Err(EdfError::InvalidSignalCount(self.signals.len() as i64 + 1));
        }
        self.signals.push(signal);
        Ok(())
    }

    /// Reads the file at `path`, replacing the in-memory header and
    /// signals. Data records follow in record-major, signal-minor order.
    /// On a mid-stream error the signals read so far stay populated.
    /// Returns the total bytes consumed.
    pub fn read(&mut self) -> Result<usize> {
        let file = File::open(&self.path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                EdfError::FileNotFound(self.path.display().to_string())
            } else {
                EdfError::Io(e)
            }
        })?;
        let mut reader = BufReader::new(file);

        let (header, signals, mut nread) = Header::read_from(&mut reader, self.variant())?;
        let num_records = header.num_records().max(0) as usize;
        self.header = header;
        self.signals = signals;

        for _ in 0..num_records {
            for signal in self.signals.iter_mut() {
                nread += signal.read_record_from(&mut reader)?;
            }
        }
        Ok(nread)
    }

    /// Writes the file; fails with [`EdfError::FileExists`] when `path`
    /// already exists.
    pub fn create(&mut self) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .map_err(|e| {
                if e.kind() == ErrorKind::AlreadyExists {
                    EdfError::FileExists(self.path.display().to_string())
                } else {
                    EdfError::Io(e)
                }
            })?;
        self.write_to_sink(file)
    }

    /// Writes the file, truncating `path` if it already exists.
    pub fn replace(&mut self) -> Result<()> {
        let file = File::create(&self.path)?;
        self.write_to_sink(file)
    }

    fn write_to_sink(&mut self, file: File) -> Result<()> {
        let mut writer = BufWriter::new(file);
        self.header.write_to(&self.signals, &mut writer)?;

        if let Some(first) = self.signals.first() {
            let expected = first.num_records();
            for (index, signal) in self.signals.iter().enumerate().skip(1) {
                if signal.num_records() != expected {
                    // the header has already been written at this point
                    writer.flush()?;
                    return Err(EdfError::RecordsOutOfSync {
                        signal: index,
                        expected,
                        actual: signal.num_records(),
                    });
                }
            }
            for record in 0..expected {
                for signal in &self.signals {
                    signal.write_record_to(&mut writer, record)?;
                }
            }
        }
        writer.flush()?;
        Ok(())
    }
}

use std::io::{Read, Write};

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::{EdfError, Result};
use crate::format::{FormatVariant, BDF_RESERVED};
use crate::signal::Signal;
use crate::utils::{
    parse_float_lossy, parse_int_lossy, read_field, sanitize_field, write_padded_float,
    write_padded_int, write_padded_str,
};

// Fixed block field widths, in file order.
pub(crate) const VERSION_SZ: usize = 8;
pub(crate) const PATIENT_SZ: usize = 80;
pub(crate) const RECORDING_SZ: usize = 80;
pub(crate) const DATE_SZ: usize = 8;
pub(crate) const TIME_SZ: usize = 8;
pub(crate) const NUM_BYTES_SZ: usize = 8;
pub(crate) const RESERVED_SZ: usize = 44;
pub(crate) const NUM_RECORDS_SZ: usize = 8;
pub(crate) const DURATION_SZ: usize = 8;
pub(crate) const NUM_SIGNALS_SZ: usize = 4;

// Per-signal block field widths.
pub(crate) const LABEL_SZ: usize = 16;
pub(crate) const TRANSDUCER_SZ: usize = 80;
pub(crate) const PHYSICAL_DIMENSION_SZ: usize = 8;
pub(crate) const PHYSICAL_MIN_SZ: usize = 8;
pub(crate) const PHYSICAL_MAX_SZ: usize = 8;
pub(crate) const DIGITAL_MIN_SZ: usize = 8;
pub(crate) const DIGITAL_MAX_SZ: usize = 8;
pub(crate) const PREFILTER_SZ: usize = 80;
pub(crate) const SAMPLES_PER_RECORD_SZ: usize = 8;
pub(crate) const SIGNAL_RESERVED_SZ: usize = 32;

/// Size in bytes of the fixed header block.
pub const BASE_HEADER_SIZE: usize = 256;

/// Size in bytes of the header block each signal adds.
pub const SIGNAL_HEADER_SIZE: usize = 256;

/// Total header size for a file with `num_signals` signals.
pub fn header_size(num_signals: usize) -> usize {
    BASE_HEADER_SIZE + num_signals * SIGNAL_HEADER_SIZE
}

/// Exclusive upper bound on the number of signals a header can describe;
/// a valid count stays below this (4 ASCII digits, 9999 itself rejected).
pub const MAX_SIGNALS: usize = 9999;

/// The fixed 256-byte header block of an EDF or BDF file.
///
/// Per-signal header fields live on [`Signal`]; the codec here writes them
/// column-wise after the fixed block, the way the format lays them out on
/// disk.
#[derive(Debug, Clone)]
pub struct Header {
    version: i32,
    patient: String,
    recording: String,
    start: NaiveDateTime,
    reserved: String,
    num_records: i64,
    record_duration: f64,
    variant: FormatVariant,
}

impl Header {
    /// Creates a header with the version and reserved field of `variant`
    /// and the start stamp set to the local wall clock.
    pub fn new(variant: FormatVariant) -> Self {
        Header {
            version: variant.version(),
            patient: String::new(),
            recording: String::new(),
            start: Local::now().naive_local(),
            reserved: match variant {
                FormatVariant::Edf => String::new(),
                FormatVariant::Bdf => BDF_RESERVED.to_string(),
            },
            num_records: -1,
            record_duration: 1.0,
            variant,
        }
    }

    pub fn variant(&self) -> FormatVariant {
        self.variant
    }

    /// Numeric version parsed from the header: 0 for EDF, -255 for BDF.
    pub fn version(&self) -> i32 {
        self.version
    }

    /// True when the version marks a plain EDF file.
    pub fn is_edf(&self) -> bool {
        self.version == 0
    }

    /// True when the reserved field carries an EDF+ continuity marker.
    pub fn is_edfplus(&self) -> bool {
        self.version == 0
            && (self.reserved.starts_with("EDF+C") || self.reserved.starts_with("EDF+D"))
    }

    pub fn patient(&self) -> &str {
        &self.patient
    }

    pub fn set_patient(&mut self, patient: &str) -> Result<()> {
        self.patient = sanitize_field(patient, PATIENT_SZ)?;
        Ok(())
    }

    pub fn recording(&self) -> &str {
        &self.recording
    }

    pub fn set_recording(&mut self, recording: &str) -> Result<()> {
        self.recording = sanitize_field(recording, RECORDING_SZ)?;
        Ok(())
    }

    /// Start date and time of the recording.
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn set_start(&mut self, start: NaiveDateTime) {
        self.start = start;
    }

    pub fn reserved(&self) -> &str {
        &self.reserved
    }

    pub fn set_reserved(&mut self, reserved: &str) -> Result<()> {
        self.reserved = sanitize_field(reserved, RESERVED_SZ)?;
        Ok(())
    }

    /// Number of data records, as last read from or written to disk.
    /// Recomputed from the signals on every write; -1 means unknown.
    pub fn num_records(&self) -> i64 {
        self.num_records
    }

    /// Duration of one data record in seconds.
    pub fn record_duration(&self) -> f64 {
        self.record_duration
    }

    pub fn set_record_duration(&mut self, duration: f64) -> Result<()> {
        if !(duration > 0.0) {
            return Err(EdfError::InvalidRecordDuration(duration));
        }
        self.record_duration = duration;
        Ok(())
    }

    /// Parses a complete header from `reader`: the fixed block, then the
    /// per-signal block column by column. Returns the header, the signals
    /// it describes (with empty sample storage) and the bytes consumed.
    pub(crate) fn read_from<R: Read>(
        reader: &mut R,
        variant: FormatVariant,
    ) -> Result<(Header, Vec<Signal>, usize)> {
        let mut nread = 0usize;

        let mut version_bytes = [0u8; VERSION_SZ];
        reader.read_exact(&mut version_bytes)?;
        nread += VERSION_SZ;
        let version = match variant {
            FormatVariant::Edf => {
                if !version_bytes.is_ascii() {
                    return Err(EdfError::UnknownVersion);
                }
                parse_int_lossy(&String::from_utf8_lossy(&version_bytes)) as i32
            }
            FormatVariant::Bdf => {
                if version_bytes != variant.version_bytes() {
                    return Err(EdfError::UnknownVersion);
                }
                variant.version()
            }
        };

        let patient = read_field(reader, PATIENT_SZ)?;
        nread += PATIENT_SZ;
        let recording = read_field(reader, RECORDING_SZ)?;
        nread += RECORDING_SZ;

        let mut date_bytes = [0u8; DATE_SZ];
        reader.read_exact(&mut date_bytes)?;
        nread += DATE_SZ;
        let date = parse_date_field(&date_bytes)?;

        let mut time_bytes = [0u8; TIME_SZ];
        reader.read_exact(&mut time_bytes)?;
        nread += TIME_SZ;
        let time = parse_time_field(&time_bytes)?;

        let num_bytes = parse_int_lossy(&read_field(reader, NUM_BYTES_SZ)?);
        nread += NUM_BYTES_SZ;
        if num_bytes % 256 != 0 {
            return Err(EdfError::InvalidHeaderSize(num_bytes));
        }

        let reserved = read_field(reader, RESERVED_SZ)?;
        nread += RESERVED_SZ;
        if variant == FormatVariant::Bdf && reserved != BDF_RESERVED {
            return Err(EdfError::InvalidFormat(format!(
                "reserved field {:?} is not {:?}",
                reserved, BDF_RESERVED
            )));
        }

        let num_records = parse_int_lossy(&read_field(reader, NUM_RECORDS_SZ)?);
        nread += NUM_RECORDS_SZ;
        let record_duration = parse_float_lossy(&read_field(reader, DURATION_SZ)?);
        nread += DURATION_SZ;

        let num_signals = parse_int_lossy(&read_field(reader, NUM_SIGNALS_SZ)?);
        nread += NUM_SIGNALS_SZ;
        if num_signals < 0 || num_signals as usize >= MAX_SIGNALS {
            return Err(EdfError::InvalidSignalCount(num_signals));
        }
        let num_signals = num_signals as usize;
        debug_assert_eq!(nread, BASE_HEADER_SIZE);

        let mut signals: Vec<Signal> = (0..num_signals).map(|_| Signal::new(variant)).collect();

        for signal in signals.iter_mut() {
            let label = read_field(reader, LABEL_SZ)?;
            nread += LABEL_SZ;
            signal.set_label(&label)?;
        }
        for signal in signals.iter_mut() {
            let transducer = read_field(reader, TRANSDUCER_SZ)?;
            nread += TRANSDUCER_SZ;
            signal.set_transducer(&transducer)?;
        }
        for signal in signals.iter_mut() {
            let dimension = read_field(reader, PHYSICAL_DIMENSION_SZ)?;
            nread += PHYSICAL_DIMENSION_SZ;
            signal.set_physical_dimension(&dimension)?;
        }
        for signal in signals.iter_mut() {
            let min = parse_float_lossy(&read_field(reader, PHYSICAL_MIN_SZ)?);
            nread += PHYSICAL_MIN_SZ;
            signal.set_raw_physical_min(min);
        }
        for signal in signals.iter_mut() {
            let max = parse_float_lossy(&read_field(reader, PHYSICAL_MAX_SZ)?);
            nread += PHYSICAL_MAX_SZ;
            signal.set_raw_physical_max(max);
        }
        for signal in signals.iter_mut() {
            let min = parse_int_lossy(&read_field(reader, DIGITAL_MIN_SZ)?);
            nread += DIGITAL_MIN_SZ;
            signal.set_raw_digital_min(min as i32);
        }
        for signal in signals.iter_mut() {
            let max = parse_int_lossy(&read_field(reader, DIGITAL_MAX_SZ)?);
            nread += DIGITAL_MAX_SZ;
            signal.set_raw_digital_max(max as i32);
        }
        for signal in signals.iter_mut() {
            let prefilter = read_field(reader, PREFILTER_SZ)?;
            nread += PREFILTER_SZ;
            signal.set_prefiltering(&prefilter)?;
        }
        for signal in signals.iter_mut() {
            let samples = parse_int_lossy(&read_field(reader, SAMPLES_PER_RECORD_SZ)?);
            nread += SAMPLES_PER_RECORD_SZ;
            signal.set_samples_per_record(samples.max(0) as usize)?;
        }
        for signal in signals.iter_mut() {
            let reserved = read_field(reader, SIGNAL_RESERVED_SZ)?;
            nread += SIGNAL_RESERVED_SZ;
            signal.set_reserved(&reserved)?;
        }
        debug_assert_eq!(nread, header_size(num_signals));

        let header = Header {
            version,
            patient,
            recording,
            start: NaiveDateTime::new(date, time),
            reserved,
            num_records,
            record_duration,
            variant,
        };
        Ok((header, signals, nread))
    }

    /// Writes the complete header for `signals`. Recomputes `num_records`
    /// from the first signal (-1 when there are none) before writing.
    /// Returns the bytes written, always `header_size(signals.len())`.
    pub(crate) fn write_to<W: Write>(&mut self, signals: &[Signal], writer: &mut W) -> Result<usize> {
        self.num_records = match signals.first() {
            Some(first) => first.num_records() as i64,
            None => -1,
        };

        let mut written = 0usize;
        match self.variant {
            FormatVariant::Edf => {
                written += write_padded_int(writer, self.version as i64, VERSION_SZ)?;
            }
            FormatVariant::Bdf => {
                writer.write_all(&self.variant.version_bytes())?;
                written += VERSION_SZ;
            }
        }
        written += write_padded_str(writer, &self.patient, PATIENT_SZ)?;
        written += write_padded_str(writer, &self.recording, RECORDING_SZ)?;
        written += write_padded_str(
            writer,
            &format!(
                "{:02}.{:02}.{:02}",
                self.start.day(),
                self.start.month(),
                self.start.year().rem_euclid(100)
            ),
            DATE_SZ,
        )?;
        written += write_padded_str(
            writer,
            &format!(
                "{:02}.{:02}.{:02}",
                self.start.hour(),
                self.start.minute(),
                self.start.second()
            ),
            TIME_SZ,
        )?;
        written += write_padded_int(writer, header_size(signals.len()) as i64, NUM_BYTES_SZ)?;
        match self.variant {
            FormatVariant::Edf => {
                written += write_padded_str(writer, &self.reserved, RESERVED_SZ)?;
            }
            FormatVariant::Bdf => {
                written += write_padded_str(writer, BDF_RESERVED, RESERVED_SZ)?;
            }
        }
        written += write_padded_int(writer, self.num_records, NUM_RECORDS_SZ)?;
        written += write_padded_float(writer, self.record_duration, DURATION_SZ)?;
        written += write_padded_int(writer, signals.len() as i64, NUM_SIGNALS_SZ)?;
        debug_assert_eq!(written, BASE_HEADER_SIZE);

        for signal in signals {
            written += write_padded_str(writer, signal.label(), LABEL_SZ)?;
        }
        for signal in signals {
            written += write_padded_str(writer, signal.transducer(), TRANSDUCER_SZ)?;
        }
        for signal in signals {
            written += write_padded_str(writer, signal.physical_dimension(), PHYSICAL_DIMENSION_SZ)?;
        }
        for signal in signals {
            written += write_padded_float(writer, signal.physical_min(), PHYSICAL_MIN_SZ)?;
        }
        for signal in signals {
            written += write_padded_float(writer, signal.physical_max(), PHYSICAL_MAX_SZ)?;
        }
        for signal in signals {
            written += write_padded_int(writer, signal.digital_min() as i64, DIGITAL_MIN_SZ)?;
        }
        for signal in signals {
            written += write_padded_int(writer, signal.digital_max() as i64, DIGITAL_MAX_SZ)?;
        }
        for signal in signals {
            written += write_padded_str(writer, signal.prefiltering(), PREFILTER_SZ)?;
        }
        for signal in signals {
            written +=
                write_padded_int(writer, signal.samples_per_record() as i64, SAMPLES_PER_RECORD_SZ)?;
        }
        for signal in signals {
            written += write_padded_str(writer, signal.reserved(), SIGNAL_RESERVED_SZ)?;
        }
        debug_assert_eq!(written, header_size(signals.len()));
        Ok(written)
    }
}

impl Default for Header {
    fn default() -> Self {
        Header::new(FormatVariant::Edf)
    }
}

fn field_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Checks the `dd.mm.yy` / `hh.mm.ss` shape: digits in the pair positions,
/// dots between them.
fn validate_dotted_pairs(bytes: &[u8; 8]) -> Result<()> {
    let ok = bytes[0].is_ascii_digit()
        && bytes[1].is_ascii_digit()
        && bytes[2] == b'.'
        && bytes[3].is_ascii_digit()
        && bytes[4].is_ascii_digit()
        && bytes[5] == b'.'
        && bytes[6].is_ascii_digit()
        && bytes[7].is_ascii_digit();
    if ok {
        Ok(())
    } else {
        Err(EdfError::InvalidDateTime(field_text(bytes)))
    }
}

fn digit_pair(bytes: &[u8; 8], at: usize) -> u32 {
    (bytes[at] - b'0') as u32 * 10 + (bytes[at + 1] - b'0') as u32
}

fn parse_date_field(bytes: &[u8; 8]) -> Result<NaiveDate> {
    validate_dotted_pairs(bytes)?;
    let day = digit_pair(bytes, 0);
    let month = digit_pair(bytes, 3);
    let year = digit_pair(bytes, 6) as i32;
    // two-digit year pivot used since the format's 1990s origin
    let year = if year < 85 { 2000 + year } else { 1900 + year };
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| EdfError::InvalidDateTime(field_text(bytes)))
}

fn parse_time_field(bytes: &[u8; 8]) -> Result<NaiveTime> {
    validate_dotted_pairs(bytes)?;
    let hour = digit_pair(bytes, 0);
    let minute = digit_pair(bytes, 3);
    let second = digit_pair(bytes, 6);
    NaiveTime::from_hms_opt(hour, minute, second)
        .ok_or_else(|| EdfError::InvalidDateTime(field_text(bytes)))
}

use std::io::{Read, Write};

use crate::error::{EdfError, Result};
use crate::format::FormatVariant;
use crate::header::{
    LABEL_SZ, PHYSICAL_DIMENSION_SZ, PREFILTER_SZ, SIGNAL_RESERVED_SZ, TRANSDUCER_SZ,
};
use crate::record::Record;
use crate::utils::sanitize_field;

/// One channel of a recording: the per-signal header fields plus the sample
/// records appended to it so far.
///
/// Samples are appended as digital values and validated against the digital
/// range; [`values`](Signal::values) converts them back to physical units
/// with the linear calibration defined by the physical and digital ranges.
///
/// # Examples
///
/// ```rust
/// use edfio::{FormatVariant, Signal};
///
/// let mut signal = Signal::new(FormatVariant::Edf);
/// signal.set_label("EEG Fpz-Cz").unwrap();
/// signal.set_physical_range(-1000.0, 1000.0).unwrap();
/// signal.set_digital_range(0, 1023).unwrap();
/// signal.set_samples_per_record(4).unwrap();
///
/// signal.append_digital(0).unwrap();
/// signal.append_digital(1023).unwrap();
/// let values = signal.values();
/// assert_eq!(values, vec![-1000.0, 1000.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Signal {
    label: String,
    transducer: String,
    physical_dimension: String,
    physical_min: f64,
    physical_max: f64,
    digital_min: i32,
    digital_max: i32,
    prefiltering: String,
    reserved: String,
    samples_per_record: usize,
    variant: FormatVariant,
    records: Vec<Record>,
}

impl Signal {
    /// Creates an empty signal with zeroed calibration fields.
    pub fn new(variant: FormatVariant) -> Self {
        Signal {
            label: String::new(),
            transducer: String::new(),
            physical_dimension: String::new(),
            physical_min: 0.0,
            physical_max: 0.0,
            digital_min: 0,
            digital_max: 0,
            prefiltering: String::new(),
            reserved: String::new(),
            samples_per_record: 0,
            variant,
            records: Vec::new(),
        }
    }

    /// Creates a signal with all header fields set and validated.
    #[allow(clippy::too_many_arguments)]
    pub fn new_full(
        variant: FormatVariant,
        label: &str,
        transducer: &str,
        physical_dimension: &str,
        physical_min: f64,
        physical_max: f64,
        digital_min: i32,
        digital_max: i32,
        prefiltering: &str,
        samples_per_record: usize,
    ) -> Result<Self> {
        let mut signal = Signal::new(variant);
        signal.set_label(label)?;
        signal.set_transducer(transducer)?;
        signal.set_physical_dimension(physical_dimension)?;
        signal.set_physical_range(physical_min, physical_max)?;
        signal.set_digital_range(digital_min, digital_max)?;
        signal.set_prefiltering(prefiltering)?;
        signal.set_samples_per_record(samples_per_record)?;
        Ok(signal)
    }

    pub fn variant(&self) -> FormatVariant {
        self.variant
    }

    /// Width in bytes of one stored sample.
    pub fn sample_size(&self) -> usize {
        self.variant.sample_size()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: &str) -> Result<()> {
        self.label = sanitize_field(label, LABEL_SZ)?;
        Ok(())
    }

    pub fn transducer(&self) -> &str {
        &self.transducer
    }

    pub fn set_transducer(&mut self, transducer: &str) -> Result<()> {
        self.transducer = sanitize_field(transducer, TRANSDUCER_SZ)?;
        Ok(())
    }

    pub fn physical_dimension(&self) -> &str {
        &self.physical_dimension
    }

    pub fn set_physical_dimension(&mut self, dimension: &str) -> Result<()> {
        self.physical_dimension = sanitize_field(dimension, PHYSICAL_DIMENSION_SZ)?;
        Ok(())
    }

    pub fn physical_min(&self) -> f64 {
        self.physical_min
    }

    pub fn physical_max(&self) -> f64 {
        self.physical_max
    }

    /// Sets the physical calibration range; `min` must be below `max`.
    pub fn set_physical_range(&mut self, min: f64, max: f64) -> Result<()> {
        if !(min < max) {
            return Err(EdfError::InvalidPhysicalRange { min, max });
        }
        self.physical_min = min;
        self.physical_max = max;
        Ok(())
    }

    pub fn digital_min(&self) -> i32 {
        self.digital_min
    }

    pub fn digital_max(&self) -> i32 {
        self.digital_max
    }

    /// Sets the digital calibration range; `min` must be below `max` and
    /// both must be representable in this format's sample width.
    pub fn set_digital_range(&mut self, min: i32, max: i32) -> Result<()> {
        if min >= max || min < self.variant.digital_min() || max > self.variant.digital_max() {
            return Err(EdfError::InvalidDigitalRange { min, max });
        }
        self.digital_min = min;
        self.digital_max = max;
        Ok(())
    }

    pub fn prefiltering(&self) -> &str {
        &self.prefiltering
    }

    pub fn set_prefiltering(&mut self, prefiltering: &str) -> Result<()> {
        self.prefiltering = sanitize_field(prefiltering, PREFILTER_SZ)?;
        Ok(())
    }

    pub fn reserved(&self) -> &str {
        &self.reserved
    }

    pub fn set_reserved(&mut self, reserved: &str) -> Result<()> {
        self.reserved = sanitize_field(reserved, SIGNAL_RESERVED_SZ)?;
        Ok(())
    }

    pub fn samples_per_record(&self) -> usize {
        self.samples_per_record
    }

    /// Number of samples each data record holds for this signal. Fails
    /// once records exist: their byte size is pinned to the capacity they
    /// were created with and a changed header field would corrupt the
    /// written records.
    pub fn set_samples_per_record(&mut self, samples_per_record: usize) -> Result<()> {
        if !self.records.is_empty() {
            return Err(EdfError::InvalidFormat(
                "cannot change samples per record once records exist".to_string(),
            ));
        }
        self.samples_per_record = samples_per_record;
        Ok(())
    }

    /// Number of data records appended so far, a partially filled tail
    /// record included.
    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    /// Total number of samples stored across all records.
    pub fn num_samples(&self) -> usize {
        match self.records.last() {
            Some(last) => (self.records.len() - 1) * self.samples_per_record + last.len(),
            None => 0,
        }
    }

    /// Appends one digital sample, allocating a new record when the tail is
    /// full. The value must lie within the digital range.
    pub fn append_digital(&mut self, value: i32) -> Result<()> {
        if value < self.digital_min || value > self.digital_max {
            return Err(EdfError::SampleOutOfRange {
                value,
                min: self.digital_min,
                max: self.digital_max,
            });
        }
        if self.samples_per_record == 0 {
            return Err(EdfError::InvalidFormat(
                "cannot append samples to a signal with 0 samples per record".to_string(),
            ));
        }
        let needs_record = self.records.last().map_or(true, Record::is_full);
        if needs_record {
            self.records.push(Record::new(self.samples_per_record, self.variant));
        }
        if let Some(record) = self.records.last_mut() {
            record.push(value);
        }
        Ok(())
    }

    /// Calibrated physical values for every stored sample, in append order.
    pub fn values(&self) -> Vec<f64> {
        let span = (self.digital_max - self.digital_min) as f64;
        let slope = if span != 0.0 {
            (self.physical_max - self.physical_min) / span
        } else {
            0.0
        };
        let mut out = Vec::with_capacity(self.num_samples());
        for record in &self.records {
            for i in 0..record.len() {
                let digital = record.get(i);
                out.push(self.physical_min + slope * (digital - self.digital_min) as f64);
            }
        }
        out
    }

    /// Raw digital values for every stored sample, in append order.
    pub fn digital_values(&self) -> Vec<i32> {
        let mut out = Vec::with_capacity(self.num_samples());
        for record in &self.records {
            for i in 0..record.len() {
                out.push(record.get(i));
            }
        }
        out
    }

    pub(crate) fn set_raw_physical_min(&mut self, min: f64) {
        self.physical_min = min;
    }

    pub(crate) fn set_raw_physical_max(&mut self, max: f64) {
        self.physical_max = max;
    }

    pub(crate) fn set_raw_digital_min(&mut self, min: i32) {
        self.digital_min = min;
    }

    pub(crate) fn set_raw_digital_max(&mut self, max: i32) {
        self.digital_max = max;
    }

    /// Writes the on-disk bytes of record `index`; a partially filled tail
    /// record pads with encoded zeros.
    pub(crate) fn write_record_to<W: Write>(&self, writer: &mut W, index: usize) -> Result<usize> {
        let record = self
            .records
            .get(index)
            .ok_or(EdfError::InvalidRecordIndex(index))?;
        writer.write_all(record.as_bytes())?;
        Ok(record.as_bytes().len())
    }

    /// Reads one full record from `reader` and appends it. A short read is
    /// an I/O error and leaves the signal unchanged.
    pub(crate) fn read_record_from<R: Read>(&mut self, reader: &mut R) -> Result<usize> {
        let mut record = Record::new(self.samples_per_record, self.variant);
        reader.read_exact(record.bytes_mut())?;
        record.mark_filled();
        let nread = record.as_bytes().len();
        self.records.push(record);
        Ok(nread)
    }
}

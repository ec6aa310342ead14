use crate::format::FormatVariant;

/// One data record's worth of samples for a single channel, kept in the
/// on-disk encoding. Capacity is fixed at construction.
#[derive(Debug, Clone)]
pub(crate) struct Record {
    bytes: Vec<u8>,
    capacity: usize,
    stored: usize,
    variant: FormatVariant,
}

impl Record {
    pub(crate) fn new(samples_per_record: usize, variant: FormatVariant) -> Self {
        Record {
            bytes: vec![0u8; samples_per_record * variant.sample_size()],
            capacity: samples_per_record,
            stored: 0,
            variant,
        }
    }

    /// Number of samples stored so far.
    pub(crate) fn len(&self) -> usize {
        self.stored
    }

    pub(crate) fn is_full(&self) -> bool {
        self.stored == self.capacity
    }

    pub(crate) fn push(&mut self, value: i32) {
        debug_assert!(!self.is_full());
        let width = self.variant.sample_size();
        let at = self.stored * width;
        self.variant.encode_sample(value, &mut self.bytes[at..at + width]);
        self.stored += 1;
    }

    pub(crate) fn get(&self, index: usize) -> i32 {
        debug_assert!(index < self.stored);
        let width = self.variant.sample_size();
        self.variant.decode_sample(&self.bytes[index * width..(index + 1) * width])
    }

    /// Full record as stored on disk; unfilled tail samples stay zero.
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Marks every slot as stored, for records filled wholesale from disk.
    pub(crate) fn mark_filled(&mut self) {
        self.stored = self.capacity;
    }
}

use crate::error::{EdfError, Result};

/// Version marker of an EDF header, "0" left-justified in 8 bytes.
pub(crate) const EDF_VERSION_BYTES: [u8; 8] = *b"0       ";

/// Version marker of a BDF header: a 0xFF byte followed by "BIOSEMI".
pub(crate) const BDF_VERSION_BYTES: [u8; 8] = [0xFF, b'B', b'I', b'O', b'S', b'E', b'M', b'I'];

/// Literal that a BDF header carries in its reserved field.
pub(crate) const BDF_RESERVED: &str = "24BIT";

/// The two supported container flavors. The variant decides the version
/// marker, the width of a stored sample and the representable digital range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatVariant {
    /// European Data Format: 16-bit little-endian samples.
    Edf,
    /// BioSemi Data Format: 24-bit little-endian samples.
    Bdf,
}

impl FormatVariant {
    /// Width of one stored sample in bytes.
    pub const fn sample_size(self) -> usize {
        match self {
            FormatVariant::Edf => 2,
            FormatVariant::Bdf => 3,
        }
    }

    /// Numeric header version: 0 for EDF, -255 for BDF.
    pub const fn version(self) -> i32 {
        match self {
            FormatVariant::Edf => 0,
            FormatVariant::Bdf => -255,
        }
    }

    /// Smallest digital value a sample can hold.
    pub const fn digital_min(self) -> i32 {
        match self {
            FormatVariant::Edf => i16::MIN as i32,
            FormatVariant::Bdf => -8_388_608,
        }
    }

    /// Largest digital value a sample can hold.
    pub const fn digital_max(self) -> i32 {
        match self {
            FormatVariant::Edf => i16::MAX as i32,
            FormatVariant::Bdf => 8_388_607,
        }
    }

    pub(crate) const fn version_bytes(self) -> [u8; 8] {
        match self {
            FormatVariant::Edf => EDF_VERSION_BYTES,
            FormatVariant::Bdf => BDF_VERSION_BYTES,
        }
    }

    /// Recognizes the 8-byte version marker at the start of a header,
    /// useful to sniff which flavor a file is before reading it.
    pub fn parse_version(bytes: &[u8; 8]) -> Result<FormatVariant> {
        if *bytes == BDF_VERSION_BYTES {
            return Ok(FormatVariant::Bdf);
        }
        if bytes.is_ascii() {
            let text = String::from_utf8_lossy(bytes);
            if text.trim() == "0" {
                return Ok(FormatVariant::Edf);
            }
        }
        Err(EdfError::UnknownVersion)
    }

    /// Encodes `value` little-endian into `out`, which must be exactly
    /// `sample_size()` bytes long.
    pub(crate) fn encode_sample(self, value: i32, out: &mut [u8]) {
        match self {
            FormatVariant::Edf => {
                out.copy_from_slice(&(value as i16).to_le_bytes());
            }
            FormatVariant::Bdf => {
                out[0] = value as u8;
                out[1] = (value >> 8) as u8;
                // bit 7 of the top byte carries the sign taken from bit 31
                out[2] = ((value >> 16) as u8 & 0x7F) | ((value as u32 >> 24) as u8 & 0x80);
            }
        }
    }

    /// Decodes one sample from `bytes`, which must be exactly
    /// `sample_size()` bytes long.
    pub(crate) fn decode_sample(self, bytes: &[u8]) -> i32 {
        match self {
            FormatVariant::Edf => i16::from_le_bytes([bytes[0], bytes[1]]) as i32,
            FormatVariant::Bdf => {
                let mut value = bytes[0] as i32
                    | (bytes[1] as i32) << 8
                    | ((bytes[2] & 0x7F) as i32) << 16;
                if bytes[2] & 0x80 != 0 {
                    value |= !0x007F_FFFF;
                }
                value
            }
        }
    }
}

// Transducer artifact format: header layout, parsing, validation.

use crate::FstError;

/// Header magic constants (little-endian).
const COOKIE1: u32 = 0x5347_4C54;
const COOKIE2: u32 = 0x0046_5354;

/// Current artifact format version.
pub const FORMAT_VERSION: u16 = 1;

/// Size of the artifact header in bytes.
pub const HEADER_SIZE: usize = 16;

/// Alignment of the state and transition tables.
pub const TABLE_ALIGN: usize = 16;

/// Parsed artifact header.
///
/// The header occupies the first 16 bytes of the artifact:
/// - bytes 0..4: cookie1 (magic number)
/// - bytes 4..8: cookie2 (magic number)
/// - bytes 8..10: format version
/// - bytes 10..16: reserved (written as zero)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactHeader {
    pub version: u16,
}

/// Parses and validates the 16-byte artifact header.
pub fn parse_header(data: &[u8]) -> Result<ArtifactHeader, FstError> {
    if data.len() < HEADER_SIZE {
        return Err(FstError::TooShort {
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }

    let cookie1 = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let cookie2 = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    if cookie1 != COOKIE1 || cookie2 != COOKIE2 {
        return Err(FstError::InvalidMagic);
    }

    let version = u16::from_le_bytes([data[8], data[9]]);
    if version != FORMAT_VERSION {
        return Err(FstError::UnsupportedVersion {
            expected: FORMAT_VERSION,
            found: version,
        });
    }

    Ok(ArtifactHeader { version })
}

/// Append a header for the current format version to `buf`.
pub fn write_header(buf: &mut Vec<u8>) {
    buf.extend_from_slice(&COOKIE1.to_le_bytes());
    buf.extend_from_slice(&COOKIE2.to_le_bytes());
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&[0u8; 6]);
}

/// Round `offset` up to the next table boundary.
#[inline]
pub fn align_offset(offset: usize) -> usize {
    let partial = offset % TABLE_ALIGN;
    if partial > 0 {
        offset + (TABLE_ALIGN - partial)
    } else {
        offset
    }
}

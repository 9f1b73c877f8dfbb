//! SMF container framing: header chunk plus track chunk.

use byteorder::{BigEndian, WriteBytesExt};
use std::io::{self, Write};

use crate::TICKS_PER_QUARTER;

/// Header chunk magic.
pub const MTHD_MAGIC: &[u8; 4] = b"MThd";

/// Track chunk magic.
pub const MTRK_MAGIC: &[u8; 4] = b"MTrk";

/// Header chunk body length (always 6).
pub const MTHD_LENGTH: u32 = 6;

/// SMF format 0: one track holding the whole performance.
pub const SMF_FORMAT: u16 = 0;

/// Total size of the header chunk in bytes.
pub const HEADER_CHUNK_SIZE: usize = 14;

/// A complete format 0 MIDI file: one header, one track.
#[derive(Debug, Clone)]
pub struct MidiFile {
    /// Ticks per quarter note.
    pub division: u16,
    /// Raw track event stream, end-of-track event included.
    pub track: Vec<u8>,
}

impl MidiFile {
    /// Wrap a rendered track event stream at the fixed 96 TPQ division.
    pub fn new(track: Vec<u8>) -> Self {
        Self {
            division: TICKS_PER_QUARTER as u16,
            track,
        }
    }

    /// Write the complete file to a writer.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(MTHD_MAGIC)?;
        writer.write_u32::<BigEndian>(MTHD_LENGTH)?;
        writer.write_u16::<BigEndian>(SMF_FORMAT)?;
        writer.write_u16::<BigEndian>(1)?; // track count
        writer.write_u16::<BigEndian>(self.division)?;

        writer.write_all(MTRK_MAGIC)?;
        writer.write_u32::<BigEndian>(self.track.len() as u32)?;
        writer.write_all(&self.track)?;

        Ok(())
    }

    /// Write the file to a byte vector.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(HEADER_CHUNK_SIZE + 8 + self.track.len());
        self.write(&mut buffer)?;
        Ok(buffer)
    }

    /// Compute the BLAKE3 hash of the file bytes.
    pub fn compute_hash(&self) -> io::Result<String> {
        let bytes = self.to_bytes()?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }
}

/// Validate SMF framing: magics, header fields, and track length.
pub fn validate_midi_bytes(data: &[u8]) -> Result<(), MidiValidationError> {
    if data.len() < HEADER_CHUNK_SIZE + 8 {
        return Err(MidiValidationError::FileTooSmall(data.len()));
    }

    if &data[0..4] != MTHD_MAGIC {
        return Err(MidiValidationError::InvalidHeaderMagic);
    }
    let header_len = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
    if header_len != MTHD_LENGTH {
        return Err(MidiValidationError::InvalidHeaderLength(header_len));
    }
    let format = u16::from_be_bytes([data[8], data[9]]);
    if format != SMF_FORMAT {
        return Err(MidiValidationError::UnsupportedFormat(format));
    }
    let tracks = u16::from_be_bytes([data[10], data[11]]);
    if tracks != 1 {
        return Err(MidiValidationError::WrongTrackCount(tracks));
    }

    if &data[14..18] != MTRK_MAGIC {
        return Err(MidiValidationError::InvalidTrackMagic);
    }
    let track_len = u32::from_be_bytes([data[18], data[19], data[20], data[21]]) as usize;
    let actual = data.len() - (HEADER_CHUNK_SIZE + 8);
    if track_len != actual {
        return Err(MidiValidationError::TrackLengthMismatch {
            declared: track_len,
            actual,
        });
    }

    Ok(())
}

/// SMF framing validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MidiValidationError {
    /// File is too small to hold both chunk headers.
    FileTooSmall(usize),
    /// Missing `MThd` magic.
    InvalidHeaderMagic,
    /// Header chunk length is not 6.
    InvalidHeaderLength(u32),
    /// Not a format 0 file.
    UnsupportedFormat(u16),
    /// Track count is not 1.
    WrongTrackCount(u16),
    /// Missing `MTrk` magic.
    InvalidTrackMagic,
    /// Declared track length disagrees with the bytes present.
    TrackLengthMismatch { declared: usize, actual: usize },
}

impl std::fmt::Display for MidiValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MidiValidationError::FileTooSmall(size) => {
                write!(f, "File too small: {} bytes", size)
            }
            MidiValidationError::InvalidHeaderMagic => {
                write!(f, "Invalid MThd magic")
            }
            MidiValidationError::InvalidHeaderLength(len) => {
                write!(f, "Invalid header length: {}", len)
            }
            MidiValidationError::UnsupportedFormat(format) => {
                write!(f, "Unsupported SMF format: {}", format)
            }
            MidiValidationError::WrongTrackCount(count) => {
                write!(f, "Expected 1 track, found {}", count)
            }
            MidiValidationError::InvalidTrackMagic => {
                write!(f, "Invalid MTrk magic")
            }
            MidiValidationError::TrackLengthMismatch { declared, actual } => {
                write!(
                    f,
                    "Track length mismatch: declared {} bytes, found {}",
                    declared, actual
                )
            }
        }
    }
}

impl std::error::Error for MidiValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::track::END_OF_TRACK;

    #[test]
    fn test_header_layout() {
        let file = MidiFile::new(END_OF_TRACK.to_vec());
        let bytes = file.to_bytes().unwrap();

        assert_eq!(&bytes[0..4], b"MThd");
        assert_eq!(&bytes[4..8], &[0, 0, 0, 6]);
        assert_eq!(&bytes[8..10], &[0, 0]); // format 0
        assert_eq!(&bytes[10..12], &[0, 1]); // one track
        assert_eq!(&bytes[12..14], &[0, 96]); // division
        assert_eq!(&bytes[14..18], b"MTrk");
    }

    #[test]
    fn test_track_length_field_matches_stream() {
        let track = vec![0u8; 1234];
        let bytes = MidiFile::new(track).to_bytes().unwrap();
        let declared = u32::from_be_bytes([bytes[18], bytes[19], bytes[20], bytes[21]]);
        assert_eq!(declared as usize, bytes.len() - 22);
    }

    #[test]
    fn test_empty_track_is_end_of_track_only() {
        let bytes = MidiFile::new(END_OF_TRACK.to_vec()).to_bytes().unwrap();
        assert_eq!(bytes.len(), 14 + 8 + 4);
        let declared = u32::from_be_bytes([bytes[18], bytes[19], bytes[20], bytes[21]]);
        assert_eq!(declared, 4);
        assert_eq!(&bytes[22..], &END_OF_TRACK);
    }

    #[test]
    fn test_validate_rejects_bad_magic() {
        let mut bytes = MidiFile::new(END_OF_TRACK.to_vec()).to_bytes().unwrap();
        bytes[0] = b'X';
        assert_eq!(
            validate_midi_bytes(&bytes),
            Err(MidiValidationError::InvalidHeaderMagic)
        );
    }

    #[test]
    fn test_validate_rejects_truncated_track() {
        let bytes = MidiFile::new(END_OF_TRACK.to_vec()).to_bytes().unwrap();
        assert!(matches!(
            validate_midi_bytes(&bytes[..bytes.len() - 1]),
            Err(MidiValidationError::TrackLengthMismatch { .. })
        ));
    }

    #[test]
    fn test_hash_determinism() {
        let a = MidiFile::new(vec![1, 2, 3]).compute_hash().unwrap();
        let b = MidiFile::new(vec![1, 2, 3]).compute_hash().unwrap();
        let c = MidiFile::new(vec![1, 2, 4]).compute_hash().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}

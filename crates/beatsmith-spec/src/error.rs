//! Error types for request validation.

use thiserror::Error;

/// A malformed generation request field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// Bar count outside 1-32.
    #[error("length_bars must be 1-32, got {0}")]
    LengthBarsOutOfRange(u8),

    /// Tempo outside 40-300 BPM.
    #[error("tempo must be 40-300, got {0}")]
    TempoOutOfRange(u16),

    /// Genre is empty.
    #[error("genre must not be empty")]
    EmptyGenre,

    /// Genre exceeds the 50 character limit.
    #[error("genre must be at most 50 characters, got {0}")]
    GenreTooLong(usize),

    /// Unrecognized feel string.
    #[error("unknown feel: {0} (expected half_time, normal_time, or double_time)")]
    UnknownFeel(String),

    /// Unrecognized song part string.
    #[error("unknown song part: {0} (expected intro, verse, chorus, bridge, outro, or fill)")]
    UnknownSongPart(String),

    /// Unrecognized time signature string.
    #[error("unknown time signature: {0} (expected 4/4, 3/4, 6/8, 12/8, 5/4, or 7/8)")]
    UnknownTimeSignature(String),
}

//! Generation request parameters.

use serde::{Deserialize, Serialize};

use crate::error::ParamError;

/// Minimum number of bars in a request.
pub const MIN_LENGTH_BARS: u8 = 1;

/// Maximum number of bars in a request.
pub const MAX_LENGTH_BARS: u8 = 32;

/// Minimum tempo in BPM. Tempo is informational only; it is never encoded.
pub const MIN_TEMPO: u16 = 40;

/// Maximum tempo in BPM.
pub const MAX_TEMPO: u16 = 300;

/// Maximum genre name length in characters.
pub const MAX_GENRE_LEN: usize = 50;

/// Rhythmic feel of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feel {
    /// Backbeat lands half as often as written.
    HalfTime,
    /// Straight reading of the pattern.
    NormalTime,
    /// Backbeat lands twice as often as written.
    DoubleTime,
}

impl Feel {
    /// Returns the feel as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Feel::HalfTime => "half_time",
            Feel::NormalTime => "normal_time",
            Feel::DoubleTime => "double_time",
        }
    }

    /// All valid feels, in declaration order.
    pub fn all() -> &'static [Feel] {
        &[Feel::HalfTime, Feel::NormalTime, Feel::DoubleTime]
    }
}

impl std::str::FromStr for Feel {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "half_time" => Ok(Feel::HalfTime),
            "normal_time" => Ok(Feel::NormalTime),
            "double_time" => Ok(Feel::DoubleTime),
            _ => Err(ParamError::UnknownFeel(s.to_string())),
        }
    }
}

impl std::fmt::Display for Feel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Section of a song the pattern is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SongPart {
    Intro,
    Verse,
    Chorus,
    Bridge,
    Outro,
    Fill,
}

impl SongPart {
    /// Returns the song part as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SongPart::Intro => "intro",
            SongPart::Verse => "verse",
            SongPart::Chorus => "chorus",
            SongPart::Bridge => "bridge",
            SongPart::Outro => "outro",
            SongPart::Fill => "fill",
        }
    }

    /// All valid song parts, in declaration order.
    pub fn all() -> &'static [SongPart] {
        &[
            SongPart::Intro,
            SongPart::Verse,
            SongPart::Chorus,
            SongPart::Bridge,
            SongPart::Outro,
            SongPart::Fill,
        ]
    }
}

impl std::str::FromStr for SongPart {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intro" => Ok(SongPart::Intro),
            "verse" => Ok(SongPart::Verse),
            "chorus" => Ok(SongPart::Chorus),
            "bridge" => Ok(SongPart::Bridge),
            "outro" => Ok(SongPart::Outro),
            "fill" => Ok(SongPart::Fill),
            _ => Err(ParamError::UnknownSongPart(s.to_string())),
        }
    }
}

impl std::fmt::Display for SongPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported time signatures.
///
/// The time signature selects the pattern template; it is not written into
/// the MIDI file (format 0 output carries no time-signature meta event).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeSignature {
    /// Common time.
    #[serde(rename = "4/4")]
    FourFour,
    /// Waltz time.
    #[serde(rename = "3/4")]
    ThreeFour,
    /// Compound duple meter.
    #[serde(rename = "6/8")]
    SixEight,
    /// Compound quadruple meter.
    #[serde(rename = "12/8")]
    TwelveEight,
    /// Take Five style.
    #[serde(rename = "5/4")]
    FiveFour,
    /// Complex meter.
    #[serde(rename = "7/8")]
    SevenEight,
}

impl TimeSignature {
    /// Returns the time signature as a string like `"4/4"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSignature::FourFour => "4/4",
            TimeSignature::ThreeFour => "3/4",
            TimeSignature::SixEight => "6/8",
            TimeSignature::TwelveEight => "12/8",
            TimeSignature::FiveFour => "5/4",
            TimeSignature::SevenEight => "7/8",
        }
    }

    /// Beats per bar.
    pub fn numerator(&self) -> u8 {
        match self {
            TimeSignature::FourFour => 4,
            TimeSignature::ThreeFour => 3,
            TimeSignature::SixEight => 6,
            TimeSignature::TwelveEight => 12,
            TimeSignature::FiveFour => 5,
            TimeSignature::SevenEight => 7,
        }
    }

    /// Beat unit (the note value that gets one beat).
    pub fn denominator(&self) -> u8 {
        match self {
            TimeSignature::FourFour
            | TimeSignature::ThreeFour
            | TimeSignature::FiveFour => 4,
            TimeSignature::SixEight
            | TimeSignature::TwelveEight
            | TimeSignature::SevenEight => 8,
        }
    }

    /// All valid time signatures, in declaration order.
    pub fn all() -> &'static [TimeSignature] {
        &[
            TimeSignature::FourFour,
            TimeSignature::ThreeFour,
            TimeSignature::SixEight,
            TimeSignature::TwelveEight,
            TimeSignature::FiveFour,
            TimeSignature::SevenEight,
        ]
    }
}

impl std::str::FromStr for TimeSignature {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "4/4" => Ok(TimeSignature::FourFour),
            "3/4" => Ok(TimeSignature::ThreeFour),
            "6/8" => Ok(TimeSignature::SixEight),
            "12/8" => Ok(TimeSignature::TwelveEight),
            "5/4" => Ok(TimeSignature::FiveFour),
            "7/8" => Ok(TimeSignature::SevenEight),
            _ => Err(ParamError::UnknownTimeSignature(s.to_string())),
        }
    }
}

impl std::fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A drum pattern generation request.
///
/// Every field has a validated default, so an empty request deserializes to a
/// usable one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateParams {
    /// Genre key for template lookup (free-form, max 50 characters).
    #[serde(default = "default_genre")]
    pub genre: String,
    /// Number of bars to tile the beat unit across (1-32).
    #[serde(default = "default_length_bars")]
    pub length_bars: u8,
    /// Rhythmic feel.
    #[serde(default = "default_feel")]
    pub feel: Feel,
    /// Tempo in BPM (40-300). Informational only; never encoded.
    #[serde(default = "default_tempo")]
    pub tempo: u16,
    /// Song section.
    #[serde(default = "default_song_part")]
    pub song_part: SongPart,
    /// Time signature for template lookup.
    #[serde(default = "default_time_signature")]
    pub time_signature: TimeSignature,
    /// Free-form extra parameters, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Value>,
}

fn default_genre() -> String {
    "rock".to_string()
}

fn default_length_bars() -> u8 {
    8
}

fn default_feel() -> Feel {
    Feel::NormalTime
}

fn default_tempo() -> u16 {
    120
}

fn default_song_part() -> SongPart {
    SongPart::Verse
}

fn default_time_signature() -> TimeSignature {
    TimeSignature::FourFour
}

impl Default for GenerateParams {
    fn default() -> Self {
        Self {
            genre: default_genre(),
            length_bars: default_length_bars(),
            feel: default_feel(),
            tempo: default_tempo(),
            song_part: default_song_part(),
            time_signature: default_time_signature(),
            extra: None,
        }
    }
}

/// Build the output filename stem for a request.
///
/// The `.mid` extension is appended by callers that write files. The
/// timestamp is caller-supplied (`YYYYMMDDHHMMSS`) so naming stays
/// deterministic in tests.
pub fn output_filename(params: &GenerateParams, timestamp: &str) -> String {
    format!(
        "drum_pattern_{}_{}_{}_{}bpm_{}bars_{}",
        params.genre,
        params.song_part.as_str(),
        params.feel.as_str(),
        params.tempo,
        params.length_bars,
        timestamp
    )
}

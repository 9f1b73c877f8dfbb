//! Beatsmith Request Spec Library
//!
//! This crate provides the parameter types, validation, and output naming for
//! drum pattern generation requests. A request describes *what* to generate
//! (genre, bar count, feel, tempo, song part, time signature); the
//! `beatsmith-backend-midi` crate turns a validated request into bytes.
//!
//! # Example
//!
//! ```
//! use beatsmith_spec::{GenerateParams, Feel, SongPart, TimeSignature};
//! use beatsmith_spec::validation::validate_params;
//!
//! let params = GenerateParams {
//!     genre: "funk".to_string(),
//!     length_bars: 4,
//!     feel: Feel::NormalTime,
//!     tempo: 104,
//!     song_part: SongPart::Verse,
//!     time_signature: TimeSignature::FourFour,
//!     extra: None,
//! };
//!
//! assert!(validate_params(&params).is_ok());
//! assert_eq!(
//!     beatsmith_spec::output_filename(&params, "20260825120000"),
//!     "drum_pattern_funk_verse_normal_time_104bpm_4bars_20260825120000"
//! );
//! ```

pub mod error;
pub mod params;
pub mod validation;

pub use error::ParamError;
pub use params::{
    output_filename, Feel, GenerateParams, SongPart, TimeSignature, MAX_LENGTH_BARS, MAX_TEMPO,
    MIN_LENGTH_BARS, MIN_TEMPO,
};
pub use validation::validate_params;

/// Crate version for backend identification.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

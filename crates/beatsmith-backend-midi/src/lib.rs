//! Beatsmith MIDI Backend - Deterministic Drum Pattern Generation
//!
//! This crate compiles loop-based percussion pattern descriptions into
//! byte-exact Standard MIDI Files (format 0, single track, 96 ticks per
//! quarter note) on MIDI channel 0.
//!
//! Generation runs in two one-way stages:
//!
//! - **Pattern compiler** ([`compile`]): looks a beat unit up in a
//!   [`library::PatternLibrary`] by `(genre, time signature, feel, song part)`,
//!   falls back to the stock rock/4/4 key on a miss, and tiles the unit's
//!   hit groups across the requested bar count.
//! - **MIDI encoder** ([`midi`]): renders the compiled hit-group sequence as a
//!   note-on/note-off event stream with humanized timing and velocity, wrapped
//!   in `MThd`/`MTrk` framing.
//!
//! # Determinism
//!
//! Humanization draws from a PCG32 generator seeded from an explicit `u32`
//! seed, so the same request and seed always produce byte-identical output.
//! [`generate::generate`] picks a fresh process-random seed per call;
//! [`generate::generate_with_seed`] pins it.
//!
//! # Example
//!
//! ```
//! use beatsmith_backend_midi::generate::generate_with_seed;
//! use beatsmith_backend_midi::library::BuiltinLibrary;
//! use beatsmith_spec::GenerateParams;
//!
//! let library = BuiltinLibrary::new();
//! let result = generate_with_seed(&library, &GenerateParams::default(), 42).unwrap();
//! assert_eq!(&result.data[..4], b"MThd");
//! ```

pub mod compile;
pub mod generate;
pub mod humanize;
pub mod library;
pub mod midi;

// Re-export main types
pub use compile::{compile, Compiled, CompileError, CompileWarning, CompiledPattern};
pub use generate::{generate, generate_with_seed, random_params, GenerateError, GenerateResult};
pub use library::{BeatUnit, BuiltinLibrary, HitGroup, Instrument, PatternKey, PatternLibrary};

/// Ticks per quarter note. Fixed for all Beatsmith output.
pub const TICKS_PER_QUARTER: u32 = 96;

/// Crate version for backend identification.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend identifier for report files.
pub const BACKEND_ID: &str = "beatsmith-backend-midi";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_backend_id() {
        assert_eq!(BACKEND_ID, "beatsmith-backend-midi");
    }
}

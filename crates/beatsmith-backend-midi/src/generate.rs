//! Main entry point for drum pattern generation.

use beatsmith_spec::{validate_params, Feel, GenerateParams, ParamError, SongPart, TimeSignature};
use rand::Rng;
use thiserror::Error;

use crate::compile::{compile, CompileError, CompileWarning};
use crate::humanize::Humanizer;
use crate::library::PatternLibrary;
use crate::midi::{render_track, MidiFile, NoteMap};

/// Error type for generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Malformed request field.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(#[from] ParamError),

    /// Pattern compilation failed (no template data).
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// IO error during writing.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result of a generation run.
#[derive(Debug)]
pub struct GenerateResult {
    /// Complete MIDI file bytes, ready for storage or streaming.
    pub data: Vec<u8>,
    /// BLAKE3 hash of the bytes.
    pub hash: String,
    /// Name of the beat unit the pattern was compiled from.
    pub unit_name: String,
    /// Seed the humanizer ran with.
    pub seed: u32,
    /// Recoverable anomalies observed while compiling.
    pub warnings: Vec<CompileWarning>,
}

/// Generate a drum pattern MIDI file with an explicit humanization seed.
///
/// Validates the request, compiles the pattern, builds the note map once,
/// and renders the byte stream. The same library contents, request, and
/// seed always produce byte-identical output.
pub fn generate_with_seed(
    library: &dyn PatternLibrary,
    params: &GenerateParams,
    seed: u32,
) -> Result<GenerateResult, GenerateError> {
    validate_params(params)?;

    let compiled = compile(library, params)?;
    let notes = NoteMap::from_library(library, &compiled.pattern);
    let mut humanizer = Humanizer::from_seed(seed);
    let track = render_track(&compiled.pattern, &notes, &mut humanizer);

    let file = MidiFile::new(track);
    let data = file.to_bytes()?;
    let hash = blake3::hash(&data).to_hex().to_string();

    Ok(GenerateResult {
        data,
        hash,
        unit_name: compiled.pattern.unit_name,
        seed,
        warnings: compiled.warnings,
    })
}

/// Generate with a fresh process-random seed.
pub fn generate(
    library: &dyn PatternLibrary,
    params: &GenerateParams,
) -> Result<GenerateResult, GenerateError> {
    generate_with_seed(library, params, rand::thread_rng().gen())
}

/// Resolve a "surprise me" request: pick each parameter uniformly from the
/// distinct values present in the library, falling back to fixed defaults
/// when the library is empty. Bars land in [4, 16] and tempo in [80, 160].
pub fn random_params<R: Rng>(library: &dyn PatternLibrary, rng: &mut R) -> GenerateParams {
    let genres = library.distinct_genres();
    let feels = library.distinct_feels();
    let song_parts = library.distinct_song_parts();
    let time_signatures = library.distinct_time_signatures();

    let pick_genre = if genres.is_empty() {
        "rock".to_string()
    } else {
        genres[rng.gen_range(0..genres.len())].clone()
    };
    let pick_feel = if feels.is_empty() {
        Feel::NormalTime
    } else {
        feels[rng.gen_range(0..feels.len())]
    };
    let pick_part = if song_parts.is_empty() {
        SongPart::Verse
    } else {
        song_parts[rng.gen_range(0..song_parts.len())]
    };
    let pick_sig = if time_signatures.is_empty() {
        TimeSignature::FourFour
    } else {
        time_signatures[rng.gen_range(0..time_signatures.len())]
    };

    GenerateParams {
        genre: pick_genre,
        length_bars: rng.gen_range(4..=16),
        feel: pick_feel,
        tempo: rng.gen_range(80..=160),
        song_part: pick_part,
        time_signature: pick_sig,
        extra: None,
    }
}

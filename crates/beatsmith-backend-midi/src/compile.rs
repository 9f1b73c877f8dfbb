//! Pattern compiler: beat unit lookup, fallback, and tiling.

use beatsmith_spec::GenerateParams;
use serde::Serialize;
use thiserror::Error;

use crate::library::{HitGroup, PatternKey, PatternLibrary};

/// Error type for pattern compilation.
#[derive(Debug, Error)]
pub enum CompileError {
    /// No template for the requested key and no fallback template either.
    /// This is a data/configuration error; it aborts the whole request.
    #[error("no drum pattern template found for {requested} (fallback {fallback} also missing)")]
    MissingPatternData {
        requested: PatternKey,
        fallback: PatternKey,
    },
}

/// A recoverable per-hit anomaly observed during compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompileWarning {
    /// A hit referenced an instrument with no note mapping; the hit was
    /// dropped from its group.
    UnknownInstrument { instrument: String, position: u32 },
}

impl std::fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileWarning::UnknownInstrument {
                instrument,
                position,
            } => write!(
                f,
                "unknown instrument {instrument} at tick {position}, hit dropped"
            ),
        }
    }
}

/// The beat unit tiled across the requested bar count.
///
/// Tick positions are relative within each repetition; the encoder never
/// threads a global tick counter through repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    /// Name of the source template.
    pub unit_name: String,
    /// Number of repetitions of the unit.
    pub bars: u8,
    /// Hit groups per repetition after dropping unresolvable hits.
    pub groups_per_bar: usize,
    /// The full tiled hit-group sequence, in encounter order.
    pub groups: Vec<HitGroup>,
}

impl CompiledPattern {
    /// True if the pattern renders no note events.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// A compiled pattern plus the warnings raised while compiling it.
#[derive(Debug)]
pub struct Compiled {
    pub pattern: CompiledPattern,
    pub warnings: Vec<CompileWarning>,
}

/// Compile a request into a tiled hit-group sequence.
///
/// Looks the beat unit up by `(genre, time signature, feel, song part)`,
/// retrying with [`PatternKey::fallback`] on a miss. A double miss fails with
/// [`CompileError::MissingPatternData`]. Hits whose instrument has no note
/// mapping are dropped with a warning; groups left empty by that are removed.
///
/// A unit with zero hit groups and `length_bars == 0` both yield an empty
/// pattern, which the encoder renders as a valid note-free file.
pub fn compile(
    library: &dyn PatternLibrary,
    params: &GenerateParams,
) -> Result<Compiled, CompileError> {
    let requested = PatternKey::new(
        &params.genre,
        params.time_signature,
        params.feel,
        params.song_part,
    );

    let unit = match library.find(&requested) {
        Some(unit) => unit,
        None => {
            let fallback = PatternKey::fallback();
            match library.find(&fallback) {
                Some(unit) => unit,
                None => return Err(CompileError::MissingPatternData { requested, fallback }),
            }
        }
    };

    let mut warnings = Vec::new();
    let mut unit_groups: Vec<HitGroup> = Vec::with_capacity(unit.hits.len());
    for group in &unit.hits {
        let mut instruments = Vec::with_capacity(group.instruments.len());
        for name in &group.instruments {
            if library.note_number_for(name).is_some() {
                instruments.push(name.clone());
            } else {
                warnings.push(CompileWarning::UnknownInstrument {
                    instrument: name.clone(),
                    position: group.position,
                });
            }
        }
        if !instruments.is_empty() {
            unit_groups.push(HitGroup {
                position: group.position,
                instruments,
            });
        }
    }

    // Tile the already-grouped unit; positions reset on every repeat.
    let mut groups = Vec::with_capacity(unit_groups.len() * params.length_bars as usize);
    for _ in 0..params.length_bars {
        groups.extend(unit_groups.iter().cloned());
    }

    Ok(Compiled {
        pattern: CompiledPattern {
            unit_name: unit.name.clone(),
            bars: params.length_bars,
            groups_per_bar: unit_groups.len(),
            groups,
        },
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{BeatUnit, BuiltinLibrary, Instrument};
    use beatsmith_spec::{Feel, SongPart, TimeSignature};
    use pretty_assertions::assert_eq;

    fn rock_params(bars: u8) -> GenerateParams {
        GenerateParams {
            genre: "rock".to_string(),
            length_bars: bars,
            feel: Feel::NormalTime,
            song_part: SongPart::Verse,
            time_signature: TimeSignature::FourFour,
            ..Default::default()
        }
    }

    #[test]
    fn test_compile_basic_rock_beat() {
        let library = BuiltinLibrary::new();
        let compiled = compile(&library, &rock_params(4)).unwrap();

        assert_eq!(compiled.pattern.unit_name, "Basic Rock Beat");
        assert_eq!(compiled.pattern.groups_per_bar, 8);
        assert_eq!(compiled.pattern.groups.len(), 32);
        assert!(compiled.warnings.is_empty());
    }

    #[test]
    fn test_tiling_repeats_groups_in_order() {
        let library = BuiltinLibrary::new();
        let compiled = compile(&library, &rock_params(3)).unwrap();

        let per_bar = compiled.pattern.groups_per_bar;
        for bar in 1..3 {
            assert_eq!(
                compiled.pattern.groups[..per_bar],
                compiled.pattern.groups[bar * per_bar..(bar + 1) * per_bar],
            );
        }
    }

    #[test]
    fn test_miss_falls_back_to_rock_verse() {
        let library = BuiltinLibrary::new();
        let params = GenerateParams {
            genre: "polka".to_string(),
            time_signature: TimeSignature::SevenEight,
            feel: Feel::DoubleTime,
            song_part: SongPart::Outro,
            ..Default::default()
        };
        let compiled = compile(&library, &params).unwrap();
        assert_eq!(compiled.pattern.unit_name, "Basic Rock Beat");
    }

    #[test]
    fn test_double_miss_is_fatal() {
        let library = BuiltinLibrary::empty();
        let err = compile(&library, &rock_params(4)).unwrap_err();
        match err {
            CompileError::MissingPatternData { requested, .. } => {
                assert_eq!(requested.genre, "rock");
            }
        }
    }

    #[test]
    fn test_unknown_instrument_dropped_with_warning() {
        let mut library = BuiltinLibrary::empty();
        library.add_instrument(Instrument::new("bass_drum", 36, 110));
        library.add_unit(
            PatternKey::fallback(),
            BeatUnit::from_hits(
                "Partial",
                4,
                &[("bass_drum", &[0, 96]), ("theremin", &[0, 192])],
            ),
        );

        let compiled = compile(&library, &rock_params(1)).unwrap();
        // Tick 0 keeps bass_drum; the theremin-only group at 192 disappears.
        assert_eq!(compiled.pattern.groups.len(), 2);
        assert_eq!(compiled.pattern.groups[0].instruments, vec!["bass_drum"]);
        assert_eq!(
            compiled.warnings,
            vec![
                CompileWarning::UnknownInstrument {
                    instrument: "theremin".to_string(),
                    position: 0,
                },
                CompileWarning::UnknownInstrument {
                    instrument: "theremin".to_string(),
                    position: 192,
                },
            ]
        );
    }

    #[test]
    fn test_empty_unit_yields_empty_pattern() {
        let mut library = BuiltinLibrary::empty();
        library.add_unit(PatternKey::fallback(), BeatUnit::from_hits("Empty", 4, &[]));

        let compiled = compile(&library, &rock_params(8)).unwrap();
        assert!(compiled.pattern.is_empty());
        assert_eq!(compiled.pattern.groups_per_bar, 0);
    }

    #[test]
    fn test_zero_bars_yields_empty_pattern() {
        // Validation rejects this upstream, but compilation must not panic.
        let library = BuiltinLibrary::new();
        let compiled = compile(&library, &rock_params(0)).unwrap();
        assert!(compiled.pattern.is_empty());
        assert_eq!(compiled.pattern.groups_per_bar, 8);
    }
}

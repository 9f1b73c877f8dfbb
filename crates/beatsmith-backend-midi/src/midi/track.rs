//! Track event stream rendering.

use std::collections::HashMap;

use crate::compile::CompiledPattern;
use crate::humanize::Humanizer;
use crate::library::PatternLibrary;

use super::vlq::write_var_len;

/// Note-on status byte, channel 0.
pub const NOTE_ON: u8 = 0x90;

/// Note-off status byte, channel 0.
pub const NOTE_OFF: u8 = 0x80;

/// Fixed release velocity for note-offs.
pub const RELEASE_VELOCITY: u8 = 0x4E;

/// Ticks a note sustains before its note-off.
pub const SUSTAIN_TICKS: u32 = 12;

/// Note used when an instrument name has no mapping (bass drum).
pub const FALLBACK_NOTE: u8 = 36;

/// Base velocity used when an instrument name has no mapping.
pub const FALLBACK_BASE_VELOCITY: u8 = 100;

/// End-of-track meta event, delta included.
pub const END_OF_TRACK: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

/// Resolved note number and base velocity for one instrument name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedNote {
    pub note: u8,
    pub base_velocity: u8,
}

/// Explicit instrument-to-note mapping, built once per encode call.
///
/// Replaces the cross-call memoization cache the lookup would otherwise
/// grow; the encoder holds no state between requests.
#[derive(Debug, Clone, Default)]
pub struct NoteMap {
    map: HashMap<String, MappedNote>,
}

impl NoteMap {
    /// Resolve every instrument name appearing in `pattern` against the
    /// library. Names without a mapping are left to [`NoteMap::resolve`]'s
    /// fallback.
    pub fn from_library(library: &dyn PatternLibrary, pattern: &CompiledPattern) -> Self {
        let mut map = HashMap::new();
        for group in &pattern.groups {
            for name in &group.instruments {
                if map.contains_key(name) {
                    continue;
                }
                if let Some(note) = library.note_number_for(name) {
                    map.insert(
                        name.clone(),
                        MappedNote {
                            note,
                            base_velocity: library
                                .base_velocity_for(name)
                                .unwrap_or(FALLBACK_BASE_VELOCITY),
                        },
                    );
                }
            }
        }
        Self { map }
    }

    /// Mapping for a name, falling back to the bass drum for unknowns.
    pub fn resolve(&self, name: &str) -> MappedNote {
        self.map.get(name).copied().unwrap_or(MappedNote {
            note: FALLBACK_NOTE,
            base_velocity: FALLBACK_BASE_VELOCITY,
        })
    }
}

/// Render the track event stream for a compiled pattern.
///
/// Per hit group, in encounter order: a humanized note-on per instrument
/// (group-defined instrument order, so a fixed seed reproduces the bytes),
/// a fixed 12-tick delta, a note-off per instrument with independent
/// humanization, then the humanized inter-group gap. The end-of-track meta
/// event closes the stream; an empty pattern yields just that event.
pub fn render_track(
    pattern: &CompiledPattern,
    notes: &NoteMap,
    humanizer: &mut Humanizer,
) -> Vec<u8> {
    let mut track = Vec::new();

    for group in &pattern.groups {
        for name in &group.instruments {
            let mapped = notes.resolve(name);
            write_var_len(&mut track, humanizer.note_on_delay());
            track.push(NOTE_ON);
            track.push(mapped.note);
            track.push(humanizer.velocity(mapped.base_velocity));
        }

        write_var_len(&mut track, SUSTAIN_TICKS);
        for name in &group.instruments {
            let mapped = notes.resolve(name);
            write_var_len(&mut track, humanizer.note_off_delay());
            track.push(NOTE_OFF);
            track.push(mapped.note);
            track.push(RELEASE_VELOCITY);
        }

        write_var_len(&mut track, humanizer.group_gap());
    }

    track.extend_from_slice(&END_OF_TRACK);
    track
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use crate::library::BuiltinLibrary;
    use crate::midi::vlq::read_var_len;
    use beatsmith_spec::GenerateParams;

    /// One rendered hit group, decoded back out of the byte stream.
    struct DecodedGroup {
        ons: Vec<(u32, u8, u8)>,
        offs: Vec<(u32, u8, u8)>,
        gap: u32,
    }

    /// Walk the emission grammar: groups of note-ons, a sustain delta,
    /// note-offs, and a trailing gap, closed by end-of-track.
    fn decode_track(mut data: &[u8]) -> Vec<DecodedGroup> {
        let mut groups = Vec::new();
        loop {
            if data.starts_with(&END_OF_TRACK) {
                assert_eq!(data.len(), END_OF_TRACK.len(), "bytes after end of track");
                return groups;
            }

            let mut ons = Vec::new();
            loop {
                let (delta, used) = read_var_len(data).unwrap();
                if data[used] != NOTE_ON {
                    // Sustain delta: note-offs follow.
                    assert_eq!(delta, SUSTAIN_TICKS);
                    data = &data[used..];
                    break;
                }
                ons.push((delta, data[used + 1], data[used + 2]));
                data = &data[used + 3..];
            }

            let mut offs = Vec::new();
            for _ in 0..ons.len() {
                let (delta, used) = read_var_len(data).unwrap();
                assert_eq!(data[used], NOTE_OFF);
                offs.push((delta, data[used + 1], data[used + 2]));
                data = &data[used + 3..];
            }

            let (gap, used) = read_var_len(data).unwrap();
            data = &data[used..];
            groups.push(DecodedGroup { ons, offs, gap });
        }
    }

    fn rock_track(bars: u8, seed: u32) -> Vec<u8> {
        let library = BuiltinLibrary::new();
        let params = GenerateParams {
            length_bars: bars,
            ..Default::default()
        };
        let compiled = compile(&library, &params).unwrap();
        let notes = NoteMap::from_library(&library, &compiled.pattern);
        render_track(&compiled.pattern, &notes, &mut Humanizer::from_seed(seed))
    }

    #[test]
    fn test_empty_pattern_renders_end_of_track_only() {
        let pattern = CompiledPattern {
            unit_name: "Empty".to_string(),
            bars: 4,
            groups_per_bar: 0,
            groups: Vec::new(),
        };
        let track = render_track(&pattern, &NoteMap::default(), &mut Humanizer::from_seed(0));
        assert_eq!(track, END_OF_TRACK);
    }

    #[test]
    fn test_every_note_on_has_matching_note_off() {
        let groups = decode_track(&rock_track(4, 42));
        assert_eq!(groups.len(), 32);
        // 12 hits per bar over 4 bars
        assert_eq!(groups.iter().map(|g| g.ons.len()).sum::<usize>(), 48);
        for group in &groups {
            let on_notes: Vec<u8> = group.ons.iter().map(|&(_, n, _)| n).collect();
            let off_notes: Vec<u8> = group.offs.iter().map(|&(_, n, _)| n).collect();
            assert_eq!(on_notes, off_notes);
        }
    }

    #[test]
    fn test_deltas_and_velocities_within_bounds() {
        for seed in [0u32, 1, 7, 1234, u32::MAX] {
            for group in decode_track(&rock_track(2, seed)) {
                for &(delta, _, velocity) in &group.ons {
                    assert!(delta <= 2);
                    assert!((60..=127).contains(&velocity));
                }
                for &(delta, _, velocity) in &group.offs {
                    assert!(delta <= 1);
                    assert_eq!(velocity, RELEASE_VELOCITY);
                }
                assert!((34..=38).contains(&group.gap));
            }
        }
    }

    #[test]
    fn test_group_count_invariant_across_bars() {
        for bars in [1u8, 2, 4, 8] {
            let groups = decode_track(&rock_track(bars, 5));
            assert_eq!(groups.len(), bars as usize * 8);
        }
    }

    #[test]
    fn test_repetitions_have_identical_note_structure() {
        let groups = decode_track(&rock_track(4, 11));
        let notes_of = |g: &DecodedGroup| g.ons.iter().map(|&(_, n, _)| n).collect::<Vec<_>>();
        for bar in 1..4 {
            for i in 0..8 {
                assert_eq!(notes_of(&groups[i]), notes_of(&groups[bar * 8 + i]));
            }
        }
    }

    #[test]
    fn test_same_seed_is_byte_identical() {
        assert_eq!(rock_track(4, 77), rock_track(4, 77));
    }

    #[test]
    fn test_unknown_instrument_falls_back_to_bass_drum() {
        let pattern = CompiledPattern {
            unit_name: "Mystery".to_string(),
            bars: 1,
            groups_per_bar: 1,
            groups: vec![crate::library::HitGroup {
                position: 0,
                instruments: vec!["theremin".to_string()],
            }],
        };
        let track = render_track(&pattern, &NoteMap::default(), &mut Humanizer::from_seed(1));
        let groups = decode_track(&track);
        assert_eq!(groups[0].ons[0].1, FALLBACK_NOTE);
    }

    #[test]
    fn test_basic_rock_beat_notes() {
        let groups = decode_track(&rock_track(1, 9));
        // Positions 0 and 192: bass drum + closed hat; 96 and 288: snare +
        // closed hat; eighth-note positions in between: closed hat alone.
        let expected: Vec<Vec<u8>> = vec![
            vec![36, 42],
            vec![42],
            vec![38, 42],
            vec![42],
            vec![36, 42],
            vec![42],
            vec![38, 42],
            vec![42],
        ];
        let actual: Vec<Vec<u8>> = groups
            .iter()
            .map(|g| g.ons.iter().map(|&(_, n, _)| n).collect())
            .collect();
        assert_eq!(actual, expected);
    }
}

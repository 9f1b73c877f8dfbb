//! Pattern and instrument reference data.
//!
//! A [`PatternLibrary`] is the compiler's only external collaborator: it maps
//! a [`PatternKey`] to a stored [`BeatUnit`] and resolves instrument names to
//! MIDI note numbers and base velocities. [`BuiltinLibrary`] ships the stock
//! template set so the backend works without any storage layer behind it.

use std::collections::HashMap;

use beatsmith_spec::{Feel, SongPart, TimeSignature};

use crate::TICKS_PER_QUARTER;

/// A percussion instrument: stable name key, MIDI note, intrinsic dynamics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    /// Stable lookup key, e.g. `"snare"`.
    pub name: String,
    /// MIDI note number used for both note-on and note-off (0-127).
    pub note: u8,
    /// Base velocity before humanization.
    pub base_velocity: u8,
}

impl Instrument {
    /// Create an instrument.
    pub fn new(name: &str, note: u8, base_velocity: u8) -> Self {
        Self {
            name: name.to_string(),
            note,
            base_velocity,
        }
    }
}

/// Instruments sounding simultaneously at one tick position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitGroup {
    /// Tick position within the beat unit cycle.
    pub position: u32,
    /// Instrument names, in stable definition order.
    pub instruments: Vec<String>,
}

/// One loop cycle of a percussion pattern, the unit of tiling.
///
/// Hit groups are stored pre-grouped by exact tick position and ordered by
/// ascending position; grouping is never re-derived from tick arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeatUnit {
    /// Human-readable template name, e.g. `"Basic Rock Beat"`.
    pub name: String,
    /// Cycle length in beats. A property of the stored unit, not derived
    /// from hit positions.
    pub length_beats: u8,
    /// Hit groups ordered by ascending position.
    pub hits: Vec<HitGroup>,
}

impl BeatUnit {
    /// Build a beat unit from per-instrument position lists.
    ///
    /// Hits sharing the same exact tick position are merged into one group;
    /// within a group, instruments keep the order they are listed in.
    pub fn from_hits(name: &str, length_beats: u8, hits: &[(&str, &[u32])]) -> Self {
        let mut by_position: Vec<(u32, Vec<String>)> = Vec::new();
        for (instrument, positions) in hits {
            for &position in *positions {
                match by_position.binary_search_by_key(&position, |(p, _)| *p) {
                    Ok(idx) => by_position[idx].1.push(instrument.to_string()),
                    Err(idx) => by_position.insert(idx, (position, vec![instrument.to_string()])),
                }
            }
        }

        Self {
            name: name.to_string(),
            length_beats,
            hits: by_position
                .into_iter()
                .map(|(position, instruments)| HitGroup {
                    position,
                    instruments,
                })
                .collect(),
        }
    }

    /// Cycle length in ticks.
    pub fn cycle_ticks(&self) -> u32 {
        self.length_beats as u32 * TICKS_PER_QUARTER
    }
}

/// Template lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatternKey {
    pub genre: String,
    pub time_signature: TimeSignature,
    pub feel: Feel,
    pub song_part: SongPart,
}

impl PatternKey {
    /// Create a lookup key.
    pub fn new(
        genre: &str,
        time_signature: TimeSignature,
        feel: Feel,
        song_part: SongPart,
    ) -> Self {
        Self {
            genre: genre.to_string(),
            time_signature,
            feel,
            song_part,
        }
    }

    /// The fixed fallback key used when no template matches a request.
    pub fn fallback() -> Self {
        Self::new(
            "rock",
            TimeSignature::FourFour,
            Feel::NormalTime,
            SongPart::Verse,
        )
    }
}

impl std::fmt::Display for PatternKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.genre, self.time_signature, self.feel, self.song_part
        )
    }
}

/// Source of beat units and instrument mappings.
///
/// Lookups are treated as blocking synchronous reads; implementations backed
/// by real storage should resolve everything before returning.
pub trait PatternLibrary {
    /// Exact-key template lookup.
    fn find(&self, key: &PatternKey) -> Option<&BeatUnit>;

    /// MIDI note number for an instrument name.
    fn note_number_for(&self, instrument: &str) -> Option<u8>;

    /// Base velocity for an instrument name.
    fn base_velocity_for(&self, instrument: &str) -> Option<u8>;

    /// Distinct genres present, sorted.
    fn distinct_genres(&self) -> Vec<String>;

    /// Distinct feels present, sorted by definition order.
    fn distinct_feels(&self) -> Vec<Feel>;

    /// Distinct song parts present, sorted by definition order.
    fn distinct_song_parts(&self) -> Vec<SongPart>;

    /// Distinct time signatures present, sorted by definition order.
    fn distinct_time_signatures(&self) -> Vec<TimeSignature>;
}

/// In-memory library seeded with the stock template set.
#[derive(Debug, Clone)]
pub struct BuiltinLibrary {
    instruments: HashMap<String, Instrument>,
    units: HashMap<PatternKey, BeatUnit>,
}

impl BuiltinLibrary {
    /// Build the stock library: 15 instruments, 12 templates across rock,
    /// jazz, funk, hip-hop, and latin.
    pub fn new() -> Self {
        let mut library = Self {
            instruments: HashMap::new(),
            units: HashMap::new(),
        };
        library.seed_instruments();
        library.seed_rock();
        library.seed_jazz();
        library.seed_funk();
        library.seed_hip_hop();
        library.seed_latin();
        library
    }

    /// An empty library, for tests and external-store setups.
    pub fn empty() -> Self {
        Self {
            instruments: HashMap::new(),
            units: HashMap::new(),
        }
    }

    /// Add or replace an instrument.
    pub fn add_instrument(&mut self, instrument: Instrument) {
        self.instruments.insert(instrument.name.clone(), instrument);
    }

    /// Add or replace a beat unit under a key.
    pub fn add_unit(&mut self, key: PatternKey, unit: BeatUnit) {
        self.units.insert(key, unit);
    }

    /// Iterate all stored (key, unit) pairs, sorted by key for stable output.
    pub fn units(&self) -> Vec<(&PatternKey, &BeatUnit)> {
        let mut units: Vec<_> = self.units.iter().collect();
        units.sort_by_key(|(k, _)| {
            (
                k.genre.clone(),
                k.time_signature.as_str(),
                k.feel.as_str(),
                k.song_part.as_str(),
            )
        });
        units
    }

    fn seed_instruments(&mut self) {
        let data: &[(&str, u8, u8)] = &[
            ("bass_drum", 36, 110),
            ("snare", 38, 100),
            ("closed_hh", 42, 85),
            ("open_hh", 46, 90),
            ("crash", 49, 115),
            ("ride", 51, 95),
            ("tom1", 48, 100),
            ("tom2", 45, 100),
            ("tom3", 43, 100),
            ("rimshot", 37, 95),
            ("clap", 39, 100),
            ("cowbell", 56, 90),
            ("tambourine", 54, 85),
            ("conga_high", 62, 95),
            ("conga_low", 64, 95),
        ];
        for &(name, note, base_velocity) in data {
            self.add_instrument(Instrument::new(name, note, base_velocity));
        }
    }

    fn seed(
        &mut self,
        name: &str,
        genre: &str,
        time_signature: TimeSignature,
        feel: Feel,
        song_part: SongPart,
        length_beats: u8,
        hits: &[(&str, &[u32])],
    ) {
        self.add_unit(
            PatternKey::new(genre, time_signature, feel, song_part),
            BeatUnit::from_hits(name, length_beats, hits),
        );
    }

    fn seed_rock(&mut self) {
        self.seed(
            "Basic Rock Beat",
            "rock",
            TimeSignature::FourFour,
            Feel::NormalTime,
            SongPart::Verse,
            4,
            &[
                ("bass_drum", &[0, 192]),
                ("snare", &[96, 288]),
                ("closed_hh", &[0, 48, 96, 144, 192, 240, 288, 336]),
            ],
        );
        self.seed(
            "Rock Chorus",
            "rock",
            TimeSignature::FourFour,
            Feel::NormalTime,
            SongPart::Chorus,
            4,
            &[
                ("bass_drum", &[0, 96, 192, 288]),
                ("snare", &[96, 288]),
                ("crash", &[0]),
                ("closed_hh", &[48, 144, 240, 336]),
            ],
        );
        self.seed(
            "Half-time Rock",
            "rock",
            TimeSignature::FourFour,
            Feel::HalfTime,
            SongPart::Verse,
            4,
            &[
                ("bass_drum", &[0, 144]),
                ("snare", &[192]),
                ("closed_hh", &[0, 96, 192, 288]),
            ],
        );
    }

    fn seed_jazz(&mut self) {
        self.seed(
            "Jazz Swing Ride",
            "jazz",
            TimeSignature::FourFour,
            Feel::NormalTime,
            SongPart::Verse,
            4,
            &[
                ("ride", &[0, 48, 96, 144, 192, 240, 288, 336]),
                ("closed_hh", &[96, 288]),
                ("bass_drum", &[0, 192]),
            ],
        );
        self.seed(
            "Jazz Waltz",
            "jazz",
            TimeSignature::ThreeFour,
            Feel::NormalTime,
            SongPart::Verse,
            3,
            &[
                ("ride", &[0, 96, 192]),
                ("bass_drum", &[0]),
                ("closed_hh", &[96, 192]),
            ],
        );
        self.seed(
            "Jazz Ballad",
            "jazz",
            TimeSignature::FourFour,
            Feel::HalfTime,
            SongPart::Verse,
            4,
            &[
                ("ride", &[0, 48, 96, 144, 192, 240, 288, 336]),
                ("bass_drum", &[0]),
                ("closed_hh", &[192]),
            ],
        );
    }

    fn seed_funk(&mut self) {
        self.seed(
            "Basic Funk",
            "funk",
            TimeSignature::FourFour,
            Feel::NormalTime,
            SongPart::Verse,
            4,
            &[
                ("bass_drum", &[0, 144, 240]),
                ("snare", &[96, 288]),
                ("closed_hh", &[0, 48, 96, 144, 192, 240, 288, 336]),
            ],
        );
        self.seed(
            "Syncopated Funk",
            "funk",
            TimeSignature::FourFour,
            Feel::DoubleTime,
            SongPart::Verse,
            4,
            &[
                ("bass_drum", &[0, 144, 192, 336]),
                ("snare", &[96, 240, 288]),
                ("closed_hh", &[0, 48, 96, 144, 192, 240, 288, 336]),
                ("open_hh", &[144, 336]),
            ],
        );
    }

    fn seed_hip_hop(&mut self) {
        self.seed(
            "Boom Bap",
            "hip_hop",
            TimeSignature::FourFour,
            Feel::NormalTime,
            SongPart::Verse,
            4,
            &[
                ("bass_drum", &[0, 144, 192]),
                ("snare", &[96, 288]),
                ("closed_hh", &[0, 48, 96, 144, 192, 240, 288, 336]),
            ],
        );
        self.seed(
            "Trap Beat",
            "hip_hop",
            TimeSignature::FourFour,
            Feel::HalfTime,
            SongPart::Verse,
            4,
            &[
                ("bass_drum", &[0, 48, 96, 144]),
                ("snare", &[192]),
                ("closed_hh", &[0, 48, 96, 144, 192, 240, 288, 336]),
            ],
        );
    }

    fn seed_latin(&mut self) {
        self.seed(
            "Basic Samba",
            "latin",
            TimeSignature::FourFour,
            Feel::NormalTime,
            SongPart::Verse,
            4,
            &[
                ("bass_drum", &[0, 144, 192, 336]),
                ("snare", &[96, 288]),
                ("closed_hh", &[0, 48, 96, 144, 192, 240, 288, 336]),
                ("conga_high", &[48, 144, 240, 336]),
                ("conga_low", &[0, 96, 192, 288]),
            ],
        );
        self.seed(
            "Bossa Nova",
            "latin",
            TimeSignature::FourFour,
            Feel::NormalTime,
            SongPart::Verse,
            4,
            &[
                ("bass_drum", &[0, 192]),
                ("snare", &[96, 288]),
                ("closed_hh", &[0, 48, 96, 144, 192, 240, 288, 336]),
                ("cowbell", &[0, 96, 192, 288]),
            ],
        );
    }
}

impl Default for BuiltinLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternLibrary for BuiltinLibrary {
    fn find(&self, key: &PatternKey) -> Option<&BeatUnit> {
        self.units.get(key)
    }

    fn note_number_for(&self, instrument: &str) -> Option<u8> {
        self.instruments.get(instrument).map(|i| i.note)
    }

    fn base_velocity_for(&self, instrument: &str) -> Option<u8> {
        self.instruments.get(instrument).map(|i| i.base_velocity)
    }

    fn distinct_genres(&self) -> Vec<String> {
        let mut genres: Vec<String> = self.units.keys().map(|k| k.genre.clone()).collect();
        genres.sort();
        genres.dedup();
        genres
    }

    fn distinct_feels(&self) -> Vec<Feel> {
        Feel::all()
            .iter()
            .copied()
            .filter(|f| self.units.keys().any(|k| k.feel == *f))
            .collect()
    }

    fn distinct_song_parts(&self) -> Vec<SongPart> {
        SongPart::all()
            .iter()
            .copied()
            .filter(|p| self.units.keys().any(|k| k.song_part == *p))
            .collect()
    }

    fn distinct_time_signatures(&self) -> Vec<TimeSignature> {
        TimeSignature::all()
            .iter()
            .copied()
            .filter(|t| self.units.keys().any(|k| k.time_signature == *t))
            .collect()
    }
}

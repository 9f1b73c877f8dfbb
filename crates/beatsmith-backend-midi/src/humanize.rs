//! Seeded humanization of timing and velocity.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Velocity floor after humanization.
pub const MIN_VELOCITY: u8 = 60;

/// Velocity ceiling after humanization.
pub const MAX_VELOCITY: u8 = 127;

/// Nominal gap between hit groups, in ticks (an eighth note at 96 TPQ).
pub const GROUP_GAP_TICKS: u32 = 36;

/// Create a seeded PCG32 RNG.
fn create_rng(seed: u32) -> Pcg32 {
    // Expand 32-bit seed to 64-bit for PCG32 state
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Derive a track seed from the base seed and a stream index.
///
/// Uses BLAKE3 so distinct indices give statistically independent streams.
pub fn derive_seed(base_seed: u32, index: u32) -> u32 {
    let mut input = Vec::with_capacity(8);
    input.extend_from_slice(&base_seed.to_le_bytes());
    input.extend_from_slice(&index.to_le_bytes());

    let hash = blake3::hash(&input);
    let bytes: [u8; 4] = hash.as_bytes()[0..4].try_into().unwrap();
    u32::from_le_bytes(bytes)
}

/// Jitter source for note timing and velocity.
///
/// All draws come from one PCG32 stream in a fixed order (the encoder draws
/// on-delay then velocity per note-on, off-delay per note-off, then the group
/// gap), so a seed fully determines the encoded bytes.
#[derive(Debug)]
pub struct Humanizer {
    rng: Pcg32,
}

impl Humanizer {
    /// Create a humanizer from an explicit seed.
    pub fn from_seed(seed: u32) -> Self {
        Self {
            rng: create_rng(seed),
        }
    }

    /// Note-on delay in ticks. Drawn from [-2, 2]; MIDI deltas cannot be
    /// negative, so early offsets clamp to zero delay.
    pub fn note_on_delay(&mut self) -> u32 {
        self.rng.gen_range(-2i32..=2).max(0) as u32
    }

    /// Humanized velocity: base plus uniform [-10, 10], clamped to [60, 127].
    pub fn velocity(&mut self, base: u8) -> u8 {
        let jittered = base as i32 + self.rng.gen_range(-10i32..=10);
        jittered.clamp(MIN_VELOCITY as i32, MAX_VELOCITY as i32) as u8
    }

    /// Note-off delay in ticks, drawn from [-1, 1] with the same
    /// non-negative clamp as [`Humanizer::note_on_delay`].
    pub fn note_off_delay(&mut self) -> u32 {
        self.rng.gen_range(-1i32..=1).max(0) as u32
    }

    /// Gap until the next hit group: 36 plus uniform [-2, 2] ticks.
    pub fn group_gap(&mut self) -> u32 {
        (GROUP_GAP_TICKS as i32 + self.rng.gen_range(-2i32..=2)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_on_delay_bounds() {
        let mut humanizer = Humanizer::from_seed(7);
        for _ in 0..1000 {
            assert!(humanizer.note_on_delay() <= 2);
        }
    }

    #[test]
    fn test_note_off_delay_bounds() {
        let mut humanizer = Humanizer::from_seed(7);
        for _ in 0..1000 {
            assert!(humanizer.note_off_delay() <= 1);
        }
    }

    #[test]
    fn test_velocity_clamped() {
        let mut humanizer = Humanizer::from_seed(99);
        for _ in 0..1000 {
            let v = humanizer.velocity(110);
            assert!((MIN_VELOCITY..=MAX_VELOCITY).contains(&v));
        }
        // A very quiet base still comes out at the floor.
        for _ in 0..100 {
            assert!(humanizer.velocity(10) >= MIN_VELOCITY);
        }
        for _ in 0..100 {
            assert!(humanizer.velocity(127) <= MAX_VELOCITY);
        }
    }

    #[test]
    fn test_group_gap_bounds() {
        let mut humanizer = Humanizer::from_seed(3);
        for _ in 0..1000 {
            let gap = humanizer.group_gap();
            assert!((34..=38).contains(&gap));
        }
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = Humanizer::from_seed(42);
        let mut b = Humanizer::from_seed(42);
        for _ in 0..100 {
            assert_eq!(a.note_on_delay(), b.note_on_delay());
            assert_eq!(a.velocity(100), b.velocity(100));
        }
    }

    #[test]
    fn test_derive_seed_is_stable_and_distinct() {
        assert_eq!(derive_seed(1, 0), derive_seed(1, 0));
        assert_ne!(derive_seed(1, 0), derive_seed(1, 1));
        assert_ne!(derive_seed(1, 0), derive_seed(2, 0));
    }
}

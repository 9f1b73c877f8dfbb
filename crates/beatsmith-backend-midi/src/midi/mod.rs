//! Standard MIDI File (format 0) encoder.
//!
//! Output is a single-track SMF at 96 ticks per quarter note with note
//! events on channel 0 only. No tempo, time-signature, or program-change
//! events are written; the file carries the groove, the consumer supplies
//! the context.
//!
//! # Layout
//!
//! - `MThd` chunk: big-endian length 6, format 0, one track, division 96
//! - `MTrk` chunk: big-endian byte length, then the event stream
//! - Event stream: per hit group, humanized note-ons, a fixed 12-tick
//!   sustain, note-offs, and a humanized inter-group gap; terminated by the
//!   end-of-track meta event `00 FF 2F 00`

mod track;
mod vlq;
mod writer;

pub use track::*;
pub use vlq::*;
pub use writer::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_output_validates() {
        let file = MidiFile::new(vec![0x00, 0xFF, 0x2F, 0x00]);
        let bytes = file.to_bytes().unwrap();
        assert!(validate_midi_bytes(&bytes).is_ok());
    }
}

//! Machine-readable output envelopes for `--json` mode.

use beatsmith_backend_midi::CompileWarning;
use beatsmith_spec::GenerateParams;
use serde::Serialize;

/// Envelope printed by `beatsmith generate --json`.
#[derive(Debug, Serialize)]
pub struct GenerateOutput {
    pub ok: bool,
    pub params: GenerateParams,
    pub seed: u32,
    pub unit: String,
    pub file: String,
    pub bytes: usize,
    pub hash: String,
    pub warnings: Vec<CompileWarning>,
}

/// Error envelope printed by `--json` mode instead of colored text.
#[derive(Debug, Serialize)]
pub struct ErrorOutput {
    pub ok: bool,
    pub error: String,
}

impl ErrorOutput {
    pub fn new(error: impl std::fmt::Display) -> Self {
        Self {
            ok: false,
            error: error.to_string(),
        }
    }
}

/// One entry of `beatsmith patterns --json`.
#[derive(Debug, Serialize)]
pub struct PatternEntry {
    pub name: String,
    pub genre: String,
    pub time_signature: String,
    pub feel: String,
    pub song_part: String,
    pub length_beats: u8,
    pub hit_groups: usize,
    pub hits: usize,
}

//! Generate command implementation
//!
//! Compiles a drum pattern request into a `.mid` file plus a JSON report
//! recording what was generated and from what seed.

use anyhow::{Context, Result};
use beatsmith_backend_midi::humanize::derive_seed;
use beatsmith_backend_midi::{
    generate_with_seed, random_params, BuiltinLibrary, CompileWarning, GenerateError,
};
use beatsmith_spec::{output_filename, Feel, GenerateParams, SongPart, TimeSignature};
use colored::Colorize;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{ErrorOutput, GenerateOutput};

/// Sidecar report written next to every generated `.mid` file.
#[derive(Debug, Serialize)]
struct ReportFile {
    backend: &'static str,
    backend_version: &'static str,
    created_at: String,
    params: GenerateParams,
    seed: u32,
    unit: String,
    hash: String,
    bytes: usize,
    warnings: Vec<CompileWarning>,
}

/// Run the generate command
///
/// With no pattern flags at all the request is resolved at random from the
/// values present in the pattern library ("surprise me"). An explicit
/// `--seed` pins both that resolution and the humanization, making the
/// whole run reproducible.
///
/// # Returns
/// Exit code: 0 success, 1 parameter error, 2 generation error
#[allow(clippy::too_many_arguments)]
pub fn run(
    genre: Option<&str>,
    bars: Option<u8>,
    feel: Option<&str>,
    tempo: Option<u16>,
    song_part: Option<&str>,
    time_signature: Option<&str>,
    seed: Option<u32>,
    out_dir: &str,
    json_output: bool,
) -> Result<ExitCode> {
    let library = BuiltinLibrary::new();
    let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());

    let surprise = genre.is_none()
        && bars.is_none()
        && feel.is_none()
        && tempo.is_none()
        && song_part.is_none()
        && time_signature.is_none();

    let params = if surprise {
        // Parameter picks draw from their own stream so adding a pick never
        // shifts the humanization bytes.
        let mut rng = Pcg32::seed_from_u64(derive_seed(seed, 1) as u64);
        random_params(&library, &mut rng)
    } else {
        let defaults = GenerateParams::default();
        let parsed = build_params(
            genre, bars, feel, tempo, song_part, time_signature, &defaults,
        );
        match parsed {
            Ok(params) => params,
            Err(e) => return Ok(param_failure(json_output, &e)),
        }
    };

    let result = match generate_with_seed(&library, &params, seed) {
        Ok(result) => result,
        Err(e @ GenerateError::InvalidParameter(_)) => {
            return Ok(param_failure(json_output, &e));
        }
        Err(e @ GenerateError::Compile(_)) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&ErrorOutput::new(&e))?);
            } else {
                eprintln!("{}: {}", "error".red(), e);
            }
            return Ok(ExitCode::from(2));
        }
        Err(e) => return Err(e.into()),
    };

    let timestamp = chrono::Utc::now().format("%Y%m%d%H%M%S").to_string();
    let stem = output_filename(&params, &timestamp);
    let out_dir = Path::new(out_dir);
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let midi_path = out_dir.join(format!("{stem}.mid"));
    std::fs::write(&midi_path, &result.data)
        .with_context(|| format!("Failed to write MIDI file: {}", midi_path.display()))?;

    let report = ReportFile {
        backend: beatsmith_backend_midi::BACKEND_ID,
        backend_version: beatsmith_backend_midi::VERSION,
        created_at: chrono::Utc::now().to_rfc3339(),
        params: params.clone(),
        seed,
        unit: result.unit_name.clone(),
        hash: result.hash.clone(),
        bytes: result.data.len(),
        warnings: result.warnings.clone(),
    };
    let report_path = out_dir.join(format!("{stem}.report.json"));
    std::fs::write(&report_path, serde_json::to_vec_pretty(&report)?)
        .with_context(|| format!("Failed to write report: {}", report_path.display()))?;

    if json_output {
        let output = GenerateOutput {
            ok: true,
            params,
            seed,
            unit: result.unit_name,
            file: midi_path.display().to_string(),
            bytes: result.data.len(),
            hash: result.hash,
            warnings: result.warnings,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_human(&params, seed, surprise, &result.warnings, &midi_path, &report);
    }

    Ok(ExitCode::SUCCESS)
}

fn print_human(
    params: &GenerateParams,
    seed: u32,
    surprise: bool,
    warnings: &[CompileWarning],
    midi_path: &Path,
    report: &ReportFile,
) {
    if surprise {
        println!("{}", "No parameters given, rolling the dice".dimmed());
    }
    println!(
        "{} {} {} {} {} at {} BPM, {} bars",
        "Generating:".cyan().bold(),
        params.genre,
        params.song_part,
        params.feel,
        params.time_signature,
        params.tempo,
        params.length_bars
    );
    println!("{} {} (seed {})", "Template:".dimmed(), report.unit, seed);

    for warning in warnings {
        println!("  {} {}", "!".yellow(), warning);
    }

    println!(
        "{} {} ({} bytes)",
        "Wrote:".green().bold(),
        midi_path.display(),
        report.bytes
    );
    println!("{} {}", "Hash:".dimmed(), &report.hash[..16]);
}

fn param_failure(json_output: bool, error: &dyn std::fmt::Display) -> ExitCode {
    if json_output {
        if let Ok(body) = serde_json::to_string_pretty(&ErrorOutput::new(error)) {
            println!("{body}");
        }
    } else {
        eprintln!("{}: {}", "error".red(), error);
    }
    ExitCode::from(1)
}

fn build_params(
    genre: Option<&str>,
    bars: Option<u8>,
    feel: Option<&str>,
    tempo: Option<u16>,
    song_part: Option<&str>,
    time_signature: Option<&str>,
    defaults: &GenerateParams,
) -> Result<GenerateParams, beatsmith_spec::ParamError> {
    Ok(GenerateParams {
        genre: genre.unwrap_or(&defaults.genre).to_string(),
        length_bars: bars.unwrap_or(defaults.length_bars),
        feel: match feel {
            Some(s) => s.parse::<Feel>()?,
            None => defaults.feel,
        },
        tempo: tempo.unwrap_or(defaults.tempo),
        song_part: match song_part {
            Some(s) => s.parse::<SongPart>()?,
            None => defaults.song_part,
        },
        time_signature: match time_signature {
            Some(s) => s.parse::<TimeSignature>()?,
            None => defaults.time_signature,
        },
        extra: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::ExitCode;

    fn run_in(
        dir: &tempfile::TempDir,
        genre: Option<&str>,
        bars: Option<u8>,
        seed: Option<u32>,
    ) -> ExitCode {
        run(
            genre,
            bars,
            None,
            None,
            None,
            None,
            seed,
            dir.path().to_str().unwrap(),
            true,
        )
        .unwrap()
    }

    #[test]
    fn test_generate_writes_midi_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let code = run_in(&dir, Some("funk"), Some(2), Some(42));
        assert_eq!(code, ExitCode::SUCCESS);

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert!(entries.iter().any(|n| n.ends_with(".mid")));
        assert!(entries.iter().any(|n| n.ends_with(".report.json")));

        let midi_name = entries.iter().find(|n| n.ends_with(".mid")).unwrap();
        assert!(midi_name.starts_with("drum_pattern_funk_verse_normal_time_120bpm_2bars_"));
        let data = std::fs::read(dir.path().join(midi_name)).unwrap();
        assert_eq!(&data[..4], b"MThd");
    }

    #[test]
    fn test_generate_rejects_bad_bars() {
        let dir = tempfile::tempdir().unwrap();
        let code = run_in(&dir, Some("rock"), Some(0), Some(1));
        assert_eq!(code, ExitCode::from(1));
    }

    #[test]
    fn test_surprise_run_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let code = run_in(&dir, None, None, Some(7));
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn test_unknown_feel_is_param_error() {
        let dir = tempfile::tempdir().unwrap();
        let code = run(
            None,
            None,
            Some("swing"),
            None,
            None,
            None,
            Some(1),
            dir.path().to_str().unwrap(),
            true,
        )
        .unwrap();
        assert_eq!(code, ExitCode::from(1));
    }
}

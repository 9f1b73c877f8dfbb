//! Patterns command implementation
//!
//! Lists the beat unit templates shipped in the builtin library.

use anyhow::Result;
use beatsmith_backend_midi::{BuiltinLibrary, PatternLibrary};
use colored::Colorize;
use std::process::ExitCode;

use super::json_output::PatternEntry;

/// Run the patterns command
pub fn run(json_output: bool) -> Result<ExitCode> {
    let library = BuiltinLibrary::new();
    let units = library.units();

    if json_output {
        let entries: Vec<PatternEntry> = units
            .iter()
            .map(|(key, unit)| PatternEntry {
                name: unit.name.clone(),
                genre: key.genre.clone(),
                time_signature: key.time_signature.as_str().to_string(),
                feel: key.feel.as_str().to_string(),
                song_part: key.song_part.as_str().to_string(),
                length_beats: unit.length_beats,
                hit_groups: unit.hits.len(),
                hits: unit.hits.iter().map(|g| g.instruments.len()).sum(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} ({} templates)",
        "Available patterns".cyan().bold(),
        units.len()
    );
    println!();

    let mut current_genre = "";
    for (key, unit) in &units {
        if key.genre != current_genre {
            current_genre = &key.genre;
            println!("{}", current_genre.bold());
        }
        let hits: usize = unit.hits.iter().map(|g| g.instruments.len()).sum();
        println!(
            "  {:<24} {} {} {:<12} {} groups, {} hits",
            unit.name,
            key.time_signature,
            key.feel,
            key.song_part.as_str(),
            unit.hits.len(),
            hits
        );
    }

    println!();
    println!(
        "{} genres: {}",
        "Distinct".dimmed(),
        library.distinct_genres().join(", ")
    );

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_human_output_succeeds() {
        let code = run(false).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn test_patterns_json_output_succeeds() {
        let code = run(true).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }
}

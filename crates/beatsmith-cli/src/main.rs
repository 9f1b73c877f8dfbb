//! Beatsmith CLI - Command-line interface for drum pattern generation
//!
//! This binary compiles loop-based drum pattern templates into humanized
//! Standard MIDI Files and lists the templates available for compilation.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

// Use modules from the library crate
use beatsmith_cli::commands;

/// Beatsmith - Drum Pattern MIDI Generator
#[derive(Parser)]
#[command(name = "beatsmith")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a drum pattern MIDI file
    ///
    /// With no pattern flags, parameters are picked at random from the
    /// builtin library.
    Generate {
        /// Genre of the pattern (e.g. rock, jazz, funk)
        #[arg(short, long)]
        genre: Option<String>,

        /// Pattern length in bars (1-32)
        #[arg(short, long)]
        bars: Option<u8>,

        /// Rhythmic feel (half_time, normal_time, double_time)
        #[arg(short, long)]
        feel: Option<String>,

        /// Tempo in BPM (40-300), recorded in the output filename
        #[arg(short, long)]
        tempo: Option<u16>,

        /// Song section (intro, verse, chorus, bridge, outro, fill)
        #[arg(short = 'p', long)]
        song_part: Option<String>,

        /// Time signature (4/4, 3/4, 6/8, 12/8, 5/4, 7/8)
        #[arg(short = 's', long)]
        time_signature: Option<String>,

        /// Seed for reproducible generation
        #[arg(long)]
        seed: Option<u32>,

        /// Output directory for the .mid and report files
        #[arg(short, long, default_value = ".")]
        out_dir: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// List the builtin pattern templates
    Patterns {
        /// Output machine-readable JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            genre,
            bars,
            feel,
            tempo,
            song_part,
            time_signature,
            seed,
            out_dir,
            json,
        } => commands::generate::run(
            genre.as_deref(),
            bars,
            feel.as_deref(),
            tempo,
            song_part.as_deref(),
            time_signature.as_deref(),
            seed,
            &out_dir,
            json,
        ),
        Commands::Patterns { json } => commands::patterns::run(json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

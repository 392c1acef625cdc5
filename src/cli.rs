//! # Command-Line Interface Module
//!
//! Clap derive definitions for the `tuneprint` binary.
//!
//! ## Commands
//!
//! - `analyze`: compute the personality profile and write the match document
//! - `report`: print the full text report
//! - `compare`: compare two match documents
//! - `config`: print the default configuration
//! - `completion`: generate shell completions
//!
//! ## Examples
//!
//! ```bash
//! tuneprint analyze ./data --out match_data.json
//! tuneprint report ./data --period long-term
//! tuneprint compare me.json friend.json
//! ```

use crate::record::TimePeriod;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Listening window to focus diversity and mood analysis on
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum PeriodArg {
    ShortTerm,
    MediumTerm,
    LongTerm,
    Saved,
    Recent,
}

impl From<PeriodArg> for TimePeriod {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::ShortTerm => TimePeriod::ShortTerm,
            PeriodArg::MediumTerm => TimePeriod::MediumTerm,
            PeriodArg::LongTerm => TimePeriod::LongTerm,
            PeriodArg::Saved => TimePeriod::Saved,
            PeriodArg::Recent => TimePeriod::Recent,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tuneprint")]
#[command(about = "Tuneprint: music personality profiles from listening history")]
#[command(version)]
pub struct Args {
    /// Engine configuration file (JSON)
    ///
    /// Defaults to `config.json` in the platform config directory, falling
    /// back to built-in defaults when that file does not exist.
    #[arg(long, global = true, env = "TUNEPRINT_CONFIG", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a snapshot directory and write the match document
    ///
    /// The directory holds either `spotify_data.json` or the split export
    /// files (`top_tracks.json`, `top_artists.json`, `saved_tracks.json`,
    /// `recently_played.json`, `followed_artists.json`).
    Analyze {
        /// Snapshot directory
        #[arg(value_hint = clap::ValueHint::DirPath)]
        data_dir: PathBuf,

        /// Where to write the match document (stdout when omitted)
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        out: Option<PathBuf>,

        /// Only analyze diversity and mood within this window
        #[arg(short, long, value_enum)]
        period: Option<PeriodArg>,

        /// Print the complete analysis as JSON instead of the match document
        #[arg(long)]
        full: bool,
    },

    /// Print the text report for a snapshot directory
    Report {
        /// Snapshot directory
        #[arg(value_hint = clap::ValueHint::DirPath)]
        data_dir: PathBuf,

        /// Only analyze diversity and mood within this window
        #[arg(short, long, value_enum)]
        period: Option<PeriodArg>,
    },

    /// Compare two match documents
    ///
    /// Prints both vectors side by side with their Euclidean distance, cosine
    /// similarity and match percentage.
    Compare {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        first: PathBuf,

        #[arg(value_hint = clap::ValueHint::FilePath)]
        second: PathBuf,
    },

    /// Print the effective configuration as JSON
    ///
    /// Usage: tuneprint config > ~/.config/tuneprint/config.json
    Config,

    /// Generate shell completions
    ///
    /// Usage: tuneprint completion bash > ~/.local/share/bash-completion/completions/tuneprint
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_with_options() {
        let args = Args::parse_from(["tuneprint", "analyze", "data", "--out", "m.json", "--period", "long-term"]);
        match args.command {
            Command::Analyze {
                data_dir,
                out,
                period,
                full,
            } => {
                assert_eq!(data_dir, PathBuf::from("data"));
                assert_eq!(out, Some(PathBuf::from("m.json")));
                assert_eq!(period.map(TimePeriod::from), Some(TimePeriod::LongTerm));
                assert!(!full);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let args = Args::parse_from(["tuneprint", "report", "data", "--config", "tp.json"]);
        assert_eq!(args.config, Some(PathBuf::from("tp.json")));
    }
}

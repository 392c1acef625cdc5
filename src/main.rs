//! # Tuneprint
//!
//! Command-line front end: loads a listening-history snapshot, runs the
//! analysis engine and prints or saves the results.
//!
//! ```bash
//! tuneprint analyze ./data --out match_data.json
//! tuneprint report ./data
//! tuneprint compare me.json friend.json
//! RUST_LOG=debug tuneprint report ./data   # analyzer traces
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::{debug, info, warn};
use std::io;
use std::path::Path;
use tuneprint::cli::{self, Args, Command, PeriodArg};
use tuneprint::config::EngineConfig;
use tuneprint::report::{render_comparison, render_report, MatchDocument};
use tuneprint::{analysis, completion, snapshot, Analysis, InputStatus};

fn run_analysis(data_dir: &Path, config: &EngineConfig, period: Option<PeriodArg>) -> Result<Analysis> {
    let config = config.clone().with_focus(period.map(Into::into));
    let raw = snapshot::load_snapshot(data_dir)
        .with_context(|| format!("Failed to load snapshot from {}", data_dir.display()))?;
    let analysis = analysis::analyze(&raw, &config)
        .with_context(|| format!("Snapshot in {} contains invalid records", data_dir.display()))?;

    if analysis.status == InputStatus::Empty {
        warn!("Snapshot in {} has no tracks; results are neutral", data_dir.display());
    }
    Ok(analysis)
}

/// Initializes logging, parses arguments and dispatches the subcommand.
///
/// Logging is controlled through `RUST_LOG`, e.g. `RUST_LOG=tuneprint=debug`.
fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    debug!("{args:?}");

    match args.command {
        Command::Analyze {
            data_dir,
            out,
            period,
            full,
        } => {
            let config = EngineConfig::load(args.config.as_deref())?;
            let analysis = run_analysis(&data_dir, &config, period)?;

            if full {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
                return Ok(());
            }

            let document = MatchDocument::from_analysis(&analysis);
            match out {
                Some(path) => {
                    document.write(&path)?;
                    println!(
                        "{} ({}) {}/100 -> {}",
                        document.personality_type,
                        document.compatibility_tier,
                        document.music_personality_score,
                        path.display()
                    );
                }
                None => println!("{}", serde_json::to_string_pretty(&document)?),
            }
        }
        Command::Report { data_dir, period } => {
            let config = EngineConfig::load(args.config.as_deref())?;
            let analysis = run_analysis(&data_dir, &config, period)?;
            print!("{}", render_report(&analysis));
        }
        Command::Compare { first, second } => {
            let a = MatchDocument::read(&first)?;
            let b = MatchDocument::read(&second)?;
            info!("Comparing {} with {}", first.display(), second.display());
            print!("{}", render_comparison(&a, &b));
        }
        Command::Config => {
            let config = EngineConfig::load(args.config.as_deref())?;
            println!("{}", config.to_json()?);
        }
        Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(
                completion::shell_to_completion_shell(shell),
                &mut cmd,
                &mut io::stdout(),
            );
        }
    }

    Ok(())
}

use std::path::PathBuf;

use clap::Parser;

use resistance_bench::config::{ExperimentConfig, ResolvedOutputs};
use resistance_bench::experiment::ExperimentRunner;
use resistance_bench::logging::init_logging;

/// Spy-identification experiment harness for The Resistance agents.
#[derive(Debug, Parser)]
#[command(
    name = "resistance-bench",
    author,
    version,
    about = "Deterministic experiment harness for The Resistance"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/experiment.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the master RNG seed.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Write per-game transcripts regardless of config.
    #[arg(long)]
    transcripts: bool,

    /// Exit after validating the configuration (no games are run).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = ExperimentConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.games.count = games;
    }

    if let Some(seed) = cli.seed {
        config.games.seed = Some(seed);
    }

    if cli.transcripts {
        config.logging.transcripts = true;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let games = config.games.count;
    let roster = config.agents.len();

    println!("Loaded configuration '{run_id}' with {roster} agents ({games} games)");

    let _logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = ExperimentRunner::new(config, outputs);

    if cli.validate_only {
        println!("Validation-only mode: experiment execution skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Experiment complete for '{run_id}': {} games, resistance won {} → {} rows at {}",
        summary.games_played,
        summary.resistance_wins,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(path) = summary.transcript_path.as_ref() {
        println!("Transcripts: {}", path.display());
    }

    Ok(())
}

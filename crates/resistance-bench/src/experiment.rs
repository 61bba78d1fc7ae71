//! Many-game experiment driver: plays independent seeded games and tallies,
//! per agent, how many true spies its end-of-game guess identified.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::{RngCore, SeedableRng, rngs::StdRng};
use resistance_bot::{BayesianAgent, RandomAgent, TallyAgent};
use resistance_core::agent::Agent;
use resistance_core::game::session::{GameError, GameSession};
use resistance_core::game::transcript::{NullSink, TranscriptSink, WriterSink};
use resistance_core::model::player::PlayerId;
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{AgentKind, ExperimentConfig, ResolvedOutputs};

/// Primary entry point for running identification experiments.
pub struct ExperimentRunner {
    config: ExperimentConfig,
    outputs: ResolvedOutputs,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub games_played: usize,
    pub rows_written: usize,
    pub resistance_wins: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub transcript_path: Option<PathBuf>,
}

/// One JSONL row: a single seat's view of a single finished game.
#[derive(Debug, Serialize)]
struct GameLogRow {
    run_id: String,
    game_index: usize,
    game_seed: u64,
    player: usize,
    agent: String,
    kind: &'static str,
    spy: bool,
    resistance_won: bool,
    suspected: Vec<PlayerId>,
    spies_identified: usize,
}

/// Identification buckets for one configured agent.
#[derive(Debug, Default, Clone)]
struct AgentTally {
    spy_games: usize,
    resistance_games: usize,
    // How many true spies the guess contained: none, one, two or more.
    identified: [usize; 3],
}

impl ExperimentRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: ExperimentConfig, outputs: ResolvedOutputs) -> Self {
        Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
        }
    }

    /// Execute every game, streaming JSONL rows to disk and writing the
    /// markdown summary at the end.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let transcript_path = self.transcript_path()?;
        let mut sink: Box<dyn TranscriptSink> = match &transcript_path {
            Some(path) => Box::new(WriterSink::new(BufWriter::new(File::create(path)?))),
            None => Box::new(NullSink),
        };

        let master_seed = self.config.games.seed.unwrap_or(0);
        let mut rng = StdRng::seed_from_u64(master_seed);

        let tally_index: HashMap<&str, usize> = self
            .config
            .agents
            .iter()
            .enumerate()
            .map(|(i, a)| (a.name.as_str(), i))
            .collect();
        let mut tallies = vec![AgentTally::default(); self.config.agents.len()];
        let kinds: HashMap<&str, AgentKind> = self
            .config
            .agents
            .iter()
            .map(|a| (a.name.as_str(), a.kind))
            .collect();

        let mut rows_written = 0usize;
        let mut resistance_wins = 0usize;

        for game_index in 0..self.config.games.count {
            let game_seed = rng.next_u64();
            let roster = self.build_roster(&mut rng);

            let mut session = GameSession::with_seed(roster, game_seed)?;
            let outcome = session.run(sink.as_mut());
            if outcome.resistance_won {
                resistance_wins += 1;
            }

            for player in 0..session.num_players() {
                let agent = session.agent(player);
                let name = agent.name().to_string();
                let id = PlayerId::from_index(player).expect("seat in roster");
                let spy = outcome.spies.contains(&id);
                let suspected = agent.suspected_spies();
                let spies_identified = suspected
                    .iter()
                    .filter(|s| outcome.spies.contains(s))
                    .count();

                let slot = tally_index[name.as_str()];
                if spy {
                    tallies[slot].spy_games += 1;
                } else {
                    tallies[slot].resistance_games += 1;
                    tallies[slot].identified[spies_identified.min(2)] += 1;
                }

                let row = GameLogRow {
                    run_id: self.config.run_id.clone(),
                    game_index,
                    game_seed,
                    player,
                    kind: kinds[name.as_str()].as_str(),
                    agent: name,
                    spy,
                    resistance_won: outcome.resistance_won,
                    suspected,
                    spies_identified,
                };
                serde_json::to_writer(&mut writer, &row)?;
                writer.write_all(b"\n")?;
                rows_written += 1;
            }

            if self.logging_enabled && tracing::enabled!(Level::INFO) {
                event!(
                    target: "resistance_bench::game",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    game_index = game_index as u64,
                    game_seed,
                    rounds_won = outcome.rounds_won,
                    resistance_won = outcome.resistance_won,
                );
            }
        }

        writer.flush()?;

        self.write_summary(master_seed, resistance_wins, &tallies)?;

        Ok(RunSummary {
            games_played: self.config.games.count,
            rows_written,
            resistance_wins,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            transcript_path,
        })
    }

    /// Fresh agents for one game, each with its own derived RNG stream.
    fn build_roster(&self, rng: &mut StdRng) -> Vec<Box<dyn Agent>> {
        self.config
            .agents
            .iter()
            .map(|agent| {
                let seed = rng.next_u64();
                let boxed: Box<dyn Agent> = match agent.kind {
                    AgentKind::Bayesian => Box::new(BayesianAgent::new(agent.name.clone(), seed)),
                    AgentKind::Tally => Box::new(TallyAgent::new(agent.name.clone(), seed)),
                    AgentKind::Random => Box::new(RandomAgent::new(agent.name.clone(), seed)),
                };
                boxed
            })
            .collect()
    }

    fn transcript_path(&self) -> Result<Option<PathBuf>, RunnerError> {
        if !self.config.logging.transcripts {
            return Ok(None);
        }
        let dir = self
            .outputs
            .summary_md
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&dir)?;
        Ok(Some(dir.join("transcripts.log")))
    }

    fn write_summary(
        &self,
        master_seed: u64,
        resistance_wins: usize,
        tallies: &[AgentTally],
    ) -> Result<(), RunnerError> {
        let games = self.config.games.count;
        let mut out = String::new();
        out.push_str(&format!("# Experiment {}\n\n", self.config.run_id));
        out.push_str(&format!("- games: {games}\n"));
        out.push_str(&format!("- master seed: {master_seed}\n"));
        out.push_str(&format!(
            "- resistance wins: {resistance_wins} ({:.1}%)\n\n",
            100.0 * resistance_wins as f64 / games as f64
        ));
        out.push_str(
            "| agent | kind | spy games | resistance games | 0 spies found | 1 spy found | 2+ spies found |\n",
        );
        out.push_str("|---|---|---|---|---|---|---|\n");
        for (agent, tally) in self.config.agents.iter().zip(tallies) {
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} |\n",
                agent.name,
                agent.kind.as_str(),
                tally.spy_games,
                tally.resistance_games,
                tally.identified[0],
                tally.identified[1],
                tally.identified[2],
            ));
        }
        fs::write(&self.outputs.summary_md, out)?;
        Ok(())
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Errors surfaced while running an experiment.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
    #[error("game setup failed: {0}")]
    Game(#[from] GameError),
}

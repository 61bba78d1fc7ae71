//! Belief models a resistance participant maintains over the other players.
//!
//! This module is composed of:
//! - `priors`: the hand-tuned probability tables keyed by player count, round,
//!   and fail count (configuration data, not derived).
//! - `suspicion`: a sequential Bayesian posterior per player.
//! - `tally`: the bounded integer heuristic variant.

mod priors;
mod suspicion;
mod tally;

pub use priors::{PriorTable, RESISTANCE_FAIL_RATE};
pub use suspicion::SuspicionTracker;
pub use tally::TallyTracker;

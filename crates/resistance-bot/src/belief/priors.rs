//! Hand-tuned probability tables for the Bayesian suspicion update.
//!
//! This is the one place where domain expertise, rather than algorithmic
//! derivation, determines behavior: every value below was tuned against the
//! mission-size tables for its player count. The update rule in
//! [`super::SuspicionTracker`] only plugs these numbers into Bayes' rule.

use resistance_core::model::rules::ROUNDS;

/// Probability a resistance member fails a mission anyway: the fixed
/// false-negative rate used as the innocent-side likelihood.
pub const RESISTANCE_FAIL_RATE: f64 = 0.1;

/// Rows are indexed by fail count (1..=4), columns by round (1..=5). Cells
/// for fail counts impossible at that player count are zero and unreachable.
type FailTable = [[f64; ROUNDS]; 4];

/// Plug-in parameters for the suspicion update, keyed by player count.
#[derive(Debug, Clone)]
pub struct PriorTable {
    num_players: usize,
    member_prior: FailTable,
    onboard_prior: FailTable,
    betray_rate: [f64; ROUNDS],
}

impl PriorTable {
    pub fn for_players(num_players: usize) -> Self {
        let (member_prior, onboard_prior, betray_rate) = match num_players {
            5 => (
                [
                    [1.0 / 2.0, 1.0 / 3.0, 1.0 / 2.0, 1.0 / 3.0, 1.0 / 3.0],
                    [1.0, 2.0 / 3.0, 1.0, 2.0 / 3.0, 2.0 / 3.0],
                    [0.0; ROUNDS],
                    [0.0; ROUNDS],
                ],
                [
                    [1.0, 2.0 / 3.0, 1.0, 2.0 / 3.0, 2.0 / 3.0],
                    [0.0, 1.0, 0.0, 1.0, 1.0],
                    [0.0; ROUNDS],
                    [0.0; ROUNDS],
                ],
                [0.1, 0.85, 0.3, 0.80, 0.90],
            ),
            6 => (
                [
                    [1.0 / 2.0, 1.0 / 3.0, 1.0 / 4.0, 1.0 / 3.0, 1.0 / 4.0],
                    [1.0, 2.0 / 3.0, 1.0 / 2.0, 2.0 / 3.0, 2.0 / 3.0],
                    [0.0; ROUNDS],
                    [0.0; ROUNDS],
                ],
                [
                    [1.0, 2.0 / 3.0, 1.0 / 2.0, 2.0 / 3.0, 1.0 / 2.0],
                    [2.0 / 3.0, 1.0, 2.0 / 3.0, 1.0, 2.0 / 3.0],
                    [0.0; ROUNDS],
                    [0.0; ROUNDS],
                ],
                [0.1, 0.85, 0.90, 0.85, 0.90],
            ),
            7 => (
                [
                    [1.0 / 2.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 4.0, 1.0 / 4.0],
                    [1.0, 2.0 / 3.0, 1.0 / 2.0, 2.0 / 3.0, 2.0 / 3.0],
                    [0.0, 1.0, 1.0, 3.0 / 4.0, 3.0 / 4.0],
                    [0.0; ROUNDS],
                ],
                [
                    [1.0, 2.0 / 3.0, 2.0 / 3.0, 1.0 / 2.0, 1.0 / 2.0],
                    [1.0 / 2.0, 1.0, 1.0, 1.0 / 2.0, 1.0 / 2.0],
                    [4.0 / 5.0, 1.0, 1.0, 1.0, 1.0],
                    [0.0, 0.0, 0.0, 1.0, 1.0],
                ],
                [0.1, 0.85, 0.90, 0.90, 0.85],
            ),
            10 => (
                [
                    [1.0 / 3.0, 1.0 / 4.0, 1.0 / 4.0, 1.0 / 5.0, 1.0 / 5.0],
                    [2.0 / 3.0, 1.0 / 2.0, 1.0 / 2.0, 2.0 / 5.0, 2.0 / 5.0],
                    [1.0, 3.0 / 4.0, 3.0 / 4.0, 3.0 / 5.0, 3.0 / 5.0],
                    [0.0, 1.0, 1.0, 4.0 / 5.0, 1.0],
                ],
                [
                    [2.0 / 3.0, 1.0 / 2.0, 1.0 / 2.0, 2.0 / 5.0, 2.0 / 5.0],
                    [1.0, 1.0 / 2.0, 1.0 / 2.0, 3.0 / 5.0, 3.0 / 5.0],
                    [4.0 / 5.0, 1.0, 1.0, 4.0 / 5.0, 4.0 / 5.0],
                    [0.0, 0.0, 0.0, 1.0, 1.0],
                ],
                [0.3, 0.85, 0.85, 0.90, 0.90],
            ),
            // 8 and 9 players share one tuning.
            _ => (
                [
                    [1.0 / 3.0, 1.0 / 4.0, 1.0 / 4.0, 1.0 / 5.0, 1.0 / 5.0],
                    [2.0 / 3.0, 1.0 / 2.0, 1.0 / 2.0, 2.0 / 5.0, 2.0 / 5.0],
                    [1.0, 3.0 / 4.0, 3.0 / 4.0, 3.0 / 5.0, 3.0 / 5.0],
                    [0.0; ROUNDS],
                ],
                [
                    [2.0 / 3.0, 1.0 / 2.0, 1.0 / 2.0, 2.0 / 5.0, 2.0 / 5.0],
                    [1.0, 1.0 / 2.0, 1.0 / 2.0, 3.0 / 5.0, 3.0 / 5.0],
                    [4.0 / 5.0, 1.0, 1.0, 4.0 / 5.0, 4.0 / 5.0],
                    [0.0, 0.0, 0.0, 1.0, 1.0],
                ],
                [0.3, 0.85, 0.85, 0.90, 0.90],
            ),
        };

        Self {
            num_players,
            member_prior,
            onboard_prior,
            betray_rate,
        }
    }

    /// Prior that a team member is a spy, for an observer who was not on the
    /// mission. A fail count of zero reads the one-fail row.
    pub fn member_prior(&self, round: u8, fails: u8) -> f64 {
        self.member_prior[fail_index(fails)][round_index(round)]
    }

    /// Sharper prior used when the observer was itself on the failed team and
    /// so can discount its own slot.
    pub fn onboard_prior(&self, round: u8, fails: u8) -> f64 {
        self.onboard_prior[fail_index(fails)][round_index(round)]
    }

    /// Likelihood that a spy on the team chose to betray at this round.
    pub fn betray_rate(&self, round: u8) -> f64 {
        self.betray_rate[round_index(round)]
    }

    /// Implied prior for an off-team leader: the fail count spread over the
    /// whole roster rather than the round-keyed member table.
    pub fn leader_prior(&self, fails: u8) -> f64 {
        f64::from(fails.max(1)) / self.num_players as f64
    }
}

fn round_index(round: u8) -> usize {
    assert!((1..=ROUNDS as u8).contains(&round), "round {round} out of range");
    round as usize - 1
}

fn fail_index(fails: u8) -> usize {
    (fails.clamp(1, 4) - 1) as usize
}

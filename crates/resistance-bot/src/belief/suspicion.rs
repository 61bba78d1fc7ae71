//! Sequential Bayesian suspicion scores over the other players.
//!
//! Each score is a posterior probability of being a spy, revised after every
//! executed mission. Scores live in [-1, 1]: 0.0 means no evidence yet, and
//! the extremes 1.0 and -1.0 are absorbing (logical certainty from mission
//! arithmetic, never revised afterwards).

use crate::belief::priors::{PriorTable, RESISTANCE_FAIL_RATE};
use resistance_core::model::player::PlayerId;
use resistance_core::model::rules::spy_count;
use resistance_core::model::team::Team;

#[derive(Debug, Clone)]
pub struct SuspicionTracker {
    own_id: PlayerId,
    num_players: usize,
    // Indexed by player; the own slot is never updated or ranked.
    scores: Vec<f64>,
    table: PriorTable,
}

impl SuspicionTracker {
    pub fn new(num_players: usize, own_id: PlayerId) -> Self {
        Self {
            own_id,
            num_players,
            scores: vec![0.0; num_players],
            table: PriorTable::for_players(num_players),
        }
    }

    /// Revises every relevant score from one executed mission.
    ///
    /// Team members are updated through the prior tables; the leader gets its
    /// own update because leading a mission carries a different signal than
    /// riding on one. Two mission shapes short-circuit to certainty: every
    /// member betrayed (all members are spies) and every spy betrayed (an
    /// off-team leader cannot be one).
    pub fn observe_mission(
        &mut self,
        round: u8,
        team: &Team,
        leader: PlayerId,
        fails: u8,
        success: bool,
    ) {
        let betray_rate = self.table.betray_rate(round);

        if success {
            let prior = self.table.member_prior(round, fails);
            for &member in team.members() {
                if member != self.own_id {
                    self.update(member, prior, betray_rate, false);
                }
            }
            // A leader who rode its own mission vouched for it twice.
            if leader != self.own_id && team.contains(leader) {
                let prior = 1.0 / self.num_players as f64;
                self.update(leader, prior, betray_rate, false);
            }
            return;
        }

        if fails as usize == team.len() {
            for &member in team.members() {
                if member != self.own_id {
                    self.pin(member, 1.0);
                }
            }
        } else {
            let prior = if team.contains(self.own_id) {
                // Our own slot is known innocent, so the spy probability
                // concentrates on the remaining members.
                self.table.onboard_prior(round, fails)
            } else {
                self.table.member_prior(round, fails)
            };
            for &member in team.members() {
                if member != self.own_id {
                    self.update(member, prior, betray_rate, true);
                }
            }
        }

        if leader != self.own_id && !team.contains(leader) {
            if fails as usize == spy_count(self.num_players) {
                self.pin(leader, -1.0);
            } else {
                self.update(leader, self.table.leader_prior(fails), betray_rate, true);
            }
        }
    }

    pub fn score(&self, player: PlayerId) -> f64 {
        self.scores[player.index()]
    }

    /// Every other player, least suspicious first. The insertion sort is
    /// stable, so ties keep id order and rankings reproduce across runs.
    pub fn ranking(&self) -> Vec<PlayerId> {
        let mut order: Vec<PlayerId> = PlayerId::roster(self.num_players)
            .filter(|&p| p != self.own_id)
            .collect();
        for i in 1..order.len() {
            let key = order[i];
            let key_score = self.scores[key.index()];
            let mut j = i;
            while j > 0 && self.scores[order[j - 1].index()] > key_score {
                order[j] = order[j - 1];
                j -= 1;
            }
            order[j] = key;
        }
        order
    }

    /// The end-of-game spy guess: the `spy_count` highest scores, most
    /// suspicious first.
    pub fn suspected_spies(&self) -> Vec<PlayerId> {
        self.ranking()
            .into_iter()
            .rev()
            .take(spy_count(self.num_players))
            .collect()
    }

    /// The `count` most trusted other players, used to fill proposed teams.
    pub fn least_suspicious(&self, count: usize) -> Vec<PlayerId> {
        self.ranking().into_iter().take(count).collect()
    }

    fn update(&mut self, player: PlayerId, prior: f64, betray_rate: f64, failed: bool) {
        let current = self.scores[player.index()];
        self.scores[player.index()] = posterior(prior, betray_rate, current, failed);
    }

    fn pin(&mut self, player: PlayerId, value: f64) {
        let current = self.scores[player.index()];
        if current != 1.0 && current != -1.0 {
            self.scores[player.index()] = value;
        }
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, player: PlayerId, score: f64) {
        self.scores[player.index()] = score;
    }
}

/// One Bayes step. A score of exactly 0.0 means "no evidence yet", not a
/// zero-probability belief: the first update reports the prior-weighted
/// likelihood directly instead of multiplying through zero.
fn posterior(prior: f64, betray_rate: f64, current: f64, failed: bool) -> f64 {
    if current == 1.0 || current == -1.0 {
        return current;
    }
    let likelihood = if failed { betray_rate } else { 1.0 - betray_rate };
    let innocent = if failed { RESISTANCE_FAIL_RATE } else { 1.0 - RESISTANCE_FAIL_RATE };
    if current == 0.0 {
        round_to_milli(prior * likelihood)
    } else {
        let numerator = prior * likelihood * current;
        round_to_milli(numerator / (numerator + (1.0 - prior) * innocent))
    }
}

/// Rounds to three decimal places, ties to even, so that score trajectories
/// are bit-for-bit reproducible.
fn round_to_milli(value: f64) -> f64 {
    let scaled = value * 1000.0;
    let floor = scaled.floor();
    let fraction = scaled - floor;
    let rounded = if fraction > 0.5 {
        floor + 1.0
    } else if fraction < 0.5 {
        floor
    } else if (floor as i64) % 2 == 0 {
        floor
    } else {
        floor + 1.0
    };
    rounded / 1000.0
}

#[cfg(test)]
mod tests {
    use super::{SuspicionTracker, posterior, round_to_milli};
    use resistance_core::model::player::PlayerId;
    use resistance_core::model::team::Team;

    fn id(index: usize) -> PlayerId {
        PlayerId::from_index(index).unwrap()
    }

    fn team(indices: &[usize]) -> Team {
        Team::new(indices.iter().map(|&i| id(i)).collect())
    }

    #[test]
    fn double_betrayal_on_a_pair_mission_is_certainty() {
        // Five players, round 1, team of two, both betray: both members must
        // be the two spies, and the off-team leader can be neither.
        let mut tracker = SuspicionTracker::new(5, id(4));
        tracker.observe_mission(1, &team(&[0, 1]), id(2), 2, false);
        assert_eq!(tracker.score(id(0)), 1.0);
        assert_eq!(tracker.score(id(1)), 1.0);
        assert_eq!(tracker.score(id(2)), -1.0);
        assert_eq!(tracker.score(id(3)), 0.0);

        let mut guess = tracker.suspected_spies();
        guess.sort();
        assert_eq!(guess, vec![id(0), id(1)]);
    }

    #[test]
    fn first_failure_reports_the_raw_prior_weighted_likelihood() {
        // Round 2, one fail among three, observer off-team: each member gets
        // round(1/3 * 0.85), the off-team leader round(1/5 * 0.85).
        let mut tracker = SuspicionTracker::new(5, id(4));
        tracker.observe_mission(2, &team(&[0, 1, 2]), id(3), 1, false);
        for p in [0, 1, 2] {
            assert_eq!(tracker.score(id(p)), 0.283);
        }
        assert_eq!(tracker.score(id(3)), 0.17);
    }

    #[test]
    fn being_on_the_failed_team_sharpens_the_prior() {
        let mut tracker = SuspicionTracker::new(5, id(0));
        tracker.observe_mission(2, &team(&[0, 1, 2]), id(0), 1, false);
        // Onboard prior 2/3 instead of 1/3: round(2/3 * 0.85) = 0.567.
        assert_eq!(tracker.score(id(1)), 0.567);
        assert_eq!(tracker.score(id(2)), 0.567);
    }

    #[test]
    fn second_update_normalizes_against_the_innocent_hypothesis() {
        let mut tracker = SuspicionTracker::new(5, id(4));
        tracker.observe_mission(2, &team(&[0, 1, 2]), id(3), 1, false);
        tracker.observe_mission(4, &team(&[0, 1, 2]), id(3), 1, false);
        // prior 1/3, likelihood 0.8, current 0.283:
        //   num = 0.283 * 4/15, den = num + (2/3) * 0.1 -> 0.531
        assert_eq!(tracker.score(id(0)), 0.531);
    }

    #[test]
    fn extreme_scores_are_absorbing() {
        let mut tracker = SuspicionTracker::new(5, id(4));
        tracker.set_score(id(0), 1.0);
        tracker.set_score(id(1), -1.0);
        tracker.observe_mission(2, &team(&[0, 1, 2]), id(0), 1, false);
        tracker.observe_mission(4, &team(&[0, 1, 2]), id(0), 0, true);
        assert_eq!(tracker.score(id(0)), 1.0);
        assert_eq!(tracker.score(id(1)), -1.0);
    }

    #[test]
    fn success_lowers_suspicion_of_the_riding_leader_twice() {
        let mut tracker = SuspicionTracker::new(5, id(4));
        tracker.observe_mission(2, &team(&[0, 1, 2]), id(0), 0, true);
        // Members get round(1/3 * 0.15) = 0.05; leader 0 additionally gets a
        // normalized update from the 1/5 prior.
        assert_eq!(tracker.score(id(1)), 0.05);
        assert_eq!(tracker.score(id(2)), 0.05);
        assert!(tracker.score(id(0)) < tracker.score(id(1)));
    }

    #[test]
    fn ranking_is_stable_on_ties() {
        let mut tracker = SuspicionTracker::new(5, id(4));
        tracker.set_score(id(0), 0.3);
        tracker.set_score(id(2), 0.3);
        tracker.set_score(id(1), 0.7);
        assert_eq!(tracker.ranking(), vec![id(3), id(0), id(2), id(1)]);
        assert_eq!(tracker.least_suspicious(2), vec![id(3), id(0)]);
        assert_eq!(tracker.suspected_spies(), vec![id(1), id(2)]);
    }

    #[test]
    fn posterior_stays_in_unit_interval_for_interior_inputs() {
        for prior in [0.2, 1.0 / 3.0, 0.5, 0.8] {
            for current in [0.001, 0.283, 0.5, 0.999] {
                for failed in [false, true] {
                    let next = posterior(prior, 0.85, current, failed);
                    assert!((0.0..=1.0).contains(&next), "prior={prior} current={current}");
                }
            }
        }
    }

    #[test]
    fn rounding_is_half_to_even() {
        assert_eq!(round_to_milli(0.0625), 0.062);
        assert_eq!(round_to_milli(0.0635), 0.064);
        assert_eq!(round_to_milli(0.2833), 0.283);
        assert_eq!(round_to_milli(0.2837), 0.284);
    }
}

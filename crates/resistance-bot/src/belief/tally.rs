//! Integer suspicion tallies, the rule-based alternative to the Bayesian
//! tracker. Evidence is additive: a failed mission bumps everyone aboard, a
//! multi-betrayal bumps harder, a clean mission forgives one point. Tallies
//! never drop below zero.

use resistance_core::model::player::PlayerId;
use resistance_core::model::rules::spy_count;
use resistance_core::model::team::Team;

#[derive(Debug, Clone)]
pub struct TallyTracker {
    own_id: PlayerId,
    num_players: usize,
    scores: Vec<i32>,
}

impl TallyTracker {
    pub fn new(num_players: usize, own_id: PlayerId) -> Self {
        Self {
            own_id,
            num_players,
            scores: vec![0; num_players],
        }
    }

    pub fn observe_mission(&mut self, team: &Team, leader: PlayerId, fails: u8, success: bool) {
        let mut delta = if success { -1 } else { 1 };
        if fails > 1 {
            delta += 2;
        }

        for &member in team.members() {
            if member != self.own_id {
                self.apply(member, delta);
            }
        }

        if leader == self.own_id {
            return;
        }
        if team.contains(leader) {
            // Leading your own mission doubles down on it.
            if delta >= 1 {
                self.scores[leader.index()] += 2;
            } else {
                self.apply(leader, delta);
            }
        } else if delta >= 1 {
            self.scores[leader.index()] += 1;
        } else {
            self.apply(leader, delta);
        }
    }

    pub fn score(&self, player: PlayerId) -> i32 {
        self.scores[player.index()]
    }

    /// Every other player, least suspicious first, stable on ties.
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

    pub fn suspected_spies(&self) -> Vec<PlayerId> {
        self.ranking()
            .into_iter()
            .rev()
            .take(spy_count(self.num_players))
            .collect()
    }

    pub fn least_suspicious(&self, count: usize) -> Vec<PlayerId> {
        self.ranking().into_iter().take(count).collect()
    }

    // A forgiveness point only lands on a player with something to forgive.
    fn apply(&mut self, player: PlayerId, delta: i32) {
        if delta >= 0 || self.scores[player.index()] != 0 {
            self.scores[player.index()] += delta;
        }
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, player: PlayerId, score: i32) {
        self.scores[player.index()] = score;
    }
}

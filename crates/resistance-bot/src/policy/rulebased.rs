//! The rule-based policy: integer tallies instead of posteriors. Deliberately
//! simpler than [`super::BayesianAgent`] so experiments can measure what the
//! probabilistic model adds.

use crate::belief::TallyTracker;
use crate::policy::Reluctance;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use resistance_core::agent::Agent;
use resistance_core::model::player::PlayerId;
use resistance_core::model::rules::ROUNDS;
use resistance_core::model::team::Team;

/// Tally ceiling for approving a team in normal play.
const NORMAL_TALLY_LIMIT: i32 = 3;
/// Tightened ceiling after two lost rounds.
const PARANOID_TALLY_LIMIT: i32 = 1;

pub struct TallyAgent {
    name: String,
    num_players: usize,
    own_id: PlayerId,
    is_spy: bool,
    comrades: Vec<PlayerId>,
    tally: TallyTracker,
    reluctance: Reluctance,
    current_round: u8,
    rounds_lost: u8,
    rng: SmallRng,
}

impl TallyAgent {
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        let own_id = PlayerId::from_index(0).expect("index 0 in roster");
        Self {
            name: name.into(),
            num_players: 0,
            own_id,
            is_spy: false,
            comrades: Vec::new(),
            tally: TallyTracker::new(resistance_core::model::rules::MIN_PLAYERS, own_id),
            reluctance: Reluctance::default(),
            current_round: 1,
            rounds_lost: 0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    fn comrade_aboard(&self, team: &Team) -> bool {
        team.members()
            .iter()
            .any(|&m| m != self.own_id && self.comrades.contains(&m))
    }

    #[cfg(test)]
    pub(crate) fn tally_mut(&mut self) -> &mut TallyTracker {
        &mut self.tally
    }
}

impl Agent for TallyAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn new_game(&mut self, num_players: usize, own_id: PlayerId, spies: &[PlayerId]) {
        self.num_players = num_players;
        self.own_id = own_id;
        self.is_spy = !spies.is_empty();
        self.comrades = spies.to_vec();
        self.tally = TallyTracker::new(num_players, own_id);
        self.reluctance = Reluctance::default();
        self.current_round = 1;
        self.rounds_lost = 0;
    }

    fn propose_team(&mut self, team_size: usize, _fails_required: u8) -> Team {
        if !self.is_spy {
            let mut members = Vec::with_capacity(team_size);
            members.push(self.own_id);
            members.extend(self.tally.least_suspicious(team_size - 1));
            return Team::new(members);
        }

        // Naive spy: joins when the spies are behind, otherwise random cover.
        let mut picked = vec![false; self.num_players];
        let mut members = Vec::with_capacity(team_size);
        if self.current_round > 2 && self.rounds_lost < 2 {
            picked[self.own_id.index()] = true;
            members.push(self.own_id);
        }
        while members.len() < team_size {
            let candidate = self.rng.gen_range(0..self.num_players);
            if !picked[candidate] {
                picked[candidate] = true;
                members.push(PlayerId::from_index(candidate).expect("sampled index in roster"));
            }
        }
        Team::new(members)
    }

    fn vote(&mut self, team: &Team, leader: PlayerId) -> bool {
        if self.is_spy {
            return leader == self.own_id
                || self.reluctance.must_approve()
                || self.comrade_aboard(team)
                || team.contains(self.own_id)
                || self.current_round == 1;
        }

        if self.reluctance.must_approve() {
            return true;
        }
        let paranoid = self.current_round >= 2 && self.rounds_lost >= 2;
        if paranoid && (leader == self.own_id || team.contains(self.own_id)) {
            return true;
        }
        let limit = if paranoid {
            PARANOID_TALLY_LIMIT
        } else {
            NORMAL_TALLY_LIMIT
        };
        team.members()
            .iter()
            .all(|&m| m == self.own_id || self.tally.score(m) <= limit)
    }

    fn betray(&mut self, team: &Team, _leader: PlayerId) -> bool {
        let comrade_aboard = self.comrade_aboard(team);
        (!comrade_aboard && self.current_round == 3)
            || (self.current_round > 2 && self.rounds_lost < 3)
            || self.current_round == 2
            || self.current_round > 3
    }

    fn vote_outcome(&mut self, _team: &Team, _leader: PlayerId, votes: &[bool]) {
        self.reluctance.observe(votes);
    }

    fn mission_outcome(&mut self, team: &Team, leader: PlayerId, fails: u8, success: bool) {
        if self.is_spy {
            return;
        }
        self.tally.observe_mission(team, leader, fails, success);
    }

    fn round_outcome(&mut self, rounds_complete: u8, rounds_lost: u8) {
        self.rounds_lost = rounds_lost;
        self.current_round = (rounds_complete + 1).min(ROUNDS as u8);
        self.reluctance.reset();
    }

    fn game_outcome(&mut self, _rounds_lost: u8, _spies: &[PlayerId]) {}

    fn suspected_spies(&self) -> Vec<PlayerId> {
        if self.is_spy {
            return Vec::new();
        }
        self.tally.suspected_spies()
    }
}

//! The probabilistic policy: proposes and votes from a Bayesian suspicion
//! posterior when resistance, plays a collaborator-aware schedule when spy.

use crate::belief::SuspicionTracker;
use crate::policy::{NORMAL_SUSPICION_LIMIT, PARANOID_SUSPICION_LIMIT, Reluctance};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use resistance_core::agent::Agent;
use resistance_core::model::player::PlayerId;
use resistance_core::model::rules::ROUNDS;
use resistance_core::model::team::Team;
use tracing::{Level, event};

pub struct BayesianAgent {
    name: String,
    num_players: usize,
    own_id: PlayerId,
    is_spy: bool,
    comrades: Vec<PlayerId>,
    suspicion: SuspicionTracker,
    reluctance: Reluctance,
    current_round: u8,
    rounds_lost: u8,
    rng: SmallRng,
}

impl BayesianAgent {
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        let own_id = PlayerId::from_index(0).expect("index 0 in roster");
        Self {
            name: name.into(),
            num_players: 0,
            own_id,
            is_spy: false,
            comrades: Vec::new(),
            suspicion: SuspicionTracker::new(resistance_core::model::rules::MIN_PLAYERS, own_id),
            reluctance: Reluctance::default(),
            current_round: 1,
            rounds_lost: 0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    fn paranoid(&self) -> bool {
        self.current_round >= 2 && self.rounds_lost >= 2
    }

    fn comrade_aboard(&self, team: &Team) -> bool {
        team.members()
            .iter()
            .any(|&m| m != self.own_id && self.comrades.contains(&m))
    }

    fn propose_as_spy(&mut self, team_size: usize, fails_required: u8) -> Team {
        let mut picked = vec![false; self.num_players];
        let mut members = Vec::with_capacity(team_size);
        let mut add = |members: &mut Vec<PlayerId>, picked: &mut Vec<bool>, id: PlayerId| {
            if !picked[id.index()] && members.len() < team_size {
                picked[id.index()] = true;
                members.push(id);
            }
        };

        // A two-fail round needs two betrayers aboard.
        if fails_required > 1 {
            let comrades = self.comrades.clone();
            for &comrade in comrades.iter().take(fails_required as usize) {
                add(&mut members, &mut picked, comrade);
            }
        }
        if self.current_round > 2 && self.rounds_lost < 2 {
            add(&mut members, &mut picked, self.own_id);
        }
        while members.len() < team_size {
            let candidate = self.rng.gen_range(0..self.num_players);
            let id = PlayerId::from_index(candidate).expect("sampled index in roster");
            add(&mut members, &mut picked, id);
        }
        Team::new(members)
    }

    fn propose_as_resistance(&self, team_size: usize) -> Team {
        let mut members = Vec::with_capacity(team_size);
        members.push(self.own_id);
        members.extend(self.suspicion.least_suspicious(team_size - 1));
        Team::new(members)
    }

    #[cfg(test)]
    pub(crate) fn suspicion_mut(&mut self) -> &mut SuspicionTracker {
        &mut self.suspicion
    }
}

impl Agent for BayesianAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn new_game(&mut self, num_players: usize, own_id: PlayerId, spies: &[PlayerId]) {
        self.num_players = num_players;
        self.own_id = own_id;
        self.is_spy = !spies.is_empty();
        self.comrades = spies.to_vec();
        self.suspicion = SuspicionTracker::new(num_players, own_id);
        self.reluctance = Reluctance::default();
        self.current_round = 1;
        self.rounds_lost = 0;
    }

    fn propose_team(&mut self, team_size: usize, fails_required: u8) -> Team {
        let team = if self.is_spy {
            self.propose_as_spy(team_size, fails_required)
        } else {
            self.propose_as_resistance(team_size)
        };
        log_proposal(self, &team);
        team
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
        let paranoid = self.paranoid();
        if paranoid && leader == self.own_id {
            return true;
        }
        let limit = if paranoid {
            PARANOID_SUSPICION_LIMIT
        } else {
            NORMAL_SUSPICION_LIMIT
        };
        let approve = team
            .members()
            .iter()
            .all(|&m| m == self.own_id || self.suspicion.score(m) <= limit);
        log_vote(self, team, leader, limit, approve);
        approve
    }

    fn betray(&mut self, team: &Team, _leader: PlayerId) -> bool {
        let comrade_aboard = self.comrade_aboard(team);
        if self.num_players == 5 {
            // Round 1 stays quiet; round 3 only without cover.
            (!comrade_aboard && self.current_round == 3)
                || (self.current_round > 2 && self.rounds_lost < 3)
                || self.current_round == 2
                || self.current_round > 3
        } else {
            (self.current_round > 2 && self.rounds_lost < 3) || self.current_round == 2
        }
    }

    fn vote_outcome(&mut self, _team: &Team, _leader: PlayerId, votes: &[bool]) {
        self.reluctance.observe(votes);
    }

    fn mission_outcome(&mut self, team: &Team, leader: PlayerId, fails: u8, success: bool) {
        if self.is_spy {
            return;
        }
        self.suspicion
            .observe_mission(self.current_round, team, leader, fails, success);
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
        self.suspicion.suspected_spies()
    }
}

fn log_proposal(agent: &BayesianAgent, team: &Team) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    event!(
        target: "resistance_bot::propose",
        Level::DEBUG,
        name = %agent.name,
        round = agent.current_round,
        spy = agent.is_spy,
        team = %team,
    );
}

fn log_vote(agent: &BayesianAgent, team: &Team, leader: PlayerId, limit: f64, approve: bool) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    event!(
        target: "resistance_bot::vote",
        Level::DEBUG,
        name = %agent.name,
        round = agent.current_round,
        leader = %leader,
        team = %team,
        limit,
        approve,
    );
}

//! Uniform-random baseline. Useful as tournament filler and as a control
//! strategy when measuring how much the belief models actually buy.

use crate::policy::Reluctance;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use resistance_core::agent::Agent;
use resistance_core::model::player::PlayerId;
use resistance_core::model::team::Team;

pub struct RandomAgent {
    name: String,
    num_players: usize,
    reluctance: Reluctance,
    rng: SmallRng,
}

impl RandomAgent {
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            num_players: 0,
            reluctance: Reluctance::default(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn new_game(&mut self, num_players: usize, _own_id: PlayerId, _spies: &[PlayerId]) {
        self.num_players = num_players;
        self.reluctance = Reluctance::default();
    }

    fn propose_team(&mut self, team_size: usize, _fails_required: u8) -> Team {
        Team::random(&mut self.rng, self.num_players, team_size)
    }

    fn vote(&mut self, _team: &Team, _leader: PlayerId) -> bool {
        self.reluctance.must_approve() || self.rng.gen_bool(0.5)
    }

    fn betray(&mut self, _team: &Team, _leader: PlayerId) -> bool {
        self.rng.gen_bool(0.5)
    }

    fn vote_outcome(&mut self, _team: &Team, _leader: PlayerId, votes: &[bool]) {
        self.reluctance.observe(votes);
    }

    fn mission_outcome(&mut self, _team: &Team, _leader: PlayerId, _fails: u8, _success: bool) {}

    fn round_outcome(&mut self, _rounds_complete: u8, _rounds_lost: u8) {
        self.reluctance.reset();
    }

    fn game_outcome(&mut self, _rounds_lost: u8, _spies: &[PlayerId]) {}
}

#[cfg(test)]
mod tests {
    use super::RandomAgent;
    use resistance_core::agent::Agent;
    use resistance_core::model::player::PlayerId;
    use resistance_core::model::team::Team;

    #[test]
    fn proposals_are_always_valid() {
        let mut agent = RandomAgent::new("rng", 3);
        agent.new_game(8, PlayerId::from_index(2).unwrap(), &[]);
        for _ in 0..25 {
            let team = agent.propose_team(4, 1);
            assert!(team.is_valid(8, 4));
        }
    }

    #[test]
    fn forced_approval_overrides_the_coin_flip() {
        let mut agent = RandomAgent::new("rng", 3);
        agent.new_game(5, PlayerId::from_index(0).unwrap(), &[]);
        let team = Team::new(vec![PlayerId::from_index(1).unwrap()]);
        for _ in 0..4 {
            agent.vote_outcome(&team, PlayerId::from_index(1).unwrap(), &[false; 5]);
        }
        for _ in 0..20 {
            assert!(agent.vote(&team, PlayerId::from_index(1).unwrap()));
        }
    }
}

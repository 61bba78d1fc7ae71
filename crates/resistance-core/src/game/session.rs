use crate::agent::Agent;
use crate::game::transcript::TranscriptSink;
use crate::model::player::PlayerId;
use crate::model::round::RoundState;
use crate::model::rules::{MAX_PLAYERS, MIN_PLAYERS, ROUNDS, spy_count};
use crate::model::team::Team;
use core::fmt;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::seq::index::sample;
use rand::SeedableRng;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Decision calls slower than this are flagged in the transcript. Purely an
/// observability concern; the game never aborts on a slow call.
const DECISION_BUDGET: Duration = Duration::from_secs(1);

/// A single game of The Resistance: a shuffled roster, a hidden spy set fixed
/// at construction, and five rounds driven to resolution by [`run`].
///
/// [`run`]: GameSession::run
pub struct GameSession {
    agents: Vec<Box<dyn Agent>>,
    num_players: usize,
    spies: Vec<PlayerId>,
    is_spy: Vec<bool>,
    leader: usize,
    rounds: Vec<RoundState>,
    rng: SmallRng,
    seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    TooFewPlayers { found: usize },
    TooManyPlayers { found: usize },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::TooFewPlayers { found } => {
                write!(f, "at least {MIN_PLAYERS} participants required, got {found}")
            }
            GameError::TooManyPlayers { found } => {
                write!(f, "at most {MAX_PLAYERS} participants supported, got {found}")
            }
        }
    }
}

impl std::error::Error for GameError {}

/// Final scoreboard of a completed game.
#[derive(Debug, Clone, Serialize)]
pub struct GameOutcome {
    pub seed: u64,
    pub rounds_won: u8,
    pub rounds_lost: u8,
    pub spies: Vec<PlayerId>,
    pub resistance_won: bool,
}

impl GameOutcome {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("outcome serializes")
    }
}

impl GameSession {
    /// Sets up a game with a random seed. See [`GameSession::with_seed`].
    pub fn new(agents: Vec<Box<dyn Agent>>) -> Result<Self, GameError> {
        Self::with_seed(agents, rand::random())
    }

    /// Shuffles the roster, draws the spy set, and initializes every
    /// participant exactly once. Spies receive the full spy list; everyone
    /// else an empty one. All randomness flows from `seed`.
    pub fn with_seed(mut agents: Vec<Box<dyn Agent>>, seed: u64) -> Result<Self, GameError> {
        let num_players = agents.len();
        if num_players < MIN_PLAYERS {
            return Err(GameError::TooFewPlayers { found: num_players });
        }
        if num_players > MAX_PLAYERS {
            return Err(GameError::TooManyPlayers { found: num_players });
        }

        let mut rng = SmallRng::seed_from_u64(seed);
        agents.shuffle(&mut rng);

        let mut spies: Vec<PlayerId> = sample(&mut rng, num_players, spy_count(num_players))
            .iter()
            .map(|i| PlayerId::from_index(i).expect("spy index in roster"))
            .collect();
        spies.sort();

        let mut is_spy = vec![false; num_players];
        for spy in &spies {
            is_spy[spy.index()] = true;
        }

        for (index, agent) in agents.iter_mut().enumerate() {
            let own_id = PlayerId::from_index(index).expect("agent index in roster");
            let roles: &[PlayerId] = if is_spy[index] { &spies } else { &[] };
            agent.new_game(num_players, own_id, roles);
        }

        Ok(Self {
            agents,
            num_players,
            spies,
            is_spy,
            leader: 0,
            rounds: Vec::new(),
            rng,
            seed,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn num_players(&self) -> usize {
        self.num_players
    }

    pub fn spies(&self) -> &[PlayerId] {
        &self.spies
    }

    pub fn agent(&self, index: usize) -> &dyn Agent {
        self.agents[index].as_ref()
    }

    /// Rounds resolved so far; all five after [`run`](GameSession::run).
    pub fn rounds(&self) -> &[RoundState] {
        &self.rounds
    }

    /// Plays all five rounds to completion, broadcasting every outcome event
    /// in participant-index order, and reports the result to every
    /// participant before returning.
    pub fn run(&mut self, sink: &mut dyn TranscriptSink) -> GameOutcome {
        sink.line(&format!("Seed: {}", self.seed));
        sink.line("Game set up. Spies allocated.");

        let mut rounds_won = 0u8;
        for number in 1..=ROUNDS as u8 {
            let round = self.play_round(number, sink);
            if round.successful() {
                rounds_won += 1;
            }
            let rounds_lost = number - rounds_won;
            sink.line(&format!(
                "Resistance {} round {number}.",
                if round.successful() { "won" } else { "lost" }
            ));
            sink.line(&format!("{rounds_won} rounds of {number} successful."));
            for agent in &mut self.agents {
                agent.round_outcome(number, rounds_lost);
            }
            self.rounds.push(round);
        }

        let rounds_lost = ROUNDS as u8 - rounds_won;
        for agent in &mut self.agents {
            agent.game_outcome(rounds_lost, &self.spies);
        }

        let resistance_won = rounds_won > rounds_lost;
        sink.line(&format!(
            "Game complete: Resistance {}.",
            if resistance_won { "successful" } else { "failed" }
        ));
        sink.line(&format!("The spies were: {}.", Team::new(self.spies.clone())));

        GameOutcome {
            seed: self.seed,
            rounds_won,
            rounds_lost,
            spies: self.spies.clone(),
            resistance_won,
        }
    }

    fn play_round(&mut self, number: u8, sink: &mut dyn TranscriptSink) -> RoundState {
        let mut round = RoundState::new(self.num_players, number);
        while !round.is_resolved() {
            self.play_mission(&mut round, sink);
        }
        round
    }

    /// One proposal/vote/(execute) cycle. The leader rotates on every
    /// proposal, approved or not.
    fn play_mission(&mut self, round: &mut RoundState, sink: &mut dyn TranscriptSink) {
        let leader_index = self.leader;
        let leader = PlayerId::from_index(leader_index).expect("leader in roster");
        self.leader = (self.leader + 1) % self.num_players;

        let size = round.team_size();
        let fails_required = round.fails_required();

        let started = Instant::now();
        let proposed = self.agents[leader_index].propose_team(size, fails_required);
        flag_slow(sink, leader, "propose", started.elapsed());

        let (team, substituted) = if proposed.is_valid(self.num_players, size) {
            (proposed, false)
        } else {
            sink.line(&format!("Invalid team {proposed} proposed by {leader}."));
            let replacement = Team::random(&mut self.rng, self.num_players, size);
            sink.line("Random team substituted.");
            (replacement, true)
        };

        round
            .propose(leader, team.clone(), substituted)
            .expect("round accepts proposal");
        sink.line(&format!(
            "Round {} attempt {}: team {team} proposed by {leader}.",
            round.number(),
            round.attempt()
        ));

        let mut votes = Vec::with_capacity(self.num_players);
        for (index, agent) in self.agents.iter_mut().enumerate() {
            let started = Instant::now();
            let vote = agent.vote(&team, leader);
            flag_slow(
                sink,
                PlayerId::from_index(index).expect("voter in roster"),
                "vote",
                started.elapsed(),
            );
            votes.push(vote);
        }

        for agent in &mut self.agents {
            agent.vote_outcome(&team, leader, &votes);
        }

        let ayes = votes
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .map(|(i, _)| i.to_string())
            .collect::<Vec<_>>()
            .join(" ");

        let approved = round.record_votes(votes).expect("round accepts votes");
        if !approved {
            sink.line(&format!("Team rejected, votes for: {ayes}."));
            return;
        }
        sink.line(&format!("Team approved, votes for: {ayes}."));

        let mut fails = 0u8;
        for &member in team.members() {
            if !self.is_spy[member.index()] {
                continue;
            }
            let started = Instant::now();
            let betrayed = self.agents[member.index()].betray(&team, leader);
            flag_slow(sink, member, "betray", started.elapsed());
            if betrayed {
                fails += 1;
            }
        }

        let success = round.record_execution(fails).expect("round accepts execution");
        for agent in &mut self.agents {
            agent.mission_outcome(&team, leader, fails, success);
        }
        sink.line(&format!(
            "Mission {} with {fails} fails.",
            if success { "succeeded" } else { "failed" }
        ));
    }
}

fn flag_slow(sink: &mut dyn TranscriptSink, player: PlayerId, action: &str, elapsed: Duration) {
    if elapsed > DECISION_BUDGET {
        sink.line(&format!(
            "Player {player} exceeded the decision budget on {action}: {}ms.",
            elapsed.as_millis()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::{GameError, GameSession};
    use crate::agent::Agent;
    use crate::game::transcript::MemorySink;
    use crate::model::player::PlayerId;
    use crate::model::round::MAX_ATTEMPTS;
    use crate::model::rules::spy_count;
    use crate::model::team::Team;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Deterministic scripted participant used to drive the orchestrator.
    #[derive(Default)]
    struct Script {
        approve: bool,
        approve_when_forced_only: bool,
        betray: bool,
        propose_wrong_size: bool,
    }

    #[derive(Default)]
    struct Observed {
        num_players: usize,
        own: Option<PlayerId>,
        spy_list: Vec<PlayerId>,
        missions_seen: usize,
        rounds_seen: usize,
        game_outcomes: usize,
    }

    struct Scripted {
        script: Script,
        observed: Rc<RefCell<Observed>>,
        rejections: u8,
    }

    impl Scripted {
        fn boxed(script: Script) -> (Box<dyn Agent>, Rc<RefCell<Observed>>) {
            let observed = Rc::new(RefCell::new(Observed::default()));
            let agent = Scripted {
                script,
                observed: Rc::clone(&observed),
                rejections: 0,
            };
            (Box::new(agent), observed)
        }
    }

    impl Agent for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn new_game(&mut self, num_players: usize, own_id: PlayerId, spies: &[PlayerId]) {
            let mut observed = self.observed.borrow_mut();
            observed.num_players = num_players;
            observed.own = Some(own_id);
            observed.spy_list = spies.to_vec();
            self.rejections = 0;
        }

        fn propose_team(&mut self, team_size: usize, _fails_required: u8) -> Team {
            let size = if self.script.propose_wrong_size {
                team_size + 1
            } else {
                team_size
            };
            let n = self.observed.borrow().num_players;
            Team::new((0..size.min(n)).filter_map(PlayerId::from_index).collect())
        }

        fn vote(&mut self, _team: &Team, _leader: PlayerId) -> bool {
            if self.script.approve_when_forced_only {
                return self.rejections >= MAX_ATTEMPTS - 1;
            }
            self.script.approve
        }

        fn betray(&mut self, _team: &Team, _leader: PlayerId) -> bool {
            self.script.betray
        }

        fn vote_outcome(&mut self, _team: &Team, _leader: PlayerId, votes: &[bool]) {
            let ayes = votes.iter().filter(|v| **v).count();
            if 2 * ayes > votes.len() {
                self.rejections = 0;
            } else {
                self.rejections += 1;
            }
        }

        fn mission_outcome(&mut self, _t: &Team, _l: PlayerId, _f: u8, _s: bool) {
            self.observed.borrow_mut().missions_seen += 1;
        }

        fn round_outcome(&mut self, _complete: u8, _lost: u8) {
            self.observed.borrow_mut().rounds_seen += 1;
        }

        fn game_outcome(&mut self, _lost: u8, _spies: &[PlayerId]) {
            self.observed.borrow_mut().game_outcomes += 1;
        }
    }

    fn roster(count: usize, script: impl Fn() -> Script) -> (Vec<Box<dyn Agent>>, Vec<Rc<RefCell<Observed>>>) {
        let mut agents = Vec::new();
        let mut observers = Vec::new();
        for _ in 0..count {
            let (agent, observed) = Scripted::boxed(script());
            agents.push(agent);
            observers.push(observed);
        }
        (agents, observers)
    }

    fn approving() -> Script {
        Script {
            approve: true,
            ..Script::default()
        }
    }

    #[test]
    fn too_few_players_is_a_construction_error() {
        let (agents, _) = roster(4, approving);
        assert_eq!(
            GameSession::with_seed(agents, 1).err(),
            Some(GameError::TooFewPlayers { found: 4 })
        );
    }

    #[test]
    fn assigns_exactly_the_tabled_number_of_spies() {
        for n in 5..=10 {
            let (agents, observers) = roster(n, approving);
            let session = GameSession::with_seed(agents, 42).unwrap();
            assert_eq!(session.spies().len(), spy_count(n));

            let informed = observers
                .iter()
                .filter(|o| !o.borrow().spy_list.is_empty())
                .count();
            assert_eq!(informed, spy_count(n), "only spies see the spy list");
            for observer in &observers {
                let observed = observer.borrow();
                if !observed.spy_list.is_empty() {
                    assert!(observed.spy_list.contains(&observed.own.unwrap()));
                    assert_eq!(observed.spy_list.len(), spy_count(n));
                }
            }
        }
    }

    #[test]
    fn full_game_plays_five_rounds_and_notifies_everyone() {
        let (agents, observers) = roster(5, approving);
        let mut session = GameSession::with_seed(agents, 7).unwrap();
        let mut sink = MemorySink::new();
        let outcome = session.run(&mut sink);

        assert_eq!(session.rounds().len(), 5);
        assert_eq!(outcome.rounds_won + outcome.rounds_lost, 5);
        for observer in &observers {
            let observed = observer.borrow();
            assert_eq!(observed.rounds_seen, 5);
            assert_eq!(observed.game_outcomes, 1);
            assert_eq!(observed.missions_seen, 5, "one approved mission per round");
        }
        assert!(sink.lines().iter().any(|l| l.starts_with("Seed: ")));
    }

    #[test]
    fn no_betrayals_means_resistance_sweep() {
        let (agents, _) = roster(5, approving);
        let mut session = GameSession::with_seed(agents, 11).unwrap();
        let outcome = session.run(&mut crate::game::transcript::NullSink);
        assert_eq!(outcome.rounds_won, 5);
        assert!(outcome.resistance_won);
    }

    #[test]
    fn spies_that_always_betray_fail_every_round() {
        let (agents, _) = roster(5, || Script {
            approve: true,
            betray: true,
            ..Script::default()
        });
        let mut session = GameSession::with_seed(agents, 13).unwrap();
        let outcome = session.run(&mut crate::game::transcript::NullSink);

        for round in session.rounds() {
            let mission = round.deciding_mission().expect("all teams approved");
            let spies_aboard = mission
                .team()
                .members()
                .iter()
                .filter(|id| outcome.spies.contains(id))
                .count() as u8;
            assert_eq!(round.successful(), spies_aboard < mission.fails_required());
        }
    }

    #[test]
    fn reluctant_voters_force_resolution_on_fifth_attempt() {
        let (agents, _) = roster(5, || Script {
            approve_when_forced_only: true,
            ..Script::default()
        });
        let mut session = GameSession::with_seed(agents, 23).unwrap();
        let mut sink = MemorySink::new();
        session.run(&mut sink);

        for round in session.rounds() {
            assert!(round.is_resolved());
            assert_eq!(round.missions().len(), 5);
            let deciding = round.deciding_mission().expect("fifth attempt approved");
            assert!(deciding.approved());
        }
    }

    #[test]
    fn invalid_proposals_are_substituted_and_logged() {
        let (agents, _) = roster(5, || Script {
            approve: true,
            propose_wrong_size: true,
            ..Script::default()
        });
        let mut session = GameSession::with_seed(agents, 31).unwrap();
        let mut sink = MemorySink::new();
        let outcome = session.run(&mut sink);

        assert!(sink.lines().iter().any(|l| l == "Random team substituted."));
        assert_eq!(outcome.rounds_won + outcome.rounds_lost, 5);
    }

    #[test]
    fn identical_seeds_replay_identically() {
        let run = |seed| {
            let (agents, _) = roster(6, approving);
            let mut session = GameSession::with_seed(agents, seed).unwrap();
            let mut sink = MemorySink::new();
            let outcome = session.run(&mut sink);
            (outcome, sink.lines().to_vec())
        };

        let (first, first_lines) = run(99);
        let (second, second_lines) = run(99);
        assert_eq!(first.spies, second.spies);
        assert_eq!(first.rounds_won, second.rounds_won);
        assert_eq!(first_lines, second_lines);
    }
}

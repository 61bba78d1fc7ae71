use crate::model::player::PlayerId;
use crate::model::rules::majority_approves;
use crate::model::team::Team;
use serde::Serialize;

/// One completed propose/vote/(execute) cycle. Records are immutable once the
/// round commits them.
#[derive(Debug, Clone, Serialize)]
pub struct MissionRecord {
    leader: PlayerId,
    team: Team,
    substituted: bool,
    votes: Vec<bool>,
    fails_required: u8,
    /// Betrayal count; `None` when the proposal was rejected and never executed.
    fails: Option<u8>,
}

impl MissionRecord {
    pub fn new(
        leader: PlayerId,
        team: Team,
        substituted: bool,
        votes: Vec<bool>,
        fails_required: u8,
        fails: Option<u8>,
    ) -> Self {
        Self {
            leader,
            team,
            substituted,
            votes,
            fails_required,
            fails,
        }
    }

    pub fn leader(&self) -> PlayerId {
        self.leader
    }

    pub fn team(&self) -> &Team {
        &self.team
    }

    /// Whether the leader's proposal was replaced by a random valid team.
    pub fn substituted(&self) -> bool {
        self.substituted
    }

    pub fn votes(&self) -> &[bool] {
        &self.votes
    }

    pub fn approved(&self) -> bool {
        majority_approves(&self.votes)
    }

    pub fn fails(&self) -> Option<u8> {
        self.fails
    }

    pub fn fails_required(&self) -> u8 {
        self.fails_required
    }

    /// True iff the mission was approved, executed, and saw fewer betrayals
    /// than required to fail it.
    pub fn succeeded(&self) -> bool {
        match self.fails {
            Some(fails) => self.approved() && fails < self.fails_required,
            None => false,
        }
    }
}

use crate::model::mission::MissionRecord;
use crate::model::player::PlayerId;
use crate::model::rules::{fails_required, majority_approves, team_size};
use crate::model::team::Team;

pub const MAX_ATTEMPTS: u8 = 5;

/// Where a round currently sits in its proposal/vote/execute cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Proposing { attempt: u8 },
    Voting { attempt: u8 },
    Executing,
    Resolved,
}

/// State machine for one of the five scoring rounds. A round accepts up to
/// five proposals; the first approved mission decides it, and a rejection on
/// the fifth attempt resolves it as failed (the voting contract makes that
/// unreachable in practice). Once `Resolved`, the record is immutable.
#[derive(Debug, Clone)]
pub struct RoundState {
    number: u8,
    team_size: usize,
    fails_required: u8,
    phase: RoundPhase,
    pending: Option<PendingMission>,
    missions: Vec<MissionRecord>,
    success: Option<bool>,
}

#[derive(Debug, Clone)]
struct PendingMission {
    leader: PlayerId,
    team: Team,
    substituted: bool,
    votes: Vec<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundError {
    NotProposing,
    NotVoting,
    NotExecuting,
}

impl RoundState {
    pub fn new(num_players: usize, number: u8) -> Self {
        Self {
            number,
            team_size: team_size(num_players, number),
            fails_required: fails_required(num_players, number),
            phase: RoundPhase::Proposing { attempt: 1 },
            pending: None,
            missions: Vec::new(),
            success: None,
        }
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn team_size(&self) -> usize {
        self.team_size
    }

    pub fn fails_required(&self) -> u8 {
        self.fails_required
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// The attempt currently in flight (1-based).
    pub fn attempt(&self) -> u8 {
        match self.phase {
            RoundPhase::Proposing { attempt } | RoundPhase::Voting { attempt } => attempt,
            RoundPhase::Executing | RoundPhase::Resolved => self.missions.len() as u8 + 1,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.phase, RoundPhase::Resolved)
    }

    /// True only once the round has resolved with a successful mission.
    pub fn successful(&self) -> bool {
        self.success.unwrap_or(false)
    }

    pub fn missions(&self) -> &[MissionRecord] {
        &self.missions
    }

    /// The approved mission that decided the round, if one was approved.
    pub fn deciding_mission(&self) -> Option<&MissionRecord> {
        self.missions.iter().find(|m| m.approved())
    }

    pub fn propose(
        &mut self,
        leader: PlayerId,
        team: Team,
        substituted: bool,
    ) -> Result<(), RoundError> {
        let attempt = match self.phase {
            RoundPhase::Proposing { attempt } => attempt,
            _ => return Err(RoundError::NotProposing),
        };
        self.pending = Some(PendingMission {
            leader,
            team,
            substituted,
            votes: Vec::new(),
        });
        self.phase = RoundPhase::Voting { attempt };
        Ok(())
    }

    /// Commits the full vote vector. Returns whether the team was approved;
    /// on rejection the round either re-enters proposal or, on the fifth
    /// attempt, resolves as failed.
    pub fn record_votes(&mut self, votes: Vec<bool>) -> Result<bool, RoundError> {
        let attempt = match self.phase {
            RoundPhase::Voting { attempt } => attempt,
            _ => return Err(RoundError::NotVoting),
        };
        let pending = self.pending.as_mut().expect("pending mission while voting");
        pending.votes = votes;
        let approved = majority_approves(&pending.votes);

        if approved {
            self.phase = RoundPhase::Executing;
        } else {
            self.commit_pending(None);
            if attempt >= MAX_ATTEMPTS {
                self.success = Some(false);
                self.phase = RoundPhase::Resolved;
            } else {
                self.phase = RoundPhase::Proposing {
                    attempt: attempt + 1,
                };
            }
        }
        Ok(approved)
    }

    /// Commits the betrayal count of the approved mission and resolves the
    /// round. Returns whether the mission succeeded.
    pub fn record_execution(&mut self, fails: u8) -> Result<bool, RoundError> {
        if self.phase != RoundPhase::Executing {
            return Err(RoundError::NotExecuting);
        }
        let success = fails < self.fails_required;
        self.commit_pending(Some(fails));
        self.success = Some(success);
        self.phase = RoundPhase::Resolved;
        Ok(success)
    }

    fn commit_pending(&mut self, fails: Option<u8>) {
        let pending = self.pending.take().expect("pending mission to commit");
        self.missions.push(MissionRecord::new(
            pending.leader,
            pending.team,
            pending.substituted,
            pending.votes,
            self.fails_required,
            fails,
        ));
    }
}

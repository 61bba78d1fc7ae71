//! The participant capability set. The game orchestrator depends only on this
//! trait; spy and resistance strategies alike live behind it.

use crate::model::player::PlayerId;
use crate::model::round::MAX_ATTEMPTS;
use crate::model::team::Team;

/// Consecutive prior rejections after which every participant must vote to
/// approve, guaranteeing the fifth proposal of a round passes.
pub const FORCED_APPROVAL_REJECTIONS: u8 = MAX_ATTEMPTS - 1;

/// A decision-making participant, spy or resistance, of any strategy.
///
/// Contract notes independent of strategy:
/// - `new_game` is called exactly once per game, before any other call. The
///   spy list is non-empty if and only if the participant is itself a spy.
/// - `betray` is only consulted for spies that are on the executed team; other
///   implementations may return anything.
/// - every participant must vote `true` once five consecutive proposals have
///   been rejected in the current round, which bounds a round at five
///   attempts. Implementations track this from `vote_outcome`.
pub trait Agent {
    fn name(&self) -> &str;

    /// Resets all per-game state and assigns roles.
    fn new_game(&mut self, num_players: usize, own_id: PlayerId, spies: &[PlayerId]);

    /// Called when this participant leads: produce a team of exactly
    /// `team_size` distinct ids. Invalid teams are substituted by the game.
    fn propose_team(&mut self, team_size: usize, fails_required: u8) -> Team;

    /// Approve (`true`) or reject the proposed team.
    fn vote(&mut self, team: &Team, leader: PlayerId) -> bool;

    /// A spy's choice to fail the mission it is on.
    fn betray(&mut self, team: &Team, leader: PlayerId) -> bool;

    /// Full vote vector broadcast after every proposal, approved or not.
    fn vote_outcome(&mut self, team: &Team, leader: PlayerId, votes: &[bool]);

    /// Broadcast after an approved mission executes.
    fn mission_outcome(&mut self, team: &Team, leader: PlayerId, fails: u8, success: bool);

    /// Broadcast after each round resolves.
    fn round_outcome(&mut self, rounds_complete: u8, rounds_lost: u8);

    /// Broadcast once after round five, revealing the true spies.
    fn game_outcome(&mut self, rounds_lost: u8, spies: &[PlayerId]);

    /// Ranked end-of-game spy guess, most suspicious first. Used only for
    /// post-hoc analysis; spies and baselines may return an empty guess.
    fn suspected_spies(&self) -> Vec<PlayerId> {
        Vec::new()
    }
}

//! Fixed rule tables for The Resistance: spy counts, mission team sizes, and
//! required fail counts, all keyed by player count and round number.

pub const MIN_PLAYERS: usize = 5;
pub const MAX_PLAYERS: usize = 10;
pub const ROUNDS: usize = 5;

/// SPY_NUM[n - 5] is the number of spies in an n-player game.
const SPY_NUM: [usize; 6] = [2, 2, 3, 3, 3, 4];

/// TEAM_SIZE[n - 5][r - 1] is the team size for round r in an n-player game.
const TEAM_SIZE: [[usize; ROUNDS]; 6] = [
    [2, 3, 2, 3, 3],
    [2, 3, 4, 3, 4],
    [2, 3, 3, 4, 4],
    [3, 4, 4, 5, 5],
    [3, 4, 4, 5, 5],
    [3, 4, 4, 5, 5],
];

pub fn spy_count(num_players: usize) -> usize {
    assert_player_count(num_players);
    SPY_NUM[num_players - MIN_PLAYERS]
}

/// Team size for `round` (1-based) in a `num_players` game.
pub fn team_size(num_players: usize, round: u8) -> usize {
    assert_player_count(num_players);
    assert_round(round);
    TEAM_SIZE[num_players - MIN_PLAYERS][round as usize - 1]
}

/// Betrayals needed to fail the mission: 2 only on round 3 of 7+ player games.
pub fn fails_required(num_players: usize, round: u8) -> u8 {
    assert_player_count(num_players);
    assert_round(round);
    if num_players > 6 && round == 3 { 2 } else { 1 }
}

/// Strict majority of `true` votes approves; ties reject.
pub fn majority_approves(votes: &[bool]) -> bool {
    let ayes = votes.iter().filter(|v| **v).count();
    2 * ayes > votes.len()
}

fn assert_player_count(num_players: usize) {
    assert!(
        (MIN_PLAYERS..=MAX_PLAYERS).contains(&num_players),
        "player count {num_players} outside {MIN_PLAYERS}..={MAX_PLAYERS}"
    );
}

fn assert_round(round: u8) {
    assert!(
        (1..=ROUNDS as u8).contains(&round),
        "round {round} outside 1..={ROUNDS}"
    );
}

#[cfg(test)]
mod tests {
    use super::{fails_required, majority_approves, spy_count, team_size};

    #[test]
    fn spy_counts_match_fixed_table() {
        let expected = [(5, 2), (6, 2), (7, 3), (8, 3), (9, 3), (10, 4)];
        for (n, spies) in expected {
            assert_eq!(spy_count(n), spies, "{n} players");
        }
    }

    #[test]
    fn two_fails_required_only_on_round_three_of_large_games() {
        for n in 5..=10 {
            for round in 1..=5 {
                let expected = if n > 6 && round == 3 { 2 } else { 1 };
                assert_eq!(fails_required(n, round), expected, "n={n} r={round}");
            }
        }
    }

    #[test]
    fn team_sizes_are_within_roster_and_round_one_is_smallest() {
        for n in 5..=10 {
            for round in 1..=5 {
                let size = team_size(n, round);
                assert!(size >= 2 && size < n, "n={n} r={round} size={size}");
                assert!(team_size(n, 1) <= size);
            }
        }
    }

    #[test]
    fn majority_requires_strictly_more_than_half() {
        assert!(!majority_approves(&[true, true, false, false, false]));
        assert!(majority_approves(&[true, true, true, false, false]));
        // Even roster: a tie is a rejection.
        assert!(!majority_approves(&[true, true, true, false, false, false]));
    }

    #[test]
    fn approval_is_monotonic_in_single_votes() {
        for n in 5..=10usize {
            for ayes in 0..n {
                let mut votes = vec![false; n];
                for v in votes.iter_mut().take(ayes) {
                    *v = true;
                }
                let before = majority_approves(&votes);
                votes[ayes] = true;
                let after = majority_approves(&votes);
                assert!(!before || after, "flipping a vote to true revoked approval");
            }
        }
    }

    #[test]
    #[should_panic]
    fn rejects_out_of_range_player_count() {
        spy_count(4);
    }
}

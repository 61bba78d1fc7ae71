use crate::model::player::PlayerId;
use core::fmt;
use rand::Rng;
use rand::seq::index::sample;
use serde::{Deserialize, Serialize};

/// A proposed mission team: a set of distinct participant ids. Membership is
/// what matters; the stored order is the proposer's and is preserved for logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    members: Vec<PlayerId>,
}

impl Team {
    pub fn new(members: Vec<PlayerId>) -> Self {
        Self { members }
    }

    /// A uniformly random valid team, used to substitute invalid proposals.
    pub fn random(rng: &mut impl Rng, num_players: usize, size: usize) -> Self {
        let members = sample(rng, num_players, size)
            .iter()
            .map(|i| PlayerId::from_index(i).expect("sampled index in roster"))
            .collect();
        Self { members }
    }

    /// Checks the team shape against the game: exactly `expected_size` distinct
    /// ids, all within `[0, num_players)`.
    pub fn is_valid(&self, num_players: usize, expected_size: usize) -> bool {
        if self.members.len() != expected_size {
            return false;
        }
        let mut seen = [false; crate::model::rules::MAX_PLAYERS];
        for id in &self.members {
            let idx = id.index();
            if idx >= num_players || seen[idx] {
                return false;
            }
            seen[idx] = true;
        }
        true
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.members.contains(&id)
    }

    pub fn members(&self) -> &[PlayerId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, id) in self.members.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{id}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::Team;
    use crate::model::player::PlayerId;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn team(ids: &[usize]) -> Team {
        Team::new(ids.iter().map(|&i| PlayerId::from_index(i).unwrap()).collect())
    }

    #[test]
    fn valid_team_passes_checks() {
        assert!(team(&[0, 2, 4]).is_valid(5, 3));
    }

    #[test]
    fn wrong_size_is_invalid() {
        assert!(!team(&[0, 2]).is_valid(5, 3));
        assert!(!team(&[0, 1, 2, 3]).is_valid(5, 3));
    }

    #[test]
    fn duplicate_member_is_invalid() {
        assert!(!team(&[0, 2, 2]).is_valid(5, 3));
    }

    #[test]
    fn out_of_roster_member_is_invalid() {
        assert!(!team(&[0, 2, 5]).is_valid(5, 3));
    }

    #[test]
    fn random_team_is_always_valid() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..50 {
            let t = Team::random(&mut rng, 7, 3);
            assert!(t.is_valid(7, 3), "generated invalid team {t}");
        }
    }

    #[test]
    fn displays_as_bracketed_list() {
        assert_eq!(team(&[1, 0, 3]).to_string(), "[1,0,3]");
    }
}

use crate::model::rules::MAX_PLAYERS;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Index of a participant within a game's shuffled roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(u8);

impl PlayerId {
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < MAX_PLAYERS {
            Some(PlayerId(index as u8))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// All ids of an `n`-player roster in table order.
    pub fn roster(num_players: usize) -> impl Iterator<Item = PlayerId> {
        (0..num_players.min(MAX_PLAYERS)).map(|i| PlayerId(i as u8))
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::PlayerId;

    #[test]
    fn index_roundtrip() {
        for i in 0..10 {
            let id = PlayerId::from_index(i).expect("index in range");
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn out_of_range_index_rejected() {
        assert_eq!(PlayerId::from_index(10), None);
    }

    #[test]
    fn roster_covers_every_seat_once() {
        let ids: Vec<_> = PlayerId::roster(7).collect();
        assert_eq!(ids.len(), 7);
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }
}

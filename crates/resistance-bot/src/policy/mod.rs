//! Decision policies built on the belief trackers. Every policy implements
//! [`resistance_core::agent::Agent`] and can play either role; which role it
//! has is only learned at `new_game`.

mod bayesian;
mod random;
mod rulebased;

pub use bayesian::BayesianAgent;
pub use random::RandomAgent;
pub use rulebased::TallyAgent;

use resistance_core::agent::FORCED_APPROVAL_REJECTIONS;

/// Suspicion ceiling a proposed team member may carry and still get our vote.
pub const NORMAL_SUSPICION_LIMIT: f64 = 0.60;
/// Tightened ceiling once the resistance has lost two rounds.
pub const PARANOID_SUSPICION_LIMIT: f64 = 0.30;

/// Tracks consecutive rejected proposals in the current round. Once the count
/// reaches [`FORCED_APPROVAL_REJECTIONS`], every policy votes to approve, which
/// is what bounds a round at five attempts.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Reluctance {
    rejections: u8,
}

impl Reluctance {
    pub(crate) fn observe(&mut self, votes: &[bool]) {
        if resistance_core::model::rules::majority_approves(votes) {
            self.rejections = 0;
        } else {
            self.rejections += 1;
        }
    }

    pub(crate) fn must_approve(self) -> bool {
        self.rejections >= FORCED_APPROVAL_REJECTIONS
    }

    pub(crate) fn reset(&mut self) {
        self.rejections = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::Reluctance;

    #[test]
    fn four_straight_rejections_force_approval() {
        let mut reluctance = Reluctance::default();
        for _ in 0..3 {
            reluctance.observe(&[true, false, false, false, false]);
            assert!(!reluctance.must_approve());
        }
        reluctance.observe(&[false; 5]);
        assert!(reluctance.must_approve());
    }

    #[test]
    fn an_approval_resets_the_count() {
        let mut reluctance = Reluctance::default();
        reluctance.observe(&[false; 5]);
        reluctance.observe(&[false; 5]);
        reluctance.observe(&[true, true, true, false, false]);
        assert!(!reluctance.must_approve());
        reluctance.reset();
        assert!(!reluctance.must_approve());
    }
}

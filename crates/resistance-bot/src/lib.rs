pub mod belief;
pub mod policy;

pub use belief::{PriorTable, RESISTANCE_FAIL_RATE, SuspicionTracker, TallyTracker};
pub use policy::{BayesianAgent, RandomAgent, TallyAgent};

/// One-step lookahead action selection
pub mod lookahead;

/// Keyboard-driven play
pub mod manual;

/// The training loop
pub mod value_learner;

pub use lookahead::{Evaluation, Policy};
pub use manual::ManualPlay;
pub use value_learner::{train, Episode, Outcome, StopReason, ValueLearner, ValueLearnerConfig};

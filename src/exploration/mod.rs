/// Exploration policy result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Explore,
    Exploit,
}

mod epsilon_greedy;
mod progress;

pub use epsilon_greedy::EpsilonGreedy;
pub use progress::{ProgressSchedule, MAX_RATE};

/// Lookahead policy, learner and manual play
pub mod algo;

/// Implementations of time-decaying values
pub mod decay;

/// Data structures
pub mod ds;

/// Environment
pub mod env;

pub mod error;

/// Exploration policies
pub mod exploration;

/// The maze environment
pub mod gym;

/// Display and input collaborator of the learning loop
pub mod observer;

/// Terminal front end
#[cfg(feature = "viz")]
pub mod viz;

mod util;

pub use error::{Error, Result};

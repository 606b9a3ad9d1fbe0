use std::{error::Error, time::Duration};

use log::LevelFilter;
use maze_rl::{
    algo::{ValueLearner, ValueLearnerConfig},
    gym::MazeConfig,
    viz::{self, MazeView},
};

fn main() -> Result<(), Box<dyn Error>> {
    viz::init_logger(LevelFilter::Debug);

    let config = ValueLearnerConfig {
        partial_greedy: 0.8,
        decay_factor: 5.0,
        step_delay: Duration::from_millis(50),
        converged_step_delay: Some(Duration::from_secs(1)),
        ..Default::default()
    };
    let mut learner = ValueLearner::new(MazeConfig::default(), config)?;

    let outcome = {
        let mut view = MazeView::new()?;
        learner.train(&mut view)
    };

    println!(
        "Stopped after {} episodes ({:?}), final score {}",
        outcome.episodes, outcome.reason, outcome.score
    );
    match outcome.converged_at {
        Some(episode) => println!("Values converged after episode {episode}"),
        None => println!("Values did not converge"),
    }

    Ok(())
}

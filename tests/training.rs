use maze_rl::{
    algo::{train, StopReason, ValueLearner, ValueLearnerConfig},
    gym::MazeConfig,
    observer::{Frame, FrameKind, Headless, Observer},
};

/// Counts frames and remembers the exploration rate of every episode
#[derive(Default)]
struct Tally {
    episodes: Vec<(u32, f64)>,
    steps: usize,
    converged: usize,
}

impl Observer for Tally {
    fn render_frame(&mut self, frame: &Frame<'_>) {
        match frame.kind {
            FrameKind::EpisodeStart => self
                .episodes
                .push((frame.episode.unwrap(), frame.exploration_rate.unwrap())),
            FrameKind::Step => self.steps += 1,
            FrameKind::Converged => self.converged += 1,
            _ => {}
        }
    }
}

fn config(seed: u64) -> ValueLearnerConfig {
    ValueLearnerConfig {
        partial_greedy: 0.8,
        max_episodes: Some(5_000),
        demo_episodes: Some(3),
        seed: Some(seed),
        ..Default::default()
    }
}

#[test]
fn default_maze_converges() {
    let mut learner = ValueLearner::new(MazeConfig::default(), config(42)).unwrap();
    let mut tally = Tally::default();
    let outcome = learner.train(&mut tally);

    assert_eq!(outcome.reason, StopReason::DemoComplete);
    assert!(outcome.converged());
    assert_eq!(tally.converged, 1);
    assert_eq!(tally.episodes.len() as u32, outcome.episodes);
    assert!(tally.steps as u32 >= outcome.episodes * 2, "No finish is one step away");

    let (_, first_rate) = tally.episodes[0];
    assert_eq!(first_rate, 0.99);
    assert!(tally.episodes.iter().all(|&(_, rate)| (0.0..1.0).contains(&rate)));

    let maze = learner.maze();
    assert_eq!(maze.cell((1, 3)).value(), 40.0, "Next to the high finish");
    assert_eq!(maze.cell((2, 4)).value(), 40.0, "Water next to the high finish");
    assert_eq!(maze.cell((1, 4)).value(), 0.0, "Finish values never change");
    assert_eq!(maze.cell((4, 1)).value(), 0.0);
    for (pos, cell) in maze.cells().indexed_iter() {
        if maze.is_learnable(pos) {
            assert!(cell.value() <= 40.0, "{pos:?} overestimated at {}", cell.value());
        }
    }
}

#[test]
fn random_agent_runs_to_the_limit() {
    let outcome = train(
        MazeConfig::default(),
        ValueLearnerConfig {
            random_agent: true,
            max_episodes: Some(50),
            seed: Some(8),
            ..Default::default()
        },
        &mut Headless,
    )
    .unwrap();

    assert_eq!(outcome.episodes, 50);
    assert_eq!(outcome.reason, StopReason::EpisodeLimit);
}

#[test]
fn invalid_maze_is_rejected() {
    let result = train(
        MazeConfig {
            rows: 2,
            cols: 2,
            ..Default::default()
        },
        ValueLearnerConfig::default(),
        &mut Headless,
    );
    assert!(result.is_err());
}

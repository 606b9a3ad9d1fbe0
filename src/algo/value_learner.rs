use std::{thread, time::Duration};

use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    ds::ValueChanges,
    env::Environment,
    error::{Error, Result},
    exploration::{EpsilonGreedy, ProgressSchedule, MAX_RATE},
    gym::{Maze, MazeConfig},
    observer::{Frame, FrameKind, Observer},
    util::round_to,
};

use super::lookahead::{Evaluation, Policy};

/// Configuration for the [`ValueLearner`]
#[derive(Debug, Clone, PartialEq)]
pub struct ValueLearnerConfig {
    /// Decay factor `k` of the exploration schedule `1 - e^(-k x)`
    ///
    /// **Default**: `5.0`
    pub decay_factor: f64,
    /// Probability of picking a best action rather than one of the others when exploiting
    ///
    /// Reset to `1.0` once the values converge.
    ///
    /// **Default**: `1.0`
    pub partial_greedy: f64,
    /// Pick every action uniformly at random
    ///
    /// **Default**: `false`
    pub random_agent: bool,
    /// Convergence threshold on the largest value change of an episode
    ///
    /// **Default**: `0.01`
    pub epsilon: f64,
    /// Decimal places the exploration rate of an episode is rounded to
    ///
    /// **Default**: `Some(2)`
    pub rate_precision: Option<i32>,
    /// Pause after every step
    ///
    /// **Default**: no pause
    pub step_delay: Duration,
    /// Pause after every step once converged, replacing `step_delay`
    ///
    /// **Default**: `None`
    pub converged_step_delay: Option<Duration>,
    /// Stop after this many episodes
    ///
    /// **Default**: `None`, train until quit
    pub max_episodes: Option<u32>,
    /// Stop after replaying this many episodes once converged
    ///
    /// **Default**: `None`, replay until quit
    pub demo_episodes: Option<u32>,
    /// Seed for the random number generator
    ///
    /// **Default**: `None`, seeded from system entropy
    pub seed: Option<u64>,
}

impl Default for ValueLearnerConfig {
    fn default() -> Self {
        Self {
            decay_factor: 5.0,
            partial_greedy: 1.0,
            random_agent: false,
            epsilon: 0.01,
            rate_precision: Some(2),
            step_delay: Duration::ZERO,
            converged_step_delay: None,
            max_episodes: None,
            demo_episodes: None,
            seed: None,
        }
    }
}

/// How a single episode ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Episode {
    /// The agent reached a finish
    Finished { score: f64, steps: u32 },
    /// The observer asked to quit mid-episode
    Quit { score: f64 },
}

/// Why [`ValueLearner::train`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Quit,
    EpisodeLimit,
    DemoComplete,
}

/// Summary of a training run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub episodes: u32,
    /// The episode after which the values converged
    pub converged_at: Option<u32>,
    /// Score of the last episode
    pub score: f64,
    pub reason: StopReason,
}

impl Outcome {
    pub fn converged(&self) -> bool {
        self.converged_at.is_some()
    }
}

/// Online state-value learner for a [`Maze`]
///
/// Each step overwrites the value of the occupied cell with its best one-step lookahead value
/// and records how much it moved. Exploration shrinks as fewer cells keep moving, and training
/// has converged once a whole episode moves no value by `epsilon` or more. After that the
/// learned route keeps being replayed greedily.
#[derive(Debug, Clone)]
pub struct ValueLearner {
    maze: Maze,
    changes: ValueChanges,
    policy: Policy,
    schedule: ProgressSchedule,
    epsilon: f64,
    rate_precision: Option<i32>,
    step_delay: Duration,
    converged_step_delay: Option<Duration>,
    max_episodes: Option<u32>,
    demo_episodes: Option<u32>,
    rng: StdRng,
    episode: u32,
    exploration_rate: f64,
    converged_at: Option<u32>,
}

impl ValueLearner {
    /// Initialize a learner on a fresh maze
    ///
    /// **Errors** if the maze layout is invalid, if `decay_factor` or `epsilon` is not positive,
    /// or if `partial_greedy` is not in the interval `[0,1]`
    pub fn new(maze_config: MazeConfig, config: ValueLearnerConfig) -> Result<Self> {
        let maze = Maze::new(maze_config)?;
        let changes = ValueChanges::for_maze(&maze);

        if !(0.0..=1.0).contains(&config.partial_greedy) {
            return Err(Error::InvalidConfig(format!(
                "`partial_greedy` must be in [0, 1], got {}",
                config.partial_greedy
            )));
        }
        if !(config.epsilon.is_finite() && config.epsilon > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "`epsilon` must be positive, got {}",
                config.epsilon
            )));
        }
        let schedule = ProgressSchedule::new(config.decay_factor).map_err(Error::InvalidConfig)?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            maze,
            changes,
            policy: Policy::new(config.partial_greedy, config.random_agent),
            schedule,
            epsilon: config.epsilon,
            rate_precision: config.rate_precision,
            step_delay: config.step_delay,
            converged_step_delay: config.converged_step_delay,
            max_episodes: config.max_episodes,
            demo_episodes: config.demo_episodes,
            rng,
            episode: 0,
            exploration_rate: 0.0,
            converged_at: None,
        })
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn changes(&self) -> &ValueChanges {
        &self.changes
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Number of episodes started so far
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Exploration rate of the current episode
    pub fn exploration_rate(&self) -> f64 {
        self.exploration_rate
    }

    pub fn converged(&self) -> bool {
        self.converged_at.is_some()
    }

    /// Run episodes until the observer quits or a configured limit is hit
    pub fn train<O: Observer + ?Sized>(&mut self, observer: &mut O) -> Outcome {
        let mut demos = 0;

        let reason = loop {
            if self.max_episodes.is_some_and(|max| self.episode >= max) {
                break StopReason::EpisodeLimit;
            }

            let replay = self.converged();
            if let Episode::Quit { score } = self.go(observer) {
                info!("Terminating training. Total points: {score}");
                observer.finish(score);
                return self.outcome(StopReason::Quit);
            }

            if replay {
                demos += 1;
                if self.demo_episodes.is_some_and(|max| demos >= max) {
                    break StopReason::DemoComplete;
                }
            }

            self.check_convergence(observer);
        };

        info!(
            "Stopped after {} episodes ({reason:?}), last score {}",
            self.episode,
            self.maze.score()
        );
        observer.finish(self.maze.score());
        self.outcome(reason)
    }

    /// Run a single episode from the start cell to a finish
    pub fn go<O: Observer + ?Sized>(&mut self, observer: &mut O) -> Episode {
        self.episode += 1;
        self.maze.reset();

        let rate = self.schedule.rate(&self.changes);
        self.exploration_rate = match self.rate_precision {
            Some(digits) => round_to(rate, digits).min(MAX_RATE),
            None => rate,
        };
        let exploration = EpsilonGreedy::new(self.exploration_rate);
        info!(
            "Episode {}: exploration rate {}",
            self.episode, self.exploration_rate
        );
        observer.render_frame(&self.frame(FrameKind::EpisodeStart));

        loop {
            if observer.poll_quit() {
                return Episode::Quit {
                    score: self.maze.score(),
                };
            }

            let pos = self.maze.agent();
            let before = self.maze.current().value();

            let Evaluation { value, action } =
                self.policy.evaluate(&self.maze, &exploration, &mut self.rng);
            self.maze.update_current_value(value);
            self.changes.record(pos, self.maze.cell(pos).value() - before);

            let (next_state, reward) = self.maze.step(action);
            debug!("{pos:?} -> {action:?} -> {:?}, reward {reward}", self.maze.agent());

            observer.render_frame(&self.frame(FrameKind::Step));
            self.pause();

            if next_state.is_none() {
                break;
            }
        }

        let (score, steps) = (self.maze.score(), self.maze.steps());
        info!(
            "Episode {} reached a finish with {score} points in {steps} steps",
            self.episode
        );
        observer.render_frame(&self.frame(FrameKind::EpisodeEnd));
        Episode::Finished { score, steps }
    }

    /// Declare convergence once no value moved by `epsilon` or more
    ///
    /// Convergence is sticky and switches the policy to fully greedy.
    fn check_convergence<O: Observer + ?Sized>(&mut self, observer: &mut O) {
        if self.converged() {
            return;
        }

        let delta = self.changes.max();
        debug!("Episode {}: largest value change {delta}", self.episode);
        if delta < self.epsilon {
            self.converged_at = Some(self.episode);
            self.policy.set_partial_greedy(1.0);
            info!(
                "Reached convergence after {} episodes, showing the learned route",
                self.episode
            );
            observer.render_frame(&self.frame(FrameKind::Converged));
        }
    }

    fn pause(&self) {
        let delay = match self.converged_step_delay {
            Some(delay) if self.converged() => delay,
            _ => self.step_delay,
        };
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    fn frame(&self, kind: FrameKind) -> Frame<'_> {
        Frame {
            kind,
            maze: &self.maze,
            episode: Some(self.episode),
            exploration_rate: Some(self.exploration_rate),
            converged: self.converged(),
        }
    }

    fn outcome(&self, reason: StopReason) -> Outcome {
        Outcome {
            episodes: self.episode,
            converged_at: self.converged_at,
            score: self.maze.score(),
            reason,
        }
    }
}

/// Train a fresh learner on a fresh maze
pub fn train<O: Observer + ?Sized>(
    maze_config: MazeConfig,
    config: ValueLearnerConfig,
    observer: &mut O,
) -> Result<Outcome> {
    Ok(ValueLearner::new(maze_config, config)?.train(observer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ds::Pos, observer::Headless};

    #[derive(Default)]
    struct Recorder {
        frames: Vec<(FrameKind, Pos, bool)>,
        quit_after: Option<usize>,
        polls: usize,
        finished: Option<f64>,
    }

    impl Observer for Recorder {
        fn render_frame(&mut self, frame: &Frame<'_>) {
            self.frames
                .push((frame.kind, frame.maze.agent(), frame.converged));
        }

        fn poll_quit(&mut self) -> bool {
            self.polls += 1;
            self.quit_after.is_some_and(|n| self.polls > n)
        }

        fn finish(&mut self, score: f64) {
            self.finished = Some(score);
        }
    }

    fn config(seed: u64) -> ValueLearnerConfig {
        ValueLearnerConfig {
            seed: Some(seed),
            max_episodes: Some(5_000),
            ..Default::default()
        }
    }

    #[test]
    fn rejects_invalid_config() {
        for config in [
            ValueLearnerConfig {
                decay_factor: 0.0,
                ..Default::default()
            },
            ValueLearnerConfig {
                epsilon: -1.0,
                ..Default::default()
            },
            ValueLearnerConfig {
                partial_greedy: 1.5,
                ..Default::default()
            },
        ] {
            assert!(matches!(
                ValueLearner::new(MazeConfig::default(), config),
                Err(Error::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn rounded_rate_stays_below_one() {
        let mut learner = ValueLearner::new(
            MazeConfig::default(),
            ValueLearnerConfig {
                decay_factor: 8.0,
                ..config(3)
            },
        )
        .unwrap();
        let mut recorder = Recorder {
            quit_after: Some(1),
            ..Default::default()
        };

        learner.go(&mut recorder);
        assert!(learner.exploration_rate() < 1.0);
        assert!(learner.exploration_rate() > 0.99);
    }

    #[test]
    fn single_episode() {
        let mut learner = ValueLearner::new(MazeConfig::default(), config(1)).unwrap();
        let mut recorder = Recorder::default();

        let Episode::Finished { score, steps } = learner.go(&mut recorder) else {
            panic!("Episode was not quit");
        };

        assert_eq!(learner.episode(), 1);
        assert_eq!(learner.exploration_rate(), 0.99, "1 - e^(-5 * 14/16) rounded");
        assert!(!learner.maze().is_active(), "Episode ends on a finish");
        assert!(learner.maze().current().is_terminal());
        assert_eq!(learner.maze().score(), score);
        assert_eq!(learner.maze().steps(), steps);
        assert_eq!(learner.changes().get((1, 4)), 0.0);
        assert_eq!(learner.changes().get((4, 1)), 0.0);

        assert_eq!(recorder.frames.first().unwrap().0, FrameKind::EpisodeStart);
        assert_eq!(recorder.frames.last().unwrap().0, FrameKind::EpisodeEnd);
        let step_frames = recorder
            .frames
            .iter()
            .filter(|(kind, ..)| *kind == FrameKind::Step)
            .count();
        assert_eq!(step_frames as u32, steps, "One frame per step");
    }

    #[test]
    fn first_step_updates_start_value() {
        let mut learner = ValueLearner::new(MazeConfig::default(), config(5)).unwrap();
        let mut recorder = Recorder {
            quit_after: Some(1),
            ..Default::default()
        };
        let episode = learner.go(&mut recorder);
        assert!(matches!(episode, Episode::Quit { .. }));

        assert_eq!(learner.maze().steps(), 1);
        assert_eq!(learner.maze().cell((4, 3)).value(), -1.0, "Best lookahead from the start");
        assert_eq!(learner.changes().get((4, 3)), 1.0, "Start value moved from 0 to -1");
    }

    #[test]
    fn episode_limit() {
        let mut learner = ValueLearner::new(
            MazeConfig::default(),
            ValueLearnerConfig {
                max_episodes: Some(1),
                ..config(2)
            },
        )
        .unwrap();
        let outcome = learner.train(&mut Headless);
        assert_eq!(outcome.reason, StopReason::EpisodeLimit);
        assert_eq!(outcome.episodes, 1);
        assert!(!outcome.converged(), "Unvisited cells still hold back convergence");
    }

    #[test]
    fn convergence_is_sticky() {
        let mut learner = ValueLearner::new(
            MazeConfig::default(),
            ValueLearnerConfig {
                partial_greedy: 0.8,
                demo_episodes: Some(5),
                ..config(3)
            },
        )
        .unwrap();
        let mut recorder = Recorder::default();
        let outcome = learner.train(&mut recorder);

        assert_eq!(outcome.reason, StopReason::DemoComplete);
        let converged_at = outcome.converged_at.expect("Values converged");
        assert_eq!(outcome.episodes, converged_at + 5);
        assert_eq!(learner.policy().partial_greedy(), 1.0);
        assert_eq!(recorder.finished, Some(outcome.score));

        let first = recorder
            .frames
            .iter()
            .position(|&(_, _, converged)| converged)
            .unwrap();
        assert_eq!(recorder.frames[first].0, FrameKind::Converged);
        assert!(
            recorder.frames[first..].iter().all(|&(_, _, converged)| converged),
            "Convergence never reverts"
        );
        assert_eq!(
            recorder
                .frames
                .iter()
                .filter(|(kind, ..)| *kind == FrameKind::Converged)
                .count(),
            1
        );
    }

    #[test]
    fn quit_stops_mid_episode() {
        let mut learner = ValueLearner::new(MazeConfig::default(), config(4)).unwrap();
        let mut recorder = Recorder {
            quit_after: Some(1),
            ..Default::default()
        };
        let outcome = learner.train(&mut recorder);

        assert_eq!(outcome.reason, StopReason::Quit);
        assert_eq!(outcome.episodes, 1);
        assert_eq!(learner.maze().steps(), 1, "One decision before quitting");
        assert_eq!(recorder.finished, Some(learner.maze().score()));
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let run = |seed| {
            let mut learner = ValueLearner::new(
                MazeConfig::default(),
                ValueLearnerConfig {
                    max_episodes: Some(20),
                    ..config(seed)
                },
            )
            .unwrap();
            learner.train(&mut Headless);
            learner.maze().cells().clone()
        };
        assert_eq!(run(7), run(7));
    }
}

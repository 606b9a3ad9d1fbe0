use std::{thread, time::Duration};

use log::info;

use crate::{
    env::Environment,
    error::Result,
    gym::{Maze, MazeConfig},
    observer::{Frame, FrameKind, Observer},
};

use super::lookahead::Policy;

/// Back-off after a poll that produced no move
const IDLE_POLL: Duration = Duration::from_millis(5);

/// Play the maze by hand through [`Observer::poll_manual_input`]
///
/// Values are still refreshed from a greedy lookahead before every move, so a human walking
/// the maze teaches it the same way the learner does. Reaching a finish puts the agent back
/// on the start cell for another attempt.
pub struct ManualPlay {
    maze: Maze,
    attempt: u32,
}

impl ManualPlay {
    pub fn new(config: MazeConfig) -> Result<Self> {
        Ok(Self {
            maze: Maze::new(config)?,
            attempt: 1,
        })
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Number of the current attempt, starting at 1
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Play until the observer quits
    ///
    /// **Returns** the score of the unfinished attempt
    pub fn run<O: Observer + ?Sized>(&mut self, observer: &mut O) -> f64 {
        observer.render_frame(&self.frame());

        while !observer.poll_quit() {
            let Some(action) = observer.poll_manual_input() else {
                thread::sleep(IDLE_POLL);
                continue;
            };

            let value = Policy::best_value(&self.maze);
            self.maze.update_current_value(value);

            let (next_state, reward) = self.maze.step(action);
            info!("Gained reward of {reward} points");
            observer.render_frame(&self.frame());

            if next_state.is_none() {
                info!(
                    "Reached finish line with total points of {}!",
                    self.maze.score()
                );
                self.maze.reset();
                self.attempt += 1;
                observer.render_frame(&self.frame());
            }
        }

        let score = self.maze.score();
        info!("Terminating game. Total points: {score}!");
        observer.finish(score);
        score
    }

    fn frame(&self) -> Frame<'_> {
        Frame {
            kind: FrameKind::Manual,
            maze: &self.maze,
            episode: Some(self.attempt),
            exploration_rate: None,
            converged: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, time::Instant};

    use super::*;
    use crate::gym::Action;

    /// Replays scripted moves and quits once they run out
    struct Script {
        moves: VecDeque<Action>,
        frames: usize,
        finished: Option<f64>,
    }

    impl Script {
        fn new(moves: &[Action]) -> Self {
            Self {
                moves: moves.iter().copied().collect(),
                frames: 0,
                finished: None,
            }
        }
    }

    impl Observer for Script {
        fn render_frame(&mut self, frame: &Frame<'_>) {
            assert_eq!(frame.kind, FrameKind::Manual);
            self.frames += 1;
        }

        fn poll_quit(&mut self) -> bool {
            self.moves.is_empty()
        }

        fn poll_manual_input(&mut self) -> Option<Action> {
            self.moves.pop_front()
        }

        fn finish(&mut self, score: f64) {
            self.finished = Some(score);
        }
    }

    #[test]
    fn manual_moves() {
        let mut game = ManualPlay::new(MazeConfig::default()).unwrap();
        let mut script = Script::new(&[Action::Up, Action::Down, Action::Down]);

        let score = game.run(&mut script);
        assert_eq!(game.maze().agent(), (4, 3), "Bumped into the bottom wall");
        assert_eq!(score, -3.0);
        assert_eq!(script.finished, Some(-3.0));
        assert_eq!(script.frames, 4, "Initial frame plus one per move");
        assert_eq!(game.maze().cell((4, 3)).value(), -1.0, "Values are refreshed");
    }

    #[test]
    fn finish_starts_new_attempt() {
        let mut game = ManualPlay::new(MazeConfig::default()).unwrap();
        let mut script = Script::new(&[Action::Left, Action::Left, Action::Up]);

        let score = game.run(&mut script);
        assert_eq!(game.attempt(), 2);
        assert_eq!(game.maze().agent(), (3, 3), "Moved up from a fresh start");
        assert_eq!(score, -1.0);
    }

    /// Never moves, quits after a fixed number of polls
    struct Idle {
        polls: u32,
        limit: u32,
    }

    impl Observer for Idle {
        fn render_frame(&mut self, _frame: &Frame<'_>) {}

        fn poll_quit(&mut self) -> bool {
            self.polls += 1;
            self.polls > self.limit
        }
    }

    #[test]
    fn idle_input_backs_off() {
        let mut game = ManualPlay::new(MazeConfig::default()).unwrap();
        let mut idle = Idle { polls: 0, limit: 4 };

        let start = Instant::now();
        let score = game.run(&mut idle);
        assert!(start.elapsed() >= IDLE_POLL * 4, "Sleeps between empty polls");
        assert_eq!(score, 0.0);
        assert_eq!(game.maze().agent(), (4, 3));
    }
}

use log::trace;

use crate::gym::{Action, Maze};

/// Why a [`Frame`] was emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// The maze was reset for a new episode
    EpisodeStart,
    /// The agent took one step
    Step,
    /// The agent reached a finish
    EpisodeEnd,
    /// The value estimates stopped changing
    Converged,
    /// A step taken from manual input
    Manual,
}

/// A snapshot of the learning loop handed to an [`Observer`]
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub kind: FrameKind,
    /// Cells, agent position and score
    pub maze: &'a Maze,
    pub episode: Option<u32>,
    pub exploration_rate: Option<f64>,
    pub converged: bool,
}

/// The display and input side of the loop
///
/// Frames are fire-and-forget. The loop polls [`Observer::poll_quit`] before every decision and
/// stops cleanly once it returns `true`.
pub trait Observer {
    fn render_frame(&mut self, frame: &Frame<'_>);

    fn poll_quit(&mut self) -> bool {
        false
    }

    /// Next move requested by a human player, only used in manual play
    ///
    /// Returning `None` right away is fine, the manual loop sleeps briefly before polling again.
    fn poll_manual_input(&mut self) -> Option<Action> {
        None
    }

    /// Called once when the loop stops, with the score of the interrupted or final episode
    fn finish(&mut self, _score: f64) {}
}

/// An observer that renders nothing and never quits
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl Observer for Headless {
    fn render_frame(&mut self, frame: &Frame<'_>) {
        trace!(
            "{:?}: agent at {:?}, score {}",
            frame.kind,
            frame.maze.agent(),
            frame.maze.score()
        );
    }
}

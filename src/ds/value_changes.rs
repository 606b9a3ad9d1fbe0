use crate::gym::Maze;

use super::{Grid, Pos};

/// The absolute value change recorded the last time each cell of a maze was visited
///
/// Walls and terminal cells are pinned to `0.0` and ignore every update, so they never
/// count towards exploration or hold back convergence. Every other cell starts at `1.0`,
/// which marks it as not yet settled until the agent has visited it at least once.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChanges {
    changes: Grid<f64>,
    pinned: Grid<bool>,
}

impl ValueChanges {
    /// Build a tracker shaped like `maze`
    pub fn for_maze(maze: &Maze) -> Self {
        let pinned = Grid::from_fn(maze.rows(), maze.cols(), |pos| !maze.is_learnable(pos));
        let changes = Grid::from_fn(maze.rows(), maze.cols(), |pos| {
            if pinned[pos] {
                0.0
            } else {
                1.0
            }
        });
        Self { changes, pinned }
    }

    /// Record the value change of the cell at `pos`
    ///
    /// Only the magnitude is kept. Updates to pinned cells are ignored.
    pub fn record(&mut self, pos: Pos, change: f64) {
        if !self.pinned[pos] {
            self.changes[pos] = change.abs();
        }
    }

    pub fn get(&self, pos: Pos) -> f64 {
        self.changes[pos]
    }

    /// The largest recorded change over all cells
    pub fn max(&self) -> f64 {
        self.changes.iter().copied().fold(0.0, f64::max)
    }

    /// Number of cells whose last visit still changed their value
    pub fn unoptimal_count(&self) -> usize {
        self.changes.iter().filter(|&&x| x != 0.0).count()
    }

    /// Number of interior cells, terminal ones included
    pub fn learnable_total(&self) -> usize {
        self.changes.interior_len()
    }
}

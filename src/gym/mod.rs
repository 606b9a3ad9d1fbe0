pub mod maze;

pub use maze::{Action, Cell, CellKind, Maze, MazeConfig};

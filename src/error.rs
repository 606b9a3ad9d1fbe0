use thiserror::Error;

use crate::ds::Pos;

/// Errors raised while building a maze or learner, or converting raw action indices
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("grid of {rows}x{cols} is too small, both dimensions must be at least 3")]
    GridTooSmall { rows: usize, cols: usize },

    #[error("cell {pos:?} is not an interior cell")]
    LayoutOutOfBounds { pos: Pos },

    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid action index {0}, expected one of 0..4")]
    InvalidAction(usize),
}

pub type Result<T> = std::result::Result<T, Error>;

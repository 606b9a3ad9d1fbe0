mod grid;
mod value_changes;

pub use grid::{Grid, Pos};
pub use value_changes::ValueChanges;

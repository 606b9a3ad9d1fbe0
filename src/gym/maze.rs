use rand::Rng;
use strum::{EnumIter, FromRepr, VariantArray};

use crate::{
    ds::{Grid, Pos},
    env::{DiscreteActionSpace, Environment},
    error::{Error, Result},
};

/// What occupies a cell of the maze
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    Wall,
    Empty,
    /// Water
    Hazard,
    Enemy,
    /// The nearer finish, worth `+10`
    GoalLow,
    /// The farther finish, worth `+40`
    GoalHigh,
}

impl CellKind {
    /// Reward collected when the agent occupies a cell of this kind
    pub const fn reward(self) -> f64 {
        match self {
            CellKind::Wall => -999.0,
            CellKind::Empty => -1.0,
            CellKind::Hazard => -10.0,
            CellKind::Enemy => -2.0,
            CellKind::GoalLow => 10.0,
            CellKind::GoalHigh => 40.0,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, CellKind::GoalLow | CellKind::GoalHigh)
    }
}

/// A single maze cell with its fixed reward and learned value
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    kind: CellKind,
    reward: f64,
    terminal: bool,
    value: f64,
}

impl Cell {
    fn new(kind: CellKind) -> Self {
        Self {
            kind,
            reward: kind.reward(),
            terminal: kind.is_terminal(),
            value: 0.0,
        }
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn reward(&self) -> f64 {
        self.reward
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn is_wall(&self) -> bool {
        self.kind == CellKind::Wall
    }

    /// Current estimate of the return collected from this cell onwards
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// The four moves, in the order they are evaluated
#[derive(EnumIter, VariantArray, FromRepr, Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Action {
    Left = 0,
    Right = 1,
    Up = 2,
    Down = 3,
}

impl Action {
    /// `(row, col)` offset of the move
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Action::Left => (0, -1),
            Action::Right => (0, 1),
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for Action {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        Action::from_repr(value).ok_or(Error::InvalidAction(value))
    }
}

/// Layout of a [`Maze`]
///
/// The outer ring is always wall and every interior cell not listed in `features` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct MazeConfig {
    pub rows: usize,
    pub cols: usize,
    /// Where the agent starts every episode
    pub start: Pos,
    pub features: Vec<(Pos, CellKind)>,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            rows: 6,
            cols: 6,
            start: (4, 3),
            features: vec![
                ((2, 3), CellKind::Hazard),
                ((2, 4), CellKind::Hazard),
                ((4, 2), CellKind::Enemy),
                ((4, 1), CellKind::GoalLow),
                ((1, 4), CellKind::GoalHigh),
            ],
        }
    }
}

/// A walled grid with hazards and two finishes of different reward
///
/// The learned cell values live for as long as the maze does; [`Environment::reset`] only
/// puts the agent back on the start cell and clears the score.
#[derive(Debug, Clone)]
pub struct Maze {
    cells: Grid<Cell>,
    start: Pos,
    agent: Pos,
    score: f64,
    steps: u32,
}

impl Maze {
    /// Build a maze from its layout
    ///
    /// **Errors** if the grid is smaller than 3x3, if the start or a feature is not an interior cell,
    /// if a feature is a wall, if there is not exactly one finish of each kind, or if the start is a finish
    pub fn new(config: MazeConfig) -> Result<Self> {
        let MazeConfig {
            rows,
            cols,
            start,
            features,
        } = config;

        if rows < 3 || cols < 3 {
            return Err(Error::GridTooSmall { rows, cols });
        }

        let mut cells = Grid::from_fn(rows, cols, |_| Cell::new(CellKind::Empty));
        for r in 0..rows {
            for c in 0..cols {
                if cells.is_border((r, c)) {
                    cells[(r, c)] = Cell::new(CellKind::Wall);
                }
            }
        }

        for &(pos, kind) in &features {
            if !cells.is_interior(pos) {
                return Err(Error::LayoutOutOfBounds { pos });
            }
            if kind == CellKind::Wall {
                return Err(Error::InvalidLayout(format!(
                    "cannot place an interior wall at {pos:?}"
                )));
            }
            cells[pos] = Cell::new(kind);
        }

        for goal in [CellKind::GoalLow, CellKind::GoalHigh] {
            let count = cells.iter().filter(|cell| cell.kind == goal).count();
            if count != 1 {
                return Err(Error::InvalidLayout(format!(
                    "expected exactly one {goal:?} cell, found {count}"
                )));
            }
        }

        if !cells.is_interior(start) {
            return Err(Error::LayoutOutOfBounds { pos: start });
        }
        if cells[start].terminal {
            return Err(Error::InvalidLayout(format!(
                "start {start:?} is a terminal cell"
            )));
        }

        Ok(Self {
            cells,
            start,
            agent: start,
            score: 0.0,
            steps: 0,
        })
    }

    pub fn rows(&self) -> usize {
        self.cells.rows()
    }

    pub fn cols(&self) -> usize {
        self.cells.cols()
    }

    pub fn cells(&self) -> &Grid<Cell> {
        &self.cells
    }

    pub fn cell(&self, pos: Pos) -> &Cell {
        &self.cells[pos]
    }

    /// The cell the agent occupies
    pub fn current(&self) -> &Cell {
        &self.cells[self.agent]
    }

    pub fn agent(&self) -> Pos {
        self.agent
    }

    /// Sum of rewards collected this episode
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Number of moves attempted this episode
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Whether the value of the cell at `pos` is learned, i.e. it is neither wall nor terminal
    pub fn is_learnable(&self, pos: Pos) -> bool {
        self.cells
            .get(pos)
            .is_some_and(|cell| !cell.is_wall() && !cell.terminal)
    }

    /// The cell reached from `pos` by `action`, or `None` if that leaves the grid
    pub fn neighbor(&self, (r, c): Pos, action: Action) -> Option<Pos> {
        let (dr, dc) = action.offset();
        let pos = (r.checked_add_signed(dr)?, c.checked_add_signed(dc)?);
        self.cells.contains(pos).then_some(pos)
    }

    /// Overwrite the value of the occupied cell
    ///
    /// Terminal cells keep their value since nothing is looked up past them.
    pub fn update_current_value(&mut self, value: f64) {
        let cell = &mut self.cells[self.agent];
        if !cell.terminal {
            cell.value = value;
        }
    }

    fn is_valid_move(&self, pos: Pos) -> bool {
        self.cells.get(pos).is_some_and(|cell| !cell.is_wall())
    }
}

impl Environment for Maze {
    type State = Pos;
    type Action = Action;

    fn is_active(&self) -> bool {
        !self.current().terminal
    }

    /// Attempt a move
    ///
    /// A move into a wall leaves the agent in place, but it still collects the reward of the
    /// cell it stays on.
    fn step(&mut self, action: Self::Action) -> (Option<Self::State>, f64) {
        self.steps += 1;

        if let Some(target) = self
            .neighbor(self.agent, action)
            .filter(|&pos| self.is_valid_move(pos))
        {
            self.agent = target;
        }

        let reward = self.current().reward;
        self.score += reward;

        let next_state = self.is_active().then_some(self.agent);
        (next_state, reward)
    }

    fn reset(&mut self) -> Self::State {
        self.agent = self.start;
        self.score = 0.0;
        self.steps = 0;
        self.agent
    }

    fn random_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Action {
        Action::VARIANTS[rng.gen_range(0..Action::VARIANTS.len())]
    }
}

impl DiscreteActionSpace for Maze {
    fn actions(&self) -> Vec<Self::Action> {
        Action::VARIANTS.to_vec()
    }
}

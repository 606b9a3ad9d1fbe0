use std::ops::{Index, IndexMut};

/// Cell coordinates as `(row, col)`, with `(0, 0)` in the top left corner
pub type Pos = (usize, usize);

/// A fixed-size 2-D array stored in row-major order
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Constructs a grid by calling `f` with the position of every cell
    pub fn from_fn(rows: usize, cols: usize, f: impl FnMut(Pos) -> T) -> Self {
        let cells = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (r, c)))
            .map(f)
            .collect();
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells that are not on the outer ring
    pub fn interior_len(&self) -> usize {
        self.rows.saturating_sub(2) * self.cols.saturating_sub(2)
    }

    /// Returns `true` if `pos` lies on the outer ring of the grid
    pub fn is_border(&self, (r, c): Pos) -> bool {
        r == 0 || c == 0 || r + 1 == self.rows || c + 1 == self.cols
    }

    /// Returns `true` if `pos` lies inside the grid but not on its outer ring
    pub fn is_interior(&self, pos: Pos) -> bool {
        self.contains(pos) && !self.is_border(pos)
    }

    pub fn contains(&self, (r, c): Pos) -> bool {
        r < self.rows && c < self.cols
    }

    pub fn get(&self, pos: Pos) -> Option<&T> {
        self.contains(pos).then(|| &self[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    /// Iterate over every cell together with its position
    pub fn indexed_iter(&self) -> impl Iterator<Item = (Pos, &T)> {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| ((i / cols, i % cols), cell))
    }

    fn offset(&self, (r, c): Pos) -> usize {
        assert!(
            r < self.rows && c < self.cols,
            "Position ({r}, {c}) is outside of a {}x{} grid",
            self.rows,
            self.cols
        );
        r * self.cols + c
    }
}

impl<T: Clone> Grid<T> {
    /// Constructs a grid with every cell set to `value`
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            cells: vec![value; rows * cols],
        }
    }
}

impl<T> Index<Pos> for Grid<T> {
    type Output = T;

    fn index(&self, index: Pos) -> &Self::Output {
        &self.cells[self.offset(index)]
    }
}

impl<T> IndexMut<Pos> for Grid<T> {
    fn index_mut(&mut self, index: Pos) -> &mut Self::Output {
        let i = self.offset(index);
        &mut self.cells[i]
    }
}

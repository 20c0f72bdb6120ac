use super::{cell::Cell, figure::Figure};

/// Fixed-size grid of locked cells plus the collision oracle.
///
/// Row 0 is the top of the board. The board never changes on its own:
/// during play the game writes locked figures into it and removes completed
/// rows, and hosts may prepare cells with [`Self::set_cell`] before play.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Cell, Figure, Position, ShapeKind};
///
/// let mut board = Board::new(10, 10);
/// board.set_cell(4, 4, Cell::BLOCKED);
///
/// assert!(board.collides(&Figure::new(ShapeKind::O, Position::new(4, 4))));
/// assert!(!board.collides(&Figure::new(ShapeKind::O, Position::new(0, 0))));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    rows: Vec<Vec<Cell>>,
}

impl Board {
    /// Creates an all-empty board.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "board must not be empty");
        Self {
            width,
            height,
            rows: vec![vec![Cell::EMPTY; width]; height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.rows.get(y)?.get(x).copied()
    }

    /// Returns the cell at signed coordinates, `None` outside the board.
    fn cell_at(&self, x: i32, y: i32) -> Option<Cell> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.cell(x, y)
    }

    /// Overwrites one cell.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the board.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        assert!(
            x < self.width && y < self.height,
            "({x}, {y}) is outside the {}x{} board",
            self.width,
            self.height
        );
        self.rows[y][x] = cell;
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Returns whether any cell of row `y` is occupied.
    #[must_use]
    pub fn is_row_occupied(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().any(|cell| cell.is_occupied()))
    }

    /// Returns whether `figure` overlaps a wall, the floor, or an occupied cell.
    ///
    /// Only occupied figure cells are tested; an empty figure cell may hang
    /// outside the board or over a locked cell.
    #[must_use]
    pub fn collides(&self, figure: &Figure) -> bool {
        figure
            .occupied_positions()
            .any(|(x, y, _)| self.cell_at(x, y).is_none_or(Cell::is_occupied))
    }

    pub(crate) fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get_mut(y)?.get_mut(x)
    }

    /// Removes every completed row and inserts as many empty rows on top.
    ///
    /// Remaining rows keep their relative order. Returns the number of rows
    /// removed.
    pub(crate) fn remove_completed_rows(&mut self) -> usize {
        let before = self.rows.len();
        self.rows
            .retain(|row| !row.iter().all(|cell| cell.is_occupied()));
        let count = before - self.rows.len();
        let width = self.width;
        self.rows
            .splice(0..0, (0..count).map(|_| vec![Cell::EMPTY; width]));
        count
    }
}

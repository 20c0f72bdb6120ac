use super::shape::ShapeKind;

/// A single square of the board or of a figure grid.
///
/// The color tag is the kind of the shape the cell came from. Figure cells
/// carry a color iff they are occupied; board cells keep theirs after a
/// figure locks. Board cells prepared by a host may be occupied without a
/// color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    occupied: bool,
    color: Option<ShapeKind>,
}

impl Cell {
    pub const EMPTY: Self = Self {
        occupied: false,
        color: None,
    };

    /// Occupied cell with no color tag.
    pub const BLOCKED: Self = Self {
        occupied: true,
        color: None,
    };

    #[must_use]
    pub const fn filled(color: ShapeKind) -> Self {
        Self {
            occupied: true,
            color: Some(color),
        }
    }

    #[must_use]
    pub const fn is_occupied(self) -> bool {
        self.occupied
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        !self.occupied
    }

    #[must_use]
    pub const fn color(self) -> Option<ShapeKind> {
        self.color
    }
}

/// Row-major rectangular grid of cells.
///
/// Shapes and figures describe their occupancy with a `CellGrid`. Rows are
/// indexed top to bottom, columns left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl CellGrid {
    /// Builds a grid from a 0/1 pattern, tagging every `1` with `color`.
    ///
    /// # Panics
    ///
    /// Panics if the pattern is empty or its rows have different lengths.
    #[must_use]
    pub fn from_pattern(pattern: &[&[u8]], color: ShapeKind) -> Self {
        let height = pattern.len();
        let width = pattern.first().map_or(0, |row| row.len());
        assert!(width > 0 && height > 0, "pattern must not be empty");
        let cells = pattern
            .iter()
            .flat_map(|row| {
                assert_eq!(row.len(), width, "pattern rows must have equal length");
                row.iter().map(move |&bit| {
                    if bit == 0 {
                        Cell::EMPTY
                    } else {
                        Cell::filled(color)
                    }
                })
            })
            .collect();
        Self {
            width,
            height,
            cells,
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
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y * self.width + x])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.width)
    }

    /// Returns `(x, y)` offsets of every occupied cell together with the cell.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.rows().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| cell.is_occupied())
                .map(move |(x, cell)| (x, y, *cell))
        })
    }

    /// Quarter turn clockwise.
    ///
    /// An R×C grid becomes a C×R grid with `rotated[c][R-1-r] = self[r][c]`.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        let (rows, cols) = (self.height, self.width);
        let mut cells = vec![Cell::EMPTY; rows * cols];
        for r in 0..rows {
            for c in 0..cols {
                // new grid is `rows` wide
                cells[c * rows + (rows - 1 - r)] = self.cells[r * cols + c];
            }
        }
        Self {
            width: rows,
            height: cols,
            cells,
        }
    }
}

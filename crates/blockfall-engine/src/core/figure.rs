use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{
    cell::{Cell, CellGrid},
    shape::{Shape, ShapeKind},
};

/// Direction of a single-step translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_more::IsVariant)]
pub enum MoveDirection {
    Left,
    Right,
    Down,
}

/// Direction of a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_more::IsVariant)]
pub enum RotateDirection {
    Clockwise,
    CounterClockwise,
}

/// Board coordinates of a figure's anchor (top-left corner of its grid).
///
/// Coordinates are signed because moves are not bounds-checked: a tentative
/// figure may sit left of or above the board until the board rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn shifted(self, direction: MoveDirection) -> Self {
        match direction {
            MoveDirection::Left => Self::new(self.x - 1, self.y),
            MoveDirection::Right => Self::new(self.x + 1, self.y),
            MoveDirection::Down => Self::new(self.x, self.y + 1),
        }
    }
}

/// Number of clockwise quarter turns applied since spawn, always in `0..=3`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Rotation(u8);

impl Rotation {
    /// Builds a rotation from any turn count, reduced modulo 4.
    #[must_use]
    pub const fn new(turns: u8) -> Self {
        Self(turns % 4)
    }

    #[must_use]
    pub const fn turns(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn rotated(self, direction: RotateDirection) -> Self {
        match direction {
            RotateDirection::Clockwise => Self((self.0 + 1) % 4),
            RotateDirection::CounterClockwise => Self((self.0 + 3) % 4),
        }
    }
}

/// A live piece on the board.
///
/// A figure owns a copy of its shape's cells, rotated into its current
/// orientation. None of its operations look at the board; whether a position
/// or orientation is legal is decided by [`Board::collides`].
///
/// # Example
///
/// ```
/// use blockfall_engine::{Figure, MoveDirection, Position, RotateDirection, ShapeKind};
///
/// let mut figure = Figure::new(ShapeKind::L, Position::new(2, 3));
/// figure.shift(MoveDirection::Right);
/// figure.rotate(RotateDirection::Clockwise);
///
/// assert_eq!(figure.position(), Position::new(3, 3));
/// assert_eq!(figure.rotation().turns(), 1);
/// assert_eq!((figure.cells().width(), figure.cells().height()), (3, 2));
/// ```
///
/// [`Board::collides`]: crate::Board::collides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Figure {
    kind: ShapeKind,
    position: Position,
    rotation: Rotation,
    cells: CellGrid,
    ticks_to_fix: Option<u32>,
}

impl Figure {
    #[must_use]
    pub fn new(kind: ShapeKind, position: Position) -> Self {
        Self {
            kind,
            position,
            rotation: Rotation::default(),
            cells: kind.shape().cells(),
            ticks_to_fix: None,
        }
    }

    /// Like [`Self::new`], with the cells already turned into `rotation`.
    #[must_use]
    pub fn with_rotation(kind: ShapeKind, position: Position, rotation: Rotation) -> Self {
        let mut figure = Self::new(kind, position);
        for _ in 0..rotation.turns() {
            figure.cells = figure.cells.rotated_clockwise();
        }
        figure.rotation = rotation;
        figure
    }

    /// Spawns a figure of `kind`, or of a uniformly random kind when `None`.
    ///
    /// `place` picks the position once the shape is known, drawing from the
    /// same generator.
    pub fn spawn<R, F>(rng: &mut R, kind: Option<ShapeKind>, place: F) -> Self
    where
        R: Rng + ?Sized,
        F: FnOnce(&mut R, &Shape) -> Position,
    {
        let kind = kind.unwrap_or_else(|| rng.random());
        let position = place(rng, kind.shape());
        Self::new(kind, position)
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Color tag written into the board when this figure locks.
    #[must_use]
    pub fn color(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[must_use]
    pub fn cells(&self) -> &CellGrid {
        &self.cells
    }

    /// Remaining ticks before the figure locks, `None` while it falls freely.
    #[must_use]
    pub fn ticks_to_fix(&self) -> Option<u32> {
        self.ticks_to_fix
    }

    pub(crate) fn set_ticks_to_fix(&mut self, ticks: Option<u32>) {
        self.ticks_to_fix = ticks;
    }

    /// Absolute board coordinates of every occupied cell.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        self.cells.occupied().map(move |(dx, dy, cell)| {
            (
                self.position.x + offset(dx),
                self.position.y + offset(dy),
                cell,
            )
        })
    }

    pub fn shift(&mut self, direction: MoveDirection) {
        self.position = self.position.shifted(direction);
    }

    /// Turns the figure a quarter in `direction`.
    ///
    /// Counter-clockwise is three clockwise turns.
    pub fn rotate(&mut self, direction: RotateDirection) {
        let turns = match direction {
            RotateDirection::Clockwise => 1,
            RotateDirection::CounterClockwise => 3,
        };
        for _ in 0..turns {
            self.cells = self.cells.rotated_clockwise();
        }
        self.rotation = self.rotation.rotated(direction);
    }
}

fn offset(value: usize) -> i32 {
    // figure grids are at most 4 cells on a side
    i32::try_from(value).unwrap_or(i32::MAX)
}

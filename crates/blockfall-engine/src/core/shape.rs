use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::cell::CellGrid;

/// The seven tetromino kinds.
///
/// A kind doubles as the color tag of every cell it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum ShapeKind {
    /// T-piece.
    T = 0,
    /// I-piece.
    I = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// O-piece.
    O = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        ShapeKind::ALL[rng.random_range(0..ShapeKind::LEN)]
    }
}

impl ShapeKind {
    /// Number of shape kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        ShapeKind::T,
        ShapeKind::I,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::O,
        ShapeKind::J,
        ShapeKind::L,
    ];

    #[must_use]
    pub fn shape(self) -> &'static Shape {
        Shape::get(self)
    }
}

/// Immutable template for one shape kind in its spawn orientation.
#[derive(Debug, PartialEq, Eq)]
pub struct Shape {
    kind: ShapeKind,
    pattern: &'static [&'static [u8]],
}

/// Widest spawn-orientation pattern among all shapes.
pub const MAX_SHAPE_WIDTH: usize = 3;
/// Tallest spawn-orientation pattern among all shapes.
pub const MAX_SHAPE_HEIGHT: usize = 4;

/// Registry of the seven shapes, indexed by `ShapeKind as usize`.
pub static SHAPES: [Shape; ShapeKind::LEN] = [
    Shape {
        kind: ShapeKind::T,
        pattern: &[&[1, 1, 1], &[0, 1, 0]],
    },
    Shape {
        kind: ShapeKind::I,
        pattern: &[&[1], &[1], &[1], &[1]],
    },
    Shape {
        kind: ShapeKind::S,
        pattern: &[&[0, 1, 1], &[1, 1, 0]],
    },
    Shape {
        kind: ShapeKind::Z,
        pattern: &[&[1, 1, 0], &[0, 1, 1]],
    },
    Shape {
        kind: ShapeKind::O,
        pattern: &[&[1, 1], &[1, 1]],
    },
    Shape {
        kind: ShapeKind::J,
        pattern: &[&[0, 1], &[0, 1], &[1, 1]],
    },
    Shape {
        kind: ShapeKind::L,
        pattern: &[&[1, 0], &[1, 0], &[1, 1]],
    },
];

impl Shape {
    #[must_use]
    pub fn get(kind: ShapeKind) -> &'static Shape {
        &SHAPES[kind as usize]
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.pattern[0].len()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.pattern.len()
    }

    /// Materializes the template as a fresh grid of colored cells.
    #[must_use]
    pub fn cells(&self) -> CellGrid {
        CellGrid::from_pattern(self.pattern, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_registry_is_indexed_by_kind() {
        for kind in ShapeKind::ALL {
            assert_eq!(Shape::get(kind).kind(), kind);
            assert_eq!(kind.shape().cells().occupied().count(), 4);
        }
    }

    #[test]
    fn test_max_dimensions_cover_all_shapes() {
        assert_eq!(SHAPES.iter().map(Shape::width).max(), Some(MAX_SHAPE_WIDTH));
        assert_eq!(
            SHAPES.iter().map(Shape::height).max(),
            Some(MAX_SHAPE_HEIGHT)
        );
    }

    #[test]
    fn test_cells_are_tagged_with_kind() {
        let grid = ShapeKind::Z.shape().cells();
        for (_, _, cell) in grid.occupied() {
            assert_eq!(cell.color(), Some(ShapeKind::Z));
        }
    }

    #[test]
    fn test_uniform_sampling_hits_every_kind() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [0usize; ShapeKind::LEN];
        for _ in 0..7000 {
            let kind: ShapeKind = rng.random();
            seen[kind as usize] += 1;
        }
        for count in seen {
            assert!((700..1300).contains(&count), "skewed distribution: {seen:?}");
        }
    }
}

//! Lattice primitives: positions, directions and voxels on the half-integer
//! grid that a burr puzzle's pieces live on.
//!
//! A canonical shape is built with its long axis along Z, centered on the
//! origin, with voxel centers at half-integers. `Voxel::move_to` rotates a
//! canonical voxel by an [`Orientation`](self) value, re-aligns it onto one
//! of the puzzle's three arms, and translates it to a named [`Position`].
//! `Voxel::align` then floors the result onto the integer lattice so that
//! two voxels occupying the same physical cell hash and compare equal.

use crate::error::ParseError;

/// A rotation/flip code in `0..7`. Values `4..=7` are the flipped variants
/// of `0..=3`. Carried as a plain `u8` and validated at every boundary that
/// accepts one from outside the crate.
pub type Orientation = u8;

/// Checks that `orientation` is a legal value, returning it unchanged.
pub fn validate_orientation(orientation: Orientation) -> Result<Orientation, ParseError> {
    if orientation > 7 {
        Err(ParseError::InvalidOrientation(orientation))
    } else {
        Ok(orientation)
    }
}

/// One of the three orthogonal arms of the assembled puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Parses a single-letter axis tag (`X`, `Y`, or `Z`).
    pub fn from_char(c: char) -> Result<Self, ParseError> {
        match c {
            'X' => Ok(Axis::X),
            'Y' => Ok(Axis::Y),
            'Z' => Ok(Axis::Z),
            other => Err(ParseError::InvalidAxis(other)),
        }
    }
}

/// One of the six axis-aligned unit translations a piece can move along.
///
/// Declared in a fixed order; the move generator always iterates this enum
/// directly (never a numeric `.value()`) so that two runs over the same
/// puzzle enumerate moves in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All six directions, in declaration order.
    pub const ALL: [Direction; 6] = [
        Direction::Forward,
        Direction::Backward,
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The unit offset `(dx, dy, dz)` for one step in this direction.
    #[inline]
    pub const fn unit(self) -> (i32, i32, i32) {
        match self {
            Direction::Forward => (0, 0, 1),
            Direction::Backward => (0, 0, -1),
            Direction::Up => (0, 1, 0),
            Direction::Down => (0, -1, 0),
            Direction::Left => (-1, 0, 0),
            Direction::Right => (1, 0, 0),
        }
    }
}

/// A named slot's location and arm orientation in the assembled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub axis: Axis,
}

impl Position {
    pub const fn new(x: i32, y: i32, z: i32, axis: Axis) -> Self {
        Position { x, y, z, axis }
    }

    /// Returns this position shifted by `steps` units along `d`.
    pub fn translate(self, d: Direction, steps: i32) -> Self {
        let (dx, dy, dz) = d.unit();
        Position {
            x: self.x + dx * steps,
            y: self.y + dy * steps,
            z: self.z + dz * steps,
            axis: self.axis,
        }
    }
}

/// The six named slots of the assembled cross frame, in the canonical
/// layout mandated by the puzzle geometry.
pub const PLACES: [(&str, Position); 6] = [
    ("A", Position::new(0, -1, 0, Axis::Z)),
    ("B", Position::new(0, 0, -1, Axis::X)),
    ("C", Position::new(-1, 0, 0, Axis::Y)),
    ("D", Position::new(0, 0, 1, Axis::X)),
    ("E", Position::new(1, 0, 0, Axis::Y)),
    ("F", Position::new(0, 1, 0, Axis::Z)),
];

/// Looks up the canonical `Position` for a slot label (`"A"..="F"`).
pub fn place(label: &str) -> Position {
    PLACES
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, p)| *p)
        .unwrap_or_else(|| panic!("unknown slot label {label:?}"))
}

/// A unit cube identified by the integer coordinate of its center, after
/// alignment. This is the representation used everywhere except inside a
/// canonical [`Shape`](crate::shape::Shape)'s own half-integer definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Voxel {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Voxel {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Voxel { x, y, z }
    }

    /// True iff this voxel lies strictly inside the `(-3, 3)` cube on every
    /// axis -- the single source of truth for "is this cell part of the
    /// assembled frame".
    #[inline]
    pub fn is_inside(self) -> bool {
        (-3 < self.x && self.x < 3) && (-3 < self.y && self.y < 3) && (-3 < self.z && self.z < 3)
    }

    /// Returns this voxel shifted by `steps` units along `d`.
    #[inline]
    pub fn shift(self, d: Direction, steps: i32) -> Self {
        let (dx, dy, dz) = d.unit();
        Voxel {
            x: self.x + dx * steps,
            y: self.y + dy * steps,
            z: self.z + dz * steps,
        }
    }
}

/// A canonical voxel center, expressed at half-integer precision before it
/// has been rotated, re-aligned onto an arm and translated to a slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonicalVoxel {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CanonicalVoxel {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        CanonicalVoxel { x, y, z }
    }

    /// Applies the rotation for `orientation`, re-aligns onto the arm named
    /// by `position.axis`, translates by `position`, and floors onto the
    /// integer lattice. See spec §4.1 for the exact rotation convention.
    pub fn move_to(self, position: Position, orientation: Orientation) -> Voxel {
        debug_assert!(orientation <= 7, "orientation out of range: {orientation}");

        let mut x = self.x;
        let mut y = self.y;
        let mut z = self.z;
        let mut n = orientation;

        if n >= 4 {
            x = -x;
            z = -z;
            n -= 4;
        }

        match n {
            1 => (x, y) = (-y, x),
            2 => (x, y) = (-x, -y),
            3 => (x, y) = (y, -x),
            _ => {}
        }

        let (x, y, z) = match position.axis {
            Axis::Z => (x, y, z),
            Axis::Y => (x, -z, y),
            Axis::X => (z, y, -x),
        };

        Voxel::new(
            (x + position.x as f64).floor() as i32,
            (y + position.y as f64).floor() as i32,
            (z + position.z as f64).floor() as i32,
        )
    }
}

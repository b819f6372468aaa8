//! Lattice positions and the packed keys used to store them.

use std::fmt;
use std::str::FromStr;

use crate::error::LifeError;

/// Moore neighbourhood offsets as `(d_row, d_col)`.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A cell address on the unbounded lattice. Rows grow downward, columns rightward.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub fn key(self) -> CellKey {
        CellKey::encode(self.row, self.col)
    }

    #[must_use]
    pub fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self::new(self.row.wrapping_add(d_row), self.col.wrapping_add(d_col))
    }

    /// The eight surrounding positions. No wraparound beyond the `i32` edge is modelled.
    #[must_use]
    pub fn neighbors(self) -> [Position; 8] {
        neighbors(self.row, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

/// Lossless 64-bit packing of a [`Position`]: row in the high half, column in the low half.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct CellKey(u64);

impl CellKey {
    #[must_use]
    pub const fn encode(row: i32, col: i32) -> Self {
        Self(((row as u32 as u64) << 32) | col as u32 as u64)
    }

    #[must_use]
    pub const fn decode(self) -> Position {
        Position {
            row: (self.0 >> 32) as u32 as i32,
            col: self.0 as u32 as i32,
        }
    }

    #[must_use]
    pub fn neighbors(self) -> [CellKey; 8] {
        let p = self.decode();
        NEIGHBOR_OFFSETS.map(|(dr, dc)| p.offset(dr, dc).key())
    }
}

impl From<Position> for CellKey {
    fn from(p: Position) -> Self {
        p.key()
    }
}

/// Text form is `"row,col"`, the element type of the JSON export.
impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.decode().fmt(f)
    }
}

impl FromStr for CellKey {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LifeError::InvalidKey(s.to_owned());
        let (row, col) = s.split_once(',').ok_or_else(invalid)?;
        let row = row.trim().parse::<i32>().map_err(|_| invalid())?;
        let col = col.trim().parse::<i32>().map_err(|_| invalid())?;
        Ok(Self::encode(row, col))
    }
}

#[must_use]
pub fn neighbors(row: i32, col: i32) -> [Position; 8] {
    let origin = Position::new(row, col);
    NEIGHBOR_OFFSETS.map(|(dr, dc)| origin.offset(dr, dc))
}

/// Inclusive bounding rectangle of a set of positions.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Bounds {
    pub min_row: i32,
    pub max_row: i32,
    pub min_col: i32,
    pub max_col: i32,
}

impl Bounds {
    #[must_use]
    pub fn of(position: Position) -> Self {
        Self {
            min_row: position.row,
            max_row: position.row,
            min_col: position.col,
            max_col: position.col,
        }
    }

    /// Smallest rectangle covering every position, `None` for an empty iterator.
    pub fn enclosing<I: IntoIterator<Item = Position>>(positions: I) -> Option<Self> {
        let mut iter = positions.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::of(first), Self::include))
    }

    #[must_use]
    pub fn include(self, p: Position) -> Self {
        Self {
            min_row: self.min_row.min(p.row),
            max_row: self.max_row.max(p.row),
            min_col: self.min_col.min(p.col),
            max_col: self.max_col.max(p.col),
        }
    }

    #[must_use]
    pub fn padded(self, cells: i32) -> Self {
        Self {
            min_row: self.min_row.saturating_sub(cells),
            max_row: self.max_row.saturating_add(cells),
            min_col: self.min_col.saturating_sub(cells),
            max_col: self.max_col.saturating_add(cells),
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        (i64::from(self.max_col) - i64::from(self.min_col) + 1) as u32
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        (i64::from(self.max_row) - i64::from(self.min_row) + 1) as u32
    }
}

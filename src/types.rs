use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of rows and columns on the board.
pub const BOARD_WIDTH: usize = 3;

const CODE_EMPTY: u32 = 0;
const CODE_CROSS: u32 = b'X' as u32;
const CODE_NOUGHT: u32 = b'0' as u32;

/// The mark a player places in a cell.
///
/// On the wire a marker travels as the character code of its glyph:
/// `88` (`'X'`) for a cross and `48` (`'0'`) for a nought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Marker {
    Cross,
    Nought,
}

impl Marker {
    pub fn glyph(self) -> char {
        match self {
            Marker::Cross => 'X',
            Marker::Nought => '0',
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Marker::Cross => CODE_CROSS,
            Marker::Nought => CODE_NOUGHT,
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

impl From<Marker> for u32 {
    fn from(marker: Marker) -> Self {
        marker.code()
    }
}

impl TryFrom<u32> for Marker {
    type Error = String;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            CODE_CROSS => Ok(Marker::Cross),
            CODE_NOUGHT => Ok(Marker::Nought),
            other => Err(format!("unknown marker code {other}")),
        }
    }
}

/// Occupancy of one board cell. Encoded as `0`, `88` or `48`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Cell {
    #[default]
    Empty,
    Cross,
    Nought,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn marker(self) -> Option<Marker> {
        match self {
            Cell::Empty => None,
            Cell::Cross => Some(Marker::Cross),
            Cell::Nought => Some(Marker::Nought),
        }
    }
}

impl From<Marker> for Cell {
    fn from(marker: Marker) -> Self {
        match marker {
            Marker::Cross => Cell::Cross,
            Marker::Nought => Cell::Nought,
        }
    }
}

impl From<Cell> for u32 {
    fn from(cell: Cell) -> Self {
        cell.marker().map_or(CODE_EMPTY, Marker::code)
    }
}

impl TryFrom<u32> for Cell {
    type Error = String;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            CODE_EMPTY => Ok(Cell::Empty),
            CODE_CROSS => Ok(Cell::Cross),
            CODE_NOUGHT => Ok(Cell::Nought),
            other => Err(format!("unknown cell code {other}")),
        }
    }
}

/// Row-major 3x3 grid: `grid[row][col]`.
pub type Grid = [[Cell; BOARD_WIDTH]; BOARD_WIDTH];

/// An all-empty grid.
pub const EMPTY_GRID: Grid = [[Cell::Empty; BOARD_WIDTH]; BOARD_WIDTH];

/// A board coordinate. `row` is vertical, `col` horizontal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// Returns `None` when either index falls outside the board.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        if row < BOARD_WIDTH && col < BOARD_WIDTH {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Iterates all nine positions in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_WIDTH).flat_map(|row| {
            (0..BOARD_WIDTH).map(move |col| Position {
                row: row as u8,
                col: col as u8,
            })
        })
    }

    pub(crate) fn index(self) -> (usize, usize) {
        (self.row as usize, self.col as usize)
    }
}

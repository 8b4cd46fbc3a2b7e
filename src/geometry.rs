use crate::surface::{Point, Surface};
use crate::types::{BOARD_WIDTH, Position};

/// The board spans 3 of these units; the fourth is left as margin.
const UNITS_PER_EXTENT: f64 = 4.0;

/// Cell length in pixels for a surface of the given displayed size.
pub fn cell_size(width: f64, height: f64) -> f64 {
    width.min(height) / UNITS_PER_EXTENT
}

/// Pixel layout of the board on a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    size: f64,
}

impl Geometry {
    pub fn from_size(size: f64) -> Self {
        Self { size }
    }

    /// Matches the surface's backing buffer to its displayed size, then
    /// derives the cell size from it. The buffer is only touched when the
    /// two differ.
    pub fn fit<S: Surface + ?Sized>(surface: &mut S) -> Self {
        let (display_width, display_height) = surface.display_size();
        let target = (
            display_width.max(0.0).round() as u32,
            display_height.max(0.0).round() as u32,
        );
        if surface.buffer_size() != target {
            surface.set_buffer_size(target.0, target.1);
        }
        Self::from_size(cell_size(display_width, display_height))
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    /// Length of the whole 3x3 board.
    pub fn extent(&self) -> f64 {
        self.size * BOARD_WIDTH as f64
    }

    /// Cell under a surface-local pixel, or `None` outside the board.
    pub fn pixel_to_cell(&self, x: f64, y: f64) -> Option<Position> {
        pixel_to_cell(x, y, self.size)
    }

    /// Top-left pixel of a cell.
    pub fn cell_origin(&self, position: Position) -> Point {
        Point::new(
            position.col as f64 * self.size,
            position.row as f64 * self.size,
        )
    }
}

pub fn pixel_to_cell(x: f64, y: f64, size: f64) -> Option<Position> {
    let col = grid_index(x, size)?;
    let row = grid_index(y, size)?;
    Position::new(row, col)
}

fn grid_index(pixel: f64, size: f64) -> Option<usize> {
    let index = (pixel / size).floor();
    // NaN and infinities fail this range check as well.
    if (0.0..BOARD_WIDTH as f64).contains(&index) {
        Some(index as usize)
    } else {
        None
    }
}

/// Converts a page-space pointer position to surface-local pixels.
///
/// The origin is read on every call since the surface may have moved or
/// scrolled since the last event.
pub fn local_pointer_coords<S: Surface + ?Sized>(
    surface: &S,
    client_x: f64,
    client_y: f64,
) -> Point {
    let origin = surface.origin();
    Point::new(client_x - origin.x, client_y - origin.y)
}

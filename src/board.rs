use crate::types::{Cell, EMPTY_GRID, Grid, Marker, Position};

/// Local view of one board.
///
/// Holds two tiers: the authoritative board last received from outside,
/// and provisional moves the local player has painted on top of it since.
/// The emphasis grid marks cells of a declared winning line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    board: Grid,
    emphasis: Grid,
    has_result: bool,
    provisional: Vec<Position>,
}

impl BoardState {
    /// Creates an all-empty board with no result.
    pub fn new() -> Self {
        Self {
            board: EMPTY_GRID,
            emphasis: EMPTY_GRID,
            has_result: false,
            provisional: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn board(&self) -> &Grid {
        &self.board
    }

    pub fn emphasis(&self) -> &Grid {
        &self.emphasis
    }

    pub fn cell(&self, position: Position) -> Cell {
        let (row, col) = position.index();
        self.board[row][col]
    }

    /// Whether an external source has declared a result for this board.
    pub fn has_result(&self) -> bool {
        self.has_result
    }

    /// A cell is emphasized when it is occupied and its emphasis entry
    /// carries the same marker.
    pub fn is_emphasized(&self, position: Position) -> bool {
        let (row, col) = position.index();
        let cell = self.board[row][col];
        !cell.is_empty() && self.emphasis[row][col] == cell
    }

    /// Local moves applied since the last authoritative update.
    pub fn provisional_moves(&self) -> &[Position] {
        &self.provisional
    }

    /// Places `marker` at `(row, col)`.
    /// Returns the placed position, or `None` when the indices are out of
    /// range or the cell is occupied; the board is unchanged in that case.
    pub fn apply_local_move(
        &mut self,
        row: usize,
        col: usize,
        marker: Marker,
    ) -> Option<Position> {
        let position = Position::new(row, col)?;
        if !self.cell(position).is_empty() {
            return None;
        }

        self.board[row][col] = marker.into();
        self.provisional.push(position);
        Some(position)
    }

    /// Replaces the board wholesale. A supplied emphasis grid replaces the
    /// current one and marks the board as having a result; without one the
    /// emphasis grid is kept.
    pub fn apply_external_update(&mut self, board: Grid, emphasis: Option<Grid>) {
        self.board = board;
        self.provisional.clear();
        if let Some(emphasis) = emphasis {
            self.emphasis = emphasis;
            self.has_result = true;
        }
    }

    /// Marker expected to move next on this board.
    pub fn current_turn(&self) -> Marker {
        current_turn_marker(&self.board)
    }

    /// Returns the number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        occupied_count(&self.board)
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

/// Cross moves on an even number of occupied cells, nought on an odd one.
/// This is a display hint only; the external source decides legality.
pub fn current_turn_marker(board: &Grid) -> Marker {
    if occupied_count(board) % 2 == 0 {
        Marker::Cross
    } else {
        Marker::Nought
    }
}

fn occupied_count(board: &Grid) -> usize {
    board.iter().flatten().filter(|cell| !cell.is_empty()).count()
}

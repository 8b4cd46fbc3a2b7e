use crate::board::BoardState;
use crate::config::ViewConfig;
use crate::error::Result;
use crate::geometry::{self, Geometry};
use crate::render::{self, Renderer};
use crate::surface::{FrameSink, Surface};
use crate::types::Position;
use crate::update::{BoardRequest, next_player_status};

/// One board on one surface.
///
/// Owns the board state together with everything needed to show it, and
/// turns pointer presses into optimistic local moves. Server replies are
/// applied through [`BoardView::apply_update`]. Every mutating call
/// finishes its state change before redrawing.
pub struct BoardView<S, F> {
    pub(crate) state: BoardState,
    pub(crate) status: String,
    surface: S,
    sink: F,
    renderer: Renderer,
    geometry: Geometry,
    export_name: Option<String>,
}

impl<S: Surface, F: FrameSink> BoardView<S, F> {
    /// Validates `config`, then draws the empty board.
    pub fn new(surface: S, sink: F, config: ViewConfig) -> Result<Self> {
        config.validate()?;
        let mut view = Self {
            state: BoardState::new(),
            status: String::new(),
            surface,
            sink,
            renderer: Renderer::new(&config),
            geometry: Geometry::from_size(0.0),
            export_name: config.export_on_move.then_some(config.export_name),
        };
        view.status = view.initial_status();
        view.redraw()?;
        Ok(view)
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn sink(&self) -> &F {
        &self.sink
    }

    /// Refits the geometry to the surface and redraws. Used on load and on
    /// every resize.
    pub fn redraw(&mut self) -> Result<()> {
        self.geometry = render::redraw(&self.renderer, &mut self.surface, &self.state)?;
        Ok(())
    }

    /// Handles a pointer press at page-space `(client_x, client_y)`.
    ///
    /// Presses outside the board or on an occupied cell are ignored and
    /// return `Ok(None)`. Otherwise the marker whose turn it appears to be
    /// is placed, the board is redrawn and a frame export is requested.
    pub fn on_pointer_down(&mut self, client_x: f64, client_y: f64) -> Result<Option<Position>> {
        let local = geometry::local_pointer_coords(&self.surface, client_x, client_y);
        let Some(target) = self.geometry.pixel_to_cell(local.x, local.y) else {
            return Ok(None);
        };
        if !self.state.cell(target).is_empty() {
            return Ok(None);
        }

        let marker = self.state.current_turn();
        let (row, col) = (target.row as usize, target.col as usize);
        let Some(placed) = self.state.apply_local_move(row, col, marker) else {
            return Ok(None);
        };
        tracing::debug!(row, col, %marker, "placed provisional marker");

        self.draw()?;
        self.export_frame();
        Ok(Some(placed))
    }

    /// Clears the board, the declared result and the status line.
    pub fn reset(&mut self) -> Result<()> {
        self.state.reset();
        self.status = self.initial_status();
        tracing::debug!("board reset");
        self.draw()
    }

    /// Request body carrying the board as currently shown, including
    /// provisional moves.
    pub fn board_request(&self) -> BoardRequest {
        BoardRequest {
            board: *self.state.board(),
        }
    }

    pub(crate) fn draw(&mut self) -> Result<()> {
        self.renderer.draw_board(&mut self.surface, &self.geometry, &self.state)?;
        Ok(())
    }

    fn initial_status(&self) -> String {
        next_player_status(self.state.current_turn())
    }

    fn export_frame(&mut self) {
        let Some(name) = self.export_name.as_deref() else {
            return;
        };
        if let Err(err) = self.sink.export_frame(name) {
            tracing::warn!(%err, name, "frame export failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, RecordingSink, RecordingSurface};
    use crate::types::{Cell, Marker};

    fn view(width: f64, height: f64) -> BoardView<RecordingSurface, RecordingSink> {
        BoardView::new(
            RecordingSurface::new(width, height),
            RecordingSink::default(),
            ViewConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn new_view_draws_empty_board() {
        let view = view(300.0, 300.0);

        assert_eq!(view.geometry().size(), 75.0);
        assert_eq!(view.status(), "Next Player: X");
        assert_eq!(view.surface().strokes().len(), 1);
    }

    #[test]
    fn click_places_marker_and_exports() {
        let mut view = view(300.0, 300.0);

        let placed = view.on_pointer_down(80.0, 80.0).unwrap();

        assert_eq!(placed, Some(Position { row: 1, col: 1 }));
        assert_eq!(view.state().board()[1], [Cell::Empty, Cell::Cross, Cell::Empty]);
        assert_eq!(view.state().current_turn(), Marker::Nought);
        assert_eq!(view.sink().exported, vec!["x.png".to_string()]);
    }

    #[test]
    fn markers_alternate_between_clicks() {
        let mut view = view(300.0, 300.0);

        view.on_pointer_down(10.0, 10.0).unwrap();
        view.on_pointer_down(160.0, 10.0).unwrap();

        assert_eq!(view.state().board()[0], [Cell::Cross, Cell::Empty, Cell::Nought]);
    }

    #[test]
    fn click_outside_board_does_nothing() {
        let mut view = view(300.0, 300.0);
        view.surface_mut().take_ops();

        assert_eq!(view.on_pointer_down(305.0, 10.0).unwrap(), None);
        assert_eq!(view.on_pointer_down(10.0, -3.0).unwrap(), None);

        assert_eq!(view.state(), &BoardState::new());
        assert!(view.surface().ops().is_empty());
        assert!(view.sink().exported.is_empty());
    }

    #[test]
    fn click_on_occupied_cell_does_nothing() {
        let mut view = view(300.0, 300.0);
        view.on_pointer_down(80.0, 80.0).unwrap();
        view.surface_mut().take_ops();
        let before = view.state().clone();

        assert_eq!(view.on_pointer_down(100.0, 100.0).unwrap(), None);

        assert_eq!(view.state(), &before);
        assert!(view.surface().ops().is_empty());
        assert_eq!(view.sink().exported.len(), 1);
    }

    #[test]
    fn click_uses_surface_origin() {
        let surface = RecordingSurface::new(300.0, 300.0).with_origin(100.0, 50.0);
        let mut view =
            BoardView::new(surface, RecordingSink::default(), ViewConfig::default()).unwrap();

        let placed = view.on_pointer_down(110.0, 210.0).unwrap();

        assert_eq!(placed, Some(Position { row: 2, col: 0 }));
    }

    #[test]
    fn failed_export_leaves_move_in_place() {
        let mut view = BoardView::new(
            RecordingSurface::new(300.0, 300.0),
            RecordingSink::failing(),
            ViewConfig::default(),
        )
        .unwrap();

        let placed = view.on_pointer_down(10.0, 10.0).unwrap();

        assert_eq!(placed, Some(Position { row: 0, col: 0 }));
        assert_eq!(view.state().board()[0][0], Cell::Cross);
    }

    #[test]
    fn export_can_be_disabled() {
        let config = ViewConfig {
            export_on_move: false,
            ..ViewConfig::default()
        };
        let mut view =
            BoardView::new(RecordingSurface::new(300.0, 300.0), RecordingSink::default(), config)
                .unwrap();

        view.on_pointer_down(10.0, 10.0).unwrap();

        assert!(view.sink().exported.is_empty());
    }

    #[test]
    fn resize_rescales_hit_testing() {
        let mut view = view(300.0, 300.0);
        view.surface_mut().set_display_size(600.0, 600.0);

        view.redraw().unwrap();

        assert_eq!(view.geometry().size(), 150.0);
        assert_eq!(
            view.on_pointer_down(200.0, 10.0).unwrap(),
            Some(Position { row: 0, col: 1 })
        );
        assert!(view.surface().ops().contains(&DrawOp::Resize {
            width: 600,
            height: 600
        }));
    }

    #[test]
    fn reset_restores_empty_board_and_status() {
        let mut view = view(300.0, 300.0);
        view.on_pointer_down(10.0, 10.0).unwrap();
        view.status = "A draw".to_string();
        view.surface_mut().take_ops();

        view.reset().unwrap();

        assert_eq!(view.state(), &BoardState::new());
        assert_eq!(view.status(), "Next Player: X");
        assert_eq!(view.surface().strokes().len(), 1);
    }

    #[test]
    fn board_request_includes_provisional_moves() {
        let mut view = view(300.0, 300.0);
        view.on_pointer_down(160.0, 160.0).unwrap();

        let request = view.board_request();

        assert_eq!(request.board[2][2], Cell::Cross);
        assert_eq!(view.state().provisional_moves(), &[Position { row: 2, col: 2 }]);
    }
}

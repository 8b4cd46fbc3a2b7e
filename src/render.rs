use crate::board::BoardState;
use crate::config::{Palette, ViewConfig};
use crate::error::SurfaceError;
use crate::geometry::Geometry;
use crate::surface::{Point, Rect, Shape, Stroke, Surface};
use crate::types::{BOARD_WIDTH, Marker, Position};

/// Inset of the area cleared before a marker is drawn, as a fraction of
/// the cell size.
const CLEAR_INSET: f64 = 0.1;
/// Half-width of a marker glyph relative to the cell size.
const MARKER_HALF_SPAN: f64 = 0.3;
/// Vertical extent of a cross within its cell, as fractions of the cell
/// size measured from the top edge.
const CROSS_TOP: f64 = 0.2;
const CROSS_BOTTOM: f64 = 0.8;

/// Draws the grid and markers of a board onto a [`Surface`].
#[derive(Debug, Clone, PartialEq)]
pub struct Renderer {
    palette: Palette,
    max_line_width: f64,
    line_width_ratio: f64,
}

impl Renderer {
    pub fn new(config: &ViewConfig) -> Self {
        Self {
            palette: config.palette.clone(),
            max_line_width: config.max_line_width,
            line_width_ratio: config.line_width_ratio,
        }
    }

    pub fn line_width(&self, geometry: &Geometry) -> f64 {
        self.max_line_width.min(geometry.size() * self.line_width_ratio)
    }

    /// Clears the surface and strokes the two inner vertical and two inner
    /// horizontal grid lines.
    pub fn draw_grid_lines<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        geometry: &Geometry,
    ) -> Result<(), SurfaceError> {
        surface.clear();

        let size = geometry.size();
        let extent = geometry.extent();
        let mut segments = Vec::with_capacity(2 * (BOARD_WIDTH - 1));
        for line in 1..BOARD_WIDTH {
            let offset = line as f64 * size;
            segments.push((Point::new(offset, 0.0), Point::new(offset, extent)));
        }
        for line in 1..BOARD_WIDTH {
            let offset = line as f64 * size;
            segments.push((Point::new(0.0, offset), Point::new(extent, offset)));
        }

        surface.stroke(
            &Shape::Segments(segments),
            &Stroke {
                color: self.palette.grid.clone(),
                width: self.line_width(geometry),
            },
        )
    }

    /// Draws one marker, clearing the inner 80% of its cell first so a
    /// changed cell never keeps a stale stroke.
    pub fn draw_marker<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        geometry: &Geometry,
        position: Position,
        marker: Marker,
        emphasized: bool,
    ) -> Result<(), SurfaceError> {
        let size = geometry.size();
        let cell = geometry.cell_origin(position);
        surface.clear_rect(Rect::new(
            cell.x + CLEAR_INSET * size,
            cell.y + CLEAR_INSET * size,
            (1.0 - 2.0 * CLEAR_INSET) * size,
            (1.0 - 2.0 * CLEAR_INSET) * size,
        ));

        let mid_x = cell.x + 0.5 * size;
        let half = MARKER_HALF_SPAN * size;
        let shape = match marker {
            Marker::Cross => {
                let top = cell.y + CROSS_TOP * size;
                let bottom = cell.y + CROSS_BOTTOM * size;
                Shape::Segments(vec![
                    (Point::new(mid_x - half, top), Point::new(mid_x + half, bottom)),
                    (Point::new(mid_x - half, bottom), Point::new(mid_x + half, top)),
                ])
            }
            Marker::Nought => Shape::Circle {
                center: Point::new(mid_x, cell.y + 0.5 * size),
                radius: half,
            },
        };

        surface.stroke(
            &shape,
            &Stroke {
                color: self.marker_color(marker, emphasized).to_string(),
                width: self.line_width(geometry),
            },
        )
    }

    /// Redraws the whole board: grid first, then every occupied cell.
    pub fn draw_board<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        geometry: &Geometry,
        state: &BoardState,
    ) -> Result<(), SurfaceError> {
        self.draw_grid_lines(surface, geometry)?;
        for position in Position::all() {
            if let Some(marker) = state.cell(position).marker() {
                let emphasized = state.is_emphasized(position);
                self.draw_marker(surface, geometry, position, marker, emphasized)?;
            }
        }
        Ok(())
    }

    pub fn marker_color(&self, marker: Marker, emphasized: bool) -> &str {
        if emphasized {
            return &self.palette.emphasis;
        }
        match marker {
            Marker::Cross => &self.palette.cross,
            Marker::Nought => &self.palette.nought,
        }
    }
}

/// Fits the geometry to the surface, then redraws the board.
pub fn redraw<S: Surface + ?Sized>(
    renderer: &Renderer,
    surface: &mut S,
    state: &BoardState,
) -> Result<Geometry, SurfaceError> {
    let geometry = Geometry::fit(surface);
    renderer.draw_board(surface, &geometry, state)?;
    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, RecordingSurface};
    use crate::types::Cell;

    fn renderer() -> Renderer {
        Renderer::new(&ViewConfig::default())
    }

    fn pos(row: u8, col: u8) -> Position {
        Position { row, col }
    }

    #[test]
    fn grid_lines_clear_then_stroke_four_lines() {
        let mut surface = RecordingSurface::new(300.0, 300.0);
        let geometry = Geometry::fit(&mut surface);
        surface.take_ops();

        renderer().draw_grid_lines(&mut surface, &geometry).unwrap();

        let ops = surface.ops();
        assert_eq!(ops[0], DrawOp::Clear(Rect::new(0.0, 0.0, 300.0, 300.0)));
        let DrawOp::Stroke { shape, stroke } = &ops[1] else {
            panic!("expected a stroke, got {:?}", ops[1]);
        };
        assert_eq!(stroke.width, 7.5);
        assert_eq!(stroke.color, Palette::default().grid);
        assert_eq!(
            shape,
            &Shape::Segments(vec![
                (Point::new(75.0, 0.0), Point::new(75.0, 225.0)),
                (Point::new(150.0, 0.0), Point::new(150.0, 225.0)),
                (Point::new(0.0, 75.0), Point::new(225.0, 75.0)),
                (Point::new(0.0, 150.0), Point::new(225.0, 150.0)),
            ])
        );
    }

    #[test]
    fn line_width_is_capped() {
        let renderer = renderer();

        assert_eq!(renderer.line_width(&Geometry::from_size(50.0)), 5.0);
        assert_eq!(renderer.line_width(&Geometry::from_size(400.0)), 10.0);
    }

    #[test]
    fn cross_marker_geometry() {
        let mut surface = RecordingSurface::new(400.0, 400.0);
        let geometry = Geometry::from_size(100.0);

        renderer()
            .draw_marker(&mut surface, &geometry, pos(1, 2), Marker::Cross, false)
            .unwrap();

        assert_eq!(
            surface.ops()[0],
            DrawOp::Clear(Rect::new(210.0, 110.0, 80.0, 80.0))
        );
        let strokes = surface.strokes();
        assert_eq!(
            strokes,
            vec![(
                &Shape::Segments(vec![
                    (Point::new(220.0, 120.0), Point::new(280.0, 180.0)),
                    (Point::new(220.0, 180.0), Point::new(280.0, 120.0)),
                ]),
                "rgba(0, 196, 64, 1)"
            )]
        );
    }

    #[test]
    fn nought_marker_is_centred_circle() {
        let mut surface = RecordingSurface::new(400.0, 400.0);
        let geometry = Geometry::from_size(100.0);

        renderer()
            .draw_marker(&mut surface, &geometry, pos(0, 0), Marker::Nought, false)
            .unwrap();

        assert_eq!(
            surface.strokes(),
            vec![(
                &Shape::Circle {
                    center: Point::new(50.0, 50.0),
                    radius: 30.0
                },
                "rgba(0, 0, 196, 1)"
            )]
        );
    }

    #[test]
    fn emphasized_markers_share_the_alert_colour() {
        let renderer = renderer();
        let emphasis = renderer.marker_color(Marker::Cross, true).to_string();

        assert_eq!(renderer.marker_color(Marker::Nought, true), emphasis);
        assert_ne!(renderer.marker_color(Marker::Cross, false), emphasis);
        assert_ne!(renderer.marker_color(Marker::Nought, false), emphasis);
        assert_ne!(
            renderer.marker_color(Marker::Cross, false),
            renderer.marker_color(Marker::Nought, false)
        );
    }

    #[test]
    fn board_draws_only_occupied_cells_with_emphasis() {
        let (x, o, e) = (Cell::Cross, Cell::Nought, Cell::Empty);
        let mut state = BoardState::new();
        state.apply_external_update(
            [[x, o, e], [o, x, e], [e, e, x]],
            Some([[x, e, e], [e, x, e], [e, e, x]]),
        );
        let mut surface = RecordingSurface::new(300.0, 300.0);

        redraw(&renderer(), &mut surface, &state).unwrap();

        let colors: Vec<&str> = surface.strokes().into_iter().map(|(_, c)| c).collect();
        let palette = Palette::default();
        assert_eq!(
            colors,
            vec![
                palette.grid.as_str(),
                palette.emphasis.as_str(),
                palette.nought.as_str(),
                palette.nought.as_str(),
                palette.emphasis.as_str(),
                palette.emphasis.as_str(),
            ]
        );
    }

    #[test]
    fn empty_board_draws_only_the_grid() {
        let mut surface = RecordingSurface::new(300.0, 300.0);

        redraw(&renderer(), &mut surface, &BoardState::new()).unwrap();

        assert_eq!(surface.strokes().len(), 1);
    }
}

//! Drawing backend seam.
//!
//! The renderer only talks to [`Surface`], and the controller only exports
//! frames through [`FrameSink`]. The browser implementations live in
//! [`crate::web`]; [`RecordingSurface`] and [`RecordingSink`] are in-memory
//! backends for headless use.

use crate::error::SurfaceError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A path to be stroked in a single pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Disconnected straight segments, each `(from, to)`.
    Segments(Vec<(Point, Point)>),
    /// A full circle.
    Circle { center: Point, radius: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
}

pub trait Surface {
    /// Size the surface is displayed at, in CSS pixels.
    fn display_size(&self) -> (f64, f64);

    /// Size of the drawable backing buffer.
    fn buffer_size(&self) -> (u32, u32);

    fn set_buffer_size(&mut self, width: u32, height: u32);

    /// Top-left corner of the surface's bounding box in page space.
    fn origin(&self) -> Point;

    fn clear_rect(&mut self, rect: Rect);

    fn stroke(&mut self, shape: &Shape, stroke: &Stroke) -> Result<(), SurfaceError>;

    fn clear(&mut self) {
        let (width, height) = self.buffer_size();
        self.clear_rect(Rect::new(0.0, 0.0, width as f64, height as f64));
    }
}

/// Accepts "export the current frame" requests.
///
/// Implementations must not block: a request is dispatched and its outcome
/// is reported out of band.
pub trait FrameSink {
    fn export_frame(&mut self, name: &str) -> Result<(), SurfaceError>;
}

/// A drawing operation captured by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Resize { width: u32, height: u32 },
    Clear(Rect),
    Stroke { shape: Shape, stroke: Stroke },
}

/// Surface that records every operation instead of rasterising.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSurface {
    display: (f64, f64),
    buffer: (u32, u32),
    origin: Point,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    /// Creates a surface displayed at `width` x `height` whose backing
    /// buffer has not been sized yet.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            display: (width, height),
            buffer: (0, 0),
            origin: Point::new(0.0, 0.0),
            ops: Vec::new(),
        }
    }

    pub fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.origin = Point::new(x, y);
        self
    }

    pub fn set_display_size(&mut self, width: f64, height: f64) {
        self.display = (width, height);
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Stroked shapes paired with their colour, in drawing order.
    pub fn strokes(&self) -> Vec<(&Shape, &str)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Stroke { shape, stroke } => Some((shape, stroke.color.as_str())),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn display_size(&self) -> (f64, f64) {
        self.display
    }

    fn buffer_size(&self) -> (u32, u32) {
        self.buffer
    }

    fn set_buffer_size(&mut self, width: u32, height: u32) {
        self.buffer = (width, height);
        self.ops.push(DrawOp::Resize { width, height });
    }

    fn origin(&self) -> Point {
        self.origin
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::Clear(rect));
    }

    fn stroke(&mut self, shape: &Shape, stroke: &Stroke) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::Stroke {
            shape: shape.clone(),
            stroke: stroke.clone(),
        });
        Ok(())
    }
}

/// Frame sink that remembers requested names and can be told to fail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSink {
    pub exported: Vec<String>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            exported: Vec::new(),
            fail: true,
        }
    }
}

impl FrameSink for RecordingSink {
    fn export_frame(&mut self, name: &str) -> Result<(), SurfaceError> {
        if self.fail {
            return Err(SurfaceError::Export(format!("sink refused {name}")));
        }
        self.exported.push(name.to_string());
        Ok(())
    }
}

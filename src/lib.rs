use wasm_bindgen::prelude::*;

pub mod board;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod render;
pub mod surface;
pub mod types;
pub mod update;
pub mod web;

pub use board::BoardState;
pub use config::{Palette, ViewConfig};
pub use controller::BoardView;
pub use error::{Error, Result, SurfaceError};
pub use geometry::Geometry;
pub use render::Renderer;
pub use types::{Cell, Grid, Marker, Position};
pub use update::{BoardRequest, BoardUpdate, Outcome, UpdateEnvelope};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

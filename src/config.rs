use serde::Deserialize;

use crate::error::{Error, Result};

/// Stroke colours as CSS colour strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub grid: String,
    pub cross: String,
    pub nought: String,
    /// Markers belonging to a declared winning line.
    pub emphasis: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            grid: "rgba(0, 0, 0, 1)".to_string(),
            cross: "rgba(0, 196, 64, 1)".to_string(),
            nought: "rgba(0, 0, 196, 1)".to_string(),
            emphasis: "rgba(255, 0, 0, 1)".to_string(),
        }
    }
}

/// Options accepted when a board view is created. Every field is optional
/// when deserialised.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewConfig {
    pub palette: Palette,
    /// Upper bound for the grid stroke width, in pixels.
    pub max_line_width: f64,
    /// Grid stroke width as a fraction of the cell size.
    pub line_width_ratio: f64,
    pub export_on_move: bool,
    pub export_name: String,
    pub log_level: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            max_line_width: 10.0,
            line_width_ratio: 0.1,
            export_on_move: true,
            export_name: "x.png".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ViewConfig {
    pub fn validate(&self) -> Result<()> {
        let palette = &self.palette;
        if palette.cross == palette.nought
            || palette.cross == palette.emphasis
            || palette.nought == palette.emphasis
        {
            return Err(Error::Config(
                "cross, nought and emphasis colours must be distinct".to_string(),
            ));
        }
        if !(self.max_line_width > 0.0) || !(self.line_width_ratio > 0.0) {
            return Err(Error::Config(format!(
                "line width settings must be positive (max {}, ratio {})",
                self.max_line_width, self.line_width_ratio
            )));
        }
        if self.export_on_move && self.export_name.trim().is_empty() {
            return Err(Error::Config("export name is empty".to_string()));
        }
        Ok(())
    }
}

use std::path::PathBuf;

use ab_glyph::FontVec;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ConfigError, Result};

/// Display parameters shared by every chart renderer
///
/// Colors are plain RGB triples so the style can live in a TOML config
/// section unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartStyle {
    /// Canvas width in pixels
    pub width: u32,

    /// Canvas height in pixels
    pub height: u32,

    /// Margins around the plot area (left, right, top, bottom)
    pub margins: (u32, u32, u32, u32),

    /// Canvas background color
    pub background: [u8; 3],

    /// Axis, tick and text color
    pub axis_color: [u8; 3],

    /// Trace thickness in pixels
    pub line_width: u32,

    /// Number of ticks per axis
    pub tick_count: u32,

    /// Text height in pixels for labels and tick values
    pub font_size: f32,

    /// TTF/OTF file for label text; with no font the chart renders
    /// geometry only
    pub font_path: Option<PathBuf>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            margins: (64, 64, 40, 48),
            background: [255, 255, 255],
            axis_color: [20, 20, 20],
            line_width: 2,
            tick_count: 5,
            font_size: 14.0,
            font_path: None,
        }
    }
}

impl ChartStyle {
    /// The lab's dark theme for animated signal charts: wide short canvas,
    /// black background, light axes, thick trace
    pub fn dark_signal() -> Self {
        Self {
            width: 700,
            height: 250,
            margins: (56, 16, 12, 36),
            background: [0, 0, 0],
            axis_color: [235, 235, 235],
            line_width: 5,
            tick_count: 5,
            font_size: 12.0,
            font_path: None,
        }
    }

    /// Pixel width of the plot area inside the margins
    pub fn plot_width(&self) -> u32 {
        let (left, right, _, _) = self.margins;
        self.width.saturating_sub(left + right)
    }

    /// Pixel height of the plot area inside the margins
    pub fn plot_height(&self) -> u32 {
        let (_, _, top, bottom) = self.margins;
        self.height.saturating_sub(top + bottom)
    }

    /// Load the configured font, if any
    pub fn load_font(&self) -> Result<Option<FontVec>> {
        let Some(path) = &self.font_path else {
            return Ok(None);
        };
        let bytes = std::fs::read(path).map_err(|e| ChartError::FontLoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let font = FontVec::try_from_vec(bytes).map_err(|e| ChartError::FontLoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(font))
    }

    /// Check the style describes a drawable canvas
    pub fn validate(&self) -> Result<()> {
        if self.plot_width() == 0 || self.plot_height() == 0 {
            return Err(ConfigError::InvalidValue {
                key: "chart.margins".to_string(),
                value: format!(
                    "{:?} leaves no plot area in {}x{}",
                    self.margins, self.width, self.height
                ),
            }
            .into());
        }

        if self.tick_count < 2 {
            return Err(ConfigError::InvalidValue {
                key: "chart.tick_count".to_string(),
                value: self.tick_count.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_is_valid() {
        assert!(ChartStyle::default().validate().is_ok());
        assert!(ChartStyle::dark_signal().validate().is_ok());
    }

    #[test]
    fn test_margins_swallowing_canvas_are_invalid() {
        let style = ChartStyle {
            width: 100,
            height: 100,
            margins: (60, 60, 10, 10),
            ..Default::default()
        };
        assert!(style.validate().is_err());
    }

    #[test]
    fn test_missing_font_file_is_a_chart_error() {
        let style = ChartStyle {
            font_path: Some(PathBuf::from("/nonexistent/font.ttf")),
            ..Default::default()
        };
        let result = style.load_font();
        assert!(matches!(
            result,
            Err(crate::error::PhotometryError::Chart(
                ChartError::FontLoadFailed { .. }
            ))
        ));
    }

    #[test]
    fn test_no_font_configured_loads_none() {
        assert!(ChartStyle::default().load_font().unwrap().is_none());
    }

    #[test]
    fn test_plot_area_dimensions() {
        let style = ChartStyle::default();
        assert_eq!(style.plot_width(), 640 - 64 - 64);
        assert_eq!(style.plot_height(), 480 - 40 - 48);
    }
}

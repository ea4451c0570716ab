//! Static line charts: single trace and dual-scale dual trace.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::chart::canvas::{AxisSide, ChartCanvas};
use crate::chart::style::ChartStyle;
use crate::error::{ChartError, Result};
use crate::video::Frame;

/// A single-trace line chart over explicit axis limits
///
/// Rendering returns the raster; persisting it is a separate, opt-in call
/// that names the file after the title.
#[derive(Debug, Clone)]
pub struct LineChart<'a> {
    pub x: &'a [f64],
    pub y: &'a [f64],
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub x_lim: (f64, f64),
    pub y_lim: (f64, f64),
    pub color: [u8; 3],
}

impl LineChart<'_> {
    /// Draw the chart into a frame
    pub fn render(&self, style: &ChartStyle) -> Result<Frame> {
        check_series(self.x, self.y)?;
        let font = style.load_font()?;

        let mut canvas = ChartCanvas::new(style, font.as_ref(), self.x_lim)?;
        canvas.draw_plot_border();
        canvas.draw_x_ticks();
        canvas.draw_y_ticks(self.y_lim, AxisSide::Left);
        canvas.draw_series(self.x, self.y, self.y_lim, self.color, style.line_width);
        canvas.draw_title(self.title);
        canvas.draw_x_label(self.x_label);
        canvas.draw_y_label(self.y_label, AxisSide::Left, style.axis_color);

        Ok(canvas.into_frame())
    }

    /// Render and write `Plot_<title>.png` into `dir`
    pub fn save_into(&self, style: &ChartStyle, dir: &Path) -> Result<PathBuf> {
        let frame = self.render(style)?;
        save_plot(&frame, self.title, dir)
    }
}

/// Two y-series against a shared x-axis on independent left/right scales
#[derive(Debug, Clone)]
pub struct DualLineChart<'a> {
    pub x: &'a [f64],
    pub y1: &'a [f64],
    pub y2: &'a [f64],
    pub title: &'a str,
    pub x_label: &'a str,
    pub y1_label: &'a str,
    pub y2_label: &'a str,
    pub x_lim: (f64, f64),
    pub y1_lim: (f64, f64),
    pub y2_lim: (f64, f64),
    pub color1: [u8; 3],
    pub color2: [u8; 3],
}

impl DualLineChart<'_> {
    /// Draw both traces into a frame, with a combined legend
    pub fn render(&self, style: &ChartStyle) -> Result<Frame> {
        check_series(self.x, self.y1)?;
        check_series(self.x, self.y2)?;
        let font = style.load_font()?;

        let mut canvas = ChartCanvas::new(style, font.as_ref(), self.x_lim)?;
        canvas.draw_plot_border();
        canvas.draw_x_ticks();
        canvas.draw_y_ticks(self.y1_lim, AxisSide::Left);
        canvas.draw_y_ticks(self.y2_lim, AxisSide::Right);
        canvas.draw_series(self.x, self.y1, self.y1_lim, self.color1, style.line_width);
        canvas.draw_series(self.x, self.y2, self.y2_lim, self.color2, style.line_width);
        canvas.draw_title(self.title);
        canvas.draw_x_label(self.x_label);
        // Axis labels take their trace's color, as the lab's originals did
        canvas.draw_y_label(self.y1_label, AxisSide::Left, self.color1);
        canvas.draw_y_label(self.y2_label, AxisSide::Right, self.color2);
        canvas.draw_legend(&[(self.y1_label, self.color1), (self.y2_label, self.color2)]);

        Ok(canvas.into_frame())
    }

    /// Render and write `Plot_<title>.png` into `dir`
    pub fn save_into(&self, style: &ChartStyle, dir: &Path) -> Result<PathBuf> {
        let frame = self.render(style)?;
        save_plot(&frame, self.title, dir)
    }
}

/// File name a saved chart takes: `Plot_<title>.png`
pub fn plot_file_name(title: &str) -> String {
    format!("Plot_{}.png", title)
}

fn save_plot(frame: &Frame, title: &str, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(plot_file_name(title));
    frame.save_png(&path).map_err(|e| ChartError::SaveFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    info!("Saved chart to {}", path.display());
    Ok(path)
}

fn check_series(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(ChartError::SeriesLengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn flat_trace() -> (Vec<f64>, Vec<f64>) {
        let x: Vec<f64> = (0..=10).map(|i| i as f64).collect();
        let y = vec![5.0; 11];
        (x, y)
    }

    #[test]
    fn test_render_produces_canvas_sized_frame() {
        let (x, y) = flat_trace();
        let chart = LineChart {
            x: &x,
            y: &y,
            title: "Session",
            x_label: "Time(sec)",
            y_label: "dF/F (%)",
            x_lim: (0.0, 10.0),
            y_lim: (0.0, 10.0),
            color: [0, 160, 0],
        };
        let style = ChartStyle::default();
        let frame = chart.render(&style).unwrap();
        assert_eq!(frame.width(), style.width);
        assert_eq!(frame.height(), style.height);
    }

    #[test]
    fn test_render_draws_trace_in_its_color() {
        let (x, y) = flat_trace();
        let chart = LineChart {
            x: &x,
            y: &y,
            title: "",
            x_label: "",
            y_label: "",
            x_lim: (0.0, 10.0),
            y_lim: (0.0, 10.0),
            color: [0, 160, 0],
        };
        let frame = chart.render(&ChartStyle::default()).unwrap();
        let mut found = false;
        'scan: for y in 0..frame.height() {
            for x in 0..frame.width() {
                if frame.get_pixel(x, y) == [0, 160, 0] {
                    found = true;
                    break 'scan;
                }
            }
        }
        assert!(found);
    }

    #[test]
    fn test_mismatched_series_is_rejected() {
        let x = vec![0.0, 1.0, 2.0];
        let y = vec![0.0, 1.0];
        let chart = LineChart {
            x: &x,
            y: &y,
            title: "t",
            x_label: "",
            y_label: "",
            x_lim: (0.0, 2.0),
            y_lim: (0.0, 1.0),
            color: [0, 0, 0],
        };
        assert!(chart.render(&ChartStyle::default()).is_err());
    }

    #[test]
    fn test_save_into_names_file_after_title() {
        let (x, y) = flat_trace();
        let chart = LineChart {
            x: &x,
            y: &y,
            title: "GCaMP_trial_1",
            x_label: "",
            y_label: "",
            x_lim: (0.0, 10.0),
            y_lim: (0.0, 10.0),
            color: [0, 160, 0],
        };
        let dir = tempdir().unwrap();
        let path = chart.save_into(&ChartStyle::default(), dir.path()).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            "Plot_GCaMP_trial_1.png"
        );
        assert!(path.is_file());
    }

    #[test]
    fn test_dual_chart_draws_both_traces() {
        let x: Vec<f64> = (0..=10).map(|i| i as f64).collect();
        // Different normalized heights so the traces land on distinct rows
        let y1 = vec![1.0; 11];
        let y2 = vec![600.0; 11];
        let chart = DualLineChart {
            x: &x,
            y1: &y1,
            y2: &y2,
            title: "Both signals",
            x_label: "Time(sec)",
            y1_label: "Isosbestic",
            y2_label: "GCaMP",
            x_lim: (0.0, 10.0),
            y1_lim: (0.0, 4.0),
            y2_lim: (0.0, 800.0),
            color1: [180, 0, 180],
            color2: [0, 160, 0],
        };
        let frame = chart.render(&ChartStyle::default()).unwrap();

        let mut seen1 = false;
        let mut seen2 = false;
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                match frame.get_pixel(x, y) {
                    p if p == [180, 0, 180] => seen1 = true,
                    p if p == [0, 160, 0] => seen2 = true,
                    _ => {}
                }
            }
        }
        assert!(seen1 && seen2);
    }

    #[test]
    fn test_plot_file_name() {
        assert_eq!(plot_file_name("trial"), "Plot_trial.png");
    }
}

//! Progressive-reveal chart animation encoded as a video.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::chart::canvas::{AxisSide, ChartCanvas};
use crate::chart::style::ChartStyle;
use crate::error::{ChartError, Result};
use crate::video::{EncodeSettings, VideoWriter};

/// An animated line chart: the trace draws itself from empty to complete,
/// one sample per animation frame, over a fixed dashed reference line at
/// time zero.
///
/// `axis_rate` and `render_fps` are deliberately independent parameters:
/// the first scales the x-axis (sample `i` appears at `i / axis_rate -
/// offset`), the second is the encode rate of the output video. Callers
/// reconcile the two when they want wall-clock playback to match the
/// signal's time base.
#[derive(Debug, Clone)]
pub struct AnimatedChart<'a> {
    /// Signal samples to reveal
    pub data: &'a [f64],

    /// Samples per x-axis unit
    pub axis_rate: f64,

    /// X-axis shift: the axis spans `-offset .. len/axis_rate - offset`
    pub offset: f64,

    /// Output video frame rate
    pub render_fps: f64,

    pub x_label: &'a str,
    pub y_label: &'a str,

    /// Trace color
    pub color: [u8; 3],
}

/// Summary of a finished animation render
#[derive(Debug, Clone)]
pub struct AnimationReport {
    pub path: PathBuf,
    pub frames_written: u64,
}

impl AnimatedChart<'_> {
    /// Render the animation to `path`
    pub fn render_to<P: AsRef<Path>>(
        &self,
        path: P,
        style: &ChartStyle,
        settings: &EncodeSettings,
    ) -> Result<AnimationReport> {
        let path = path.as_ref();

        if self.data.is_empty() {
            return Err(ChartError::EmptyData.into());
        }
        check_positive("axis_rate", self.axis_rate)?;
        check_positive("render_fps", self.render_fps)?;

        let y_lim = observed_range(self.data);
        let x_lim = (
            -self.offset,
            self.data.len() as f64 / self.axis_rate - self.offset,
        );
        let xs = x_positions(self.data.len(), self.axis_rate, self.offset);
        let font = style.load_font()?;

        info!(
            "Rendering animated chart: {} samples -> {} ({} frames at {} fps)",
            self.data.len(),
            path.display(),
            self.data.len() + 1,
            self.render_fps
        );

        let mut writer =
            VideoWriter::create(path, style.width, style.height, self.render_fps, settings)?;

        // One frame per revealed sample, plus the empty first frame, so the
        // animation runs from nothing to the complete trace.
        for revealed in 0..=self.data.len() {
            let mut canvas = ChartCanvas::new(style, font.as_ref(), x_lim)?;
            canvas.draw_plot_border();
            canvas.draw_x_ticks();
            canvas.draw_y_ticks(y_lim, AxisSide::Left);
            canvas.draw_vline_dashed(0.0, style.axis_color);
            canvas.draw_series(
                &xs[..revealed],
                &self.data[..revealed],
                y_lim,
                self.color,
                style.line_width,
            );
            canvas.draw_x_label(self.x_label);
            canvas.draw_y_label(self.y_label, AxisSide::Left, style.axis_color);

            writer.write_frame(&canvas.into_frame())?;
            if revealed % 100 == 0 {
                debug!("Animated chart frame {}/{}", revealed, self.data.len());
            }
        }

        let frames_written = writer.finish()?;
        info!(
            "Animated chart complete: {} ({} frames)",
            path.display(),
            frames_written
        );

        Ok(AnimationReport {
            path: path.to_path_buf(),
            frames_written,
        })
    }
}

/// X position of every sample index under the axis scaling
fn x_positions(len: usize, axis_rate: f64, offset: f64) -> Vec<f64> {
    (0..len)
        .map(|i| i as f64 / axis_rate - offset)
        .collect()
}

/// Whole-series y-limits; a flat trace still gets a nonzero span
fn observed_range(data: &[f64]) -> (f64, f64) {
    let mut low = f64::INFINITY;
    let mut high = f64::NEG_INFINITY;
    for &v in data {
        low = low.min(v);
        high = high.max(v);
    }
    if low == high {
        (low - 0.5, high + 0.5)
    } else {
        (low, high)
    }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if !(value > 0.0) || !value.is_finite() {
        return Err(ChartError::InvalidRange {
            axis: name.to_string(),
            low: 0.0,
            high: value,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_positions_scale_and_shift() {
        let xs = x_positions(4, 2.0, 1.0);
        assert_eq!(xs, vec![-1.0, -0.5, 0.0, 0.5]);
    }

    #[test]
    fn test_observed_range_covers_whole_series() {
        assert_eq!(observed_range(&[1.0, -2.0, 3.0, 0.0]), (-2.0, 3.0));
    }

    #[test]
    fn test_observed_range_pads_flat_traces() {
        assert_eq!(observed_range(&[2.0, 2.0, 2.0]), (1.5, 2.5));
    }

    #[test]
    fn test_empty_data_is_rejected_before_any_io() {
        let chart = AnimatedChart {
            data: &[],
            axis_rate: 10.0,
            offset: 0.0,
            render_fps: 10.0,
            x_label: "",
            y_label: "",
            color: [0, 200, 0],
        };
        let result = chart.render_to(
            "never_created.mp4",
            &ChartStyle::dark_signal(),
            &EncodeSettings::h264(),
        );
        assert!(matches!(
            result,
            Err(crate::error::PhotometryError::Chart(ChartError::EmptyData))
        ));
    }

    #[test]
    fn test_nonpositive_rates_are_rejected() {
        let data = vec![1.0, 2.0];
        let chart = AnimatedChart {
            data: &data,
            axis_rate: 0.0,
            offset: 0.0,
            render_fps: 10.0,
            x_label: "",
            y_label: "",
            color: [0, 200, 0],
        };
        assert!(chart
            .render_to(
                "never_created.mp4",
                &ChartStyle::dark_signal(),
                &EncodeSettings::h264()
            )
            .is_err());
    }
}

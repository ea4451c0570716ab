//! Raster chart canvas: data-space to pixel-space mapping plus the drawing
//! primitives the line and animation renderers share.

use ab_glyph::{FontVec, PxScale};
use image::Rgb;
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut};

use crate::chart::style::ChartStyle;
use crate::error::{ChartError, Result};
use crate::video::Frame;

/// Which vertical axis a y-scale belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AxisSide {
    Left,
    Right,
}

pub(crate) struct ChartCanvas<'a> {
    frame: Frame,
    style: &'a ChartStyle,
    font: Option<&'a FontVec>,
    x_range: (f64, f64),
}

impl<'a> ChartCanvas<'a> {
    pub fn new(
        style: &'a ChartStyle,
        font: Option<&'a FontVec>,
        x_range: (f64, f64),
    ) -> Result<Self> {
        check_range("x", x_range)?;
        style.validate()?;

        Ok(Self {
            frame: Frame::new_filled(style.width, style.height, style.background),
            style,
            font,
            x_range,
        })
    }

    fn left(&self) -> f32 {
        self.style.margins.0 as f32
    }

    fn right(&self) -> f32 {
        (self.style.width - self.style.margins.1) as f32
    }

    fn top(&self) -> f32 {
        self.style.margins.2 as f32
    }

    fn bottom(&self) -> f32 {
        (self.style.height - self.style.margins.3) as f32
    }

    pub fn x_to_px(&self, x: f64) -> f32 {
        let (low, high) = self.x_range;
        let t = ((x - low) / (high - low)) as f32;
        self.left() + t * (self.right() - self.left())
    }

    /// Pixel row for a data value on the given y-scale (pixel y grows down)
    pub fn y_to_px(&self, y: f64, y_range: (f64, f64)) -> f32 {
        let (low, high) = y_range;
        let t = ((y - low) / (high - low)) as f32;
        self.bottom() - t * (self.bottom() - self.top())
    }

    /// Border rectangle around the plot area
    pub fn draw_plot_border(&mut self) {
        let color = Rgb(self.style.axis_color);
        let (l, r, t, b) = (self.left(), self.right(), self.top(), self.bottom());
        let image = self.frame.as_image_mut();
        draw_line_segment_mut(image, (l, t), (r, t), color);
        draw_line_segment_mut(image, (l, b), (r, b), color);
        draw_line_segment_mut(image, (l, t), (l, b), color);
        draw_line_segment_mut(image, (r, t), (r, b), color);
    }

    /// Evenly spaced ticks and tick values along the x-axis
    pub fn draw_x_ticks(&mut self) {
        let color = Rgb(self.style.axis_color);
        let (low, high) = self.x_range;
        let count = self.style.tick_count;
        let bottom = self.bottom();

        for i in 0..count {
            let value = low + (high - low) * i as f64 / (count - 1) as f64;
            let px = self.x_to_px(value);
            draw_line_segment_mut(
                self.frame.as_image_mut(),
                (px, bottom),
                (px, bottom + 4.0),
                color,
            );
            let label = format_tick(value);
            let width = self.text_width(&label);
            self.draw_text(&label, px - width / 2.0, bottom + 6.0, self.style.axis_color);
        }
    }

    /// Evenly spaced ticks and tick values along a y-axis
    pub fn draw_y_ticks(&mut self, y_range: (f64, f64), side: AxisSide) {
        let color = Rgb(self.style.axis_color);
        let count = self.style.tick_count;

        for i in 0..count {
            let value = y_range.0 + (y_range.1 - y_range.0) * i as f64 / (count - 1) as f64;
            let py = self.y_to_px(value, y_range);
            let label = format_tick(value);
            match side {
                AxisSide::Left => {
                    let left = self.left();
                    draw_line_segment_mut(
                        self.frame.as_image_mut(),
                        (left - 4.0, py),
                        (left, py),
                        color,
                    );
                    let width = self.text_width(&label);
                    self.draw_text(
                        &label,
                        left - 6.0 - width,
                        py - self.style.font_size / 2.0,
                        self.style.axis_color,
                    );
                }
                AxisSide::Right => {
                    let right = self.right();
                    draw_line_segment_mut(
                        self.frame.as_image_mut(),
                        (right, py),
                        (right + 4.0, py),
                        color,
                    );
                    self.draw_text(
                        &label,
                        right + 6.0,
                        py - self.style.font_size / 2.0,
                        self.style.axis_color,
                    );
                }
            }
        }
    }

    /// Polyline through `(xs, ys)` on the given y-scale
    ///
    /// Points are clamped into the plot area so the trace never bleeds over
    /// the margins. Thickness is built from vertically offset strokes.
    pub fn draw_series(
        &mut self,
        xs: &[f64],
        ys: &[f64],
        y_range: (f64, f64),
        color: [u8; 3],
        line_width: u32,
    ) {
        if xs.len() < 2 {
            return;
        }

        let points: Vec<(f32, f32)> = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| {
                (
                    self.x_to_px(x).clamp(self.left(), self.right()),
                    self.y_to_px(y, y_range).clamp(self.top(), self.bottom()),
                )
            })
            .collect();

        let rgb = Rgb(color);
        let half = line_width as i32 / 2;
        let image = self.frame.as_image_mut();
        for pair in points.windows(2) {
            for offset in -half..=(line_width as i32 - 1 - half) {
                let dy = offset as f32;
                draw_line_segment_mut(
                    image,
                    (pair[0].0, pair[0].1 + dy),
                    (pair[1].0, pair[1].1 + dy),
                    rgb,
                );
            }
        }
    }

    /// Dashed vertical rule at a data x position, spanning the plot area
    pub fn draw_vline_dashed(&mut self, x: f64, color: [u8; 3]) {
        let (low, high) = self.x_range;
        if x < low || x > high {
            return;
        }
        let px = self.x_to_px(x);
        let rgb = Rgb(color);
        let (dash, gap) = (6.0, 4.0);
        let mut y = self.top();
        let bottom = self.bottom();
        let image = self.frame.as_image_mut();
        while y < bottom {
            let end = (y + dash).min(bottom);
            draw_line_segment_mut(image, (px, y), (px, end), rgb);
            y = end + gap;
        }
    }

    /// Title centered above the plot area
    pub fn draw_title(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let center = (self.left() + self.right()) / 2.0;
        let width = self.text_width(text);
        self.draw_text(text, center - width / 2.0, 4.0, self.style.axis_color);
    }

    /// Axis label centered under the x tick values
    pub fn draw_x_label(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let center = (self.left() + self.right()) / 2.0;
        let width = self.text_width(text);
        let y = self.bottom() + 6.0 + self.style.font_size + 4.0;
        self.draw_text(text, center - width / 2.0, y, self.style.axis_color);
    }

    /// Y-axis label drawn horizontally above its axis (no glyph rotation)
    pub fn draw_y_label(&mut self, text: &str, side: AxisSide, color: [u8; 3]) {
        if text.is_empty() {
            return;
        }
        let x = match side {
            AxisSide::Left => 4.0,
            AxisSide::Right => {
                let width = self.text_width(text);
                self.style.width as f32 - width - 4.0
            }
        };
        self.draw_text(text, x, 4.0, color);
    }

    /// Combined legend stacked in the top-right corner of the plot area
    pub fn draw_legend(&mut self, entries: &[(&str, [u8; 3])]) {
        let swatch = 18.0;
        let row_height = self.style.font_size + 6.0;
        let widest = entries
            .iter()
            .map(|(label, _)| self.text_width(label))
            .fold(0.0f32, f32::max);
        let x = self.right() - widest - swatch - 10.0;

        for (i, (label, color)) in entries.iter().enumerate() {
            let y = self.top() + 6.0 + i as f32 * row_height;
            let mid = y + self.style.font_size / 2.0;
            draw_line_segment_mut(
                self.frame.as_image_mut(),
                (x, mid),
                (x + swatch, mid),
                Rgb(*color),
            );
            self.draw_text(label, x + swatch + 4.0, y, self.style.axis_color);
        }
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: [u8; 3]) {
        let Some(font) = self.font else {
            return;
        };
        let scale = PxScale::from(self.style.font_size);
        draw_text_mut(
            self.frame.as_image_mut(),
            Rgb(color),
            x.max(0.0) as i32,
            y.max(0.0) as i32,
            scale,
            font,
            text,
        );
    }

    /// Approximate rendered width; close enough for centering
    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.style.font_size * 0.55
    }

    pub fn into_frame(self) -> Frame {
        self.frame
    }
}

pub(crate) fn check_range(axis: &str, range: (f64, f64)) -> Result<()> {
    let (low, high) = range;
    if !low.is_finite() || !high.is_finite() || high <= low {
        return Err(ChartError::InvalidRange {
            axis: axis.to_string(),
            low,
            high,
        }
        .into());
    }
    Ok(())
}

/// Trim trailing zeros from a tick value
fn format_tick(value: f64) -> String {
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() || text == "-" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

//! # Overlay Module
//!
//! Compositing an animated chart video as an inset over a corner of a
//! behavior clip. The chart stream is resized to a target width (aspect
//! preserved) and drawn over the base frame-by-frame for the overlapping
//! duration; once the chart ends, remaining base frames pass through
//! untouched.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbImage;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::video::{EncodeSettings, Frame, VideoReader, VideoWriter};

/// Named corner of the base frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Where the inset goes: a named corner or an explicit pixel offset
///
/// No validation that the inset fits inside the base; drawing clips at the
/// base frame edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsetPosition {
    Corner(Corner),
    Absolute(i64, i64),
}

impl InsetPosition {
    /// Pixel offset of the inset's top-left corner on the base frame
    pub fn resolve(&self, base: (u32, u32), inset: (u32, u32)) -> (i64, i64) {
        let (base_w, base_h) = (base.0 as i64, base.1 as i64);
        let (inset_w, inset_h) = (inset.0 as i64, inset.1 as i64);
        match self {
            Self::Corner(Corner::TopLeft) => (0, 0),
            Self::Corner(Corner::TopRight) => (base_w - inset_w, 0),
            Self::Corner(Corner::BottomLeft) => (0, base_h - inset_h),
            Self::Corner(Corner::BottomRight) => (base_w - inset_w, base_h - inset_h),
            Self::Absolute(x, y) => (*x, *y),
        }
    }
}

/// Summary of a finished composition
#[derive(Debug, Clone)]
pub struct OverlayReport {
    pub path: PathBuf,
    pub frames_written: u64,

    /// How many output frames actually carry the inset (the overlapping
    /// duration, in frames of the base stream)
    pub frames_with_inset: u64,
}

/// Composite `chart_path` over `base_path` and write the result
///
/// The output keeps the base stream's dimensions and frame rate.
pub fn compose_inset<P, Q, R>(
    base_path: P,
    chart_path: Q,
    output_path: R,
    position: InsetPosition,
    chart_width: u32,
    settings: &EncodeSettings,
) -> Result<OverlayReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let base_path = base_path.as_ref();
    let chart_path = chart_path.as_ref();
    let output_path = output_path.as_ref();

    let mut base = VideoReader::open(base_path)?;
    let mut chart = VideoReader::open(chart_path)?;
    let base_meta = base.metadata().clone();
    let chart_meta = chart.metadata().clone();

    let inset_dims = scaled_dimensions(chart_meta.width, chart_meta.height, chart_width);
    let offset = position.resolve((base_meta.width, base_meta.height), inset_dims);

    info!(
        "Compositing {} ({}x{}) over {} at offset ({}, {}) -> {}",
        chart_path.display(),
        inset_dims.0,
        inset_dims.1,
        base_path.display(),
        offset.0,
        offset.1,
        output_path.display()
    );

    let mut writer = VideoWriter::create(
        output_path,
        base_meta.width,
        base_meta.height,
        base_meta.fps,
        settings,
    )?;

    let mut frames_with_inset = 0u64;
    let mut chart_done = false;
    loop {
        let mut base_frame = match base.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => {
                warn!("Base stream ended early: {}", e);
                break;
            }
        };

        if !chart_done {
            match chart.read_frame() {
                Ok(Some(chart_frame)) => {
                    let resized = imageops::resize(
                        chart_frame.as_image(),
                        inset_dims.0,
                        inset_dims.1,
                        FilterType::Triangle,
                    );
                    apply_inset(&mut base_frame, &resized, offset);
                    frames_with_inset += 1;
                }
                Ok(None) => {
                    debug!("Chart stream ended after {} frames", frames_with_inset);
                    chart_done = true;
                }
                Err(e) => {
                    warn!("Chart stream ended early: {}", e);
                    chart_done = true;
                }
            }
        }

        writer.write_frame(&base_frame)?;
    }

    let frames_written = writer.finish()?;
    info!(
        "Composition complete: {} ({} frames, {} with inset)",
        output_path.display(),
        frames_written,
        frames_with_inset
    );

    Ok(OverlayReport {
        path: output_path.to_path_buf(),
        frames_written,
        frames_with_inset,
    })
}

/// Draw `inset` onto `base` at `offset`, clipping at the frame edge
fn apply_inset(base: &mut Frame, inset: &RgbImage, offset: (i64, i64)) {
    imageops::overlay(base.as_image_mut(), inset, offset.0, offset.1);
}

/// Target dimensions for a given width, preserving aspect ratio
fn scaled_dimensions(width: u32, height: u32, target_width: u32) -> (u32, u32) {
    let scale = target_width as f64 / width as f64;
    let target_height = ((height as f64 * scale).round() as u32).max(1);
    (target_width.max(1), target_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_offsets() {
        let base = (640, 480);
        let inset = (160, 90);
        assert_eq!(InsetPosition::Corner(Corner::TopLeft).resolve(base, inset), (0, 0));
        assert_eq!(
            InsetPosition::Corner(Corner::TopRight).resolve(base, inset),
            (480, 0)
        );
        assert_eq!(
            InsetPosition::Corner(Corner::BottomLeft).resolve(base, inset),
            (0, 390)
        );
        assert_eq!(
            InsetPosition::Corner(Corner::BottomRight).resolve(base, inset),
            (480, 390)
        );
    }

    #[test]
    fn test_absolute_offset_passes_through() {
        assert_eq!(
            InsetPosition::Absolute(12, -7).resolve((640, 480), (160, 90)),
            (12, -7)
        );
    }

    #[test]
    fn test_oversized_inset_resolves_negative() {
        // An inset wider than the base hangs off the left edge; drawing clips
        let offset = InsetPosition::Corner(Corner::BottomRight).resolve((100, 100), (160, 90));
        assert_eq!(offset, (-60, 10));
    }

    #[test]
    fn test_scaled_dimensions_preserve_aspect() {
        assert_eq!(scaled_dimensions(640, 480, 480), (480, 360));
        assert_eq!(scaled_dimensions(700, 250, 480), (480, 171));
    }

    #[test]
    fn test_scaled_dimensions_never_collapse() {
        assert_eq!(scaled_dimensions(1000, 2, 100), (100, 1));
        assert!(scaled_dimensions(1000, 2, 100).1 >= 1);
    }

    #[test]
    fn test_apply_inset_draws_and_clips() {
        let mut base = Frame::new_filled(100, 100, [255, 255, 255]);
        let inset = RgbImage::from_pixel(10, 10, image::Rgb([200, 0, 0]));

        apply_inset(&mut base, &inset, (90, 90));
        assert_eq!(base.get_pixel(95, 95), [200, 0, 0]);
        assert_eq!(base.get_pixel(89, 89), [255, 255, 255]);

        // Partially off-frame placement clips instead of panicking
        let mut edge = Frame::new_filled(100, 100, [255, 255, 255]);
        apply_inset(&mut edge, &inset, (-5, -5));
        assert_eq!(edge.get_pixel(4, 4), [200, 0, 0]);
        assert_eq!(edge.get_pixel(6, 6), [255, 255, 255]);
    }
}

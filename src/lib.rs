//! # Photometry-Kit
//!
//! Session file management, signal charts, and behavior-video slicing for
//! fiber photometry workflows.
//!
//! The crate collects the utilities a recording session needs after the rig
//! stops: resolve the session's output directory, find the data files,
//! plot the traces, cut the behavior video into trial slices, and composite
//! an animated signal chart over a slice for presentation.
//!
//! Video decoding and encoding are delegated to external `ffmpeg`/`ffprobe`
//! processes, which must be on the PATH.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use photometry_kit::{
//!     chart::{AnimatedChart, ChartStyle},
//!     extract::extract_slices,
//!     overlay::{compose_inset, Corner, InsetPosition},
//!     video::{EncodeSettings, SliceTable},
//! };
//!
//! # fn main() -> photometry_kit::Result<()> {
//! // Cut the behavior video into per-trial slices
//! let table = SliceTable::from_csv_path("trials.csv")?;
//! let report = extract_slices("behavior.avi", &table, "slices/")?;
//! println!("{} slices written", report.outputs.len());
//!
//! // Render the signal trace as a progressive animation
//! let trace: Vec<f64> = vec![/* dF/F samples */];
//! let chart = AnimatedChart {
//!     data: &trace,
//!     axis_rate: 20.0,
//!     offset: 5.0,
//!     render_fps: 10.0,
//!     x_label: "Time(sec)",
//!     y_label: "dF/F (%)",
//!     color: [0, 200, 0],
//! };
//! chart.render_to("chart.mp4", &ChartStyle::dark_signal(), &EncodeSettings::h264())?;
//!
//! // Composite the chart over the first slice
//! compose_inset(
//!     "slices/slice_1.avi",
//!     "chart.mp4",
//!     "trial_1_annotated.mp4",
//!     InsetPosition::Corner(Corner::BottomRight),
//!     480,
//!     &EncodeSettings::h264(),
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into independent utility modules:
//!
//! - [`workspace`] - Session directories and data-file listing
//! - [`chart`] - Static and animated signal charts
//! - [`extract`] - Frame dumping and slice extraction
//! - [`overlay`] - Chart-inset composition
//! - [`video`] - The shared decode/encode substrate
//! - [`config`] - Configuration management

pub mod chart;
pub mod config;
pub mod error;
pub mod extract;
pub mod overlay;
pub mod video;
pub mod workspace;

// Re-export commonly used types for convenience
pub use crate::{
    chart::{AnimatedChart, ChartStyle, DualLineChart, LineChart},
    config::Config,
    error::{PhotometryError, Result},
    extract::{dump_frames, extract_slices, BatchOutcome},
    overlay::{compose_inset, Corner, InsetPosition},
    video::{EncodeSettings, Frame, SliceRange, SliceTable, VideoReader, VideoWriter},
};

//! # Chart Module
//!
//! Line-chart rendering for signal traces: static single- and dual-scale
//! charts saved as PNG, and a progressive-reveal animation encoded as a
//! video. All renderers draw onto plain RGB frames through a shared canvas;
//! nothing here owns a display — callers decide what to do with the raster.

mod canvas;

pub mod animate;
pub mod line;
pub mod style;

pub use animate::{AnimatedChart, AnimationReport};
pub use line::{plot_file_name, DualLineChart, LineChart};
pub use style::ChartStyle;

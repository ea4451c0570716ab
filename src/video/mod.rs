//! # Video I/O Module
//!
//! The decode/encode substrate shared by frame dumping, slice extraction,
//! animated charts and inset composition. Video work is delegated to
//! external `ffmpeg`/`ffprobe` processes; frames cross the process boundary
//! as raw RGB24 over pipes.

pub mod probe;
pub mod reader;
pub mod types;
pub mod writer;

pub use probe::{check_tool_available, probe_video};
pub use reader::VideoReader;
pub use types::{Frame, SliceRange, SliceTable, VideoMetadata};
pub use writer::{Codec, EncodeSettings, VideoWriter};

//! Extracting contiguous frame ranges as independent AVI files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::extract::{classify, BatchOutcome};
use crate::video::{EncodeSettings, SliceRange, SliceTable, VideoReader, VideoWriter};

/// One produced slice file
#[derive(Debug, Clone)]
pub struct SliceOutput {
    /// 1-based row number; also the number in the output file name
    pub row: usize,

    /// The range the row asked for
    pub range: SliceRange,

    pub path: PathBuf,

    /// Frames actually copied into the file
    pub frames_written: u64,

    /// Frames the row asked for (inclusive ends)
    pub frames_requested: u64,

    /// True when a read failure or end of stream cut the slice short
    pub truncated: bool,
}

/// Summary of a slice-extraction run
#[derive(Debug, Clone, Default)]
pub struct SliceReport {
    pub outputs: Vec<SliceOutput>,
}

impl SliceReport {
    pub fn outcome(&self) -> BatchOutcome {
        let full = self
            .outputs
            .iter()
            .filter(|o| o.frames_written == o.frames_requested && !o.truncated)
            .count();
        classify(full, self.outputs.len() - full)
    }
}

/// File name a slice takes: `slice_<n>.avi`
pub fn slice_file_name(row: usize) -> String {
    format!("slice_{}.avi", row)
}

/// Extract each row of `table` from `video_path` into its own AVI in `out_dir`
///
/// Outputs are numbered 1..=N in row order, never by start frame, so the
/// file name carries no source timing. Slices are encoded with the XVID
/// fourcc at the source's frame rate and dimensions. A row that cannot be
/// read to its end is truncated and extraction moves on to the next row.
pub fn extract_slices<P, Q>(video_path: P, table: &SliceTable, out_dir: Q) -> Result<SliceReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let video_path = video_path.as_ref();
    let out_dir = out_dir.as_ref();

    let mut reader = VideoReader::open(video_path)?;
    let meta = reader.metadata().clone();
    let settings = EncodeSettings::xvid();

    info!(
        "Extracting {} slices from {} ({}x{} @ {:.3}fps)",
        table.len(),
        video_path.display(),
        meta.width,
        meta.height,
        meta.fps
    );

    fs::create_dir_all(out_dir)?;

    let mut report = SliceReport::default();
    for (i, range) in table.rows().iter().enumerate() {
        let row = i + 1;
        let path = out_dir.join(slice_file_name(row));

        reader.seek(range.start_frame);
        let mut writer = VideoWriter::create(&path, meta.width, meta.height, meta.fps, &settings)?;

        let mut truncated = false;
        let mut current = range.start_frame;
        while current <= range.end_frame {
            match reader.read_frame() {
                Ok(Some(frame)) => {
                    writer.write_frame(&frame)?;
                    current += 1;
                }
                Ok(None) => {
                    warn!("Slice {} truncated: end of stream at frame {}", row, current);
                    truncated = true;
                    break;
                }
                Err(e) => {
                    warn!("Slice {} truncated: could not read frame {}: {}", row, current, e);
                    truncated = true;
                    break;
                }
            }
        }

        let frames_written = writer.finish()?;
        debug!(
            "Slice {} -> {} ({} frames)",
            row,
            path.display(),
            frames_written
        );

        report.outputs.push(SliceOutput {
            row,
            range: *range,
            path,
            frames_written,
            frames_requested: range.frame_span(),
            truncated,
        });
    }

    info!("Video slice extraction complete: {} files", report.outputs.len());
    Ok(report)
}

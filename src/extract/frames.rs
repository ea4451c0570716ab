//! Dumping selected frame indices as PNG images.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::extract::{classify, BatchOutcome};
use crate::video::VideoReader;

/// Why a requested index produced no image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Index is at or past the video's frame count
    OutOfRange,
    /// Seek/decode failed for this index
    DecodeFailed,
}

/// A requested index that was not written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSkip {
    pub index: u64,
    pub reason: SkipReason,
}

/// A frame image that was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFrame {
    pub index: u64,
    pub path: PathBuf,
}

/// Everything a frame dump did and did not do
#[derive(Debug, Clone, Default)]
pub struct FrameDumpReport {
    pub written: Vec<WrittenFrame>,
    pub skipped: Vec<FrameSkip>,
}

impl FrameDumpReport {
    pub fn outcome(&self) -> BatchOutcome {
        classify(self.written.len(), self.skipped.len())
    }
}

/// File name a dumped frame takes: `frame_<index>.png`
pub fn frame_file_name(index: u64) -> String {
    format!("frame_{}.png", index)
}

/// Dump the requested frame indices of `video_path` as PNGs in `out_dir`
///
/// Indices at or past the frame count are skipped, not errors; a decode
/// failure skips that index and the batch continues. The output folder is
/// only created once there is something to write.
pub fn dump_frames<P, Q>(video_path: P, indices: &[u64], out_dir: Q) -> Result<FrameDumpReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let video_path = video_path.as_ref();
    let out_dir = out_dir.as_ref();

    let mut reader = VideoReader::open(video_path)?;
    let total = reader.metadata().frame_count;

    info!(
        "Dumping {} requested frames from {} ({} frames total)",
        indices.len(),
        video_path.display(),
        total
    );

    let (valid, out_of_range) = partition_indices(indices, total);
    let mut report = FrameDumpReport::default();
    for index in out_of_range {
        debug!("Frame {} is out of range (total {})", index, total);
        report.skipped.push(FrameSkip {
            index,
            reason: SkipReason::OutOfRange,
        });
    }

    if !valid.is_empty() {
        fs::create_dir_all(out_dir)?;
    }

    for index in valid {
        reader.seek(index);
        match reader.read_frame() {
            Ok(Some(frame)) => {
                let path = out_dir.join(frame_file_name(index));
                frame
                    .save_png(&path)
                    .map_err(|e| std::io::Error::other(e.to_string()))?;
                debug!("Frame {} saved as {}", index, path.display());
                report.written.push(WrittenFrame { index, path });
            }
            Ok(None) => {
                warn!("Could not read frame {}: end of stream", index);
                report.skipped.push(FrameSkip {
                    index,
                    reason: SkipReason::DecodeFailed,
                });
            }
            Err(e) => {
                warn!("Could not read frame {}: {}", index, e);
                report.skipped.push(FrameSkip {
                    index,
                    reason: SkipReason::DecodeFailed,
                });
            }
        }
    }

    info!(
        "Frame dump complete: {} written, {} skipped",
        report.written.len(),
        report.skipped.len()
    );
    Ok(report)
}

/// Split requested indices into in-range (ascending) and out-of-range
fn partition_indices(indices: &[u64], total: u64) -> (Vec<u64>, Vec<u64>) {
    let (mut valid, out): (Vec<u64>, Vec<u64>) =
        indices.iter().copied().partition(|&index| index < total);
    valid.sort_unstable();
    (valid, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_drops_out_of_range() {
        let (valid, out) = partition_indices(&[2, 5, 15], 10);
        assert_eq!(valid, vec![2, 5]);
        assert_eq!(out, vec![15]);
    }

    #[test]
    fn test_partition_sorts_and_keeps_duplicates() {
        let (valid, out) = partition_indices(&[7, 2, 7, 0], 10);
        assert_eq!(valid, vec![0, 2, 7, 7]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_index_equal_to_total_is_out_of_range() {
        let (valid, out) = partition_indices(&[9, 10], 10);
        assert_eq!(valid, vec![9]);
        assert_eq!(out, vec![10]);
    }

    #[test]
    fn test_frame_file_name() {
        assert_eq!(frame_file_name(42), "frame_42.png");
    }

    #[test]
    fn test_report_outcomes() {
        let written = WrittenFrame {
            index: 2,
            path: PathBuf::from("frame_2.png"),
        };
        let skip = FrameSkip {
            index: 15,
            reason: SkipReason::OutOfRange,
        };

        let complete = FrameDumpReport {
            written: vec![written.clone()],
            skipped: vec![],
        };
        assert_eq!(complete.outcome(), BatchOutcome::Complete);

        let partial = FrameDumpReport {
            written: vec![written],
            skipped: vec![skip.clone()],
        };
        assert_eq!(partial.outcome(), BatchOutcome::Partial);

        let empty = FrameDumpReport {
            written: vec![],
            skipped: vec![skip],
        };
        assert_eq!(empty.outcome(), BatchOutcome::Empty);
    }
}

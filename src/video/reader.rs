//! Frame-indexed video decoding over an external ffmpeg process.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use tracing::debug;

use crate::error::{Result, VideoError};
use crate::video::probe::{probe_video, require_tool};
use crate::video::types::{Frame, VideoMetadata};

/// A decode handle over a single video file
///
/// Frames are addressed by a monotonically increasing index starting at 0.
/// Decoding runs in a spawned `ffmpeg` child that emits raw RGB24 frames on
/// its stdout; `seek` repositions by restarting that child at the requested
/// timestamp. The handle is not shared across calls and the child is killed
/// when the reader drops.
pub struct VideoReader {
    path: PathBuf,
    metadata: VideoMetadata,
    child: Option<Child>,
    next_frame: u64,
}

impl VideoReader {
    /// Open a video file, probing its metadata up front
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        require_tool("ffmpeg")?;
        let path = path.as_ref().to_path_buf();
        let metadata = probe_video(&path)?;
        Ok(Self {
            path,
            metadata,
            child: None,
            next_frame: 0,
        })
    }

    /// Metadata probed at open time
    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    /// Source file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Index of the frame the next `read_frame` call will return
    pub fn position(&self) -> u64 {
        self.next_frame
    }

    /// Position the reader so the next read returns `frame_index`
    ///
    /// A seek to the current position while the decoder is live is a no-op;
    /// anything else restarts the decode process at the target timestamp.
    pub fn seek(&mut self, frame_index: u64) {
        if self.child.is_some() && frame_index == self.next_frame {
            return;
        }
        self.stop_decoder();
        self.next_frame = frame_index;
    }

    /// Decode the next frame, or `Ok(None)` at end of stream
    pub fn read_frame(&mut self) -> Result<Option<Frame>> {
        if self.child.is_none() {
            self.spawn_decoder()?;
        }

        let width = self.metadata.width;
        let height = self.metadata.height;
        let frame_len = width as usize * height as usize * 3;
        let mut buffer = vec![0u8; frame_len];

        let stdout = self
            .child
            .as_mut()
            .and_then(|child| child.stdout.as_mut())
            .ok_or_else(|| VideoError::DecodingFailed {
                reason: "decoder stdout not captured".to_string(),
            })?;

        match stdout.read_exact(&mut buffer) {
            Ok(()) => {
                let frame =
                    Frame::from_rgb_bytes(width, height, buffer).ok_or_else(|| {
                        VideoError::DecodingFailed {
                            reason: "short frame buffer from decoder".to_string(),
                        }
                    })?;
                self.next_frame += 1;
                Ok(Some(frame))
            }
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                debug!("Decoder EOF for {} at frame {}", self.path.display(), self.next_frame);
                self.stop_decoder();
                Ok(None)
            }
            Err(e) => {
                self.stop_decoder();
                Err(VideoError::DecodingFailed {
                    reason: e.to_string(),
                }
                .into())
            }
        }
    }

    fn spawn_decoder(&mut self) -> Result<()> {
        let start_seconds = if self.next_frame > 0 {
            Some(self.metadata.frame_time(self.next_frame))
        } else {
            None
        };

        let args = decoder_args(&self.path, start_seconds);
        debug!("Spawning decoder: ffmpeg {}", args.join(" "));

        let child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| VideoError::DecodingFailed {
                reason: format!("failed to spawn ffmpeg: {}", e),
            })?;

        self.child = Some(child);
        Ok(())
    }

    fn stop_decoder(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for VideoReader {
    fn drop(&mut self) {
        self.stop_decoder();
    }
}

/// Decoder command line: raw RGB24 frames on stdout
///
/// The seek, when present, goes before `-i` so ffmpeg jumps to the nearest
/// keyframe and decodes forward from there.
fn decoder_args(path: &Path, start_seconds: Option<f64>) -> Vec<String> {
    let mut args = vec!["-v".to_string(), "error".to_string()];
    if let Some(seconds) = start_seconds {
        args.push("-ss".to_string());
        args.push(format!("{:.6}", seconds));
    }
    args.extend([
        "-i".to_string(),
        path.display().to_string(),
        "-f".to_string(),
        "rawvideo".to_string(),
        "-pix_fmt".to_string(),
        "rgb24".to_string(),
        "pipe:1".to_string(),
    ]);
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_args_from_start() {
        let args = decoder_args(Path::new("clip.mp4"), None);
        assert!(!args.contains(&"-ss".to_string()));
        assert!(args.windows(2).any(|w| w == ["-i", "clip.mp4"]));
        assert!(args.windows(2).any(|w| w == ["-pix_fmt", "rgb24"]));
        assert_eq!(args.last().unwrap(), "pipe:1");
    }

    #[test]
    fn test_decoder_args_with_seek_precede_input() {
        let args = decoder_args(Path::new("clip.mp4"), Some(2.5));
        let ss = args.iter().position(|a| a == "-ss").unwrap();
        let input = args.iter().position(|a| a == "-i").unwrap();
        assert!(ss < input);
        assert_eq!(args[ss + 1], "2.500000");
    }
}

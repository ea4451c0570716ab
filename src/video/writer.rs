//! Frame-streaming video encoding over an external ffmpeg process.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, VideoError};
use crate::video::probe::require_tool;
use crate::video::types::Frame;

/// Output codec selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    /// H.264 via libx264, yuv420p — the widely-supported default
    H264,
    /// MPEG-4 part 2 tagged with the XVID fourcc, for AVI slice output
    Xvid,
}

/// Encoder parameters shared by every video-producing operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeSettings {
    pub codec: Codec,

    /// Quality setting (0-100, higher is better)
    pub quality: u8,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            codec: Codec::H264,
            quality: 85,
        }
    }
}

impl EncodeSettings {
    /// H.264 output at the default quality
    pub fn h264() -> Self {
        Self::default()
    }

    /// XVID-tagged AVI output at the default quality
    pub fn xvid() -> Self {
        Self {
            codec: Codec::Xvid,
            quality: 85,
        }
    }

    fn codec_args(&self) -> Vec<String> {
        match self.codec {
            Codec::H264 => vec![
                "-c:v".to_string(),
                "libx264".to_string(),
                "-pix_fmt".to_string(),
                "yuv420p".to_string(),
                "-crf".to_string(),
                self.quality_to_crf().to_string(),
            ],
            Codec::Xvid => vec![
                "-c:v".to_string(),
                "mpeg4".to_string(),
                "-vtag".to_string(),
                "XVID".to_string(),
                "-q:v".to_string(),
                self.quality_to_qscale().to_string(),
            ],
        }
    }

    /// Map quality 0-100 onto x264's CRF scale (0 best, 51 worst)
    fn quality_to_crf(&self) -> u8 {
        (51 - ((self.quality as f32 / 100.0) * 51.0) as u8).clamp(0, 51)
    }

    /// Map quality 0-100 onto mpeg4's qscale (1 best, 31 worst)
    fn quality_to_qscale(&self) -> u8 {
        let worst = 31.0;
        (worst - (self.quality as f32 / 100.0) * (worst - 1.0)).round() as u8
    }
}

/// An encode stream with fixed dimensions and frame rate
///
/// Raw RGB24 frames are piped into an `ffmpeg` child's stdin. Call
/// `finish` to close the stream and surface any encoder failure; dropping
/// without finishing abandons the child best-effort.
pub struct VideoWriter {
    path: PathBuf,
    width: u32,
    height: u32,
    child: Option<Child>,
    frames_written: u64,
}

impl VideoWriter {
    /// Open an encode stream writing to `path`
    pub fn create<P: AsRef<Path>>(
        path: P,
        width: u32,
        height: u32,
        fps: f64,
        settings: &EncodeSettings,
    ) -> Result<Self> {
        require_tool("ffmpeg")?;
        let path = path.as_ref().to_path_buf();

        let args = encoder_args(&path, width, height, fps, settings);
        debug!("Spawning encoder: ffmpeg {}", args.join(" "));

        let child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| VideoError::EncodingFailed {
                reason: format!("failed to spawn ffmpeg: {}", e),
            })?;

        Ok(Self {
            path,
            width,
            height,
            child: Some(child),
            frames_written: 0,
        })
    }

    /// Output file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of frames accepted so far
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Append one frame to the stream
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(VideoError::FrameSizeMismatch {
                got_width: frame.width(),
                got_height: frame.height(),
                want_width: self.width,
                want_height: self.height,
            }
            .into());
        }

        let stdin = self
            .child
            .as_mut()
            .and_then(|child| child.stdin.as_mut())
            .ok_or_else(|| VideoError::EncodingFailed {
                reason: "encoder stdin not captured".to_string(),
            })?;

        stdin
            .write_all(frame.rgb_bytes())
            .map_err(|e| VideoError::EncodingFailed {
                reason: format!("{}: {}", self.path.display(), e),
            })?;

        self.frames_written += 1;
        Ok(())
    }

    /// Close the stream, wait for the encoder and return the frame count
    pub fn finish(mut self) -> Result<u64> {
        let child = self.child.take().ok_or_else(|| VideoError::EncodingFailed {
            reason: "encoder already finished".to_string(),
        })?;

        // wait_with_output drops stdin first, signalling end of stream
        let output = child
            .wait_with_output()
            .map_err(|e| VideoError::EncodingFailed {
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VideoError::EncodingFailed {
                reason: format!("{}: {}", self.path.display(), stderr.trim()),
            }
            .into());
        }

        Ok(self.frames_written)
    }
}

impl Drop for VideoWriter {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Encoder command line: raw RGB24 frames on stdin, one output file
fn encoder_args(
    path: &Path,
    width: u32,
    height: u32,
    fps: f64,
    settings: &EncodeSettings,
) -> Vec<String> {
    let mut args = vec![
        "-v".to_string(),
        "error".to_string(),
        "-f".to_string(),
        "rawvideo".to_string(),
        "-pix_fmt".to_string(),
        "rgb24".to_string(),
        "-s".to_string(),
        format!("{}x{}", width, height),
        "-r".to_string(),
        format!("{:.6}", fps),
        "-i".to_string(),
        "pipe:0".to_string(),
    ];
    args.extend(settings.codec_args());
    args.push("-y".to_string());
    args.push(path.display().to_string());
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_h264_codec_args() {
        let args = EncodeSettings::h264().codec_args();
        assert!(args.windows(2).any(|w| w == ["-c:v", "libx264"]));
        assert!(args.windows(2).any(|w| w == ["-pix_fmt", "yuv420p"]));
    }

    #[test]
    fn test_xvid_codec_args_carry_fourcc() {
        let args = EncodeSettings::xvid().codec_args();
        assert!(args.windows(2).any(|w| w == ["-c:v", "mpeg4"]));
        assert!(args.windows(2).any(|w| w == ["-vtag", "XVID"]));
    }

    #[test]
    fn test_quality_to_crf_bounds() {
        let best = EncodeSettings {
            codec: Codec::H264,
            quality: 100,
        };
        let worst = EncodeSettings {
            codec: Codec::H264,
            quality: 0,
        };
        assert_eq!(best.quality_to_crf(), 0);
        assert_eq!(worst.quality_to_crf(), 51);
    }

    #[test]
    fn test_quality_to_qscale_bounds() {
        let best = EncodeSettings {
            codec: Codec::Xvid,
            quality: 100,
        };
        let worst = EncodeSettings {
            codec: Codec::Xvid,
            quality: 0,
        };
        assert_eq!(best.quality_to_qscale(), 1);
        assert_eq!(worst.quality_to_qscale(), 31);
    }

    #[test]
    fn test_encoder_args_shape() {
        let args = encoder_args(
            Path::new("out.avi"),
            320,
            240,
            25.0,
            &EncodeSettings::xvid(),
        );
        assert!(args.windows(2).any(|w| w == ["-s", "320x240"]));
        assert!(args.windows(2).any(|w| w == ["-i", "pipe:0"]));
        assert!(args.contains(&"-y".to_string()));
        assert_eq!(args.last().unwrap(), "out.avi");
        // Input description comes before the codec selection
        let input = args.iter().position(|a| a == "pipe:0").unwrap();
        let codec = args.iter().position(|a| a == "-c:v").unwrap();
        assert!(input < codec);
    }
}

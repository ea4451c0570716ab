//! Video metadata probing via external `ffprobe`.

use std::path::Path;
use std::process::{Command, Stdio};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, VideoError};
use crate::video::types::VideoMetadata;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Check whether an external tool responds to `-version`
pub fn check_tool_available(tool: &str) -> bool {
    Command::new(tool)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

pub(crate) fn require_tool(tool: &str) -> Result<()> {
    if check_tool_available(tool) {
        Ok(())
    } else {
        Err(VideoError::ToolMissing {
            tool: tool.to_string(),
        }
        .into())
    }
}

/// Probe a video file's first video stream
pub fn probe_video<P: AsRef<Path>>(path: P) -> Result<VideoMetadata> {
    let path = path.as_ref();
    require_tool("ffprobe")?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
            "-select_streams",
            "v:0",
        ])
        .arg(path)
        .output()
        .map_err(|e| VideoError::ProbeFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(VideoError::OpenFailed {
            path: path.display().to_string(),
        }
        .into());
    }

    let json = String::from_utf8_lossy(&output.stdout);
    let metadata = parse_probe_json(&json, path)?;
    debug!(
        "Probed {}: {}x{} @ {:.3}fps, {} frames, {:.2}s",
        path.display(),
        metadata.width,
        metadata.height,
        metadata.fps,
        metadata.frame_count,
        metadata.duration
    );
    Ok(metadata)
}

fn parse_probe_json(json: &str, path: &Path) -> Result<VideoMetadata> {
    let probe: ProbeOutput = serde_json::from_str(json).map_err(|e| VideoError::ProbeFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let stream = probe
        .streams
        .first()
        .ok_or_else(|| VideoError::OpenFailed {
            path: path.display().to_string(),
        })?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(VideoError::ProbeFailed {
                path: path.display().to_string(),
                reason: "stream has no dimensions".to_string(),
            }
            .into())
        }
    };

    // Container rate first, average rate as a fallback for streams that
    // report "0/0" in one of the two fields.
    let fps = stream
        .r_frame_rate
        .as_deref()
        .and_then(parse_rational)
        .or_else(|| stream.avg_frame_rate.as_deref().and_then(parse_rational))
        .unwrap_or(0.0);

    let duration = stream
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .or_else(|| {
            probe
                .format
                .as_ref()
                .and_then(|f| f.duration.as_deref())
                .and_then(|d| d.parse::<f64>().ok())
        });

    // nb_frames is absent from many containers; estimate from duration when
    // it is.
    let frame_count = stream
        .nb_frames
        .as_deref()
        .and_then(|n| n.parse::<u64>().ok())
        .or_else(|| duration.map(|d| (d * fps).round() as u64))
        .unwrap_or(0);

    let duration = duration.unwrap_or_else(|| {
        if fps > 0.0 {
            frame_count as f64 / fps
        } else {
            0.0
        }
    });

    Ok(VideoMetadata {
        width,
        height,
        fps,
        frame_count,
        duration,
        codec: stream.codec_name.clone().unwrap_or_else(|| "unknown".to_string()),
    })
}

/// Parse an ffprobe rational like "30000/1001" (plain floats also accepted)
fn parse_rational(s: &str) -> Option<f64> {
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.trim().parse().ok()?;
        let den: f64 = den.trim().parse().ok()?;
        if den == 0.0 {
            return None;
        }
        let value = num / den;
        if value > 0.0 {
            Some(value)
        } else {
            None
        }
    } else {
        s.trim().parse::<f64>().ok().filter(|v| *v > 0.0)
    }
}

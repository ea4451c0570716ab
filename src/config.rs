use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    chart::ChartStyle,
    error::{ConfigError, Result},
    video::EncodeSettings,
};

/// Main configuration for photometry-kit
///
/// Nothing loads implicitly: a `Config` is an argument object that callers
/// build in code, or read from a TOML file with an explicit `from_file`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chart rendering settings
    pub chart: ChartStyle,

    /// Video encoding settings
    pub video: VideoConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chart: ChartStyle::default(),
            video: VideoConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string(),
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.chart.validate()?;
        self.video.validate()?;
        Ok(())
    }
}

/// Video encoding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Encoder parameters for chart and overlay output
    pub encode: EncodeSettings,

    /// Frame rate for rendered chart animations
    pub render_fps: f64,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            encode: EncodeSettings::default(),
            // The lab's legacy animations ran one frame per 100ms
            render_fps: 10.0,
        }
    }
}

impl VideoConfig {
    fn validate(&self) -> Result<()> {
        if self.encode.quality > 100 {
            return Err(ConfigError::InvalidValue {
                key: "video.encode.quality".to_string(),
                value: self.encode.quality.to_string(),
            }
            .into());
        }

        if !(self.render_fps > 0.0) || !self.render_fps.is_finite() {
            return Err(ConfigError::InvalidValue {
                key: "video.render_fps".to_string(),
                value: self.render_fps.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

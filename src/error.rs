use thiserror::Error;

/// Main error type for the photometry-kit library
#[derive(Error, Debug)]
pub enum PhotometryError {
    #[error("Workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    #[error("Chart rendering error: {0}")]
    Chart(#[from] ChartError),

    #[error("Video processing error: {0}")]
    Video(#[from] VideoError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Directory and file-listing errors
#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Failed to create directory: {path}")]
    CreateFailed { path: String },

    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Failed to read directory: {path}")]
    ReadFailed { path: String },
}

/// Chart-specific errors
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Chart has no data points")]
    EmptyData,

    #[error("x and y series differ in length: {x_len} vs {y_len}")]
    SeriesLengthMismatch { x_len: usize, y_len: usize },

    #[error("Invalid axis range: {axis} = {low}..{high}")]
    InvalidRange { axis: String, low: f64, high: f64 },

    #[error("Failed to load font: {path} - {reason}")]
    FontLoadFailed { path: String, reason: String },

    #[error("Failed to save chart image: {path} - {reason}")]
    SaveFailed { path: String, reason: String },
}

/// Video-specific errors
#[derive(Error, Debug)]
pub enum VideoError {
    #[error("Required tool not found on PATH: {tool}")]
    ToolMissing { tool: String },

    #[error("Failed to open video file: {path}")]
    OpenFailed { path: String },

    #[error("Failed to probe video metadata: {path} - {reason}")]
    ProbeFailed { path: String, reason: String },

    #[error("Video decoding failed: {reason}")]
    DecodingFailed { reason: String },

    #[error("Video encoding failed: {reason}")]
    EncodingFailed { reason: String },

    #[error("Frame size {got_width}x{got_height} does not match stream {want_width}x{want_height}")]
    FrameSizeMismatch {
        got_width: u32,
        got_height: u32,
        want_width: u32,
        want_height: u32,
    },

    #[error("Invalid slice table: {reason}")]
    InvalidSliceTable { reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using PhotometryError
pub type Result<T> = std::result::Result<T, PhotometryError>;

impl PhotometryError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Video(VideoError::ToolMissing { tool }) => {
                format!("'{}' was not found. Please install FFmpeg and make sure it is on your PATH.", tool)
            }
            Self::Video(VideoError::OpenFailed { path }) => {
                format!("Could not open video file '{}'. Please check the file exists and is a supported format.", path)
            }
            Self::Chart(ChartError::FontLoadFailed { path, .. }) => {
                format!("Could not load font '{}'. Chart text needs a readable TTF or OTF file.", path)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}

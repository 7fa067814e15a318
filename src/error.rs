use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Capture Error: {0}")]
    Capture(#[from] CaptureError),
    #[error("Analysis Error: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("UI Error: {0}")]
    Ui(String),
}

// Image acquisition (camera device or file upload)
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("device not found: {0}")]
    DeviceNotFound(String),
    #[error("device busy")]
    DeviceBusy,
    #[error("streaming not supported")]
    StreamingNotSupported,
    #[error("format negotiation failed: {0}")]
    FormatNegotiationFailed(String),
    #[error("capture failed: {0}")]
    CaptureFailed(String),
    #[error("no frame available yet")]
    NoFrame,
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("{0} is not a supported image file")]
    UnsupportedFile(String),
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

// Analysis service boundary. No retries anywhere; every failure is
// terminal for that attempt and surfaced to the Failed view.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("no API key configured (set GEMINI_API_KEY or api_key in posegenie.toml)")]
    MissingApiKey,
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("service rejected request ({status}): {body}")]
    ServiceRejected { status: u16, body: String },
    #[error("malformed service response: {0}")]
    MalformedResponse(String),
}

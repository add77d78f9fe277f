use thiserror::Error;

/// Errors that abort a capture session.
///
/// Scanning never produces these; a page that cannot be read simply
/// contributes no deals. Everything past the scan is fatal to the run.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// A WebDriver command failed (lost session, stale element, script error)
    #[error("WebDriver command failed: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),

    /// None of the candidate WebDriver endpoints accepted a connection
    #[error("Could not connect to a WebDriver server at {0}\nSet WEBDRIVER_URL or pass --webdriver-url.")]
    Connect(String),

    /// Decoding, cropping or encoding a raster surface failed
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),

    /// Writing an artifact or reading an input file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file or string was not valid JSON
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A viewer or link URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A link include/exclude pattern was not a valid regex
    #[error("Invalid link pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// No viewer URL was configured for a live session
    #[error("No viewer URL given\nPass the PDF viewer page URL or set viewer_url in the config file.")]
    MissingViewerUrl,

    /// Capture was already activated in this document
    #[error("Deal capture is already active in this document")]
    AlreadyActive,

    /// A page or annotation CSS selector could not be parsed
    #[error("Invalid CSS selector '{0}'")]
    Selector(String),
}

pub type Result<T> = std::result::Result<T, CaptureError>;

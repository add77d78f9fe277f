use crate::error::Result;
use crate::title::TitleFallback;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CSS selectors describing the viewer's document structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerSelectors {
    /// Page containers carrying a page-number attribute
    #[serde(default = "default_page_selector")]
    pub page: String,

    /// Attribute holding the page number on each page container
    #[serde(default = "default_page_number_attribute")]
    pub page_number_attribute: String,

    /// Link annotation sections inside a page container
    #[serde(default = "default_annotation_selector")]
    pub annotation: String,

    /// The anchor inside an annotation section
    #[serde(default = "default_link_selector")]
    pub link: String,
}

impl Default for ViewerSelectors {
    fn default() -> Self {
        Self {
            page: default_page_selector(),
            page_number_attribute: default_page_number_attribute(),
            annotation: default_annotation_selector(),
            link: default_link_selector(),
        }
    }
}

impl ViewerSelectors {
    /// Selector matching anchors of link annotations, relative to a page container
    pub fn annotation_link(&self) -> String {
        format!("{} {}", self.annotation, self.link)
    }
}

/// Configuration for a capture session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// URL of the open PDF viewer page
    #[serde(default)]
    pub viewer_url: Option<String>,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Directory receiving images and the manifest
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// File name of the text manifest
    #[serde(default = "default_manifest_name")]
    pub manifest_name: String,

    /// Document structure selectors
    #[serde(default)]
    pub selectors: ViewerSelectors,

    /// Interval between checks for rendered annotations
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Maximum wait for a page's annotations to render
    #[serde(default = "default_annotation_timeout_ms")]
    pub annotation_timeout_ms: u64,

    /// Delay after scrolling a page into view before reading or rasterizing it
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Render previews before showing the selection prompt
    #[serde(default)]
    pub with_thumbnails: bool,

    /// Title fallback strategy
    #[serde(default)]
    pub title_fallback: TitleFallback,

    /// Regex patterns for links to include
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for links to exclude
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_manifest_name() -> String {
    "pdf_deals.txt".to_string()
}

fn default_page_selector() -> String {
    ".page[data-page-number]".to_string()
}

fn default_page_number_attribute() -> String {
    "data-page-number".to_string()
}

fn default_annotation_selector() -> String {
    "section.linkAnnotation".to_string()
}

fn default_link_selector() -> String {
    "a[href]".to_string()
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_annotation_timeout_ms() -> u64 {
    3000
}

fn default_settle_delay_ms() -> u64 {
    300
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            viewer_url: None,
            webdriver_url: default_webdriver_url(),
            output_dir: default_output_dir(),
            manifest_name: default_manifest_name(),
            selectors: ViewerSelectors::default(),
            poll_interval_ms: default_poll_interval_ms(),
            annotation_timeout_ms: default_annotation_timeout_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            with_thumbnails: false,
            title_fallback: TitleFallback::default(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl CaptureConfig {
    /// Create a new configuration for a viewer URL with default values
    pub fn new(viewer_url: &str) -> Self {
        Self {
            viewer_url: Some(viewer_url.to_string()),
            ..Self::default()
        }
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn annotation_timeout(&self) -> Duration {
        Duration::from_millis(self.annotation_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

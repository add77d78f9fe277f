// Re-export modules
pub mod capture;
pub mod config;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod raster;
pub mod results;
pub mod scanner;
pub mod selection;
pub mod title;
pub mod utils;
pub mod viewers;

#[cfg(test)]
mod testing;

// Re-export commonly used types for convenience
pub use config::CaptureConfig;
pub use error::{CaptureError, Result};
pub use results::{CaptureReport, Deal};
pub use viewers::{Rasterizer, Viewer};

use capture::{CaptureOptions, DirectorySink};
use filter::DealFilter;
use scanner::ScanOptions;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use title::TitleFallback;
use viewers::webdriver::WebDriverViewer;

/// Main builder for deal capture sessions
#[derive(Debug, Clone)]
pub struct DealCapture {
    config: CaptureConfig,
}

impl DealCapture {
    /// Create a new builder for the viewer at `viewer_url`
    pub fn new(viewer_url: &str) -> Self {
        Self {
            config: CaptureConfig::new(viewer_url),
        }
    }

    /// Create a builder from a full configuration
    pub fn from_config(config: CaptureConfig) -> Self {
        Self { config }
    }

    /// Load configuration from a file, keeping the viewer URL if the file has none
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let config = CaptureConfig::from_file(path)?;
        Ok(self.merge(config))
    }

    /// Load configuration from a JSON string, keeping the viewer URL if it has none
    pub fn with_config_str(self, json: &str) -> Result<Self> {
        let config = CaptureConfig::from_json(json)?;
        Ok(self.merge(config))
    }

    fn merge(self, mut config: CaptureConfig) -> Self {
        if config.viewer_url.is_none() {
            config.viewer_url = self.config.viewer_url;
        }
        Self { config }
    }

    /// Set the WebDriver endpoint
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.config.webdriver_url = url.into();
        self
    }

    /// Set the directory receiving images and the manifest
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// Set the manifest file name
    pub fn with_manifest_name(mut self, name: impl Into<String>) -> Self {
        self.config.manifest_name = name.into();
        self
    }

    /// Render previews before selection
    pub fn with_thumbnails(mut self, enabled: bool) -> Self {
        self.config.with_thumbnails = enabled;
        self
    }

    /// Set the title fallback strategy
    pub fn with_title_fallback(mut self, fallback: TitleFallback) -> Self {
        self.config.title_fallback = fallback;
        self
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            settle_delay: self.config.settle_delay(),
            poll_interval: self.config.poll_interval(),
            annotation_timeout: self.config.annotation_timeout(),
            title_fallback: self.config.title_fallback,
        }
    }

    pub fn capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            settle_delay: self.config.settle_delay(),
            manifest_name: self.config.manifest_name.clone(),
        }
    }

    /// Connect to WebDriver and open the viewer page
    pub async fn connect(&self) -> Result<WebDriverViewer> {
        let url = self
            .config
            .viewer_url
            .as_deref()
            .ok_or(CaptureError::MissingViewerUrl)?;
        let selectors = self.config.selectors.clone();
        let viewer = WebDriverViewer::connect(&self.config.webdriver_url, selectors).await?;
        viewer.open(url).await?;
        Ok(viewer)
    }

    /// Claim the document for this capture session.
    ///
    /// Fails with [`CaptureError::AlreadyActive`] if capture was already
    /// activated in the same document; a reload clears the claim.
    pub async fn activate<V: Viewer>(&self, viewer: &V) -> Result<()> {
        if viewer.claim_session().await? {
            ::log::debug!("Capture session activated");
            Ok(())
        } else {
            ::log::warn!("Capture already active in this document");
            Err(CaptureError::AlreadyActive)
        }
    }

    /// Scan the viewer and apply the configured link filter
    pub async fn scan<V: Viewer>(&self, viewer: &V) -> Result<Vec<Deal<V::Page>>> {
        let filter = DealFilter::new(&self.config.include_patterns, &self.config.exclude_patterns)?;
        let deals = scanner::scan(viewer, &self.scan_options()).await;
        Ok(filter.apply(deals))
    }

    /// Capture the given deals into the output directory
    pub async fn capture<R: Rasterizer>(
        &self,
        viewer: &R,
        deals: &[Deal<R::Page>],
    ) -> Result<CaptureReport> {
        if deals.is_empty() {
            return Ok(CaptureReport::default());
        }
        let mut sink = DirectorySink::new(&self.config.output_dir)?;
        capture::run_capture(viewer, deals, &self.capture_options(), &mut sink).await
    }

    /// Scan everything and capture every deal found
    pub async fn capture_all<R: Rasterizer>(&self, viewer: &R) -> Result<CaptureReport> {
        let deals = self.scan(viewer).await?;
        self.capture(viewer, &deals).await
    }

    /// Let the user choose among scanned deals over `input`/`output`, then capture them.
    ///
    /// Returns `None` when the user cancelled; nothing is rasterized for
    /// capture before the selection is confirmed.
    pub async fn select_and_capture<R, I, W>(
        &self,
        viewer: &R,
        mut deals: Vec<Deal<R::Page>>,
        input: I,
        output: &mut W,
    ) -> Result<Option<CaptureReport>>
    where
        R: Rasterizer,
        I: BufRead,
        W: Write,
    {
        if self.config.with_thumbnails {
            self.render_previews(viewer, &mut deals, output).await?;
        }

        match selection::prompt::run(&deals, input, output)? {
            Some(chosen) => Ok(Some(self.capture(viewer, &chosen).await?)),
            None => {
                ::log::info!("Selection cancelled");
                Ok(None)
            }
        }
    }

    /// Render previews with progress on `output` and save them under `previews/`
    async fn render_previews<R, W>(
        &self,
        viewer: &R,
        deals: &mut [Deal<R::Page>],
        output: &mut W,
    ) -> Result<()>
    where
        R: Rasterizer,
        W: Write,
    {
        let settle_delay = self.config.settle_delay();
        selection::thumbnails::generate(viewer, deals, settle_delay, |done, total| {
            // Progress output is best effort
            let _ = write!(output, "\rRendering previews {}/{}", done, total);
            let _ = output.flush();
        })
        .await;
        writeln!(output)?;

        let mut previews = DirectorySink::new(self.config.output_dir.join("previews"))?;
        for (index, deal) in deals.iter().enumerate() {
            if let Some(png) = &deal.thumbnail {
                let name = utils::preview_file_name(index + 1);
                capture::ArtifactSink::write_image(&mut previews, &name, png)?;
            }
        }
        writeln!(output, "Previews saved in {}", previews.dir().display())?;
        Ok(())
    }
}

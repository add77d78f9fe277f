pub mod sink;


pub use sink::{ArtifactSink, DirectorySink};

use crate::error::Result;
use crate::raster;
use crate::results::{CaptureReport, Deal};
use crate::utils::deal_file_name;
use crate::viewers::Rasterizer;
use std::time::Duration;

/// Separator between manifest entries
pub const MANIFEST_SEPARATOR: &str = "\n\n";

/// Settings for a capture run
#[derive(Debug, Clone)]
pub struct CaptureOptions {
    /// Delay after scrolling a deal's page into view, before rasterizing
    pub settle_delay: Duration,
    /// File name of the combined manifest
    pub manifest_name: String,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(300),
            manifest_name: "pdf_deals.txt".to_string(),
        }
    }
}

/// Join manifest entries into the manifest text
pub fn join_manifest(entries: &[String]) -> String {
    entries.join(MANIFEST_SEPARATOR)
}

/// Capture each deal in order and write the manifest.
///
/// Deals are processed one at a time: every capture scrolls the shared
/// document, so captures must not overlap. Images are named by processing
/// position (`Deal-001.png` for the first deal given). The manifest is written
/// once, after every image succeeded; the first failure aborts the run and
/// leaves already written images in place.
pub async fn run_capture<R, S>(
    rasterizer: &R,
    deals: &[Deal<R::Page>],
    options: &CaptureOptions,
    sink: &mut S,
) -> Result<CaptureReport>
where
    R: Rasterizer,
    S: ArtifactSink,
{
    let mut report = CaptureReport::default();
    if deals.is_empty() {
        ::log::info!("No deals to capture");
        return Ok(report);
    }

    let mut entries = Vec::with_capacity(deals.len());
    for (index, deal) in deals.iter().enumerate() {
        let position = index + 1;
        ::log::debug!(
            "Capturing deal {} of {} (page {}, {:?})",
            position,
            deals.len(),
            deal.page,
            deal.crop
        );

        let image = raster::capture_region(
            rasterizer,
            &deal.source,
            &deal.crop,
            options.settle_delay,
        )
        .await?;
        let png = raster::encode_png(&image)?;
        let path = sink.write_image(&deal_file_name(position), &png)?;

        report.images.push(path);
        entries.push(deal.manifest_entry(position));
    }

    let manifest = join_manifest(&entries);
    report.manifest = Some(sink.write_manifest(&options.manifest_name, &manifest)?);
    report.captured = deals.len();

    ::log::info!("Captured {} deals", report.captured);
    Ok(report)
}

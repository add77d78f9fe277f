use crate::geometry::CropRect;
use serde::Serialize;
use std::path::PathBuf;

/// One link annotation found on a rendered page
#[derive(Debug, Clone, Serialize)]
pub struct Deal<P> {
    /// Viewer page number, as the viewer labels it
    pub page: String,

    /// Absolute destination URL
    pub href: String,

    /// Display title
    pub text: String,

    /// Region under the annotation, relative to the page's top-left corner
    pub crop: CropRect,

    /// Position of the page container in scan order
    #[serde(skip)]
    pub page_index: usize,

    /// Page container to rasterize; borrowed from the viewer, never mutated
    #[serde(skip)]
    pub source: P,

    /// PNG preview, filled once by the thumbnail phase
    #[serde(skip)]
    pub thumbnail: Option<Vec<u8>>,
}

impl<P> Deal<P> {
    /// Create a new deal without a thumbnail
    pub fn new(
        page: String,
        href: String,
        text: String,
        crop: CropRect,
        page_index: usize,
        source: P,
    ) -> Self {
        Self {
            page,
            href,
            text,
            crop,
            page_index,
            source,
            thumbnail: None,
        }
    }

    /// Manifest entry for this deal at 1-indexed processing position `position`
    pub fn manifest_entry(&self, position: usize) -> String {
        format!(
            "Deal {}:\nPage: {}\nTitle: {}\nLink: {}",
            position, self.page, self.text, self.href
        )
    }
}

/// Outcome of a completed capture run
#[derive(Debug, Clone, Default, Serialize)]
pub struct CaptureReport {
    /// Number of deals captured
    pub captured: usize,

    /// Image files written, in processing order
    pub images: Vec<PathBuf>,

    /// Manifest file, if anything was captured
    pub manifest: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_entry_format() {
        let deal = Deal::new(
            "3".to_string(),
            "https://x.test/a".to_string(),
            "Example Title".to_string(),
            CropRect::new(0, 0, 10, 10),
            2,
            (),
        );
        assert_eq!(
            deal.manifest_entry(1),
            "Deal 1:\nPage: 3\nTitle: Example Title\nLink: https://x.test/a"
        );
    }

    #[test]
    fn test_deal_serializes_without_source() {
        let deal = Deal::new(
            "1".to_string(),
            "https://x.test/b".to_string(),
            "B".to_string(),
            CropRect::new(1, 2, 3, 4),
            0,
            42usize,
        );
        let json = serde_json::to_value(&deal).unwrap();
        assert_eq!(json["page"], "1");
        assert_eq!(json["crop"]["width"], 3);
        assert!(json.get("source").is_none());
        assert!(json.get("page_index").is_none());
        assert!(json.get("thumbnail").is_none());
    }
}

use crate::config::ViewerSelectors;
use crate::error::{CaptureError, Result};
use crate::geometry::Rect;
use crate::viewers::{LinkAnnotation, Viewer};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use url::Url;

/// A page parsed out of a saved viewer document
#[derive(Debug, Clone)]
struct SnapshotPage {
    number: String,
    rect: Rect,
    annotations: Vec<LinkAnnotation>,
}

/// A saved viewer page (e.g. "Save Page As" from pdf.js), scanned offline.
///
/// Layout is read from inline pixel styles: page containers carry `width`
/// and `height`, annotation sections carry `left`, `top`, `width` and
/// `height` relative to their page. Pages are stacked top to bottom.
#[derive(Debug)]
pub struct SnapshotViewer {
    pages: Vec<SnapshotPage>,
    claimed: AtomicBool,
}

impl SnapshotViewer {
    /// Load a snapshot from a file
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        base_url: Option<&str>,
        selectors: &ViewerSelectors,
    ) -> Result<Self> {
        let html = std::fs::read_to_string(path)?;
        Self::parse(&html, base_url, selectors)
    }

    /// Parse a snapshot. Relative links resolve against `base_url` when given.
    pub fn parse(html: &str, base_url: Option<&str>, selectors: &ViewerSelectors) -> Result<Self> {
        let base = base_url.map(Url::parse).transpose()?;
        let page_selector = parse_selector(&selectors.page)?;
        let annotation_selector = parse_selector(&selectors.annotation)?;
        let link_selector = parse_selector(&selectors.link)?;
        let style_regex =
            Regex::new(r"(?i)(?:^|;)\s*(left|top|width|height)\s*:\s*(-?\d+(?:\.\d+)?)px")?;

        let doc = Html::parse_document(html);
        let mut pages = Vec::new();
        let mut offset_top = 0.0;

        for page_el in doc.select(&page_selector) {
            let style = inline_style(&page_el, &style_regex);
            let rect = Rect::new(
                style.left,
                offset_top + style.top,
                style.width,
                style.height,
            );
            offset_top = rect.top + rect.height;

            let number = page_el
                .value()
                .attr(&selectors.page_number_attribute)
                .unwrap_or_default()
                .to_string();

            let mut annotations = Vec::new();
            for section in page_el.select(&annotation_selector) {
                let Some(link) = section.select(&link_selector).next() else {
                    continue;
                };
                let href = link
                    .value()
                    .attr("href")
                    .and_then(|h| resolve_href(h, base.as_ref()));
                let Some(href) = href else {
                    continue;
                };

                let position = inline_style(&section, &style_regex);
                let text = link.text().collect::<Vec<_>>().join(" ");
                annotations.push(LinkAnnotation {
                    rect: Rect::new(
                        rect.left + position.left,
                        rect.top + position.top,
                        position.width,
                        position.height,
                    ),
                    href,
                    title: link.value().attr("title").map(str::to_string),
                    text: Some(text),
                });
            }

            ::log::debug!(
                "Snapshot page {} has {} link annotations",
                number,
                annotations.len()
            );
            pages.push(SnapshotPage {
                number,
                rect,
                annotations,
            });
        }

        ::log::info!("Parsed snapshot with {} pages", pages.len());
        Ok(Self {
            pages,
            claimed: AtomicBool::new(false),
        })
    }

    fn page(&self, index: usize) -> Result<&SnapshotPage> {
        self.pages
            .get(index)
            .ok_or_else(|| CaptureError::Selector(format!("page #{}", index + 1)))
    }
}

impl Viewer for SnapshotViewer {
    type Page = usize;

    async fn claim_session(&self) -> Result<bool> {
        Ok(!self.claimed.swap(true, Ordering::SeqCst))
    }

    async fn pages(&self) -> Result<Vec<usize>> {
        Ok((0..self.pages.len()).collect())
    }

    async fn scroll_into_view(&self, _page: &usize) -> Result<()> {
        Ok(())
    }

    async fn page_number(&self, page: &usize) -> Result<String> {
        Ok(self.page(*page)?.number.clone())
    }

    async fn page_rect(&self, page: &usize) -> Result<Rect> {
        Ok(self.page(*page)?.rect)
    }

    async fn link_count(&self, page: &usize) -> Result<usize> {
        Ok(self.page(*page)?.annotations.len())
    }

    async fn link_annotations(&self, page: &usize) -> Result<Vec<LinkAnnotation>> {
        Ok(self.page(*page)?.annotations.clone())
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|_| CaptureError::Selector(selector.to_string()))
}

/// Pixel offsets from an element's inline style; missing values are zero
fn inline_style(element: &ElementRef<'_>, style_regex: &Regex) -> Rect {
    let mut rect = Rect::default();
    let Some(style) = element.value().attr("style") else {
        return rect;
    };

    for caps in style_regex.captures_iter(style) {
        let value: f64 = caps[2].parse().unwrap_or(0.0);
        match caps[1].to_ascii_lowercase().as_str() {
            "left" => rect.left = value,
            "top" => rect.top = value,
            "width" => rect.width = value,
            "height" => rect.height = value,
            _ => {}
        }
    }
    rect
}

fn resolve_href(href: &str, base: Option<&Url>) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    match base {
        Some(base) => base.join(href).ok().map(|url| url.to_string()),
        None => Some(href.to_string()),
    }
}

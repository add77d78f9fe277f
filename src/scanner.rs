use crate::geometry;
use crate::results::Deal;
use crate::title::{self, TitleFallback};
use crate::utils::poll_until;
use crate::viewers::Viewer;
use std::time::Duration;
use tokio::time::sleep;

/// Timing and title settings for a scan
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    /// Delay after scrolling a page into view
    pub settle_delay: Duration,
    /// Interval between annotation checks
    pub poll_interval: Duration,
    /// Maximum wait for annotations on one page
    pub annotation_timeout: Duration,
    /// Title fallback strategy
    pub title_fallback: TitleFallback,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(300),
            poll_interval: Duration::from_millis(100),
            annotation_timeout: Duration::from_millis(3000),
            title_fallback: TitleFallback::default(),
        }
    }
}

/// Scan every rendered page for link annotations.
///
/// Deals come back in page order, then annotation order within a page. This
/// order is the numbering used by selection, capture and the manifest. The
/// scan never fails; unreadable pages contribute nothing.
pub async fn scan<V: Viewer>(viewer: &V, options: &ScanOptions) -> Vec<Deal<V::Page>> {
    let pages = match viewer.pages().await {
        Ok(pages) => pages,
        Err(e) => {
            ::log::warn!("Failed to list viewer pages: {}", e);
            return Vec::new();
        }
    };
    ::log::info!("Scanning {} pages for link annotations", pages.len());

    let mut deals = Vec::new();
    for (index, page) in pages.iter().enumerate() {
        let found = scan_page(viewer, page, index, options).await;
        ::log::debug!("Page {} yielded {} deals", index + 1, found.len());
        deals.extend(found);
    }

    ::log::info!("Scan found {} deals", deals.len());
    deals
}

/// Scan a single page container at position `page_index` in the page list
pub async fn scan_page<V: Viewer>(
    viewer: &V,
    page: &V::Page,
    page_index: usize,
    options: &ScanOptions,
) -> Vec<Deal<V::Page>> {
    if let Err(e) = viewer.scroll_into_view(page).await {
        ::log::warn!("Failed to scroll page into view: {}", e);
    }
    sleep(options.settle_delay).await;

    let rendered = poll_until(
        options.poll_interval,
        options.annotation_timeout,
        move || async move { matches!(viewer.link_count(page).await, Ok(n) if n > 0) },
    )
    .await;
    if !rendered {
        ::log::debug!(
            "No link annotations rendered within {:?}",
            options.annotation_timeout
        );
    }

    match extract_deals(viewer, page, page_index, options.title_fallback).await {
        Ok(deals) => deals,
        Err(e) => {
            ::log::warn!("Failed to read annotations: {}", e);
            Vec::new()
        }
    }
}

async fn extract_deals<V: Viewer>(
    viewer: &V,
    page: &V::Page,
    page_index: usize,
    title_fallback: TitleFallback,
) -> crate::error::Result<Vec<Deal<V::Page>>> {
    let page_number = viewer.page_number(page).await?;
    let page_rect = viewer.page_rect(page).await?;
    let annotations = viewer.link_annotations(page).await?;

    let mut deals = Vec::with_capacity(annotations.len());
    for annotation in annotations {
        if annotation.href.trim().is_empty() {
            ::log::trace!("Skipping annotation without a link on page {}", page_number);
            continue;
        }

        let text = title::resolve_title(
            annotation.title.as_deref(),
            annotation.text.as_deref(),
            &annotation.href,
            title_fallback,
        );
        let crop = geometry::resolve(&annotation.rect, &page_rect);

        deals.push(Deal::new(
            page_number.clone(),
            annotation.href,
            text,
            crop,
            page_index,
            page.clone(),
        ));
    }

    Ok(deals)
}

use crate::raster::{crop_surface, encode_png, pixel_ratio};
use crate::results::Deal;
use crate::viewers::Rasterizer;
use image::RgbaImage;
use std::time::Duration;
use tokio::time::sleep;

/// Render a preview for every deal before selection starts.
///
/// Each page container is rasterized once and all of that page's deals are
/// cropped from the same surface. Failures are logged and leave the deal
/// without a thumbnail. `progress` is called after each deal with
/// `(done, total)`. Deals that already carry a thumbnail are skipped.
///
/// Returns the number of thumbnails rendered.
pub async fn generate<R, F>(
    rasterizer: &R,
    deals: &mut [Deal<R::Page>],
    settle_delay: Duration,
    mut progress: F,
) -> usize
where
    R: Rasterizer,
    F: FnMut(usize, usize),
{
    let total = deals.len();
    let mut rendered = 0;
    // Last rasterized page position and its surface (None if rasterizing failed)
    let mut current: Option<(usize, Option<(RgbaImage, f64)>)> = None;

    for (index, deal) in deals.iter_mut().enumerate() {
        if deal.thumbnail.is_none() {
            let stale = current
                .as_ref()
                .is_none_or(|(page_index, _)| *page_index != deal.page_index);
            if stale {
                let surface = rasterize_page(rasterizer, &deal.source, settle_delay).await;
                current = Some((deal.page_index, surface));
            }

            if let Some((_, Some((surface, factor)))) = &current {
                let cropped = crop_surface(surface, &deal.crop.scaled(*factor));
                match encode_png(&cropped) {
                    Ok(png) => {
                        deal.thumbnail = Some(png);
                        rendered += 1;
                    }
                    Err(e) => {
                        ::log::warn!("Failed to encode preview for deal {}: {}", index + 1, e)
                    }
                }
            }
        }

        progress(index + 1, total);
    }

    ::log::info!("Rendered {} of {} previews", rendered, total);
    rendered
}

async fn rasterize_page<R: Rasterizer>(
    rasterizer: &R,
    page: &R::Page,
    settle_delay: Duration,
) -> Option<(RgbaImage, f64)> {
    let result = async {
        rasterizer.scroll_into_view(page).await?;
        sleep(settle_delay).await;
        let surface = rasterizer.rasterize(page).await?;
        let rect = rasterizer.page_rect(page).await?;
        let factor = pixel_ratio(surface.width(), rect.width);
        Ok::<_, crate::error::CaptureError>((surface, factor))
    }
    .await;

    match result {
        Ok(surface) => Some(surface),
        Err(e) => {
            ::log::warn!("Failed to rasterize page for previews: {}", e);
            None
        }
    }
}

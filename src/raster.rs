use crate::error::Result;
use crate::geometry::CropRect;
use crate::viewers::Rasterizer;
use image::{ImageFormat, RgbaImage, imageops};
use std::io::Cursor;
use std::time::Duration;
use tokio::time::sleep;

/// Rasterize a page container and crop it to one deal's rectangle.
///
/// Scrolls the container into view, waits `settle_delay`, then renders the
/// whole container. Nothing is cached between calls.
pub async fn capture_region<R: Rasterizer>(
    rasterizer: &R,
    source: &R::Page,
    crop: &CropRect,
    settle_delay: Duration,
) -> Result<RgbaImage> {
    rasterizer.scroll_into_view(source).await?;
    sleep(settle_delay).await;

    let surface = rasterizer.rasterize(source).await?;
    let page_rect = rasterizer.page_rect(source).await?;
    let factor = pixel_ratio(surface.width(), page_rect.width);

    Ok(crop_surface(&surface, &crop.scaled(factor)))
}

/// Ratio between rasterized device pixels and the container's CSS width
pub fn pixel_ratio(surface_width: u32, css_width: f64) -> f64 {
    if css_width <= 0.0 || surface_width == 0 {
        return 1.0;
    }
    let ratio = surface_width as f64 / css_width;
    // Sub-pixel layout widths round either way; treat those as 1:1
    if (ratio - 1.0).abs() < 0.01 { 1.0 } else { ratio }
}

/// Copy `crop` out of `surface` into a new surface of exactly the crop's size.
///
/// Parts of the crop outside the surface stay transparent.
pub fn crop_surface(surface: &RgbaImage, crop: &CropRect) -> RgbaImage {
    let mut cropped = RgbaImage::new(crop.width, crop.height);
    if crop.is_empty() {
        return cropped;
    }

    let (x, y, width, height) = crop.clamp_to(surface.width(), surface.height());
    if width == 0 || height == 0 {
        ::log::warn!("Crop {:?} lies outside the rasterized surface", crop);
        return cropped;
    }

    let visible = imageops::crop_imm(surface, x, y, width, height).to_image();
    let offset_x = x as i64 - crop.x;
    let offset_y = y as i64 - crop.y;
    imageops::replace(&mut cropped, &visible, offset_x, offset_y);
    cropped
}

/// Encode a surface as PNG bytes.
///
/// PNG has no zero-sized images, so an empty surface (from a collapsed
/// annotation) is written as a single transparent pixel.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    if image.width() == 0 || image.height() == 0 {
        ::log::debug!(
            "Encoding empty {}x{} crop as a transparent pixel",
            image.width(),
            image.height()
        );
        return encode_png(&RgbaImage::new(1, 1));
    }

    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    ::log::trace!(
        "Encoded {}x{} image into {} PNG bytes",
        image.width(),
        image.height(),
        buf.len()
    );
    Ok(buf)
}

/// Decode a PNG returned by the rasterizer
pub fn decode_png(bytes: &[u8]) -> Result<RgbaImage> {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)?;
    Ok(image.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn test_crop_is_pixel_exact() {
        let surface = gradient(50, 40);
        let cropped = crop_surface(&surface, &CropRect::new(10, 5, 20, 8));

        assert_eq!(cropped.dimensions(), (20, 8));
        assert_eq!(cropped.get_pixel(0, 0), &Rgba([10, 5, 0, 255]));
        assert_eq!(cropped.get_pixel(19, 7), &Rgba([29, 12, 0, 255]));
    }

    #[test]
    fn test_crop_past_edge_keeps_size() {
        let surface = gradient(20, 20);
        let cropped = crop_surface(&surface, &CropRect::new(-5, 15, 10, 10));

        assert_eq!(cropped.dimensions(), (10, 10));
        // Out-of-bounds pixels are transparent
        assert_eq!(cropped.get_pixel(0, 0)[3], 0);
        // In-bounds pixels are copied at the right offset
        assert_eq!(cropped.get_pixel(5, 0), &Rgba([0, 15, 0, 255]));
        assert_eq!(cropped.get_pixel(9, 4), &Rgba([4, 19, 0, 255]));
        assert_eq!(cropped.get_pixel(9, 5)[3], 0);
    }

    #[test]
    fn test_empty_crop() {
        let surface = gradient(20, 20);
        let cropped = crop_surface(&surface, &CropRect::new(3, 3, 0, 10));
        assert_eq!(cropped.dimensions(), (0, 10));

        let decoded = decode_png(&encode_png(&cropped).unwrap()).unwrap();
        assert_eq!(decoded.dimensions(), (1, 1));
        assert_eq!(decoded.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_pixel_ratio() {
        assert_eq!(pixel_ratio(816, 816.0), 1.0);
        assert_eq!(pixel_ratio(817, 816.4), 1.0);
        assert_eq!(pixel_ratio(1632, 816.0), 2.0);
        assert_eq!(pixel_ratio(100, 0.0), 1.0);
    }

    #[test]
    fn test_png_encoding_decodes_back() {
        let surface = gradient(12, 7);
        let png = encode_png(&surface).unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let decoded = decode_png(&png).unwrap();
        assert_eq!(decoded, surface);
    }
}

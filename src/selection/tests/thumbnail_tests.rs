use super::deals;
use crate::raster::decode_png;
use crate::selection::thumbnails::generate;
use crate::testing::{FakePage, FakeViewer};
use std::time::Duration;

fn viewer() -> FakeViewer {
    FakeViewer::new(vec![
        FakePage::new("1", 0.0),
        FakePage::new("2", 110.0),
        FakePage::new("3", 220.0),
    ])
}

#[tokio::test]
async fn test_one_rasterization_per_page() {
    let viewer = viewer();
    let mut deals = deals(&["A", "B", "C", "D", "E"]);
    let mut progress = Vec::new();

    let rendered = generate(&viewer, &mut deals, Duration::ZERO, |done, total| {
        progress.push((done, total))
    })
    .await;

    assert_eq!(rendered, 5);
    assert!(deals.iter().all(|d| d.thumbnail.is_some()));
    // Five deals over three pages
    assert_eq!(viewer.rasterize_calls.get(), 3);
    assert_eq!(progress, vec![(1, 5), (2, 5), (3, 5), (4, 5), (5, 5)]);
}

#[tokio::test]
async fn test_thumbnail_is_cropped_preview() {
    let viewer = viewer();
    let mut deals = deals(&["A", "B", "C"]);
    deals[2].crop = crate::geometry::CropRect::new(7, 9, 3, 2);

    generate(&viewer, &mut deals, Duration::ZERO, |_, _| {}).await;

    let preview = decode_png(deals[2].thumbnail.as_ref().unwrap()).unwrap();
    assert_eq!(preview.dimensions(), (3, 2));
    assert_eq!(preview.get_pixel(0, 0).0, [7, 9, 1, 255]);
}

#[tokio::test]
async fn test_pages_sharing_a_label_get_their_own_surface() {
    let viewer = FakeViewer::new(vec![
        FakePage::new("1", 0.0),
        FakePage::new("2", 110.0),
        FakePage::new("1", 220.0),
    ]);
    let mut deals = deals(&["A", "B"]);
    deals[0].page = "1".to_string();
    deals[1].page = "1".to_string();
    deals[1].page_index = 2;
    deals[1].source = 2;

    generate(&viewer, &mut deals, Duration::ZERO, |_, _| {}).await;

    assert_eq!(viewer.rasterize_calls.get(), 2);
    let first = decode_png(deals[0].thumbnail.as_ref().unwrap()).unwrap();
    let second = decode_png(deals[1].thumbnail.as_ref().unwrap()).unwrap();
    assert_eq!(first.get_pixel(0, 0).0[2], 0);
    assert_eq!(second.get_pixel(0, 0).0[2], 2);
}

#[tokio::test]
async fn test_failed_page_leaves_other_previews() {
    let mut viewer = viewer();
    viewer.fail_rasterize_on = Some(2);
    let mut deals = deals(&["A", "B", "C", "D", "E"]);

    let rendered = generate(&viewer, &mut deals, Duration::ZERO, |_, _| {}).await;

    assert_eq!(rendered, 3);
    assert!(deals[0].thumbnail.is_some());
    assert!(deals[2].thumbnail.is_none());
    assert!(deals[3].thumbnail.is_none());
    assert!(deals[4].thumbnail.is_some());
}

#[tokio::test]
async fn test_cached_thumbnails_are_not_rerendered() {
    let viewer = viewer();
    let mut deals = deals(&["A", "B"]);
    deals[0].thumbnail = Some(vec![9]);
    deals[1].thumbnail = Some(vec![9]);

    let rendered = generate(&viewer, &mut deals, Duration::ZERO, |_, _| {}).await;

    assert_eq!(rendered, 0);
    assert_eq!(viewer.rasterize_calls.get(), 0);
    assert_eq!(deals[0].thumbnail, Some(vec![9]));
}

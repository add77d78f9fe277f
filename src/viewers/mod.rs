pub mod snapshot;
pub mod webdriver;

use crate::error::Result;
use crate::geometry::Rect;
use image::RgbaImage;

/// A link annotation as rendered by the viewer
#[derive(Debug, Clone, PartialEq)]
pub struct LinkAnnotation {
    /// Bounding rectangle of the annotation section
    pub rect: Rect,
    /// Resolved destination URL
    pub href: String,
    /// Anchor `title` attribute, if any
    pub title: Option<String>,
    /// Rendered anchor text, if any
    pub text: Option<String>,
}

// Methods take `&self` so the scanner can poll without holding a unique borrow.
/// Read access to a rendered PDF viewer document
#[allow(async_fn_in_trait)]
pub trait Viewer {
    /// Handle to a page container
    type Page: Clone;

    /// Mark capture as active in this document.
    ///
    /// Returns false if a previous activation already claimed it.
    async fn claim_session(&self) -> Result<bool>;

    /// Rendered page containers in document order
    async fn pages(&self) -> Result<Vec<Self::Page>>;

    /// Bring a page into view so the viewer renders its annotation layer
    async fn scroll_into_view(&self, page: &Self::Page) -> Result<()>;

    /// The viewer's page-number label for a page
    async fn page_number(&self, page: &Self::Page) -> Result<String>;

    /// Current bounding rectangle of a page container
    async fn page_rect(&self, page: &Self::Page) -> Result<Rect>;

    /// Number of link annotations rendered so far on a page
    async fn link_count(&self, page: &Self::Page) -> Result<usize>;

    /// Link annotations on a page, in DOM order
    async fn link_annotations(&self, page: &Self::Page) -> Result<Vec<LinkAnnotation>>;
}

/// A viewer that can rasterize a page container at its current layout
#[allow(async_fn_in_trait)]
pub trait Rasterizer: Viewer {
    /// Render the full page container into an RGBA surface
    async fn rasterize(&self, page: &Self::Page) -> Result<RgbaImage>;
}

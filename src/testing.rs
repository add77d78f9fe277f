//! In-memory viewer used by unit tests.

use crate::error::{CaptureError, Result};
use crate::geometry::Rect;
use crate::viewers::{LinkAnnotation, Rasterizer, Viewer};
use image::{Rgba, RgbaImage};
use std::cell::{Cell, RefCell};

#[derive(Debug, Clone)]
pub struct FakePage {
    pub number: String,
    pub rect: Rect,
    pub annotations: Vec<LinkAnnotation>,
    /// Number of link-count checks that report zero before annotations appear
    pub render_after_checks: usize,
    /// Reading this page's annotations fails
    pub broken: bool,
}

impl FakePage {
    pub fn new(number: &str, top: f64) -> Self {
        Self {
            number: number.to_string(),
            rect: Rect::new(0.0, top, 200.0, 100.0),
            annotations: Vec::new(),
            render_after_checks: 0,
            broken: false,
        }
    }

    pub fn with_link(
        mut self,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        href: &str,
        title: Option<&str>,
    ) -> Self {
        self.annotations.push(LinkAnnotation {
            rect: Rect::new(self.rect.left + left, self.rect.top + top, width, height),
            href: href.to_string(),
            title: title.map(str::to_string),
            text: None,
        });
        self
    }
}

/// Pages are addressed by index. Rasterizing page `i` yields a surface whose
/// pixels encode their page-relative coordinates and the page index.
#[derive(Debug, Default)]
pub struct FakeViewer {
    pub pages: Vec<FakePage>,
    pub events: RefCell<Vec<String>>,
    pub checks: RefCell<Vec<usize>>,
    pub claimed: Cell<bool>,
    /// Fail the n-th rasterize call (1-indexed)
    pub fail_rasterize_on: Option<usize>,
    pub rasterize_calls: Cell<usize>,
}

impl FakeViewer {
    pub fn new(pages: Vec<FakePage>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    fn page(&self, index: usize) -> Result<&FakePage> {
        self.pages.get(index).ok_or(CaptureError::Selector(format!("page {}", index)))
    }
}

impl Viewer for FakeViewer {
    type Page = usize;

    async fn claim_session(&self) -> Result<bool> {
        Ok(!self.claimed.replace(true))
    }

    async fn pages(&self) -> Result<Vec<usize>> {
        Ok((0..self.pages.len()).collect())
    }

    async fn scroll_into_view(&self, page: &usize) -> Result<()> {
        self.events.borrow_mut().push(format!("scroll:{}", page));
        Ok(())
    }

    async fn page_number(&self, page: &usize) -> Result<String> {
        Ok(self.page(*page)?.number.clone())
    }

    async fn page_rect(&self, page: &usize) -> Result<Rect> {
        Ok(self.page(*page)?.rect)
    }

    async fn link_count(&self, page: &usize) -> Result<usize> {
        let fake = self.page(*page)?;
        let mut checks = self.checks.borrow_mut();
        if checks.len() <= *page {
            checks.resize(*page + 1, 0);
        }
        checks[*page] += 1;
        if checks[*page] > fake.render_after_checks {
            Ok(fake.annotations.len())
        } else {
            Ok(0)
        }
    }

    async fn link_annotations(&self, page: &usize) -> Result<Vec<LinkAnnotation>> {
        let fake = self.page(*page)?;
        if fake.broken {
            return Err(CaptureError::Selector("broken page".to_string()));
        }
        Ok(fake.annotations.clone())
    }
}

impl Rasterizer for FakeViewer {
    async fn rasterize(&self, page: &usize) -> Result<RgbaImage> {
        let calls = self.rasterize_calls.get() + 1;
        self.rasterize_calls.set(calls);
        self.events.borrow_mut().push(format!("rasterize:{}", page));

        if self.fail_rasterize_on == Some(calls) {
            return Err(CaptureError::Io(std::io::Error::other("rasterizer crashed")));
        }

        let fake = self.page(*page)?;
        let index = *page as u8;
        Ok(RgbaImage::from_fn(
            fake.rect.width as u32,
            fake.rect.height as u32,
            |x, y| Rgba([x as u8, y as u8, index, 255]),
        ))
    }
}

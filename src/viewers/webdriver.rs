use crate::config::ViewerSelectors;
use crate::error::{CaptureError, Result};
use crate::geometry::Rect;
use crate::raster::decode_png;
use crate::viewers::{LinkAnnotation, Rasterizer, Viewer};
use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator};
use image::RgbaImage;

/// Window property marking an active capture session in the document
const SESSION_FLAG: &str = "__dealCaptureActive";

/// Fallback endpoints tried when the configured WebDriver URL is unreachable
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// A PDF viewer page open in a WebDriver-controlled browser
pub struct WebDriverViewer {
    client: Client,
    selectors: ViewerSelectors,
}

impl WebDriverViewer {
    /// Connect to a WebDriver server, trying common fallback endpoints
    pub async fn connect(webdriver_url: &str, selectors: ViewerSelectors) -> Result<Self> {
        let client = connect_to_webdriver(webdriver_url).await?;
        Ok(Self { client, selectors })
    }

    /// Wrap an existing WebDriver client
    pub fn with_client(client: Client, selectors: ViewerSelectors) -> Self {
        Self { client, selectors }
    }

    /// Navigate the browser to the viewer page
    pub async fn open(&self, viewer_url: &str) -> Result<()> {
        url::Url::parse(viewer_url)?;
        ::log::info!("Opening viewer at {}", viewer_url);
        self.client.goto(viewer_url).await?;
        Ok(())
    }

    /// End the WebDriver session
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }

    async fn scroll_element(&self, element: &Element) -> Result<()> {
        let arg = serde_json::to_value(element)?;
        self.client
            .execute(
                "arguments[0].scrollIntoView({behavior: 'instant', block: 'center'});",
                vec![arg],
            )
            .await?;
        Ok(())
    }

    async fn read_annotation(&self, section: &Element) -> Result<Option<LinkAnnotation>> {
        let links = section.find_all(Locator::Css(&self.selectors.link)).await?;
        let Some(link) = links.first() else {
            return Ok(None);
        };

        // The `href` property is resolved against the document base; fall back to the raw attribute
        let href = match link.prop("href").await? {
            Some(href) if !href.is_empty() => href,
            _ => link.attr("href").await?.unwrap_or_default(),
        };
        if href.trim().is_empty() {
            return Ok(None);
        }

        let title = link.attr("title").await?;
        let text = link.text().await.ok();
        let (x, y, width, height) = section.rectangle().await?;

        Ok(Some(LinkAnnotation {
            rect: Rect::new(x, y, width, height),
            href,
            title,
            text,
        }))
    }
}

impl Viewer for WebDriverViewer {
    type Page = Element;

    async fn claim_session(&self) -> Result<bool> {
        let script = format!(
            "if (window.{flag}) {{ return false; }} window.{flag} = true; return true;",
            flag = SESSION_FLAG
        );
        let claimed = self.client.execute(&script, Vec::new()).await?;
        Ok(claimed.as_bool().unwrap_or(false))
    }

    async fn pages(&self) -> Result<Vec<Element>> {
        Ok(self.client.find_all(Locator::Css(&self.selectors.page)).await?)
    }

    async fn scroll_into_view(&self, page: &Element) -> Result<()> {
        self.scroll_element(page).await
    }

    async fn page_number(&self, page: &Element) -> Result<String> {
        Ok(page
            .attr(&self.selectors.page_number_attribute)
            .await?
            .unwrap_or_default())
    }

    async fn page_rect(&self, page: &Element) -> Result<Rect> {
        let (x, y, width, height) = page.rectangle().await?;
        Ok(Rect::new(x, y, width, height))
    }

    async fn link_count(&self, page: &Element) -> Result<usize> {
        let links = page
            .find_all(Locator::Css(&self.selectors.annotation_link()))
            .await?;
        Ok(links.len())
    }

    async fn link_annotations(&self, page: &Element) -> Result<Vec<LinkAnnotation>> {
        let sections = page
            .find_all(Locator::Css(&self.selectors.annotation))
            .await?;

        let mut annotations = Vec::with_capacity(sections.len());
        for section in &sections {
            match self.read_annotation(section).await? {
                Some(annotation) => annotations.push(annotation),
                None => ::log::trace!("Skipping annotation section without a link"),
            }
        }
        Ok(annotations)
    }
}

impl Rasterizer for WebDriverViewer {
    async fn rasterize(&self, page: &Element) -> Result<RgbaImage> {
        let png = page.screenshot().await?;
        ::log::trace!("Element screenshot returned {} bytes", png.len());
        decode_png(&png)
    }
}

/// Connects to the WebDriver instance
async fn connect_to_webdriver(webdriver_url: &str) -> Result<Client> {
    // Try to connect to the specified WebDriver URL
    match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
        }
    }

    // If we couldn't connect, try with common alternative URLs
    for url in FALLBACK_WEBDRIVER_URLS.iter() {
        if *url == webdriver_url {
            continue; // Skip if it's the same as the one we already tried
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(CaptureError::Connect(webdriver_url.to_string()))
}

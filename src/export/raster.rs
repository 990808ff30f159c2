//! PNG export through a headless Chromium.

use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, info};

use super::ExportError;
use crate::template::{PAGE_HEIGHT_PX, PAGE_WIDTH_PX};

/// Turns a rendered HTML page into PNG bytes.
pub trait Rasterizer {
    async fn rasterize(&self, html: &str) -> Result<Vec<u8>, ExportError>;
}

pub struct ChromeRasterizer {
    executable: Option<PathBuf>,
    scale: f64,
}

fn browser_error(context: &str) -> impl FnOnce(chromiumoxide::error::CdpError) -> ExportError + '_ {
    move |e| ExportError::Browser(format!("{context}: {e}"))
}

impl ChromeRasterizer {
    pub fn new(executable: Option<PathBuf>, scale: f64) -> Self {
        Self { executable, scale }
    }

    fn config(&self) -> Result<BrowserConfig, ExportError> {
        let mut builder = BrowserConfig::builder().new_headless_mode().args(vec![
            "--disable-gpu",
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--hide-scrollbars",
        ]);
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }
        builder
            .build()
            .map_err(|e| ExportError::Browser(format!("invalid browser configuration: {e}")))
    }
}

impl Rasterizer for ChromeRasterizer {
    async fn rasterize(&self, html: &str) -> Result<Vec<u8>, ExportError> {
        info!(scale = self.scale, "launching headless browser");
        let (mut browser, mut handler) = Browser::launch(self.config()?)
            .await
            .map_err(browser_error("failed to launch browser"))?;

        let events = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let result = async {
            let page = browser
                .new_page("about:blank")
                .await
                .map_err(browser_error("failed to open page"))?;
            page.execute(SetDeviceMetricsOverrideParams::new(
                i64::from(PAGE_WIDTH_PX),
                i64::from(PAGE_HEIGHT_PX),
                self.scale,
                false,
            ))
            .await
            .map_err(browser_error("failed to set viewport"))?;
            page.set_content(html)
                .await
                .map_err(browser_error("failed to load resume"))?;
            // Give inline images a moment to decode before capture.
            sleep(Duration::from_millis(200)).await;

            let params = ScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .full_page(true)
                .build();
            page.screenshot(params)
                .await
                .map_err(browser_error("failed to capture screenshot"))
        }
        .await;

        if let Err(e) = browser.close().await {
            debug!("browser close failed: {e}");
        }
        let _ = events.await;

        let png = result?;
        debug!(bytes = png.len(), "captured resume");
        Ok(png)
    }
}

use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::BrowserConfig;
use crate::utils::error::{AppError, Result};

/// One headless Chromium instance with a single shared tab.
///
/// The whole run drives this one tab serially: every retailer and every item
/// navigates it in turn, which keeps the session (cookies, consent state)
/// warm across searches the way a real shopper's browser would be.
pub struct BrowserSession {
    browser: Browser,
    tab: Arc<Tab>,
}

impl BrowserSession {
    /// Launch Chromium and open the shared tab. This is the only operation in
    /// the system whose failure aborts a run.
    pub fn launch(config: &BrowserConfig) -> Result<Self> {
        let mut launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(false) // Often needed in containerized environments
            .window_size(Some((config.window_width, config.window_height)))
            .args(vec![
                OsStr::new("--no-sandbox"),
                OsStr::new("--disable-setuid-sandbox"),
                OsStr::new("--disable-dev-shm-usage"),
                OsStr::new("--disable-gpu"),
                OsStr::new("--disable-blink-features=AutomationControlled"),
                OsStr::new("--disable-features=IsolateOrigins,site-per-process"),
            ])
            .build()
            .map_err(|e| AppError::Browser(format!("failed to create launch options: {e}")))?;

        // Set Chrome path if provided
        if let Some(chrome_path) = &config.chrome_path {
            launch_options.path = Some(PathBuf::from(chrome_path));
        }

        let browser = Browser::new(launch_options)
            .map_err(|e| AppError::Browser(format!("failed to launch browser: {e}")))?;

        let tab = browser
            .new_tab()
            .map_err(|e| AppError::Browser(format!("failed to create tab: {e}")))?;

        tab.set_user_agent(&config.user_agent, None, None)
            .map_err(|e| AppError::Browser(format!("failed to set user agent: {e}")))?;
        tab.set_default_timeout(Duration::from_secs(config.navigation_timeout_secs));

        Ok(Self { browser, tab })
    }

    /// Navigate the shared tab and wait for the load to settle, within the
    /// configured navigation timeout.
    pub fn navigate(&self, url: &str) -> Result<()> {
        self.tab.navigate_to(url).map_err(|e| AppError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| AppError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Full HTML of the current page, for selector scanning off-browser.
    pub fn page_html(&self) -> Result<String> {
        self.tab
            .get_content()
            .map_err(|e| AppError::Scraping(format!("failed to read page content: {e}")))
    }

    /// Click the first element matching the selector if it is present right
    /// now. Absence is not an error.
    pub fn try_click(&self, selector: &str) -> bool {
        match self
            .tab
            .find_element(selector)
            .and_then(|element| element.click().map(|_| ()))
        {
            Ok(()) => true,
            Err(e) => {
                debug!(selector = %selector, "click skipped: {e}");
                false
            }
        }
    }

    /// Wait (bounded) for a selector to appear, then click it.
    pub fn click_with_wait(&self, selector: &str, timeout: Duration) -> Result<()> {
        let element = self
            .tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map_err(|e| AppError::Scraping(format!("selector '{selector}' never appeared: {e}")))?;
        element
            .click()
            .map_err(|e| AppError::Scraping(format!("failed to click '{selector}': {e}")))?;
        Ok(())
    }

    /// Scan every button on the page for one whose visible text contains the
    /// phrase, and click it. Returns whether a button was clicked.
    pub fn click_button_labelled(&self, phrase: &str) -> Result<bool> {
        let phrase_json = serde_json::to_string(phrase)?;
        let js = format!(
            r#"(() => {{
                const phrase = {phrase_json};
                const buttons = Array.from(document.querySelectorAll('button'));
                const hit = buttons.find(b => (b.innerText || '').includes(phrase));
                if (hit) {{ hit.click(); return true; }}
                return false;
            }})()"#
        );

        let result = self
            .tab
            .evaluate(&js, false)
            .map_err(|e| AppError::Scraping(format!("button scan failed: {e}")))?;
        Ok(result
            .value
            .as_ref()
            .and_then(|value| value.as_bool())
            .unwrap_or(false))
    }

    /// Dispatch a pointer-move at viewport coordinates through the page.
    pub fn dispatch_pointer_move(&self, x: f64, y: f64) -> Result<()> {
        let js = format!(
            r#"(() => {{
                const target = document.elementFromPoint({x:.0}, {y:.0}) || document.body;
                if (!target) return false;
                const opts = {{ bubbles: true, cancelable: true, view: window,
                                clientX: {x:.0}, clientY: {y:.0} }};
                target.dispatchEvent(new MouseEvent('mousemove', opts));
                return true;
            }})()"#
        );

        self.tab
            .evaluate(&js, false)
            .map_err(|e| AppError::Scraping(format!("pointer move failed: {e}")))?;
        Ok(())
    }

    /// Capture the current page as a PNG at the given path, creating parent
    /// directories as needed.
    pub fn screenshot(&self, path: &Path) -> Result<()> {
        let data = self
            .tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| AppError::Scraping(format!("screenshot capture failed: {e}")))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)?;
        Ok(())
    }

    /// Tear the session down. Chrome exits when the browser handle drops.
    pub fn close(self) {
        let _ = self.tab.close(true);
        drop(self.browser);
    }
}

//! Chromium-backed sessions over the DevTools protocol.

use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::{Handler, Page};
use futures::StreamExt as _;
use serde::Deserialize;

use crate::config::BrowserSettings;
use crate::error::CrawlError;
use crate::session::{FormSubmission, PageSession, SessionLauncher};

const CLICKABLE_SCRIPT: &str = r#"(() => {
    const el = document.querySelector(__SELECTOR__);
    if (!el) return false;
    const style = window.getComputedStyle(el);
    const rect = el.getBoundingClientRect();
    return !el.disabled
        && style.display !== 'none'
        && style.visibility !== 'hidden'
        && rect.width > 0
        && rect.height > 0;
})()"#;

#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    settings: BrowserSettings,
}

impl ChromiumLauncher {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl SessionLauncher for ChromiumLauncher {
    async fn launch(&self) -> anyhow::Result<Box<dyn PageSession>> {
        let (browser, handler, owned) = match self.settings.devtools_url.as_deref() {
            Some(endpoint) => {
                let ws_url = resolve_websocket_url(endpoint)
                    .await
                    .context("resolve devtools websocket url")?;
                tracing::debug!(%ws_url, "connecting to running browser");
                let (browser, handler) = Browser::connect(ws_url.clone())
                    .await
                    .map_err(|err| CrawlError::Browser(format!("connect {ws_url}: {err}")))?;
                (browser, handler, false)
            }
            None => {
                let config = browser_config(&self.settings)?;
                let (browser, handler) = Browser::launch(config)
                    .await
                    .map_err(|err| CrawlError::Browser(format!("launch chromium: {err}")))?;
                (browser, handler, true)
            }
        };
        let handler_task = spawn_handler(handler);

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(err) => {
                handler_task.abort();
                return Err(CrawlError::Browser(format!("open page: {err}")).into());
            }
        };

        Ok(Box::new(ChromiumSession {
            browser,
            page,
            handler_task: Some(handler_task),
            owned,
        }))
    }
}

pub fn browser_config(settings: &BrowserSettings) -> anyhow::Result<BrowserConfig> {
    let mut builder = BrowserConfig::builder()
        .no_sandbox()
        .arg("--disable-dev-shm-usage");
    if let Some(path) = &settings.chrome_executable {
        builder = builder.chrome_executable(path);
    }
    if !settings.headless {
        builder = builder.with_head();
    }
    for arg in &settings.extra_args {
        builder = builder.arg(arg.as_str());
    }
    builder
        .build()
        .map_err(|err| anyhow::anyhow!("build browser config: {err}"))
}

fn spawn_handler(mut handler: Handler) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(err) = event {
                tracing::debug!(%err, "cdp handler event error");
            }
        }
    })
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    #[serde(rename = "webSocketDebuggerUrl")]
    web_socket_debugger_url: String,
}

/// Turns a DevTools HTTP endpoint into the browser's websocket URL.
/// Websocket URLs are returned unchanged.
pub async fn resolve_websocket_url(endpoint: &str) -> anyhow::Result<String> {
    if endpoint.starts_with("ws://") || endpoint.starts_with("wss://") {
        return Ok(endpoint.to_owned());
    }

    let version_url = format!("{}/json/version", endpoint.trim_end_matches('/'));
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .context("build devtools http client")?;
    let response = client
        .get(&version_url)
        .send()
        .await
        .with_context(|| format!("GET {version_url}"))?;
    if !response.status().is_success() {
        anyhow::bail!("GET {version_url} failed ({})", response.status());
    }
    let info: VersionInfo = response
        .json()
        .await
        .with_context(|| format!("parse {version_url}"))?;
    Ok(info.web_socket_debugger_url)
}

struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: Option<tokio::task::JoinHandle<()>>,
    /// Launched by us, so closing shuts the whole browser down.
    owned: bool,
}

async fn eval_bool(page: &Page, script: &str) -> anyhow::Result<bool> {
    let result = page
        .evaluate(script)
        .await
        .map_err(|err| CrawlError::Browser(format!("evaluate: {err}")))?;
    Ok(result.into_value::<bool>().unwrap_or(false))
}

fn js_string(value: &str) -> anyhow::Result<String> {
    serde_json::to_string(value).context("encode js string")
}

#[async_trait]
impl PageSession for ChromiumSession {
    async fn goto(&mut self, url: &str) -> anyhow::Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|err| CrawlError::Browser(format!("goto {url}: {err}")))?;
        Ok(())
    }

    async fn current_url(&mut self) -> anyhow::Result<String> {
        let url = self
            .page
            .url()
            .await
            .map_err(|err| CrawlError::Browser(format!("read url: {err}")))?;
        Ok(url.unwrap_or_default())
    }

    async fn content(&mut self) -> anyhow::Result<String> {
        let html = self
            .page
            .content()
            .await
            .map_err(|err| CrawlError::Browser(format!("read content: {err}")))?;
        Ok(html)
    }

    async fn is_present(&mut self, selector: &str) -> anyhow::Result<bool> {
        let script = format!("document.querySelector({}) !== null", js_string(selector)?);
        eval_bool(&self.page, &script).await
    }

    async fn is_clickable(&mut self, selector: &str) -> anyhow::Result<bool> {
        let script = CLICKABLE_SCRIPT.replace("__SELECTOR__", &js_string(selector)?);
        eval_bool(&self.page, &script).await
    }

    async fn click(&mut self, selector: &str) -> anyhow::Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|err| CrawlError::Browser(format!("find {selector}: {err}")))?;
        element
            .click()
            .await
            .map_err(|err| CrawlError::Browser(format!("click {selector}: {err}")))?;
        Ok(())
    }

    async fn submit_form(&mut self, form: &FormSubmission) -> anyhow::Result<()> {
        let script = form.to_script()?;
        self.page
            .evaluate(script)
            .await
            .map_err(|err| CrawlError::Browser(format!("submit #{}: {err}", form.form_id)))?;
        Ok(())
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        let result: anyhow::Result<()> = if self.owned {
            match self.browser.close().await {
                Ok(_) => self
                    .browser
                    .wait()
                    .await
                    .map(|_| ())
                    .context("wait for browser exit"),
                Err(err) => Err(CrawlError::Browser(format!("close browser: {err}")).into()),
            }
        } else {
            self.page
                .clone()
                .close()
                .await
                .map_err(|err| CrawlError::Browser(format!("close page: {err}")).into())
        };
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
        result
    }
}

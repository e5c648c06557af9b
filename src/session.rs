use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;

/// An in-page form submission: set each field by element id, then submit
/// the form through its native `submit()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub form_id: String,
    pub fields: Vec<(String, String)>,
}

impl FormSubmission {
    pub fn new(form_id: &str) -> Self {
        Self {
            form_id: form_id.to_owned(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, id: &str, value: &str) -> Self {
        self.fields.push((id.to_owned(), value.to_owned()));
        self
    }

    /// Script performing the submission in the page.
    pub fn to_script(&self) -> anyhow::Result<String> {
        let mut script = String::new();
        for (id, value) in &self.fields {
            let id = serde_json::to_string(id).context("encode field id")?;
            let value = serde_json::to_string(value).context("encode field value")?;
            script.push_str(&format!("document.getElementById({id}).value = {value};\n"));
        }
        let form_id = serde_json::to_string(&self.form_id).context("encode form id")?;
        script.push_str(&format!("document.getElementById({form_id}).submit();\n"));
        Ok(script)
    }
}

/// One browser tab owned by a single crawl step at a time.
#[async_trait]
pub trait PageSession: Send {
    /// Navigates and returns once the page has loaded.
    async fn goto(&mut self, url: &str) -> anyhow::Result<()>;
    async fn current_url(&mut self) -> anyhow::Result<String>;
    /// Markup of the rendered document.
    async fn content(&mut self) -> anyhow::Result<String>;
    async fn is_present(&mut self, selector: &str) -> anyhow::Result<bool>;
    /// Present, visible and enabled.
    async fn is_clickable(&mut self, selector: &str) -> anyhow::Result<bool>;
    async fn click(&mut self, selector: &str) -> anyhow::Result<()>;
    async fn submit_form(&mut self, form: &FormSubmission) -> anyhow::Result<()>;
    /// Shuts the browser down. The session is unusable afterwards.
    async fn close(&mut self) -> anyhow::Result<()>;
}

/// Produces ready sessions; one is launched per ranking dimension.
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    async fn launch(&self) -> anyhow::Result<Box<dyn PageSession>>;
}

/// Navigates to `url`, lets scripts run for `settle`, then returns the
/// rendered markup.
pub async fn fetch(
    session: &mut dyn PageSession,
    url: &str,
    settle: Duration,
) -> anyhow::Result<String> {
    session
        .goto(url)
        .await
        .with_context(|| format!("navigate to {url}"))?;
    pause(settle).await;
    session
        .content()
        .await
        .with_context(|| format!("read markup of {url}"))
}

pub async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

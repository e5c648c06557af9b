#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use rankbook::dimension::RankingDimension;
use rankbook::session::{FormSubmission, PageSession, SessionLauncher};
use scraper::{Html, Selector};
use tokio::time::Instant;

pub const ORIGIN: &str = "https://stub.popo.test";

#[derive(Debug, Clone, Copy)]
pub enum Gate {
    /// The confirm control becomes clickable this long after the gate shows.
    AppearsAfter(Duration),
    /// The confirm control exists but never becomes clickable.
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Goto(String),
    Submit(Vec<(String, String)>),
    Click(String),
    Close,
}

#[derive(Default)]
struct SiteState {
    listings: HashMap<(String, String, String), String>,
    details: HashMap<String, String>,
    gates: HashMap<String, Gate>,
    sessions: Vec<Vec<Action>>,
}

/// A scripted copy of the ranking site shared by every session it
/// launches.
#[derive(Clone, Default)]
pub struct StubSite {
    state: Arc<Mutex<SiteState>>,
}

impl StubSite {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, SiteState> {
        self.state.lock().expect("stub site lock")
    }

    pub fn with_listing(self, dimension: &RankingDimension, html: String) -> Self {
        self.state().listings.insert(
            (
                dimension.kind.id.to_owned(),
                dimension.category.id.to_owned(),
                dimension.period.id.to_owned(),
            ),
            html,
        );
        self
    }

    pub fn with_detail(self, path: &str, html: String) -> Self {
        self.state().details.insert(url(path), html);
        self
    }

    pub fn with_gate(self, path: &str, gate: Gate) -> Self {
        self.state().gates.insert(url(path), gate);
        self
    }

    pub fn sessions(&self) -> Vec<Vec<Action>> {
        self.state().sessions.clone()
    }

    fn open_session(&self) -> usize {
        let mut state = self.state();
        state.sessions.push(Vec::new());
        state.sessions.len() - 1
    }

    fn log(&self, session: usize, action: Action) {
        self.state().sessions[session].push(action);
    }

    fn listing(&self, form: &FormState) -> String {
        self.state()
            .listings
            .get(&(form.kind.clone(), form.sub.clone(), form.period.clone()))
            .cloned()
            .unwrap_or_else(|| listing_page(&[]))
    }
}

#[async_trait]
impl SessionLauncher for StubSite {
    async fn launch(&self) -> anyhow::Result<Box<dyn PageSession>> {
        let index = self.open_session();
        Ok(Box::new(StubSession {
            site: self.clone(),
            index,
            url: "about:blank".to_owned(),
            html: "<html></html>".to_owned(),
            form: FormState::default(),
            gate: None,
            confirmed: HashSet::new(),
            closed: false,
        }))
    }
}

#[derive(Debug, Clone)]
struct FormState {
    kind: String,
    sub: String,
    period: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            kind: "hits".to_owned(),
            sub: "1".to_owned(),
            period: "weekly".to_owned(),
        }
    }
}

struct ShownGate {
    target: String,
    gate: Gate,
    shown_at: Instant,
}

pub struct StubSession {
    site: StubSite,
    index: usize,
    url: String,
    html: String,
    form: FormState,
    gate: Option<ShownGate>,
    confirmed: HashSet<String>,
    closed: bool,
}

impl StubSession {
    fn ensure_open(&self) -> anyhow::Result<()> {
        if self.closed {
            anyhow::bail!("session already closed");
        }
        Ok(())
    }

    fn show_detail(&mut self, target: &str) {
        let html = self.site.state().details.get(target).cloned();
        self.url = target.to_owned();
        self.html = html.unwrap_or_else(|| "<html><body>not found</body></html>".to_owned());
    }

    fn gate_clickable(&self) -> bool {
        match &self.gate {
            Some(ShownGate {
                gate: Gate::AppearsAfter(after),
                shown_at,
                ..
            }) => shown_at.elapsed() >= *after,
            _ => false,
        }
    }

    fn matches(&self, selector: &str) -> anyhow::Result<bool> {
        let selector = Selector::parse(selector)
            .map_err(|err| anyhow::anyhow!("bad selector {selector}: {err}"))?;
        let document = Html::parse_document(&self.html);
        Ok(document.select(&selector).next().is_some())
    }
}

#[async_trait]
impl PageSession for StubSession {
    async fn goto(&mut self, target: &str) -> anyhow::Result<()> {
        self.ensure_open()?;
        self.site.log(self.index, Action::Goto(target.to_owned()));
        self.gate = None;

        if target == url("/rank/more") {
            self.form = FormState::default();
            self.url = target.to_owned();
            self.html = self.site.listing(&self.form);
            return Ok(());
        }

        let gate = self.site.state().gates.get(target).copied();
        match gate {
            Some(gate) if !self.confirmed.contains(target) => {
                self.url = format!("{ORIGIN}/limit18?url={target}");
                self.html = age_gate_page();
                self.gate = Some(ShownGate {
                    target: target.to_owned(),
                    gate,
                    shown_at: Instant::now(),
                });
            }
            _ => self.show_detail(target),
        }
        Ok(())
    }

    async fn current_url(&mut self) -> anyhow::Result<String> {
        self.ensure_open()?;
        Ok(self.url.clone())
    }

    async fn content(&mut self) -> anyhow::Result<String> {
        self.ensure_open()?;
        Ok(self.html.clone())
    }

    async fn is_present(&mut self, selector: &str) -> anyhow::Result<bool> {
        self.ensure_open()?;
        self.matches(selector)
    }

    async fn is_clickable(&mut self, selector: &str) -> anyhow::Result<bool> {
        self.ensure_open()?;
        if self.gate.is_some() && selector == "a.R-yes" {
            return Ok(self.gate_clickable());
        }
        self.matches(selector)
    }

    async fn click(&mut self, selector: &str) -> anyhow::Result<()> {
        self.ensure_open()?;
        self.site.log(self.index, Action::Click(selector.to_owned()));
        if selector != "a.R-yes" || !self.gate_clickable() {
            anyhow::bail!("element not clickable: {selector}");
        }
        let Some(shown) = self.gate.take() else {
            anyhow::bail!("no age gate showing");
        };
        self.confirmed.insert(shown.target.clone());
        self.show_detail(&shown.target);
        Ok(())
    }

    async fn submit_form(&mut self, form: &FormSubmission) -> anyhow::Result<()> {
        self.ensure_open()?;
        self.site.log(self.index, Action::Submit(form.fields.clone()));
        if !self.matches(&format!("form#{}", form.form_id))? {
            anyhow::bail!("form not on page: {}", form.form_id);
        }
        for (field, value) in &form.fields {
            match field.as_str() {
                "kind" => self.form.kind = value.clone(),
                "sub" => self.form.sub = value.clone(),
                "type" => self.form.period = value.clone(),
                other => anyhow::bail!("unknown form field: {other}"),
            }
        }
        self.url = url("/rank/more");
        self.html = self.site.listing(&self.form);
        Ok(())
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        self.site.log(self.index, Action::Close);
        self.closed = true;
        Ok(())
    }
}

pub fn origin() -> url::Url {
    rankbook::site::parse_origin(ORIGIN).expect("stub origin")
}

pub fn url(path: &str) -> String {
    format!("{ORIGIN}{path}")
}

pub fn listing_page(rows: &[String]) -> String {
    format!(
        r#"<!doctype html>
<html><body>
<form id="rank-form1" action="/rank/more" method="post">
  <input type="hidden" id="kind" name="kind" value="">
  <input type="hidden" id="sub" name="sub" value="">
  <input type="hidden" id="type" name="type" value="">
</form>
<table class="table-rwd">
  <thead><tr><th>排行</th><th>類別</th><th>書名</th><th>最新章回</th><th>作者</th><th>公開時間</th><th>狀態</th></tr></thead>
  <tbody>
{}
  </tbody>
</table>
</body></html>"#,
        rows.join("\n")
    )
}

/// A ranking page whose form never renders.
pub fn broken_page() -> String {
    "<!doctype html><html><body><p>maintenance</p></body></html>".to_owned()
}

/// A ranking page with the form but no ranking table.
pub fn tableless_page() -> String {
    r#"<!doctype html><html><body><form id="rank-form1"></form></body></html>"#.to_owned()
}

pub fn book_row(rank: u32, title: &str, path: &str) -> String {
    format!(
        r#"<tr>
  <td>{rank}</td>
  <td>愛情文藝</td>
  <td><a class="bname" href="{path}">{title}</a></td>
  <td>第{rank}章</td>
  <td>作者{rank}</td>
  <td>2024/05/0{rank}</td>
  <td>連載中</td>
</tr>"#
    )
}

pub fn six_cell_row() -> String {
    "<tr><td>廣告</td><td>x</td><td>x</td><td>x</td><td>x</td><td>x</td></tr>".to_owned()
}

pub fn detail_page(attributes: &[(&str, &str)]) -> String {
    let rows = attributes
        .iter()
        .map(|(label, value)| format!("<tr><th>{label}</th><td>{value}</td></tr>"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"<!doctype html>
<html><body>
<h1>book</h1>
<table class="book_data">
{rows}
</table>
</body></html>"#
    )
}

fn age_gate_page() -> String {
    r##"<!doctype html>
<html><body>
<p>本作品含有成人內容</p>
<a class="R-yes" href="#">我已滿18歲</a>
<a class="R-no" href="/">離開</a>
</body></html>"##
        .to_owned()
}

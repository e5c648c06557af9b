use std::io::Write;

/// Receives human-readable progress lines during a crawl.
pub trait ProgressSink: Send {
    fn report(&mut self, message: &str);
}

impl<F> ProgressSink for F
where
    F: FnMut(&str) + Send,
{
    fn report(&mut self, message: &str) {
        self(message);
    }
}

/// Writes each line to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutProgress;

impl ProgressSink for StdoutProgress {
    fn report(&mut self, message: &str) {
        write_line(&mut std::io::stdout().lock(), message);
    }
}

/// Progress is best effort: a failed write is logged and dropped.
fn write_line(out: &mut impl Write, message: &str) {
    if let Err(err) = writeln!(out, "{message}").and_then(|()| out.flush()) {
        tracing::debug!(%err, "progress line not written");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _message: &str) {}
}

pub fn dimension_started(sheet: &str) -> String {
    format!("▶ starting: {sheet}")
}

pub fn row_done(title: &str, sheet: &str) -> String {
    format!("✔ done: {title} ({sheet})")
}

pub fn run_saved(filename: &str) -> String {
    format!("🎉 done and saved: {filename}")
}

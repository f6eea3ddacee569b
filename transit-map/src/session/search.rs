//! Debounced incremental station search.
//!
//! Keystrokes push back a single pending deadline. The query is only issued
//! once the input has been quiet for [`DEBOUNCE`]. The coordinator owns the
//! deadline and the rendered result rows; the controller issues the request.
//!
//! Recording input never touches the timer driver, so the coordinator can be
//! fed from outside a runtime. Only [`SearchCoordinator::due`] sleeps.

use std::time::Duration;

use tokio::time::{Instant, sleep_until};
use tracing::trace;

use crate::domain::Station;

/// Quiet period after the last keystroke before a query is issued.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Shortest query, in characters after trimming, that is sent.
pub const MIN_QUERY_LEN: usize = 2;

/// One row of the result panel.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchRow {
    Hit(Station),
    /// Placeholder shown for an empty result set.
    NoResults,
    /// Inline failure message.
    Error(String),
}

/// What a keystroke did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Timer (re)started.
    Scheduled,
    /// Too short: panel hidden, nothing pending.
    Hidden,
}

#[derive(Debug, Default)]
pub struct SearchCoordinator {
    query: String,
    deadline: Option<Instant>,
    rows: Vec<SearchRow>,
    visible: bool,
}

fn long_enough(query: &str) -> bool {
    query.chars().count() >= MIN_QUERY_LEN
}

impl SearchCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current input text.
    pub fn on_input(&mut self, text: &str) -> InputOutcome {
        self.query = text.trim().to_string();
        if !long_enough(&self.query) {
            self.deadline = None;
            self.visible = false;
            return InputOutcome::Hidden;
        }
        self.deadline = Some(Instant::now() + DEBOUNCE);
        trace!(query = %self.query, "search debounce restarted");
        InputOutcome::Scheduled
    }

    /// Confirm key or search button: skip the debounce.
    ///
    /// Returns the query to issue now, or `None` if it is too short.
    pub fn submit(&mut self, text: &str) -> Option<String> {
        self.deadline = None;
        self.query = text.trim().to_string();
        if long_enough(&self.query) {
            Some(self.query.clone())
        } else {
            self.visible = false;
            None
        }
    }

    /// Whether a debounce deadline is set.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Resolve when the pending deadline passes, yielding the query to issue.
    ///
    /// Cancel safe: dropping the future leaves the deadline in place. With no
    /// deadline set it returns the current query immediately, so callers
    /// should guard on [`is_pending`](Self::is_pending).
    pub async fn due(&mut self) -> String {
        if let Some(deadline) = self.deadline {
            sleep_until(deadline).await;
        }
        self.deadline = None;
        self.query.clone()
    }

    /// Replace the panel with a response.
    pub fn render_results(&mut self, stations: Vec<Station>) {
        self.rows = if stations.is_empty() {
            vec![SearchRow::NoResults]
        } else {
            stations.into_iter().map(SearchRow::Hit).collect()
        };
        self.visible = true;
    }

    /// Replace the panel with an inline error row.
    pub fn render_error(&mut self, message: impl Into<String>) {
        self.rows = vec![SearchRow::Error(message.into())];
        self.visible = true;
    }

    /// Blur or outside click. In-flight requests are left alone.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn rows(&self) -> &[SearchRow] {
        &self.rows
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// The station shown in row `index`, if that row is a hit.
    pub fn hit(&self, index: usize) -> Option<&Station> {
        match self.rows.get(index) {
            Some(SearchRow::Hit(station)) => Some(station),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, LatLng, StationId};

    fn station(id: &str) -> Station {
        Station {
            id: StationId::parse(id).unwrap(),
            name: id.to_string(),
            category: Category::Intermodal,
            position: LatLng::new(4.6, -74.1),
            capacity: 0,
        }
    }

    #[test]
    fn short_input_hides_and_cancels() {
        let mut search = SearchCoordinator::new();
        assert_eq!(search.on_input("po"), InputOutcome::Scheduled);
        search.render_results(vec![station("A")]);
        assert!(search.is_pending());

        assert_eq!(search.on_input(" p "), InputOutcome::Hidden);
        assert!(!search.is_pending());
        assert!(!search.is_visible());
    }

    #[test]
    fn length_counts_characters() {
        let mut search = SearchCoordinator::new();
        assert_eq!(search.on_input("ñ"), InputOutcome::Hidden);
        assert_eq!(search.on_input("ño"), InputOutcome::Scheduled);
    }

    #[test]
    fn submit_bypasses_timer() {
        let mut search = SearchCoordinator::new();
        search.on_input("port");
        assert_eq!(search.submit("portal "), Some("portal".to_string()));
        assert!(!search.is_pending());
        assert_eq!(search.submit("p"), None);
    }

    #[test]
    fn empty_results_render_placeholder() {
        let mut search = SearchCoordinator::new();
        search.render_results(Vec::new());
        assert_eq!(search.rows(), &[SearchRow::NoResults]);
        assert!(search.is_visible());
        assert_eq!(search.hit(0), None);
    }

    #[test]
    fn results_replace_previous_rows() {
        let mut search = SearchCoordinator::new();
        search.render_error("API error 500: boom");
        search.render_results(vec![station("A"), station("B")]);

        assert_eq!(search.rows().len(), 2);
        assert_eq!(search.hit(1).map(|s| s.id.as_str()), Some("B"));
    }

    #[test]
    fn hide_keeps_rows() {
        let mut search = SearchCoordinator::new();
        search.render_results(vec![station("A")]);
        search.hide();
        assert!(!search.is_visible());
        assert_eq!(search.rows().len(), 1);
    }

    #[test]
    fn input_is_recorded_outside_a_runtime() {
        let mut search = SearchCoordinator::new();
        assert_eq!(search.on_input("porta"), InputOutcome::Scheduled);
        assert!(search.is_pending());
        assert_eq!(search.query(), "porta");
    }

    #[tokio::test(start_paused = true)]
    async fn due_is_cancel_safe() {
        let mut search = SearchCoordinator::new();
        search.on_input("calle");

        let early = tokio::time::timeout(Duration::from_millis(100), search.due()).await;
        assert!(early.is_err());
        assert!(search.is_pending());

        assert_eq!(search.due().await, "calle");
        assert!(!search.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn due_waits_for_quiet_period() {
        let mut search = SearchCoordinator::new();
        let start = tokio::time::Instant::now();
        search.on_input("cal");
        tokio::time::advance(Duration::from_millis(200)).await;
        search.on_input("calle");

        let query = search.due().await;

        assert_eq!(query, "calle");
        assert!(start.elapsed() >= Duration::from_millis(500));
        assert!(!search.is_pending());
    }
}

//! Incremental search session: debounce, dispatch and stale-response
//! suppression.
//!
//! The session is a small state machine driven from three places:
//!
//! - the input handler feeds keystrokes via [`SearchSession::input`],
//! - the periodic tick claims due requests via [`SearchSession::poll_deadline`]
//!   and spawns the actual HTTP call,
//! - the event handler delivers responses via [`SearchSession::apply`].
//!
//! Each dispatched request carries a monotonically increasing id. Only a
//! response matching the most recent id issued is applied; anything else is
//! a stale response from a superseded query and is discarded silently. The
//! HTTP call itself is never aborted — the session just drops interest in
//! its result.

use std::sync::Arc;
use tokio::time::{Duration, Instant};

use crate::cms::ArticleSummary;

/// Quiet interval after the last keystroke before a request is dispatched.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Queries shorter than this (trimmed) never reach the backend.
pub const MIN_QUERY_CHARS: usize = 2;

/// Cap on displayed results; the backend returns at most this many too.
pub const MAX_RESULTS: usize = 10;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// No query, or query below the minimum length.
    Idle,
    /// Waiting out the debounce interval after a keystroke.
    Debouncing,
    /// A request has been dispatched and not yet answered.
    Searching,
    /// The latest request was answered; `results` are authoritative.
    Done,
}

/// A request claimed from the session, ready for the caller to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub id: u64,
    pub query: String,
}

/// One user-visible search interaction, from first keystroke to selection
/// or dismissal.
#[derive(Debug)]
pub struct SearchSession {
    /// Raw input as typed (dispatched queries are trimmed).
    pub query: String,
    status: SearchStatus,
    /// Debounce deadline; `Some` only while `Debouncing`.
    deadline: Option<Instant>,
    /// Last request id handed out. Monotonic within the session.
    last_request_id: u64,
    /// Id of the request whose response is still wanted, if any.
    in_flight: Option<u64>,
    pub results: Vec<ArticleSummary>,
    /// Highlighted row in the result list.
    pub selected: usize,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            status: SearchStatus::Idle,
            deadline: None,
            last_request_id: 0,
            in_flight: None,
            results: Vec::new(),
            selected: 0,
        }
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// True while a dispatched request is unanswered (drives the spinner).
    pub fn is_searching(&self) -> bool {
        self.status == SearchStatus::Searching
    }

    /// Replace the query after a keystroke.
    ///
    /// Resets the debounce deadline and invalidates any in-flight request —
    /// its response no longer applies to what the user is asking for. A
    /// trimmed query below [`MIN_QUERY_CHARS`] clears the results and drops
    /// straight back to `Idle` without touching the network.
    pub fn input(&mut self, query: String) {
        self.query = query;
        self.in_flight = None;

        if self.query.trim().chars().count() < MIN_QUERY_CHARS {
            self.results.clear();
            self.selected = 0;
            self.status = SearchStatus::Idle;
            self.deadline = None;
            return;
        }

        self.status = SearchStatus::Debouncing;
        self.deadline = Some(Instant::now() + DEBOUNCE);
    }

    /// Append one typed character. Convenience wrapper over [`input`].
    ///
    /// [`input`]: SearchSession::input
    pub fn push_char(&mut self, c: char) {
        let mut q = std::mem::take(&mut self.query);
        q.push(c);
        self.input(q);
    }

    /// Delete the last character. Convenience wrapper over [`input`].
    ///
    /// [`input`]: SearchSession::input
    pub fn backspace(&mut self) {
        let mut q = std::mem::take(&mut self.query);
        q.pop();
        self.input(q);
    }

    /// Claim a request if the debounce deadline has passed.
    ///
    /// Called from the periodic tick. Returns at most one request per
    /// settled debounce window: claiming moves the session to `Searching`
    /// and clears the deadline, so the next tick returns `None` until a new
    /// keystroke arrives.
    pub fn poll_deadline(&mut self) -> Option<SearchRequest> {
        if self.status != SearchStatus::Debouncing {
            return None;
        }
        let deadline = self.deadline?;
        if Instant::now() < deadline {
            return None;
        }

        self.last_request_id += 1;
        let id = self.last_request_id;
        self.in_flight = Some(id);
        self.deadline = None;
        self.status = SearchStatus::Searching;

        let query = self.query.trim().to_string();
        tracing::debug!(request_id = id, query = %query, "Dispatching search request");
        Some(SearchRequest { id, query })
    }

    /// Deliver a response. Returns `true` if it was applied.
    ///
    /// Only the most recent dispatched request is still of interest; a
    /// response to anything else — superseded by a newer dispatch, cleared
    /// by a short query, or dismissed outright — is discarded without
    /// touching the visible results.
    pub fn apply(&mut self, id: u64, mut results: Vec<ArticleSummary>) -> bool {
        if self.in_flight != Some(id) {
            tracing::debug!(
                request_id = id,
                current = ?self.in_flight,
                "Discarding stale search response"
            );
            return false;
        }

        self.in_flight = None;
        results.truncate(MAX_RESULTS);
        self.results = results;
        self.selected = 0;
        self.status = SearchStatus::Done;
        true
    }

    /// Move the result highlight by `delta`, clamped to the list.
    pub fn move_selection(&mut self, delta: isize) {
        if self.results.is_empty() {
            self.selected = 0;
            return;
        }
        let max = self.results.len() - 1;
        self.selected = if delta.is_negative() {
            self.selected.saturating_sub(delta.unsigned_abs())
        } else {
            self.selected.saturating_add(delta as usize).min(max)
        };
    }

    /// Select the highlighted result, ending the session.
    ///
    /// Returns the article slug as a navigation target for the host; the
    /// session itself never navigates. `None` if there is nothing to select
    /// (no results, or the result has no slug) — the session is left intact
    /// in that case so the user can keep typing.
    pub fn select(&mut self) -> Option<Arc<str>> {
        let slug = self.results.get(self.selected).map(|a| a.slug.clone())?;
        if slug.is_empty() {
            tracing::warn!(selected = self.selected, "Search result has no slug, ignoring selection");
            return None;
        }
        self.dismiss();
        Some(slug)
    }

    /// Discard the session: clear query and results, cancel the pending
    /// deadline and drop interest in any in-flight request.
    pub fn dismiss(&mut self) {
        self.query.clear();
        self.results.clear();
        self.selected = 0;
        self.status = SearchStatus::Idle;
        self.deadline = None;
        self.in_flight = None;
    }
}

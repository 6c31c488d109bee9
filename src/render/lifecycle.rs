//! Load-then-render view lifecycle.
//!
//! A template-dependent view moves through `Loading → Ready | Failed`.
//! Loads are asynchronous from the view's perspective, so a newer request
//! can start while an older one is still in flight. Each request carries a
//! monotonically increasing token; only the most recently issued token may
//! update the visible state, and stale completions are discarded. This
//! replaces last-resolved-wins, which could show stale data after rapid
//! template switching.

use crate::error::CardError;

/// Opaque handle for one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Visible state of a template-dependent view.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    /// No request issued yet.
    Idle,
    Loading,
    Ready(T),
    /// Retained user-facing message; the surrounding UI stays usable.
    Failed(String),
}

/// Tracks the in-flight request and the visible state for one view.
#[derive(Debug)]
pub struct ViewLifecycle<T> {
    next_token: u64,
    current_token: u64,
    state: ViewState<T>,
}

impl<T> Default for ViewLifecycle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ViewLifecycle<T> {
    pub fn new() -> Self {
        Self {
            next_token: 0,
            current_token: 0,
            state: ViewState::Idle,
        }
    }

    /// Start a new request: the view shows `Loading` and any older
    /// in-flight request becomes stale.
    pub fn begin(&mut self) -> RequestToken {
        self.next_token += 1;
        self.current_token = self.next_token;
        self.state = ViewState::Loading;
        RequestToken(self.current_token)
    }

    /// Complete a request. Returns `false` (and changes nothing) when the
    /// token is not the most recently issued one.
    pub fn complete(&mut self, token: RequestToken, result: Result<T, CardError>) -> bool {
        if token.0 != self.current_token {
            return false;
        }
        self.state = match result {
            Ok(value) => ViewState::Ready(value),
            Err(e) => ViewState::Failed(e.to_string()),
        };
        true
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading)
    }

    /// The ready value, if any.
    pub fn value(&self) -> Option<&T> {
        match &self.state {
            ViewState::Ready(v) => Some(v),
            _ => None,
        }
    }

    /// The retained failure message, if any.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ViewState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

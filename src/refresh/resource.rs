use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::ApiError;

/// What happens to errors from poller-triggered fetches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundErrors {
    /// Keep showing the last good payload and the last surfaced error.
    #[default]
    Suppress,
    Surface,
}

impl std::str::FromStr for BackgroundErrors {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "suppress" => Ok(BackgroundErrors::Suppress),
            "surface" => Ok(BackgroundErrors::Surface),
            other => Err(format!("unknown background error policy: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Mount, manual refresh or a parameter change.
    Foreground,
    /// Fired by the poller.
    Background,
}

/// Identifies one request. Tickets are handed out in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    target: u64,
    kind: FetchKind,
}

impl Ticket {
    pub fn kind(&self) -> FetchKind {
        self.kind
    }
}

/// What `complete` did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Data,
    Error,
    Suppressed,
    /// Older than what is on screen, or for a previous target.
    Stale,
}

/// State of one refreshable resource: last good payload, loading flag and
/// error text, plus the bookkeeping that keeps late responses from
/// overwriting newer ones.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState {
    data: Value,
    loading: bool,
    error: String,
    policy: BackgroundErrors,
    last_seq: u64,
    shown_seq: u64,
    target: u64,
    foreground: Option<u64>,
}

impl Default for ResourceState {
    fn default() -> Self {
        Self::new(BackgroundErrors::default())
    }
}

impl ResourceState {
    pub fn new(policy: BackgroundErrors) -> Self {
        Self {
            data: Value::Array(Vec::new()),
            loading: false,
            error: String::new(),
            policy,
            last_seq: 0,
            shown_seq: 0,
            target: 0,
            foreground: None,
        }
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Empty when there is nothing to show.
    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn policy(&self) -> BackgroundErrors {
        self.policy
    }

    /// The URL changed: anything still in flight belongs to the old target.
    pub fn retarget(&mut self) {
        self.target += 1;
        self.foreground = None;
        self.loading = false;
    }

    pub fn begin(&mut self, kind: FetchKind) -> Ticket {
        self.last_seq += 1;
        if kind == FetchKind::Foreground {
            self.loading = true;
            self.foreground = Some(self.last_seq);
        }
        Ticket {
            seq: self.last_seq,
            target: self.target,
            kind,
        }
    }

    pub fn complete(&mut self, ticket: Ticket, result: Result<Value, ApiError>) -> Applied {
        if ticket.target != self.target {
            return Applied::Stale;
        }
        if self.foreground == Some(ticket.seq) {
            self.foreground = None;
            self.loading = false;
        }
        if ticket.seq < self.shown_seq {
            return Applied::Stale;
        }

        match result {
            Ok(data) => {
                self.data = data;
                self.error.clear();
                self.shown_seq = ticket.seq;
                Applied::Data
            }
            Err(ApiError::Aborted) => Applied::Stale,
            Err(e) => {
                let surface = ticket.kind == FetchKind::Foreground
                    || self.policy == BackgroundErrors::Surface;
                if surface {
                    self.error = e.to_string();
                    self.shown_seq = ticket.seq;
                    Applied::Error
                } else {
                    log::debug!("Background refresh failed: {e}");
                    Applied::Suppressed
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unavailable() -> ApiError {
        ApiError::Status {
            status: 503,
            message: String::new(),
        }
    }

    #[test]
    fn test_starts_empty() {
        let state = ResourceState::default();
        assert_eq!(state.data(), &json!([]));
        assert!(!state.loading());
        assert_eq!(state.error(), "");
    }

    #[test]
    fn test_foreground_success_and_failure() {
        let mut state = ResourceState::default();
        let ticket = state.begin(FetchKind::Foreground);
        assert!(state.loading());
        assert_eq!(state.complete(ticket, Ok(json!({"count": 1}))), Applied::Data);
        assert!(!state.loading());

        let ticket = state.begin(FetchKind::Foreground);
        assert_eq!(state.complete(ticket, Err(unavailable())), Applied::Error);
        assert_eq!(state.error(), "Request failed with status code 503");
        assert!(!state.loading());
        assert_eq!(state.data(), &json!({"count": 1}));
    }

    #[test]
    fn test_background_never_sets_loading_or_error() {
        let mut state = ResourceState::default();
        let ticket = state.begin(FetchKind::Foreground);
        state.complete(ticket, Err(ApiError::Transport("offline".into())));
        let before = state.error().to_string();

        let ticket = state.begin(FetchKind::Background);
        assert!(!state.loading());
        assert_eq!(state.complete(ticket, Err(unavailable())), Applied::Suppressed);
        assert_eq!(state.error(), before);
    }

    #[test]
    fn test_background_success_clears_error() {
        let mut state = ResourceState::default();
        let ticket = state.begin(FetchKind::Foreground);
        state.complete(ticket, Err(unavailable()));

        let ticket = state.begin(FetchKind::Background);
        assert_eq!(state.complete(ticket, Ok(json!([1]))), Applied::Data);
        assert_eq!(state.error(), "");
        assert_eq!(state.data(), &json!([1]));
    }

    #[test]
    fn test_surface_policy() {
        let mut state = ResourceState::new(BackgroundErrors::Surface);
        let ticket = state.begin(FetchKind::Background);
        assert_eq!(state.complete(ticket, Err(unavailable())), Applied::Error);
        assert!(!state.error().is_empty());
        assert!(!state.loading());
    }

    #[test]
    fn test_older_response_is_discarded() {
        let mut state = ResourceState::default();
        let slow = state.begin(FetchKind::Background);
        let fast = state.begin(FetchKind::Foreground);

        assert_eq!(state.complete(fast, Ok(json!("new"))), Applied::Data);
        assert_eq!(state.complete(slow, Ok(json!("old"))), Applied::Stale);
        assert_eq!(state.data(), &json!("new"));
    }

    #[test]
    fn test_loading_follows_latest_foreground() {
        let mut state = ResourceState::default();
        let first = state.begin(FetchKind::Foreground);
        let second = state.begin(FetchKind::Foreground);

        state.complete(first, Ok(json!(1)));
        assert!(state.loading());
        state.complete(second, Ok(json!(2)));
        assert!(!state.loading());
    }

    #[test]
    fn test_retarget_drops_in_flight() {
        let mut state = ResourceState::default();
        let old = state.begin(FetchKind::Foreground);
        state.retarget();
        assert!(!state.loading());

        assert_eq!(state.complete(old, Ok(json!("old url"))), Applied::Stale);
        assert_eq!(state.data(), &json!([]));

        let new = state.begin(FetchKind::Foreground);
        assert_eq!(state.complete(new, Ok(json!("new url"))), Applied::Data);
    }

    #[test]
    fn test_aborted_is_ignored() {
        let mut state = ResourceState::default();
        let ticket = state.begin(FetchKind::Foreground);
        assert_eq!(state.complete(ticket, Err(ApiError::Aborted)), Applied::Stale);
        assert_eq!(state.error(), "");
        assert!(!state.loading());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Surface".parse::<BackgroundErrors>(), Ok(BackgroundErrors::Surface));
        assert_eq!(" suppress ".parse::<BackgroundErrors>(), Ok(BackgroundErrors::Suppress));
        assert!("loud".parse::<BackgroundErrors>().is_err());
    }
}

//! Statement state.

/// Statement state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Nothing executed yet.
    Idle,
    /// Waiting for the query service.
    Executing,
    /// Result set is open and has rows left.
    Open,
    /// Cursor moved past the last row.
    Exhausted,
    /// Last execution returned an error.
    Failed,
    /// Statement or its connection is closed.
    Closed,
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use State::*;
        match self {
            Idle => write!(f, "idle"),
            Executing => write!(f, "executing"),
            Open => write!(f, "open"),
            Exhausted => write!(f, "exhausted"),
            Failed => write!(f, "failed"),
            Closed => write!(f, "closed"),
        }
    }
}

use crate::types::Amphibian;

/// Outcome of the latest fetch attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    /// Nothing has been requested yet.
    #[default]
    Idle,
    Loading,
    Success(Vec<Amphibian>),
    /// The cause is logged, not kept.
    Error,
}

impl ViewState {
    /// True once a fetch has produced a result, good or bad.
    pub fn is_settled(&self) -> bool {
        matches!(self, ViewState::Success(_) | ViewState::Error)
    }

    pub fn records(&self) -> Option<&[Amphibian]> {
        match self {
            ViewState::Success(records) => Some(records),
            _ => None,
        }
    }
}

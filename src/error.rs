use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TeamError {
    #[error("need at least {required} teams to separate {required} genders, got {requested}")]
    InsufficientTeams { required: usize, requested: usize },
    #[error("apportioned {allocated} teams but {requested} were requested")]
    AllocationMismatch { requested: usize, allocated: usize },
}

impl TeamError {
    /// Whether the caller should block generation and ask for input instead
    /// of reporting an internal fault.
    pub fn is_validation(&self) -> bool {
        matches!(self, TeamError::InsufficientTeams { .. })
    }
}

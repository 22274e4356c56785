use brickhop_platformer::ResetError;

#[derive(Debug)]
pub enum RunnerError {
    /// A runner setting is out of range.
    InvalidConfig(String),
    /// A requested session reset was rejected by the game.
    InvalidLives(ResetError),
    /// The frame loop task panicked or was aborted.
    LoopJoin(String),
}

impl std::fmt::Display for RunnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig(m) => write!(f, "invalid config: {m}"),
            Self::InvalidLives(e) => write!(f, "{e}"),
            Self::LoopJoin(m) => write!(f, "frame loop failed: {m}"),
        }
    }
}

impl std::error::Error for RunnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidLives(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ResetError> for RunnerError {
    fn from(e: ResetError) -> Self {
        Self::InvalidLives(e)
    }
}

impl From<tokio::task::JoinError> for RunnerError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::LoopJoin(e.to_string())
    }
}

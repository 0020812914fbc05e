use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Historical recompute requested but no pristine original is loaded.
    OriginalMissing,
    /// Action index out of range for the current log.
    NoSuchAction { index: usize, len: usize },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OriginalMissing => {
                write!(f, "cannot recompute history: original data is missing, reload the dataset")
            }
            Self::NoSuchAction { index, len } => {
                write!(f, "no action at index {index} (log has {len} entries)")
            }
        }
    }
}

impl std::error::Error for SessionError {}

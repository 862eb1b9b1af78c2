//! Errors returned by the analysis boundary

use thiserror::Error;

/// Failure of a single `analyze` call.
///
/// Validation variants are raised before any component runs. `Failed` is
/// opaque: the cause is logged where it happens and never reaches callers.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("subject is empty")]
    EmptySubject,

    #[error("subject is {len} characters long (max {max})")]
    SubjectTooLong { len: usize, max: usize },

    #[error("analysis failed")]
    Failed,
}

impl AnalysisError {
    /// True for errors caused by the caller's input
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptySubject | Self::SubjectTooLong { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        assert!(AnalysisError::EmptySubject.is_validation());
        assert!(AnalysisError::SubjectTooLong { len: 600, max: 500 }.is_validation());
        assert!(!AnalysisError::Failed.is_validation());
    }

    #[test]
    fn test_failure_message_is_opaque() {
        assert_eq!(AnalysisError::Failed.to_string(), "analysis failed");
    }
}

//! Error types for ballast operations

use thiserror::Error;

/// Main error type for ballast operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Kubernetes API error
    #[error("kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// The system inventory has no system record
    ///
    /// The platform is not in a queryable state and no sequencing decision can
    /// be made. This is a misconfiguration, not a retryable condition.
    #[error("system record not found: {0}")]
    SystemRecordNotFound(String),

    /// A release was in neither the resource map nor the cleanup list when a
    /// transition was attempted
    ///
    /// Every tracked release must be in exactly one of the two sets, so this
    /// indicates a programming or configuration error upstream.
    #[error("release lifecycle invariant violated: {0}")]
    InvariantViolation(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Override generation error
    #[error("override generation error for {release}: {message}")]
    Overrides {
        /// Release whose overrides could not be generated
        release: String,
        /// Description of what failed
        message: String,
    },
}

impl Error {
    /// Create a system-record-not-found error with the given message
    pub fn system_record_not_found(msg: impl Into<String>) -> Self {
        Self::SystemRecordNotFound(msg.into())
    }

    /// Create an invariant-violation error with the given message
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// Create a serialization error with the given message
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create an override generation error for the given release
    pub fn overrides(release: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Overrides {
            release: release.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Story: a restore is attempted on a platform whose inventory was never
    /// initialized. The sequencer must abort with a clear, fatal error rather
    /// than guess at a sequencing decision.
    #[test]
    fn story_missing_system_record_is_fatal_and_descriptive() {
        let err = Error::system_record_not_found("no system row in inventory");
        assert!(matches!(err, Error::SystemRecordNotFound(_)));
        assert_eq!(
            err.to_string(),
            "system record not found: no system row in inventory"
        );
    }

    /// Story: a required release is tracked in neither lifecycle set. That can
    /// only happen through a programming error, so the error message must name
    /// the release for debugging rather than being silently skipped.
    #[test]
    fn story_invariant_violation_names_the_release() {
        let err = Error::invariant("release garbd tracked in neither set");
        assert!(err.to_string().contains("garbd"));
    }

    #[test]
    fn test_override_error_includes_release_and_message() {
        let err = Error::overrides("mariadb", "controller count is zero");
        assert_eq!(
            err.to_string(),
            "override generation error for mariadb: controller count is zero"
        );
    }
}

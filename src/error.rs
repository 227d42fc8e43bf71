//! Error types for record validation and aggregation.

use thiserror::Error;

/// Errors raised while validating or aggregating placement records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    /// A status string outside the five known application statuses.
    #[error("invalid application status: '{0}'")]
    InvalidStatus(String),

    /// An application whose student id names no student in the collection.
    #[error("application '{application_id}' references unknown student '{student_id}'")]
    DanglingReference {
        application_id: String,
        student_id: String,
    },

    /// A student id requested by the caller that is not in the dataset.
    #[error("no student with id '{0}'")]
    UnknownStudent(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AggregateError::InvalidStatus("hired".to_string());
        assert_eq!(err.to_string(), "invalid application status: 'hired'");

        let err = AggregateError::DanglingReference {
            application_id: "7".to_string(),
            student_id: "42".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "application '7' references unknown student '42'"
        );
    }
}

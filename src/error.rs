use thiserror::Error;

/// Failures reported by the clustering and comparison routines.
///
/// Numerical degeneracies (empty clusters, coinciding points, empty unions)
/// are not errors; they resolve to documented fallback values instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusterError {
    /// A precondition on the arguments of `operation` does not hold.
    #[error("{operation}: {message}")]
    InvalidArgument {
        operation: &'static str,
        message: String,
    },

    /// The assignment solver could not process its cost matrix.
    #[error("assignment solver: {message}")]
    Solver { message: String },
}

impl ClusterError {
    pub fn invalid(operation: &'static str, message: impl Into<String>) -> Self {
        ClusterError::InvalidArgument {
            operation,
            message: message.into(),
        }
    }

    pub fn solver(message: impl Into<String>) -> Self {
        ClusterError::Solver {
            message: message.into(),
        }
    }

    /// Name of the operation that rejected its input, if any.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            ClusterError::InvalidArgument { operation, .. } => Some(operation),
            ClusterError::Solver { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClusterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = ClusterError::invalid("kmeans", "codebook is empty");
        assert_eq!(err.to_string(), "kmeans: codebook is empty");
        assert_eq!(err.operation(), Some("kmeans"));
    }

    #[test]
    fn test_solver_display() {
        let err = ClusterError::solver("cost matrix is not square");
        assert_eq!(err.to_string(), "assignment solver: cost matrix is not square");
        assert_eq!(err.operation(), None);
    }
}

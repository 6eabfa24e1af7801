//! Error types for case-by-case regression
//!
//! Provides a unified error type for all casewise crates.

use thiserror::Error;

/// Core error type for case-by-case regression
#[derive(Error, Debug)]
pub enum Error {
    /// Bad dataset, model specification, column or parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// One case cannot support the model
    #[error("Degenerate case '{case}': {reason}")]
    DegenerateCase { case: String, reason: String },

    /// Bootstrap interval cannot be formed for a term
    #[error("Degenerate bootstrap for term '{term}': {reason}")]
    DegenerateBootstrap { term: String, reason: String },

    /// Internal consistency failure while assembling results
    #[error("Incomplete aggregation: {0}")]
    IncompleteAggregation(String),

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Threading or parallelization error
    #[error("Execution error: {0}")]
    Execution(String),

    /// The run was cancelled through a cancellation token
    #[error("Operation cancelled")]
    Cancelled,

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a degenerate-case error for the given case key
    pub fn degenerate_case(case: impl ToString, reason: impl Into<String>) -> Self {
        Self::DegenerateCase {
            case: case.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a degenerate-bootstrap error whose term is filled in later
    /// with [`Error::with_term`]
    pub fn degenerate_bootstrap(reason: impl Into<String>) -> Self {
        Self::DegenerateBootstrap {
            term: String::new(),
            reason: reason.into(),
        }
    }

    /// Attach a term name to a degenerate-bootstrap error that has none yet
    pub fn with_term(self, term: &str) -> Self {
        match self {
            Self::DegenerateBootstrap { term: t, reason } if t.is_empty() => {
                Self::DegenerateBootstrap {
                    term: term.to_string(),
                    reason,
                }
            }
            other => other,
        }
    }

    /// Create an error for a missing column
    pub fn missing_column(name: &str) -> Self {
        Self::InvalidInput(format!("column '{name}' does not exist"))
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Whether this error names one case of the dataset
    pub fn is_degenerate_case(&self) -> bool {
        matches!(self, Self::DegenerateCase { .. })
    }

    /// Whether this error names one term of the model
    pub fn is_degenerate_bootstrap(&self) -> bool {
        matches!(self, Self::DegenerateBootstrap { .. })
    }
}

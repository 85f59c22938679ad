use thiserror::Error;

/// Errors raised when building, inspecting or reducing a joint gaussian distribution.
/// All of them are raised at the point of detection and leave the distribution
/// they were raised from unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GaussianError {

    /// The mean vector or covariance matrix does not agree with the number of variables.
    #[error("Dimension mismatch for {what}: expected {expected}, found {found}")]
    Dimension {
        what : &'static str,
        expected : String,
        found : String
    },

    #[error("Covariance matrix is singular and cannot be inverted")]
    SingularMatrix,

    /// A scalar identifier (or otherwise malformed value) was informed where a
    /// sequence of identifiers was required, or a distribution with non-finite
    /// entries was to be written as JSON.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Holds the Debug rendering of the missing identifier, so string names
    /// appear quoted (e.g. "x9").
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// Raised only by explicit validation (symmetry, semi-definiteness and unique names).
    #[error("Invalid distribution: {0}")]
    InvalidDistribution(String)

}

impl GaussianError {

    pub(crate) fn mean_dim(expected : usize, found : usize) -> Self {
        GaussianError::Dimension {
            what : "mean vector",
            expected : format!("{} entries", expected),
            found : format!("{} entries", found)
        }
    }

    pub(crate) fn cov_dim(expected : usize, found : (usize, usize)) -> Self {
        GaussianError::Dimension {
            what : "covariance matrix",
            expected : format!("{}x{}", expected, expected),
            found : format!("{}x{}", found.0, found.1)
        }
    }

}

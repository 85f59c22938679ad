use nalgebra::*;
use std::fmt::Debug;
use crate::calc;

pub mod error;

pub use error::*;

pub mod gaussian;

pub use gaussian::*;

/// Trait shared by distributions summarized by their first two moments.
/// The mean and covariance are views into the distribution state; the variance and
/// correlation summaries are derived from the covariance at every call.
pub trait Distribution
    where Self : Debug
{

    /// Number of random variables the distribution is defined over.
    fn dim(&self) -> usize;

    /// Returns the expected value of each variable.
    fn mean<'a>(&'a self) -> &'a DVector<f64>;

    /// Returns the (symmetric, positive semi-definite) covariance matrix.
    fn cov<'a>(&'a self) -> &'a DMatrix<f64>;

    /// Returns the diagonal of the covariance matrix.
    fn var(&self) -> DVector<f64> {
        self.cov().diagonal()
    }

    /// Returns the covariance standardized by the variances. Entries involving a
    /// variable with zero variance are not finite.
    fn corr(&self) -> DMatrix<f64> {
        calc::corr_from(self.cov().clone())
    }

}

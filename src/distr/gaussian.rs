use nalgebra::*;
use super::*;
use serde::{Serialize, Serializer, Deserialize};
use std::cell::OnceCell;
use std::fmt::Debug;
use crate::calc;

/// Multivariate normal N(μ, Σ) over an ordered list of named variables. The position
/// of a name in the variable list is the row of its entry in the mean vector μ (nx1)
/// and the row/column of its entries in the covariance matrix Σ (nxn).
///
/// The precision (inverse covariance) matrix is computed only when first requested
/// and kept until the covariance changes, which happens only through marginalization.
/// Since the cached precision lives in a cell, a JointGaussian cannot be shared
/// between threads without external synchronization; clone it instead.
///
/// Cloning gives an instance with independent buffers, carrying over the
/// cached precision (if it was already computed).
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "GaussianNode<V>")]
#[serde(bound(deserialize = "V : Deserialize<'de> + Clone + PartialEq + Debug"))]
pub struct JointGaussian<V = String> {

    variables : Vec<V>,

    mu : DVector<f64>,

    sigma : DMatrix<f64>,

    precision : OnceCell<DMatrix<f64>>

}

/// Serialized form of a JointGaussian, shared with the documents read and written
/// by crate::model: {"multinormal" : {"variables" : [...], "mean" : [...], "cov" : [[...], ...]}}
#[derive(Serialize, Deserialize)]
struct GaussianNode<V> {
    multinormal : GaussianParts<V>
}

/// Unvalidated fields of a serialized JointGaussian, which pass through
/// JointGaussian::new before being accepted. The covariance is held by rows.
#[derive(Serialize, Deserialize)]
struct GaussianParts<V> {
    variables : Vec<V>,
    mean : Vec<f64>,
    cov : Vec<Vec<f64>>
}

impl<V> TryFrom<GaussianNode<V>> for JointGaussian<V>
where
    V : Clone + PartialEq + Debug
{

    type Error = GaussianError;

    fn try_from(node : GaussianNode<V>) -> Result<Self, GaussianError> {
        let parts = node.multinormal;
        let nrows = parts.cov.len();
        if let Some(row) = parts.cov.iter().find(|r| r.len() != nrows ) {
            return Err(GaussianError::cov_dim(parts.variables.len(), (nrows, row.len())));
        }
        let sigma = DMatrix::from_fn(nrows, nrows, |i, j| parts.cov[i][j] );
        JointGaussian::new(parts.variables, DVector::from_vec(parts.mean), sigma)
    }

}

/// Non-finite entries have no JSON representation, so serializing a distribution
/// holding them fails instead of writing nulls that cannot be read back.
impl<V> Serialize for JointGaussian<V>
where
    V : Serialize + Clone + PartialEq + Debug
{

    fn serialize<S>(&self, serializer : S) -> Result<S::Ok, S::Error>
    where
        S : Serializer
    {
        self.check_finite().map_err(|e| <S::Error as serde::ser::Error>::custom(e) )?;
        let parts = GaussianParts {
            variables : self.variables.clone(),
            mean : self.mu.iter().cloned().collect(),
            cov : self.sigma.row_iter().map(|r| r.iter().cloned().collect() ).collect()
        };
        GaussianNode { multinormal : parts }.serialize(serializer)
    }

}

impl<V> JointGaussian<V>
where
    V : Clone + PartialEq + Debug
{

    /// Builds a new distribution over the informed variables from a mean vector mu and
    /// a covariance matrix sigma. Fails if mu does not have one entry per variable, or if
    /// sigma is not square with one row per variable. Sigma is assumed symmetric
    /// positive semi-definite, but this is not verified here (see new_checked).
    pub fn new<I>(variables : I, mu : DVector<f64>, sigma : DMatrix<f64>) -> Result<Self, GaussianError>
    where
        I : IntoIterator<Item=V>
    {
        let variables : Vec<V> = variables.into_iter().collect();
        let n = variables.len();
        if mu.nrows() != n {
            return Err(GaussianError::mean_dim(n, mu.nrows()));
        }
        if sigma.shape() != (n, n) {
            return Err(GaussianError::cov_dim(n, sigma.shape()));
        }
        Ok(Self { variables, mu, sigma, precision : OnceCell::new() })
    }

    /// Builds a distribution from a mean slice and a covariance slice holding the
    /// matrix entries in row-major order (n*n entries for n variables).
    pub fn from_slices<I>(variables : I, mean : &[f64], cov : &[f64]) -> Result<Self, GaussianError>
    where
        I : IntoIterator<Item=V>
    {
        let variables : Vec<V> = variables.into_iter().collect();
        let n = variables.len();
        if mean.len() != n {
            return Err(GaussianError::mean_dim(n, mean.len()));
        }
        if cov.len() != n * n {
            return Err(GaussianError::Dimension {
                what : "covariance matrix",
                expected : format!("{} entries", n * n),
                found : format!("{} entries", cov.len())
            });
        }
        let mu = DVector::from_column_slice(mean);
        let sigma = DMatrix::from_row_slice(n, n, cov);
        Self::new(variables, mu, sigma)
    }

    /// Same as new, but also validates the distribution (see validate).
    pub fn new_checked<I>(variables : I, mu : DVector<f64>, sigma : DMatrix<f64>) -> Result<Self, GaussianError>
    where
        I : IntoIterator<Item=V>
    {
        let distr = Self::new(variables, mu, sigma)?;
        distr.validate()?;
        Ok(distr)
    }

    /// Verifies that variable names are unique and the covariance is symmetric and
    /// positive semi-definite (up to calc::SYMMETRY_TOL and calc::PSD_TOL).
    pub fn validate(&self) -> Result<(), GaussianError> {
        for (i, var) in self.variables.iter().enumerate() {
            if self.variables[..i].contains(var) {
                return Err(GaussianError::InvalidDistribution(format!("Variable {:?} appears more than once", var)));
            }
        }
        if !calc::is_symmetric(&self.sigma) {
            return Err(GaussianError::InvalidDistribution(format!("Covariance matrix is not symmetric")));
        }
        if !calc::has_nonnegative_spectrum(&self.sigma) {
            return Err(GaussianError::InvalidDistribution(format!("Covariance matrix is not positive semi-definite")));
        }
        Ok(())
    }

    /// Variable names, in the order of the mean vector and covariance rows.
    pub fn variables(&self) -> &[V] {
        &self.variables[..]
    }

    /// Position of the variable in the mean vector and covariance matrix.
    pub fn index_of(&self, var : &V) -> Option<usize> {
        self.variables.iter().position(|v| v == var )
    }

    /// Returns the inverse of the covariance matrix. The inversion is performed
    /// at the first call, and the same matrix is returned by all subsequent calls
    /// until the covariance changes.
    pub fn precision_matrix(&self) -> Result<&DMatrix<f64>, GaussianError> {
        if let Some(prec) = self.precision.get() {
            log::trace!("Using cached precision matrix ({} variables)", self.dim());
            return Ok(prec);
        }
        let prec = calc::invert_scale(&self.sigma).ok_or(GaussianError::SingularMatrix)?;
        log::debug!("Computed precision matrix for {} variables", self.dim());
        Ok(self.precision.get_or_init(|| prec ))
    }

    /// Whether the precision matrix was already computed for the current covariance.
    pub fn has_cached_precision(&self) -> bool {
        self.precision.get().is_some()
    }

    /// Fails with InvalidArgument if the mean or covariance holds a NaN or infinite entry.
    pub fn check_finite(&self) -> Result<(), GaussianError> {
        if !self.mu.iter().all(|v| v.is_finite() ) {
            return Err(GaussianError::InvalidArgument(format!("Mean vector has non-finite entries")));
        }
        if !self.sigma.iter().all(|v| v.is_finite() ) {
            return Err(GaussianError::InvalidArgument(format!("Covariance matrix has non-finite entries")));
        }
        Ok(())
    }

    /// Marginalizes the informed variables out of self, which is left as the distribution
    /// of the remaining variables (kept in their original relative order). If any of the
    /// variables is unknown, an error is returned and self is not modified.
    pub fn marginalize(&mut self, vars : &[V]) -> Result<(), GaussianError> {
        let keep = self.keep_indices(vars)?;
        self.variables = keep.iter().map(|ix| self.variables[*ix].clone() ).collect();
        self.mu = self.mu.select_rows(keep.iter());
        self.sigma = calc::select_principal_submatrix(&self.sigma, &keep[..]);
        self.precision.take();
        log::debug!("Marginalized {} variable(s); {} remaining", vars.len(), self.dim());
        Ok(())
    }

    /// Returns the marginal distribution of the variables remaining after the informed
    /// variables are marginalized out, leaving self untouched.
    pub fn marginal(&self, vars : &[V]) -> Result<Self, GaussianError> {
        let keep = self.keep_indices(vars)?;
        let variables : Vec<V> = keep.iter().map(|ix| self.variables[*ix].clone() ).collect();
        let mu = self.mu.select_rows(keep.iter());
        let sigma = calc::select_principal_submatrix(&self.sigma, &keep[..]);
        log::debug!("Took marginal over {} of {} variables", variables.len(), self.dim());
        Ok(Self { variables, mu, sigma, precision : OnceCell::new() })
    }

    /// Resolves the positions of the informed variables, returning the (ascending)
    /// positions of all the other variables.
    fn keep_indices(&self, vars : &[V]) -> Result<Vec<usize>, GaussianError> {
        let mut remove = vec![false; self.variables.len()];
        for var in vars.iter() {
            let ix = self.index_of(var)
                .ok_or_else(|| GaussianError::UnknownVariable(format!("{:?}", var)) )?;
            remove[ix] = true;
        }
        Ok((0..self.variables.len()).filter(|ix| !remove[*ix] ).collect())
    }

}

impl<V> Distribution for JointGaussian<V>
where
    V : Debug
{

    fn dim(&self) -> usize {
        self.variables.len()
    }

    fn mean<'a>(&'a self) -> &'a DVector<f64> {
        &self.mu
    }

    fn cov<'a>(&'a self) -> &'a DMatrix<f64> {
        &self.sigma
    }

}

/// Distributions are compared by their variables, mean and covariance. The
/// cached precision matrix is not considered.
impl<V> PartialEq for JointGaussian<V>
where
    V : PartialEq
{

    fn eq(&self, other : &Self) -> bool {
        self.variables == other.variables && self.mu == other.mu && self.sigma == other.sigma
    }

}

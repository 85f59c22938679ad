/// The JointGaussian distribution over named variables, the Distribution trait
/// it implements and the errors raised when building or reducing it.
pub mod distr;

/// Numeric kernels over dense matrices: principal sub-matrix selection,
/// inversion and symmetry/definiteness checks.
pub mod calc;

/// Reading and writing distributions as JSON documents.
pub mod model;

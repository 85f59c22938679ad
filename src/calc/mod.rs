use nalgebra::*;

/// Largest absolute difference tolerated between a covariance entry and
/// its transposed counterpart for the matrix to be considered symmetric.
pub const SYMMETRY_TOL : f64 = 1E-8;

/// Smallest (negative) eigenvalue tolerated for a symmetric matrix to be
/// considered positive semi-definite.
pub const PSD_TOL : f64 = 1E-10;

/// Extracts the principal sub-matrix of m at the informed indices, i.e. the
/// matrix built from rows ix and then columns ix (in the order given by ix).
/// The output is ix.len() x ix.len(); an empty index list yields a 0x0 matrix.
pub fn select_principal_submatrix(m : &DMatrix<f64>, ix : &[usize]) -> DMatrix<f64> {
    assert!(m.nrows() == m.ncols(), "select_principal_submatrix: Informed non-square matrix");
    let rows = m.select_rows(ix.iter());
    rows.select_columns(ix.iter())
}

/// Inverts a scale (covariance or precision) matrix via LU decomposition. Returns None
/// if the matrix is singular, or if the inversion was numerically unstable enough to
/// yield non-finite entries. A 0x0 matrix is its own inverse.
pub fn invert_scale(s : &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let inv = s.clone().try_inverse()?;
    if inv.iter().all(|v| v.is_finite() ) {
        Some(inv)
    } else {
        None
    }
}

/// Builds a symmetric matrix from M as (1/2)*(M + M^T)
pub fn build_symmetric(m : &DMatrix<f64>) -> DMatrix<f64> {
    assert!(m.nrows() == m.ncols(), "build_symmetric: Informed non-square matrix");
    let mt = m.transpose();
    (m + mt).scale(0.5)
}

pub fn is_symmetric(m : &DMatrix<f64>) -> bool {
    if m.nrows() != m.ncols() {
        return false;
    }
    if m.nrows() == 0 {
        return true;
    }
    let symm_m = build_symmetric(m);
    (m - &symm_m).amax() <= SYMMETRY_TOL
}

/// Verifies if the informed matrix is symmetric positive semi-definite (and can be
/// used as a covariance matrix) by inspecting the eigenvalues of its symmetric part.
pub fn is_psd(m : &DMatrix<f64>) -> bool {
    is_symmetric(m) && has_nonnegative_spectrum(m)
}

/// Verifies that no eigenvalue of the symmetric part of m falls below -PSD_TOL.
/// Symmetry itself is not verified (see is_symmetric).
pub fn has_nonnegative_spectrum(m : &DMatrix<f64>) -> bool {
    if m.nrows() == 0 {
        return true;
    }
    let eigen = SymmetricEigen::new(build_symmetric(m));
    eigen.eigenvalues.iter().all(|e| *e >= -PSD_TOL )
}

/// Standardizes a covariance matrix into a correlation matrix D^-1/2 Σ D^-1/2,
/// where D is the covariance diagonal.
pub fn corr_from(mut cov : DMatrix<f64>) -> DMatrix<f64> {
    assert!(cov.nrows() == cov.ncols());
    let mut diag_m = DMatrix::zeros(cov.nrows(), cov.ncols());
    let diag = cov.diagonal().map(|d| 1. / d.sqrt() );
    diag_m.set_diagonal(&diag);
    cov *= &diag_m;
    diag_m *= cov;
    diag_m
}

use nalgebra::*;
use joint_gaussian::distr::*;
use joint_gaussian::calc;
use joint_gaussian::model;
use approx::{assert_relative_eq, assert_abs_diff_eq};

const EPS : f64 = 10E-8;

fn example() -> JointGaussian {
    let vars = ["x1", "x2", "x3"].iter().map(|v| v.to_string() );
    let mu = DVector::from_column_slice(&[1., -3., 4.]);
    let sigma = DMatrix::from_row_slice(3, 3, &[
        4., 2., -2.,
        2., 5., -5.,
        -2., -5., 8.
    ]);
    JointGaussian::new(vars, mu, sigma).unwrap()
}

fn names(vars : &[&str]) -> Vec<String> {
    vars.iter().map(|v| v.to_string() ).collect()
}

#[test]
fn construction() {
    let d = example();
    assert_eq!(d.variables(), &names(&["x1", "x2", "x3"])[..]);
    assert_eq!(d.dim(), 3);
    assert_eq!(d.mean(), &DVector::from_column_slice(&[1., -3., 4.]));
    assert_eq!(d.cov()[(1, 2)], -5.);
    assert_eq!(d.var(), DVector::from_column_slice(&[4., 5., 8.]));
    for n in 0..4 {
        let vars = (0..n).map(|i| format!("v{}", i) );
        let bad_mean = JointGaussian::new(vars.clone(), DVector::zeros(n + 1), DMatrix::identity(n, n));
        assert!(matches!(bad_mean, Err(GaussianError::Dimension { .. })));
        let bad_cov = JointGaussian::new(vars.clone(), DVector::zeros(n), DMatrix::identity(n, n + 1));
        assert!(matches!(bad_cov, Err(GaussianError::Dimension { .. })));
        assert!(JointGaussian::new(vars, DVector::zeros(n), DMatrix::identity(n, n)).is_ok());
    }
}

#[test]
fn precision() {
    let d = example();
    let prec = d.precision_matrix().unwrap().clone();
    assert_abs_diff_eq!(prec[(0, 1)], -0.125, epsilon = EPS);
    assert_abs_diff_eq!(prec[(0, 0)], 0.3125, epsilon = EPS);
    assert_abs_diff_eq!(prec[(2, 2)], 1. / 3., epsilon = EPS);
    assert_relative_eq!(&prec * d.cov(), DMatrix::identity(3, 3), epsilon = EPS);
    assert_eq!(d.precision_matrix().unwrap(), &prec);
}

#[test]
fn singular_precision() {
    let d = JointGaussian::from_slices(names(&["a", "b"]), &[0., 0.], &[1., 2., 2., 4.]).unwrap();
    assert_eq!(d.precision_matrix().unwrap_err(), GaussianError::SingularMatrix);
    assert!(!d.has_cached_precision());
}

#[test]
fn marginalize_inplace() {
    let mut d = example();
    d.precision_matrix().unwrap();
    d.marginalize(&names(&["x3"])).unwrap();
    assert_eq!(d.variables(), &names(&["x1", "x2"])[..]);
    assert_eq!(d.mean(), &DVector::from_column_slice(&[1., -3.]));
    assert_eq!(d.cov(), &DMatrix::from_row_slice(2, 2, &[4., 2., 2., 5.]));
    assert!(!d.has_cached_precision());
    let prec = d.precision_matrix().unwrap();
    assert_relative_eq!(prec * d.cov(), DMatrix::identity(2, 2), epsilon = EPS);
}

#[test]
fn marginal_keeps_original_order() {
    let d = example();
    let m = d.marginal(&names(&["x2", "x1"])).unwrap();
    assert_eq!(m.variables(), &names(&["x3"])[..]);
    let m = d.marginal(&names(&["x2"])).unwrap();
    assert_eq!(m.variables(), &names(&["x1", "x3"])[..]);
    assert_eq!(m.mean(), &DVector::from_column_slice(&[1., 4.]));
    assert_eq!(m.cov(), &DMatrix::from_row_slice(2, 2, &[4., -2., -2., 8.]));
    assert_eq!(m.cov(), &calc::select_principal_submatrix(d.cov(), &[0, 2]));

    // Receiver untouched
    assert_eq!(d, example());
}

#[test]
fn marginalize_nothing_and_everything() {
    let mut d = example();
    d.precision_matrix().unwrap();
    d.marginalize(&[]).unwrap();
    assert_eq!(d, example());
    assert!(!d.has_cached_precision());

    d.marginalize(&names(&["x3", "x1", "x2"])).unwrap();
    assert_eq!(d.dim(), 0);
    assert!(d.variables().is_empty());
    assert_eq!(d.mean().nrows(), 0);
    assert_eq!(d.cov().shape(), (0, 0));
    assert_eq!(d.precision_matrix().unwrap().shape(), (0, 0));
}

#[test]
fn marginal_leaves_cached_receiver_untouched() {
    let d = example();
    let prec = d.precision_matrix().unwrap().clone();
    let m = d.marginal(&names(&["x2"])).unwrap();
    assert!(!m.has_cached_precision());
    assert!(d.has_cached_precision());
    assert_eq!(d.precision_matrix().unwrap(), &prec);
    assert_eq!(d, example());
    assert_eq!(m.cov(), &DMatrix::from_row_slice(2, 2, &[4., -2., -2., 8.]));
}

#[test]
fn non_finite_distribution_is_not_saved() {
    let d = JointGaussian::from_slices(names(&["x"]), &[f64::INFINITY], &[1.]).unwrap();
    let name = format!("joint_gaussian_non_finite_{}.json", std::process::id());
    let path = std::env::temp_dir().join(name);
    let err = model::save_to_path(&d, &path).unwrap_err();
    assert!(matches!(err.downcast_ref::<GaussianError>(), Some(GaussianError::InvalidArgument(_))));
    assert!(!path.exists());
    assert!(serde_json::to_string(&d).is_err());
}

#[test]
fn serde_output_loads_as_document() {
    let d = example();
    let content = serde_json::to_string(&d).unwrap();
    assert_eq!(model::load(content.as_bytes()).unwrap(), d);
}

#[test]
fn unknown_variable() {
    let mut d = example();
    let err = d.marginalize(&names(&["x4"])).unwrap_err();
    assert!(matches!(err, GaussianError::UnknownVariable(_)));
    assert_eq!(d, example());
}

#[test]
fn copy_independence() {
    let mut d = example();
    let fresh = d.clone();
    assert!(!fresh.has_cached_precision());

    let prec = d.precision_matrix().unwrap().clone();
    let c = d.clone();
    assert_eq!(c, d);
    assert!(c.has_cached_precision());
    assert_eq!(c.precision_matrix().unwrap(), &prec);

    d.marginalize(&names(&["x1"])).unwrap();
    assert_eq!(c, example());
    assert_eq!(c.precision_matrix().unwrap(), &prec);
    assert_eq!(d.dim(), 2);
}

#[test]
fn correlation() {
    let d = example();
    let corr = d.corr();
    assert_relative_eq!(corr[(1, 2)], -5. / (5.0f64 * 8.0).sqrt(), epsilon = EPS);
    assert_relative_eq!(corr[(2, 2)], 1., epsilon = EPS);
}

#[test]
fn integer_identifiers() {
    let mut d = JointGaussian::from_slices(vec![10u32, 20, 30], &[0., 1., 2.], &[
        1., 0., 0.,
        0., 2., 0.,
        0., 0., 3.
    ]).unwrap();
    assert_eq!(d.index_of(&20), Some(1));
    d.marginalize(&[10]).unwrap();
    assert_eq!(d.variables(), &[20, 30]);
    assert_eq!(d.var(), DVector::from_column_slice(&[2., 3.]));
}

#[test]
fn json_file_roundtrip() {
    let d = example();
    let name = format!("joint_gaussian_roundtrip_{}.json", std::process::id());
    let path = std::env::temp_dir().join(name);
    model::save_to_path(&d, &path).unwrap();
    let loaded = model::load_from_path(&path).unwrap();
    assert_eq!(loaded, d);
    assert!(!loaded.has_cached_precision());
    std::fs::remove_file(&path).unwrap();
    assert!(model::load_from_path(&path).is_err());
}

#[test]
fn scalar_variables_in_document() {
    let doc = r#"{"multinormal" : {"variables" : "x1", "mean" : [1.0], "cov" : [[1.0]]}}"#;
    let err = model::load(doc.as_bytes()).unwrap_err();
    let cause = err.downcast_ref::<GaussianError>().unwrap();
    assert!(matches!(cause, GaussianError::InvalidArgument(_)));
}

#[test]
fn serde_roundtrip() {
    let d = example();
    d.precision_matrix().unwrap();
    let content = serde_json::to_string(&d).unwrap();
    let back : JointGaussian = serde_json::from_str(&content).unwrap();
    assert_eq!(back, d);
    assert!(!back.has_cached_precision());
}

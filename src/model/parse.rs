use nalgebra::*;
use serde_json::Value;
use crate::distr::GaussianError;

fn invalid(msg : String) -> GaussianError {
    GaussianError::InvalidArgument(msg)
}

fn parse_number(v : &Value, what : &str) -> Result<f64, GaussianError> {
    match v {
        Value::Number(n) => n.as_f64().ok_or_else(|| invalid(format!("Unable to parse {} as f64", what)) ),
        _ => Err(invalid(format!("{} is not a numeric value", what)))
    }
}

pub fn parse_vector(val : &Value) -> Result<DVector<f64>, GaussianError> {
    match val {
        Value::Array(arr_v) => {
            let mut vec = Vec::new();
            for (i, v) in arr_v.iter().enumerate() {
                vec.push(parse_number(v, &format!("{}-th entry in mean vector", i))?);
            }
            Ok(DVector::from_vec(vec))
        },
        _ => Err(invalid(format!("Entry should be a numeric array")))
    }
}

/// Parses a nested array (one inner array per row) into a matrix. An empty outer
/// array yields a 0x0 matrix; rows of unequal length are rejected.
pub fn parse_matrix(val : &Value) -> Result<DMatrix<f64>, GaussianError> {
    match val {
        Value::Array(val_rows) => {
            let mut mat_rows = Vec::new();
            for (i, r) in val_rows.iter().enumerate() {
                match r {
                    Value::Array(cv) => {
                        let mut row = Vec::new();
                        for (j, v) in cv.iter().enumerate() {
                            row.push(parse_number(v, &format!("{}-th x {}-th entry in the matrix", i, j))?);
                        }
                        mat_rows.push(RowDVector::from_vec(row));
                    },
                    _ => return Err(invalid(format!("{}-th row of matrix is not an array", i)))
                }
            }
            let row_len = match mat_rows.first() {
                Some(r) => r.len(),
                None => return Ok(DMatrix::zeros(0, 0))
            };
            for (i, r) in mat_rows.iter().enumerate() {
                if r.len() != row_len {
                    return Err(invalid(format!("{}th row has invalid length", i)));
                }
            }
            Ok(DMatrix::from_rows(&mat_rows[..]))
        },
        _ => Err(invalid(format!("Entry is not a nested numeric array")))
    }
}

/// Parses an array of variable names. A bare string is rejected instead of being
/// read as a single variable (or as a sequence of one-character names).
pub fn parse_variables(val : &Value) -> Result<Vec<String>, GaussianError> {
    match val {
        Value::Array(names) => {
            let mut vars = Vec::new();
            for (i, n) in names.iter().enumerate() {
                match n {
                    Value::String(s) => vars.push(s.clone()),
                    _ => return Err(invalid(format!("{}-th variable name is not a string", i)))
                }
            }
            Ok(vars)
        },
        Value::String(_) => Err(invalid(format!(
            "expected list or array-like of variable identifiers, got a scalar identifier"
        ))),
        _ => Err(invalid(format!("Variables entry should be an array of names")))
    }
}

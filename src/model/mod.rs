use serde_json::{self, Value};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::fmt::{self, Display};
use std::path::Path;
use std::str::FromStr;
use anyhow::{Context, Result};
use crate::distr::*;

/// Helpers that coerce untyped JSON values into names, vectors and matrices.
pub mod parse;

/// Key of the top-level node that holds a joint gaussian in a JSON document.
pub const NODE_KEY : &str = "multinormal";

/// Reads a joint gaussian from a JSON file at the informed path.
pub fn load_from_path<P>(path : P) -> Result<JointGaussian>
where
    P : AsRef<Path>
{
    let path = path.as_ref();
    let f = File::open(path)
        .with_context(|| format!("Unable to open distribution file {}", path.display()) )?;
    load(f)
}

/// Reads a joint gaussian from a JSON document of the form
/// {"multinormal" : {"variables" : [...], "mean" : [...], "cov" : [[...], ...]}}
pub fn load<R>(mut reader : R) -> Result<JointGaussian>
where
    R : Read
{
    let mut content = String::new();
    reader.read_to_string(&mut content).context("Unable to read distribution")?;
    let val : Value = serde_json::from_str(&content[..]).context("Distribution is not valid JSON")?;
    let distr = JointGaussian::<String>::try_from(val).context("Invalid multinormal node")?;
    log::debug!("Loaded distribution over {} variables", distr.dim());
    Ok(distr)
}

/// Writes the distribution as a JSON file at the informed path. The file is only
/// created once the distribution was converted to a document.
pub fn save_to_path<P>(distr : &JointGaussian, path : P) -> Result<()>
where
    P : AsRef<Path>
{
    let path = path.as_ref();
    let content = to_document(distr)?;
    let mut file = OpenOptions::new().write(true).create(true).truncate(true).open(path)
        .with_context(|| format!("Unable to create distribution file {}", path.display()) )?;
    file.write_all(content.as_bytes()).context("Unable to write distribution")?;
    Ok(())
}

pub fn save<W>(distr : &JointGaussian, mut writer : W) -> Result<()>
where
    W : Write
{
    let content = to_document(distr)?;
    writer.write_all(content.as_bytes()).context("Unable to write distribution")?;
    Ok(())
}

fn to_document(distr : &JointGaussian) -> Result<String> {
    let val = Value::try_from(distr).context("Unable to write distribution")?;
    Ok(serde_json::to_string_pretty(&val)?)
}

impl TryFrom<Value> for JointGaussian {

    type Error = GaussianError;

    fn try_from(val : Value) -> Result<Self, GaussianError> {
        let node = val.get(NODE_KEY).unwrap_or(&val);
        let missing = |name : &str| GaussianError::InvalidArgument(format!("Missing '{}' entry of multinormal node", name));
        let vars_val = node.get("variables").ok_or_else(|| missing("variables") )?;
        let mean_val = node.get("mean").ok_or_else(|| missing("mean") )?;
        let cov_val = node.get("cov").ok_or_else(|| missing("cov") )?;
        let variables = parse::parse_variables(vars_val)?;
        let mean = parse::parse_vector(mean_val)?;
        let cov = parse::parse_matrix(cov_val)?;
        JointGaussian::new(variables, mean, cov)
    }

}

impl<'a> TryFrom<&'a JointGaussian> for Value {

    type Error = GaussianError;

    fn try_from(distr : &'a JointGaussian) -> Result<Value, GaussianError> {
        distr.check_finite()?;
        serde_json::to_value(distr).map_err(|e| GaussianError::InvalidArgument(format!("{}", e)) )
    }

}

impl FromStr for JointGaussian {

    type Err = GaussianError;

    fn from_str(s : &str) -> Result<Self, Self::Err> {
        let v : Value = serde_json::from_str(s)
            .map_err(|e| GaussianError::InvalidArgument(format!("{}", e)) )?;
        Self::try_from(v)
    }

}

impl Display for JointGaussian {

    /// Writes the compact JSON document, or MNorm(n) when the distribution
    /// holds non-finite entries.
    fn fmt(&self, f : &mut fmt::Formatter<'_>) -> fmt::Result {
        match Value::try_from(self) {
            Ok(v) => write!(f, "{}", v),
            Err(_) => write!(f, "MNorm({})", self.dim())
        }
    }

}

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::model::params::{EnrichParams, MixBoundary};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read params file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid params file {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// Optional JSON parameter file; every key may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamsFile {
    pub top_fraction: Option<f64>,
    #[serde(default)]
    pub top_fraction_overrides: BTreeMap<String, f64>,
    pub ratio_threshold: Option<f64>,
    #[serde(default)]
    pub ratio_overrides: BTreeMap<String, f64>,
    pub sample_column: Option<String>,
    pub mix_boundary: Option<MixBoundary>,
}

/// Parameter values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliParams {
    pub top_fraction: Option<f64>,
    pub top_fraction_overrides: Vec<(String, f64)>,
    pub ratio_threshold: Option<f64>,
    pub ratio_overrides: Vec<(String, f64)>,
    pub sample_column: Option<String>,
    pub mix_boundary: Option<MixBoundary>,
}

pub fn load_params_file(path: &Path) -> Result<ParamsFile, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Defaults, then the params file, then the command line.
pub fn build_params(file: Option<ParamsFile>, cli: &CliParams) -> EnrichParams {
    let file = file.unwrap_or_default();
    let defaults = EnrichParams::default();

    let mut top_fraction_overrides = file.top_fraction_overrides;
    top_fraction_overrides.extend(cli.top_fraction_overrides.iter().cloned());
    let mut ratio_overrides = file.ratio_overrides;
    ratio_overrides.extend(cli.ratio_overrides.iter().cloned());

    EnrichParams {
        top_fraction: cli
            .top_fraction
            .or(file.top_fraction)
            .unwrap_or(defaults.top_fraction),
        top_fraction_overrides,
        ratio_threshold: cli
            .ratio_threshold
            .or(file.ratio_threshold)
            .unwrap_or(defaults.ratio_threshold),
        ratio_overrides,
        sample_column: cli.sample_column.clone().or(file.sample_column),
        mix_boundary: cli
            .mix_boundary
            .or(file.mix_boundary)
            .unwrap_or(defaults.mix_boundary),
    }
}

/// `CELLTYPE=VALUE`; the cell-type name may itself contain `=`.
pub fn parse_override(arg: &str) -> Result<(String, f64), String> {
    let (name, value) = arg
        .rsplit_once('=')
        .ok_or_else(|| format!("expected CELLTYPE=VALUE, got '{arg}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing cell type in '{arg}'"));
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid number in '{arg}'"))?;
    Ok((name.to_string(), value))
}

#[cfg(test)]
#[path = "../tests/src_inline/config.rs"]
mod tests;

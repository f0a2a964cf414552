use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TOP_FRACTION: f64 = 0.05;
pub const DEFAULT_RATIO_THRESHOLD: f64 = 1.1;

#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("top fraction for {scope} must be within [0, 1], got {value}")]
    TopFraction { scope: String, value: f64 },
    #[error("ratio threshold for {scope} must be finite and positive, got {value}")]
    RatioThreshold { scope: String, value: f64 },
}

/// Which ratio bound the Mix test compares against once the enrichment
/// test has failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixBoundary {
    /// Always the default ratio threshold, even when the leading cell type
    /// carries its own ratio override.
    #[default]
    DefaultRatio,
    /// The same per-type threshold the enrichment test used.
    EffectiveRatio,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichParams {
    pub top_fraction: f64,
    pub top_fraction_overrides: BTreeMap<String, f64>,
    pub ratio_threshold: f64,
    pub ratio_overrides: BTreeMap<String, f64>,
    pub sample_column: Option<String>,
    pub mix_boundary: MixBoundary,
}

impl Default for EnrichParams {
    fn default() -> Self {
        Self {
            top_fraction: DEFAULT_TOP_FRACTION,
            top_fraction_overrides: BTreeMap::new(),
            ratio_threshold: DEFAULT_RATIO_THRESHOLD,
            ratio_overrides: BTreeMap::new(),
            sample_column: None,
            mix_boundary: MixBoundary::DefaultRatio,
        }
    }
}

/// Per-type override if one is configured, else the default.
pub fn resolve(cell_type: &str, overrides: &BTreeMap<String, f64>, default: f64) -> f64 {
    overrides.get(cell_type).copied().unwrap_or(default)
}

/// Parameters resolved against a concrete list of cell types, indexed like
/// the table's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParams {
    pub top_fractions: Vec<f64>,
    pub ratio_thresholds: Vec<f64>,
    pub default_ratio: f64,
    pub mix_boundary: MixBoundary,
}

impl ResolvedParams {
    pub fn mix_bound(&self, cell_type: usize) -> f64 {
        match self.mix_boundary {
            MixBoundary::DefaultRatio => self.default_ratio,
            MixBoundary::EffectiveRatio => self.ratio_thresholds[cell_type],
        }
    }
}

impl EnrichParams {
    pub fn top_fraction_for(&self, cell_type: &str) -> f64 {
        resolve(cell_type, &self.top_fraction_overrides, self.top_fraction)
    }

    pub fn ratio_threshold_for(&self, cell_type: &str) -> f64 {
        resolve(cell_type, &self.ratio_overrides, self.ratio_threshold)
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        check_top_fraction("default", self.top_fraction)?;
        for (ct, &v) in &self.top_fraction_overrides {
            check_top_fraction(ct, v)?;
        }
        check_ratio("default", self.ratio_threshold)?;
        for (ct, &v) in &self.ratio_overrides {
            check_ratio(ct, v)?;
        }
        Ok(())
    }

    pub fn resolve_for(&self, cell_types: &[String]) -> ResolvedParams {
        ResolvedParams {
            top_fractions: cell_types
                .iter()
                .map(|ct| self.top_fraction_for(ct))
                .collect(),
            ratio_thresholds: cell_types
                .iter()
                .map(|ct| self.ratio_threshold_for(ct))
                .collect(),
            default_ratio: self.ratio_threshold,
            mix_boundary: self.mix_boundary,
        }
    }

    /// Override keys that name no cell type in `cell_types`.
    pub fn unmatched_overrides(&self, cell_types: &[String]) -> Vec<String> {
        let mut out = Vec::new();
        let keys = self
            .top_fraction_overrides
            .keys()
            .chain(self.ratio_overrides.keys());
        for key in keys {
            if !cell_types.iter().any(|ct| ct == key) && !out.contains(key) {
                out.push(key.clone());
            }
        }
        out
    }
}

fn check_top_fraction(scope: &str, value: f64) -> Result<(), ParamError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ParamError::TopFraction {
            scope: scope.to_string(),
            value,
        })
    }
}

fn check_ratio(scope: &str, value: f64) -> Result<(), ParamError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ParamError::RatioThreshold {
            scope: scope.to_string(),
            value,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/params.rs"]
mod tests;

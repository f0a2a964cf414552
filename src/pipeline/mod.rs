use thiserror::Error;

use crate::model::params::ParamError;

pub mod stage1_thresholds;
pub mod stage2_classify;
pub mod stage3_groups;
pub mod stage4_report;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Param(#[from] ParamError),
    #[error("sample column '{name}' not found in count table{}", found_hint(.found))]
    MissingSampleColumn { name: String, found: Option<String> },
    #[error("scope '{0}' has no spots")]
    EmptyScope(String),
}

fn found_hint(found: &Option<String>) -> String {
    match found {
        Some(other) => format!(" (table carries '{other}')"),
        None => String::new(),
    }
}

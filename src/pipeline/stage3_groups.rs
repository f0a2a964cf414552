use std::collections::HashMap;

use crate::model::labels::SpotLabel;
use crate::model::params::EnrichParams;
use crate::model::table::{CountSource, CountTable, RowSubset};
use crate::model::thresholds::ScopeThresholds;
use crate::pipeline::ClassifyError;
use crate::pipeline::stage1_thresholds::run_stage1;
use crate::pipeline::stage2_classify::run_stage2;

/// Labels for every spot of a table, in table row order.
#[derive(Debug, Clone)]
pub struct SpotCalls {
    pub barcodes: Vec<String>,
    pub cell_types: Vec<String>,
    pub labels: Vec<SpotLabel>,
    /// Sample column name and per-spot value, present only when grouping
    /// was requested.
    pub sample_column: Option<String>,
    pub groups: Option<Vec<String>>,
    pub scopes: Vec<ScopeThresholds>,
}

impl SpotCalls {
    pub fn label_name(&self, spot: usize) -> &str {
        self.labels[spot].name(&self.cell_types)
    }

    pub fn n_spots(&self) -> usize {
        self.labels.len()
    }
}

/// Distinct group values in first-seen order, each with its table rows.
pub fn partition_rows(values: &[String]) -> Vec<(String, Vec<usize>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<(String, Vec<usize>)> = Vec::new();

    for (row, value) in values.iter().enumerate() {
        match index.get(value.as_str()) {
            Some(&slot) => out[slot].1.push(row),
            None => {
                index.insert(value.as_str(), out.len());
                out.push((value.clone(), vec![row]));
            }
        }
    }

    out
}

pub fn classify_spots(
    table: &CountTable,
    params: &EnrichParams,
) -> Result<SpotCalls, ClassifyError> {
    params.validate()?;

    let cell_types = table.cell_types().to_vec();
    for key in params.unmatched_overrides(&cell_types) {
        tracing::warn!("override for unknown cell type '{}' ignored", key);
    }
    let resolved = params.resolve_for(&cell_types);

    let mut labels = vec![SpotLabel::Unknown; table.n_spots()];
    let mut scopes = Vec::new();

    let groups = match params.sample_column.as_deref() {
        None => {
            let thresholds = run_stage1(table, &resolved, "all")?;
            labels = run_stage2(table, &thresholds, &resolved);
            scopes.push(ScopeThresholds {
                group: None,
                n_spots: table.n_spots(),
                map: thresholds,
            });
            None
        }
        Some(name) => {
            let column = match table.group() {
                Some(group) if group.name == name => group,
                other => {
                    return Err(ClassifyError::MissingSampleColumn {
                        name: name.to_string(),
                        found: other.map(|g| g.name.clone()),
                    });
                }
            };

            for (group, rows) in partition_rows(&column.values) {
                let subset = RowSubset::new(table, &rows);
                let thresholds = run_stage1(&subset, &resolved, &group)?;
                let group_labels = run_stage2(&subset, &thresholds, &resolved);
                for (local, label) in group_labels.into_iter().enumerate() {
                    labels[subset.rows()[local]] = label;
                }
                tracing::debug!("group {}: {} spots classified", group, rows.len());
                scopes.push(ScopeThresholds {
                    group: Some(group),
                    n_spots: rows.len(),
                    map: thresholds,
                });
            }
            Some(column.values.clone())
        }
    };

    Ok(SpotCalls {
        barcodes: table.spots().to_vec(),
        cell_types,
        labels,
        sample_column: groups.as_ref().and(params.sample_column.clone()),
        groups,
        scopes,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_groups.rs"]
mod tests;

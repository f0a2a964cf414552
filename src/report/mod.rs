use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::labels::{SpotLabel, label_order};
use crate::model::params::{EnrichParams, MixBoundary};
use crate::pipeline::stage3_groups::SpotCalls;

pub mod json;
pub mod text;

#[derive(Debug, Clone, Serialize)]
pub struct LabelStat {
    pub label: String,
    pub count: usize,
    pub fraction: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub group: String,
    pub n_spots: usize,
    pub thresholds: BTreeMap<String, f64>,
    pub labels: Vec<LabelStat>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputSummary {
    pub path: String,
    pub n_spots: usize,
    pub n_cell_types: usize,
    pub cell_types: Vec<String>,
    pub sample_column: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParamsSummary {
    pub top_fraction: f64,
    pub top_fraction_overrides: BTreeMap<String, f64>,
    pub ratio_threshold: f64,
    pub ratio_overrides: BTreeMap<String, f64>,
    pub mix_boundary: MixBoundary,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool: String,
    pub version: String,
    pub input: InputSummary,
    pub params: ParamsSummary,
    pub labels: Vec<LabelStat>,
    pub enriched_fraction: f64,
    pub groups: Vec<GroupSummary>,
}

pub fn build_summary(
    calls: &SpotCalls,
    params: &EnrichParams,
    input_path: &str,
) -> SummaryData {
    let all = (0..calls.n_spots()).collect::<Vec<_>>();
    let labels = label_stats(calls, &all);
    let enriched = calls
        .labels
        .iter()
        .filter(|l| matches!(l, SpotLabel::Enriched(_)))
        .count();

    let mut groups = Vec::with_capacity(calls.scopes.len());
    for scope in &calls.scopes {
        let rows = match (&scope.group, &calls.groups) {
            (Some(name), Some(values)) => (0..calls.n_spots())
                .filter(|&i| &values[i] == name)
                .collect::<Vec<_>>(),
            _ => all.clone(),
        };
        let thresholds = calls
            .cell_types
            .iter()
            .cloned()
            .zip(scope.map.thresholds.iter().copied())
            .collect();
        groups.push(GroupSummary {
            group: scope.scope_name().to_string(),
            n_spots: scope.n_spots,
            thresholds,
            labels: label_stats(calls, &rows),
        });
    }

    SummaryData {
        tool: "kira-spotenrich".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        input: InputSummary {
            path: input_path.to_string(),
            n_spots: calls.n_spots(),
            n_cell_types: calls.cell_types.len(),
            cell_types: calls.cell_types.clone(),
            sample_column: calls.sample_column.clone(),
        },
        params: ParamsSummary {
            top_fraction: params.top_fraction,
            top_fraction_overrides: params.top_fraction_overrides.clone(),
            ratio_threshold: params.ratio_threshold,
            ratio_overrides: params.ratio_overrides.clone(),
            mix_boundary: params.mix_boundary,
        },
        labels,
        enriched_fraction: fraction(enriched, calls.n_spots()),
        groups,
    }
}

/// Count of each possible label over `rows`, in report order.
pub fn label_stats(calls: &SpotCalls, rows: &[usize]) -> Vec<LabelStat> {
    let order = label_order(calls.cell_types.len());
    let mut counts = vec![0usize; order.len()];
    for &row in rows {
        let slot = match calls.labels[row] {
            SpotLabel::Enriched(idx) => idx,
            SpotLabel::Mix => order.len() - 2,
            SpotLabel::Unknown => order.len() - 1,
        };
        counts[slot] += 1;
    }

    order
        .iter()
        .zip(counts)
        .map(|(label, count)| LabelStat {
            label: label.name(&calls.cell_types).to_string(),
            count,
            fraction: fraction(count, rows.len()),
        })
        .collect()
}

fn fraction(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;

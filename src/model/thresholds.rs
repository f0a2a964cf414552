/// Per-cell-type enrichment thresholds for one scope, indexed like the
/// table's cell types.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdMap {
    pub top_fractions: Vec<f64>,
    pub thresholds: Vec<f64>,
}

impl ThresholdMap {
    pub fn get(&self, cell_type: usize) -> f64 {
        self.thresholds[cell_type]
    }
}

/// Thresholds of one scope: a sample group, or the whole table when `group`
/// is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeThresholds {
    pub group: Option<String>,
    pub n_spots: usize,
    pub map: ThresholdMap,
}

impl ScopeThresholds {
    pub fn scope_name(&self) -> &str {
        self.group.as_deref().unwrap_or("all")
    }
}

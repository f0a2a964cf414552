pub const MIX_LABEL: &str = "Mix";
pub const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpotLabel {
    /// Index into the table's cell types.
    Enriched(usize),
    Mix,
    Unknown,
}

impl SpotLabel {
    pub fn name<'a>(&self, cell_types: &'a [String]) -> &'a str {
        match self {
            SpotLabel::Enriched(idx) => cell_types[*idx].as_str(),
            SpotLabel::Mix => MIX_LABEL,
            SpotLabel::Unknown => UNKNOWN_LABEL,
        }
    }
}

/// Every label a table with these cell types can produce, in report order.
pub fn label_order(n_cell_types: usize) -> Vec<SpotLabel> {
    let mut out = (0..n_cell_types)
        .map(SpotLabel::Enriched)
        .collect::<Vec<_>>();
    out.push(SpotLabel::Mix);
    out.push(SpotLabel::Unknown);
    out
}

use crate::report::{LabelStat, SummaryData};
use crate::stats::format_f64_6;

pub fn render_report_text(data: &SummaryData) -> String {
    let mut out = String::new();

    out.push_str("Spot Cell-Type Enrichment Report\n");
    out.push_str("================================\n\n");

    out.push_str("1. Input\n");
    out.push_str(&format!("Table: {}\n", data.input.path));
    out.push_str(&format!("Spots: {}\n", data.input.n_spots));
    out.push_str(&format!("Cell types: {}\n", data.input.n_cell_types));
    out.push_str(&format!(
        "Sample column: {}\n\n",
        data.input.sample_column.as_deref().unwrap_or("none")
    ));

    out.push_str("2. Parameters\n");
    out.push_str(&format!(
        "Top fraction: {}\n",
        format_f64_6(data.params.top_fraction)
    ));
    for (ct, v) in &data.params.top_fraction_overrides {
        out.push_str(&format!("  {}: {}\n", ct, format_f64_6(*v)));
    }
    out.push_str(&format!(
        "Ratio threshold: {}\n",
        format_f64_6(data.params.ratio_threshold)
    ));
    for (ct, v) in &data.params.ratio_overrides {
        out.push_str(&format!("  {}: {}\n", ct, format_f64_6(*v)));
    }
    out.push_str(&format!(
        "Mix boundary: {:?}\n\n",
        data.params.mix_boundary
    ));

    out.push_str("3. Labels\n");
    push_labels(&mut out, &data.labels);
    out.push_str(&format!(
        "Enriched fraction: {}\n\n",
        format_f64_6(data.enriched_fraction)
    ));

    if data.input.sample_column.is_some() {
        out.push_str("4. Per sample\n");
        for group in &data.groups {
            out.push_str(&format!("[{}] spots={}\n", group.group, group.n_spots));
            push_labels(&mut out, &group.labels);
        }
    }

    out
}

fn push_labels(out: &mut String, labels: &[LabelStat]) {
    for stat in labels.iter().filter(|s| s.count > 0) {
        out.push_str(&format!(
            "  {}: {} ({})\n",
            stat.label,
            stat.count,
            format_f64_6(stat.fraction)
        ));
    }
}

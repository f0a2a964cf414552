use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::model::params::EnrichParams;
use crate::pipeline::stage3_groups::SpotCalls;
use crate::report::json::render_summary_json;
use crate::report::text::render_report_text;
use crate::report::{SummaryData, build_summary};
use crate::stats::format_f64_6;

pub const LABELS_FILE: &str = "spot_labels.tsv";
pub const THRESHOLDS_FILE: &str = "thresholds.tsv";
pub const SUMMARY_FILE: &str = "summary.json";
pub const REPORT_FILE: &str = "report.txt";

#[derive(Debug, Clone)]
pub struct Stage4Input<'a> {
    pub calls: &'a SpotCalls,
    pub params: &'a EnrichParams,
    pub input_path: String,
}

pub fn write_reports(input: &Stage4Input<'_>, out_dir: &Path) -> std::io::Result<SummaryData> {
    fs::create_dir_all(out_dir)?;

    let labels_path = out_dir.join(LABELS_FILE);
    write_labels_tsv(input.calls, &labels_path)?;

    let thresholds_path = out_dir.join(THRESHOLDS_FILE);
    write_thresholds_tsv(input.calls, &thresholds_path)?;

    let summary = build_summary(input.calls, input.params, &input.input_path);
    let json = render_summary_json(&summary)?;
    write_text(&out_dir.join(SUMMARY_FILE), &json)?;

    let report = render_report_text(&summary);
    write_text(&out_dir.join(REPORT_FILE), &report)?;

    tracing::info!("reports written to {}", out_dir.display());
    Ok(summary)
}

fn write_labels_tsv(calls: &SpotCalls, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);

    let mut header = vec!["barcode", "Celltype"];
    if let Some(name) = calls.sample_column.as_deref() {
        header.push(name);
    }
    writeln!(w, "{}", header.join("\t"))?;

    for spot in 0..calls.n_spots() {
        let barcode = &calls.barcodes[spot];
        let label = calls.label_name(spot);
        match &calls.groups {
            Some(groups) => writeln!(w, "{}\t{}\t{}", barcode, label, groups[spot])?,
            None => writeln!(w, "{}\t{}", barcode, label)?,
        }
    }

    w.flush()
}

fn write_thresholds_tsv(calls: &SpotCalls, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "group\tcell_type\ttop_fraction\tthreshold")?;

    for scope in &calls.scopes {
        for (idx, ct) in calls.cell_types.iter().enumerate() {
            writeln!(
                w,
                "{}\t{}\t{}\t{}",
                scope.scope_name(),
                ct,
                format_f64_6(scope.map.top_fractions[idx]),
                format_f64_6(scope.map.get(idx))
            )?;
        }
    }

    w.flush()
}

fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_report.rs"]
mod tests;

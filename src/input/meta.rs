use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::input::InputError;
use crate::input::reader::{delimited_reader, delimiter_for, is_blank, open_maybe_gz, record_line};

/// Per-spot metadata keyed by barcode, columns as in the file header minus
/// the barcode column.
#[derive(Debug, Clone)]
pub struct SpotMeta {
    pub columns: Vec<String>,
    pub rows: HashMap<String, Vec<String>>,
}

impl SpotMeta {
    /// Values of `column` aligned to `barcodes`. `Ok(None)` when the column
    /// does not exist. A barcode with no metadata row, or with a blank value
    /// in the column, is an error.
    pub fn column_for(
        &self,
        column: &str,
        barcodes: &[String],
    ) -> Result<Option<Vec<String>>, InputError> {
        let Some(idx) = self.columns.iter().position(|c| c == column) else {
            return Ok(None);
        };
        let mut out = Vec::with_capacity(barcodes.len());
        for bc in barcodes {
            let row = self.rows.get(bc).ok_or_else(|| {
                InputError::MissingInput(format!("no metadata row for barcode {bc}"))
            })?;
            match row.get(idx).filter(|v| !v.is_empty()) {
                Some(value) => out.push(value.clone()),
                None => {
                    return Err(InputError::Parse(format!(
                        "empty '{column}' value in metadata for barcode {bc}"
                    )));
                }
            }
        }
        Ok(Some(out))
    }
}

pub fn load_meta(path: &Path) -> Result<SpotMeta, InputError> {
    let reader = open_maybe_gz(path)?;
    parse_meta(reader, delimiter_for(path))
}

pub fn parse_meta<R: Read>(reader: R, delimiter: u8) -> Result<SpotMeta, InputError> {
    let mut records = delimited_reader(reader, delimiter).into_records();

    let header_cols = match records.next() {
        Some(record) => record?.iter().map(str::to_string).collect::<Vec<_>>(),
        None => return Err(InputError::Parse("meta file is empty".to_string())),
    };

    let mut barcode_col = 0usize;
    for (idx, name) in header_cols.iter().enumerate() {
        let lower = name.to_ascii_lowercase();
        if lower == "barcode" || lower == "barcodes" {
            barcode_col = idx;
            break;
        }
    }

    let columns = header_cols
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != barcode_col)
        .map(|(_, name)| name.clone())
        .collect::<Vec<_>>();

    let mut rows: HashMap<String, Vec<String>> = HashMap::new();

    for record in records {
        let record = record?;
        if is_blank(&record) {
            continue;
        }
        let line_no = record_line(&record);
        let Some(barcode) = record.get(barcode_col).filter(|b| !b.is_empty()) else {
            tracing::warn!("meta line {} has no barcode; skipping", line_no);
            continue;
        };
        if rows.contains_key(barcode) {
            tracing::warn!(
                "duplicate barcode in metadata; keeping first (line {}, barcode {})",
                line_no,
                barcode
            );
            continue;
        }

        let row = (0..header_cols.len())
            .filter(|&idx| idx != barcode_col)
            .map(|idx| record.get(idx).unwrap_or_default().to_string())
            .collect::<Vec<_>>();
        rows.insert(barcode.to_string(), row);
    }

    Ok(SpotMeta { columns, rows })
}

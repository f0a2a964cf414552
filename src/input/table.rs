use std::io::Read;

use crate::input::InputError;
use crate::input::reader::{delimited_reader, is_blank, record_line};
use crate::model::table::CountTable;

/// Parses a delimited count table: first column spot identifier, remaining
/// columns cell types, plus `sample_column` read as strings when the header
/// carries it.
pub fn parse_count_table<R: Read>(
    reader: R,
    delimiter: u8,
    sample_column: Option<&str>,
) -> Result<CountTable, InputError> {
    let mut records = delimited_reader(reader, delimiter).into_records();

    let header = match records.next() {
        Some(record) => record?,
        None => return Err(InputError::Parse("count table is empty".to_string())),
    };
    let header = header.iter().map(str::to_string).collect::<Vec<_>>();
    if header.len() < 2 {
        return Err(InputError::Parse(
            "count table header has no cell-type columns".to_string(),
        ));
    }

    let group_col = sample_column.and_then(|name| header.iter().skip(1).position(|h| h == name));
    let cell_types = header
        .iter()
        .skip(1)
        .enumerate()
        .filter(|(idx, _)| Some(*idx) != group_col)
        .map(|(_, name)| name.clone())
        .collect::<Vec<_>>();

    let mut spots = Vec::new();
    let mut rows = Vec::new();
    let mut groups = Vec::new();

    for record in records {
        let record = record?;
        if is_blank(&record) {
            continue;
        }
        let line_no = record_line(&record);
        if record.len() != header.len() {
            return Err(InputError::Parse(format!(
                "line {} has {} fields, header has {}",
                line_no,
                record.len(),
                header.len()
            )));
        }

        let mut row = Vec::with_capacity(cell_types.len());
        for (idx, field) in record.iter().skip(1).enumerate() {
            if Some(idx) == group_col {
                groups.push(field.to_string());
                continue;
            }
            let value = field.parse::<f64>().map_err(|_| InputError::InvalidCount {
                line: line_no,
                column: header[idx + 1].clone(),
                value: field.to_string(),
            })?;
            row.push(value);
        }
        spots.push(record[0].to_string());
        rows.push(row);
    }

    let table = CountTable::new(spots, cell_types, rows)?;
    match (group_col, sample_column) {
        (Some(_), Some(name)) => Ok(table.with_group(name, groups)?),
        _ => Ok(table),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/table.rs"]
mod tests;

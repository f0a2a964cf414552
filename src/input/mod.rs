use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod meta;
pub mod reader;
pub mod table;

use crate::model::table::{CountSource, CountTable, TableError};
use meta::load_meta;
use reader::{delimiter_for, open_maybe_gz};
use table::parse_count_table;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("malformed delimited input: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid count '{value}' at line {line}, column {column}")]
    InvalidCount {
        line: usize,
        column: String,
        value: String,
    },
    #[error("invalid count table: {0}")]
    Table(#[from] TableError),
}

#[derive(Debug, Clone)]
pub struct InputPaths {
    pub table: PathBuf,
    pub meta: Option<PathBuf>,
}

/// Loads the count table and, when `sample_column` is requested but not in
/// the table itself, joins it from the metadata file by barcode.
pub fn load_input(
    paths: &InputPaths,
    sample_column: Option<&str>,
) -> Result<CountTable, InputError> {
    let table = load_count_table(&paths.table, sample_column)?;
    tracing::info!(
        "loaded count table {}: {} spots x {} cell types",
        paths.table.display(),
        table.n_spots(),
        table.cell_types().len()
    );

    let Some(name) = sample_column else {
        return Ok(table);
    };
    if table.group().is_some() {
        return Ok(table);
    }
    let Some(meta_path) = paths.meta.as_deref() else {
        return Ok(table);
    };

    let meta = load_meta(meta_path)?;
    tracing::info!(
        "loaded metadata {}: {} barcodes",
        meta_path.display(),
        meta.rows.len()
    );
    match meta.column_for(name, table.spots())? {
        Some(values) => Ok(table.with_group(name, values)?),
        None => {
            tracing::warn!(
                "sample column '{}' not present in {}",
                name,
                meta_path.display()
            );
            Ok(table)
        }
    }
}

pub fn load_count_table(
    path: &Path,
    sample_column: Option<&str>,
) -> Result<CountTable, InputError> {
    let reader = open_maybe_gz(path)?;
    parse_count_table(reader, delimiter_for(path), sample_column)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;

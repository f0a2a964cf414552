use std::collections::HashSet;

use thiserror::Error;

use crate::model::labels::{MIX_LABEL, UNKNOWN_LABEL};

#[derive(Debug, Error)]
pub enum TableError {
    #[error("count table has no spots")]
    Empty,
    #[error("count table needs at least two cell-type columns, found {0}")]
    TooFewCellTypes(usize),
    #[error("duplicate spot identifier: {0}")]
    DuplicateSpot(String),
    #[error("duplicate cell-type column: {0}")]
    DuplicateCellType(String),
    #[error("cell-type column '{0}' has the name of a non-enriched label")]
    ReservedLabel(String),
    #[error("{actual} count rows for {expected} spots")]
    RowCount { expected: usize, actual: usize },
    #[error("spot {spot} has {actual} counts, expected {expected}")]
    RowWidth {
        spot: String,
        expected: usize,
        actual: usize,
    },
    #[error("invalid count {value} for spot {spot}, cell type {cell_type}")]
    InvalidCount {
        spot: String,
        cell_type: String,
        value: f64,
    },
    #[error("group column '{name}' has {actual} values, expected {expected}")]
    GroupLength {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("group column '{0}' collides with a cell-type column")]
    GroupIsCellType(String),
}

/// String-valued sample/group column carried next to the counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupColumn {
    pub name: String,
    pub values: Vec<String>,
}

/// Spots x cell types, row-major. Every count is finite and non-negative.
#[derive(Debug, Clone)]
pub struct CountTable {
    spots: Vec<String>,
    cell_types: Vec<String>,
    counts: Vec<f64>,
    group: Option<GroupColumn>,
}

impl CountTable {
    pub fn new(
        spots: Vec<String>,
        cell_types: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, TableError> {
        if cell_types.len() < 2 {
            return Err(TableError::TooFewCellTypes(cell_types.len()));
        }
        if spots.is_empty() {
            return Err(TableError::Empty);
        }

        let mut seen = HashSet::with_capacity(cell_types.len());
        for ct in &cell_types {
            if ct == MIX_LABEL || ct == UNKNOWN_LABEL {
                return Err(TableError::ReservedLabel(ct.clone()));
            }
            if !seen.insert(ct.as_str()) {
                return Err(TableError::DuplicateCellType(ct.clone()));
            }
        }

        let mut seen = HashSet::with_capacity(spots.len());
        for spot in &spots {
            if !seen.insert(spot.as_str()) {
                return Err(TableError::DuplicateSpot(spot.clone()));
            }
        }

        if rows.len() != spots.len() {
            return Err(TableError::RowCount {
                expected: spots.len(),
                actual: rows.len(),
            });
        }

        let n_types = cell_types.len();
        let mut counts = Vec::with_capacity(spots.len() * n_types);
        for (spot_idx, row) in rows.iter().enumerate() {
            let spot = &spots[spot_idx];
            if row.len() != n_types {
                return Err(TableError::RowWidth {
                    spot: spot.to_string(),
                    expected: n_types,
                    actual: row.len(),
                });
            }
            for (ct_idx, &value) in row.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(TableError::InvalidCount {
                        spot: spot.to_string(),
                        cell_type: cell_types[ct_idx].clone(),
                        value,
                    });
                }
            }
            counts.extend_from_slice(row);
        }

        Ok(Self {
            spots,
            cell_types,
            counts,
            group: None,
        })
    }

    pub fn with_group(mut self, name: &str, values: Vec<String>) -> Result<Self, TableError> {
        if values.len() != self.spots.len() {
            return Err(TableError::GroupLength {
                name: name.to_string(),
                expected: self.spots.len(),
                actual: values.len(),
            });
        }
        if self.cell_types.iter().any(|ct| ct == name) {
            return Err(TableError::GroupIsCellType(name.to_string()));
        }
        self.group = Some(GroupColumn {
            name: name.to_string(),
            values,
        });
        Ok(self)
    }

    pub fn spots(&self) -> &[String] {
        &self.spots
    }

    pub fn group(&self) -> Option<&GroupColumn> {
        self.group.as_ref()
    }
}

/// Read access shared by the full table and by row subsets of it, so
/// thresholds and calls are computed identically for a group and for the
/// whole table.
pub trait CountSource {
    fn n_spots(&self) -> usize;
    fn cell_types(&self) -> &[String];
    fn row(&self, spot: usize) -> &[f64];

    fn column(&self, cell_type: usize) -> Vec<f64> {
        (0..self.n_spots())
            .map(|spot| self.row(spot)[cell_type])
            .collect()
    }
}

impl CountSource for CountTable {
    fn n_spots(&self) -> usize {
        self.spots.len()
    }

    fn cell_types(&self) -> &[String] {
        &self.cell_types
    }

    fn row(&self, spot: usize) -> &[f64] {
        let n = self.cell_types.len();
        &self.counts[spot * n..(spot + 1) * n]
    }
}

/// A subset of table rows, addressed by local index `0..rows.len()`.
#[derive(Debug, Clone, Copy)]
pub struct RowSubset<'a> {
    table: &'a CountTable,
    rows: &'a [usize],
}

impl<'a> RowSubset<'a> {
    pub fn new(table: &'a CountTable, rows: &'a [usize]) -> Self {
        Self { table, rows }
    }

    /// Table row index of each local row.
    pub fn rows(&self) -> &'a [usize] {
        self.rows
    }
}

impl CountSource for RowSubset<'_> {
    fn n_spots(&self) -> usize {
        self.rows.len()
    }

    fn cell_types(&self) -> &[String] {
        self.table.cell_types()
    }

    fn row(&self, spot: usize) -> &[f64] {
        self.table.row(self.rows[spot])
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/table.rs"]
mod tests;

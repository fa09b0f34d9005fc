// src/table.rs

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A table grid as delivered by the table-detection step.
///
/// Row 0 holds the column-header candidates and column 0 holds the row
/// labels; everything else is data. Cells are `None` where detection found
/// nothing. The grid is always rectangular: `new` (and deserialization)
/// reject ragged input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Option<String>>>", into = "Vec<Vec<Option<String>>>")]
pub struct RawTable {
    pub(crate) cells: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(cells: Vec<Vec<Option<String>>>) -> Result<Self> {
        let expected = cells.first().map(Vec::len).unwrap_or(0);
        for (row, r) in cells.iter().enumerate() {
            if r.len() != expected {
                return Err(Error::MalformedGrid {
                    row,
                    got: r.len(),
                    expected,
                });
            }
        }
        Ok(RawTable { cells })
    }

    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    pub fn column_count(&self) -> usize {
        self.cells.first().map(Vec::len).unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.cells.get(row)?.get(col)?.as_deref()
    }

    /// Promote row 0 to column headers, dropping it from the data rows.
    ///
    /// Running this twice would silently discard a real data row, so the
    /// result is a distinct type with no promotion of its own: the transform
    /// can only happen once per table. The raw table is left untouched
    /// (cloned internally), so in-progress edits to it are unaffected.
    pub fn promote_header(&self) -> PromotedTable {
        let mut rows = self.cells.clone();
        let columns = if rows.is_empty() {
            Vec::new()
        } else {
            rows.remove(0)
        };
        PromotedTable { columns, rows }
    }
}

impl TryFrom<Vec<Vec<Option<String>>>> for RawTable {
    type Error = Error;

    fn try_from(cells: Vec<Vec<Option<String>>>) -> Result<Self> {
        RawTable::new(cells)
    }
}

impl From<RawTable> for Vec<Vec<Option<String>>> {
    fn from(table: RawTable) -> Self {
        table.cells
    }
}

/// A table whose first row has been promoted to column names.
///
/// Only ever produced by [`RawTable::promote_header`], immediately before
/// key-value assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotedTable {
    pub(crate) columns: Vec<Option<String>>,
    pub(crate) rows: Vec<Vec<Option<String>>>,
}

impl PromotedTable {
    pub fn columns(&self) -> &[Option<String>] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }
}

/// Map every absent cell and every literal `"None"` (an OCR artifact meaning
/// empty) to `""`, so the grids render and edit cleanly downstream.
pub fn clean_up(tables: &[RawTable]) -> Vec<RawTable> {
    tables
        .iter()
        .map(|table| {
            let cells = table
                .cells
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| match cell.as_deref() {
                            None | Some("None") => Some(String::new()),
                            Some(text) => Some(text.to_string()),
                        })
                        .collect()
                })
                .collect();
            RawTable { cells }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn rejects_ragged_grid() {
        let err = RawTable::new(vec![vec![cell("a"), cell("b")], vec![cell("c")]]);
        assert!(matches!(
            err,
            Err(Error::MalformedGrid {
                row: 1,
                got: 1,
                expected: 2
            })
        ));
    }

    #[test]
    fn promote_header_moves_first_row_to_columns() {
        let table = RawTable::new(vec![
            vec![cell(""), cell("0-11m")],
            vec![cell("BCG"), cell("74")],
        ])
        .unwrap();

        let promoted = table.promote_header();
        assert_eq!(promoted.columns(), &[cell(""), cell("0-11m")]);
        assert_eq!(promoted.rows(), &[vec![cell("BCG"), cell("74")]]);
        // the raw table is untouched
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn promote_header_on_empty_table() {
        let table = RawTable::new(vec![]).unwrap();
        let promoted = table.promote_header();
        assert!(promoted.columns().is_empty());
        assert!(promoted.rows().is_empty());
    }

    #[test]
    fn clean_up_replaces_none_artifacts() {
        let table = RawTable::new(vec![vec![None, cell("None"), cell("12")]]).unwrap();
        let cleaned = clean_up(&[table]);
        assert_eq!(
            cleaned[0].cells[0],
            vec![cell(""), cell(""), cell("12")]
        );
    }

    #[test]
    fn deserializes_grid_json() {
        let table: RawTable =
            serde_json::from_str(r#"[["", "0-11m"], ["BCG", null]]"#).unwrap();
        assert_eq!(table.cell(0, 1), Some("0-11m"));
        assert_eq!(table.cell(1, 1), None);

        let ragged: std::result::Result<RawTable, _> =
            serde_json::from_str(r#"[["a", "b"], ["c"]]"#);
        assert!(ragged.is_err());
    }
}

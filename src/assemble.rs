// src/assemble.rs

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::metadata::FieldIds;
use crate::table::PromotedTable;

/// One value keyed the way the reporting system expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataValue {
    pub data_element: String,
    pub category_option_combo: String,
    pub value: String,
}

/// The submission envelope around the assembled values.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataValueSet {
    pub data_set: String,
    pub period: String,
    pub org_unit: String,
    pub data_values: Vec<DataValue>,
}

/// Walk a header-promoted table row-major and emit one [`DataValue`] per
/// non-empty cell, resolving `"{rowLabel} {columnLabel}"` through the field
/// index.
///
/// Cells that are absent, `""`, `"-"` or the literal `"None"` are skipped. A
/// composite key missing from the index aborts the whole table with
/// [`Error::UnresolvedLabel`] — a partially-assembled payload must never be
/// submitted, and the error names the exact label so a human can correct the
/// row or column text and retry. Labels here are exact keys, not fuzzy
/// matches; reconciliation already normalized them.
pub fn assemble(
    table: &PromotedTable,
    field_index: &HashMap<String, FieldIds>,
) -> Result<Vec<DataValue>> {
    let mut values = Vec::new();

    for row in table.rows() {
        let row_label = row.first().and_then(|c| c.as_deref()).unwrap_or("");
        for (col, cell) in row.iter().enumerate().skip(1) {
            let value = match cell.as_deref() {
                None | Some("") | Some("-") | Some("None") => continue,
                Some(v) => v,
            };
            let col_label = table
                .columns()
                .get(col)
                .and_then(|c| c.as_deref())
                .unwrap_or("");
            let key = format!("{} {}", row_label, col_label);
            let ids = field_index
                .get(&key)
                .ok_or_else(|| Error::UnresolvedLabel { label: key })?;
            values.push(DataValue {
                data_element: ids.data_element.clone(),
                category_option_combo: ids.category_option_combo.clone(),
                value: value.to_string(),
            });
        }
    }

    Ok(values)
}

// src/metadata.rs
//
// The reporting system describes a data set's entry form as groups of
// fields. Each field carries the composite label a filled-in tally sheet
// shows ("BCG 0-11m"), the two identifiers a submission needs, and the
// constituent display names the reconciler matches against.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

/// Nested form description returned by the metadata provider.
#[derive(Debug, Clone, Deserialize)]
pub struct FormDescription {
    pub groups: Vec<FormGroup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormGroup {
    #[serde(default)]
    pub label: Option<String>,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    /// Composite label, `"{dataElementName} {categoryOptionComboName}"`.
    pub label: String,
    pub data_element: String,
    pub category_option_combo: String,
    pub data_element_name: String,
    pub category_option_combo_name: String,
}

/// The identifier pair a resolved cell submits under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIds {
    pub data_element: String,
    pub category_option_combo: String,
}

/// Index every field by its exact composite label. Labels are expected to be
/// unique within a form; if they are not, the last field wins.
pub fn build_index(form: &FormDescription) -> HashMap<String, FieldIds> {
    let mut index = HashMap::new();
    for group in &form.groups {
        for field in &group.fields {
            index.insert(
                field.label.clone(),
                FieldIds {
                    data_element: field.data_element.clone(),
                    category_option_combo: field.category_option_combo.clone(),
                },
            );
        }
    }
    index
}

/// Collect the row vocabulary (distinct data-element names) and the column
/// vocabulary (distinct category-option names), each in order of first
/// appearance. These are the reconciler's reference vocabularies.
pub fn build_vocabularies(form: &FormDescription) -> (Vec<String>, Vec<String>) {
    let mut row_vocab = Vec::new();
    let mut col_vocab = Vec::new();
    let mut seen_rows = HashSet::new();
    let mut seen_cols = HashSet::new();

    for group in &form.groups {
        for field in &group.fields {
            if seen_rows.insert(field.data_element_name.clone()) {
                row_vocab.push(field.data_element_name.clone());
            }
            if seen_cols.insert(field.category_option_combo_name.clone()) {
                col_vocab.push(field.category_option_combo_name.clone());
            }
        }
    }
    (row_vocab, col_vocab)
}

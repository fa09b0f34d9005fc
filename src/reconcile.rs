// src/reconcile.rs

use tracing::debug;

use crate::similarity::SimilarityScorer;
use crate::table::RawTable;

/// Replace every row label (column 0) with its closest entry in `row_vocab`
/// and every column header (row 0) with its closest entry in `col_vocab`.
///
/// Every vocabulary entry is scored (plain linear scan, fine at the
/// hundreds-of-entries vocabularies a form produces); only a strictly higher
/// score displaces the current best, so ties keep the earliest vocabulary
/// entry. Absent cells are skipped. A label with zero similarity to the
/// whole vocabulary becomes `""`. Returns new tables of identical shape;
/// neither vocabulary is touched.
pub fn reconcile<S: SimilarityScorer>(
    tables: &[RawTable],
    row_vocab: &[String],
    col_vocab: &[String],
    scorer: &S,
) -> Vec<RawTable> {
    tables
        .iter()
        .map(|table| {
            let mut cells = table.cells.clone();

            for row in cells.iter_mut() {
                if let Some(text) = row.first().and_then(|c| c.as_deref()) {
                    let matched = best_match(text, row_vocab, scorer);
                    if matched != text {
                        debug!(from = text, to = %matched, "row label reconciled");
                    }
                    row[0] = Some(matched);
                }
            }

            if let Some(header) = cells.first_mut() {
                for cell in header.iter_mut() {
                    if let Some(text) = cell.as_deref() {
                        let matched = best_match(text, col_vocab, scorer);
                        if matched != text {
                            debug!(from = text, to = %matched, "column header reconciled");
                        }
                        *cell = Some(matched);
                    }
                }
            }

            RawTable { cells }
        })
        .collect()
}

fn best_match<S: SimilarityScorer>(text: &str, vocabulary: &[String], scorer: &S) -> String {
    let mut best = "";
    let mut best_score = 0.0;
    for name in vocabulary {
        let score = scorer.score(text, name);
        if score > best_score {
            best_score = score;
            best = name;
        }
    }
    best.to_string()
}

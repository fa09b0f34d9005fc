// src/arith.rs
//
// Tally-sheet cells often arrive as sums the clerk wrote out ("45+29").
// Evaluation is restricted to integers, `+`, `-` and parentheses so cell
// contents can never name variables or call anything.

use crate::table::RawTable;

/// Evaluate every data cell (outside the header row and label column) as a
/// restricted arithmetic expression. On success the cell becomes the
/// stringified result; on any parse or overflow error the original text is
/// kept. Empty cells and the bare `"-"` sentinel are passed through without
/// an evaluation attempt. Returns new tables; headers and row labels are
/// never touched.
pub fn evaluate_cells(tables: &[RawTable]) -> Vec<RawTable> {
    tables
        .iter()
        .map(|table| {
            let cells = table
                .cells
                .iter()
                .enumerate()
                .map(|(row, r)| {
                    r.iter()
                        .enumerate()
                        .map(|(col, cell)| {
                            if row == 0 || col == 0 {
                                return cell.clone();
                            }
                            match cell.as_deref() {
                                Some(text) if !text.is_empty() && text != "-" => {
                                    match eval(text) {
                                        Ok(n) => Some(n.to_string()),
                                        Err(_) => cell.clone(),
                                    }
                                }
                                _ => cell.clone(),
                            }
                        })
                        .collect()
                })
                .collect();
            RawTable { cells }
        })
        .collect()
}

/// Evaluate `expr` as integers combined with `+`, `-` and parentheses.
pub fn eval(expr: &str) -> Result<i64, EvalError> {
    let mut parser = Parser {
        bytes: expr.as_bytes(),
        pos: 0,
    };
    let value = parser.expr()?;
    parser.skip_whitespace();
    if parser.pos != parser.bytes.len() {
        return Err(EvalError);
    }
    Ok(value)
}

/// The evaluator recovers by keeping the cell text, so the error carries no
/// detail.
#[derive(Debug, PartialEq, Eq)]
pub struct EvalError;

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn skip_whitespace(&mut self) {
        while self.bytes.get(self.pos).is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_whitespace();
        self.bytes.get(self.pos).copied()
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<i64, EvalError> {
        let mut acc = self.term()?;
        loop {
            match self.peek() {
                Some(b'+') => {
                    self.pos += 1;
                    acc = acc.checked_add(self.term()?).ok_or(EvalError)?;
                }
                Some(b'-') => {
                    self.pos += 1;
                    acc = acc.checked_sub(self.term()?).ok_or(EvalError)?;
                }
                _ => return Ok(acc),
            }
        }
    }

    // term := integer | '(' expr ')' | '-' term
    fn term(&mut self) -> Result<i64, EvalError> {
        match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                let value = self.expr()?;
                if self.peek() != Some(b')') {
                    return Err(EvalError);
                }
                self.pos += 1;
                Ok(value)
            }
            Some(b'-') => {
                self.pos += 1;
                Ok(self.term()?.checked_neg().ok_or(EvalError)?)
            }
            Some(b) if b.is_ascii_digit() => {
                let start = self.pos;
                while self.bytes.get(self.pos).is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 1;
                }
                // the slice is pure ASCII digits, so only overflow can fail
                std::str::from_utf8(&self.bytes[start..self.pos])
                    .map_err(|_| EvalError)?
                    .parse()
                    .map_err(|_| EvalError)
            }
            _ => Err(EvalError),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn eval_handles_sums_and_parens() {
        assert_eq!(eval("12+8"), Ok(20));
        assert_eq!(eval("16 - 4"), Ok(12));
        assert_eq!(eval("(12+8)-5"), Ok(15));
        assert_eq!(eval(" 7 "), Ok(7));
        assert_eq!(eval("-3+10"), Ok(7));
    }

    #[test]
    fn eval_rejects_anything_outside_the_grammar() {
        assert_eq!(eval("3*4"), Err(EvalError));
        assert_eq!(eval("abc"), Err(EvalError));
        assert_eq!(eval("12+"), Err(EvalError));
        assert_eq!(eval("(12"), Err(EvalError));
        assert_eq!(eval("len(x)"), Err(EvalError));
        assert_eq!(eval(""), Err(EvalError));
    }

    #[test]
    fn evaluates_data_cells_only() {
        let table = RawTable::new(vec![
            vec![cell(""), cell("Column 1"), cell("Column 2"), cell("1+2")],
            vec![cell("Row 1"), cell(""), cell("15"), cell("12+8")],
            vec![cell("Row 2"), cell("-"), None, cell("16 - 4")],
        ])
        .unwrap();

        let out = evaluate_cells(&[table]);
        let t = &out[0];
        // header row and label column untouched, even when they look numeric
        assert_eq!(t.cell(0, 3), Some("1+2"));
        assert_eq!(t.cell(1, 0), Some("Row 1"));
        // data cells
        assert_eq!(t.cell(1, 1), Some(""));
        assert_eq!(t.cell(1, 2), Some("15"));
        assert_eq!(t.cell(1, 3), Some("20"));
        assert_eq!(t.cell(2, 1), Some("-"));
        assert_eq!(t.cell(2, 2), None);
        assert_eq!(t.cell(2, 3), Some("12"));
    }

    #[test]
    fn malformed_expressions_keep_their_text() {
        let table = RawTable::new(vec![
            vec![cell(""), cell("c")],
            vec![cell("r"), cell("45 vaccinated")],
        ])
        .unwrap();
        let out = evaluate_cells(&[table]);
        assert_eq!(out[0].cell(1, 1), Some("45 vaccinated"));
    }
}

//! Text rendering of the game grid.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

pub const SEPARATOR: &str = "-------------";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BoardError {
    #[error("object has no `fields.grid`")]
    MissingGrid,
    #[error("grid row {0} is not an array")]
    BadRow(usize),
    #[error("grid cell ({row}, {col}) is not an ASCII code")]
    BadCell { row: usize, col: usize },
}

/// The grid as stored on chain: rows of ASCII codes, one per cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: Vec<Vec<char>>,
}

impl Board {
    /// Reads `fields.grid` from an object's content.
    pub fn from_content(content: &Value) -> Result<Self, BoardError> {
        let grid = content
            .get("fields")
            .and_then(|fields| fields.get("grid"))
            .and_then(Value::as_array)
            .ok_or(BoardError::MissingGrid)?;

        let rows = grid
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                let cells = cells.as_array().ok_or(BoardError::BadRow(row))?;
                cells
                    .iter()
                    .enumerate()
                    .map(|(col, cell)| cell_char(cell).ok_or(BoardError::BadCell { row, col }))
                    .collect()
            })
            .collect::<Result<Vec<Vec<char>>, _>>()?;

        Ok(Self { rows })
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<char> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }
}

fn cell_char(cell: &Value) -> Option<char> {
    let code = match cell {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.parse().ok()?,
        _ => return None,
    };
    u8::try_from(code).ok().map(char::from)
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for cell in row {
                write!(f, "{cell} ")?;
            }
            writeln!(f)?;
        }
        f.write_str(SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_ascii_grid() {
        let content = json!({
            "dataType": "moveObject",
            "fields": { "grid": [[46, 65], ["66", 46]] }
        });
        let board = Board::from_content(&content).expect("board");
        assert_eq!(board.size(), 2);
        assert_eq!(board.cell(0, 1), Some('A'));
        assert_eq!(board.to_string(), ". A \nB . \n-------------");
    }

    #[test]
    fn reports_missing_or_bad_grid() {
        assert_eq!(
            Board::from_content(&json!({ "fields": {} })),
            Err(BoardError::MissingGrid)
        );
        assert_eq!(
            Board::from_content(&json!({ "fields": { "grid": [[46], 7] } })),
            Err(BoardError::BadRow(1))
        );
        assert_eq!(
            Board::from_content(&json!({ "fields": { "grid": [[46, 300]] } })),
            Err(BoardError::BadCell { row: 0, col: 1 })
        );
    }
}

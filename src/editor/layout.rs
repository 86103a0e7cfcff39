use std::collections::HashMap;

use super::piece_table::PieceTable;

/// One character as the walker sees it: its grid cell plus its piece-table
/// address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkCell {
    pub row: usize,
    pub col: usize,
    pub ch: char,
    pub piece: usize,
    pub ch_idx: usize,
}

/// Forward map value: where a piece character landed on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRef {
    pub row: usize,
    pub col: usize,
    pub is_newline: bool,
}

/// Reverse map value: which piece character backs a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceRef {
    pub piece: usize,
    pub ch: usize,
    pub is_newline: bool,
}

/// One rendered cell. Padding cells carry no piece reference; the newline
/// marker carries one but no visible character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: Option<char>,
    pub piece: Option<usize>,
    pub ch_idx: usize,
    pub is_newline: bool,
}

impl Cell {
    fn empty() -> Self {
        Self {
            ch: None,
            piece: None,
            ch_idx: 0,
            is_newline: false,
        }
    }
}

/// The full derived layout: padded rows plus both position maps. Rebuilt
/// from scratch whenever the piece table or the column count changes; every
/// coordinate translation goes through these maps and nothing else.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub rows: Vec<Vec<Cell>>,
    pub piece_map: HashMap<(usize, usize), GridRef>,
    pub grid_map: HashMap<(usize, usize), PieceRef>,
}

impl Layout {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Walks every character of the document in order, assigning grid cells
/// under fixed-column word wrap. A non-newline character that would land
/// past the last column wraps to the next row before being emitted; a
/// newline consumes its own cell and then forces the next row.
pub fn walk_pieces(pt: &PieceTable, columns: usize) -> impl Iterator<Item = WalkCell> + '_ {
    let mut row = 0usize;
    let mut col = 0usize;
    pt.pieces()
        .iter()
        .enumerate()
        .flat_map(move |(i, piece)| pt.piece_chars(*piece).enumerate().map(move |(j, ch)| (i, j, ch)))
        .map(move |(piece, ch_idx, ch)| {
            if ch != '\n' && col >= columns {
                row += 1;
                col = 0;
            }
            let cell = WalkCell {
                row,
                col,
                ch,
                piece,
                ch_idx,
            };
            col += 1;
            if ch == '\n' {
                row += 1;
                col = 0;
            }
            cell
        })
}

/// Drives the walker into an array of fixed-width rows and the two maps.
/// Every row is exactly `columns + 1` cells wide: the content columns plus
/// the virtual marker slot at column `columns`, which is where a newline's
/// cell lives. An empty document still yields one padded row, and a
/// trailing newline yields one empty phantom row after it.
pub fn build_rows(pt: &PieceTable, columns: usize) -> Layout {
    let empty_row = || vec![Cell::empty(); columns + 1];
    let mut layout = Layout {
        rows: vec![empty_row()],
        piece_map: HashMap::new(),
        grid_map: HashMap::new(),
    };

    for cell in walk_pieces(pt, columns) {
        while layout.rows.len() <= cell.row {
            layout.rows.push(empty_row());
        }
        let (col, is_newline) = if cell.ch == '\n' {
            (columns, true)
        } else {
            (cell.col, false)
        };
        layout.rows[cell.row][col] = Cell {
            ch: if is_newline { None } else { Some(cell.ch) },
            piece: Some(cell.piece),
            ch_idx: cell.ch_idx,
            is_newline,
        };
        layout.piece_map.insert(
            (cell.piece, cell.ch_idx),
            GridRef {
                row: cell.row,
                col,
                is_newline,
            },
        );
        layout.grid_map.insert(
            (cell.row, col),
            PieceRef {
                piece: cell.piece,
                ch: cell.ch_idx,
                is_newline,
            },
        );
        if is_newline {
            // the newline always opens a following row, even at end of text
            while layout.rows.len() <= cell.row + 1 {
                layout.rows.push(empty_row());
            }
        }
    }

    layout
}

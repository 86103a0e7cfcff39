use super::cursor::CursorAnchor;
use super::layout::{GridRef, Layout};

/// Result of resolving a grid cell back to the piece table. `piece == None`
/// with `offset` is the off-top sentinel: the cell has no character before
/// it at all and `offset` is its distance from the document start cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPosition {
    pub piece: Option<usize>,
    pub ch: usize,
    pub offset: usize,
    pub is_newline: bool,
}

impl ResolvedPosition {
    pub fn anchor(&self) -> CursorAnchor {
        CursorAnchor {
            piece: self.piece,
            ch: self.ch,
            offset: self.offset,
        }
    }
}

/// Forward lookup. Cursors only ever hold positions the walker produced, so
/// a miss means the maps and the piece table have desynchronized.
pub fn grid_position_of(layout: &Layout, piece: usize, ch: usize) -> GridRef {
    match layout.piece_map.get(&(piece, ch)) {
        Some(pos) => *pos,
        None => {
            debug_assert!(false, "piece map has no entry for ({piece},{ch})");
            GridRef {
                row: 0,
                col: 0,
                is_newline: false,
            }
        }
    }
}

/// Reverse lookup with virtual-cell accounting. A direct hit resolves with
/// offset 0. The virtual end-of-row column is first folded onto the last
/// real column with offset 1. Otherwise the walk steps backward cell by
/// cell (re-entering previous rows at their marker column) until it finds a
/// character or a newline marker, counting every step into `offset`; off
/// the top of the document it yields the start sentinel.
pub fn buffer_position_of(layout: &Layout, columns: usize, row: usize, col: usize) -> ResolvedPosition {
    let mut row = row;
    let mut col = col;
    let mut offset = 0usize;
    if col >= columns {
        col = columns - 1;
        offset = 1;
    }
    loop {
        if let Some(r) = layout.grid_map.get(&(row, col)) {
            return ResolvedPosition {
                piece: Some(r.piece),
                ch: r.ch,
                offset,
                is_newline: r.is_newline,
            };
        }
        if col == 0 {
            if row == 0 {
                return ResolvedPosition {
                    piece: None,
                    ch: 0,
                    offset,
                    is_newline: false,
                };
            }
            row -= 1;
            col = columns;
        } else {
            col -= 1;
        }
        offset += 1;
    }
}

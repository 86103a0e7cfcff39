mod cursor;
mod history;
mod layout;
mod piece_table;
mod position;

pub use cursor::{CursorAnchor, CursorMove, GridPosition};
pub use layout::{Cell, Layout};

use cursor::Selection;
use history::{History, Snapshot};
use layout::build_rows;
use piece_table::{PiecePosition, PieceTable};
use position::{buffer_position_of, grid_position_of};

/// The text engine: piece-table storage, the derived grid layout, cursor
/// and selection state, and the undo/redo log, behind one owning object.
/// The grid maps are rebuilt eagerly after every mutation and after every
/// column-count change, so consumers never observe stale coordinates.
pub struct EditorEngine {
    pt: PieceTable,
    layout: Layout,
    cursor: CursorAnchor,
    selection: Selection,
    history: History,
    columns: usize,
}

impl EditorEngine {
    pub fn new(text: &str, columns: usize) -> Self {
        let columns = columns.max(1);
        let pt = PieceTable::new(text);
        let layout = build_rows(&pt, columns);
        Self {
            pt,
            layout,
            cursor: CursorAnchor::start(),
            selection: Selection::default(),
            history: History::default(),
            columns,
        }
    }

    fn rebuild(&mut self) {
        self.layout = build_rows(&self.pt, self.columns);
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            pt: self.pt.clone(),
            cursor: self.cursor,
        }
    }

    // Queries

    pub fn document_text(&self) -> String {
        self.pt.text()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.layout.rows
    }

    pub fn row_count(&self) -> usize {
        self.layout.row_count()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cursor(&self) -> CursorAnchor {
        self.cursor
    }

    /// The cursor's true grid cell: its anchor cell advanced by the virtual
    /// offset, wrapped onto the next row when it passes the marker column.
    pub fn cursor_grid(&self) -> GridPosition {
        let (mut row, col) = match self.cursor.piece {
            None => (0, 0),
            Some(piece) => {
                let pos = grid_position_of(&self.layout, piece, self.cursor.ch);
                (pos.row, pos.col)
            }
        };
        let mut col = col + self.cursor.offset;
        if col > self.columns {
            row += 1;
            col %= self.columns + 1;
        }
        GridPosition::new(row, col)
    }

    pub fn selection(&self) -> Option<(GridPosition, GridPosition)> {
        self.selection.range()
    }

    pub fn has_selection(&self) -> bool {
        self.selection.is_active()
    }

    /// Text under the current selection, resolved through the same padding
    /// rules as deletion; selections that cover only virtual cells are
    /// empty.
    pub fn extract_selection(&self) -> String {
        let Some((start, end)) = self.selection.range() else {
            return String::new();
        };
        let s = buffer_position_of(&self.layout, self.columns, start.row, start.col);
        let e = buffer_position_of(&self.layout, self.columns, end.row, end.col);
        if s.piece == e.piece {
            if s.piece.is_none() {
                return String::new();
            }
            if s.ch == e.ch && (s.offset == e.offset || (s.offset > 0 && e.offset > 0)) {
                return String::new();
            }
        }
        let from = match s.piece {
            None => PiecePosition { piece: 0, ch: 0 },
            Some(piece) => PiecePosition {
                piece,
                ch: s.ch + usize::from(s.offset > 0),
            },
        };
        let Some(end_piece) = e.piece else {
            return String::new();
        };
        let to = PiecePosition {
            piece: end_piece,
            ch: e.ch + usize::from(e.offset > 0),
        };
        self.pt.text_range(from, to)
    }

    // Cursor and selection

    pub fn set_cursor_by_grid(&mut self, row: usize, col: usize) {
        self.cursor = buffer_position_of(&self.layout, self.columns, row, col).anchor();
    }

    pub fn move_cursor(&mut self, movement: CursorMove) {
        let pos = self.cursor_grid();
        let mut row = pos.row;
        let mut col = pos.col;
        match movement {
            CursorMove::Head => col = 0,
            CursorMove::End => col = self.columns,
            CursorMove::Up => {
                if row == 0 {
                    return;
                }
                row -= 1;
            }
            CursorMove::Down => {
                row += 1;
                if row >= self.layout.row_count() {
                    return;
                }
            }
            CursorMove::Back => {
                if col == 0 {
                    if row == 0 {
                        return;
                    }
                    row -= 1;
                    col = self.columns;
                } else {
                    col -= 1;
                }
            }
            CursorMove::Forward => {
                col += 1;
                // past the marker column wraps to the next row start
                if col > self.columns {
                    row += 1;
                    col = 0;
                    if row >= self.layout.row_count() {
                        return;
                    }
                }
            }
        }
        self.cursor = buffer_position_of(&self.layout, self.columns, row, col).anchor();
    }

    pub fn set_selection(&mut self, row: usize, col: usize, is_start: bool) {
        self.selection.set(row, col, is_start);
    }

    pub fn select_all(&mut self) {
        self.selection.set(0, 0, true);
        self.selection
            .set(self.layout.row_count() - 1, self.columns, false);
    }

    pub fn reset_selection(&mut self) {
        self.selection.clear();
    }

    // Edits

    pub fn insert_at_cursor(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let before = self.snapshot();
        let mut cursor = self.cursor;
        if let Some((sel_start, _)) = self.selection.range() {
            cursor = match self.delete_selection() {
                Some(after_delete) => after_delete,
                // nothing was deleted; continue from the selection start
                None => buffer_position_of(&self.layout, self.columns, sel_start.row, sel_start.col)
                    .anchor(),
            };
        }
        self.cursor = self.pt.insert_text(cursor, text);
        self.rebuild();
        self.history.push(before, self.snapshot());
    }

    pub fn delete_at_cursor(&mut self, length: usize) {
        if self.selection.is_active() {
            let before = self.snapshot();
            if let Some(cursor) = self.delete_selection() {
                self.cursor = cursor;
                self.history.push(before, self.snapshot());
            }
            return;
        }
        if length == 0 {
            return;
        }

        let before = self.snapshot();
        let mut mutated = false;
        for _ in 0..length {
            let c = self.cursor;
            let at_start = c.ch == 0 && c.offset == 0 && matches!(c.piece, None | Some(0));
            if at_start {
                break;
            }
            match c.piece {
                // still inside virtual padding: the table is untouched
                Some(_) if c.offset > 1 => self.cursor.offset -= 1,
                None => self.cursor.offset -= 1,
                Some(piece) => {
                    self.cursor = self.pt.delete_backwards(piece, c.ch, c.offset);
                    mutated = true;
                }
            }
        }
        if mutated {
            self.rebuild();
            self.history.push(before, self.snapshot());
        }
    }

    /// Resolves the selection endpoints, deletes the covered characters,
    /// and clears the selection. Returns None (leaving the table alone)
    /// when the selection covers no real characters.
    fn delete_selection(&mut self) -> Option<CursorAnchor> {
        let (start, end) = self.selection.range()?;
        self.selection.clear();
        let s = buffer_position_of(&self.layout, self.columns, start.row, start.col);
        let e = buffer_position_of(&self.layout, self.columns, end.row, end.col);

        if s.piece == e.piece {
            if s.piece.is_none() {
                return None;
            }
            if s.ch == e.ch {
                if s.offset == e.offset {
                    return None;
                }
                // both endpoints hover in padding past the same character
                if s.offset > 0 && e.offset > 0 {
                    return None;
                }
            }
        }

        let delete_start = match s.piece {
            // the selection starts before any character; anchor it to the
            // first real one
            None => PiecePosition { piece: 0, ch: 0 },
            Some(piece) => PiecePosition {
                piece,
                ch: s.ch + usize::from(s.offset > 0),
            },
        };
        let end_piece = e.piece?;
        let delete_end = PiecePosition {
            piece: end_piece,
            ch: e.ch + usize::from(e.offset > 0),
        };

        let cursor = self.pt.delete_range(delete_start, delete_end);
        self.rebuild();
        Some(cursor)
    }

    // Undo/redo

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.apply_snapshot(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.apply_snapshot(snapshot);
                true
            }
            None => false,
        }
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.pt = snapshot.pt;
        self.cursor = snapshot.cursor;
        self.selection.clear();
        self.rebuild();
    }

    // Column count

    /// Changes the fixed column width, carrying the cursor along. The
    /// cursor's pending true column is computed under the old width (with
    /// the newline correction, since a marker anchor's offset was counted
    /// against the old virtual column), clamped, and re-resolved against
    /// the maps rebuilt for the new width.
    pub fn set_columns(&mut self, columns: usize) {
        let columns = columns.max(1);
        if columns == self.columns {
            return;
        }
        let increasing = self.columns < columns;
        self.selection.clear();

        if self.cursor.offset <= 1 || increasing {
            self.columns = columns;
            self.rebuild();
            return;
        }

        let old = self.columns;
        let (mut row, mut col) = match self.cursor.piece {
            None => (0, self.cursor.offset),
            Some(piece) => {
                let pos = grid_position_of(&self.layout, piece, self.cursor.ch);
                if pos.is_newline {
                    (pos.row + 1, self.cursor.offset.saturating_sub(old - columns))
                } else {
                    (pos.row, pos.col + self.cursor.offset)
                }
            }
        };
        if col > columns {
            col = columns;
        }
        if row >= self.layout.row_count() {
            row = self.layout.row_count() - 1;
        }

        self.columns = columns;
        self.rebuild();
        self.cursor = buffer_position_of(&self.layout, columns, row, col).anchor();
    }
}

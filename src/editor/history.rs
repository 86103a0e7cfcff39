use super::cursor::CursorAnchor;
use super::piece_table::PieceTable;

/// Full editor state at one point in time: the piece table plus the cursor.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub pt: PieceTable,
    pub cursor: CursorAnchor,
}

#[derive(Debug, Clone)]
struct HistoryEntry {
    before: Snapshot,
    after: Snapshot,
}

/// Linear undo/redo log. Every mutating operation pushes a before/after
/// snapshot pair; undo moves entries onto the future stack, and a fresh
/// edit discards any future.
#[derive(Debug, Default)]
pub struct History {
    past: Vec<HistoryEntry>,
    future: Vec<HistoryEntry>,
}

impl History {
    pub fn push(&mut self, before: Snapshot, after: Snapshot) {
        self.past.push(HistoryEntry { before, after });
        self.future.clear();
    }

    pub fn undo(&mut self) -> Option<Snapshot> {
        let entry = self.past.pop()?;
        let snapshot = entry.before.clone();
        self.future.push(entry);
        Some(snapshot)
    }

    pub fn redo(&mut self) -> Option<Snapshot> {
        let entry = self.future.pop()?;
        let snapshot = entry.after.clone();
        self.past.push(entry);
        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(text: &str) -> Snapshot {
        Snapshot {
            pt: PieceTable::new(text),
            cursor: CursorAnchor::start(),
        }
    }

    #[test]
    fn test_undo_and_redo_walk_the_stacks() {
        let mut history = History::default();
        history.push(snap(""), snap("a"));
        history.push(snap("a"), snap("ab"));

        assert_eq!(history.undo().unwrap().pt.text(), "a");
        assert_eq!(history.undo().unwrap().pt.text(), "");
        assert!(history.undo().is_none());

        assert_eq!(history.redo().unwrap().pt.text(), "a");
        assert_eq!(history.redo().unwrap().pt.text(), "ab");
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_new_edit_discards_future() {
        let mut history = History::default();
        history.push(snap(""), snap("a"));
        history.undo();
        history.push(snap(""), snap("b"));
        assert!(history.redo().is_none());
        assert_eq!(history.undo().unwrap().pt.text(), "");
    }

    #[test]
    fn test_empty_history_is_inert() {
        let mut history = History::default();
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
    }
}

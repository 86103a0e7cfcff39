use super::cursor::CursorAnchor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Original,
    Add,
}

/// A half-open span of characters into one of the two backing buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub buffer: BufferKind,
    pub start: usize,
    pub length: usize,
}

impl Piece {
    // Splits at a char offset within the piece. A zero-length half is
    // returned as None so it never enters the piece list.
    fn split_at(&self, offset: usize) -> (Option<Piece>, Option<Piece>) {
        if offset == 0 {
            return (None, Some(*self));
        }
        if offset >= self.length {
            return (Some(*self), None);
        }
        let left = Piece {
            buffer: self.buffer,
            start: self.start,
            length: offset,
        };
        let right = Piece {
            buffer: self.buffer,
            start: self.start + offset,
            length: self.length - offset,
        };
        (Some(left), Some(right))
    }
}

/// A position expressed in piece-table coordinates: which piece, and the
/// char offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PiecePosition {
    pub piece: usize,
    pub ch: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PieceTable {
    original: String,
    add: String,
    pieces: Vec<Piece>,
}

impl PieceTable {
    pub fn new(original: &str) -> Self {
        let length = original.chars().count();
        let mut pieces = Vec::new();
        if length > 0 {
            pieces.push(Piece {
                buffer: BufferKind::Original,
                start: 0,
                length,
            });
        }
        Self {
            original: original.to_string(),
            add: String::new(),
            pieces,
        }
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    fn buffer(&self, kind: BufferKind) -> &str {
        match kind {
            BufferKind::Original => &self.original,
            BufferKind::Add => &self.add,
        }
    }

    pub fn piece_chars(&self, piece: Piece) -> impl Iterator<Item = char> + '_ {
        self.buffer(piece.buffer)
            .chars()
            .skip(piece.start)
            .take(piece.length)
    }

    /// Flattens the whole table back into the document text.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for p in &self.pieces {
            out.extend(self.piece_chars(*p));
        }
        out
    }

    // Text of [start, end) in piece coordinates, end exclusive.
    pub fn text_range(&self, start: PiecePosition, end: PiecePosition) -> String {
        let mut out = String::new();
        for (i, p) in self.pieces.iter().enumerate() {
            if i < start.piece || i > end.piece {
                continue;
            }
            let from = if i == start.piece { start.ch } else { 0 };
            let to = if i == end.piece { end.ch } else { p.length };
            if to > from {
                out.extend(
                    self.buffer(p.buffer)
                        .chars()
                        .skip(p.start + from)
                        .take(to - from),
                );
            }
        }
        out
    }

    /// Inserts `text` at the cursor anchor. A positive `offset` means the
    /// anchor points past real characters into virtual padding: the gap is
    /// filled with literal spaces first (never for a lone newline, which
    /// starts a fresh row regardless of column), and the insertion target
    /// shifts to just after the anchor character. Returns a cursor on the
    /// last character of the new piece.
    pub fn insert_text(&mut self, anchor: CursorAnchor, text: &str) -> CursorAnchor {
        let mut ch = anchor.ch;
        let mut padded = String::new();
        if anchor.offset > 0 {
            if text != "\n" {
                let pad = anchor.offset - usize::from(anchor.piece.is_some());
                for _ in 0..pad {
                    padded.push(' ');
                }
            }
            ch += 1;
        }
        padded.push_str(text);

        let add_start = self.add.chars().count();
        let add_len = padded.chars().count();
        self.add.push_str(&padded);
        let new_piece = Piece {
            buffer: BufferKind::Add,
            start: add_start,
            length: add_len,
        };

        let new_index = match anchor.piece {
            None => {
                self.pieces.insert(0, new_piece);
                0
            }
            Some(idx) => {
                debug_assert!(idx < self.pieces.len(), "insert anchor out of bounds");
                let (left, right) = self.pieces[idx].split_at(ch);
                let mut replacement = Vec::with_capacity(3);
                let mut new_index = idx;
                if let Some(left) = left {
                    replacement.push(left);
                    new_index += 1;
                }
                replacement.push(new_piece);
                if let Some(right) = right {
                    replacement.push(right);
                }
                self.pieces.splice(idx..=idx, replacement);
                new_index
            }
        };

        CursorAnchor {
            piece: Some(new_index),
            ch: add_len - 1,
            offset: 1,
        }
    }

    /// Deletes the range between two piece positions (`start <= end` in
    /// document order). Equal positions delete the single character they
    /// both name; otherwise the end is exclusive. Returns the cursor
    /// placement for the survivors.
    pub fn delete_range(&mut self, start: PiecePosition, end: PiecePosition) -> CursorAnchor {
        debug_assert!(start.piece <= end.piece, "delete range out of order");

        let (left, right) = if start.piece == end.piece {
            let target = self.pieces[start.piece];
            let (left, rest) = target.split_at(start.ch);
            // a degenerate range still removes the character both ends name
            let mid = (end.ch.saturating_sub(start.ch)).max(1);
            let right = rest.and_then(|r| r.split_at(mid).1);
            (left, right)
        } else {
            let (left, _) = self.pieces[start.piece].split_at(start.ch);
            let (_, right) = self.pieces[end.piece].split_at(end.ch);
            (left, right)
        };

        let right_starts_newline = right
            .map(|r| self.buffer(r.buffer).chars().nth(r.start) == Some('\n'))
            .unwrap_or(false);

        let mut replacement = Vec::with_capacity(2);
        if let Some(l) = left {
            replacement.push(l);
        }
        if let Some(r) = right {
            replacement.push(r);
        }
        self.pieces.splice(start.piece..=end.piece, replacement);

        // Cursor placement: prefer the start of the right remnant unless it
        // begins with a newline, so the cursor never straddles a deleted
        // line boundary.
        if right.is_some() && !right_starts_newline {
            return CursorAnchor {
                piece: Some(start.piece + usize::from(left.is_some())),
                ch: 0,
                offset: 0,
            };
        }
        if let Some(l) = left {
            return CursorAnchor {
                piece: Some(start.piece),
                ch: l.length - 1,
                offset: 1,
            };
        }
        if start.piece > 0 {
            let prev = self.pieces[start.piece - 1];
            return CursorAnchor {
                piece: Some(start.piece - 1),
                ch: prev.length - 1,
                offset: 1,
            };
        }
        CursorAnchor::start()
    }

    /// Deletes the character immediately left of the cursor's true anchor.
    /// With no character to the left the cursor comes back unchanged.
    /// Callers handle `offset > 1` themselves: the cursor is still inside
    /// virtual padding and the table must not be touched.
    pub fn delete_backwards(&mut self, piece: usize, ch: usize, offset: usize) -> CursorAnchor {
        let end = PiecePosition { piece, ch };
        let start = if offset > 0 {
            // anchor sits after `ch`, so `ch` itself is the victim
            end
        } else if ch > 0 {
            PiecePosition { piece, ch: ch - 1 }
        } else if piece > 0 {
            let prev = self.pieces[piece - 1];
            PiecePosition {
                piece: piece - 1,
                ch: prev.length - 1,
            }
        } else {
            return CursorAnchor {
                piece: Some(piece),
                ch,
                offset,
            };
        };
        self.delete_range(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(piece: usize, ch: usize, offset: usize) -> CursorAnchor {
        CursorAnchor {
            piece: Some(piece),
            ch,
            offset,
        }
    }

    #[test]
    fn test_new_single_piece() {
        let pt = PieceTable::new("hello\nworld");
        assert_eq!(pt.pieces().len(), 1);
        assert_eq!(pt.text(), "hello\nworld");
    }

    #[test]
    fn test_new_empty_has_no_pieces() {
        let pt = PieceTable::new("");
        assert!(pt.pieces().is_empty());
        assert_eq!(pt.text(), "");
    }

    #[test]
    fn test_insert_in_middle_of_piece() {
        let mut pt = PieceTable::new("hello\nworld");
        let cursor = pt.insert_text(anchor(0, 2, 0), "XX");
        assert_eq!(pt.text(), "heXXllo\nworld");
        assert_eq!(pt.pieces().len(), 3);
        assert_eq!(cursor, anchor(1, 1, 1));
    }

    #[test]
    fn test_insert_after_character() {
        // offset 1: insert immediately after the anchor character, no padding
        let mut pt = PieceTable::new("hello\nworld");
        let cursor = pt.insert_text(anchor(0, 4, 1), "XX");
        assert_eq!(pt.text(), "helloXX\nworld");
        assert_eq!(pt.pieces().len(), 3);
        assert_eq!(cursor, anchor(1, 1, 1));
    }

    #[test]
    fn test_insert_in_virtual_cell_pads_with_spaces() {
        let mut pt = PieceTable::new("hello\nworld");
        let cursor = pt.insert_text(anchor(0, 4, 3), "XX");
        assert_eq!(pt.text(), "hello  XX\nworld");
        assert_eq!(pt.pieces().len(), 3);
        // the new piece holds "  XX", cursor on its last character
        assert_eq!(cursor, anchor(1, 3, 1));
    }

    #[test]
    fn test_insert_in_virtual_cell_on_last_row() {
        let mut pt = PieceTable::new("hello\nworld");
        let cursor = pt.insert_text(anchor(0, 10, 3), "XX");
        assert_eq!(pt.text(), "hello\nworld  XX");
        assert_eq!(pt.pieces().len(), 2);
        assert_eq!(cursor, anchor(1, 3, 1));
    }

    #[test]
    fn test_insert_newline_never_pads() {
        let mut pt = PieceTable::new("ab");
        pt.insert_text(anchor(0, 1, 4), "\n");
        assert_eq!(pt.text(), "ab\n");
    }

    #[test]
    fn test_insert_into_empty_document() {
        let mut pt = PieceTable::new("");
        let cursor = pt.insert_text(CursorAnchor::start(), "hi");
        assert_eq!(pt.text(), "hi");
        assert_eq!(pt.pieces().len(), 1);
        assert_eq!(cursor, anchor(0, 1, 1));
    }

    #[test]
    fn test_insert_at_start_sentinel_with_offset() {
        // clicking at column 2 of an empty document pads the full gap
        let mut pt = PieceTable::new("");
        let sentinel = CursorAnchor {
            piece: None,
            ch: 0,
            offset: 2,
        };
        pt.insert_text(sentinel, "X");
        assert_eq!(pt.text(), "  X");
    }

    #[test]
    fn test_delete_range_middle_of_piece() {
        let mut pt = PieceTable::new("abcdef");
        let cursor = pt.delete_range(
            PiecePosition { piece: 0, ch: 1 },
            PiecePosition { piece: 0, ch: 3 },
        );
        assert_eq!(pt.text(), "adef");
        // cursor lands on the start of the right remnant
        assert_eq!(cursor, anchor(1, 0, 0));
    }

    #[test]
    fn test_delete_range_equal_positions_removes_one_char() {
        let mut pt = PieceTable::new("abcdef");
        pt.delete_range(
            PiecePosition { piece: 0, ch: 2 },
            PiecePosition { piece: 0, ch: 2 },
        );
        assert_eq!(pt.text(), "abdef");
    }

    #[test]
    fn test_delete_drops_emptied_piece() {
        let mut pt = PieceTable::new("ab");
        pt.insert_text(anchor(0, 0, 0), "X");
        assert_eq!(pt.text(), "Xab");
        assert_eq!(pt.pieces().len(), 2);
        // delete the single-char add piece entirely
        pt.delete_range(
            PiecePosition { piece: 0, ch: 0 },
            PiecePosition { piece: 0, ch: 0 },
        );
        assert_eq!(pt.text(), "ab");
        assert_eq!(pt.pieces().len(), 1);
        assert!(pt.pieces().iter().all(|p| p.length > 0));
    }

    #[test]
    fn test_delete_range_across_pieces() {
        let mut pt = PieceTable::new("hello\nworld");
        pt.insert_text(anchor(0, 4, 1), "XX");
        // pieces: [hello][XX][\nworld]; delete from 'l' through the newline
        let cursor = pt.delete_range(
            PiecePosition { piece: 0, ch: 3 },
            PiecePosition { piece: 2, ch: 1 },
        );
        assert_eq!(pt.text(), "helworld");
        assert_eq!(cursor, anchor(1, 0, 0));
    }

    #[test]
    fn test_delete_cursor_avoids_leading_newline() {
        // right remnant starts with '\n': cursor prefers the left remnant
        let mut pt = PieceTable::new("ab\ncd");
        let cursor = pt.delete_range(
            PiecePosition { piece: 0, ch: 1 },
            PiecePosition { piece: 0, ch: 1 },
        );
        assert_eq!(pt.text(), "a\ncd");
        assert_eq!(cursor, anchor(0, 0, 1));
    }

    #[test]
    fn test_delete_everything_returns_start_sentinel() {
        let mut pt = PieceTable::new("abc");
        let cursor = pt.delete_range(
            PiecePosition { piece: 0, ch: 0 },
            PiecePosition { piece: 0, ch: 3 },
        );
        assert_eq!(pt.text(), "");
        assert!(pt.pieces().is_empty());
        assert_eq!(cursor, CursorAnchor::start());
    }

    #[test]
    fn test_delete_falls_back_to_previous_piece() {
        let mut pt = PieceTable::new("ab\n");
        pt.insert_text(anchor(0, 2, 1), "\ncd");
        // pieces: [ab\n][\ncd]; delete the whole second piece
        let cursor = pt.delete_range(
            PiecePosition { piece: 1, ch: 0 },
            PiecePosition { piece: 1, ch: 3 },
        );
        assert_eq!(pt.text(), "ab\n");
        assert_eq!(cursor, anchor(0, 2, 1));
    }

    #[test]
    fn test_delete_backwards_basic() {
        let mut pt = PieceTable::new("abc");
        // cursor after 'c' (offset 1): backspace removes 'c'
        let cursor = pt.delete_backwards(0, 2, 1);
        assert_eq!(pt.text(), "ab");
        assert_eq!(cursor, anchor(0, 1, 1));
    }

    #[test]
    fn test_delete_backwards_before_character() {
        let mut pt = PieceTable::new("abc");
        // cursor before 'c' (offset 0): backspace removes 'b'
        let cursor = pt.delete_backwards(0, 2, 0);
        assert_eq!(pt.text(), "ac");
        assert_eq!(cursor, anchor(1, 0, 0));
    }

    #[test]
    fn test_delete_backwards_across_piece_boundary() {
        let mut pt = PieceTable::new("hello\nworld");
        pt.insert_text(anchor(0, 4, 1), "XX");
        // pieces: [hello][XX][\nworld]; cursor at start of the third piece
        let cursor = pt.delete_backwards(2, 0, 0);
        assert_eq!(pt.text(), "helloX\nworld");
        // the surviving remnant starts with '\n', so the cursor stays on
        // the left remnant instead
        assert_eq!(cursor, anchor(1, 0, 1));
    }

    #[test]
    fn test_delete_backwards_at_document_start_is_noop() {
        let mut pt = PieceTable::new("abc");
        let cursor = pt.delete_backwards(0, 0, 0);
        assert_eq!(pt.text(), "abc");
        assert_eq!(cursor, anchor(0, 0, 0));
    }

    #[test]
    fn test_text_range() {
        let mut pt = PieceTable::new("hello\nworld");
        pt.insert_text(anchor(0, 4, 1), "XX");
        let text = pt.text_range(
            PiecePosition { piece: 0, ch: 3 },
            PiecePosition { piece: 2, ch: 3 },
        );
        assert_eq!(text, "loXX\nwo");
    }

    #[test]
    fn test_cjk_text_is_char_indexed() {
        let mut pt = PieceTable::new("你好世界");
        let cursor = pt.insert_text(anchor(0, 1, 1), "吗");
        assert_eq!(pt.text(), "你好吗世界");
        assert_eq!(cursor, anchor(1, 0, 1));
        pt.delete_backwards(1, 0, 1);
        assert_eq!(pt.text(), "你好世界");
    }
}

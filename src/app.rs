use std::fs;
use std::io;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::config::Config;
use crate::editor::{CursorMove, EditorEngine};

pub struct App {
    pub engine: EditorEngine,
    pub config: Config,
    pub file_path: Option<PathBuf>,
    pub dirty: bool,
    pub scroll_offset: usize,
    pub status: String,
    // set by the renderer every frame so mouse events can be mapped back
    pub grid_area: Rect,
    selecting: bool,
}

impl App {
    pub fn new(config: Config, file_path: Option<PathBuf>) -> io::Result<Self> {
        let text = match &file_path {
            Some(path) if path.exists() => fs::read_to_string(path)?,
            _ => String::new(),
        };
        let status = match &file_path {
            Some(path) => format!("{}", path.display()),
            None => "[untitled]".to_string(),
        };
        Ok(Self {
            engine: EditorEngine::new(&text, config.columns),
            config,
            file_path,
            dirty: false,
            scroll_offset: 0,
            status,
            grid_area: Rect::default(),
            selecting: false,
        })
    }

    pub fn save(&mut self) {
        let Some(path) = self.file_path.clone() else {
            self.status = "no file to save to".to_string();
            return;
        };
        // storage only ever sees the flattened document text
        match fs::write(&path, self.engine.document_text()) {
            Ok(()) => {
                self.dirty = false;
                self.status = format!("saved {}", path.display());
            }
            Err(e) => self.status = format!("save failed: {}", e),
        }
    }

    /// Handles one key press. Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        if ctrl {
            match key.code {
                KeyCode::Char('q') => return true,
                KeyCode::Char('s') => self.save(),
                KeyCode::Char('z') => {
                    if self.engine.undo() {
                        self.dirty = true;
                    }
                }
                KeyCode::Char('y') => {
                    if self.engine.redo() {
                        self.dirty = true;
                    }
                }
                KeyCode::Char('a') => self.engine.select_all(),
                KeyCode::Char('c') => self.copy_selection(),
                KeyCode::Char('x') => self.cut_selection(),
                KeyCode::Char('v') => self.paste(),
                KeyCode::Up => self.change_columns(1),
                KeyCode::Down => self.change_columns(-1),
                _ => {}
            }
            self.ensure_cursor_visible();
            return false;
        }

        match key.code {
            KeyCode::Char(c) => self.insert(&c.to_string()),
            KeyCode::Tab => self.insert("\t"),
            KeyCode::Enter => self.insert("\n"),
            KeyCode::Backspace => {
                self.engine.delete_at_cursor(1);
                self.dirty = true;
            }
            KeyCode::Left => self.move_cursor(CursorMove::Back, shift),
            KeyCode::Right => self.move_cursor(CursorMove::Forward, shift),
            KeyCode::Up => self.move_cursor(CursorMove::Up, shift),
            KeyCode::Down => self.move_cursor(CursorMove::Down, shift),
            KeyCode::Home => self.move_cursor(CursorMove::Head, shift),
            KeyCode::End => self.move_cursor(CursorMove::End, shift),
            KeyCode::Esc => self.engine.reset_selection(),
            _ => {}
        }
        self.ensure_cursor_visible();
        false
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some((row, col)) = self.cell_at(mouse.column, mouse.row) {
                    self.engine.reset_selection();
                    self.engine.set_cursor_by_grid(row, col);
                    self.engine.set_selection(row, col, true);
                    self.selecting = true;
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.selecting {
                    if let Some((row, col)) = self.cell_at(mouse.column, mouse.row) {
                        self.engine.set_selection(row, col, false);
                        self.engine.set_cursor_by_grid(row, col);
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.selecting = false;
            }
            MouseEventKind::ScrollUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            MouseEventKind::ScrollDown => {
                let max = self.engine.row_count().saturating_sub(1);
                self.scroll_offset = (self.scroll_offset + 1).min(max);
            }
            _ => {}
        }
    }

    fn insert(&mut self, text: &str) {
        self.engine.insert_at_cursor(text);
        self.dirty = true;
    }

    fn move_cursor(&mut self, movement: CursorMove, extend: bool) {
        if extend {
            if !self.engine.has_selection() {
                let from = self.engine.cursor_grid();
                self.engine.set_selection(from.row, from.col, true);
            }
            self.engine.move_cursor(movement);
            let to = self.engine.cursor_grid();
            self.engine.set_selection(to.row, to.col, false);
        } else {
            self.engine.reset_selection();
            self.engine.move_cursor(movement);
        }
    }

    fn change_columns(&mut self, delta: i64) {
        let columns = (self.engine.columns() as i64 + delta).max(1) as usize;
        self.engine.set_columns(columns);
        self.config.columns = self.engine.columns();
        self.status = format!("{} columns", self.engine.columns());
    }

    fn copy_selection(&mut self) {
        let text = self.engine.extract_selection();
        if text.is_empty() {
            return;
        }
        if let Ok(mut clipboard) = arboard::Clipboard::new() {
            let _ = clipboard.set_text(&text);
        }
        self.status = format!("copied {} chars", text.chars().count());
    }

    fn cut_selection(&mut self) {
        if !self.engine.has_selection() {
            return;
        }
        self.copy_selection();
        self.engine.delete_at_cursor(1);
        self.dirty = true;
    }

    fn paste(&mut self) {
        if let Ok(mut clipboard) = arboard::Clipboard::new() {
            if let Ok(text) = clipboard.get_text() {
                if !text.is_empty() {
                    self.insert(&text);
                }
            }
        }
    }

    // Maps a terminal position onto a grid cell, clamping to the marker
    // column and the last layout row.
    fn cell_at(&self, x: u16, y: u16) -> Option<(usize, usize)> {
        let area = self.grid_area;
        if x < area.x || y < area.y || y >= area.y + area.height {
            return None;
        }
        let col = ((x - area.x) / self.config.cell_width.max(1)) as usize;
        let row = self.scroll_offset + (y - area.y) as usize;
        let col = col.min(self.engine.columns());
        let row = row.min(self.engine.row_count().saturating_sub(1));
        Some((row, col))
    }

    fn ensure_cursor_visible(&mut self) {
        let view_height = self.grid_area.height as usize;
        if view_height == 0 {
            return;
        }
        let row = self.engine.cursor_grid().row;
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + view_height {
            self.scroll_offset = row + 1 - view_height;
        }
    }
}

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::app::App;
use crate::editor::GridPosition;

pub fn render_grid(f: &mut Frame, app: &App, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let columns = app.engine.columns();
    let cell_width = app.config.cell_width.max(1) as usize;
    let cursor = app.engine.cursor_grid();
    let selection = app.engine.selection();
    let rows = app.engine.rows();

    let mut lines: Vec<Line> = Vec::with_capacity(area.height as usize);
    let last = (app.scroll_offset + area.height as usize).min(rows.len());

    for (row_idx, row) in rows.iter().enumerate().take(last).skip(app.scroll_offset) {
        let mut spans: Vec<Span> = Vec::with_capacity(columns + 1);
        for (col_idx, cell) in row.iter().enumerate() {
            let here = GridPosition::new(row_idx, col_idx);
            let is_marker_column = col_idx == columns;

            let mut style = Style::default();
            if app.config.show_grid {
                if is_marker_column {
                    style = style.bg(Color::DarkGray);
                } else if cell.piece.is_none() {
                    style = style.fg(Color::DarkGray);
                }
            }
            if in_selection(selection, here) {
                style = style.bg(Color::Blue);
            }
            if here == cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }

            spans.push(Span::styled(
                cell_text(cell.ch, cell_width, app.config.show_grid),
                style,
            ));
        }
        lines.push(Line::from(spans));
    }

    f.render_widget(Paragraph::new(lines), area);
}

// Pads the cell character out to the fixed cell width; empty and marker
// cells show the grid dot when outlines are on.
fn cell_text(ch: Option<char>, cell_width: usize, show_grid: bool) -> String {
    let mut text = String::new();
    let shown = match ch {
        Some(c) if c.width().unwrap_or(0) > 0 => Some(c),
        _ => None,
    };
    match shown {
        Some(c) => {
            text.push(c);
            let used = c.width().unwrap_or(1).min(cell_width);
            for _ in used..cell_width {
                text.push(' ');
            }
        }
        None => {
            if show_grid && ch.is_none() {
                text.push('·');
                for _ in 1..cell_width {
                    text.push(' ');
                }
            } else {
                for _ in 0..cell_width {
                    text.push(' ');
                }
            }
        }
    }
    text
}

// Caret-style endpoints: a cell is highlighted from the start cell up to,
// but not including, the end cell.
fn in_selection(selection: Option<(GridPosition, GridPosition)>, pos: GridPosition) -> bool {
    let Some((start, end)) = selection else {
        return false;
    };
    let p = (pos.row, pos.col);
    (start.row, start.col) <= p && p < (end.row, end.col)
}

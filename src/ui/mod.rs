mod grid;
mod status_bar;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::App;

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // grid page
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    app.grid_area = chunks[0];

    grid::render_grid(f, app, chunks[0]);
    status_bar::render_status_bar(f, app, chunks[1]);
}

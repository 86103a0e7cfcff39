use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let cursor = app.engine.cursor_grid();

    let name = Span::styled(
        " 田 tianzige ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD),
    );

    let file = Span::styled(
        format!(
            " {}{} ",
            app.file_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "[untitled]".to_string()),
            if app.dirty { " [+]" } else { "" },
        ),
        Style::default().fg(Color::White),
    );

    let message = Span::styled(app.status.clone(), Style::default().fg(Color::Gray));

    let position = Span::styled(
        format!(" {}:{} ", cursor.row + 1, cursor.col),
        Style::default().fg(Color::Black).bg(Color::Magenta),
    );

    let columns = Span::styled(
        format!(" {} cols ", app.engine.columns()),
        Style::default().fg(Color::Black).bg(Color::Yellow),
    );

    let hint = Span::styled(
        " ^S save  ^Q quit ",
        Style::default().fg(Color::White).bg(Color::DarkGray),
    );

    let left = vec![name, Span::raw(" "), file, message];
    let right = vec![position, Span::raw(" "), columns, Span::raw(" "), hint];

    let left_width: usize = left.iter().map(|s| s.content.chars().count()).sum();
    let right_width: usize = right.iter().map(|s| s.content.chars().count()).sum();
    let padding = (area.width as usize).saturating_sub(left_width + right_width);

    let mut spans = left;
    spans.push(Span::raw(" ".repeat(padding)));
    spans.extend(right);

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

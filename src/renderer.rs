use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::config::{
    BORDER_COLOR, CELL_COLUMNS, FOOD_COLOR, GLYPH_CELL, HUD_COLOR, HUD_HEIGHT, SNAKE_BODY_COLOR,
    SNAKE_HEAD_COLOR,
};
use crate::controller::{Snapshot, TerminalEvent};
use crate::error::GridError;
use crate::grid::{Cell, Grid};
use crate::session::{Outcome, SessionStatus};

/// Largest grid that fits a terminal of `columns` x `rows`, border and HUD included.
pub fn grid_for_terminal(columns: u16, rows: u16) -> Result<Grid, GridError> {
    fit_grid(columns, rows, None, None)
}

/// Like [`grid_for_terminal`], but a given `width` or `height` is kept as is.
pub fn fit_grid(
    columns: u16,
    rows: u16,
    width: Option<u16>,
    height: Option<u16>,
) -> Result<Grid, GridError> {
    Grid::new(
        width.unwrap_or(columns.saturating_sub(2) / CELL_COLUMNS),
        height.unwrap_or(rows.saturating_sub(2 + HUD_HEIGHT)),
    )
}

/// Renders the full game frame from an immutable snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot, last_event: Option<TerminalEvent>) {
    let [play_area, hud_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(HUD_HEIGHT)]).areas(frame.area());

    let board = Rect::new(
        play_area.x,
        play_area.y,
        snapshot.width.saturating_mul(CELL_COLUMNS).saturating_add(2),
        snapshot.height.saturating_add(2),
    )
    .intersection(play_area);

    let block = Block::bordered().border_style(Style::new().fg(BORDER_COLOR));
    let inner = block.inner(board);
    frame.render_widget(block, board);

    draw_cell(frame, inner, snapshot.food, Style::new().fg(FOOD_COLOR));
    // Tail first so the head stays visible when it overlaps the body.
    for (index, cell) in snapshot.body.iter().enumerate().rev() {
        let style = if index == 0 {
            Style::new()
                .fg(SNAKE_HEAD_COLOR)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::new().fg(SNAKE_BODY_COLOR)
        };
        draw_cell(frame, inner, *cell, style);
    }

    frame.render_widget(
        Paragraph::new(hud_line(snapshot, usize::from(hud_area.width)))
            .style(Style::new().fg(HUD_COLOR)),
        hud_area,
    );

    match snapshot.status {
        SessionStatus::Paused => render_popup(frame, board, &["PAUSED", "", "[Space] Resume"]),
        SessionStatus::Terminated => {
            let lines = game_over_lines(snapshot, last_event);
            let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
            render_popup(frame, board, &lines);
        }
        SessionStatus::Running => {}
    }
}

/// `Score: N` on the left and `High: M` on the right, padded to `width`.
fn hud_line(snapshot: &Snapshot, width: usize) -> String {
    let left = format!(" Score: {}", snapshot.score);
    let right = match snapshot.high_score {
        Some(high_score) => format!("High: {high_score} "),
        None => "High: - ".to_owned(),
    };

    let used = left.width() + right.width();
    let padding = width.saturating_sub(used);
    format!("{left}{}{right}", " ".repeat(padding))
}

fn game_over_lines(snapshot: &Snapshot, last_event: Option<TerminalEvent>) -> Vec<String> {
    let cause = match snapshot.outcome {
        Some(Outcome::WallCollision) => "Your snake hit the wall.",
        Some(Outcome::SelfCollision) => "Your snake bit itself.",
        Some(Outcome::BoardFull) => "The board is full!",
        None => "",
    };

    let mut lines = vec!["GAME OVER".to_owned(), String::new(), cause.to_owned()];
    match last_event {
        Some(event) if event.new_high_score => {
            lines.push(format!("New high score: {}", event.score));
        }
        Some(event) => {
            lines.push(format!("Score: {}. High score: {}", event.score, event.high_score));
        }
        None => lines.push(format!("Score: {}", snapshot.score)),
    }
    lines.push(String::new());
    lines.push("[Enter] Play again  [Q] Quit".to_owned());
    lines
}

fn render_popup(frame: &mut Frame<'_>, area: Rect, lines: &[&str]) {
    let content_width = lines.iter().map(|line| line.width()).max().unwrap_or(0);
    let width = u16::try_from(content_width + 4)
        .unwrap_or(u16::MAX)
        .min(area.width);
    let height = u16::try_from(lines.len() + 2)
        .unwrap_or(u16::MAX)
        .min(area.height);

    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    frame.render_widget(Clear, popup);

    let text: Vec<Line<'_>> = lines.iter().map(|line| Line::from(*line)).collect();
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::bordered()),
        popup,
    );
}

fn draw_cell(frame: &mut Frame<'_>, inner: Rect, cell: Cell, style: Style) {
    let Some((x, y)) = grid_to_terminal(inner, cell) else {
        return;
    };

    frame.buffer_mut().set_string(x, y, GLYPH_CELL, style);
}

fn grid_to_terminal(inner: Rect, cell: Cell) -> Option<(u16, u16)> {
    let x_offset = u16::try_from(cell.x).ok()?.checked_mul(CELL_COLUMNS)?;
    let y_offset = u16::try_from(cell.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_COLUMNS) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

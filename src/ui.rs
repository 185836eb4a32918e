use crate::app::App;
use crate::timer::{IntervalKind, Phase};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    let theme = &app.config.theme;
    let area = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background).fg(theme.foreground)),
        area,
    );
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(f, chunks[0], app);
    draw_phase_title(f, chunks[1], app);
    draw_clock(f, chunks[2], app);
    draw_tally(f, chunks[3], app);
    draw_status_bar(f, chunks[4], app);
}

/// Phase heading and its color cue: green for work, pink for a short break,
/// red for a long one.
fn phase_style(app: &App) -> (&'static str, Color) {
    let theme = &app.config.theme;
    match app.timer.phase() {
        Phase::Idle => ("Timer", theme.green),
        Phase::Running(kind) => {
            let color = match kind {
                IntervalKind::Work => theme.green,
                IntervalKind::ShortBreak => theme.pink,
                IntervalKind::LongBreak => theme.red,
            };
            (kind.label(), color)
        }
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let text = Line::from(vec![
        Span::raw(icons.header_left.clone()),
        Span::styled(
            "POMODORO",
            Style::default()
                .fg(theme.foreground)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(icons.header_right.clone()),
    ]);
    f.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.gray)),
        ),
        area,
    );
}

fn draw_phase_title(f: &mut Frame, area: Rect, app: &App) {
    let (title, color) = phase_style(app);
    f.render_widget(
        Paragraph::new(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        area,
    );
}

fn draw_clock(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let (_, color) = phase_style(app);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color));
    let inner_area = block.inner(area);
    f.render_widget(block, area);
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Min(0)])
        .split(inner_area);
    f.render_widget(
        Paragraph::new(app.timer.display())
            .style(
                Style::default()
                    .fg(theme.foreground)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center),
        v_chunks[1],
    );
}

fn draw_tally(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let marks = icons.check.repeat(app.timer.tally() as usize);
    f.render_widget(
        Paragraph::new(marks)
            .style(Style::default().fg(theme.green))
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let start_style = if app.timer.is_idle() {
        Style::default().fg(theme.foreground)
    } else {
        // The start control is disabled while running.
        Style::default().fg(theme.gray).add_modifier(Modifier::DIM)
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("s:start", start_style),
            Span::styled(
                format!(" {} r:reset {} q:quit", icons.separator, icons.separator),
                Style::default().fg(theme.foreground),
            ),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().style(Style::default().fg(theme.gray))),
        area,
    );
}

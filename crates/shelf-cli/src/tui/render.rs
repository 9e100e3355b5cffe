//! Drawing for the search and library views.

use super::app::{App, View};
use super::form::{Field, Focus};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
};

const SEARCH_KEYS: &str =
    "Tab/S-Tab focus  Enter search  j/k move  s save  F2 library  Esc quit";
const LIBRARY_KEYS: &str = "j/k move  d delete  F2 search  Esc quit";

fn highlight() -> Style {
    Style::default()
        .add_modifier(Modifier::BOLD)
        .fg(Color::White)
        .bg(Color::DarkGray)
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1), Constraint::Length(1)])
        .split(frame.area());

    let keys = match app.view {
        View::Search => {
            draw_search(frame, app, chunks[0]);
            SEARCH_KEYS
        }
        View::Library => {
            draw_library(frame, app, chunks[0]);
            LIBRARY_KEYS
        }
    };

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {}", app.status),
            Style::default().fg(Color::Cyan),
        ))),
        chunks[1],
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {keys}"),
            Style::default().fg(Color::DarkGray),
        ))),
        chunks[2],
    );
}

fn draw_search(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    let inputs = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(35),
            Constraint::Percentage(25),
        ])
        .split(rows[0]);

    for (field, slot) in Field::ALL.into_iter().zip(inputs.iter()) {
        let focused = app.focus == Focus::Field(field);
        let value = app.form.value(field);
        let input = Paragraph::new(value).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(focused))
                .title(format!(" {} ", field.label())),
        );
        frame.render_widget(input, *slot);

        if focused {
            let len = u16::try_from(value.chars().count()).unwrap_or(u16::MAX);
            let x = slot.x.saturating_add(1).saturating_add(len);
            frame.set_cursor_position((x.min(slot.right().saturating_sub(2)), slot.y + 1));
        }
    }

    let header = Row::new(["#", "Title", "Author", "Published", "ISBN-10", "ISBN-13"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let body: Vec<Row> = app
        .results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Row::new([
                (i + 1).to_string(),
                r.title.clone(),
                r.author.clone(),
                r.published.clone(),
                or_dash(r.isbn10.as_deref()).to_string(),
                or_dash(r.isbn13.as_deref()).to_string(),
            ])
        })
        .collect();

    let table = Table::new(
        body,
        [
            Constraint::Length(3),
            Constraint::Percentage(35),
            Constraint::Percentage(25),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(13),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(app.focus == Focus::Results))
            .title(format!(" Results ({}) ", app.results.len())),
    )
    .row_highlight_style(highlight())
    .highlight_symbol("> ");

    frame.render_stateful_widget(table, rows[1], &mut app.results_state);
}

fn draw_library(frame: &mut Frame, app: &mut App, area: Rect) {
    let header = Row::new(["ID", "Title", "Author", "Year", "ISBN-13", "Genre"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let body: Vec<Row> = app
        .library
        .iter()
        .map(|b| {
            Row::new([
                b.id.to_string(),
                b.title.clone(),
                b.author.clone(),
                or_dash(b.pub_year.as_deref()).to_string(),
                or_dash(b.isbn13.as_deref()).to_string(),
                b.genre.clone().unwrap_or_default(),
            ])
        })
        .collect();

    let table = Table::new(
        body,
        [
            Constraint::Length(5),
            Constraint::Percentage(35),
            Constraint::Percentage(25),
            Constraint::Length(6),
            Constraint::Length(13),
            Constraint::Min(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(true))
            .title(format!(" Library ({}) ", app.library.len())),
    )
    .row_highlight_style(highlight())
    .highlight_symbol("> ");

    frame.render_stateful_widget(table, area, &mut app.library_state);
}

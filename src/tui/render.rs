use std::borrow::Cow;

use super::form::{FieldType, FormState};
use super::state::{AppState, ResultView};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

pub fn draw(f: &mut Frame, state: &AppState, form: &FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(14),
            Constraint::Length(8),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(body[1]);

    draw_header(f, state, chunks[0]);
    draw_form(f, form, body[0]);
    draw_result(f, state, right[0]);
    draw_history(f, state, right[1]);
    draw_logs(f, state, chunks[2]);
    draw_notice(f, form, chunks[3]);
    draw_footer(f, form, chunks[4]);
}

fn draw_header(f: &mut Frame, state: &AppState, area: Rect) {
    let line = Line::from(vec![
        Span::raw(" Model: "),
        Span::styled(state.model_label.as_str(), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!(
                " | {} categorical \u{00b7} {} numerical",
                state.categorical_columns, state.numerical_columns
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(format!(" | Predictions: {}", state.submissions)),
        Span::raw(format!(" | Up: {}", state.uptime())),
    ]);

    let block = Block::default()
        .title(Span::styled(
            " Listing Price Predictor ",
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_form(f: &mut Frame, form: &FormState, area: Rect) {
    let rows: Vec<Row> = form
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let value_str = if form.editing && i == form.selected_field {
                format!("{}\u{258f}", form.edit_buffer) // show cursor
            } else if let FieldType::Choice(_) = &field.field_type {
                format!("\u{25c0} {} \u{25b6}", field.value)
            } else {
                field.value.clone()
            };
            let value_style = if field.read_only {
                Style::default().fg(Color::DarkGray)
            } else if i == form.selected_field {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(field.label.clone()),
                Cell::from(value_str).style(value_style),
                Cell::from(field.hint()).style(Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(45),
            Constraint::Percentage(35),
            Constraint::Percentage(20),
        ],
    )
    .block(Block::default().borders(Borders::ALL).title(" Listing "))
    .row_highlight_style(Style::default().bg(Color::DarkGray));
    let mut table_state = TableState::default();
    table_state.select(Some(form.selected_field));
    f.render_stateful_widget(table, area, &mut table_state);
}

fn draw_result(f: &mut Frame, state: &AppState, area: Rect) {
    let max_width = area.width.saturating_sub(4) as usize;
    let line = match &state.last_result {
        None => Line::from(Span::styled(
            " Press [s] to predict",
            Style::default().fg(Color::DarkGray),
        )),
        Some(ResultView::Success(text)) => Line::from(Span::styled(
            format!(" {}", text),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Some(ResultView::Failure(err)) => Line::from(Span::styled(
            format!(" {}", truncate_with_ellipsis(err, max_width)),
            Style::default().fg(Color::Red),
        )),
    };
    let block = Block::default().borders(Borders::ALL).title(" Result ");
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_history(f: &mut Frame, state: &AppState, area: Rect) {
    let visible = area.height.saturating_sub(3) as usize;
    let rows: Vec<Row> = state
        .history
        .iter()
        .rev()
        .take(visible)
        .map(|p| {
            let filled = if p.backfilled > 0 {
                format!("+{}", p.backfilled)
            } else {
                String::new()
            };
            Row::new(vec![
                Cell::from(p.time.clone()),
                Cell::from(p.summary.clone()),
                Cell::from(p.price.clone()).style(Style::default().fg(Color::Green)),
                Cell::from(filled).style(Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let header = Row::new(vec!["Time", "Listing", "Price", "Def"])
        .style(Style::default().fg(Color::Yellow));
    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Min(10),
            Constraint::Length(10),
            Constraint::Length(3),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(" History "));
    f.render_widget(table, area);
}

fn draw_logs(f: &mut Frame, state: &AppState, area: Rect) {
    let max_width = area.width.saturating_sub(2) as usize; // borders
    let visible_lines = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = state
        .logs
        .iter()
        .rev()
        .take(visible_lines)
        .map(|l| {
            let color = match l.level.as_str() {
                "ERROR" => Color::Red,
                "WARN" => Color::Yellow,
                "PRED" => Color::Cyan,
                _ => Color::DarkGray,
            };
            let prefix = format!(" {} [{}] ", l.time, l.level);
            let msg_max = max_width.saturating_sub(prefix.len());
            let msg = truncate_with_ellipsis(&l.message, msg_max);
            Line::from(vec![
                Span::styled(prefix, Style::default().fg(color)),
                Span::raw(msg.into_owned()),
            ])
        })
        .collect();

    let block = Block::default().title(" Log ").borders(Borders::ALL);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_notice(f: &mut Frame, form: &FormState, area: Rect) {
    let Some(notice) = &form.notice else { return };
    let max_width = area.width.saturating_sub(2) as usize;
    let para = Paragraph::new(format!("  {}", truncate_with_ellipsis(notice, max_width)))
        .style(Style::default().fg(Color::Yellow));
    f.render_widget(para, area);
}

fn draw_footer(f: &mut Frame, form: &FormState, area: Rect) {
    let line = if form.editing {
        Line::from(vec![
            Span::styled("  [Enter]", Style::default().fg(Color::Yellow)),
            Span::raw(" confirm  "),
            Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
            Span::raw(" cancel  "),
            Span::raw("type to edit"),
        ])
    } else {
        Line::from(vec![
            Span::styled("  [s]", Style::default().fg(Color::Yellow)),
            Span::raw("ubmit  "),
            Span::styled("[q]", Style::default().fg(Color::Yellow)),
            Span::raw("uit  "),
            Span::styled("[\u{2191}\u{2193}]", Style::default().fg(Color::Yellow)),
            Span::raw(" fields  "),
            Span::styled("[\u{2190}\u{2192}]", Style::default().fg(Color::Yellow)),
            Span::raw(" step/choose  "),
            Span::styled("[Enter]", Style::default().fg(Color::Yellow)),
            Span::raw(" edit  "),
        ])
    };
    f.render_widget(Paragraph::new(line), area);
}

/// Fit `s` into `max_width` characters, marking a cut with "...".
fn truncate_with_ellipsis(s: &str, max_width: usize) -> Cow<'_, str> {
    if s.chars().count() <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width <= 3 {
        return Cow::Owned(".".repeat(max_width));
    }
    let cut = s.char_indices().nth(max_width - 3).map_or(s.len(), |(i, _)| i);
    Cow::Owned(format!("{}...", &s[..cut]))
}

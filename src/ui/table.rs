use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::types::ViewPhase;
use crate::format::BadgeStyle;
use crate::view::projection::{COLUMNS, LINK_PRESENT, Projection, RowView, row_checkbox};

const WIDTHS: [Constraint; 8] = [
    Constraint::Length(3),
    Constraint::Length(8),
    Constraint::Length(11),
    Constraint::Min(24),
    Constraint::Length(18),
    Constraint::Length(11),
    Constraint::Length(10),
    Constraint::Length(8),
];

/// Title column width used when truncating; the column itself flexes
const TITLE_WIDTH: usize = 48;
const AGENCY_WIDTH: usize = 18;

pub fn badge_color(style: BadgeStyle) -> Color {
    match style {
        BadgeStyle::Service => Color::Blue,
        BadgeStyle::Construction => Color::Green,
        BadgeStyle::Goods => Color::Magenta,
        BadgeStyle::Neutral => Color::Gray,
    }
}

/// Cut `text` to at most `max` columns, ending with `…` when shortened
pub fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

fn build_row(row: &RowView) -> Row<'static> {
    let check_style = if row.checked {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let link_style = if row.link == LINK_PRESENT {
        Style::default().fg(Color::Blue)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let title = Line::from(vec![
        Span::styled(
            truncate(&row.title, TITLE_WIDTH),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", row.notice_no),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let mut built = Row::new(vec![
        Cell::from(row_checkbox(row.checked)).style(check_style),
        Cell::from(Span::styled(
            row.category.clone(),
            Style::default()
                .fg(badge_color(row.badge))
                .add_modifier(Modifier::BOLD),
        )),
        Cell::from(row.announced.clone()),
        Cell::from(title),
        Cell::from(truncate(&row.agency, AGENCY_WIDTH)).style(Style::default().fg(Color::Gray)),
        Cell::from(row.closes.clone()),
        Cell::from(row.price.clone()),
        Cell::from(row.link).style(link_style),
    ]);

    if row.checked {
        built = built.style(Style::default().bg(Color::Rgb(20, 40, 70)));
    }
    built
}

/// Draw the result table, or the idle/empty placeholder
pub fn render_results(
    frame: &mut Frame,
    area: Rect,
    projection: &Projection,
    state: &mut TableState,
) {
    let title = match &projection.count_label {
        Some(label) if projection.selected > 0 => {
            format!(" 검색 결과 {} (선택 {}) ", label, projection.selected)
        }
        Some(label) => format!(" 검색 결과 {} ", label),
        None => " 검색 결과 ".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if projection.rows.is_empty() {
        let text = match projection.phase {
            ViewPhase::Idle | ViewPhase::Searching => "검색 조건을 입력하고 / 키로 검색하세요.",
            _ => "검색 결과가 없습니다.",
        };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let header = Row::new(COLUMNS.iter().enumerate().map(|(i, name)| {
        let text = if i == 0 {
            projection.header_checkbox()
        } else {
            *name
        };
        Cell::from(text).style(header_style)
    }))
    .height(1);

    let rows: Vec<Row> = projection.rows.iter().map(build_row).collect();

    let table = Table::new(rows, WIDTHS)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    frame.render_stateful_widget(table, area, state);
}

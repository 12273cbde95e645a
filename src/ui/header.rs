use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tui_input::Input;
use unicode_width::UnicodeWidthStr;

use crate::app::form::{FormField, SearchForm};

/// Title bar with the app name on the left and the clock on the right
pub fn render_title(frame: &mut Frame, area: Rect, app_name: &str, clock: &str) {
    let [left, right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(clock.width() as u16 + 2)])
            .areas(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", app_name),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  조회 · 선택 · 삭제 · 엑셀 저장", Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(title, left);
    frame.render_widget(
        Paragraph::new(Span::styled(clock.to_string(), Style::default().fg(Color::Gray))),
        right,
    );
}

fn field_style(form: &SearchForm, field: FormField) -> Style {
    if form.is_active() && form.focus() == field {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

fn label(text: &str) -> Span<'static> {
    Span::styled(format!("{} ", text), Style::default().fg(Color::Cyan))
}

/// The filter bar. Places the terminal cursor in the focused date input.
pub fn render_search_form(frame: &mut Frame, area: Rect, form: &SearchForm, agencies: &[String]) {
    let border = if form.is_active() {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(if form.is_active() {
            " 검색 조건 (Tab: 이동, ←/→: 변경, Enter: 검색, ESC: 닫기) "
        } else {
            " 검색 조건 "
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let start = form.start_input().value();
    let end = form.end_input().value();
    let mut spans = vec![
        label("시작일"),
        Span::styled(format!(" {} ", start), field_style(form, FormField::StartDate)),
        Span::raw("  "),
        label("종료일"),
        Span::styled(format!(" {} ", end), field_style(form, FormField::EndDate)),
        Span::raw("  "),
        label("입찰구분"),
        Span::styled(
            format!(" ◀ {} ▶ ", form.bid_type_label()),
            field_style(form, FormField::BidType),
        ),
        Span::raw("  "),
        label("기관"),
        Span::styled(
            format!(" ◀ {} ▶ ", form.agency_label(agencies)),
            field_style(form, FormField::Agency),
        ),
    ];
    if !form.is_active() {
        spans.push(Span::styled(
            "   / 키로 편집",
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);

    if form.is_active() {
        // Offsets: label, one pad column, then the input text
        let start_x = "시작일 ".width() + 1;
        let end_x = start_x + start.width() + 1 + 2 + "종료일 ".width() + 1;
        let cursor = match form.focus() {
            FormField::StartDate => Some(cursor_at(inner, start_x, form.start_input())),
            FormField::EndDate => Some(cursor_at(inner, end_x, form.end_input())),
            _ => None,
        };
        if let Some(position) = cursor {
            frame.set_cursor_position(position);
        }
    }
}

fn cursor_at(area: Rect, offset: usize, input: &Input) -> Position {
    let x = area.x as usize + offset + input.visual_cursor();
    Position::new(x.min((area.x + area.width.saturating_sub(1)) as usize) as u16, area.y)
}

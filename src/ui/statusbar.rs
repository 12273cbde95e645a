use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::input::{Command, KeyMap};
use crate::view::Projection;

fn hint(keymap: &KeyMap, cmd: Command, text: &str) -> Vec<Span<'static>> {
    vec![
        Span::styled(
            keymap.hint(cmd),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(": {}  ", text)),
    ]
}

/// Row position plus the key hints for the table view
pub fn render_statusbar(
    frame: &mut Frame,
    area: Rect,
    projection: &Projection,
    cursor: Option<usize>,
    keymap: &KeyMap,
) {
    let position = match (cursor, projection.rows.len()) {
        (_, 0) => "Row 0/0".to_string(),
        (Some(i), n) => format!("Row {}/{}", i + 1, n),
        (None, n) => format!("Row -/{}", n),
    };

    let mut first = vec![
        Span::styled(
            position,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
    ];
    if let Some(busy) = projection.busy {
        first.push(Span::styled(
            busy,
            Style::default().fg(Color::Yellow),
        ));
        first.push(Span::raw(" | "));
    }
    first.extend(hint(keymap, Command::Search, "검색"));
    first.extend(hint(keymap, Command::Down, "아래"));
    first.extend(hint(keymap, Command::Up, "위"));
    first.extend(hint(keymap, Command::Quit, "종료"));

    let mut second = Vec::new();
    second.extend(hint(keymap, Command::ToggleRow, "선택"));
    second.extend(hint(keymap, Command::ToggleAll, "전체 토글"));
    second.extend(hint(keymap, Command::SelectAll, "전체 선택"));
    second.extend(hint(keymap, Command::Delete, "선택 삭제"));
    second.extend(hint(keymap, Command::Export, "엑셀 저장"));

    let status = Paragraph::new(vec![Line::from(first), Line::from(second)])
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL).title("Status"));

    frame.render_widget(status, area);
}

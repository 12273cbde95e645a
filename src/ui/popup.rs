use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::types::{Feedback, MessageType};

const TOAST_MAX_WIDTH: usize = 60;

fn toast_style(message_type: MessageType) -> (Color, &'static str, &'static str) {
    match message_type {
        MessageType::Success => (Color::Green, "✓", "완료"),
        MessageType::Error => (Color::Red, "✗", "오류"),
        MessageType::Info => (Color::Blue, "ℹ", "알림"),
        MessageType::Warning => (Color::Yellow, "⚠", "확인"),
    }
}

/// Feedback toast in the top-right corner
pub fn render_feedback(frame: &mut Frame, area: Rect, feedback: &Feedback) {
    let (color, icon, title) = toast_style(feedback.message_type);

    let heading = format!("{} {}", icon, title);
    let content_width = heading
        .width()
        .max(feedback.message.width())
        .min(TOAST_MAX_WIDTH)
        .min(area.width.saturating_sub(8) as usize)
        .max(1);
    let wrapped = wrap_text(&feedback.message, content_width);

    let width = (content_width + 6) as u16;
    let height = (wrapped.len() as u16 + 6).min(area.height.saturating_sub(2));
    let toast_area = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + 1,
        width: width.min(area.width),
        height,
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            heading,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(
        wrapped
            .into_iter()
            .map(|line| Line::from(Span::styled(line, Style::default().fg(Color::White)))),
    );

    let toast = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(Color::Black)),
    );

    frame.render_widget(Clear, toast_area);
    frame.render_widget(toast, toast_area);
}

/// Centered yes/no dialog
pub fn render_confirm(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let width = 60.min(area.width.saturating_sub(4));
    let height = 7.min(area.height);
    let popup = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::raw("y: 확인  |  n/ESC: 취소")),
        Line::from(""),
    ];

    let dialog = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .style(Style::default().bg(Color::Black))
                .title(title.to_string()),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, popup);
    frame.render_widget(dialog, popup);
}

/// Greedy word wrap measured in terminal columns. Words wider than the
/// line are split by character.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if word.width() > max_width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut chunk = String::new();
            for ch in word.chars() {
                if chunk.width() + ch.width().unwrap_or(0) > max_width {
                    lines.push(std::mem::take(&mut chunk));
                }
                chunk.push(ch);
            }
            current = chunk;
            continue;
        }

        let needed = if current.is_empty() {
            word.width()
        } else {
            current.width() + 1 + word.width()
        };

        if needed <= max_width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_short_text() {
        assert_eq!(wrap_text("hello world", 20), vec!["hello world"]);
    }

    #[test]
    fn test_wrap_counts_wide_chars() {
        // Each Hangul syllable takes two columns
        let lines = wrap_text("삭제할 항목을 선택해주세요.", 14);
        assert_eq!(lines, vec!["삭제할 항목을", "선택해주세요."]);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_empty() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }
}

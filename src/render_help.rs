use crate::tui_mode::app::App;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn help_text() -> Vec<Line<'static>> {
    let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED);

    vec![
        Line::from(Span::styled("pocketcalc", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled("Operators:", heading)),
        Line::from("  + : Addition        (5 + 3 = 8)"),
        Line::from("  - : Subtraction     (10 - 4 = 6)"),
        Line::from("  × : Multiplication  (6 × 7 = 42)"),
        Line::from("  ÷ : Division        (15 ÷ 3 = 5)"),
        Line::from("  ^ : Power           (2 ^ 3 = 8)"),
        Line::from("  ( ) : Grouping      ((2 + 3) × 4 = 20)"),
        Line::from(""),
        Line::from(Span::styled("Percent and modulo:", heading)),
        Line::from("  A % followed by a number or ( is modulo:  17 % 5 = 2"),
        Line::from("  Otherwise it is a percentage:             50% = 0.5"),
        Line::from("  The % button turns the last number into its percentage."),
        Line::from(""),
        Line::from(Span::styled("Keys:", heading)),
        Line::from("  0-9 . + - * / ^ % ( ) : Type expression (x also multiplies)"),
        Line::from("  Enter or =            : Evaluate"),
        Line::from("  Backspace             : Delete last character"),
        Line::from("  Esc, Delete or c      : Clear expression (history is kept)"),
        Line::from("  a                     : Insert last answer (ANS)"),
        Line::from("  n                     : Toggle sign of last number (+/-)"),
        Line::from("  ↑ ↓ PgUp PgDn, wheel  : Scroll history"),
        Line::from("  F1 or ?               : Show this help"),
        Line::from("  q or Ctrl+C           : Quit"),
        Line::from(""),
        Line::from(Span::styled("Mouse:", heading)),
        Line::from("  Click the keypad buttons."),
        Line::from(""),
        Line::from(Span::styled("Press Esc to close", Style::default().fg(Color::DarkGray))),
    ]
}

/// Number of lines in the help text, before wrapping.
pub fn help_line_count() -> usize {
    help_text().len()
}

pub fn render_help(frame: &mut Frame, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(Color::Black));

    let scroll = u16::try_from(app.help_scroll).unwrap_or(u16::MAX);

    let paragraph = Paragraph::new(help_text())
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
        .scroll((scroll, 0));

    frame.render_widget(Clear, frame.size());
    frame.render_widget(paragraph, frame.size());
}

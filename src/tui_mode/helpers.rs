use crate::config::Rgb;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Fits `text` into `width` columns keeping its end visible; a leading `<`
/// marks text cut off on the left.
pub fn fit_right(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut tail = Vec::new();
    let mut used = 1;
    for c in text.chars().rev() {
        let w = UnicodeWidthChar::width(c).unwrap_or(1);
        if used + w > width {
            break;
        }
        used += w;
        tail.push(c);
    }

    let mut fitted = String::from("<");
    fitted.extend(tail.into_iter().rev());
    fitted
}

fn is_operator(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '^' | '%' | '×' | '÷')
}

/// Splits an expression into styled spans: numbers, operators and the rest.
pub fn highlight_expression(expr: &str, base_style: Style) -> Vec<Span<'static>> {
    let operator_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let number_style = Style::default()
        .fg(Color::LightGreen);

    let mut spans = Vec::new();
    let mut number = String::new();
    let mut prev = '\0';

    for c in expr.chars() {
        let exponent_sign = (c == '-' || c == '+') && matches!(prev, 'e' | 'E') && !number.is_empty();
        if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || exponent_sign {
            number.push(c);
        } else {
            if !number.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut number), number_style));
            }
            let style = if is_operator(c) { operator_style } else { base_style };
            spans.push(Span::styled(c.to_string(), style));
        }
        prev = c;
    }

    if !number.is_empty() {
        spans.push(Span::styled(number, number_style));
    }

    spans
}

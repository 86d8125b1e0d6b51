//! Clickable button grid.
//!
//! ```text
//! C   ⌫   (   )   %
//! 7   8   9   ÷   ^
//! 4   5   6   ×   ANS
//! 1   2   3   -   +/-
//! 0   .   =   +
//! ```

use crate::config::{ButtonColors, Theme};
use crate::session::Command;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::helpers::color;

pub const ROWS: usize = 5;
pub const COLS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Number,
    Operator,
    Equals,
    Danger,
    Special,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub kind: ButtonKind,
    pub command: Command,
}

const fn button(label: &'static str, kind: ButtonKind, command: Command) -> Option<Button> {
    Some(Button { label, kind, command })
}

const fn number(label: &'static str, c: char) -> Option<Button> {
    button(label, ButtonKind::Number, Command::Append(c))
}

const fn operator(label: &'static str, c: char) -> Option<Button> {
    button(label, ButtonKind::Operator, Command::Append(c))
}

static GRID: [[Option<Button>; COLS]; ROWS] = [
    [
        button("C", ButtonKind::Danger, Command::Clear),
        button("⌫", ButtonKind::Danger, Command::Backspace),
        operator("(", '('),
        operator(")", ')'),
        button("%", ButtonKind::Operator, Command::Percent),
    ],
    [number("7", '7'), number("8", '8'), number("9", '9'), operator("÷", '/'), operator("^", '^')],
    [
        number("4", '4'),
        number("5", '5'),
        number("6", '6'),
        operator("×", '*'),
        button("ANS", ButtonKind::Special, Command::Answer),
    ],
    [
        number("1", '1'),
        number("2", '2'),
        number("3", '3'),
        operator("-", '-'),
        button("+/-", ButtonKind::Special, Command::ToggleSign),
    ],
    [
        number("0", '0'),
        number(".", '.'),
        button("=", ButtonKind::Equals, Command::Evaluate),
        operator("+", '+'),
        None,
    ],
];

#[derive(Debug, Clone, Default)]
pub struct Keypad {
    pressed: Option<(usize, usize)>,
}

impl Keypad {
    pub fn new() -> Self {
        Keypad { pressed: None }
    }

    pub fn button_at(&self, row: usize, col: usize) -> Option<Button> {
        GRID.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// Grid position of the button issuing `command`.
    pub fn find(&self, command: Command) -> Option<(usize, usize)> {
        GRID.iter().enumerate().find_map(|(row, buttons)| {
            buttons
                .iter()
                .position(|b| b.map(|b| b.command) == Some(command))
                .map(|col| (row, col))
        })
    }

    /// Highlights the button for `command`, or nothing when no button issues it.
    pub fn press(&mut self, command: Command) {
        self.pressed = self.find(command);
    }

    pub fn release(&mut self) {
        self.pressed = None;
    }

    pub fn pressed(&self) -> Option<Button> {
        self.pressed.and_then(|(row, col)| self.button_at(row, col))
    }

    /// Maps a click inside the keypad block (borders included) to its button.
    pub fn hit_test(&self, area: Rect, x: u16, y: u16) -> Option<Button> {
        if x < area.x || y < area.y || x >= area.x + area.width || y >= area.y + area.height {
            return None;
        }

        let rel_x = x - area.x;
        let rel_y = y - area.y;
        if rel_x == 0 || rel_y == 0 || rel_x >= area.width - 1 || rel_y >= area.height - 1 {
            return None;
        }

        let btn_width = (area.width - 2) / COLS as u16;
        let btn_height = (area.height - 2) / ROWS as u16;
        if btn_width == 0 || btn_height == 0 {
            return None;
        }

        let col = ((rel_x - 1) / btn_width) as usize;
        let row = ((rel_y - 1) / btn_height) as usize;
        self.button_at(row, col)
    }
}

pub struct KeypadWidget<'a> {
    keypad: &'a Keypad,
    theme: &'a Theme,
}

impl<'a> KeypadWidget<'a> {
    pub fn new(keypad: &'a Keypad, theme: &'a Theme) -> Self {
        KeypadWidget { keypad, theme }
    }

    fn colors(&self, kind: ButtonKind) -> ButtonColors {
        match kind {
            ButtonKind::Number => self.theme.number,
            ButtonKind::Operator => self.theme.operator,
            ButtonKind::Equals => self.theme.equals,
            ButtonKind::Danger => self.theme.danger,
            ButtonKind::Special => self.theme.special,
        }
    }
}

impl Widget for KeypadWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color(self.theme.display_sub_fg)));
        let inner = block.inner(area);
        block.render(area, buf);

        let btn_width = inner.width / COLS as u16;
        let btn_height = inner.height / ROWS as u16;
        if btn_width < 4 || btn_height == 0 {
            return;
        }

        for (row, buttons) in GRID.iter().enumerate() {
            for (col, btn) in buttons.iter().enumerate() {
                let Some(btn) = btn else { continue };

                let colors = self.colors(btn.kind);
                let pressed = self.keypad.pressed == Some((row, col));
                let bg = if pressed { colors.pressed } else { colors.bg };
                let style = Style::default()
                    .fg(color(colors.fg))
                    .bg(color(bg))
                    .add_modifier(Modifier::BOLD);

                // one column of spacing between buttons
                let cell = Rect::new(
                    inner.x + col as u16 * btn_width,
                    inner.y + row as u16 * btn_height,
                    btn_width - 1,
                    btn_height,
                );
                buf.set_style(cell, style);

                let label_width = btn.label.width() as u16;
                let label_x = cell.x + cell.width.saturating_sub(label_width) / 2;
                let label_y = cell.y + cell.height.saturating_sub(1) / 2;
                buf.set_string(label_x, label_y, btn.label, style);
            }
        }
    }
}

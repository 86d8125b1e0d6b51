use super::keypad::Keypad;
use crate::config::Config;
use crate::render_help::help_line_count;
use crate::session::{Command, Session};
use ratatui::layout::Rect;

pub struct App {
    pub session: Session,
    pub keypad: Keypad,
    pub config: Config,
    pub should_quit: bool,
    pub show_help: bool,
    pub help_scroll: usize,
    /// Entries skipped from the top of the newest-first history list.
    pub history_scroll: usize,
    /// Where the keypad was last drawn, for mouse hit testing.
    pub keypad_area: Rect,
    pub terminal_too_small: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        App {
            session: Session::new(),
            keypad: Keypad::new(),
            config,
            should_quit: false,
            show_help: false,
            help_scroll: 0,
            history_scroll: 0,
            keypad_area: Rect::default(),
            terminal_too_small: false,
        }
    }

    pub fn apply(&mut self, command: Command) {
        self.keypad.press(command);
        self.session.apply(command);
        if command == Command::Evaluate {
            self.history_scroll = 0;
        }
    }

    /// Presses the keypad button under the mouse, if any.
    pub fn click(&mut self, x: u16, y: u16) {
        if let Some(button) = self.keypad.hit_test(self.keypad_area, x, y) {
            self.apply(button.command);
        }
    }

    pub fn scroll_history(&mut self, delta: isize) {
        let max = self.session.history().len().saturating_sub(1);
        self.history_scroll = self.history_scroll.saturating_add_signed(delta).min(max);
    }

    pub fn scroll_help(&mut self, delta: isize) {
        let max = help_line_count().saturating_sub(1);
        self.help_scroll = self.help_scroll.saturating_add_signed(delta).min(max);
    }

    pub fn open_help(&mut self) {
        self.show_help = true;
        self.help_scroll = 0;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
        self.help_scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(app: &mut App, input: &str) {
        for c in input.chars() {
            app.apply(Command::Append(c));
        }
    }

    #[test]
    fn apply_highlights_and_updates_session() {
        let mut app = App::new(Config::default());
        type_str(&mut app, "2+2");
        assert_eq!(app.keypad.pressed().map(|b| b.label), Some("2"));

        app.apply(Command::Evaluate);
        assert_eq!(app.session.main_display(), "4");
        assert_eq!(app.keypad.pressed().map(|b| b.label), Some("="));
    }

    #[test]
    fn click_presses_the_button_under_the_mouse() {
        let mut app = App::new(Config::default());
        app.keypad_area = Rect::new(0, 10, 37, 12);

        app.click(2, 13); // 7
        app.click(15, 20); // =
        assert_eq!(app.session.history().len(), 1);
        assert_eq!(app.session.expression(), "7");

        app.click(50, 50);
        assert_eq!(app.session.expression(), "7");
    }

    #[test]
    fn history_scroll_is_clamped() {
        let mut app = App::new(Config::default());
        app.scroll_history(3);
        assert_eq!(app.history_scroll, 0);

        for expr in ["1+1", "2+2", "3+3"] {
            app.apply(Command::Clear);
            type_str(&mut app, expr);
            app.apply(Command::Evaluate);
        }
        app.scroll_history(10);
        assert_eq!(app.history_scroll, 2);
        app.scroll_history(-1);
        assert_eq!(app.history_scroll, 1);

        app.apply(Command::Evaluate);
        assert_eq!(app.history_scroll, 0);
    }

    #[test]
    fn help_scroll_is_clamped() {
        let mut app = App::new(Config::default());
        app.open_help();
        app.scroll_help(-4);
        assert_eq!(app.help_scroll, 0);
        app.scroll_help(isize::MAX);
        assert_eq!(app.help_scroll, help_line_count() - 1);

        app.close_help();
        assert_eq!(app.help_scroll, 0);
    }
}

use super::app::App;
use super::helpers::{color, fit_right, highlight_expression};
use super::keypad::KeypadWidget;
use crate::render_help::render_help;
use crate::session::Command;
use anyhow::Result;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::info;

pub fn run_ui_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| {
            if app.show_help {
                render_help(f, app);
            } else {
                ui(f, app);
            }
        })?;

        if app.should_quit {
            info!(evaluations = app.session.history().len(), "quitting");
            break;
        }

        if crossterm::event::poll(app.config.poll_interval)? {
            match crossterm::event::read()? {
                Event::Key(KeyEvent { code, modifiers, kind, .. }) if kind == KeyEventKind::Press => {
                    handle_key_event(app, code, modifiers);
                }
                Event::Mouse(event) => {
                    handle_mouse_event(app, event);
                }
                _ => {}
            }
        } else {
            app.keypad.release();
        }
    }
    Ok(())
}

pub(crate) fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') | KeyCode::Char('q') = code {
            app.should_quit = true;
        }
        return;
    }

    if app.show_help {
        match code {
            KeyCode::Down => app.scroll_help(1),
            KeyCode::Up => app.scroll_help(-1),
            KeyCode::PageDown => app.scroll_help(10),
            KeyCode::PageUp => app.scroll_help(-10),
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => app.close_help(),
            _ => {}
        }
        return;
    }

    match code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') | KeyCode::F(1) => app.open_help(),
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::ALT) => {
            if let Some(command) = Command::from_char(c) {
                app.apply(command);
            }
        }
        KeyCode::Enter => app.apply(Command::Evaluate),
        KeyCode::Backspace => app.apply(Command::Backspace),
        KeyCode::Esc | KeyCode::Delete => app.apply(Command::Clear),
        KeyCode::Up => app.scroll_history(-1),
        KeyCode::Down => app.scroll_history(1),
        KeyCode::PageUp => app.scroll_history(-5),
        KeyCode::PageDown => app.scroll_history(5),
        _ => {}
    }
}

pub(crate) fn handle_mouse_event(app: &mut App, event: MouseEvent) {
    if app.show_help {
        match event.kind {
            MouseEventKind::ScrollDown => app.scroll_help(3),
            MouseEventKind::ScrollUp => app.scroll_help(-3),
            _ => {}
        }
    } else {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => app.click(event.column, event.row),
            MouseEventKind::ScrollDown => app.scroll_history(1),
            MouseEventKind::ScrollUp => app.scroll_history(-1),
            _ => {}
        }
    }
}

pub(crate) fn ui(frame: &mut Frame, app: &mut App) {
    let terminal_size = frame.size();

    app.terminal_too_small = terminal_size.width < app.config.min_width ||
                             terminal_size.height < app.config.min_height;

    if app.terminal_too_small {
        app.keypad_area = Rect::default();
        render_resize_message(frame, app, terminal_size);
        return;
    }

    let background = Block::default().style(Style::default().bg(color(app.config.theme.background)));
    frame.render_widget(background, terminal_size);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(app.config.keypad_height),
            Constraint::Length(1),
        ])
        .split(terminal_size);

    render_display(frame, app, layout[0]);
    render_history(frame, app, layout[1]);
    frame.render_widget(KeypadWidget::new(&app.keypad, &app.config.theme), layout[2]);
    app.keypad_area = layout[2];
    render_status(frame, layout[3]);
}

fn render_resize_message(frame: &mut Frame, app: &App, area: Rect) {
    let message = format!(
        "Terminal too small! Min size: {}x{}. Current: {}x{}",
        app.config.min_width,
        app.config.min_height,
        area.width,
        area.height
    );

    let text = vec![
        Line::from(Span::styled(
            message,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Please resize your terminal window",
            Style::default().fg(Color::Yellow)
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Resize Required ")
        .title_alignment(Alignment::Center);

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_display(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.config.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color(theme.display_sub_fg)))
        .style(Style::default().bg(color(theme.display_bg)))
        .title(" Calculator ")
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let width = inner_area.width.saturating_sub(1) as usize;
    let sub = fit_right(&app.session.sub_display(), width);
    let main = fit_right(&app.session.main_display(), width);

    let main_style = Style::default()
        .fg(color(theme.display_fg))
        .add_modifier(Modifier::BOLD);
    let main_line = if app.session.main_display() == "Error" {
        Line::from(Span::styled(main, main_style.fg(Color::Red)))
    } else {
        Line::from(highlight_expression(&main, main_style))
    };

    let text = vec![
        Line::from(Span::styled(sub, Style::default().fg(color(theme.display_sub_fg)))),
        main_line,
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Right), inner_area);
}

fn render_history(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.config.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color(theme.display_sub_fg)))
        .style(Style::default().bg(color(theme.panel)))
        .title(" History ")
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let history = app.session.history();
    if history.is_empty() {
        let empty_msg = Paragraph::new("—")
            .style(Style::default().fg(color(theme.display_sub_fg)))
            .alignment(Alignment::Center);
        frame.render_widget(empty_msg, inner_area);
        return;
    }

    app.history_scroll = app.history_scroll.min(history.len().saturating_sub(1));
    let base_style = Style::default().fg(color(theme.display_fg));
    let width = inner_area.width as usize;
    let items: Vec<ListItem> = history
        .iter()
        .rev()
        .skip(app.history_scroll)
        .map(|entry| {
            let line = fit_right(&entry.display(), width);
            let (expr, result) = line.rsplit_once(" = ").unwrap_or((line.as_str(), ""));
            let mut spans = highlight_expression(expr, base_style);
            if !result.is_empty() {
                spans.push(Span::styled(" = ", Style::default().fg(Color::Gray)));
                spans.push(Span::styled(
                    result.to_string(),
                    Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    frame.render_widget(List::new(items), inner_area);
}

fn render_status(frame: &mut Frame, area: Rect) {
    let keys = [
        ("Enter", "="),
        ("Esc", "Clear"),
        ("a", "ANS"),
        ("n", "+/-"),
        ("F1", "Help"),
        ("q", "Quit"),
    ];

    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, desc)| {
            vec![
                Span::styled(
                    *key,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" {} ", desc),
                    Style::default().fg(Color::DarkGray),
                ),
            ]
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::render_help::help_line_count;
    use ratatui::backend::TestBackend;

    fn draw(app: &mut App, width: u16, height: u16) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                if app.show_help {
                    render_help(f, app);
                } else {
                    ui(f, app);
                }
            })
            .unwrap();
    }

    fn draw_row(app: &mut App, width: u16, height: u16, row: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        (0..width).map(|x| buffer.get(x, row).symbol.as_str()).collect()
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, code, KeyModifiers::NONE);
    }

    fn type_keys(app: &mut App, keys: &str) {
        for c in keys.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn keyboard_drives_the_session() {
        let mut app = App::new(Config::default());
        type_keys(&mut app, "12+3");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.session.expression(), "12+");

        type_keys(&mut app, "8");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.main_display(), "20");

        press(&mut app, KeyCode::Esc);
        type_keys(&mut app, "a*2=");
        assert_eq!(app.session.expression(), "40");
    }

    #[test]
    fn shifted_symbols_are_accepted() {
        let mut app = App::new(Config::default());
        handle_key_event(&mut app, KeyCode::Char('('), KeyModifiers::SHIFT);
        type_keys(&mut app, "2");
        handle_key_event(&mut app, KeyCode::Char('^'), KeyModifiers::SHIFT);
        type_keys(&mut app, "3)");
        assert_eq!(app.session.expression(), "(2^3)");
    }

    #[test]
    fn quit_and_help_keys() {
        let mut app = App::new(Config::default());
        press(&mut app, KeyCode::F(1));
        assert!(app.show_help);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.help_scroll, 1);
        type_keys(&mut app, "5");
        assert_eq!(app.session.expression(), "");
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);

        handle_key_event(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn mouse_clicks_use_the_drawn_keypad() {
        let mut app = App::new(Config::default());
        draw(&mut app, 37, 24);
        // 37x24: display 4, history 7, keypad 12, status 1
        assert_eq!(app.keypad_area, Rect::new(0, 11, 37, 12));

        let click = |column, row| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(&mut app, click(2, 14)); // 7
        handle_mouse_event(&mut app, click(29, 12)); // %
        assert_eq!(app.session.expression(), "0.07");
    }

    #[test]
    fn draws_every_state_without_panicking() {
        let mut app = App::new(Config::default());
        draw(&mut app, 40, 30);

        type_keys(&mut app, "1/0=");
        draw(&mut app, 40, 30);

        press(&mut app, KeyCode::Esc);
        for expr in ["2+2=", "123456789*987654321=", "0.1+0.2="] {
            type_keys(&mut app, expr);
        }
        draw(&mut app, 40, 30);
        draw(&mut app, 200, 60);

        press(&mut app, KeyCode::F(1));
        draw(&mut app, 40, 30);
    }

    #[test]
    fn scrolling_moves_the_history_list() {
        let mut app = App::new(Config::default());
        for n in 1..=9 {
            press(&mut app, KeyCode::Esc);
            type_keys(&mut app, &format!("{n}+{n}="));
        }

        // 40x24: display rows 0-3, history border on row 4
        let top = draw_row(&mut app, 40, 24, 5);
        assert!(top.contains("9+9 = 18"), "{top}");

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        let scrolled = draw_row(&mut app, 40, 24, 5);
        assert!(scrolled.contains("6+6 = 12"), "{scrolled}");

        press(&mut app, KeyCode::PageDown);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.history_scroll, 8);
        let oldest = draw_row(&mut app, 40, 24, 5);
        assert!(oldest.contains("1+1 = 2"), "{oldest}");
    }

    #[test]
    fn help_scroll_stops_at_the_end_of_the_text() {
        let mut app = App::new(Config::default());
        press(&mut app, KeyCode::F(1));
        for _ in 0..100 {
            press(&mut app, KeyCode::PageDown);
        }
        assert_eq!(app.help_scroll, help_line_count() - 1);
        draw(&mut app, 40, 30);

        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.help_scroll, help_line_count() - 11);
    }

    #[test]
    fn small_terminal_shows_resize_message() {
        let mut app = App::new(Config::default());
        draw(&mut app, 20, 10);
        assert!(app.terminal_too_small);
        assert_eq!(app.keypad_area, Rect::default());
    }
}

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

use crate::config::AppConfig;
use crate::score::{ScoreController, ScoreEvent, ScoreSnapshot, PRESET_INCREMENTS};
use crate::theme::Theme;

/// Seconds before a status message clears itself
const STATUS_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Add,
    Subtract,
    SetScore,    // Text field for typing any score
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
    ConfirmReset,
}

pub struct App {
    pub section: Section,
    pub popup: Popup,

    pub controller: ScoreController,

    // Selected preset in each button grid
    pub selected_add: usize,
    pub selected_subtract: usize,

    pub config: AppConfig,
    pub theme: Theme,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    // Requests picked up by the main loop
    pub should_quit: bool,
    pub suspend_requested: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self::restore(config, ScoreSnapshot::default())
    }

    /// Rebuild the app around a controller snapshot (fresh view, same score state)
    pub fn restore(config: AppConfig, snapshot: ScoreSnapshot) -> Self {
        let theme = Theme::from_config(&config.theme);
        Self {
            section: Section::Add,
            popup: Popup::None,

            controller: ScoreController::restore(snapshot),

            selected_add: 0,
            selected_subtract: 0,

            config,
            theme,

            status_message: None,
            status_message_time: None,

            should_quit: false,
            suspend_requested: false,
        }
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        self.controller.snapshot()
    }

    /// Set a status message (auto-clears after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('z') => {
                    self.suspend_requested = true;
                    return;
                }
                _ => {}
            }
        }

        // Handle popups first
        if self.popup != Popup::None {
            return self.handle_popup_key(key);
        }

        if self.section == Section::SetScore {
            return self.handle_input_key(key);
        }

        self.handle_normal_key(key)
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.next_section(),
            KeyCode::BackTab => self.prev_section(),

            KeyCode::Left => self.move_selection(-1),
            KeyCode::Right => self.move_selection(1),
            KeyCode::Up => self.move_row(-1),
            KeyCode::Down => self.move_row(1),

            KeyCode::Char(' ') | KeyCode::Enter => {
                let index = self.selected_index();
                self.press(index);
            }

            // Direct preset access: 1 = first button, 7 = last
            KeyCode::Char(c @ '1'..='7') => {
                let index = (c as usize) - ('1' as usize);
                self.set_selected_index(index);
                self.press(index);
            }

            KeyCode::Char('s') => self.section = Section::SetScore,
            KeyCode::Char('r') => self.request_reset(),
            KeyCode::Char('?') => self.popup = Popup::Help,
            KeyCode::Char('q') => self.should_quit = true,

            _ => {}
        }
    }

    /// Keys while the set-score field has focus
    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.section = Section::Add,
            KeyCode::Tab => self.next_section(),
            KeyCode::BackTab => self.prev_section(),
            KeyCode::Enter => self.commit_text(),
            KeyCode::Backspace => {
                let mut text = self.controller.pending_text().to_string();
                if text.pop().is_some() {
                    self.controller.apply(ScoreEvent::TextChanged(text));
                }
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if !self.controller.pending_text().is_empty() {
                    self.controller.apply(ScoreEvent::TextChanged(String::new()));
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let mut text = self.controller.pending_text().to_string();
                text.push(c);
                self.controller.apply(ScoreEvent::TextChanged(text));
            }
            _ => {}
        }
    }

    fn handle_popup_key(&mut self, key: KeyEvent) {
        match self.popup {
            Popup::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter | KeyCode::Char('q')) {
                    self.popup = Popup::None;
                }
            }
            Popup::ConfirmReset => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    self.popup = Popup::None;
                    self.reset();
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    self.popup = Popup::None;
                    self.set_status("Reset cancelled");
                }
                _ => {}
            },
            Popup::None => {}
        }
    }

    fn next_section(&mut self) {
        self.section = match self.section {
            Section::Add => Section::Subtract,
            Section::Subtract => Section::SetScore,
            Section::SetScore => Section::Add,
        };
    }

    fn prev_section(&mut self) {
        self.section = match self.section {
            Section::Add => Section::SetScore,
            Section::Subtract => Section::Add,
            Section::SetScore => Section::Subtract,
        };
    }

    /// Selected preset of the focused grid
    pub fn selected_index(&self) -> usize {
        match self.section {
            Section::Subtract => self.selected_subtract,
            _ => self.selected_add,
        }
    }

    fn set_selected_index(&mut self, index: usize) {
        match self.section {
            Section::Add => self.selected_add = index,
            Section::Subtract => self.selected_subtract = index,
            Section::SetScore => {}
        }
    }

    /// Move the grid selection, wrapping around the ends
    fn move_selection(&mut self, step: isize) {
        let len = PRESET_INCREMENTS.len() as isize;
        let current = self.selected_index() as isize;
        let next = (current + step).rem_euclid(len);
        self.set_selected_index(next as usize);
    }

    /// Move up or down one grid row, keeping the column where the target row allows.
    /// Stops at the first and last rows.
    fn move_row(&mut self, step: isize) {
        let per_row = self.config.buttons_per_row.max(1);
        let len = PRESET_INCREMENTS.len();
        let last_row = (len - 1) / per_row;

        let current = self.selected_index();
        let (row, col) = (current / per_row, current % per_row);
        let target_row = (row as isize + step).clamp(0, last_row as isize) as usize;

        let row_len = (len - target_row * per_row).min(per_row);
        let next = target_row * per_row + col.min(row_len - 1);
        self.set_selected_index(next);
    }

    fn press(&mut self, index: usize) {
        let Some(&delta) = PRESET_INCREMENTS.get(index) else {
            return;
        };
        match self.section {
            Section::Add => self.controller.apply(ScoreEvent::Add(delta)),
            Section::Subtract => self.controller.apply(ScoreEvent::Subtract(delta)),
            Section::SetScore => {}
        }
    }

    fn commit_text(&mut self) {
        self.controller.apply(ScoreEvent::CommitText);
        if self.controller.input_error() {
            self.set_status("Please enter a whole number.");
        } else {
            self.set_status(format!("Score set to {}", self.controller.score()));
        }
    }

    fn request_reset(&mut self) {
        if self.config.confirm_reset {
            self.popup = Popup::ConfirmReset;
        } else {
            self.reset();
        }
    }

    fn reset(&mut self) {
        self.controller.apply(ScoreEvent::Reset);
        self.set_status("Score reset to 0");
    }

    pub fn tick(&mut self) {
        // Clear status message after timeout
        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= STATUS_TIMEOUT_SECS {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_press_selected_buttons() {
        let mut app = App::new(AppConfig::default());

        app.handle_key(key(KeyCode::Enter));          // +1
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Char(' ')));      // +5
        assert_eq!(app.controller.score(), 6);

        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.section, Section::Subtract);
        app.handle_key(key(KeyCode::Left));           // wraps to 100
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.controller.score(), -94);
    }

    #[test]
    fn test_digit_shortcuts() {
        let mut app = App::new(AppConfig::default());
        app.handle_key(key(KeyCode::Char('7')));
        app.handle_key(key(KeyCode::Char('4')));
        assert_eq!(app.controller.score(), 110);
        assert_eq!(app.selected_add, 3);

        app.section = Section::Subtract;
        app.handle_key(key(KeyCode::Char('6')));
        assert_eq!(app.controller.score(), 60);
        assert_eq!(app.selected_subtract, 5);
    }

    #[test]
    fn test_up_down_move_by_row() {
        // Default grid: [+1 +2 +5 +10] / [+20 +50 +100]
        let mut app = App::new(AppConfig::default());
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected_add, 4);
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selected_add, 0);

        // Up on the first row stays put
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selected_add, 0);

        // Down on the last row stays put, column kept
        app.selected_add = 5;
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected_add, 5);
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selected_add, 1);

        // Column past the end of the shorter row lands on its last button
        app.selected_add = 3;
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected_add, 6);
    }

    #[test]
    fn test_up_down_with_three_per_row() {
        // Grid: [+1 +2 +5] / [+10 +20 +50] / [+100]
        let config = AppConfig { buttons_per_row: 3, ..Default::default() };
        let mut app = App::new(config);
        app.section = Section::Subtract;
        app.selected_subtract = 2;
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected_subtract, 5);
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected_subtract, 6);
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selected_subtract, 3);
    }

    #[test]
    fn test_typing_and_commit() {
        let mut app = App::new(AppConfig::default());
        app.handle_key(key(KeyCode::Char('s')));
        assert_eq!(app.section, Section::SetScore);

        // Keys that are shortcuts elsewhere are plain text here
        type_text(&mut app, "-1q7");
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Backspace));
        type_text(&mut app, "7");
        assert_eq!(app.controller.pending_text(), "-17");
        assert!(!app.should_quit);

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.controller.score(), -17);
        assert_eq!(app.status_message.as_deref(), Some("Score set to -17"));
    }

    #[test]
    fn test_invalid_commit_then_edit_clears_error() {
        let mut app = App::new(AppConfig::default());
        app.controller.add(5);
        app.section = Section::SetScore;
        type_text(&mut app, "abc");
        app.handle_key(key(KeyCode::Enter));
        assert!(app.controller.input_error());
        assert_eq!(app.controller.score(), 5);
        assert_eq!(app.status_message.as_deref(), Some("Please enter a whole number."));

        app.handle_key(key(KeyCode::Backspace));
        assert!(!app.controller.input_error());
    }

    #[test]
    fn test_ctrl_u_clears_text() {
        let mut app = App::new(AppConfig::default());
        app.section = Section::SetScore;
        type_text(&mut app, "123");
        app.handle_key(ctrl('u'));
        assert_eq!(app.controller.pending_text(), "");
    }

    #[test]
    fn test_ctrl_u_on_empty_text_keeps_error() {
        let mut app = App::new(AppConfig::default());
        app.section = Section::SetScore;
        app.handle_key(key(KeyCode::Enter));
        assert!(app.controller.input_error());

        app.handle_key(ctrl('u'));
        assert!(app.controller.input_error());
        app.handle_key(key(KeyCode::Backspace));
        assert!(app.controller.input_error());
    }

    #[test]
    fn test_escape_leaves_input() {
        let mut app = App::new(AppConfig::default());
        app.section = Section::SetScore;
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.section, Section::Add);
    }

    #[test]
    fn test_reset_without_confirmation() {
        let mut app = App::new(AppConfig::default());
        app.handle_key(key(KeyCode::Char('7')));
        app.section = Section::SetScore;
        type_text(&mut app, "draft");
        app.section = Section::Add;

        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.controller.score(), 0);
        assert_eq!(app.controller.pending_text(), "");
        assert_eq!(app.popup, Popup::None);
    }

    #[test]
    fn test_reset_with_confirmation() {
        let config = AppConfig { confirm_reset: true, ..Default::default() };
        let mut app = App::new(config);
        app.handle_key(key(KeyCode::Char('5')));

        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.popup, Popup::ConfirmReset);
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.popup, Popup::None);
        assert_eq!(app.controller.score(), 20);

        app.handle_key(key(KeyCode::Char('r')));
        app.handle_key(key(KeyCode::Char('y')));
        assert_eq!(app.controller.score(), 0);
    }

    #[test]
    fn test_popup_swallows_keys() {
        let mut app = App::new(AppConfig::default());
        app.handle_key(key(KeyCode::Char('?')));
        assert_eq!(app.popup, Popup::Help);
        app.handle_key(key(KeyCode::Char('3')));
        assert_eq!(app.controller.score(), 0);
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.popup, Popup::None);
    }

    #[test]
    fn test_quit_and_suspend_requests() {
        let mut app = App::new(AppConfig::default());
        app.section = Section::SetScore;
        app.handle_key(ctrl('z'));
        assert!(app.suspend_requested);
        app.handle_key(ctrl('c'));
        assert!(app.should_quit);

        let mut app = App::new(AppConfig::default());
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_restore_keeps_score_state() {
        let mut app = App::new(AppConfig::default());
        app.handle_key(key(KeyCode::Char('7')));
        app.section = Section::SetScore;
        type_text(&mut app, "x");
        app.handle_key(key(KeyCode::Enter));

        let restored = App::restore(app.config.clone(), app.snapshot());
        assert_eq!(restored.controller, app.controller);
        assert_eq!(restored.section, Section::Add);
        assert!(!restored.suspend_requested);
    }

    #[test]
    fn test_status_message_expires() {
        let mut app = App::new(AppConfig::default());
        app.set_status("hello");
        app.tick();
        assert!(app.status_message.is_some());

        app.status_message_time = Instant::now().checked_sub(Duration::from_secs(STATUS_TIMEOUT_SECS + 1));
        app.tick();
        assert!(app.status_message.is_none());
    }
}

mod components;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Popup, Section};
use crate::theme::Theme;

use components::{big_number, big_number_width, button_label, button_rows, DIGIT_HEIGHT};

const INPUT_PLACEHOLDER: &str = "Enter any score (e.g. -42, 1000)";
const INPUT_ERROR: &str = "Please enter a whole number.";

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    let grid_rows = button_rows(app.config.buttons_per_row).len() as u16;
    let grid_height = grid_rows + 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(1),               // Info line
            Constraint::Length(grid_height),     // Add buttons
            Constraint::Min(3),                  // Score
            Constraint::Length(grid_height),     // Subtract buttons
            Constraint::Length(4),               // Set score input + error line
            Constraint::Length(1),               // Footer
        ])
        .split(area);

    draw_info_line(f, app, chunks[0]);
    draw_button_grid(f, app, Section::Add, chunks[1]);
    draw_score(f, app, chunks[2]);
    draw_button_grid(f, app, Section::Subtract, chunks[3]);
    draw_input(f, app, chunks[4]);
    draw_footer(f, app, chunks[5]);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f, &app.theme),
        Popup::ConfirmReset => draw_confirm_popup(f, app),
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let line = if let Some(ref status) = app.status_message {
        Line::from(Span::styled(status, Style::default().fg(theme.accent)))
    } else {
        Line::from(Span::styled("Ready", Style::default().fg(theme.text_dim)))
    };

    let info = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(info, area);
}

fn section_block<'a>(theme: &Theme, title: &'a str, is_active: bool) -> Block<'a> {
    let border_color = if is_active { theme.accent } else { theme.inactive };
    let title_style = if is_active {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.inactive)
    };

    Block::default()
        .title(Span::styled(title, title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
}

fn draw_button_grid(f: &mut Frame, app: &App, section: Section, area: Rect) {
    let theme = &app.theme;
    let is_active = app.section == section && app.popup == Popup::None;

    let (title, prefix, color, selected) = match section {
        Section::Subtract => (" Subtract ", '-', theme.subtract, app.selected_subtract),
        _ => (" Add ", '+', theme.add, app.selected_add),
    };

    let lines: Vec<Line> = button_rows(app.config.buttons_per_row)
        .into_iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .flat_map(|&(index, value)| {
                    let label = format!("[ {:>4} ]", button_label(prefix, value));
                    let style = if is_active && index == selected {
                        Style::default()
                            .bg(theme.bg_selected)
                            .fg(theme.accent)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(color)
                    };
                    vec![Span::styled(label, style), Span::raw(" ")]
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let grid = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(section_block(theme, title, is_active));

    f.render_widget(grid, area);
}

fn draw_score(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let score = app.controller.score();
    let color = if score < 0 { theme.subtract } else { theme.text };
    let style = Style::default().fg(color).add_modifier(Modifier::BOLD);

    let block = Block::default()
        .title(Span::styled(" Score ", Style::default().fg(theme.text_dim)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.inactive));
    let inner = block.inner(area);
    f.render_widget(block, area);

    // Fall back to plain text when the block digits don't fit
    let fits_big = inner.height >= DIGIT_HEIGHT && inner.width as usize >= big_number_width(score);
    let (lines, height) = if app.config.big_score && fits_big {
        let lines: Vec<Line> = big_number(score)
            .into_iter()
            .map(|row| Line::styled(row, style))
            .collect();
        (lines, DIGIT_HEIGHT)
    } else {
        (vec![Line::styled(score.to_string(), style)], 1)
    };

    // Center vertically
    let top = inner.height.saturating_sub(height) / 2;
    let target = Rect {
        y: inner.y + top,
        height: height.min(inner.height),
        ..inner
    };

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), target);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let is_active = app.section == Section::SetScore && app.popup == Popup::None;
    let has_error = app.controller.input_error();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(area);

    let mut block = section_block(theme, " Set (s)core ", is_active);
    if has_error {
        block = block.border_style(Style::default().fg(theme.error));
    }

    // Keep the end of long input in view, with a column left for the cursor
    let inner_width = block.inner(chunks[0]).width.saturating_sub(1) as usize;
    let text = visible_tail(app.controller.pending_text(), inner_width);
    let content = if text.is_empty() && !is_active {
        Line::styled(INPUT_PLACEHOLDER, Style::default().fg(theme.text_dim))
    } else {
        let cursor = if is_active { "_" } else { "" };
        Line::from(vec![
            Span::styled(text, Style::default().fg(theme.text)),
            Span::styled(cursor, Style::default().fg(theme.accent)),
        ])
    };

    f.render_widget(Paragraph::new(content).block(block), chunks[0]);

    if has_error {
        let message = Paragraph::new(Line::styled(INPUT_ERROR, Style::default().fg(theme.error)));
        f.render_widget(message, chunks[1]);
    }
}

/// Last `width` characters of `text`
fn visible_tail(text: &str, width: usize) -> &str {
    let skip = text.chars().count().saturating_sub(width);
    match text.char_indices().nth(skip) {
        Some((start, _)) => &text[start..],
        None => "",
    }
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let hints: Vec<(&str, &str)> = match app.section {
        Section::Add | Section::Subtract => vec![
            ("←→", "Select"),
            ("Enter", "Press"),
            ("1-7", "Preset"),
            ("r", "Reset"),
            ("Tab", "Next"),
            ("?", "Help"),
            ("q", "Quit"),
        ],
        Section::SetScore => vec![
            ("Enter", "Set"),
            ("Ctrl-U", "Clear"),
            ("Esc", "Back"),
            ("Tab", "Next"),
        ],
    };

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 4 } else if area.width < 80 { 5 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(theme.accent)),
                Span::styled(format!(" {} │ ", action), Style::default().fg(theme.text_dim)),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans))
        .alignment(Alignment::Center);

    f.render_widget(footer, area);
}

fn help_entry<'a>(theme: &Theme, key: &'a str, description: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), Style::default().fg(theme.accent)),
        Span::raw(description),
    ])
}

fn help_heading<'a>(theme: &Theme, title: &'a str) -> Line<'a> {
    Line::from(Span::styled(title, Style::default().fg(theme.header).add_modifier(Modifier::BOLD)))
}

fn draw_help_popup(f: &mut Frame, theme: &Theme) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 70 },
        if area.height < 40 { 95 } else { 85 },
        area
    );

    f.render_widget(Clear, popup_area);

    let help_text = vec![
        help_heading(theme, "═══ Navigation ═══"),
        help_entry(theme, "Tab", "Switch sections (Add → Subtract → Set score)"),
        help_entry(theme, "←/→ ↑/↓", "Move between buttons"),
        help_entry(theme, "s", "Jump to the set score field"),
        Line::from(""),
        help_heading(theme, "═══ Buttons ═══"),
        help_entry(theme, "Enter", "Press the selected button"),
        help_entry(theme, "1-7", "Press +1 +2 +5 +10 +20 +50 +100 (or minus)"),
        help_entry(theme, "r", "Reset the score to zero"),
        Line::from(""),
        help_heading(theme, "═══ Set Score ═══"),
        help_entry(theme, "Enter", "Set the score to the typed whole number"),
        help_entry(theme, "Ctrl-U", "Clear the field"),
        help_entry(theme, "Esc", "Back to the buttons"),
        Line::from(""),
        help_heading(theme, "═══ Session ═══"),
        help_entry(theme, "Ctrl-Z", "Drop to a shell, score is kept"),
        help_entry(theme, "q/Ctrl-C", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(theme.text_dim)),
            Span::styled("?", Style::default().fg(theme.accent)),
            Span::styled("/", Style::default().fg(theme.text_dim)),
            Span::styled("Esc", Style::default().fg(theme.accent)),
            Span::styled(" to close", Style::default().fg(theme.text_dim)),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" scorecalc Help ", Style::default().fg(theme.accent)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn draw_confirm_popup(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let popup_area = centered_rect(40, 30, f.area());

    f.render_widget(Clear, popup_area);

    let message = format!("Reset score {} to 0?", app.controller.score());

    let confirm = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(theme.accent))),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y", Style::default().fg(theme.add).add_modifier(Modifier::BOLD)),
            Span::raw(" Yes   "),
            Span::styled("n", Style::default().fg(theme.error).add_modifier(Modifier::BOLD)),
            Span::raw(" No"),
        ]),
    ])
    .block(
        Block::default()
            .title(Span::styled(" Confirm ", Style::default().fg(theme.accent)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent)),
    )
    .alignment(Alignment::Center);

    f.render_widget(confirm, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::score::ScoreSnapshot;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();

        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app_with(snapshot: ScoreSnapshot, config: AppConfig) -> App {
        App::restore(config, snapshot)
    }

    #[test]
    fn test_draws_buttons_and_plain_score() {
        let config = AppConfig { big_score: false, ..Default::default() };
        let app = app_with(ScoreSnapshot { score: 4242, ..Default::default() }, config);
        let screen = render(&app, 80, 30);

        assert!(screen.contains("4242"));
        assert!(screen.contains("+100"));
        assert!(screen.contains("-100"));
        assert!(screen.contains(INPUT_PLACEHOLDER));
        assert!(!screen.contains(INPUT_ERROR));
    }

    #[test]
    fn test_draws_big_score() {
        let app = app_with(ScoreSnapshot { score: 8, ..Default::default() }, AppConfig::default());
        let screen = render(&app, 80, 30);
        assert!(screen.contains("█ █"));
    }

    #[test]
    fn test_big_score_falls_back_when_short() {
        let app = app_with(ScoreSnapshot { score: 31337, ..Default::default() }, AppConfig::default());
        // Fixed rows take 14 lines, leaving two rows inside the score box
        let screen = render(&app, 80, 18);
        assert!(screen.contains("31337"));
    }

    #[test]
    fn test_draws_input_error() {
        let snapshot = ScoreSnapshot {
            score: 3,
            pending_text: "abc".to_string(),
            input_error: true,
        };
        let screen = render(&app_with(snapshot, AppConfig::default()), 80, 30);
        assert!(screen.contains("abc"));
        assert!(screen.contains(INPUT_ERROR));
    }

    #[test]
    fn test_visible_tail() {
        assert_eq!(visible_tail("12345", 3), "345");
        assert_eq!(visible_tail("12", 3), "12");
        assert_eq!(visible_tail("", 3), "");
        assert_eq!(visible_tail("ab€de", 2), "de");
        assert_eq!(visible_tail("abc", 0), "");
    }

    #[test]
    fn test_long_input_keeps_tail_and_cursor() {
        let pending = format!("{}98765", "1".repeat(60));
        let mut app = app_with(
            ScoreSnapshot { pending_text: pending, ..Default::default() },
            AppConfig::default(),
        );
        app.section = Section::SetScore;
        let screen = render(&app, 40, 30);
        assert!(screen.contains("98765_"));
    }

    #[test]
    fn test_draws_confirm_popup() {
        let mut app = app_with(ScoreSnapshot { score: 12, ..Default::default() }, AppConfig::default());
        app.popup = Popup::ConfirmReset;
        let screen = render(&app, 80, 30);
        assert!(screen.contains("Reset score 12 to 0?"));
    }
}

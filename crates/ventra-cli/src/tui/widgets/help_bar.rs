use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::tui::app::Screen;

/// Bottom help bar showing context-sensitive key bindings.
pub struct HelpBar {
    pub screen: Screen,
    pub form_open: bool,
}

impl Widget for HelpBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(Color::DarkGray);
        let key_style = Style::default().fg(Color::Cyan);

        let pairs: &[(&str, &str)] = match (self.screen, self.form_open) {
            (Screen::Login, _) => &[
                ("Tab", "switch field"),
                ("Enter", "sign in"),
                ("Ctrl+S", "sign up instead"),
                ("Esc", "quit"),
            ],
            (Screen::SignUp, _) => &[
                ("Tab", "switch field"),
                ("Enter", "create account"),
                ("Ctrl+S", "sign in instead"),
                ("Esc", "quit"),
            ],
            (Screen::Dashboard, _) => &[
                ("1-5", "screens"),
                ("r", "refresh"),
                ("o", "sign out"),
                ("q", "quit"),
            ],
            (Screen::Startups, true) => &[
                ("Tab", "next field"),
                ("Ctrl+S", "save"),
                ("Esc", "cancel"),
            ],
            (Screen::Startups, false) => &[
                ("j/k", "navigate"),
                ("n", "new"),
                ("r", "refresh"),
                ("1-5", "screens"),
                ("q", "quit"),
            ],
            (Screen::Send, _) => &[
                ("Space", "select"),
                ("a", "select all"),
                ("f", "kind"),
                ("Enter", "send"),
                ("1-5", "screens"),
                ("q", "quit"),
            ],
            (Screen::Emails, _) => &[
                ("j/k", "navigate"),
                ("r", "refresh"),
                ("1-5", "screens"),
                ("q", "quit"),
            ],
            (Screen::Upload, _) => &[
                ("Enter", "upload"),
                ("Esc", "back"),
            ],
        };

        let mut spans = Vec::with_capacity(pairs.len() * 2);
        for (i, (keys, label)) in pairs.iter().enumerate() {
            spans.push(Span::styled(*keys, key_style));
            let trailing = if i + 1 == pairs.len() { "" } else { "  " };
            spans.push(Span::styled(format!(" {label}{trailing}"), style));
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

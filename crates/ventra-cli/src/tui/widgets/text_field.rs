use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Editable single-line input state: the value plus a byte cursor.
#[derive(Debug, Default, Clone)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => {
                self.value.insert(self.cursor, c);
                self.cursor += c.len_utf8();
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    let prev = self.value[..self.cursor]
                        .chars()
                        .next_back()
                        .map(char::len_utf8)
                        .unwrap_or(0);
                    self.cursor -= prev;
                    self.value.remove(self.cursor);
                }
            }
            KeyCode::Left => {
                if self.cursor > 0 {
                    self.cursor -= self.value[..self.cursor]
                        .chars()
                        .next_back()
                        .map(char::len_utf8)
                        .unwrap_or(0);
                }
            }
            KeyCode::Right => {
                if self.cursor < self.value.len() {
                    self.cursor += self.value[self.cursor..]
                        .chars()
                        .next()
                        .map(char::len_utf8)
                        .unwrap_or(0);
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.len(),
            _ => {}
        }
    }
}

/// A bordered, labeled form field with cursor and focus highlight.
pub struct TextField<'a> {
    pub label: &'a str,
    pub input: &'a TextInput,
    pub focused: bool,
    /// Render the value as bullets (password entry).
    pub masked: bool,
}

impl Widget for TextField<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = if self.focused {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(format!(" {} ", self.label));

        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let shown: String = if self.masked {
            "•".repeat(self.input.value().chars().count())
        } else {
            self.input.value().to_string()
        };
        // The mask substitutes one bullet per char, so recompute the
        // cursor in the shown string
        let cursor = if self.masked {
            self.input.value()[..self.input.cursor()].chars().count() * "•".len()
        } else {
            self.input.cursor()
        };

        let before = &shown[..cursor.min(shown.len())];
        let after = &shown[cursor.min(shown.len())..];
        let mut spans = vec![Span::raw(before.to_string())];
        if self.focused {
            let cursor_char = after.chars().next().unwrap_or(' ');
            spans.push(Span::styled(
                cursor_char.to_string(),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
            if after.len() > cursor_char.len_utf8() {
                spans.push(Span::raw(after[cursor_char.len_utf8()..].to_string()));
            }
        } else {
            spans.push(Span::raw(after.to_string()));
        }

        let line = Line::from(spans);
        buf.set_line(inner.x, inner.y, &line, inner.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut input = TextInput::default();
        for c in "acme".chars() {
            input.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(input.value(), "acme");
        assert_eq!(input.cursor(), 4);

        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.value(), "acm");
    }

    #[test]
    fn test_cursor_movement_and_insert() {
        let mut input = TextInput::default();
        for c in "ace".chars() {
            input.handle_key(key(KeyCode::Char(c)));
        }
        input.handle_key(key(KeyCode::Left));
        input.handle_key(key(KeyCode::Char('m')));
        assert_eq!(input.value(), "acme");

        input.handle_key(key(KeyCode::Home));
        assert_eq!(input.cursor(), 0);
        input.handle_key(key(KeyCode::End));
        assert_eq!(input.cursor(), 4);
    }

    #[test]
    fn test_multibyte_edits() {
        let mut input = TextInput::default();
        for c in "café".chars() {
            input.handle_key(key(KeyCode::Char(c)));
        }
        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.value(), "caf");
        input.handle_key(key(KeyCode::Left));
        input.handle_key(key(KeyCode::Right));
        assert_eq!(input.cursor(), 3);
    }
}

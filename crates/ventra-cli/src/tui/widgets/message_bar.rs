use ratatui::{
    layout::{Constraint, Flex, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use ventra_core::resource::Severity;

/// Bottom-centered toast for workflow outcomes, green for success and
/// red for errors. Cleared by the tick timer in the app.
pub fn render(frame: &mut Frame, severity: Severity, message: &str) {
    let area = frame.area();
    let [toast_area] = Layout::horizontal([Constraint::Percentage(60)])
        .flex(Flex::Center)
        .areas(area);
    let [toast_area] = Layout::vertical([Constraint::Length(3)])
        .flex(Flex::End)
        .areas(toast_area);

    let (color, icon, title) = match severity {
        Severity::Success => (Color::Green, "✓", " Success "),
        Severity::Error => (Color::Red, "✗", " Error "),
    };

    frame.render_widget(Clear, toast_area);
    let toast = Paragraph::new(format!(" {icon} {message}"))
        .style(Style::default().fg(Color::White).bg(color))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title),
        );
    frame.render_widget(toast, toast_area);
}

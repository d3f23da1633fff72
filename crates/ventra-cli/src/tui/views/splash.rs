use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const LOGO: &[&str] = &[
    r"                 _             ",
    r"__   _____ _ __ | |_ _ __ __ _ ",
    r"\ \ / / _ \ '_ \| __| '__/ _` |",
    r" \ V /  __/ | | | |_| | | (_| |",
    r"  \_/ \___|_| |_|\__|_|  \__,_|",
];

pub fn render(frame: &mut Frame, area: Rect, checking: bool) {
    let block_height = LOGO.len() as u16 + 6;
    let block_width = 44;

    let [center_y] = Layout::vertical([Constraint::Length(block_height)])
        .flex(Flex::Center)
        .areas(area);
    let [center] = Layout::horizontal([Constraint::Length(block_width)])
        .flex(Flex::Center)
        .areas(center_y);

    let mut lines: Vec<Line> = Vec::new();
    for row in LOGO {
        lines.push(Line::from(Span::styled(
            *row,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "     Startup outreach from the terminal",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    if checking {
        lines.push(Line::from(Span::styled(
            "          Checking session...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
    }

    frame.render_widget(Paragraph::new(lines), center);
}

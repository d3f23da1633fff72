use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::{
    app::App,
    widgets::{help_bar::HelpBar, text_field::TextField},
};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [main, help] =
        Layout::vertical([Constraint::Min(5), Constraint::Length(1)]).areas(area);

    let [center_y] = Layout::vertical([Constraint::Length(9)])
        .flex(Flex::Center)
        .areas(main);
    let [center] = Layout::horizontal([Constraint::Length(56)])
        .flex(Flex::Center)
        .areas(center_y);

    let rows = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Length(2),
    ])
    .split(center);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Upload a CSV of startups",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))),
        rows[0],
    );

    frame.render_widget(
        TextField {
            label: "Path to .csv file",
            input: &app.upload_path,
            focused: !app.upload_busy,
            masked: false,
        },
        rows[1],
    );

    if app.upload_busy {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Uploading...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            rows[2],
        );
    }

    frame.render_widget(
        HelpBar {
            screen: app.screen,
            form_open: false,
        },
        help,
    );
}

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::{
    app::{App, Screen},
    widgets::{help_bar::HelpBar, text_field::TextField},
};

/// Login and sign-up share this screen; only the title and submit label
/// differ.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let signup = app.screen == Screen::SignUp;

    let [main, help] =
        Layout::vertical([Constraint::Min(5), Constraint::Length(1)]).areas(area);

    let [center_y] = Layout::vertical([Constraint::Length(12)])
        .flex(Flex::Center)
        .areas(main);
    let [center] = Layout::horizontal([Constraint::Length(48)])
        .flex(Flex::Center)
        .areas(center_y);

    let rows = Layout::vertical([
        Constraint::Length(2), // title
        Constraint::Length(3), // email
        Constraint::Length(3), // password
        Constraint::Length(2), // status
    ])
    .split(center);

    let title = if signup { "Create account" } else { "Sign in" };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))),
        rows[0],
    );

    frame.render_widget(
        TextField {
            label: "Email",
            input: &app.auth_email,
            focused: app.auth_field == 0,
            masked: false,
        },
        rows[1],
    );
    frame.render_widget(
        TextField {
            label: "Password",
            input: &app.auth_password,
            focused: app.auth_field == 1,
            masked: true,
        },
        rows[2],
    );

    if app.auth_busy {
        let label = if signup {
            "Creating account..."
        } else {
            "Signing in..."
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                label,
                Style::default().fg(Color::Yellow),
            ))),
            rows[3],
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

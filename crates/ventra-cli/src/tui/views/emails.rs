use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use ventra_core::resource::Remote;

use crate::tui::{app::App, widgets::help_bar::HelpBar};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [table_area, help] =
        Layout::vertical([Constraint::Min(5), Constraint::Length(1)]).areas(area);

    let block = Block::default().borders(Borders::ALL).title(" Emails ");

    match &app.emails {
        Remote::Loading | Remote::Idle => {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  Loading...",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ))
                .block(block),
                table_area,
            );
        }
        Remote::Failed(err) => {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("  {err}  (r to retry)"),
                    Style::default().fg(Color::Red),
                ))
                .block(block),
                table_area,
            );
        }
        Remote::Ready(emails) if emails.is_empty() => {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  No emails sent yet.",
                    Style::default().fg(Color::DarkGray),
                ))
                .block(block),
                table_area,
            );
        }
        Remote::Ready(emails) => {
            let header = Row::new(vec![
                Cell::from("Sent"),
                Cell::from("To"),
                Cell::from("Address"),
                Cell::from("Subject"),
                Cell::from("Status"),
            ])
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .bottom_margin(1);

            let rows: Vec<Row> = emails
                .iter()
                .map(|email| {
                    let sent = email
                        .sent_at
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "—".to_string());
                    let mut status = if email.viewed { "viewed" } else { "sent" }.to_string();
                    if email.follow_up {
                        status.push_str(" · follow-up");
                    }
                    Row::new(vec![
                        Cell::from(sent),
                        Cell::from(Span::styled(
                            email.startup.name.clone(),
                            Style::default().fg(Color::Magenta),
                        )),
                        Cell::from(email.startup.email.clone()),
                        Cell::from(email.subject.clone().unwrap_or_else(|| "(no subject)".into())),
                        Cell::from(Span::styled(status, Style::default().fg(Color::DarkGray))),
                    ])
                })
                .collect();

            let table = Table::new(
                rows,
                [
                    Constraint::Length(16),
                    Constraint::Length(20),
                    Constraint::Length(26),
                    Constraint::Min(20),
                    Constraint::Length(18),
                ],
            )
            .header(header)
            .row_highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .block(block);

            let mut state = TableState::default();
            state.select(Some(app.emails_cursor));
            frame.render_stateful_widget(table, area, &mut state);
        }
    }

    frame.render_widget(
        HelpBar {
            screen: app.screen,
            form_open: false,
        },
        help,
    );
}

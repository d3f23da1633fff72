use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use ventra_core::resource::Remote;

use crate::tui::{app::App, widgets::help_bar::HelpBar};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [header, counters, recent, help] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Min(4),
        Constraint::Length(1),
    ])
    .areas(area);

    let who = app
        .user
        .as_ref()
        .and_then(|u| u.email.as_deref())
        .unwrap_or("(unknown)");
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                "Dashboard",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {who}"), Style::default().fg(Color::DarkGray)),
        ])),
        header,
    );

    match &app.dashboard {
        Remote::Ready(stats) => {
            let cells = [
                ("Startups", stats.startups),
                ("Emails sent", stats.emails),
                ("Viewed", stats.viewed),
            ];
            let columns = Layout::horizontal([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(counters);
            for ((label, value), cell_area) in cells.iter().zip(columns.iter()) {
                frame.render_widget(
                    Paragraph::new(Line::from(vec![
                        Span::styled(
                            value.to_string(),
                            Style::default()
                                .fg(Color::Green)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(format!(" {label}"), Style::default().fg(Color::DarkGray)),
                    ]))
                    .block(Block::default().borders(Borders::ALL)),
                    *cell_area,
                );
            }
            render_recent(frame, stats, recent);
        }
        Remote::Loading | Remote::Idle => {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  Loading...",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
                counters,
            );
        }
        Remote::Failed(err) => {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("  {err}  (r to retry)"),
                    Style::default().fg(Color::Red),
                )),
                counters,
            );
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

fn render_recent(frame: &mut Frame, stats: &ventra_core::model::DashboardStats, area: Rect) {
    if stats.recent.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "  No emails sent yet.",
                Style::default().fg(Color::DarkGray),
            )),
            area,
        );
        return;
    }

    let header = Row::new(vec![
        Cell::from("Sent"),
        Cell::from("To"),
        Cell::from("Subject"),
        Cell::from("Status"),
    ])
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .bottom_margin(1);

    let rows: Vec<Row> = stats
        .recent
        .iter()
        .map(|email| {
            let sent = email
                .sent_at
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "—".to_string());
            let status = if email.viewed { "viewed" } else { "sent" };
            Row::new(vec![
                Cell::from(sent),
                Cell::from(Span::styled(
                    email.startup.name.clone(),
                    Style::default().fg(Color::Magenta),
                )),
                Cell::from(email.subject.clone().unwrap_or_else(|| "(no subject)".into())),
                Cell::from(Span::styled(status, Style::default().fg(Color::DarkGray))),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(24),
            Constraint::Min(20),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(" Recent activity "));

    frame.render_widget(table, area);
}

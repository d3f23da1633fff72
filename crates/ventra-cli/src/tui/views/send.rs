use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState},
    Frame,
};
use ventra_core::resource::Remote;
use ventra_core::send::SendPhase;

use crate::tui::{app::App, widgets::help_bar::HelpBar};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [header, table_area, progress, help] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                "Send emails",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  kind: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                app.send_kind.to_string(),
                Style::default().fg(Color::Magenta),
            ),
            Span::styled(
                format!("  selected: {}", app.selection.len()),
                Style::default().fg(Color::DarkGray),
            ),
        ])),
        header,
    );

    render_table(frame, app, table_area);
    render_progress(frame, app, progress);

    frame.render_widget(
        HelpBar {
            screen: app.screen,
            form_open: false,
        },
        help,
    );
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL);

    match &app.startups {
        Remote::Loading | Remote::Idle => {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  Loading...",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ))
                .block(block),
                area,
            );
        }
        Remote::Failed(err) => {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("  {err}  (r to retry)"),
                    Style::default().fg(Color::Red),
                ))
                .block(block),
                area,
            );
        }
        Remote::Ready(startups) if startups.is_empty() => {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  No startups to send to.",
                    Style::default().fg(Color::DarkGray),
                ))
                .block(block),
                area,
            );
        }
        Remote::Ready(startups) => {
            let rows: Vec<Row> = startups
                .iter()
                .map(|s| {
                    let mark = if app.selection.contains(s.id) {
                        Span::styled("[x]", Style::default().fg(Color::Green))
                    } else {
                        Span::styled("[ ]", Style::default().fg(Color::DarkGray))
                    };
                    Row::new(vec![
                        Cell::from(mark),
                        Cell::from(s.name.clone()),
                        Cell::from(s.email.clone()),
                        Cell::from(s.industry.clone().unwrap_or_default()),
                    ])
                })
                .collect();

            let table = Table::new(
                rows,
                [
                    Constraint::Length(3),
                    Constraint::Length(24),
                    Constraint::Min(24),
                    Constraint::Length(16),
                ],
            )
            .row_highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .block(block);

            let mut state = TableState::default();
            state.select(Some(app.startups_cursor));
            frame.render_stateful_widget(table, area, &mut state);
        }
    }
}

fn render_progress(frame: &mut Frame, app: &App, area: Rect) {
    match app.send_phase {
        SendPhase::Sending { current, total } => {
            let ratio = if total == 0 {
                0.0
            } else {
                current as f64 / total as f64
            };
            let gauge = Gauge::default()
                .block(Block::default().borders(Borders::ALL))
                .gauge_style(Style::default().fg(Color::Cyan))
                .ratio(ratio.clamp(0.0, 1.0))
                .label(format!("Sending {}/{total}", current + 1));
            frame.render_widget(gauge, area);
        }
        SendPhase::Idle | SendPhase::Finished => {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  Space to select, Enter to send.",
                    Style::default().fg(Color::DarkGray),
                ))
                .block(Block::default().borders(Borders::ALL)),
                area,
            );
        }
    }
}

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};
use ventra_core::resource::Remote;

use crate::tui::{
    app::App,
    widgets::{help_bar::HelpBar, text_field::TextField},
};

const FORM_LABELS: [&str; 6] = [
    "Name",
    "Email",
    "Website",
    "LinkedIn",
    "Industry",
    "Tech stack",
];

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [table_area, help] =
        Layout::vertical([Constraint::Min(5), Constraint::Length(1)]).areas(area);

    render_table(frame, app, table_area);

    frame.render_widget(
        HelpBar {
            screen: app.screen,
            form_open: app.form_open,
        },
        help,
    );

    if app.form_open {
        render_form(frame, app, area);
    }
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Startups ");

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
                    "  No startups yet. Press n to add one, or 5 to upload a CSV.",
                    Style::default().fg(Color::DarkGray),
                ))
                .block(block),
                area,
            );
        }
        Remote::Ready(startups) => {
            let header = Row::new(vec![
                Cell::from("Name"),
                Cell::from("Email"),
                Cell::from("Industry"),
                Cell::from("Added"),
            ])
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .bottom_margin(1);

            let rows: Vec<Row> = startups
                .iter()
                .map(|s| {
                    Row::new(vec![
                        Cell::from(s.name.clone()),
                        Cell::from(s.email.clone()),
                        Cell::from(s.industry.clone().unwrap_or_default()),
                        Cell::from(s.created_at.format("%Y-%m-%d").to_string()),
                    ])
                })
                .collect();

            let table = Table::new(
                rows,
                [
                    Constraint::Length(24),
                    Constraint::Min(24),
                    Constraint::Length(16),
                    Constraint::Length(10),
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
            state.select(Some(app.startups_cursor));
            frame.render_stateful_widget(table, area, &mut state);
        }
    }
}

/// Centered modal with the six-field add form.
fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let height = 3 * FORM_LABELS.len() as u16 + 2;
    let [center_y] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [center] = Layout::horizontal([Constraint::Length(52)])
        .flex(Flex::Center)
        .areas(center_y);

    frame.render_widget(Clear, center);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Add startup ");
    let inner = block.inner(center);
    frame.render_widget(block, center);

    let fields = Layout::vertical([Constraint::Length(3); 6]).split(inner);
    for (i, label) in FORM_LABELS.iter().enumerate() {
        frame.render_widget(
            TextField {
                label,
                input: &app.form[i],
                focused: app.form_field == i,
                masked: false,
            },
            fields[i],
        );
    }
}

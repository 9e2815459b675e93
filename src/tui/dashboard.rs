use crate::app::AppState;
use crate::scoring::{self, format_points};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn stat(label: &str, value: String, color: Color) -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            label.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(Block::default().borders(Borders::ALL))
}

pub fn draw_dashboard(area: Rect, f: &mut Frame, app: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(rows[0]);

    f.render_widget(
        stat(
            "pontos acumulados",
            format_points(app.grand_total()),
            Color::Yellow,
        ),
        cards[0],
    );
    f.render_widget(
        stat(
            "média por campanha",
            format_points(scoring::average_per_campaign(&app.campaigns)),
            Color::Cyan,
        ),
        cards[1],
    );
    f.render_widget(
        stat("campanhas", app.campaigns.len().to_string(), Color::Green),
        cards[2],
    );

    let Some(current) = scoring::current_campaign(&app.campaigns) else {
        let p = Paragraph::new(vec![
            Line::from("Nenhuma campanha ainda."),
            Line::from(vec![
                Span::raw("Pressione "),
                Span::styled("n", Style::default().fg(Color::Magenta)),
                Span::raw(" para criar a primeira."),
            ]),
        ])
        .block(Block::default().borders(Borders::ALL).title("Campanha atual"));
        f.render_widget(p, rows[1]);
        return;
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                current.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", current.date),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(Span::styled(
            format!("{} pts", format_points(scoring::campaign_total(current))),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
    ];
    if let Some(verse) = current.verse_text() {
        lines.push(Line::from(Span::styled(
            format!("“{verse}”"),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }
    lines.push(Line::from(""));
    for m in &current.missions {
        lines.push(Line::from(vec![
            Span::raw(format!("  {:<40}", m.title)),
            Span::styled(
                format!("{:>10} pts", format_points(scoring::mission_total(m))),
                Style::default().fg(Color::Cyan),
            ),
        ]));
    }

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Campanha atual"));
    f.render_widget(p, rows[1]);
}

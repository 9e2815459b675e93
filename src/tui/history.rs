use crate::app::AppState;
use crate::scoring::{self, format_points};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw_history(area: Rect, f: &mut Frame, app: &AppState) {
    let list = app.history_list();
    let total_count = list.len();
    let current_pos = if total_count > 0 {
        app.history.selected + 1
    } else {
        0
    };

    let mut lines: Vec<Line> = vec![Line::from(vec![
        Span::raw(format!("Histórico ({current_pos}/{total_count}) - ")),
        Span::styled("↑/↓/j/k", Style::default().fg(Color::Magenta)),
        Span::raw(": navegar, "),
        Span::styled("enter", Style::default().fg(Color::Magenta)),
        Span::raw(": detalhes, "),
        Span::styled("e", Style::default().fg(Color::Magenta)),
        Span::raw(": editar, "),
        Span::styled("x", Style::default().fg(Color::Magenta)),
        Span::raw(": excluir"),
    ])];
    lines.push(Line::from(""));

    if list.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nenhuma campanha registrada.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    // Rows available below the header, minus borders.
    let max_rows = (area.height as usize).saturating_sub(4).max(1);
    let detail: Vec<Line> = app
        .selected_campaign()
        .filter(|c| app.history.expanded.as_deref() == Some(c.id.as_str()))
        .map(|c| {
            crate::text_summary::campaign_detail(c)
                .into_iter()
                .skip(1)
                .map(|l| Line::from(Span::styled(format!("    {l}"), Style::default().fg(Color::Gray))))
                .collect()
        })
        .unwrap_or_default();

    // Keep the selected row (and its details when they fit) on screen.
    let needed = 1 + detail.len().min(max_rows.saturating_sub(1));
    let offset = (app.history.selected + needed).saturating_sub(max_rows);

    let mut detail = Some(detail);
    for (idx, c) in list.iter().enumerate().skip(offset) {
        let selected = idx == app.history.selected;
        let marker = if selected { "▶ " } else { "  " };
        let style = if selected {
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(marker, style),
            Span::styled(format!("{}  ", c.date), Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{:<36}", c.name), style),
            Span::styled(
                format!("{:>10} pts", format_points(scoring::campaign_total(c))),
                Style::default().fg(Color::Yellow),
            ),
        ]));
        if selected {
            if let Some(d) = detail.take() {
                lines.extend(d);
            }
        }
    }

    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Histórico"));
    f.render_widget(p, area);
}

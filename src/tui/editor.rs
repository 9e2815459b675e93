use super::state::{Field, UiState};
use crate::app::EditorState;
use crate::scoring::{self, format_points};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const SPINNER: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];

pub fn draw_editor(area: Rect, f: &mut Frame, state: &UiState) {
    let Some(editor) = state.app.editor.as_ref() else {
        return;
    };
    if editor.ai_mode {
        draw_ai(area, f, editor, state.tick);
    } else {
        draw_form(area, f, state, editor);
    }
}

fn draw_ai(area: Rect, f: &mut Frame, editor: &EditorState, tick: u64) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let intro = if editor.thinking.is_some() {
        Line::from(Span::styled(
            format!(
                "{} A IA está lendo o texto e montando as missões…",
                SPINNER[tick as usize % SPINNER.len()]
            ),
            Style::default().fg(Color::Cyan),
        ))
    } else {
        Line::from(vec![
            Span::raw("Cole o texto da campanha e pressione "),
            Span::styled("Ctrl-G", Style::default().fg(Color::Magenta)),
            Span::raw(" para gerar, ou "),
            Span::styled("tab", Style::default().fg(Color::Magenta)),
            Span::raw(" para preencher manualmente."),
        ])
    };
    f.render_widget(
        Paragraph::new(intro).block(Block::default().borders(Borders::ALL).title("Assistente IA")),
        chunks[0],
    );

    let mut lines: Vec<Line> = editor.raw_text.split('\n').map(|l| Line::from(l.to_string())).collect();
    if editor.thinking.is_none() {
        if let Some(last) = lines.last_mut() {
            last.push_span(Span::styled("▏", Style::default().fg(Color::Magenta)));
        }
    }
    // Follow the end of the text.
    let visible = chunks[1].height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(Block::default().borders(Borders::ALL).title("Texto"));
    f.render_widget(p, chunks[1]);
}

fn draw_form(area: Rect, f: &mut Frame, state: &UiState, editor: &EditorState) {
    let focused = state.focused_field();
    let input = |label: &str, field: Field| -> Line<'static> {
        let is_focused = focused.as_ref() == Some(&field);
        let value = state.display_value(editor, &field);
        let (marker, style) = if is_focused {
            ("▶ ", Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
        } else {
            ("  ", Style::default())
        };
        let mut spans = vec![
            Span::styled(marker, style),
            Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)),
            Span::styled(value, style),
        ];
        if is_focused {
            spans.push(Span::styled("▏", Style::default().fg(Color::Magenta)));
        }
        Line::from(spans)
    };

    let mut lines: Vec<Line> = Vec::new();
    let mut focus_line = 0usize;
    let mut push = |line: Line<'static>, field: Option<&Field>, lines: &mut Vec<Line<'static>>| {
        if field.is_some() && field == focused.as_ref() {
            focus_line = lines.len();
        }
        lines.push(line);
    };

    push(input("Nome", Field::Name), Some(&Field::Name), &mut lines);
    push(input("Data", Field::Date), Some(&Field::Date), &mut lines);
    push(input("Versículo", Field::Verse), Some(&Field::Verse), &mut lines);
    push(Line::from(""), None, &mut lines);

    if editor.missions.is_empty() {
        push(
            Line::from(vec![
                Span::raw("  Nenhuma missão. "),
                Span::styled("Ctrl-N", Style::default().fg(Color::Magenta)),
                Span::raw(" adiciona uma."),
            ]),
            None,
            &mut lines,
        );
    }

    for m in &editor.missions {
        let expanded = editor.expanded_mission.as_deref() == Some(m.id.as_str());
        let title = Field::MissionTitle(m.id.clone());
        let mut header = input(if expanded { "▾ Missão" } else { "▸ Missão" }, title.clone());
        header.push_span(Span::styled(
            format!("  {} pts", format_points(scoring::mission_total(m))),
            Style::default().fg(Color::Cyan),
        ));
        push(header, Some(&title), &mut lines);
        if !expanded {
            continue;
        }

        let notes = Field::MissionNotes(m.id.clone());
        push(indent(input("Obs", notes.clone())), Some(&notes), &mut lines);
        for i in &m.items {
            let label = Field::ItemLabel(m.id.clone(), i.id.clone());
            let points = Field::ItemPoints(m.id.clone(), i.id.clone());
            let qty = Field::ItemQuantity(m.id.clone(), i.id.clone());
            push(indent(input("Regra", label.clone())), Some(&label), &mut lines);
            push(indent(input("  Pontos", points.clone())), Some(&points), &mut lines);
            let mut q = indent(input("  Qtd", qty.clone()));
            q.push_span(Span::styled(
                format!("  = {}", format_points(i.points * f64::from(i.quantity))),
                Style::default().fg(Color::DarkGray),
            ));
            push(q, Some(&qty), &mut lines);
        }
    }

    let visible = area.height.saturating_sub(2) as usize;
    let scroll = (focus_line + 1).saturating_sub(visible) as u16;
    let title = format!("Total: {} pts", format_points(editor.total()));
    let p = Paragraph::new(lines)
        .scroll((scroll, 0))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(p, area);
}

fn indent(mut line: Line<'static>) -> Line<'static> {
    line.spans.insert(0, Span::raw("    "));
    line
}

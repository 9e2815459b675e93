use crate::app::Modal;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Centered popup for the confirmation dialog. Draw last so it covers the view.
pub fn draw_modal(area: Rect, f: &mut Frame, modal: &Modal, tick: u64) {
    let Some(cfg) = modal.config() else {
        return;
    };
    let accent = if cfg.danger { Color::Red } else { Color::Yellow };

    let width = area.width.min(60);
    let height = area.height.min(9);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let buttons = if modal.is_processing() {
        let dots = ".".repeat((tick % 4) as usize);
        Line::from(Span::styled(
            format!("Processando{dots}"),
            Style::default().fg(Color::DarkGray),
        ))
    } else if cfg.show_cancel {
        Line::from(vec![
            Span::styled("[enter] ", Style::default().fg(Color::Magenta)),
            Span::styled(
                "Confirmar",
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("[esc] ", Style::default().fg(Color::Magenta)),
            Span::raw("Cancelar"),
        ])
    } else {
        Line::from(vec![
            Span::styled("[enter] ", Style::default().fg(Color::Magenta)),
            Span::styled("OK", Style::default().add_modifier(Modifier::BOLD)),
        ])
    };

    let p = Paragraph::new(vec![
        Line::from(""),
        Line::from(cfg.message.as_str()),
        Line::from(""),
        buttons,
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent))
            .title(Span::styled(
                format!(" {} ", cfg.title),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            )),
    );

    f.render_widget(Clear, popup);
    f.render_widget(p, popup);
}

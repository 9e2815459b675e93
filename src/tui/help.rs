use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn key_line(keys: &'static str, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(keys, Style::default().fg(Color::Magenta)),
        Span::raw(format!("{:width$}{what}", "", width = 14usize.saturating_sub(keys.chars().count()))),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Geral:"),
        key_line("q / Ctrl-C", "Sair"),
        key_line("tab", "Alternar abas"),
        key_line("d / h / ?", "Painel / Histórico / Ajuda"),
        key_line("n", "Nova campanha"),
        key_line("r", "Tentar carregar de novo (após falha)"),
        Line::from(""),
        Line::from("Painel:"),
        key_line("e / enter", "Editar campanha atual"),
        key_line("x", "Excluir campanha atual"),
        Line::from(""),
        Line::from("Histórico:"),
        key_line("↑/↓ j/k", "Navegar"),
        key_line("enter", "Expandir detalhes"),
        key_line("e", "Editar selecionada"),
        key_line("x", "Excluir selecionada"),
        key_line("s", "Exportar selecionada como JSON"),
        key_line("y", "Copiar resumo para a área de transferência"),
        Line::from(""),
        Line::from("Editor (IA):"),
        key_line("Ctrl-G", "Gerar missões a partir do texto"),
        key_line("tab", "Preencher manualmente"),
        Line::from(""),
        Line::from("Editor (manual):"),
        key_line("↑/↓ tab", "Mudar de campo"),
        key_line("enter", "Abrir/fechar missão"),
        key_line("+ / -", "Quantidade"),
        key_line("Ctrl-N", "Nova missão"),
        key_line("Ctrl-A", "Nova regra na missão"),
        key_line("Ctrl-D", "Remover regra / missão"),
        key_line("Ctrl-L", "Limpar todas as missões"),
        key_line("Ctrl-X", "Excluir campanha"),
        key_line("Ctrl-S", "Salvar"),
        key_line("esc", "Cancelar"),
        Line::from(""),
        Line::from("Diálogos:"),
        key_line("enter / y", "Confirmar"),
        key_line("esc / n", "Cancelar"),
    ])
    .block(Block::default().borders(Borders::ALL).title("Ajuda"));
    f.render_widget(p, area);
}

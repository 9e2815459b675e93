mod dashboard;
mod editor;
mod export;
mod help;
mod history;
mod modal;
mod state;

use crate::app::{AppState, Effect, LoadState, View};
use crate::config::AppConfig;
use crate::model::AppEvent;
use crate::orchestrator::{self, StoreCommand};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Terminal,
};
use state::{Action, UiState};
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

pub async fn run(cfg: AppConfig) -> Result<()> {
    let (store, extractor) = crate::cli::connect(&cfg)?;
    let ai_available = extractor.is_some();

    // Unbounded channels: the UI thread must never wait on the controller.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<AppEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<StoreCommand>();

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_handle = std::thread::spawn(move || run_threaded(ai_available, event_rx, cmd_tx));

    orchestrator::run_controller(store, extractor, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    match join_res {
        Ok(Ok(res)) => res,
        Ok(Err(_)) => Err(anyhow::anyhow!("TUI thread panicked")),
        Err(e) => Err(anyhow::anyhow!("TUI join failed: {e}")),
    }
}

fn forward(effects: Vec<Effect>, cmd_tx: &UnboundedSender<StoreCommand>) {
    for effect in effects {
        let cmd = match effect {
            Effect::Load => StoreCommand::Load,
            Effect::Save(c) => StoreCommand::Save(c),
            Effect::Delete(id) => StoreCommand::Delete(id),
            Effect::Extract { seq, text } => StoreCommand::Extract { seq, text },
        };
        let _ = cmd_tx.send(cmd);
    }
}

/// Run the TUI loop on a dedicated thread.
pub fn run_threaded(
    ai_available: bool,
    mut event_rx: UnboundedReceiver<AppEvent>,
    cmd_tx: UnboundedSender<StoreCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    // UiState is owned by the UI thread only; no cross-thread mutation.
    let (app, initial) = AppState::init(ai_available);
    let mut state = UiState::new(app);
    forward(initial, &cmd_tx);

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let res = loop {
        // Drain events without blocking to keep UI responsive.
        while let Ok(ev) = event_rx.try_recv() {
            let effects = state.dispatch(crate::app::Msg::Event(ev));
            forward(effects, &cmd_tx);
        }

        if last_tick.elapsed() >= tick_rate {
            state.tick = state.tick.wrapping_add(1);
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if !event::poll(Duration::from_millis(10)).unwrap_or(false) {
            continue;
        }
        let Ok(Event::Key(k)) = event::read() else {
            continue;
        };
        if k.kind != KeyEventKind::Press {
            continue;
        }
        let mut quit = false;
        for action in state.handle_key(k) {
            match action {
                Action::Quit => quit = true,
                Action::Send(msg) => {
                    let effects = state.dispatch(msg);
                    forward(effects, &cmd_tx);
                }
                Action::ExportSelected => export_selected(&mut state),
                Action::CopySelected => copy_selected(&mut state),
            }
        }
        if quit {
            let _ = cmd_tx.send(StoreCommand::Quit);
            break Ok(());
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

fn export_selected(state: &mut UiState) {
    let Some(c) = state.app.selected_campaign() else {
        return;
    };
    state.app.status = match crate::export::export_campaign_to_cwd(c) {
        Ok(p) => format!("Exported JSON: {}", p.display()),
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "export failed");
            format!("JSON export failed: {e:#}")
        }
    };
}

fn copy_selected(state: &mut UiState) {
    let Some(c) = state.app.selected_campaign() else {
        return;
    };
    let text = crate::text_summary::campaign_detail(c).join("\n");
    let name = c.name.clone();
    state.app.status = match export::copy_to_clipboard(&text) {
        Ok(()) => format!("✓ Copied to clipboard: {name}"),
        Err(e) => format!("Clipboard copy failed: {e:#}"),
    };
}

const SPINNER: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(chunks[0], f, state);

    match &state.app.load {
        LoadState::Loading => draw_centered(
            chunks[1],
            f,
            vec![Line::from(format!(
                "{} Carregando campanhas…",
                SPINNER[state.tick as usize % SPINNER.len()]
            ))],
            Color::Gray,
        ),
        LoadState::Failed(err) => draw_centered(
            chunks[1],
            f,
            vec![
                Line::from(Span::styled(
                    "Não foi possível carregar as campanhas",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(err.as_str()),
                Line::from(""),
                Line::from(vec![
                    Span::raw("Pressione "),
                    Span::styled("r", Style::default().fg(Color::Magenta)),
                    Span::raw(" para tentar novamente ou "),
                    Span::styled("q", Style::default().fg(Color::Magenta)),
                    Span::raw(" para sair"),
                ]),
            ],
            Color::Red,
        ),
        LoadState::Ready => match state.app.view {
            View::Dashboard => dashboard::draw_dashboard(chunks[1], f, &state.app),
            View::Editor => editor::draw_editor(chunks[1], f, state),
            View::History => history::draw_history(chunks[1], f, &state.app),
            View::Help => help::draw_help(chunks[1], f),
        },
    }

    let status = Paragraph::new(Line::from(vec![
        Span::styled(
            footer_keys(state),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(state.app.status.as_str(), Style::default().fg(Color::Yellow)),
    ]));
    f.render_widget(status, chunks[2]);

    let dialog = if state.app.modal.is_open() {
        Some(&state.app.modal)
    } else {
        state
            .app
            .editor
            .as_ref()
            .map(|e| &e.modal)
            .filter(|m| m.is_open())
    };
    if let Some(m) = dialog {
        modal::draw_modal(area, f, m, state.tick);
    }
}

fn draw_header(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let total = format!(
        "🏆 {} pts",
        crate::scoring::format_points(state.app.grand_total())
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tribe Points ")
        .title_alignment(Alignment::Left)
        .title(Line::from(total).alignment(Alignment::Right));

    // Tab switching is unavailable while editing.
    if state.app.view == View::Editor {
        let title = match state.app.editor.as_ref() {
            Some(e) if !e.is_new() => "Editando campanha",
            _ => "Nova campanha",
        };
        let p = Paragraph::new(Line::from(Span::styled(
            title,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )))
        .block(block);
        f.render_widget(p, area);
        return;
    }

    let selected = match state.app.view {
        View::Dashboard | View::Editor => 0,
        View::History => 1,
        View::Help => 2,
    };
    let tabs = Tabs::new(vec!["Painel [d]", "Histórico [h]", "Ajuda [?]"])
        .select(selected)
        .block(block)
        .highlight_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}

fn footer_keys(state: &UiState) -> &'static str {
    if !matches!(state.app.load, LoadState::Ready) {
        return "r retry  q quit";
    }
    match state.app.view {
        View::Dashboard => "n new  e edit  x delete  tab switch  q quit",
        View::History => "j/k move  enter expand  e edit  x delete  s export  y copy",
        View::Help => "tab switch  q quit",
        View::Editor => match state.app.editor.as_ref() {
            Some(e) if e.ai_mode => "ctrl-g generate  tab manual  esc cancel",
            _ => "ctrl-s save  ctrl-n mission  ctrl-a rule  ctrl-d remove  esc cancel",
        },
    }
}

fn draw_centered(area: Rect, f: &mut ratatui::Frame, lines: Vec<Line>, border: Color) {
    let h = (lines.len() as u16 + 2).min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(h),
            Constraint::Fill(1),
        ])
        .split(area);
    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
    f.render_widget(p, vertical[1]);
}

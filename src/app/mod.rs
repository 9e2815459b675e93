//! Application state and the single reducer that mutates it.
//!
//! Views turn input into [`Msg`]s, [`update`] applies them and returns the [`Effect`]s the
//! controller has to carry out. Controller outcomes come back as [`Msg::Event`].

pub mod editor;
pub mod modal;

pub use editor::{EditorMsg, EditorState};
pub use modal::{ConfirmAction, Modal, ModalConfig};

use crate::model::{AppEvent, Campaign};
use crate::scoring;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Editor,
    History,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// Blocks every view until the user retries.
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryState {
    /// Index into the date-sorted list.
    pub selected: usize,
    pub expanded: Option<String>,
}

/// Persistence and AI work requested by the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Load,
    Save(Campaign),
    Delete(String),
    Extract { seq: u64, text: String },
}

#[derive(Debug, Clone)]
pub enum Msg {
    ShowDashboard,
    ShowHistory,
    ShowHelp,
    NewCampaign,
    EditCampaign(String),
    CancelEdit,
    SaveEditor,
    RequestExtraction,
    Retry,
    AskDelete(String),
    ConfirmModal,
    CancelModal,
    Editor(EditorMsg),
    HistoryNext,
    HistoryPrev,
    HistoryToggle,
    Event(AppEvent),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub view: View,
    pub campaigns: Vec<Campaign>,
    pub active_id: Option<String>,
    pub load: LoadState,
    /// Global dialog (campaign deletion).
    pub modal: Modal,
    pub editor: Option<EditorState>,
    pub history: HistoryState,
    pub status: String,
    pub ai_available: bool,
    next_seq: u64,
}

impl AppState {
    /// Fresh state plus the initial load request.
    pub fn init(ai_available: bool) -> (Self, Vec<Effect>) {
        let state = Self {
            view: View::Dashboard,
            campaigns: Vec::new(),
            active_id: None,
            load: LoadState::Loading,
            modal: Modal::Closed,
            editor: None,
            history: HistoryState::default(),
            status: String::new(),
            ai_available,
            next_seq: 0,
        };
        (state, vec![Effect::Load])
    }

    pub fn campaign(&self, id: &str) -> Option<&Campaign> {
        self.campaigns.iter().find(|c| c.id == id)
    }

    pub fn grand_total(&self) -> f64 {
        scoring::grand_total(&self.campaigns)
    }

    /// Campaigns in the order the history view lists them.
    pub fn history_list(&self) -> Vec<&Campaign> {
        scoring::sorted_by_date_desc(&self.campaigns)
    }

    pub fn selected_campaign(&self) -> Option<&Campaign> {
        self.history_list().get(self.history.selected).copied()
    }

    fn clamp_history(&mut self) {
        let len = self.campaigns.len();
        if self.history.selected >= len {
            self.history.selected = len.saturating_sub(1);
        }
        if let Some(id) = self.history.expanded.as_deref() {
            if self.campaign(id).is_none() {
                self.history.expanded = None;
            }
        }
    }

    fn leave_editor(&mut self) {
        self.view = View::Dashboard;
        self.active_id = None;
        self.editor = None;
    }
}

/// Optimistic local write: replace in place when the id exists, otherwise prepend.
pub fn upsert_local(campaigns: &mut Vec<Campaign>, campaign: Campaign) {
    match campaigns.iter_mut().find(|c| c.id == campaign.id) {
        Some(existing) => *existing = campaign,
        None => campaigns.insert(0, campaign),
    }
}

/// Remove the entry with `id`, keeping the relative order of the rest.
pub fn remove_local(campaigns: &mut Vec<Campaign>, id: &str) -> bool {
    let before = campaigns.len();
    campaigns.retain(|c| c.id != id);
    campaigns.len() != before
}

pub fn update(state: &mut AppState, msg: Msg) -> Vec<Effect> {
    if let Msg::Event(ev) = msg {
        return apply_event(state, ev);
    }

    // Nothing but a retry gets through until the list is loaded.
    match &state.load {
        LoadState::Ready => {}
        LoadState::Failed(_) => {
            if matches!(msg, Msg::Retry) {
                state.load = LoadState::Loading;
                return vec![Effect::Load];
            }
            return Vec::new();
        }
        LoadState::Loading => return Vec::new(),
    }

    // The global dialog captures all input while it is up.
    if state.modal.is_open() {
        match msg {
            Msg::ConfirmModal => {
                if let Some(ConfirmAction::DeleteCampaign(id)) = state.modal.confirm() {
                    return vec![Effect::Delete(id)];
                }
            }
            Msg::CancelModal => {
                state.modal.cancel();
            }
            _ => {}
        }
        return Vec::new();
    }

    match msg {
        Msg::ShowDashboard | Msg::ShowHistory | Msg::ShowHelp if state.view == View::Editor => {}
        Msg::ShowDashboard => state.view = View::Dashboard,
        Msg::ShowHistory => {
            state.view = View::History;
            state.clamp_history();
        }
        Msg::ShowHelp => state.view = View::Help,
        Msg::NewCampaign => {
            state.active_id = None;
            state.editor = Some(EditorState::blank(state.ai_available));
            state.view = View::Editor;
        }
        Msg::EditCampaign(id) => {
            let editor = match state.campaign(&id) {
                Some(c) => EditorState::from_campaign(c),
                None => EditorState::blank(state.ai_available),
            };
            state.active_id = editor.existing_id.clone();
            state.editor = Some(editor);
            state.view = View::Editor;
        }
        Msg::CancelEdit => {
            // Allowed while an extraction runs; its late result is dropped with the editor.
            let dialog_up = state.editor.as_ref().is_some_and(|e| e.modal.is_open());
            if !dialog_up {
                state.leave_editor();
            }
        }
        Msg::SaveEditor => return save_editor(state),
        Msg::RequestExtraction => return request_extraction(state),
        Msg::Retry => {}
        Msg::AskDelete(id) => {
            if state.campaign(&id).is_some() && editor_idle(state) {
                state.modal.open(ModalConfig::delete_campaign(id));
            }
        }
        Msg::ConfirmModal | Msg::CancelModal => {}
        Msg::Editor(em) => {
            if let Some(editor) = state.editor.as_mut() {
                editor.update(em);
            }
        }
        Msg::HistoryNext => {
            if state.history.selected + 1 < state.campaigns.len() {
                state.history.selected += 1;
            }
        }
        Msg::HistoryPrev => {
            state.history.selected = state.history.selected.saturating_sub(1);
        }
        Msg::HistoryToggle => {
            if let Some(id) = state.selected_campaign().map(|c| c.id.clone()) {
                state.history.expanded = if state.history.expanded.as_deref() == Some(id.as_str()) {
                    None
                } else {
                    Some(id)
                };
            }
        }
        Msg::Event(_) => {}
    }
    Vec::new()
}

// Editor-level actions wait while its dialog is up or an extraction is running.
fn editor_idle(state: &AppState) -> bool {
    state
        .editor
        .as_ref()
        .map(|e| !e.modal.is_open() && e.thinking.is_none())
        .unwrap_or(true)
}

fn save_editor(state: &mut AppState) -> Vec<Effect> {
    if !editor_idle(state) {
        return Vec::new();
    }
    let Some(editor) = state.editor.as_mut() else {
        return Vec::new();
    };
    let Some(campaign) = editor.build_campaign() else {
        editor.notify(editor::EMPTY_NAME_MESSAGE);
        return Vec::new();
    };

    debug!(id = %campaign.id, "optimistic save");
    upsert_local(&mut state.campaigns, campaign.clone());
    state.leave_editor();
    vec![Effect::Save(campaign)]
}

fn request_extraction(state: &mut AppState) -> Vec<Effect> {
    let seq = state.next_seq + 1;
    let ai_available = state.ai_available;
    let Some(editor) = state.editor.as_mut() else {
        return Vec::new();
    };
    let Some(text) = editor.begin_extraction(seq) else {
        return Vec::new();
    };
    state.next_seq = seq;
    if !ai_available {
        editor.extraction_failed(seq);
        return Vec::new();
    }
    vec![Effect::Extract { seq, text }]
}

fn apply_event(state: &mut AppState, ev: AppEvent) -> Vec<Effect> {
    match ev {
        AppEvent::Loaded(campaigns) => {
            state.campaigns = campaigns;
            state.load = LoadState::Ready;
            state.clamp_history();
        }
        AppEvent::LoadFailed(error) => {
            state.load = LoadState::Failed(error);
        }
        AppEvent::Saved { id } => {
            if let Some(c) = state.campaign(&id) {
                state.status = format!("Salvo: {}", c.name);
            }
        }
        AppEvent::SaveFailed { id, error } => {
            // Resync wholesale instead of rolling back field by field.
            warn!(%id, %error, "save failed, reloading");
            state.load = LoadState::Loading;
            return vec![Effect::Load];
        }
        AppEvent::Deleted { id } => {
            remove_local(&mut state.campaigns, &id);
            state.modal.finish();
            if state.active_id.as_deref() == Some(id.as_str()) {
                state.leave_editor();
            }
            state.clamp_history();
            state.status = "Campanha excluída".into();
        }
        AppEvent::DeleteFailed { id, error } => {
            warn!(%id, %error, "delete failed");
            state.modal.finish();
            state.status = "Falha ao excluir a campanha".into();
        }
        AppEvent::Extracted { seq, draft } => {
            if let Some(editor) = state.editor.as_mut() {
                if !editor.apply_draft(seq, draft) {
                    debug!(seq, "dropping stale extraction result");
                }
            }
        }
        AppEvent::ExtractFailed { seq, error } => {
            warn!(seq, %error, "extraction failed");
            if let Some(editor) = state.editor.as_mut() {
                editor.extraction_failed(seq);
            }
        }
        AppEvent::Info(info) => state.status = info.to_message(),
    }
    Vec::new()
}

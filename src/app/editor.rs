//! Campaign editor state: the form fields, the AI sub-mode, and the editor-local dialog.

use super::modal::{ConfirmAction, Modal, ModalConfig};
use crate::model::{Campaign, CampaignDraft, Mission, MissionItem};
use crate::scoring;

pub const EMPTY_NAME_MESSAGE: &str = "Por favor, dê um nome para a semana/campanha.";
pub const AI_FAILURE_MESSAGE: &str = "Houve um erro ao processar o texto da IA. Tente novamente.";

#[derive(Debug, Clone, PartialEq)]
pub enum EditorMsg {
    SetName(String),
    SetDate(String),
    SetVerse(String),
    SetRawText(String),
    ManualMode,
    AddMission,
    SetMissionTitle { mission: String, title: String },
    SetMissionNotes { mission: String, notes: String },
    ToggleMission(String),
    AddItem(String),
    SetItemLabel { mission: String, item: String, label: String },
    SetItemPoints { mission: String, item: String, points: f64 },
    SetItemQuantity { mission: String, item: String, quantity: u32 },
    Increment { mission: String, item: String },
    Decrement { mission: String, item: String },
    RemoveItem { mission: String, item: String },
    AskRemoveMission(String),
    AskClearMissions,
    ConfirmModal,
    CancelModal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    /// Id of the campaign being edited; `None` for a new one.
    pub existing_id: Option<String>,
    pub name: String,
    pub date: String,
    pub verse: String,
    pub missions: Vec<Mission>,
    pub expanded_mission: Option<String>,
    pub ai_mode: bool,
    pub raw_text: String,
    /// Sequence number of the in-flight extraction request.
    pub thinking: Option<u64>,
    pub modal: Modal,
}

impl EditorState {
    pub fn blank(ai_mode: bool) -> Self {
        Self {
            existing_id: None,
            name: String::new(),
            date: crate::model::today(),
            verse: String::new(),
            missions: Vec::new(),
            expanded_mission: None,
            ai_mode,
            raw_text: String::new(),
            thinking: None,
            modal: Modal::Closed,
        }
    }

    pub fn from_campaign(c: &Campaign) -> Self {
        Self {
            existing_id: Some(c.id.clone()),
            name: c.name.clone(),
            date: c.date.clone(),
            verse: c.verse.clone().unwrap_or_default(),
            missions: c.missions.clone(),
            ai_mode: false,
            ..Self::blank(false)
        }
    }

    pub fn is_new(&self) -> bool {
        self.existing_id.is_none()
    }

    pub fn total(&self) -> f64 {
        scoring::missions_total(&self.missions)
    }

    /// Apply one editing message. Input is ignored while the local dialog is up
    /// (except dialog buttons) and while an extraction is in flight.
    pub fn update(&mut self, msg: EditorMsg) {
        if self.modal.is_open() {
            match msg {
                EditorMsg::ConfirmModal => self.confirm_modal(),
                EditorMsg::CancelModal => {
                    self.modal.cancel();
                }
                _ => {}
            }
            return;
        }
        if self.thinking.is_some() {
            return;
        }

        match msg {
            EditorMsg::SetName(v) => self.name = v,
            EditorMsg::SetDate(v) => self.date = v,
            EditorMsg::SetVerse(v) => self.verse = v,
            EditorMsg::SetRawText(v) => self.raw_text = v,
            EditorMsg::ManualMode => self.ai_mode = false,
            EditorMsg::AddMission => self.add_mission(),
            EditorMsg::SetMissionTitle { mission, title } => {
                if let Some(m) = self.mission_mut(&mission) {
                    m.title = title;
                }
            }
            EditorMsg::SetMissionNotes { mission, notes } => {
                if let Some(m) = self.mission_mut(&mission) {
                    m.notes = Some(notes);
                }
            }
            EditorMsg::ToggleMission(id) => {
                self.expanded_mission = if self.expanded_mission.as_deref() == Some(id.as_str()) {
                    None
                } else {
                    Some(id)
                };
            }
            EditorMsg::AddItem(mission) => {
                if let Some(m) = self.mission_mut(&mission) {
                    m.items.push(MissionItem::new("Nova Regra", 100.0));
                }
            }
            EditorMsg::SetItemLabel {
                mission,
                item,
                label,
            } => self.with_item(&mission, &item, |i| i.label = label),
            EditorMsg::SetItemPoints {
                mission,
                item,
                points,
            } => {
                if points.is_finite() {
                    self.with_item(&mission, &item, |i| i.points = points);
                }
            }
            EditorMsg::SetItemQuantity {
                mission,
                item,
                quantity,
            } => self.with_item(&mission, &item, |i| i.quantity = quantity),
            EditorMsg::Increment { mission, item } => {
                self.with_item(&mission, &item, |i| i.quantity = i.quantity.saturating_add(1))
            }
            EditorMsg::Decrement { mission, item } => {
                self.with_item(&mission, &item, |i| i.quantity = i.quantity.saturating_sub(1))
            }
            EditorMsg::RemoveItem { mission, item } => {
                if let Some(m) = self.mission_mut(&mission) {
                    m.items.retain(|i| i.id != item);
                }
            }
            EditorMsg::AskRemoveMission(id) => {
                self.modal.open(ModalConfig::remove_mission(id));
            }
            EditorMsg::AskClearMissions => {
                if !self.missions.is_empty() {
                    self.modal.open(ModalConfig::clear_missions());
                }
            }
            EditorMsg::ConfirmModal | EditorMsg::CancelModal => {}
        }
    }

    fn add_mission(&mut self) {
        let mission = Mission::numbered(self.missions.len() + 1);
        self.expanded_mission = Some(mission.id.clone());
        self.missions.push(mission);
    }

    fn mission_mut(&mut self, id: &str) -> Option<&mut Mission> {
        self.missions.iter_mut().find(|m| m.id == id)
    }

    fn with_item(&mut self, mission: &str, item: &str, f: impl FnOnce(&mut MissionItem)) {
        if let Some(i) = self.mission_mut(mission).and_then(|m| m.item_mut(item)) {
            f(i);
        }
    }

    fn confirm_modal(&mut self) {
        match self.modal.confirm() {
            Some(ConfirmAction::RemoveMission(id)) => {
                self.missions.retain(|m| m.id != id);
                if self.expanded_mission.as_deref() == Some(id.as_str()) {
                    self.expanded_mission = None;
                }
            }
            Some(ConfirmAction::ClearMissions) => {
                self.missions.clear();
                self.expanded_mission = None;
            }
            // Campaign deletion is handled by the global dialog.
            Some(ConfirmAction::Acknowledge) | Some(ConfirmAction::DeleteCampaign(_)) | None => {}
        }
    }

    /// Show the validation notice.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.modal.open(ModalConfig::notice(message));
    }

    /// Mark an extraction as started. Returns the text to send, or `None` when there is
    /// nothing to send or a request is already running.
    pub fn begin_extraction(&mut self, seq: u64) -> Option<String> {
        if self.modal.is_open() || self.thinking.is_some() || self.raw_text.trim().is_empty() {
            return None;
        }
        self.thinking = Some(seq);
        Some(self.raw_text.clone())
    }

    /// Apply a successful extraction. Results of any request other than the
    /// in-flight one are dropped.
    pub fn apply_draft(&mut self, seq: u64, draft: CampaignDraft) -> bool {
        if self.thinking != Some(seq) {
            return false;
        }
        self.thinking = None;
        if let Some(name) = draft.name {
            self.name = name;
        }
        if let Some(verse) = draft.verse {
            self.verse = verse;
        }
        self.expanded_mission = draft.missions.first().map(|m| m.id.clone());
        self.missions = draft.missions;
        self.ai_mode = false;
        true
    }

    /// A failed extraction leaves the form untouched apart from the notice.
    pub fn extraction_failed(&mut self, seq: u64) -> bool {
        if self.thinking != Some(seq) {
            return false;
        }
        self.thinking = None;
        self.notify(AI_FAILURE_MESSAGE);
        true
    }

    /// Validate and assemble the record to persist.
    pub fn build_campaign(&self) -> Option<Campaign> {
        if self.name.trim().is_empty() {
            return None;
        }
        Some(Campaign {
            id: self
                .existing_id
                .clone()
                .unwrap_or_else(crate::model::new_id),
            name: self.name.clone(),
            date: self.date.clone(),
            verse: Some(self.verse.clone()),
            missions: self.missions.clone(),
            is_archived: false,
        })
    }
}

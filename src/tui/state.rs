//! UI-thread state: the application state plus editor focus and key translation.

use crate::app::{self, AppState, Effect, EditorMsg, EditorState, Msg, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// One focusable input of the manual editor form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Name,
    Date,
    Verse,
    MissionTitle(String),
    MissionNotes(String),
    ItemLabel(String, String),
    ItemPoints(String, String),
    ItemQuantity(String, String),
}

impl Field {
    pub fn mission(&self) -> Option<&str> {
        match self {
            Field::Name | Field::Date | Field::Verse => None,
            Field::MissionTitle(m) | Field::MissionNotes(m) => Some(m),
            Field::ItemLabel(m, _) | Field::ItemPoints(m, _) | Field::ItemQuantity(m, _) => Some(m),
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Field::ItemPoints(..) | Field::ItemQuantity(..))
    }
}

/// Focus order of the manual form. Items are only reachable inside the expanded mission.
pub fn fields(editor: &EditorState) -> Vec<Field> {
    let mut out = vec![Field::Name, Field::Date, Field::Verse];
    for m in &editor.missions {
        out.push(Field::MissionTitle(m.id.clone()));
        if editor.expanded_mission.as_deref() != Some(m.id.as_str()) {
            continue;
        }
        out.push(Field::MissionNotes(m.id.clone()));
        for i in &m.items {
            out.push(Field::ItemLabel(m.id.clone(), i.id.clone()));
            out.push(Field::ItemPoints(m.id.clone(), i.id.clone()));
            out.push(Field::ItemQuantity(m.id.clone(), i.id.clone()));
        }
    }
    out
}

/// Current text of a field as the form displays it.
pub fn field_value(editor: &EditorState, field: &Field) -> String {
    let mission = field.mission().and_then(|id| editor.missions.iter().find(|m| m.id == id));
    match field {
        Field::Name => editor.name.clone(),
        Field::Date => editor.date.clone(),
        Field::Verse => editor.verse.clone(),
        Field::MissionTitle(_) => mission.map(|m| m.title.clone()).unwrap_or_default(),
        Field::MissionNotes(_) => mission
            .and_then(|m| m.notes.clone())
            .unwrap_or_default(),
        Field::ItemLabel(_, i) | Field::ItemPoints(_, i) | Field::ItemQuantity(_, i) => {
            let Some(item) = mission.and_then(|m| m.item(i)) else {
                return String::new();
            };
            match field {
                Field::ItemLabel(..) => item.label.clone(),
                Field::ItemPoints(..) => item.points.to_string(),
                _ => item.quantity.to_string(),
            }
        }
    }
}

/// Message that stores `value` into `field`, or `None` when the text does not parse.
fn set_field(field: &Field, value: String) -> Option<EditorMsg> {
    Some(match field.clone() {
        Field::Name => EditorMsg::SetName(value),
        Field::Date => EditorMsg::SetDate(value),
        Field::Verse => EditorMsg::SetVerse(value),
        Field::MissionTitle(mission) => EditorMsg::SetMissionTitle { mission, title: value },
        Field::MissionNotes(mission) => EditorMsg::SetMissionNotes { mission, notes: value },
        Field::ItemLabel(mission, item) => EditorMsg::SetItemLabel { mission, item, label: value },
        Field::ItemPoints(mission, item) => {
            let points = parse_points(&value)?;
            EditorMsg::SetItemPoints { mission, item, points }
        }
        Field::ItemQuantity(mission, item) => {
            let quantity = if value.is_empty() { 0 } else { value.parse().ok()? };
            EditorMsg::SetItemQuantity { mission, item, quantity }
        }
    })
}

// Accepts a decimal comma; partial input like "-" or "12." counts as its numeric prefix.
fn parse_points(text: &str) -> Option<f64> {
    let t = text.trim().replace(',', ".");
    let t = t.trim_end_matches('.');
    if t.is_empty() || t == "-" {
        return Some(0.0);
    }
    t.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// What a key press asks the UI loop to do.
#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Send(Msg),
    ExportSelected,
    CopySelected,
}

pub struct UiState {
    pub app: AppState,
    /// Index into [`fields`] of the manual editor.
    pub focus: usize,
    /// Raw text of the numeric field being typed, kept so "12," survives until parsed.
    pub edit_buffer: Option<(Field, String)>,
    pub tick: u64,
}

impl UiState {
    pub fn new(app: AppState) -> Self {
        Self {
            app,
            focus: 0,
            edit_buffer: None,
            tick: 0,
        }
    }

    pub fn focused_field(&self) -> Option<Field> {
        let editor = self.app.editor.as_ref()?;
        fields(editor).get(self.focus).cloned()
    }

    /// Text shown for `field`, preferring the in-progress numeric buffer.
    pub fn display_value(&self, editor: &EditorState, field: &Field) -> String {
        match &self.edit_buffer {
            Some((f, text)) if f == field => text.clone(),
            _ => field_value(editor, field),
        }
    }

    /// Run the reducer and keep editor focus valid afterwards.
    pub fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        let was_editing = self.app.editor.is_some();
        let missions_before = self.app.editor.as_ref().map(|e| e.missions.len()).unwrap_or(0);
        let focus_before = self.focused_field();

        let effects = app::update(&mut self.app, msg);

        let Some(editor) = self.app.editor.as_ref() else {
            self.focus = 0;
            self.edit_buffer = None;
            return effects;
        };
        let list = fields(editor);
        let target = if !was_editing {
            None
        } else if editor.missions.len() > missions_before {
            // Jump to the mission that was just added.
            editor.missions.last().map(|m| Field::MissionTitle(m.id.clone()))
        } else {
            focus_before
        };
        self.focus = target
            .and_then(|t| list.iter().position(|f| *f == t))
            .unwrap_or(if was_editing { self.focus } else { 0 })
            .min(list.len().saturating_sub(1));
        if self.edit_buffer.as_ref().map(|(f, _)| f) != self.focused_field().as_ref() {
            self.edit_buffer = None;
        }
        effects
    }

    /// Translate a key press into actions for the UI loop.
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            return vec![Action::Quit];
        }

        // Dialogs capture everything.
        let global_modal = self.app.modal.is_open();
        let local_modal = self.app.editor.as_ref().is_some_and(|e| e.modal.is_open());
        if global_modal || local_modal {
            let (confirm, cancel) = if global_modal {
                (Msg::ConfirmModal, Msg::CancelModal)
            } else {
                (
                    Msg::Editor(EditorMsg::ConfirmModal),
                    Msg::Editor(EditorMsg::CancelModal),
                )
            };
            return match key.code {
                KeyCode::Enter | KeyCode::Char('y') => vec![Action::Send(confirm)],
                KeyCode::Esc | KeyCode::Char('n') => vec![Action::Send(cancel)],
                _ => Vec::new(),
            };
        }

        if !matches!(self.app.load, app::LoadState::Ready) {
            return match key.code {
                KeyCode::Char('q') => vec![Action::Quit],
                KeyCode::Char('r') => vec![Action::Send(Msg::Retry)],
                _ => Vec::new(),
            };
        }

        if self.app.view == View::Editor {
            return self.editor_key(key);
        }

        let send = |m: Msg| vec![Action::Send(m)];
        match key.code {
            KeyCode::Char('q') => vec![Action::Quit],
            KeyCode::Tab => send(match self.app.view {
                View::Dashboard => Msg::ShowHistory,
                View::History => Msg::ShowHelp,
                _ => Msg::ShowDashboard,
            }),
            KeyCode::Char('d') => send(Msg::ShowDashboard),
            KeyCode::Char('h') => send(Msg::ShowHistory),
            KeyCode::Char('?') => send(Msg::ShowHelp),
            KeyCode::Char('n') => send(Msg::NewCampaign),
            _ if self.app.view == View::Dashboard => self.dashboard_key(key),
            _ if self.app.view == View::History => self.history_key(key),
            _ => Vec::new(),
        }
    }

    fn dashboard_key(&self, key: KeyEvent) -> Vec<Action> {
        let Some(current) = crate::scoring::current_campaign(&self.app.campaigns) else {
            return Vec::new();
        };
        match key.code {
            KeyCode::Char('e') | KeyCode::Enter => {
                vec![Action::Send(Msg::EditCampaign(current.id.clone()))]
            }
            KeyCode::Char('x') => vec![Action::Send(Msg::AskDelete(current.id.clone()))],
            _ => Vec::new(),
        }
    }

    fn history_key(&self, key: KeyEvent) -> Vec<Action> {
        let selected = self.app.selected_campaign().map(|c| c.id.clone());
        match (key.code, selected) {
            (KeyCode::Down | KeyCode::Char('j'), _) => vec![Action::Send(Msg::HistoryNext)],
            (KeyCode::Up | KeyCode::Char('k'), _) => vec![Action::Send(Msg::HistoryPrev)],
            (KeyCode::Enter | KeyCode::Char(' '), _) => vec![Action::Send(Msg::HistoryToggle)],
            (KeyCode::Char('e'), Some(id)) => vec![Action::Send(Msg::EditCampaign(id))],
            (KeyCode::Char('x'), Some(id)) => vec![Action::Send(Msg::AskDelete(id))],
            (KeyCode::Char('s'), Some(_)) => vec![Action::ExportSelected],
            (KeyCode::Char('y'), Some(_)) => vec![Action::CopySelected],
            _ => Vec::new(),
        }
    }

    fn editor_key(&mut self, key: KeyEvent) -> Vec<Action> {
        let Some(editor) = self.app.editor.as_ref() else {
            return Vec::new();
        };
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let send = |m: Msg| vec![Action::Send(m)];
        let edit = |m: EditorMsg| vec![Action::Send(Msg::Editor(m))];

        if key.code == KeyCode::Esc {
            return send(Msg::CancelEdit);
        }

        if editor.ai_mode {
            let mut text = editor.raw_text.clone();
            return match key.code {
                KeyCode::Char('g') if ctrl => send(Msg::RequestExtraction),
                KeyCode::Tab => edit(EditorMsg::ManualMode),
                KeyCode::Enter => {
                    text.push('\n');
                    edit(EditorMsg::SetRawText(text))
                }
                KeyCode::Backspace => {
                    text.pop();
                    edit(EditorMsg::SetRawText(text))
                }
                KeyCode::Char(c) if !ctrl => {
                    text.push(c);
                    edit(EditorMsg::SetRawText(text))
                }
                _ => Vec::new(),
            };
        }

        let list = fields(editor);
        let focused = list.get(self.focus).cloned();
        let mission = focused.as_ref().and_then(|f| f.mission()).map(str::to_string);

        if ctrl {
            return match key.code {
                KeyCode::Char('s') => send(Msg::SaveEditor),
                KeyCode::Char('n') => edit(EditorMsg::AddMission),
                KeyCode::Char('l') => edit(EditorMsg::AskClearMissions),
                KeyCode::Char('a') => mission.map(|m| edit(EditorMsg::AddItem(m))).unwrap_or_default(),
                KeyCode::Char('d') => match focused {
                    Some(Field::ItemLabel(mission, item))
                    | Some(Field::ItemPoints(mission, item))
                    | Some(Field::ItemQuantity(mission, item)) => {
                        edit(EditorMsg::RemoveItem { mission, item })
                    }
                    Some(Field::MissionTitle(m)) | Some(Field::MissionNotes(m)) => {
                        edit(EditorMsg::AskRemoveMission(m))
                    }
                    _ => Vec::new(),
                },
                KeyCode::Char('x') => editor
                    .existing_id
                    .clone()
                    .map(|id| send(Msg::AskDelete(id)))
                    .unwrap_or_default(),
                _ => Vec::new(),
            };
        }

        match key.code {
            KeyCode::Down | KeyCode::Tab => {
                self.move_focus(list.len(), 1);
                Vec::new()
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.move_focus(list.len(), -1);
                Vec::new()
            }
            KeyCode::Enter => match focused {
                Some(Field::MissionTitle(m)) => edit(EditorMsg::ToggleMission(m)),
                _ => {
                    self.move_focus(list.len(), 1);
                    Vec::new()
                }
            },
            KeyCode::Char('+') => match focused {
                Some(Field::ItemQuantity(mission, item)) => {
                    edit(EditorMsg::Increment { mission, item })
                }
                Some(f) => self.type_into(&f, Some('+')),
                None => Vec::new(),
            },
            KeyCode::Char('-') => match focused {
                Some(Field::ItemQuantity(mission, item)) => {
                    edit(EditorMsg::Decrement { mission, item })
                }
                Some(f) => self.type_into(&f, Some('-')),
                None => Vec::new(),
            },
            KeyCode::Char(c) => match focused {
                Some(f) => self.type_into(&f, Some(c)),
                None => Vec::new(),
            },
            KeyCode::Backspace => match focused {
                Some(f) => self.type_into(&f, None),
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn move_focus(&mut self, len: usize, delta: isize) {
        if len == 0 {
            return;
        }
        self.focus = (self.focus as isize + delta).rem_euclid(len as isize) as usize;
        self.edit_buffer = None;
    }

    /// Append `ch` to the focused field (or drop its last char for `None`).
    fn type_into(&mut self, field: &Field, ch: Option<char>) -> Vec<Action> {
        let Some(editor) = self.app.editor.as_ref() else {
            return Vec::new();
        };
        let buffered = matches!(&self.edit_buffer, Some((f, _)) if f == field);
        let mut text = self.display_value(editor, field);
        if field.is_numeric() && !buffered && text == "0" {
            text.clear();
        }
        match ch {
            Some(c) => {
                if field.is_numeric() && !(c.is_ascii_digit() || matches!(c, '.' | ',' | '-')) {
                    return Vec::new();
                }
                text.push(c);
            }
            None => {
                text.pop();
            }
        }
        let msg = set_field(field, text.clone());
        if field.is_numeric() {
            if msg.is_none() {
                return Vec::new();
            }
            self.edit_buffer = Some((field.clone(), text));
        }
        msg.map(|m| vec![Action::Send(Msg::Editor(m))]).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AppEvent, Campaign};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn ready() -> UiState {
        let (app, _) = AppState::init(false);
        let mut ui = UiState::new(app);
        ui.dispatch(Msg::Event(AppEvent::Loaded(vec![Campaign {
            id: "c1".into(),
            name: "Rally".into(),
            date: "2024-03-10".into(),
            verse: None,
            missions: vec![],
            is_archived: false,
        }])));
        ui
    }

    /// Feed keys through the same path the UI loop uses.
    fn press(ui: &mut UiState, k: KeyEvent) -> Vec<Effect> {
        let mut effects = Vec::new();
        for a in ui.handle_key(k) {
            if let Action::Send(m) = a {
                effects.extend(ui.dispatch(m));
            }
        }
        effects
    }

    fn type_str(ui: &mut UiState, s: &str) {
        for c in s.chars() {
            press(ui, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn manual_form_round_trip_to_save() {
        let mut ui = ready();
        press(&mut ui, key(KeyCode::Char('n')));
        assert_eq!(ui.app.view, View::Editor);
        assert_eq!(ui.focused_field(), Some(Field::Name));
        type_str(&mut ui, "Semana 1");

        press(&mut ui, ctrl('n'));
        let editor = ui.app.editor.as_ref().unwrap();
        let m = editor.missions[0].id.clone();
        let i = editor.missions[0].items[0].id.clone();
        assert_eq!(ui.focused_field(), Some(Field::MissionTitle(m.clone())));

        // title -> notes -> label -> points
        for _ in 0..3 {
            press(&mut ui, key(KeyCode::Down));
        }
        assert_eq!(ui.focused_field(), Some(Field::ItemPoints(m.clone(), i.clone())));
        type_str(&mut ui, "12,5");
        assert_eq!(ui.app.editor.as_ref().unwrap().missions[0].items[0].points, 12.5);

        press(&mut ui, key(KeyCode::Down));
        press(&mut ui, key(KeyCode::Char('+')));
        press(&mut ui, key(KeyCode::Char('+')));
        assert_eq!(ui.app.editor.as_ref().unwrap().total(), 25.0);

        let effects = press(&mut ui, ctrl('s'));
        assert!(matches!(effects.as_slice(), [Effect::Save(c)] if c.name == "Semana 1"));
        assert_eq!(ui.app.view, View::Dashboard);
    }

    #[test]
    fn numeric_fields_ignore_letters() {
        let mut ui = ready();
        press(&mut ui, key(KeyCode::Char('n')));
        press(&mut ui, ctrl('n'));
        for _ in 0..4 {
            press(&mut ui, key(KeyCode::Down));
        }
        let before = ui.app.editor.clone();
        type_str(&mut ui, "abc");
        assert_eq!(ui.app.editor, before);
    }

    #[test]
    fn dialog_captures_keys() {
        let mut ui = ready();
        press(&mut ui, key(KeyCode::Char('h')));
        press(&mut ui, key(KeyCode::Char('x')));
        assert!(ui.app.modal.is_open());
        assert!(ui.handle_key(key(KeyCode::Char('q'))).is_empty());
        let effects = press(&mut ui, key(KeyCode::Enter));
        assert_eq!(effects, vec![Effect::Delete("c1".into())]);
    }

    #[test]
    fn failed_load_only_offers_retry() {
        let (app, _) = AppState::init(false);
        let mut ui = UiState::new(app);
        ui.dispatch(Msg::Event(AppEvent::LoadFailed("down".into())));
        assert!(press(&mut ui, key(KeyCode::Char('n'))).is_empty());
        assert_eq!(press(&mut ui, key(KeyCode::Char('r'))), vec![Effect::Load]);
    }

    #[test]
    fn parse_points_accepts_partial_input() {
        assert_eq!(parse_points(""), Some(0.0));
        assert_eq!(parse_points("-"), Some(0.0));
        assert_eq!(parse_points("12,"), Some(12.0));
        assert_eq!(parse_points("1.5"), Some(1.5));
        assert_eq!(parse_points("1..5"), None);
    }
}

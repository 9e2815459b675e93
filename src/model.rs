use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One scoring rule inside a mission: every occurrence is worth `points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionItem {
    pub id: String,
    pub label: String,
    pub points: f64,
    #[serde(default)]
    pub quantity: u32,
}

impl MissionItem {
    pub fn new(label: impl Into<String>, points: f64) -> Self {
        Self {
            id: new_id(),
            label: label.into(),
            points,
            quantity: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub items: Vec<MissionItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Mission {
    /// Blank mission as offered by the editor's "add mission" action.
    /// `ordinal` is the 1-based position the mission will take.
    pub fn numbered(ordinal: usize) -> Self {
        Self {
            id: new_id(),
            title: format!("Nova Missão {ordinal}"),
            items: vec![MissionItem::new("Jovem presente", 0.0)],
            notes: Some(String::new()),
        }
    }

    pub fn item(&self, item_id: &str) -> Option<&MissionItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn item_mut(&mut self, item_id: &str) -> Option<&mut MissionItem> {
        self.items.iter_mut().find(|i| i.id == item_id)
    }
}

/// A dated collection of missions. Mirrors one row of the remote table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub date: String,
    #[serde(default)]
    pub verse: Option<String>,
    #[serde(default)]
    pub missions: Vec<Mission>,
    // Persisted but never read by any view.
    #[serde(default)]
    pub is_archived: bool,
}

impl Campaign {
    /// Verse text, treating an empty string the same as no verse.
    pub fn verse_text(&self) -> Option<&str> {
        self.verse.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }
}

/// Fresh identifier for locally created records.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Today's date as `YYYY-MM-DD`, local time when the offset is known.
pub fn today() -> String {
    let now = time::OffsetDateTime::now_local().unwrap_or_else(|_| time::OffsetDateTime::now_utc());
    let fmt = time::macros::format_description!("[year]-[month]-[day]");
    now.date()
        .format(&fmt)
        .unwrap_or_else(|_| "1970-01-01".into())
}

/// Structured draft produced by the AI extractor, ready to be applied to the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignDraft {
    pub name: Option<String>,
    pub verse: Option<String>,
    pub missions: Vec<Mission>,
}

/// Outcomes reported by the controller back to the presentation layer.
#[derive(Debug, Clone)]
pub enum AppEvent {
    Loaded(Vec<Campaign>),
    LoadFailed(String),
    Saved { id: String },
    SaveFailed { id: String, error: String },
    Deleted { id: String },
    DeleteFailed { id: String, error: String },
    Extracted { seq: u64, draft: CampaignDraft },
    ExtractFailed { seq: u64, error: String },
    Info(InfoEvent),
}

/// Structured info events emitted by the controller and consumed by UI/CLI layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InfoEvent {
    Loading,
    Saving { name: String },
    Extracting,
}

impl InfoEvent {
    /// Render a human-readable message for UI/CLI layers.
    pub fn to_message(&self) -> String {
        match self {
            InfoEvent::Loading => "Carregando campanhas…".to_string(),
            InfoEvent::Saving { name } => format!("Salvando \"{name}\"…"),
            InfoEvent::Extracting => "Processando texto com IA…".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_remote_row_with_nulls() {
        let row = serde_json::json!({
            "id": "c1",
            "name": "Rally",
            "date": "2024-03-10",
            "verse": null,
            "missions": [{
                "id": "m1",
                "title": "Presença",
                "items": [{ "id": "i1", "label": "Jovem presente", "points": 500, "quantity": 3 }],
                "notes": null
            }],
            "is_archived": false
        });
        let c: Campaign = serde_json::from_value(row).unwrap();
        assert_eq!(c.verse, None);
        assert_eq!(c.missions[0].notes, None);
        assert_eq!(c.missions[0].items[0].points, 500.0);
        assert_eq!(c.missions[0].items[0].quantity, 3);
    }

    #[test]
    fn missing_optional_columns_default() {
        let row = serde_json::json!({ "id": "c1", "name": "x", "date": "2024-01-01" });
        let c: Campaign = serde_json::from_value(row).unwrap();
        assert!(c.missions.is_empty());
        assert!(!c.is_archived);
    }

    #[test]
    fn numbered_mission_has_default_rule() {
        let m = Mission::numbered(3);
        assert_eq!(m.title, "Nova Missão 3");
        assert_eq!(m.items.len(), 1);
        assert_eq!(m.items[0].label, "Jovem presente");
        assert_eq!(m.items[0].quantity, 0);
    }

    #[test]
    fn blank_verse_is_treated_as_absent() {
        let c = Campaign {
            id: "c".into(),
            name: "n".into(),
            date: "2024-01-01".into(),
            verse: Some("   ".into()),
            missions: vec![],
            is_archived: false,
        };
        assert_eq!(c.verse_text(), None);
    }

    #[test]
    fn today_is_iso_date() {
        let d = today();
        assert_eq!(d.len(), 10);
        assert_eq!(&d[4..5], "-");
    }
}

//! AI-assisted campaign authoring.
//!
//! Free text goes out together with a fixed instruction and a declared response schema;
//! the structured reply is decoded into [`ExtractedCampaign`], validated, and only then
//! turned into domain records.

mod gemini;

pub use gemini::GeminiExtractor;

use crate::model::{CampaignDraft, Mission, MissionItem};
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

pub(crate) const UNTITLED_MISSION: &str = "Missão sem nome";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("AI service unreachable: {0}")]
    Network(#[from] reqwest::Error),
    #[error("AI service returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("AI response contained no text")]
    EmptyResponse,
    #[error("AI response is not valid JSON for the campaign schema: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("AI response violates the campaign schema: {0}")]
    Schema(String),
    #[error("AI extraction is not configured (missing API key)")]
    NotConfigured,
}

#[async_trait]
pub trait CampaignExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<CampaignDraft, ExtractError>;
}

/// Reply shape declared in the response schema. Fields the model omits decode as empty.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedCampaign {
    #[serde(default)]
    pub week_title: Option<String>,
    #[serde(default)]
    pub verse: Option<String>,
    #[serde(default)]
    pub missions: Vec<ExtractedMission>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractedMission {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub rules: Vec<ExtractedRule>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractedRule {
    #[serde(default)]
    pub description: Option<String>,
    pub points: Option<f64>,
}

/// Decode the model's text and map it into fresh missions (new ids, quantity 0).
pub fn decode_draft(text: &str) -> Result<CampaignDraft, ExtractError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ExtractError::EmptyResponse);
    }
    let extracted: ExtractedCampaign = serde_json::from_str(text)?;
    extracted.into_draft()
}

impl ExtractedCampaign {
    pub fn into_draft(self) -> Result<CampaignDraft, ExtractError> {
        let missions = self
            .missions
            .into_iter()
            .enumerate()
            .map(|(mi, m)| {
                let items = m
                    .rules
                    .into_iter()
                    .enumerate()
                    .map(|(ri, r)| {
                        let points = r.points.ok_or_else(|| {
                            ExtractError::Schema(format!("mission {mi} rule {ri} has no points"))
                        })?;
                        if !points.is_finite() {
                            return Err(ExtractError::Schema(format!(
                                "mission {mi} rule {ri} has non-finite points"
                            )));
                        }
                        Ok(MissionItem::new(r.description.unwrap_or_default(), points))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let title = m
                    .title
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| UNTITLED_MISSION.to_string());
                Ok(Mission {
                    id: crate::model::new_id(),
                    title,
                    items,
                    notes: Some(String::new()),
                })
            })
            .collect::<Result<Vec<_>, ExtractError>>()?;

        Ok(CampaignDraft {
            name: non_blank(self.week_title),
            verse: non_blank(self.verse),
            missions,
        })
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_rally_example() {
        let draft = decode_draft(
            r#"{"weekTitle":"Rally","verse":"","missions":[{"title":"Presença","rules":[{"description":"Jovem presente","points":500}]}]}"#,
        )
        .unwrap();
        assert_eq!(draft.name.as_deref(), Some("Rally"));
        assert_eq!(draft.verse, None);
        assert_eq!(draft.missions.len(), 1);
        let m = &draft.missions[0];
        assert_eq!(m.title, "Presença");
        assert_eq!(m.items.len(), 1);
        assert_eq!(m.items[0].label, "Jovem presente");
        assert_eq!(m.items[0].points, 500.0);
        assert_eq!(m.items[0].quantity, 0);
    }

    #[test]
    fn generates_distinct_ids() {
        let draft = decode_draft(
            r#"{"weekTitle":"W","missions":[
                {"title":"A","rules":[{"description":"x","points":1},{"description":"y","points":2}]},
                {"title":"B","rules":[]}]}"#,
        )
        .unwrap();
        let mut ids: Vec<&str> = draft.missions.iter().map(|m| m.id.as_str()).collect();
        ids.extend(draft.missions[0].items.iter().map(|i| i.id.as_str()));
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn untitled_missions_get_placeholder() {
        let draft = decode_draft(r#"{"missions":[{"rules":[]},{"title":"  "}]}"#).unwrap();
        assert_eq!(draft.name, None);
        assert!(draft.missions.iter().all(|m| m.title == UNTITLED_MISSION));
    }

    #[test]
    fn malformed_text_is_decode_error() {
        assert!(matches!(decode_draft("not json"), Err(ExtractError::Decode(_))));
        assert!(matches!(
            decode_draft(r#"{"missions":"nope"}"#),
            Err(ExtractError::Decode(_))
        ));
    }

    #[test]
    fn missing_points_is_schema_error() {
        let err = decode_draft(r#"{"missions":[{"title":"A","rules":[{"description":"x"}]}]}"#)
            .unwrap_err();
        assert!(matches!(err, ExtractError::Schema(_)));
    }

    #[test]
    fn blank_text_is_empty_response() {
        assert!(matches!(decode_draft("  "), Err(ExtractError::EmptyResponse)));
    }
}

//! JSON export of campaigns in the same row shape the remote table uses.

use crate::model::Campaign;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Write `value` as pretty JSON, creating parent directories as needed.
pub fn export_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let data = serde_json::to_vec_pretty(value)?;
    std::fs::write(path, data).with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), "exported JSON");
    Ok(())
}

/// `campaign-{date}-{first 8 chars of id}.json`
pub fn default_export_name(campaign: &Campaign) -> String {
    let date: String = campaign
        .date
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect();
    let id: String = campaign.id.chars().take(8).collect();
    format!("campaign-{date}-{id}.json")
}

/// Export one campaign into the working directory. Returns the absolute path written.
pub fn export_campaign_to_cwd(campaign: &Campaign) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().context("get current directory")?;
    let path = current_dir.join(default_export_name(campaign));
    export_json(&path, campaign)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Mission, MissionItem};

    fn sample() -> Campaign {
        Campaign {
            id: "0123456789abcdef".into(),
            name: "Rally".into(),
            date: "2024-03-10".into(),
            verse: Some("Sl 23".into()),
            missions: vec![Mission {
                id: "m1".into(),
                title: "Presença".into(),
                items: vec![MissionItem {
                    id: "i1".into(),
                    label: "Jovem presente".into(),
                    points: 500.0,
                    quantity: 2,
                }],
                notes: None,
            }],
            is_archived: false,
        }
    }

    #[test]
    fn default_name_uses_date_and_short_id() {
        assert_eq!(default_export_name(&sample()), "campaign-2024-03-10-01234567.json");

        let mut short = sample();
        short.id = "abc".into();
        short.date = "2024/03/10".into();
        assert_eq!(default_export_name(&short), "campaign-2024-03-10-abc.json");
    }

    #[test]
    fn writes_row_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        export_json(&path, &[sample()]).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let row = &value[0];
        assert_eq!(row["name"], "Rally");
        assert_eq!(row["is_archived"], false);
        assert_eq!(row["missions"][0]["items"][0]["quantity"], 2);

        let back: Vec<Campaign> = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, vec![sample()]);
    }
}

//! Text summary builder for CLI output and clipboard copies.

use crate::model::Campaign;
use crate::scoring::{self, format_points};

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Dashboard figures followed by one line per campaign, newest first.
pub(crate) fn build_text_summary(campaigns: &[Campaign]) -> TextSummary {
    let mut lines = Vec::new();

    lines.push(format!(
        "Total: {} pts",
        format_points(scoring::grand_total(campaigns))
    ));
    match scoring::current_campaign(campaigns) {
        Some(c) => lines.push(format!(
            "Current: {} ({}) {} pts",
            c.name,
            c.date,
            format_points(scoring::campaign_total(c))
        )),
        None => lines.push("Current: -".to_string()),
    }
    lines.push(format!(
        "Average per campaign: {} pts over {} campaign(s)",
        format_points(scoring::average_per_campaign(campaigns)),
        campaigns.len()
    ));

    if !campaigns.is_empty() {
        lines.push(String::new());
        lines.push("History:".to_string());
    }
    for c in scoring::sorted_by_date_desc(campaigns) {
        lines.push(format!(
            "  {}  {:<32} {:>10} pts",
            c.date,
            c.name,
            format_points(scoring::campaign_total(c))
        ));
    }

    TextSummary { lines }
}

/// Detailed breakdown of one campaign: the verse, and only the missions and rules
/// that actually scored (or carry notes).
pub(crate) fn campaign_detail(campaign: &Campaign) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({}): {} pts",
        campaign.name,
        campaign.date,
        format_points(scoring::campaign_total(campaign))
    )];
    if let Some(verse) = campaign.verse_text() {
        lines.push(format!("\"{verse}\""));
    }
    for m in &campaign.missions {
        let total = scoring::mission_total(m);
        let notes = m.notes.as_deref().map(str::trim).filter(|n| !n.is_empty());
        if total == 0.0 && notes.is_none() {
            continue;
        }
        lines.push(format!("- {}: {} pts", m.title, format_points(total)));
        for i in m.items.iter().filter(|i| i.quantity > 0) {
            lines.push(format!(
                "    {} x{} ({} pts)",
                i.label,
                i.quantity,
                format_points(i.points * f64::from(i.quantity))
            ));
        }
        if let Some(n) = notes {
            lines.push(format!("    obs: {n}"));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Mission, MissionItem};

    fn campaign(name: &str, date: &str, qty: u32) -> Campaign {
        Campaign {
            id: crate::model::new_id(),
            name: name.into(),
            date: date.into(),
            verse: Some("Sl 23".into()),
            missions: vec![
                Mission {
                    id: "m1".into(),
                    title: "Presença".into(),
                    items: vec![
                        MissionItem {
                            quantity: qty,
                            ..MissionItem::new("Jovem presente", 500.0)
                        },
                        MissionItem::new("Visitante", 1000.0),
                    ],
                    notes: None,
                },
                Mission {
                    id: "m2".into(),
                    title: "Vazia".into(),
                    items: vec![MissionItem::new("x", 10.0)],
                    notes: Some(String::new()),
                },
            ],
            is_archived: false,
        }
    }

    #[test]
    fn summary_lists_newest_first() {
        let list = vec![campaign("Old", "2024-01-01", 1), campaign("New", "2024-02-01", 3)];
        let s = build_text_summary(&list);
        assert_eq!(s.lines[0], "Total: 2.000 pts");
        assert!(s.lines[1].starts_with("Current: New (2024-02-01) 1.500"));
        assert!(s.lines[2].contains("1.000 pts over 2"));
        let history: Vec<&String> = s.lines.iter().filter(|l| l.starts_with("  ")).collect();
        assert_eq!(history.len(), 2);
        assert!(history[0].contains("New"));
        assert!(history[1].contains("Old"));
    }

    #[test]
    fn empty_list_summary() {
        let s = build_text_summary(&[]);
        assert_eq!(s.lines, vec!["Total: 0 pts", "Current: -", "Average per campaign: 0 pts over 0 campaign(s)"]);
    }

    #[test]
    fn detail_skips_idle_missions_and_rules() {
        let lines = campaign_detail(&campaign("Rally", "2024-03-10", 2));
        assert_eq!(lines[0], "Rally (2024-03-10): 1.000 pts");
        assert_eq!(lines[1], "\"Sl 23\"");
        assert!(lines.iter().any(|l| l.contains("Jovem presente x2")));
        assert!(!lines.iter().any(|l| l.contains("Visitante")));
        assert!(!lines.iter().any(|l| l.contains("Vazia")));
    }

    #[test]
    fn detail_keeps_missions_with_negative_totals() {
        let mut c = campaign("Rally", "2024-03-10", 0);
        c.missions[1].items[0] = MissionItem {
            quantity: 2,
            ..MissionItem::new("Atraso", -50.0)
        };
        let lines = campaign_detail(&c);
        assert!(lines.iter().any(|l| l == "- Vazia: -100 pts"));
        assert!(lines.iter().any(|l| l.contains("Atraso x2 (-100 pts)")));
        assert!(!lines.iter().any(|l| l.contains("Presença")));
    }
}

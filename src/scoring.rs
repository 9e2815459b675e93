use crate::model::{Campaign, Mission};

/// Sum of points × quantity over every rule of a mission.
pub fn mission_total(mission: &Mission) -> f64 {
    mission
        .items
        .iter()
        .map(|item| item.points * f64::from(item.quantity))
        .sum()
}

/// Sum of all mission totals of a campaign. Empty campaigns score 0.
pub fn campaign_total(campaign: &Campaign) -> f64 {
    missions_total(&campaign.missions)
}

/// Same as [`campaign_total`] for a mission list still being edited.
pub fn missions_total(missions: &[Mission]) -> f64 {
    missions.iter().map(mission_total).sum()
}

/// Points accumulated across every campaign.
pub fn grand_total(campaigns: &[Campaign]) -> f64 {
    campaigns.iter().map(campaign_total).sum()
}

/// Floor of the grand total divided by the number of campaigns, 0 when there are none.
pub fn average_per_campaign(campaigns: &[Campaign]) -> f64 {
    if campaigns.is_empty() {
        return 0.0;
    }
    (grand_total(campaigns) / campaigns.len() as f64).floor()
}

/// Campaigns ordered newest first. Stable, so equal dates keep list order.
pub fn sorted_by_date_desc(campaigns: &[Campaign]) -> Vec<&Campaign> {
    let mut sorted: Vec<&Campaign> = campaigns.iter().collect();
    sorted.sort_by(|a, b| date_key(&b.date).cmp(&date_key(&a.date)));
    sorted
}

/// The campaign with the latest date.
pub fn current_campaign(campaigns: &[Campaign]) -> Option<&Campaign> {
    sorted_by_date_desc(campaigns).into_iter().next()
}

// Unparseable dates sort last.
fn date_key(date: &str) -> Option<time::Date> {
    let fmt = time::macros::format_description!("[year]-[month]-[day]");
    time::Date::parse(date.get(..10).unwrap_or(date), &fmt).ok()
}

/// Render a point value the way the dashboard shows it: `12.500`, `-300`, `12,5`.
pub fn format_points(value: f64) -> String {
    let negative = value < 0.0;
    let abs = value.abs();
    // Round once so x.995 carries into the whole part.
    let cents = (abs * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative && (whole > 0 || frac > 0) {
        out.push('-');
    }
    out.push_str(&grouped);
    if frac > 0 {
        let frac = format!("{frac:02}");
        out.push(',');
        out.push_str(frac.trim_end_matches('0'));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MissionItem;

    fn item(points: f64, quantity: u32) -> MissionItem {
        MissionItem {
            quantity,
            ..MissionItem::new("rule", points)
        }
    }

    fn mission(items: Vec<MissionItem>) -> Mission {
        Mission {
            id: crate::model::new_id(),
            title: "m".into(),
            items,
            notes: None,
        }
    }

    fn campaign(date: &str, missions: Vec<Mission>) -> Campaign {
        Campaign {
            id: crate::model::new_id(),
            name: format!("week {date}"),
            date: date.into(),
            verse: None,
            missions,
            is_archived: false,
        }
    }

    #[test]
    fn empty_campaign_scores_zero() {
        assert_eq!(campaign_total(&campaign("2024-01-01", vec![])), 0.0);
        assert_eq!(campaign_total(&campaign("2024-01-01", vec![mission(vec![])])), 0.0);
    }

    #[test]
    fn total_is_sum_of_points_times_quantity() {
        let c = campaign(
            "2024-01-01",
            vec![
                mission(vec![item(500.0, 3), item(1000.0, 0)]),
                mission(vec![item(300.0, 2), item(12.5, 2)]),
            ],
        );
        assert_eq!(mission_total(&c.missions[0]), 1500.0);
        assert_eq!(mission_total(&c.missions[1]), 625.0);
        assert_eq!(campaign_total(&c), 2125.0);
    }

    #[test]
    fn grand_total_and_average() {
        let a = campaign("2024-01-01", vec![mission(vec![item(100.0, 1)])]);
        let b = campaign("2024-01-08", vec![mission(vec![item(100.0, 2)])]);
        let all = vec![a, b];
        assert_eq!(grand_total(&all), 300.0);
        assert_eq!(average_per_campaign(&all), 150.0);
        assert_eq!(average_per_campaign(&[]), 0.0);
    }

    #[test]
    fn average_is_floored() {
        let all = vec![
            campaign("2024-01-01", vec![mission(vec![item(1.0, 1)])]),
            campaign("2024-01-02", vec![]),
        ];
        assert_eq!(average_per_campaign(&all), 0.0);
    }

    #[test]
    fn current_campaign_is_latest_date() {
        let all = vec![
            campaign("2024-01-08", vec![]),
            campaign("2024-02-01", vec![]),
            campaign("2023-12-31", vec![]),
        ];
        assert_eq!(current_campaign(&all).unwrap().date, "2024-02-01");
        let order: Vec<&str> = sorted_by_date_desc(&all).iter().map(|c| c.date.as_str()).collect();
        assert_eq!(order, vec!["2024-02-01", "2024-01-08", "2023-12-31"]);
        assert!(current_campaign(&[]).is_none());
    }

    #[test]
    fn formats_points() {
        assert_eq!(format_points(0.0), "0");
        assert_eq!(format_points(500.0), "500");
        assert_eq!(format_points(12500.0), "12.500");
        assert_eq!(format_points(1234567.0), "1.234.567");
        assert_eq!(format_points(12.5), "12,5");
        assert_eq!(format_points(-300.0), "-300");
    }

    #[test]
    fn rounding_carries_into_whole_part() {
        assert_eq!(format_points(1.999), "2");
        assert_eq!(format_points(0.995), "1");
        assert_eq!(format_points(999.999), "1.000");
        assert_eq!(format_points(-1.999), "-2");
        assert_eq!(format_points(0.001), "0");
        assert_eq!(format_points(2.05), "2,05");
    }
}

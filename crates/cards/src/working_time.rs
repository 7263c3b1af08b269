//! Card for a `check-working-time` record.

use serde::Deserialize;

use crate::node::{Badge, Emphasis, Icon, ListRow, Node, Theme};
use crate::{CardLocale, format};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakView {
    pub start: String,
    pub end: String,
    pub duration: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingTimeView {
    pub employee_id: String,
    pub employee_name: String,
    pub date: String,
    #[serde(default)]
    pub clock_in: Option<String>,
    #[serde(default)]
    pub clock_out: Option<String>,
    pub total_hours: f64,
    pub status: String,
    #[serde(default)]
    pub breaks: Vec<BreakView>,
    pub weekly_hours: f64,
    pub overtime_hours: f64,
}

pub const NO_CLOCK_IN: &str = "-";
pub const STILL_ACTIVE: &str = "Active";
pub const NO_BREAKS: &str = "No breaks recorded";

pub fn card(record: &WorkingTimeView, locale: &CardLocale) -> Node {
    let working = record.status == "working";
    let clock = |value: &Option<String>, placeholder: &str| {
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .map_or_else(|| placeholder.to_string(), |v| format::time(v, locale))
    };

    let rows = record
        .breaks
        .iter()
        .map(|b| ListRow {
            text: format!("{} - {}", format::time(&b.start, locale), format::time(&b.end, locale)),
            aside: format::hours(b.duration),
        })
        .collect();

    Node::Card {
        kind: "working-time",
        theme: if working { Theme::Green } else { Theme::Slate },
        children: vec![
            Node::Header {
                icon: Icon::Clock,
                title: record.employee_name.clone(),
                subtitle: record.employee_id.clone(),
                badge: Badge {
                    label: record.status.clone(),
                    checked: false,
                    live: working,
                },
            },
            Node::Line {
                icon: Icon::Calendar,
                text: format::long_date(&record.date, locale),
            },
            Node::Grid {
                responsive: false,
                children: vec![
                    Node::tile(None, "Clock In", clock(&record.clock_in, NO_CLOCK_IN), Emphasis::Large),
                    Node::tile(None, "Clock Out", clock(&record.clock_out, STILL_ACTIVE), Emphasis::Large),
                ],
            },
            Node::Highlight {
                label: "Total Hours Today".into(),
                value: format::tenths(record.total_hours),
                unit: "hours".into(),
            },
            Node::List {
                icon: Icon::Coffee,
                label: "Breaks".into(),
                rows,
                empty: NO_BREAKS.into(),
            },
            Node::Grid {
                responsive: false,
                children: vec![
                    Node::tile(None, "Weekly Hours", format::hours(record.weekly_hours), Emphasis::XLarge),
                    Node::tile(
                        Some(Icon::TrendingUp),
                        "Overtime",
                        format::hours(record.overtime_hours),
                        Emphasis::XLarge,
                    ),
                ],
            },
        ],
    }
}

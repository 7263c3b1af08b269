//! Card for a `create-contract` record.

use serde::Deserialize;

use crate::node::{Badge, Emphasis, Icon, Node, Theme};
use crate::{CardLocale, format};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractView {
    pub contract_id: String,
    pub employee_id: String,
    pub contract_type: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    pub salary: f64,
    pub working_hours: f64,
    pub status: String,
    pub created_at: String,
}

/// Placeholder for contracts without an end date.
pub const PERMANENT: &str = "Permanent";

fn theme(contract_type: &str) -> Theme {
    match contract_type {
        "full-time" => Theme::Blue,
        "part-time" => Theme::Violet,
        "contractor" => Theme::Orange,
        "intern" => Theme::Pink,
        _ => Theme::Gray,
    }
}

pub fn card(contract: &ContractView, locale: &CardLocale) -> Node {
    let end_date = contract
        .end_date
        .as_deref()
        .filter(|d| !d.is_empty())
        .map_or_else(|| PERMANENT.to_string(), |d| format::date(d, locale));

    Node::Card {
        kind: "contract",
        theme: theme(&contract.contract_type),
        children: vec![
            Node::Header {
                icon: Icon::FileText,
                title: "Employment Contract".into(),
                subtitle: contract.contract_id.clone(),
                badge: Badge {
                    label: contract.status.clone(),
                    checked: true,
                    live: false,
                },
            },
            Node::Banner {
                label: "Contract Type".into(),
                value: contract.contract_type.replacen('-', " ", 1),
            },
            Node::Grid {
                responsive: true,
                children: vec![
                    Node::tile(
                        Some(Icon::Calendar),
                        "Start Date",
                        format::date(&contract.start_date, locale),
                        Emphasis::Plain,
                    ),
                    Node::tile(Some(Icon::Calendar), "End Date", end_date, Emphasis::Plain),
                    Node::tile(
                        Some(Icon::DollarSign),
                        "Salary",
                        format::usd(contract.salary),
                        Emphasis::Large,
                    ),
                    Node::tile(
                        Some(Icon::Clock),
                        "Working Hours",
                        format!("{} hrs/week", format::number(contract.working_hours)),
                        Emphasis::Large,
                    ),
                ],
            },
            Node::Note {
                label: "Employee ID:".into(),
                value: contract.employee_id.clone(),
            },
            Node::Footer {
                text: format!("Created on {}", format::date(&contract.created_at, locale)),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{render_html, render_text, render_tool_output};
    use serde_json::json;

    fn contract(contract_type: &str) -> serde_json::Value {
        json!({
            "contractId": "CTR-000042",
            "employeeId": "EMP-001",
            "contractType": contract_type,
            "startDate": "2024-01-01",
            "endDate": "2025-12-31",
            "salary": 90000,
            "workingHours": 40,
            "status": "active",
            "createdAt": "2024-01-01T09:00:00.000Z"
        })
    }

    #[test]
    fn contract_card_contents() {
        let node = render_tool_output("create-contract", &contract("full-time"), &CardLocale::utc()).unwrap();
        assert_eq!(node.find_tile("Salary"), Some("$90,000"));
        assert_eq!(node.find_tile("Working Hours"), Some("40 hrs/week"));
        assert_eq!(node.find_tile("End Date"), Some("December 31, 2025"));

        let html = render_html(&node);
        assert!(html.contains("from-blue-500"));
        assert!(html.contains("full time"));
        assert!(html.contains("EMP-001"));
    }

    #[test]
    fn theme_follows_contract_type() {
        assert_eq!(theme("part-time"), Theme::Violet);
        assert_eq!(theme("contractor"), Theme::Orange);
        assert_eq!(theme("intern"), Theme::Pink);
        assert_eq!(theme("seasonal"), Theme::Gray);
    }

    #[test]
    fn missing_end_date_is_permanent() {
        let mut data = contract("intern");
        data.as_object_mut().unwrap().remove("endDate");
        let node = render_tool_output("create-contract", &data, &CardLocale::utc()).unwrap();
        assert_eq!(node.find_tile("End Date"), Some(PERMANENT));
        assert!(render_text(&node).contains("Permanent"));

        data["endDate"] = serde_json::Value::Null;
        let node = render_tool_output("create-contract", &data, &CardLocale::utc()).unwrap();
        assert_eq!(node.find_tile("End Date"), Some(PERMANENT));
    }
}

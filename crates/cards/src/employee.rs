//! Card for a `create-employee` record.

use serde::Deserialize;

use crate::node::{Badge, Emphasis, Icon, Node, Theme};
use crate::{CardLocale, format};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeView {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub position: String,
    pub start_date: String,
    pub salary: f64,
    pub status: String,
    pub created_at: String,
}

pub fn card(employee: &EmployeeView, locale: &CardLocale) -> Node {
    Node::Card {
        kind: "employee",
        theme: Theme::Emerald,
        children: vec![
            Node::Header {
                icon: Icon::User,
                title: format!("{} {}", employee.first_name, employee.last_name),
                subtitle: employee.employee_id.clone(),
                badge: Badge {
                    label: employee.status.clone(),
                    checked: true,
                    live: false,
                },
            },
            Node::Grid {
                responsive: true,
                children: vec![
                    Node::tile(Some(Icon::Mail), "Email", &employee.email, Emphasis::Plain),
                    Node::Tile {
                        icon: Some(Icon::Briefcase),
                        label: "Position".into(),
                        value: employee.position.clone(),
                        detail: Some(employee.department.clone()),
                        emphasis: Emphasis::Medium,
                    },
                    Node::tile(
                        Some(Icon::Calendar),
                        "Start Date",
                        format::date(&employee.start_date, locale),
                        Emphasis::Plain,
                    ),
                    Node::tile(
                        Some(Icon::DollarSign),
                        "Annual Salary",
                        format::usd(employee.salary),
                        Emphasis::Large,
                    ),
                ],
            },
            Node::Footer {
                text: format!("Created on {}", format::date(&employee.created_at, locale)),
            },
        ],
    }
}

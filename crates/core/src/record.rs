//! HR record shapes produced by the tools and consumed by the cards.
//!
//! Every record is synthesized per call and never stored. Field names on
//! the wire are camelCase, timestamps are ISO-8601 UTC with millisecond
//! precision (`2024-01-01T09:00:00.000Z`), and calendar dates are
//! `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::{FieldKind, Schema};

/// Allowed values of [`ContractType`] on the wire.
pub const CONTRACT_TYPES: &[&str] = &["full-time", "part-time", "contractor", "intern"];

/// Allowed values of [`WorkStatus`] on the wire.
pub const WORK_STATUSES: &[&str] = &["working", "completed"];

/// Lifecycle status carried by employees and contracts. Only `active` is
/// ever produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Active,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub position: String,
    pub start_date: NaiveDate,
    pub salary: f64,
    pub status: RecordStatus,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Output shape of the `create-employee` tool.
    pub fn schema() -> Schema {
        Schema::new()
            .required("employeeId", FieldKind::String)
            .required("firstName", FieldKind::String)
            .required("lastName", FieldKind::String)
            .required("email", FieldKind::String)
            .required("department", FieldKind::String)
            .required("position", FieldKind::String)
            .required("startDate", FieldKind::Date)
            .required("salary", FieldKind::Number)
            .required("status", FieldKind::String)
            .required("createdAt", FieldKind::Timestamp)
    }
}

/// Kind of employment contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContractType {
    FullTime,
    PartTime,
    Contractor,
    Intern,
}

impl ContractType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "full-time",
            Self::PartTime => "part-time",
            Self::Contractor => "contractor",
            Self::Intern => "intern",
        }
    }

    /// Human-readable name: the wire value with its hyphen replaced.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::FullTime => "full time",
            Self::PartTime => "part time",
            Self::Contractor => "contractor",
            Self::Intern => "intern",
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub contract_id: String,
    /// Not checked against any employee record.
    pub employee_id: String,
    pub contract_type: ContractType,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub salary: f64,
    pub working_hours: f64,
    pub status: RecordStatus,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

impl Contract {
    /// Output shape of the `create-contract` tool.
    pub fn schema() -> Schema {
        Schema::new()
            .required("contractId", FieldKind::String)
            .required("employeeId", FieldKind::String)
            .required("contractType", FieldKind::Enum(CONTRACT_TYPES))
            .required("startDate", FieldKind::Date)
            .optional("endDate", FieldKind::Date)
            .required("salary", FieldKind::Number)
            .required("workingHours", FieldKind::Number)
            .required("status", FieldKind::String)
            .required("createdAt", FieldKind::Timestamp)
    }
}

/// Whether the employee is still clocked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkStatus {
    Working,
    Completed,
}

impl WorkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Working => "working",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakInterval {
    #[serde(with = "iso_millis")]
    pub start: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub end: DateTime<Utc>,
    /// Length in hours.
    pub duration: f64,
}

impl BreakInterval {
    pub fn schema() -> Schema {
        Schema::new()
            .required("start", FieldKind::Timestamp)
            .required("end", FieldKind::Timestamp)
            .required("duration", FieldKind::Number)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingTimeRecord {
    pub employee_id: String,
    /// Placeholder, never looked up.
    pub employee_name: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_millis::option")]
    pub clock_in: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_millis::option")]
    pub clock_out: Option<DateTime<Utc>>,
    pub total_hours: f64,
    pub status: WorkStatus,
    #[serde(default)]
    pub breaks: Vec<BreakInterval>,
    pub weekly_hours: f64,
    pub overtime_hours: f64,
}

impl WorkingTimeRecord {
    /// Output shape of the `check-working-time` tool.
    pub fn schema() -> Schema {
        Schema::new()
            .required("employeeId", FieldKind::String)
            .required("employeeName", FieldKind::String)
            .required("date", FieldKind::Date)
            .optional("clockIn", FieldKind::Timestamp)
            .optional("clockOut", FieldKind::Timestamp)
            .required("totalHours", FieldKind::Number)
            .required("status", FieldKind::Enum(WORK_STATUSES))
            .required("breaks", FieldKind::List(BreakInterval::schema()))
            .required("weeklyHours", FieldKind::Number)
            .required("overtimeHours", FieldKind::Number)
    }

    pub fn is_working(&self) -> bool {
        self.status == WorkStatus::Working
    }
}

/// Serde adapter for `DateTime<Utc>` as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => serializer.serialize_str(&super::format(dt)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            raw.map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(serde::de::Error::custom)
            })
            .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_contract(end_date: Option<NaiveDate>) -> Contract {
        Contract {
            contract_id: "CTR-000001".into(),
            employee_id: "EMP-1".into(),
            contract_type: ContractType::PartTime,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date,
            salary: 45_000.0,
            working_hours: 20.0,
            status: RecordStatus::Active,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn contract_serializes_camel_case_with_millis() {
        let json = serde_json::to_value(sample_contract(None)).unwrap();
        assert_eq!(json["contractType"], "part-time");
        assert_eq!(json["startDate"], "2024-01-01");
        assert_eq!(json["status"], "active");
        assert_eq!(json["createdAt"], "2024-01-01T09:30:00.000Z");
        assert!(json.get("endDate").is_none());
        assert!(Contract::schema().validate(&json).is_ok());
    }

    #[test]
    fn contract_end_date_is_emitted_when_present() {
        let json =
            serde_json::to_value(sample_contract(NaiveDate::from_ymd_opt(2024, 12, 31))).unwrap();
        assert_eq!(json["endDate"], "2024-12-31");
    }

    #[test]
    fn working_time_without_clock_out_parses() {
        let json = serde_json::json!({
            "employeeId": "EMP-1",
            "employeeName": "John Doe",
            "date": "2024-03-04",
            "clockIn": "2024-03-04T09:00:00.000Z",
            "totalHours": 3.5,
            "status": "working",
            "breaks": [],
            "weeklyHours": 38.5,
            "overtimeHours": 2.5
        });
        assert!(WorkingTimeRecord::schema().validate(&json).is_ok());
        let record: WorkingTimeRecord = serde_json::from_value(json).unwrap();
        assert!(record.is_working());
        assert!(record.clock_in.is_some());
        assert!(record.clock_out.is_none());
    }

    #[test]
    fn contract_type_names() {
        assert_eq!(ContractType::FullTime.as_str(), "full-time");
        assert_eq!(ContractType::FullTime.display_name(), "full time");
        let parsed: ContractType = serde_json::from_str("\"contractor\"").unwrap();
        assert_eq!(parsed, ContractType::Contractor);
        for name in CONTRACT_TYPES {
            let parsed: ContractType = serde_json::from_value(serde_json::json!(name)).unwrap();
            assert_eq!(parsed.as_str(), *name);
        }
    }
}

//! `create-contract`: draw up an employment contract.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use hrdesk_core::error::ToolError;
use hrdesk_core::record::{CONTRACT_TYPES, Contract, ContractType, RecordStatus};
use hrdesk_core::schema::{FieldKind, Schema};
use hrdesk_core::tool::Tool;
use serde::Deserialize;
use std::sync::{Arc, LazyLock};
use tracing::info;

use crate::source::HrDataSource;
use crate::{parse_input, record_value};

pub const NAME: &str = "create-contract";

static INPUT: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .required("employeeId", FieldKind::String)
        .describe("Employee ID")
        .required("contractType", FieldKind::Enum(CONTRACT_TYPES))
        .describe("Type of contract")
        .required("startDate", FieldKind::Date)
        .describe("Contract start date (YYYY-MM-DD)")
        .optional("endDate", FieldKind::Date)
        .describe("Contract end date (YYYY-MM-DD), optional for permanent contracts")
        .required("salary", FieldKind::Number)
        .describe("Salary amount")
        .required("workingHours", FieldKind::Number)
        .describe("Weekly working hours")
});

static OUTPUT: LazyLock<Schema> = LazyLock::new(Contract::schema);

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewContract {
    employee_id: String,
    contract_type: ContractType,
    start_date: NaiveDate,
    #[serde(default)]
    end_date: Option<NaiveDate>,
    salary: f64,
    working_hours: f64,
}

pub struct CreateContractTool {
    source: Arc<dyn HrDataSource>,
}

impl CreateContractTool {
    pub fn new(source: Arc<dyn HrDataSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for CreateContractTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Create a new employment contract"
    }

    fn input_schema(&self) -> &Schema {
        &INPUT
    }

    fn output_schema(&self) -> &Schema {
        &OUTPUT
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let input: NewContract = parse_input(NAME, arguments)?;

        // employeeId is taken on trust; there is no employee store to check
        let contract = Contract {
            contract_id: self.source.next_id("CTR"),
            employee_id: input.employee_id,
            contract_type: input.contract_type,
            start_date: input.start_date,
            end_date: input.end_date,
            salary: input.salary,
            working_hours: input.working_hours,
            status: RecordStatus::Active,
            created_at: self.source.now().with_timezone(&Utc),
        };

        info!(
            contract_id = %contract.contract_id,
            contract_type = %contract.contract_type,
            permanent = contract.end_date.is_none(),
            "Contract created"
        );
        record_value(NAME, &contract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::source_at;
    use hrdesk_core::schema::ValidationIssue;
    use hrdesk_core::tool::{ToolCall, ToolRegistry};

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(CreateContractTool::new(source_at(11, 30))));
        registry
    }

    fn call(arguments: serde_json::Value) -> ToolCall {
        ToolCall {
            id: "call_1".into(),
            name: NAME.into(),
            arguments,
        }
    }

    #[tokio::test]
    async fn full_time_permanent_contract() {
        let result = registry()
            .execute(&call(serde_json::json!({
                "employeeId": "EMP-1",
                "contractType": "full-time",
                "startDate": "2024-01-01",
                "salary": 90000,
                "workingHours": 40
            })))
            .await
            .unwrap();

        let out = &result.data;
        assert_eq!(out["status"], "active");
        assert_eq!(out["contractType"], "full-time");
        assert_eq!(out["employeeId"], "EMP-1");
        assert!(!out["contractId"].as_str().unwrap().is_empty());
        assert!(out.get("endDate").is_none());
    }

    #[tokio::test]
    async fn fixed_term_contract_keeps_end_date() {
        let result = registry()
            .execute(&call(serde_json::json!({
                "employeeId": "EMP-2",
                "contractType": "intern",
                "startDate": "2024-06-01",
                "endDate": "2024-08-31",
                "salary": 2000,
                "workingHours": 20
            })))
            .await
            .unwrap();
        assert_eq!(result.data["endDate"], "2024-08-31");
        assert!(result.data["contractId"].as_str().unwrap().starts_with("CTR-"));
    }

    #[tokio::test]
    async fn null_end_date_means_permanent() {
        let result = registry()
            .execute(&call(serde_json::json!({
                "employeeId": "EMP-3",
                "contractType": "contractor",
                "startDate": "2024-01-01",
                "endDate": null,
                "salary": 50,
                "workingHours": 10
            })))
            .await
            .unwrap();
        assert!(result.data.get("endDate").is_none());
    }

    #[tokio::test]
    async fn unknown_contract_type_is_rejected() {
        let err = registry()
            .execute(&call(serde_json::json!({
                "employeeId": "EMP-1",
                "contractType": "freelance",
                "startDate": "2024-01-01",
                "salary": 1,
                "workingHours": 1
            })))
            .await
            .unwrap_err();
        let violation = err.validation().unwrap();
        assert_eq!(violation.field, "contractType");
        assert!(matches!(violation.issue, ValidationIssue::NotInEnum { .. }));
    }

    #[tokio::test]
    async fn unpadded_start_date_is_rejected() {
        let err = registry()
            .execute(&call(serde_json::json!({
                "employeeId": "EMP-1",
                "contractType": "full-time",
                "startDate": "2024-1-1",
                "salary": 90000,
                "workingHours": 40
            })))
            .await
            .unwrap_err();
        let violation = err.validation().unwrap();
        assert_eq!(violation.field, "startDate");
        assert_eq!(violation.issue, ValidationIssue::InvalidDate);
    }

    #[tokio::test]
    async fn missing_working_hours_names_the_field() {
        let err = registry()
            .execute(&call(serde_json::json!({
                "employeeId": "EMP-1",
                "contractType": "part-time",
                "startDate": "2024-01-01",
                "salary": 1
            })))
            .await
            .unwrap_err();
        assert_eq!(err.validation().unwrap().field, "workingHours");
    }
}

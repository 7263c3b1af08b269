//! The HR tools the assistant can call.
//!
//! - `create-employee`: new employee record
//! - `create-contract`: new employment contract
//! - `check-working-time`: today's attendance for an employee
//!
//! Each tool synthesizes its record from an injected [`HrDataSource`];
//! nothing is persisted.

pub mod check_working_time;
pub mod create_contract;
pub mod create_employee;
pub mod source;

use hrdesk_core::error::ToolError;
use hrdesk_core::tool::ToolRegistry;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub use check_working_time::CheckWorkingTimeTool;
pub use create_contract::CreateContractTool;
pub use create_employee::CreateEmployeeTool;
pub use source::{Clock, FixedClock, HrDataSource, Placeholders, SimulatedSource, SystemClock, Workday};

/// A registry holding the three HR tools, all backed by `source`.
pub fn default_registry(source: Arc<dyn HrDataSource>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(CreateEmployeeTool::new(source.clone())));
    registry.register(Box::new(CreateContractTool::new(source.clone())));
    registry.register(Box::new(CheckWorkingTimeTool::new(source)));
    registry
}

/// Deserialize already-validated arguments into a tool's input struct.
fn parse_input<T: DeserializeOwned>(tool: &str, arguments: serde_json::Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments(format!("{tool}: {e}")))
}

fn record_value<T: Serialize>(tool: &str, record: &T) -> Result<serde_json::Value, ToolError> {
    serde_json::to_value(record).map_err(|e| ToolError::ExecutionFailed {
        tool_name: tool.to_string(),
        reason: e.to_string(),
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use test_support::source_at;

    #[test]
    fn default_registry_has_the_three_tools() {
        let registry = default_registry(source_at(10, 0));
        assert_eq!(
            registry.names(),
            vec!["check-working-time", "create-contract", "create-employee"]
        );
    }

    #[tokio::test]
    async fn every_tool_output_validates_against_its_schema() {
        let registry = default_registry(source_at(15, 45));
        let calls = [
            (
                "create-employee",
                serde_json::json!({
                    "firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com",
                    "department": "Research", "position": "Analyst",
                    "startDate": "2024-04-01", "salary": 120000
                }),
            ),
            (
                "create-contract",
                serde_json::json!({
                    "employeeId": "EMP-1", "contractType": "part-time",
                    "startDate": "2024-04-01", "endDate": "2025-03-31",
                    "salary": 60000, "workingHours": 20
                }),
            ),
            ("check-working-time", serde_json::json!({"employeeId": "EMP-1"})),
        ];

        for (name, arguments) in calls {
            let call = hrdesk_core::tool::ToolCall {
                id: format!("call_{name}"),
                name: name.into(),
                arguments,
            };
            let result = registry.execute(&call).await.unwrap();
            let tool = registry.get(name).unwrap();
            assert!(tool.output_schema().validate(&result.data).is_ok());
        }
    }
}

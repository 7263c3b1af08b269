//! `create-employee`: hire someone into the simulated HR system.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use hrdesk_core::error::ToolError;
use hrdesk_core::record::{Employee, RecordStatus};
use hrdesk_core::schema::{FieldKind, Schema};
use hrdesk_core::tool::Tool;
use serde::Deserialize;
use std::sync::{Arc, LazyLock};
use tracing::info;

use crate::source::HrDataSource;
use crate::{parse_input, record_value};

pub const NAME: &str = "create-employee";

static INPUT: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .required("firstName", FieldKind::String)
        .describe("Employee first name")
        .required("lastName", FieldKind::String)
        .describe("Employee last name")
        .required("email", FieldKind::Email)
        .describe("Employee email address")
        .required("department", FieldKind::String)
        .describe("Department (e.g., Engineering, Marketing, HR)")
        .required("position", FieldKind::String)
        .describe("Job position/title")
        .required("startDate", FieldKind::Date)
        .describe("Start date (YYYY-MM-DD format)")
        .required("salary", FieldKind::Number)
        .describe("Annual salary")
});

static OUTPUT: LazyLock<Schema> = LazyLock::new(Employee::schema);

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewEmployee {
    first_name: String,
    last_name: String,
    email: String,
    department: String,
    position: String,
    start_date: NaiveDate,
    salary: f64,
}

pub struct CreateEmployeeTool {
    source: Arc<dyn HrDataSource>,
}

impl CreateEmployeeTool {
    pub fn new(source: Arc<dyn HrDataSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for CreateEmployeeTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Create a new employee record in the HR system"
    }

    fn input_schema(&self) -> &Schema {
        &INPUT
    }

    fn output_schema(&self) -> &Schema {
        &OUTPUT
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let input: NewEmployee = parse_input(NAME, arguments)?;

        let employee = Employee {
            employee_id: self.source.next_id("EMP"),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            department: input.department,
            position: input.position,
            start_date: input.start_date,
            salary: input.salary,
            status: RecordStatus::Active,
            created_at: self.source.now().with_timezone(&Utc),
        };

        info!(employee_id = %employee.employee_id, department = %employee.department, "Employee created");
        record_value(NAME, &employee)
    }
}

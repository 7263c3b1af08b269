//! `check-working-time`: today's attendance for one employee.
//!
//! Everyone clocks in at the start of the workday. While the local clock is
//! inside the workday the employee is still `working` and the hours so far
//! are reported; otherwise the day is `completed` with a drawn length.

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Timelike, Utc};
use hrdesk_core::error::ToolError;
use hrdesk_core::record::{BreakInterval, WorkStatus, WorkingTimeRecord};
use hrdesk_core::schema::{FieldKind, Schema};
use hrdesk_core::tool::Tool;
use serde::Deserialize;
use std::sync::{Arc, LazyLock};
use tracing::debug;

use crate::source::HrDataSource;
use crate::{parse_input, record_value};

pub const NAME: &str = "check-working-time";

static INPUT: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .required("employeeId", FieldKind::String)
        .describe("Employee ID")
        .optional("date", FieldKind::Date)
        .describe("Date to check (YYYY-MM-DD), defaults to today")
});

static OUTPUT: LazyLock<Schema> = LazyLock::new(WorkingTimeRecord::schema);

/// The lunch break starts this long after clock-in.
const BREAK_OFFSET_MINUTES: i64 = 4 * 60;
const BREAK_MINUTES: i64 = 30;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Lookup {
    employee_id: String,
    #[serde(default)]
    date: Option<NaiveDate>,
}

pub struct CheckWorkingTimeTool {
    source: Arc<dyn HrDataSource>,
}

impl CheckWorkingTimeTool {
    pub fn new(source: Arc<dyn HrDataSource>) -> Self {
        Self { source }
    }

    fn clock_in(&self, now: DateTime<FixedOffset>) -> Result<DateTime<Utc>, ToolError> {
        let start = now
            .date_naive()
            .and_hms_opt(self.source.workday().start_hour, 0, 0)
            .and_then(|naive| now.offset().from_local_datetime(&naive).single())
            .ok_or_else(|| ToolError::ExecutionFailed {
                tool_name: NAME.into(),
                reason: "workday start hour is not a valid local time".into(),
            })?;
        Ok(start.with_timezone(&Utc))
    }
}

#[async_trait]
impl Tool for CheckWorkingTimeTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Check current working time and attendance for an employee"
    }

    fn input_schema(&self) -> &Schema {
        &INPUT
    }

    fn output_schema(&self) -> &Schema {
        &OUTPUT
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let input: Lookup = parse_input(NAME, arguments)?;
        let now = self.source.now();
        let clock_in = self.clock_in(now)?;
        let working = self.source.workday().contains(now.hour());

        let (clock_out, total_hours) = if working {
            let elapsed = (now.with_timezone(&Utc) - clock_in).num_milliseconds() as f64 / 3_600_000.0;
            (None, (elapsed * 10.0).floor() / 10.0)
        } else {
            let hours = self.source.hours_worked();
            (Some(clock_in + Duration::hours(i64::from(hours))), f64::from(hours))
        };

        let break_start = clock_in + Duration::minutes(BREAK_OFFSET_MINUTES);
        let placeholders = self.source.placeholders();

        let record = WorkingTimeRecord {
            employee_id: input.employee_id,
            employee_name: placeholders.employee_name.clone(),
            date: input
                .date
                .unwrap_or_else(|| now.with_timezone(&Utc).date_naive()),
            clock_in: Some(clock_in),
            clock_out,
            total_hours,
            status: if working {
                WorkStatus::Working
            } else {
                WorkStatus::Completed
            },
            breaks: vec![BreakInterval {
                start: break_start,
                end: break_start + Duration::minutes(BREAK_MINUTES),
                duration: BREAK_MINUTES as f64 / 60.0,
            }],
            weekly_hours: placeholders.weekly_hours,
            overtime_hours: placeholders.overtime_hours,
        };

        debug!(employee_id = %record.employee_id, status = %record.status, total_hours, "Working time computed");
        record_value(NAME, &record)
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Two-step daily lifecycle: a record is created incomplete on
/// check-in and completed on check-out. Stored as lowercase strings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStatus {
    Incomplete,
    Completed,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// One row per (employee, calendar day); the unique key on that pair
/// is what enforces single check-in under concurrent requests. Rows
/// are never deleted, only their approval status changes.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    pub id: u64,
    pub employee_id: u64,

    #[schema(example = "2026-03-02", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "2026-03-02T09:00:00Z", value_type = String, format = "date-time")]
    pub check_in_at: Option<DateTime<Utc>>,
    pub check_in_latitude: Option<f64>,
    pub check_in_longitude: Option<f64>,
    pub check_in_photo_ref: Option<String>,

    #[schema(example = "2026-03-02T18:00:00Z", value_type = String, format = "date-time")]
    pub check_out_at: Option<DateTime<Utc>>,
    pub check_out_latitude: Option<f64>,
    pub check_out_longitude: Option<f64>,
    pub check_out_photo_ref: Option<String>,

    pub total_minutes: Option<i64>,

    #[schema(example = 85)]
    pub validation_score: Option<u32>,

    /// Correlates the row with its review-queue entry and log lines.
    pub attempt_id: Option<String>,

    #[schema(example = "incomplete", value_type = String)]
    pub lifecycle_status: String,

    #[schema(example = "pending", value_type = String)]
    pub approval_status: String,
}

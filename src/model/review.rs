use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A manual-review queue entry for an attendance attempt whose score
/// fell below the auto-approval threshold. Carries the per-rule flags
/// so an administrator sees exactly which checks failed.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ReviewTask {
    pub id: u64,
    pub attendance_id: u64,
    pub employee_id: u64,

    #[schema(example = "6b2f1d0a-3c9e-4f2a-9b3d-1a2b3c4d5e6f")]
    pub attempt_id: String,

    #[schema(example = 65)]
    pub score: u32,

    pub within_radius: bool,
    pub wifi_approved: bool,
    pub device_registered: bool,
    pub within_work_hours: bool,

    #[schema(example = "medium", value_type = String)]
    pub priority: String,

    #[schema(example = "pending", value_type = String)]
    pub status: String,

    #[schema(nullable = true)]
    pub reject_reason: Option<String>,

    #[schema(example = "2026-03-02T09:00:00Z", value_type = String, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}

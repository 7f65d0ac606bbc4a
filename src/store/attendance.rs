use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::engine::lifecycle::{CheckInDecision, CheckOutDecision};
use crate::model::attendance::{AttendanceRecord, LifecycleStatus};

/// Today's record for an employee, if any.
pub async fn get_today_record(
    pool: &MySqlPool,
    employee_id: u64,
    date: NaiveDate,
) -> Result<Option<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT *
        FROM attendance_records
        WHERE employee_id = ? AND date = ?
        "#,
    )
    .bind(employee_id)
    .bind(date)
    .fetch_optional(pool)
    .await
}

/// Inserts the day's record. The (employee_id, date) unique key is the
/// real guard against concurrent double check-in; callers map the
/// duplicate-key error to AlreadyCheckedIn.
pub async fn insert_check_in(
    pool: &MySqlPool,
    employee_id: u64,
    date: NaiveDate,
    decision: &CheckInDecision,
    approval_status: &str,
    attempt_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO attendance_records
            (employee_id, date, check_in_at, check_in_latitude, check_in_longitude,
             check_in_photo_ref, validation_score, attempt_id,
             lifecycle_status, approval_status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(date)
    .bind(decision.at)
    .bind(decision.position.latitude)
    .bind(decision.position.longitude)
    .bind(&decision.photo_ref)
    .bind(decision.validation.score as u32)
    .bind(attempt_id)
    .bind(LifecycleStatus::Incomplete.to_string())
    .bind(approval_status)
    .execute(pool)
    .await?;

    Ok(result.last_insert_id())
}

/// Completes an incomplete record. Returns affected rows; 0 means the
/// record was already completed by another request.
pub async fn apply_check_out(
    pool: &MySqlPool,
    record_id: u64,
    decision: &CheckOutDecision,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE attendance_records
        SET check_out_at = ?,
            check_out_latitude = ?,
            check_out_longitude = ?,
            check_out_photo_ref = ?,
            total_minutes = ?,
            lifecycle_status = ?
        WHERE id = ? AND lifecycle_status = ?
        "#,
    )
    .bind(decision.at)
    .bind(decision.position.latitude)
    .bind(decision.position.longitude)
    .bind(&decision.photo_ref)
    .bind(decision.total_minutes)
    .bind(LifecycleStatus::Completed.to_string())
    .bind(record_id)
    .bind(LifecycleStatus::Incomplete.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

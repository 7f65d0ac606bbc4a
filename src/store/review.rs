use sqlx::MySqlPool;

use crate::engine::score::{ReviewPriority, ValidationResult};
use crate::model::attendance::ApprovalStatus;

/// Queues a sub-threshold attempt for an administrator. Carries the
/// score and per-rule flags so the reviewer sees what failed.
pub async fn enqueue(
    pool: &MySqlPool,
    attendance_id: u64,
    employee_id: u64,
    attempt_id: &str,
    validation: &ValidationResult,
    priority: ReviewPriority,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO review_tasks
            (attendance_id, employee_id, attempt_id, score,
             within_radius, wifi_approved, device_registered, within_work_hours,
             priority, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 'pending')
        "#,
    )
    .bind(attendance_id)
    .bind(employee_id)
    .bind(attempt_id)
    .bind(validation.score as u32)
    .bind(validation.outcomes.within_radius)
    .bind(validation.outcomes.wifi_approved)
    .bind(validation.outcomes.device_registered)
    .bind(validation.outcomes.within_work_hours)
    .bind(priority.to_string())
    .execute(pool)
    .await?;

    Ok(result.last_insert_id())
}

/// Approves a pending task and flips the attendance record with it,
/// in one transaction. Returns false if the task was not pending.
pub async fn approve(pool: &MySqlPool, task_id: u64) -> Result<bool, sqlx::Error> {
    resolve(pool, task_id, ApprovalStatus::Approved, None).await
}

pub async fn reject(pool: &MySqlPool, task_id: u64, reason: &str) -> Result<bool, sqlx::Error> {
    resolve(pool, task_id, ApprovalStatus::Rejected, Some(reason)).await
}

async fn resolve(
    pool: &MySqlPool,
    task_id: u64,
    status: ApprovalStatus,
    reason: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE review_tasks
        SET status = ?, reject_reason = ?
        WHERE id = ? AND status = 'pending'
        "#,
    )
    .bind(status.to_string())
    .bind(reason)
    .bind(task_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query(
        r#"
        UPDATE attendance_records
        SET approval_status = ?
        WHERE id = (SELECT attendance_id FROM review_tasks WHERE id = ?)
        "#,
    )
    .bind(status.to_string())
    .bind(task_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(true)
}

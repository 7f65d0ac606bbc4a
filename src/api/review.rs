use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::model::review::ReviewTask;
use crate::store;

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ReviewFilter {
    #[schema(example = "pending")]
    /// Filter by task status
    pub status: Option<String>,
    #[schema(example = "high")]
    /// Filter by priority
    pub priority: Option<String>,
    #[schema(example = 123)]
    /// Filter by employee ID
    pub employee_id: Option<u64>,
    #[schema(example = 1)]
    pub page: Option<u64>,
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

#[derive(Serialize, ToSchema)]
pub struct ReviewListResponse {
    pub data: Vec<ReviewTask>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

#[derive(Deserialize, ToSchema)]
pub struct RejectReview {
    #[schema(example = "Photo does not match employee")]
    pub reason: String,
}

/// Manual review queue listing
#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    params(ReviewFilter),
    responses(
        (status = 200, description = "Paginated review queue", body = ReviewListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Review"
)]
pub async fn review_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ReviewFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    if let Some(priority) = query.priority.as_deref() {
        where_sql.push_str(" AND priority = ?");
        args.push(FilterValue::Str(priority));
    }

    if let Some(emp_id) = query.employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(emp_id));
    }

    let count_sql = format!("SELECT COUNT(*) FROM review_tasks{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error=%e, "Failed to count review tasks");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // high priority first, then oldest first
    let data_sql = format!(
        r#"
        SELECT *
        FROM review_tasks
        {}
        ORDER BY FIELD(priority, 'high', 'medium', 'low'), created_at ASC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, ReviewTask>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let tasks = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error=%e, "Failed to fetch review queue");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(ReviewListResponse {
        data: tasks,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

/// Approve a pending review task (HR/Admin)
#[utoipa::path(
    put,
    path = "/api/v1/reviews/{task_id}/approve",
    params(
        ("task_id" = u64, Path, description = "ID of the review task to approve")
    ),
    responses(
        (status = 200, description = "Attendance approved", body = Object, example = json!({
            "message": "Attendance approved"
        })),
        (status = 400, description = "Review task not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Review"
)]
pub async fn approve_review(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let task_id = path.into_inner();

    let resolved = store::review::approve(pool.get_ref(), task_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, task_id, "Approve review failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if !resolved {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Review task not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Attendance approved"
    })))
}

/// Reject a pending review task (HR/Admin)
#[utoipa::path(
    put,
    path = "/api/v1/reviews/{task_id}/reject",
    params(
        ("task_id" = u64, Path, description = "ID of the review task to reject")
    ),
    request_body = RejectReview,
    responses(
        (status = 200, description = "Attendance rejected", body = Object, example = json!({
            "message": "Attendance rejected"
        })),
        (status = 400, description = "Review task not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Review"
)]
pub async fn reject_review(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<RejectReview>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let task_id = path.into_inner();

    if body.reason.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "A reject reason is required"
        })));
    }

    let resolved = store::review::reject(pool.get_ref(), task_id, body.reason.trim())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, task_id, "Reject review failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if !resolved {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Review task not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Attendance rejected"
    })))
}

use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{MySqlPool, prelude::FromRow};
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;

#[derive(Deserialize, ToSchema)]
pub struct CreateBonus {
    #[schema(example = "2026-03-01", format = "date", value_type = String)]
    pub month: NaiveDate,
    #[schema(example = 5000.0)]
    pub amount: f64,
    #[schema(example = "On-call coverage during release week")]
    pub reason: String,
}

#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct BonusResponse {
    pub id: u64,
    pub employee_id: u64,
    #[schema(example = "2026-03-01", format = "date", value_type = String)]
    pub month: NaiveDate,
    #[schema(example = 5000.0)]
    pub amount: f64,
    pub reason: String,
    #[schema(example = "pending", value_type = String)]
    pub status: Option<String>,
    #[schema(example = "2026-03-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct BonusFilter {
    #[schema(example = 123)]
    pub employee_id: Option<u64>,
    #[schema(example = "pending")]
    pub status: Option<String>,
    #[schema(example = 1)]
    pub page: Option<u64>,
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct BonusListResponse {
    pub data: Vec<BonusResponse>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

/// Submit a bonus request
#[utoipa::path(
    post,
    path = "/api/v1/bonus",
    request_body = CreateBonus,
    responses(
        (status = 200, description = "Bonus request submitted", body = Object, example = json!({
            "message": "Bonus request submitted",
            "status": "pending"
        })),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Bonus"
)]
pub async fn create_bonus(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateBonus>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_id()?;

    if payload.amount <= 0.0 || !payload.amount.is_finite() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "amount must be positive"
        })));
    }

    if payload.reason.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "reason must not be empty"
        })));
    }

    sqlx::query(
        r#"
        INSERT INTO bonus_requests (employee_id, month, amount, reason, status)
        VALUES (?, ?, ?, ?, 'pending')
        "#,
    )
    .bind(employee_id)
    .bind(payload.month)
    .bind(payload.amount)
    .bind(payload.reason.trim())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to create bonus request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Bonus request submitted",
        "status": "pending"
    })))
}

/// Paginated bonus request list (HR/Admin)
#[utoipa::path(
    get,
    path = "/api/v1/bonus",
    params(BonusFilter),
    responses(
        (status = 200, description = "Paginated bonus list", body = BonusListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Bonus"
)]
pub async fn bonus_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<BonusFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(emp_id) = query.employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(emp_id));
    }

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    let count_sql = format!("SELECT COUNT(*) FROM bonus_requests{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error=%e, "Failed to count bonus requests");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT id, employee_id, month, amount, reason, status, created_at
        FROM bonus_requests
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, BonusResponse>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let bonuses = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error=%e, "Failed to fetch bonus list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(BonusListResponse {
        data: bonuses,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

/// Approve bonus request (HR/Admin)
#[utoipa::path(
    put,
    path = "/api/v1/bonus/{bonus_id}/approve",
    params(
        ("bonus_id" = u64, Path, description = "ID of the bonus request to approve")
    ),
    responses(
        (status = 200, description = "Bonus approved", body = Object, example = json!({
            "message": "Bonus approved"
        })),
        (status = 400, description = "Bonus request not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Bonus"
)]
pub async fn approve_bonus(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let bonus_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE bonus_requests
        SET status = 'approved'
        WHERE id = ? AND status = 'pending'
        "#,
    )
    .bind(bonus_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, bonus_id, "Approve bonus failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Bonus request not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Bonus approved"
    })))
}

/// Reject bonus request (HR/Admin)
#[utoipa::path(
    put,
    path = "/api/v1/bonus/{bonus_id}/reject",
    params(
        ("bonus_id" = u64, Path, description = "ID of the bonus request to reject")
    ),
    responses(
        (status = 200, description = "Bonus rejected", body = Object, example = json!({
            "message": "Bonus rejected"
        })),
        (status = 400, description = "Bonus request not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Bonus"
)]
pub async fn reject_bonus(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let bonus_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE bonus_requests
        SET status = 'rejected'
        WHERE id = ? AND status = 'pending'
        "#,
    )
    .bind(bonus_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, bonus_id, "Reject bonus failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Bonus request not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Bonus rejected"
    })))
}

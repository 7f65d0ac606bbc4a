use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::model::salary::SalarySlip;

#[derive(Deserialize, ToSchema)]
pub struct CreateSalarySlip {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "2026-03-01", value_type = String, format = "date")]
    pub month: NaiveDate,

    #[schema(example = 50000.0)]
    pub base_salary: f64,

    #[schema(example = 2000.0)]
    pub deductions: f64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct SalaryQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,

    #[schema(example = 10)]
    pub per_page: Option<u32>,

    #[schema(example = 1001)]
    pub employee_id: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct SalaryListResponse {
    pub data: Vec<SalarySlip>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// Generate a salary slip (Admin). The bonus column is the sum of the
/// employee's approved bonus requests for that month; net is
/// base + bonus - deductions.
#[utoipa::path(
    post,
    path = "/api/v1/salary",
    request_body = CreateSalarySlip,
    responses(
        (status = 201, description = "Salary slip created"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Salary"
)]
pub async fn create_salary_slip(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateSalarySlip>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let bonus_total = sqlx::query_scalar::<_, Option<f64>>(
        r#"
        SELECT SUM(amount)
        FROM bonus_requests
        WHERE employee_id = ? AND month = ? AND status = 'approved'
        "#,
    )
    .bind(payload.employee_id)
    .bind(payload.month)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id = payload.employee_id, "Failed to sum bonuses");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?
    .unwrap_or(0.0);

    let net_salary = payload.base_salary + bonus_total - payload.deductions;

    sqlx::query(
        r#"
        INSERT INTO salary_slips
        (employee_id, month, base_salary, bonus_total, deductions, net_salary)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.employee_id)
    .bind(payload.month)
    .bind(payload.base_salary)
    .bind(bonus_total)
    .bind(payload.deductions)
    .bind(net_salary)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id = payload.employee_id, "Failed to create salary slip");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Salary slip created successfully",
        "bonus_total": bonus_total,
        "net_salary": net_salary
    })))
}

/// Get a salary slip by ID
#[utoipa::path(
    get,
    path = "/api/v1/salary/{slip_id}",
    params(
        ("slip_id", Path, description = "Salary slip ID")
    ),
    responses(
        (status = 200, body = SalarySlip),
        (status = 404)
    ),
    security(("bearer_auth" = [])),
    tag = "Salary"
)]
pub async fn get_salary_slip(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let slip_id = path.into_inner();

    let slip = sqlx::query_as::<_, SalarySlip>(r#"SELECT * FROM salary_slips WHERE id = ?"#)
        .bind(slip_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, slip_id, "Failed to fetch salary slip");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match slip {
        Some(s) => Ok(HttpResponse::Ok().json(s)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Salary slip not found"
        }))),
    }
}

/// Paginated salary slip list
#[utoipa::path(
    get,
    path = "/api/v1/salary",
    params(SalaryQuery),
    responses(
        (status = 200, body = SalaryListResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Salary"
)]
pub async fn list_salary_slips(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<SalaryQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let (count_sql, data_sql) = match query.employee_id {
        Some(_) => (
            "SELECT COUNT(*) FROM salary_slips WHERE employee_id = ?",
            "SELECT * FROM salary_slips WHERE employee_id = ? ORDER BY month DESC LIMIT ? OFFSET ?",
        ),
        None => (
            "SELECT COUNT(*) FROM salary_slips",
            "SELECT * FROM salary_slips ORDER BY month DESC LIMIT ? OFFSET ?",
        ),
    };

    let mut count_q = sqlx::query_scalar::<_, i64>(count_sql);
    if let Some(emp_id) = query.employee_id {
        count_q = count_q.bind(emp_id);
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count salary slips");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let mut data_q = sqlx::query_as::<_, SalarySlip>(data_sql);
    if let Some(emp_id) = query.employee_id {
        data_q = data_q.bind(emp_id);
    }

    let data = data_q
        .bind(per_page as i64)
        .bind(offset as i64)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch salary slip list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(SalaryListResponse {
        data,
        page,
        per_page,
        total,
    }))
}

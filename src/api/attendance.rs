use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::engine::geo::Coordinate;
use crate::engine::lifecycle::{self, AttendanceError, AttendanceState, CheckInAttempt};
use crate::engine::rules::{self, AttemptFacts, Geofence, ValidationContext};
use crate::engine::score::{Decision, ValidationResult};
use crate::model::attendance::{ApprovalStatus, AttendanceRecord, LifecycleStatus};
use crate::store;
use crate::utils::{device_filter, office_cache};

#[derive(Deserialize, ToSchema)]
pub struct AttendancePayload {
    #[schema(example = 23.8103)]
    pub latitude: Option<f64>,
    #[schema(example = 90.4125)]
    pub longitude: Option<f64>,
    /// GPS accuracy in meters, forwarded for audit only
    #[schema(example = 12.5)]
    pub accuracy: Option<f64>,
    #[schema(example = "HQ-Staff")]
    pub wifi_ssid: Option<String>,
    #[schema(example = "fp-9f8e7d6c")]
    pub device_fingerprint: Option<String>,
    /// Opaque storage key of the selfie, uploaded out of band
    #[schema(example = "photos/2026-03-02/emp-7.jpg")]
    pub photo_ref: String,
}

#[derive(Serialize, ToSchema)]
pub struct CheckInResponse {
    pub message: String,
    pub attempt_id: String,
    pub validation: ValidationResult,
}

/// Maps engine errors to responses; the engine itself only ever
/// returns machine-checkable outcomes.
fn attendance_error_response(e: &AttendanceError) -> HttpResponse {
    let body = serde_json::json!({ "message": e.to_string() });
    match e {
        AttendanceError::AlreadyCheckedIn
        | AttendanceError::AlreadyCheckedOut
        | AttendanceError::NotCheckedIn
        | AttendanceError::InvalidCoordinate(_) => HttpResponse::BadRequest().json(body),
        AttendanceError::OutsideGeofence | AttendanceError::LocationUnavailable => {
            HttpResponse::UnprocessableEntity().json(body)
        }
        AttendanceError::Persistence(_) => HttpResponse::InternalServerError().json(body),
    }
}

fn parse_position(payload: &AttendancePayload) -> Result<Option<Coordinate>, AttendanceError> {
    match (payload.latitude, payload.longitude) {
        (Some(lat), Some(lon)) => Ok(Some(Coordinate::new(lat, lon)?)),
        _ => Ok(None),
    }
}

fn state_of(record: Option<&AttendanceRecord>) -> AttendanceState {
    match record {
        None => AttendanceState::NotCheckedIn,
        Some(r) => {
            if r.lifecycle_status == LifecycleStatus::Completed.to_string() {
                AttendanceState::Completed
            } else {
                match r.check_in_at {
                    Some(at) => AttendanceState::CheckedIn { checked_in_at: at },
                    None => AttendanceState::NotCheckedIn,
                }
            }
        }
    }
}

/// Registered fingerprints for the rule, with the cuckoo filter as a
/// fast negative in front of the database.
async fn registered_devices(
    pool: &MySqlPool,
    employee_id: u64,
    fingerprint: Option<&str>,
) -> Result<Vec<String>, sqlx::Error> {
    let Some(fp) = fingerprint else {
        return Ok(Vec::new());
    };

    if !device_filter::might_be_registered(employee_id, fp) {
        return Ok(Vec::new());
    }

    store::device::get_registered_fingerprints(pool, employee_id).await
}

async fn build_validation(
    pool: &MySqlPool,
    config: &Config,
    employee_id: u64,
    payload: &AttendancePayload,
    position: Option<Coordinate>,
) -> actix_web::Result<Option<ValidationResult>> {
    let facts = office_cache::get(pool).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to load office facts");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let Some(office_facts) = facts else {
        return Ok(None);
    };

    let center = Coordinate::new(office_facts.office.latitude, office_facts.office.longitude)
        .map_err(|e| {
            tracing::error!(error = %e, office_id = office_facts.office.id, "Office has invalid coordinates");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    let geofence = Geofence::new(center, office_facts.office.radius_m).map_err(|e| {
        tracing::error!(error = %e, office_id = office_facts.office.id, "Office has invalid radius");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let devices = registered_devices(pool, employee_id, payload.device_fingerprint.as_deref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to load registered devices");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let ctx = ValidationContext {
        geofence,
        approved_ssids: office_facts.approved_ssids.clone(),
        registered_devices: devices,
        work_hours: config.work_hours,
    };

    let attempt = AttemptFacts {
        position,
        wifi_ssid: payload.wifi_ssid.clone(),
        device_fingerprint: payload.device_fingerprint.clone(),
        local_time: Some(Local::now().time()),
    };

    let outcomes = rules::evaluate(&attempt, &ctx);
    Ok(Some(ValidationResult::new(
        outcomes,
        &config.weights,
        &config.decision_policy,
    )))
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body = AttendancePayload,
    responses(
        (status = 200, description = "Checked in", body = CheckInResponse),
        (status = 400, description = "Already checked in today or invalid coordinates"),
        (status = 422, description = "Outside geofence / no usable location"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<AttendancePayload>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_id()?;

    tracing::debug!(employee_id, accuracy = ?payload.accuracy, "Processing check-in attempt");

    let position = match parse_position(&payload) {
        Ok(p) => p,
        Err(e) => return Ok(attendance_error_response(&e)),
    };

    let validation =
        match build_validation(&pool, &config, employee_id, &payload, position).await? {
            Some(v) => v,
            None => {
                return Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                    "message": "No active office location configured"
                })));
            }
        };

    let today = Local::now().date_naive();
    let existing = store::attendance::get_today_record(&pool, employee_id, today)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to load today's record");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let attempt = CheckInAttempt {
        at: chrono::Utc::now(),
        position,
        photo_ref: payload.photo_ref.clone(),
    };

    let decision = match lifecycle::check_in(
        state_of(existing.as_ref()),
        attempt,
        validation,
        config.geofence_policy,
    ) {
        Ok(d) => d,
        Err(e) => return Ok(attendance_error_response(&e)),
    };

    let attempt_id = Uuid::new_v4().to_string();
    let approval_status = if decision.validation.approval_required() {
        ApprovalStatus::Pending
    } else {
        ApprovalStatus::Approved
    };

    let attendance_id = match store::attendance::insert_check_in(
        &pool,
        employee_id,
        today,
        &decision,
        &approval_status.to_string(),
        &attempt_id,
    )
    .await
    {
        Ok(id) => id,
        Err(e) => {
            // Duplicate check-in for same day: lost the race to another request
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(attendance_error_response(&AttendanceError::AlreadyCheckedIn));
                }
            }

            tracing::error!(error = %e, employee_id, "Check-in failed");
            return Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ));
        }
    };

    if let Decision::ManualReview { priority } = decision.validation.decision {
        store::review::enqueue(
            &pool,
            attendance_id,
            employee_id,
            &attempt_id,
            &decision.validation,
            priority,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, attendance_id, "Failed to enqueue review");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

        tracing::info!(
            employee_id,
            attempt_id = %attempt_id,
            score = decision.validation.score,
            priority = %priority,
            "Check-in queued for manual review"
        );
    }

    Ok(HttpResponse::Ok().json(CheckInResponse {
        message: if decision.validation.approval_required() {
            "Checked in, pending manual review".to_string()
        } else {
            "Checked in successfully".to_string()
        },
        attempt_id,
        validation: decision.validation,
    }))
}

/// Check-out endpoint
#[utoipa::path(
    put,
    path = "/api/v1/attendance/check-out",
    request_body = AttendancePayload,
    responses(
        (status = 200, description = "Checked out", body = Object, example = json!({
            "message": "Checked out successfully",
            "total_minutes": 540
        })),
        (status = 400, description = "No active check-in found for today"),
        (status = 422, description = "No usable location"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<AttendancePayload>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_id()?;

    let position = match parse_position(&payload) {
        Ok(p) => p,
        Err(e) => return Ok(attendance_error_response(&e)),
    };

    let today = Local::now().date_naive();
    let existing = store::attendance::get_today_record(&pool, employee_id, today)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to load today's record");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let decision = match lifecycle::check_out(
        state_of(existing.as_ref()),
        chrono::Utc::now(),
        position,
        payload.photo_ref.clone(),
    ) {
        Ok(d) => d,
        Err(e) => return Ok(attendance_error_response(&e)),
    };

    let record_id = existing.map(|r| r.id).unwrap_or_default();
    let affected = store::attendance::apply_check_out(&pool, record_id, &decision)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Check-out failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if affected == 0 {
        return Ok(attendance_error_response(&AttendanceError::AlreadyCheckedOut));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Checked out successfully",
        "total_minutes": decision.total_minutes
    })))
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AttendanceQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 10)]
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<AttendanceRecord>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// Own attendance history, newest first
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Paginated attendance history", body = AttendanceListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn my_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_id()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM attendance_records WHERE employee_id = ?",
    )
    .bind(employee_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to count attendance records");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data = sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT *
        FROM attendance_records
        WHERE employee_id = ?
        ORDER BY date DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(employee_id)
    .bind(per_page as i64)
    .bind(offset as i64)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to fetch attendance history");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        data,
        page,
        per_page,
        total,
    }))
}

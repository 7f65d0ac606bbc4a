use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::engine::geo::Coordinate;
use crate::engine::rules::Geofence;
use crate::model::office::{ApprovedWifi, OfficeLocation};
use crate::utils::office_cache;

#[derive(Deserialize, ToSchema)]
pub struct CreateOffice {
    #[schema(example = "Head Office")]
    pub name: String,
    #[schema(example = 23.8103)]
    pub latitude: f64,
    #[schema(example = 90.4125)]
    pub longitude: f64,
    #[schema(example = 150.0)]
    pub radius_m: f64,
    #[schema(example = true)]
    pub is_active: Option<bool>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateOffice {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_m: Option<f64>,
    pub is_active: Option<bool>,
}

/// Runs the new values through the engine so a bad geofence can never
/// reach the database.
fn validate_geofence(latitude: f64, longitude: f64, radius_m: f64) -> Result<(), HttpResponse> {
    let center = Coordinate::new(latitude, longitude)
        .map_err(|e| HttpResponse::BadRequest().json(json!({ "message": e.to_string() })))?;
    Geofence::new(center, radius_m)
        .map_err(|e| HttpResponse::BadRequest().json(json!({ "message": e.to_string() })))?;
    Ok(())
}

/// Create office location (Admin)
#[utoipa::path(
    post,
    path = "/api/v1/offices",
    request_body = CreateOffice,
    responses(
        (status = 201, description = "Office created"),
        (status = 400, description = "Invalid coordinates or radius"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Office"
)]
pub async fn create_office(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateOffice>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    if let Err(resp) = validate_geofence(payload.latitude, payload.longitude, payload.radius_m) {
        return Ok(resp);
    }

    sqlx::query(
        r#"
        INSERT INTO office_locations (name, latitude, longitude, radius_m, is_active)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&payload.name)
    .bind(payload.latitude)
    .bind(payload.longitude)
    .bind(payload.radius_m)
    .bind(payload.is_active.unwrap_or(true))
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to create office");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    office_cache::invalidate().await;

    Ok(HttpResponse::Created().json(json!({
        "message": "Office created successfully"
    })))
}

/// Update office location (Admin)
#[utoipa::path(
    put,
    path = "/api/v1/offices/{office_id}",
    params(
        ("office_id", Path, description = "Office ID")
    ),
    request_body = UpdateOffice,
    responses(
        (status = 200, description = "Office updated"),
        (status = 400, description = "Invalid coordinates or radius"),
        (status = 404, description = "Office not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Office"
)]
pub async fn update_office(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdateOffice>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let office_id = path.into_inner();

    let current = sqlx::query_as::<_, OfficeLocation>(
        r#"SELECT * FROM office_locations WHERE id = ?"#,
    )
    .bind(office_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, office_id, "Failed to fetch office");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let current = match current {
        Some(o) => o,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Office not found"
            })));
        }
    };

    let latitude = body.latitude.unwrap_or(current.latitude);
    let longitude = body.longitude.unwrap_or(current.longitude);
    let radius_m = body.radius_m.unwrap_or(current.radius_m);

    if let Err(resp) = validate_geofence(latitude, longitude, radius_m) {
        return Ok(resp);
    }

    sqlx::query(
        r#"
        UPDATE office_locations
        SET name = ?, latitude = ?, longitude = ?, radius_m = ?, is_active = ?
        WHERE id = ?
        "#,
    )
    .bind(body.name.as_deref().unwrap_or(&current.name))
    .bind(latitude)
    .bind(longitude)
    .bind(radius_m)
    .bind(body.is_active.unwrap_or(current.is_active))
    .bind(office_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, office_id, "Failed to update office");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    office_cache::invalidate().await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Office updated successfully"
    })))
}

/// Get office by ID
#[utoipa::path(
    get,
    path = "/api/v1/offices/{office_id}",
    params(
        ("office_id", Path, description = "Office ID")
    ),
    responses(
        (status = 200, body = OfficeLocation),
        (status = 404, description = "Office not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Office"
)]
pub async fn get_office(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let office_id = path.into_inner();

    let office = sqlx::query_as::<_, OfficeLocation>(
        r#"SELECT * FROM office_locations WHERE id = ?"#,
    )
    .bind(office_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, office_id, "Failed to fetch office");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match office {
        Some(o) => Ok(HttpResponse::Ok().json(o)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Office not found"
        }))),
    }
}

#[derive(Deserialize, ToSchema)]
pub struct AddWifi {
    #[schema(example = "HQ-Staff")]
    pub ssid: String,
}

/// Approve a wifi SSID for an office (Admin)
#[utoipa::path(
    post,
    path = "/api/v1/offices/{office_id}/wifi",
    params(
        ("office_id", Path, description = "Office ID")
    ),
    request_body = AddWifi,
    responses(
        (status = 201, description = "SSID approved"),
        (status = 409, description = "SSID already approved for this office")
    ),
    security(("bearer_auth" = [])),
    tag = "Office"
)]
pub async fn add_wifi(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<AddWifi>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let office_id = path.into_inner();

    let result = sqlx::query(r#"INSERT INTO approved_wifi (office_id, ssid) VALUES (?, ?)"#)
        .bind(office_id)
        .bind(&payload.ssid)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(_) => {
            office_cache::invalidate().await;
            Ok(HttpResponse::Created().json(json!({
                "message": "SSID approved"
            })))
        }
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "message": "SSID already approved for this office"
                    })));
                }
            }

            error!(error = %e, office_id, "Failed to approve SSID");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// Approved SSIDs of an office
#[utoipa::path(
    get,
    path = "/api/v1/offices/{office_id}/wifi",
    params(
        ("office_id", Path, description = "Office ID")
    ),
    responses(
        (status = 200, description = "Approved SSIDs", body = [ApprovedWifi])
    ),
    security(("bearer_auth" = [])),
    tag = "Office"
)]
pub async fn list_wifi(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let office_id = path.into_inner();

    let rows = sqlx::query_as::<_, ApprovedWifi>(
        r#"SELECT * FROM approved_wifi WHERE office_id = ? ORDER BY id"#,
    )
    .bind(office_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, office_id, "Failed to fetch approved SSIDs");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(rows))
}

/// List office locations
#[utoipa::path(
    get,
    path = "/api/v1/offices",
    responses(
        (status = 200, description = "All office locations", body = [OfficeLocation])
    ),
    security(("bearer_auth" = [])),
    tag = "Office"
)]
pub async fn list_offices(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let offices = sqlx::query_as::<_, OfficeLocation>(
        r#"SELECT * FROM office_locations ORDER BY id"#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch offices");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(offices))
}

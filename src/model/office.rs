use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Head Office",
        "latitude": 23.8103,
        "longitude": 90.4125,
        "radius_m": 150.0,
        "is_active": true
    })
)]
pub struct OfficeLocation {
    pub id: u64,

    #[schema(example = "Head Office")]
    pub name: String,

    #[schema(example = 23.8103)]
    pub latitude: f64,

    #[schema(example = 90.4125)]
    pub longitude: f64,

    /// Always > 0; validated through the engine on every write.
    #[schema(example = 150.0)]
    pub radius_m: f64,

    pub is_active: bool,
}

/// An SSID attendance may legitimately be reported from.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ApprovedWifi {
    pub id: u64,
    pub office_id: u64,
    #[schema(example = "HQ-Staff")]
    pub ssid: String,
}

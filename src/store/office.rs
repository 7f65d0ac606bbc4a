use sqlx::MySqlPool;

use crate::model::office::OfficeLocation;

/// The single active office, if one is configured.
pub async fn get_active_office(pool: &MySqlPool) -> Result<Option<OfficeLocation>, sqlx::Error> {
    sqlx::query_as::<_, OfficeLocation>(
        r#"
        SELECT *
        FROM office_locations
        WHERE is_active = TRUE
        ORDER BY id
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await
}

pub async fn get_approved_ssids(
    pool: &MySqlPool,
    office_id: u64,
) -> Result<Vec<String>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (String,)>(
        r#"
        SELECT ssid
        FROM approved_wifi
        WHERE office_id = ?
        "#,
    )
    .bind(office_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(ssid,)| ssid).collect())
}

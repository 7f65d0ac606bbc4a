use sqlx::MySqlPool;

/// Active device fingerprints registered to an employee.
pub async fn get_registered_fingerprints(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<Vec<String>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (String,)>(
        r#"
        SELECT fingerprint
        FROM registered_devices
        WHERE employee_id = ? AND is_active = TRUE
        "#,
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(fp,)| fp).collect())
}

use anyhow::Result;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::sync::Arc;
use std::time::Duration;

use crate::model::office::OfficeLocation;
use crate::store;

/// The read-only facts every validation needs: the active office and
/// its approved SSIDs. Refreshed at most once per TTL.
#[derive(Debug, Clone)]
pub struct OfficeFacts {
    pub office: OfficeLocation,
    pub approved_ssids: Vec<String>,
}

const FACTS_KEY: u8 = 0;

static OFFICE_CACHE: Lazy<Cache<u8, Arc<OfficeFacts>>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(4)
        .time_to_live(Duration::from_secs(60))
        .build()
});

/// Cached office facts, falling back to the database on a miss.
/// None means no active office is configured.
pub async fn get(pool: &MySqlPool) -> Result<Option<Arc<OfficeFacts>>, sqlx::Error> {
    if let Some(facts) = OFFICE_CACHE.get(&FACTS_KEY).await {
        return Ok(Some(facts));
    }

    let Some(office) = store::office::get_active_office(pool).await? else {
        return Ok(None);
    };
    let approved_ssids = store::office::get_approved_ssids(pool, office.id).await?;

    let facts = Arc::new(OfficeFacts {
        office,
        approved_ssids,
    });
    OFFICE_CACHE.insert(FACTS_KEY, facts.clone()).await;

    Ok(Some(facts))
}

/// Drop the cached facts after any office or wifi write.
pub async fn invalidate() {
    OFFICE_CACHE.invalidate(&FACTS_KEY).await;
}

/// Pre-populate at startup so the first check-in does not pay the
/// database round trip.
pub async fn warmup_office_cache(pool: &MySqlPool) -> Result<()> {
    match get(pool).await? {
        Some(facts) => log::info!(
            "Office cache warmup complete: {} ({} approved SSIDs)",
            facts.office.name,
            facts.approved_ssids.len()
        ),
        None => log::info!("Office cache warmup: no active office configured"),
    }
    Ok(())
}

use anyhow::{Result, anyhow};
use autoscale_cuckoo_filter::CuckooFilter;
use futures_util::StreamExt;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::sync::RwLock;

/// Expected capacity and false-positive rate.
/// Tune these based on real device counts.
const FILTER_CAPACITY: usize = 100_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

static DEVICE_FILTER: Lazy<RwLock<CuckooFilter<String>>> =
    Lazy::new(|| RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)));

#[inline]
fn key(employee_id: u64, fingerprint: &str) -> String {
    format!("{employee_id}:{fingerprint}")
}

/// Fast negative check: false means the device is definitely not
/// registered, so the rule can fail closed without touching the DB.
/// True may be a false positive and needs DB confirmation.
pub fn might_be_registered(employee_id: u64, fingerprint: &str) -> bool {
    let key = key(employee_id, fingerprint);
    DEVICE_FILTER
        .read()
        .expect("device filter poisoned")
        .contains(&key)
}

pub fn insert(employee_id: u64, fingerprint: &str) {
    let key = key(employee_id, fingerprint);
    DEVICE_FILTER
        .write()
        .expect("device filter poisoned")
        .add(&key);
}

/// Called on device revocation so the fast path stops vouching for it.
pub fn remove(employee_id: u64, fingerprint: &str) {
    let key = key(employee_id, fingerprint);
    DEVICE_FILTER
        .write()
        .expect("device filter poisoned")
        .remove(&key);
}

/// Warm up the device filter using streaming + batching
pub async fn warmup_device_filter(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (u64, String)>(
        "SELECT employee_id, fingerprint FROM registered_devices WHERE is_active = TRUE",
    )
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total = 0usize;

    while let Some(row) = stream.next().await {
        let (employee_id, fingerprint) = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;

        batch.push(key(employee_id, &fingerprint));
        total += 1;

        if batch.len() == batch_size {
            insert_batch(&batch);
            batch.clear();
        }
    }

    if !batch.is_empty() {
        insert_batch(&batch);
    }

    log::info!("Device filter warmup complete: {} devices", total);
    Ok(())
}

fn insert_batch(keys: &[String]) {
    let mut filter = DEVICE_FILTER.write().expect("device filter poisoned");

    for key in keys {
        filter.add(key);
    }
}

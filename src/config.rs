use chrono::NaiveTime;
use dotenvy::dotenv;
use std::env;

use crate::engine::lifecycle::GeofencePolicy;
use crate::engine::rules::WorkHoursWindow;
use crate::engine::score::{DecisionPolicy, PriorityBands, RuleWeights};

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_check_per_min: u32,
    pub rate_admin_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    // Validation engine policy
    pub weights: RuleWeights,
    pub decision_policy: DecisionPolicy,
    pub geofence_policy: GeofencePolicy,
    pub work_hours: WorkHoursWindow,
}

fn env_u32(key: &str, default: u32) -> u32 {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|_| panic!("{key} must be a number"))
}

fn env_u8(key: &str, default: u8) -> u8 {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|_| panic!("{key} must be a number in 0..=255"))
}

fn env_time(key: &str, default: &str) -> NaiveTime {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    NaiveTime::parse_from_str(&raw, "%H:%M")
        .unwrap_or_else(|_| panic!("{key} must be HH:MM, got {raw}"))
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let geofence_policy = match env::var("GEOFENCE_POLICY")
            .unwrap_or_else(|_| "strict".to_string())
            .as_str()
        {
            "strict" => GeofencePolicy::Strict,
            "lenient" => GeofencePolicy::Lenient,
            other => panic!("GEOFENCE_POLICY must be strict or lenient, got {other}"),
        };

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),

            rate_check_per_min: env_u32("RATE_CHECK_PER_MIN", 30),
            rate_admin_per_min: env_u32("RATE_ADMIN_PER_MIN", 120),
            rate_protected_per_min: env_u32("RATE_PROTECTED_PER_MIN", 1000),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            weights: RuleWeights {
                location: env_u32("WEIGHT_LOCATION", 40),
                wifi: env_u32("WEIGHT_WIFI", 25),
                device: env_u32("WEIGHT_DEVICE", 25),
                work_hours: env_u32("WEIGHT_WORK_HOURS", 10),
            },
            decision_policy: DecisionPolicy {
                approval_threshold: env_u8("APPROVAL_THRESHOLD", 80),
                bands: PriorityBands {
                    high_below: env_u8("PRIORITY_HIGH_BELOW", 60),
                    medium_below: env_u8("PRIORITY_MEDIUM_BELOW", 70),
                },
            },
            geofence_policy,
            work_hours: WorkHoursWindow {
                start: env_time("WORK_HOURS_START", "08:00"),
                end: env_time("WORK_HOURS_END", "20:00"),
            },
        }
    }
}

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::geo::{Coordinate, GeoError, distance_m};

/// Circular boundary around an office within which attendance is
/// considered physically plausible.
#[derive(Debug, Clone, Copy)]
pub struct Geofence {
    pub center: Coordinate,
    pub radius_m: f64,
}

impl Geofence {
    pub fn new(center: Coordinate, radius_m: f64) -> Result<Self, GeoError> {
        if radius_m.is_finite() && radius_m > 0.0 {
            Ok(Self { center, radius_m })
        } else {
            Err(GeoError::InvalidRadius { radius_m })
        }
    }
}

/// Daily work-hour window, inclusive at both ends.
/// start > end is treated as a window wrapping midnight.
#[derive(Debug, Clone, Copy)]
pub struct WorkHoursWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Externally supplied facts about one check-in/check-out attempt.
/// Missing facts make the corresponding rule fail closed.
#[derive(Debug, Clone, Default)]
pub struct AttemptFacts {
    pub position: Option<Coordinate>,
    pub wifi_ssid: Option<String>,
    pub device_fingerprint: Option<String>,
    pub local_time: Option<NaiveTime>,
}

/// Read-only context the rules run against, loaded by the caller.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    pub geofence: Geofence,
    pub approved_ssids: Vec<String>,
    pub registered_devices: Vec<String>,
    pub work_hours: WorkHoursWindow,
}

/// One field per rule. Fixed shape so the set of checks is
/// compile-time known, never an open map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RuleOutcomes {
    pub within_radius: bool,
    pub wifi_approved: bool,
    pub device_registered: bool,
    pub within_work_hours: bool,
}

pub fn within_radius(position: Option<Coordinate>, geofence: &Geofence) -> bool {
    match position {
        Some(p) => distance_m(p, geofence.center) <= geofence.radius_m,
        None => false,
    }
}

pub fn wifi_approved(ssid: Option<&str>, approved: &[String]) -> bool {
    match ssid {
        Some(s) => approved.iter().any(|a| a == s),
        None => false,
    }
}

pub fn device_registered(fingerprint: Option<&str>, registered: &[String]) -> bool {
    match fingerprint {
        Some(f) => registered.iter().any(|r| r == f),
        None => false,
    }
}

pub fn within_work_hours(at: Option<NaiveTime>, window: &WorkHoursWindow) -> bool {
    let Some(t) = at else {
        return false;
    };
    if window.start <= window.end {
        window.start <= t && t <= window.end
    } else {
        // wraps midnight
        t >= window.start || t <= window.end
    }
}

/// Runs every rule over the attempt. Pure, no I/O.
pub fn evaluate(facts: &AttemptFacts, ctx: &ValidationContext) -> RuleOutcomes {
    RuleOutcomes {
        within_radius: within_radius(facts.position, &ctx.geofence),
        wifi_approved: wifi_approved(facts.wifi_ssid.as_deref(), &ctx.approved_ssids),
        device_registered: device_registered(
            facts.device_fingerprint.as_deref(),
            &ctx.registered_devices,
        ),
        within_work_hours: within_work_hours(facts.local_time, &ctx.work_hours),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn office_fence(radius_m: f64) -> Geofence {
        Geofence::new(Coordinate::new(0.0, 0.0).unwrap(), radius_m).unwrap()
    }

    #[test]
    fn point_at_center_is_within_radius() {
        let fence = office_fence(100.0);
        assert!(within_radius(Coordinate::new(0.0, 0.0).ok(), &fence));
    }

    #[test]
    fn one_degree_away_is_outside_100m_radius() {
        let fence = office_fence(100.0);
        assert!(!within_radius(Coordinate::new(1.0, 1.0).ok(), &fence));
    }

    #[test]
    fn missing_position_fails_closed() {
        let fence = office_fence(100.0);
        assert!(!within_radius(None, &fence));
    }

    #[test]
    fn zero_or_negative_radius_is_rejected() {
        let center = Coordinate::new(0.0, 0.0).unwrap();
        assert!(matches!(
            Geofence::new(center, 0.0),
            Err(GeoError::InvalidRadius { .. })
        ));
        assert!(Geofence::new(center, -5.0).is_err());
    }

    #[test]
    fn wifi_requires_exact_ssid_match() {
        let approved = vec!["HQ-Staff".to_string(), "HQ-Guest".to_string()];
        assert!(wifi_approved(Some("HQ-Staff"), &approved));
        assert!(!wifi_approved(Some("hq-staff"), &approved));
        assert!(!wifi_approved(Some("Cafe-Free"), &approved));
        assert!(!wifi_approved(None, &approved));
        assert!(!wifi_approved(Some("HQ-Staff"), &[]));
    }

    #[test]
    fn device_rule_fails_closed_on_missing_fingerprint() {
        let registered = vec!["fp-abc".to_string()];
        assert!(device_registered(Some("fp-abc"), &registered));
        assert!(!device_registered(Some("fp-xyz"), &registered));
        assert!(!device_registered(None, &registered));
    }

    #[test]
    fn work_hours_window_is_inclusive() {
        let window = WorkHoursWindow {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        };
        assert!(within_work_hours(NaiveTime::from_hms_opt(9, 0, 0), &window));
        assert!(within_work_hours(NaiveTime::from_hms_opt(18, 0, 0), &window));
        assert!(within_work_hours(NaiveTime::from_hms_opt(12, 30, 0), &window));
        assert!(!within_work_hours(NaiveTime::from_hms_opt(8, 59, 59), &window));
        assert!(!within_work_hours(NaiveTime::from_hms_opt(18, 0, 1), &window));
        assert!(!within_work_hours(None, &window));
    }

    #[test]
    fn work_hours_window_can_wrap_midnight() {
        let night_shift = WorkHoursWindow {
            start: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
        };
        assert!(within_work_hours(NaiveTime::from_hms_opt(23, 30, 0), &night_shift));
        assert!(within_work_hours(NaiveTime::from_hms_opt(2, 0, 0), &night_shift));
        assert!(within_work_hours(NaiveTime::from_hms_opt(22, 0, 0), &night_shift));
        assert!(within_work_hours(NaiveTime::from_hms_opt(6, 0, 0), &night_shift));
        assert!(!within_work_hours(NaiveTime::from_hms_opt(12, 0, 0), &night_shift));
    }

    #[test]
    fn evaluate_combines_all_rules() {
        let ctx = ValidationContext {
            geofence: office_fence(100.0),
            approved_ssids: vec!["HQ-Staff".into()],
            registered_devices: vec!["fp-abc".into()],
            work_hours: WorkHoursWindow {
                start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            },
        };

        let facts = AttemptFacts {
            position: Coordinate::new(0.0, 0.0).ok(),
            wifi_ssid: Some("HQ-Staff".into()),
            device_fingerprint: Some("fp-abc".into()),
            local_time: NaiveTime::from_hms_opt(10, 0, 0),
        };

        assert_eq!(
            evaluate(&facts, &ctx),
            RuleOutcomes {
                within_radius: true,
                wifi_approved: true,
                device_registered: true,
                within_work_hours: true,
            }
        );

        // empty attempt: everything fails closed
        assert_eq!(
            evaluate(&AttemptFacts::default(), &ctx),
            RuleOutcomes {
                within_radius: false,
                wifi_approved: false,
                device_registered: false,
                within_work_hours: false,
            }
        );
    }
}

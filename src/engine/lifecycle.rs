use chrono::{DateTime, Utc};
use derive_more::{Display, Error};

use super::geo::{Coordinate, GeoError};
use super::score::{Decision, ValidationResult};

/// Everything the engine can report back to a caller. The engine never
/// retries and never produces user-facing text; callers map these to
/// HTTP responses.
#[derive(Debug, Display, Error, PartialEq)]
pub enum AttendanceError {
    #[display(fmt = "invalid coordinate")]
    InvalidCoordinate(GeoError),

    #[display(fmt = "no usable location for this attempt")]
    LocationUnavailable,

    #[display(fmt = "position is outside the office geofence")]
    OutsideGeofence,

    #[display(fmt = "already checked in today")]
    AlreadyCheckedIn,

    #[display(fmt = "already checked out today")]
    AlreadyCheckedOut,

    #[display(fmt = "no active check-in found for today")]
    NotCheckedIn,

    #[display(fmt = "persistence failure: {}", _0)]
    Persistence(#[error(not(source))] String),
}

impl From<GeoError> for AttendanceError {
    fn from(e: GeoError) -> Self {
        AttendanceError::InvalidCoordinate(e)
    }
}

/// Where today's record stands for one employee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttendanceState {
    NotCheckedIn,
    CheckedIn { checked_in_at: DateTime<Utc> },
    Completed,
}

/// Strict rejects out-of-geofence check-ins outright; lenient lets
/// them through into the manual review queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeofencePolicy {
    Strict,
    Lenient,
}

#[derive(Debug, Clone)]
pub struct CheckInAttempt {
    pub at: DateTime<Utc>,
    pub position: Option<Coordinate>,
    pub photo_ref: String,
}

/// What the caller should persist after a successful check-in.
#[derive(Debug, Clone)]
pub struct CheckInDecision {
    pub at: DateTime<Utc>,
    pub position: Coordinate,
    pub photo_ref: String,
    pub validation: ValidationResult,
}

/// Check-in is only legal from NotCheckedIn. Under the strict policy a
/// missing position or a failed within-radius rule is a hard error;
/// under lenient the attempt goes through (a sub-threshold score still
/// lands it in manual review either way).
pub fn check_in(
    state: AttendanceState,
    attempt: CheckInAttempt,
    validation: ValidationResult,
    policy: GeofencePolicy,
) -> Result<CheckInDecision, AttendanceError> {
    match state {
        AttendanceState::NotCheckedIn => {}
        AttendanceState::CheckedIn { .. } | AttendanceState::Completed => {
            return Err(AttendanceError::AlreadyCheckedIn);
        }
    }

    let position = match attempt.position {
        Some(p) => p,
        None => return Err(AttendanceError::LocationUnavailable),
    };

    if policy == GeofencePolicy::Strict && !validation.outcomes.within_radius {
        return Err(AttendanceError::OutsideGeofence);
    }

    Ok(CheckInDecision {
        at: attempt.at,
        position,
        photo_ref: attempt.photo_ref,
        validation,
    })
}

#[derive(Debug, Clone)]
pub struct CheckOutDecision {
    pub at: DateTime<Utc>,
    pub position: Coordinate,
    pub photo_ref: String,
    /// Checkout minus checkin, floored at zero.
    pub total_minutes: i64,
}

/// Check-out is only legal from CheckedIn and completes the record.
pub fn check_out(
    state: AttendanceState,
    at: DateTime<Utc>,
    position: Option<Coordinate>,
    photo_ref: String,
) -> Result<CheckOutDecision, AttendanceError> {
    let checked_in_at = match state {
        AttendanceState::CheckedIn { checked_in_at } => checked_in_at,
        AttendanceState::NotCheckedIn => return Err(AttendanceError::NotCheckedIn),
        AttendanceState::Completed => return Err(AttendanceError::AlreadyCheckedOut),
    };

    let position = match position {
        Some(p) => p,
        None => return Err(AttendanceError::LocationUnavailable),
    };

    let total_minutes = (at - checked_in_at).num_minutes().max(0);

    Ok(CheckOutDecision {
        at,
        position,
        photo_ref,
        total_minutes,
    })
}

/// True when the decision means the record starts out pre-approved.
pub fn auto_approved(decision: &Decision) -> bool {
    matches!(decision, Decision::AutoApproved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rules::RuleOutcomes;
    use crate::engine::score::{DEFAULT_WEIGHTS, DecisionPolicy, ReviewPriority};
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap()
    }

    fn here() -> Option<Coordinate> {
        Coordinate::new(23.8103, 90.4125).ok()
    }

    fn validated(within_radius: bool) -> ValidationResult {
        let outcomes = RuleOutcomes {
            within_radius,
            wifi_approved: true,
            device_registered: true,
            within_work_hours: true,
        };
        ValidationResult::new(outcomes, &DEFAULT_WEIGHTS, &DecisionPolicy::default())
    }

    fn attempt() -> CheckInAttempt {
        CheckInAttempt {
            at: at(9, 0),
            position: here(),
            photo_ref: "photos/2026-03-02/emp-7.jpg".into(),
        }
    }

    #[test]
    fn first_check_in_of_the_day_succeeds() {
        let decision = check_in(
            AttendanceState::NotCheckedIn,
            attempt(),
            validated(true),
            GeofencePolicy::Strict,
        )
        .unwrap();
        assert_eq!(decision.at, at(9, 0));
        assert!(!decision.validation.approval_required());
    }

    #[test]
    fn second_check_in_fails_with_already_checked_in() {
        let state = AttendanceState::CheckedIn {
            checked_in_at: at(9, 0),
        };
        assert_eq!(
            check_in(state, attempt(), validated(true), GeofencePolicy::Strict).unwrap_err(),
            AttendanceError::AlreadyCheckedIn
        );
        assert_eq!(
            check_in(
                AttendanceState::Completed,
                attempt(),
                validated(true),
                GeofencePolicy::Strict
            )
            .unwrap_err(),
            AttendanceError::AlreadyCheckedIn
        );
    }

    #[test]
    fn strict_policy_rejects_out_of_geofence() {
        assert_eq!(
            check_in(
                AttendanceState::NotCheckedIn,
                attempt(),
                validated(false),
                GeofencePolicy::Strict
            )
            .unwrap_err(),
            AttendanceError::OutsideGeofence
        );
    }

    #[test]
    fn lenient_policy_queues_out_of_geofence_for_review() {
        let decision = check_in(
            AttendanceState::NotCheckedIn,
            attempt(),
            validated(false),
            GeofencePolicy::Lenient,
        )
        .unwrap();
        // 60/100 without location: pending review at medium priority
        assert_eq!(decision.validation.score, 60);
        assert_eq!(
            decision.validation.decision,
            Decision::ManualReview {
                priority: ReviewPriority::Medium
            }
        );
    }

    #[test]
    fn missing_position_is_location_unavailable() {
        let mut a = attempt();
        a.position = None;
        assert_eq!(
            check_in(
                AttendanceState::NotCheckedIn,
                a,
                validated(false),
                GeofencePolicy::Strict
            )
            .unwrap_err(),
            AttendanceError::LocationUnavailable
        );
    }

    #[test]
    fn check_out_before_check_in_fails() {
        let result = check_out(
            AttendanceState::NotCheckedIn,
            at(17, 0),
            here(),
            "p.jpg".into(),
        );
        assert_eq!(result.unwrap_err(), AttendanceError::NotCheckedIn);
    }

    #[test]
    fn check_out_after_completion_fails() {
        let result = check_out(AttendanceState::Completed, at(18, 0), here(), "p.jpg".into());
        assert_eq!(result.unwrap_err(), AttendanceError::AlreadyCheckedOut);
    }

    #[test]
    fn four_hours_is_240_minutes() {
        let state = AttendanceState::CheckedIn {
            checked_in_at: at(9, 0),
        };
        let decision = check_out(state, at(13, 0), here(), "p.jpg".into()).unwrap();
        assert_eq!(decision.total_minutes, 240);
    }

    #[test]
    fn clock_skew_floors_minutes_at_zero() {
        let state = AttendanceState::CheckedIn {
            checked_in_at: at(13, 0),
        };
        let decision = check_out(state, at(12, 0), here(), "p.jpg".into()).unwrap();
        assert_eq!(decision.total_minutes, 0);
    }
}

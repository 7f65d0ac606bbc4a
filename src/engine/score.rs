use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use super::rules::RuleOutcomes;

/// Weight of each rule in the confidence score. Location carries the
/// most weight, wifi and device are moderate, work hours minor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleWeights {
    pub location: u32,
    pub wifi: u32,
    pub device: u32,
    pub work_hours: u32,
}

pub const DEFAULT_WEIGHTS: RuleWeights = RuleWeights {
    location: 40,
    wifi: 25,
    device: 25,
    work_hours: 10,
};

impl Default for RuleWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

impl RuleWeights {
    pub fn total(&self) -> u32 {
        self.location + self.wifi + self.device + self.work_hours
    }
}

/// Weighted sum of passed rules, normalized to [0, 100].
pub fn score(outcomes: &RuleOutcomes, weights: &RuleWeights) -> u8 {
    let total = weights.total();
    if total == 0 {
        return 0;
    }

    let mut passed: u32 = 0;
    if outcomes.within_radius {
        passed += weights.location;
    }
    if outcomes.wifi_approved {
        passed += weights.wifi;
    }
    if outcomes.device_registered {
        passed += weights.device;
    }
    if outcomes.within_work_hours {
        passed += weights.work_hours;
    }

    ((passed as f64 * 100.0) / total as f64).round() as u8
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReviewPriority {
    Low,
    Medium,
    High,
}

/// Score cutoffs for manual-review priority. Policy, not contract:
/// both edges come from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityBands {
    /// score < high_below  => high priority
    pub high_below: u8,
    /// score < medium_below (and >= high_below) => medium priority
    pub medium_below: u8,
}

impl Default for PriorityBands {
    fn default() -> Self {
        Self {
            high_below: 60,
            medium_below: 70,
        }
    }
}

impl PriorityBands {
    pub fn priority_for(&self, score: u8) -> ReviewPriority {
        if score < self.high_below {
            ReviewPriority::High
        } else if score < self.medium_below {
            ReviewPriority::Medium
        } else {
            ReviewPriority::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decision {
    AutoApproved,
    ManualReview { priority: ReviewPriority },
}

/// Approval threshold plus priority banding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionPolicy {
    /// score >= threshold auto-approves; the boundary is inclusive.
    pub approval_threshold: u8,
    pub bands: PriorityBands,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            approval_threshold: 80,
            bands: PriorityBands::default(),
        }
    }
}

impl DecisionPolicy {
    pub fn decide(&self, score: u8) -> Decision {
        if score >= self.approval_threshold {
            Decision::AutoApproved
        } else {
            Decision::ManualReview {
                priority: self.bands.priority_for(score),
            }
        }
    }
}

/// Computed fresh on every attempt, never persisted as its own entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationResult {
    pub outcomes: RuleOutcomes,
    pub score: u8,
    pub decision: Decision,
}

impl ValidationResult {
    pub fn new(outcomes: RuleOutcomes, weights: &RuleWeights, policy: &DecisionPolicy) -> Self {
        let score = score(&outcomes, weights);
        Self {
            outcomes,
            score,
            decision: policy.decide(score),
        }
    }

    pub fn approval_required(&self) -> bool {
        !matches!(self.decision, Decision::AutoApproved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcomes(loc: bool, wifi: bool, dev: bool, hours: bool) -> RuleOutcomes {
        RuleOutcomes {
            within_radius: loc,
            wifi_approved: wifi,
            device_registered: dev,
            within_work_hours: hours,
        }
    }

    #[test]
    fn default_weight_constants() {
        assert_eq!(DEFAULT_WEIGHTS.location, 40);
        assert_eq!(DEFAULT_WEIGHTS.wifi, 25);
        assert_eq!(DEFAULT_WEIGHTS.device, 25);
        assert_eq!(DEFAULT_WEIGHTS.work_hours, 10);
        assert_eq!(DEFAULT_WEIGHTS.total(), 100);
    }

    #[test]
    fn all_rules_passing_scores_100() {
        assert_eq!(score(&outcomes(true, true, true, true), &DEFAULT_WEIGHTS), 100);
    }

    #[test]
    fn no_rules_passing_scores_0() {
        assert_eq!(score(&outcomes(false, false, false, false), &DEFAULT_WEIGHTS), 0);
    }

    #[test]
    fn location_alone_stays_below_threshold() {
        // location is the heaviest rule but 40 < 80, so on its own it
        // must still land in manual review
        let s = score(&outcomes(true, false, false, false), &DEFAULT_WEIGHTS);
        assert_eq!(s, 40);
        assert!(s < DecisionPolicy::default().approval_threshold);
        assert_eq!(
            DecisionPolicy::default().decide(s),
            Decision::ManualReview {
                priority: ReviewPriority::High
            }
        );
    }

    #[test]
    fn default_boundary_scores() {
        let w = DEFAULT_WEIGHTS;
        assert_eq!(score(&outcomes(true, true, false, false), &w), 65);
        assert_eq!(score(&outcomes(true, true, false, true), &w), 75);
        assert_eq!(score(&outcomes(true, true, true, false), &w), 90);
        assert_eq!(score(&outcomes(false, true, true, true), &w), 60);
    }

    #[test]
    fn score_normalizes_by_total_weight() {
        let w = RuleWeights {
            location: 2,
            wifi: 1,
            device: 1,
            work_hours: 0,
        };
        assert_eq!(score(&outcomes(true, false, false, false), &w), 50);
        assert_eq!(score(&outcomes(true, true, true, true), &w), 100);
    }

    #[test]
    fn zero_total_weight_scores_zero() {
        let w = RuleWeights {
            location: 0,
            wifi: 0,
            device: 0,
            work_hours: 0,
        };
        assert_eq!(score(&outcomes(true, true, true, true), &w), 0);
    }

    #[test]
    fn score_of_exactly_80_auto_approves() {
        // threshold is inclusive: >=, not >
        let w = RuleWeights {
            location: 40,
            wifi: 40,
            device: 10,
            work_hours: 10,
        };
        let s = score(&outcomes(true, true, false, false), &w);
        assert_eq!(s, 80);
        assert_eq!(DecisionPolicy::default().decide(s), Decision::AutoApproved);
    }

    #[test]
    fn score_of_79_goes_to_manual_review() {
        assert_eq!(
            DecisionPolicy::default().decide(79),
            Decision::ManualReview {
                priority: ReviewPriority::Low
            }
        );
    }

    #[test]
    fn priority_band_edges() {
        let bands = PriorityBands::default();
        assert_eq!(bands.priority_for(59), ReviewPriority::High);
        assert_eq!(bands.priority_for(60), ReviewPriority::Medium);
        assert_eq!(bands.priority_for(69), ReviewPriority::Medium);
        assert_eq!(bands.priority_for(70), ReviewPriority::Low);
    }

    #[test]
    fn validation_result_carries_decision() {
        let result = ValidationResult::new(
            outcomes(true, true, true, true),
            &DEFAULT_WEIGHTS,
            &DecisionPolicy::default(),
        );
        assert_eq!(result.score, 100);
        assert!(!result.approval_required());

        let pending = ValidationResult::new(
            outcomes(true, false, false, false),
            &DEFAULT_WEIGHTS,
            &DecisionPolicy::default(),
        );
        assert!(pending.approval_required());
    }
}

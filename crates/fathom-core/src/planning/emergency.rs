//! Emergency fund progress

use serde::{Deserialize, Serialize};

use crate::models::{round_cents, EmergencyFund};
use crate::recommendation::{Recommendation, RecommendationKind, Severity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyFundStatus {
    pub goal: f64,
    pub current: f64,
    pub remaining: f64,
    /// Percent of goal reached, clamped to [0, 100]
    pub progress_percent: f64,
    /// `None` when the goal is unmet and nothing is being contributed
    pub months_to_goal: Option<u32>,
    pub recommendation: Option<Recommendation>,
}

impl EmergencyFundStatus {
    pub fn is_funded(&self) -> bool {
        self.remaining <= 0.0
    }
}

pub fn emergency_fund_status(fund: &EmergencyFund) -> EmergencyFundStatus {
    let remaining = (fund.goal - fund.current).max(0.0);
    let progress_percent = if fund.goal > 0.0 {
        round_cents((fund.current / fund.goal * 100.0).clamp(0.0, 100.0))
    } else {
        0.0
    };

    let months_to_goal = if remaining == 0.0 {
        Some(0)
    } else if fund.monthly_contribution > 0.0 {
        Some((remaining / fund.monthly_contribution).ceil() as u32)
    } else {
        None
    };

    let recommendation = (fund.current < fund.goal).then(|| {
        let message = match months_to_goal {
            Some(months) => format!(
                "Continue monthly contributions of ${:.2} to reach your goal in {} months",
                fund.monthly_contribution, months
            ),
            None => format!(
                "Set a monthly contribution to start building toward your ${:.2} goal",
                fund.goal
            ),
        };
        Recommendation::new(RecommendationKind::Emergency, Severity::Medium, message)
            .with_detail(format!("${:.2} still needed", remaining))
    });

    EmergencyFundStatus {
        goal: round_cents(fund.goal),
        current: round_cents(fund.current),
        remaining: round_cents(remaining),
        progress_percent,
        months_to_goal,
        recommendation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fund(goal: f64, current: f64, monthly_contribution: f64) -> EmergencyFund {
        EmergencyFund {
            goal,
            current,
            monthly_contribution,
        }
    }

    #[test]
    fn test_progress_and_months() {
        let status = emergency_fund_status(&fund(10000.0, 2500.0, 400.0));
        assert_eq!(status.progress_percent, 25.0);
        assert_eq!(status.remaining, 7500.0);
        // 18.75 rounds up
        assert_eq!(status.months_to_goal, Some(19));
        let rec = status.recommendation.unwrap();
        assert_eq!(rec.kind, RecommendationKind::Emergency);
        assert!(rec.message.contains("19 months"));
    }

    #[test]
    fn test_funded_goal() {
        let status = emergency_fund_status(&fund(5000.0, 6000.0, 0.0));
        assert_eq!(status.progress_percent, 100.0);
        assert_eq!(status.remaining, 0.0);
        assert_eq!(status.months_to_goal, Some(0));
        assert!(status.is_funded());
        assert!(status.recommendation.is_none());
    }

    #[test]
    fn test_no_contribution() {
        let status = emergency_fund_status(&fund(3000.0, 100.0, 0.0));
        assert_eq!(status.months_to_goal, None);
        assert!(status
            .recommendation
            .unwrap()
            .message
            .starts_with("Set a monthly contribution"));
    }

    #[test]
    fn test_zero_goal() {
        let status = emergency_fund_status(&EmergencyFund::default());
        assert_eq!(status.progress_percent, 0.0);
        assert_eq!(status.months_to_goal, Some(0));
        assert!(status.recommendation.is_none());
    }
}

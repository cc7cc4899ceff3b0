//! Recommendations surfaced alongside analysis results

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a recommendation is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// Over budget or notably rising spending
    Warning,
    /// How much to set aside this month
    Savings,
    /// Spending appeared in a category with no history
    NewSpending,
    /// Which debt to focus on
    Priority,
    /// Total minimum payments reminder
    Minimum,
    /// Emergency fund progress
    Emergency,
}

impl RecommendationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationKind::Warning => "warning",
            RecommendationKind::Savings => "savings",
            RecommendationKind::NewSpending => "new_spending",
            RecommendationKind::Priority => "priority",
            RecommendationKind::Minimum => "minimum",
            RecommendationKind::Emergency => "emergency",
        }
    }
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity level of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational - no action needed
    Info,
    /// Worth attention but not urgent
    Medium,
    /// Should be addressed soon
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    /// Numeric priority for sorting (higher = more urgent)
    pub fn priority(&self) -> u8 {
        match self {
            Severity::Info => 1,
            Severity::Medium => 2,
            Severity::High => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single actionable message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub severity: Severity,
    pub message: String,
    /// Category the recommendation refers to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Suggested next step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Longer explanation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Recommendation {
    pub fn new(kind: RecommendationKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            category: None,
            action: None,
            detail: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Sort recommendations by severity, most urgent first (stable)
pub fn sort_by_severity(recommendations: &mut [Recommendation]) {
    recommendations.sort_by(|a, b| b.severity.priority().cmp(&a.severity.priority()));
}

//! Savings and debt allocation
//!
//! Splits disposable income between a savings recommendation and a
//! waterfall debt plan, and reports how each budget category is tracking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::models::{round_cents, BudgetRecord, DebtPriority, Transaction};
use crate::recommendation::{Recommendation, RecommendationKind, Severity};

/// One obligation in the repayment plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub category: String,
    pub minimum_payment: f64,
    pub additional_payment: f64,
    pub priority: DebtPriority,
}

impl AllocationEntry {
    pub fn total_payment(&self) -> f64 {
        self.minimum_payment + self.additional_payment
    }
}

/// Obligations ordered by priority (highest first), ties in input order
pub type AllocationPlan = Vec<AllocationEntry>;

/// Result of allocating disposable income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub savings_recommendation: f64,
    pub debt_plan: AllocationPlan,
    /// Income left after the plan; negative when minimums are not covered
    pub remaining_income: f64,
}

/// Spending against one category budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub budgeted: f64,
    pub spent: f64,
    pub remaining: f64,
    /// Clamped to [0, 100]; `remaining` goes negative when overspent
    pub percentage_used: f64,
}

impl BudgetStatus {
    pub fn is_over_budget(&self) -> bool {
        self.spent > self.budgeted
    }
}

/// Income and expense totals for a set of transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeTotals {
    pub income: f64,
    pub expenses: f64,
}

impl IncomeTotals {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        transactions
            .iter()
            .fold(Self::default(), |mut acc, t| {
                if t.is_income() {
                    acc.income += t.amount;
                } else {
                    acc.expenses += t.amount;
                }
                acc
            })
    }

    /// Income minus expenses
    pub fn disposable(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Full spending and savings analysis for a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingAnalysis {
    pub recommendations: Vec<Recommendation>,
    /// Recommended savings as a percent of the budgets' savings goals
    pub savings_goal_progress: f64,
    pub debt_repayment_plan: AllocationPlan,
    pub budget_status: BTreeMap<String, BudgetStatus>,
    pub totals: IncomeTotals,
    pub disposable_income: f64,
    pub savings_recommendation: f64,
    pub remaining_income: f64,
}

/// How much of the month's income to set aside.
///
/// Recommends the ideal share of income when disposable income covers it,
/// otherwise the minimum share, otherwise a fraction of whatever is
/// disposable (never negative).
pub fn recommended_savings(
    disposable_income: f64,
    total_income: f64,
    config: &AnalysisConfig,
) -> f64 {
    let ideal = total_income * config.ideal_savings_rate;
    let minimum = total_income * config.minimum_savings_rate;

    if disposable_income >= ideal {
        ideal
    } else if disposable_income >= minimum {
        minimum
    } else {
        (disposable_income * config.fallback_savings_share).max(0.0)
    }
}

/// Waterfall repayment plan over budgets that carry a minimum payment.
///
/// Minimums are always listed in full, even when they exceed disposable
/// income (the returned remaining income then goes negative). Anything left
/// over goes to high-priority obligations, each capped at its own minimum.
pub fn debt_repayment_plan(
    budgets: &[BudgetRecord],
    disposable_income: f64,
) -> (AllocationPlan, f64) {
    let mut obligations: Vec<&BudgetRecord> = budgets
        .iter()
        .filter(|b| b.minimum_payment > 0.0)
        .collect();
    // sort_by is stable, so equal priorities keep input order
    obligations.sort_by(|a, b| b.debt_priority.rank().cmp(&a.debt_priority.rank()));

    let mut remaining = disposable_income;
    let mut plan: AllocationPlan = obligations
        .into_iter()
        .map(|b| {
            remaining -= b.minimum_payment;
            AllocationEntry {
                category: b.category.clone(),
                minimum_payment: b.minimum_payment,
                additional_payment: 0.0,
                priority: b.debt_priority,
            }
        })
        .collect();

    if remaining > 0.0 {
        for entry in plan
            .iter_mut()
            .filter(|e| e.priority == DebtPriority::High)
        {
            let additional = remaining.min(entry.minimum_payment);
            entry.additional_payment = additional;
            remaining -= additional;
            if remaining <= 0.0 {
                break;
            }
        }
    }

    debug!(
        obligations = plan.len(),
        remaining,
        "Debt repayment plan built"
    );
    (plan, remaining)
}

/// Allocate disposable income to savings and debt
pub fn plan_allocation(
    budgets: &[BudgetRecord],
    total_income: f64,
    disposable_income: f64,
    config: &AnalysisConfig,
) -> AllocationOutcome {
    let savings = recommended_savings(disposable_income, total_income, config);
    let (plan, remaining) = debt_repayment_plan(budgets, disposable_income);

    AllocationOutcome {
        savings_recommendation: round_cents(savings),
        debt_plan: plan.into_iter().map(round_entry).collect(),
        remaining_income: round_cents(remaining),
    }
}

fn round_entry(entry: AllocationEntry) -> AllocationEntry {
    AllocationEntry {
        minimum_payment: round_cents(entry.minimum_payment),
        additional_payment: round_cents(entry.additional_payment),
        ..entry
    }
}

fn spent_in(transactions: &[Transaction], category: &str) -> f64 {
    transactions
        .iter()
        .filter(|t| t.is_expense() && t.category == category)
        .map(|t| t.amount)
        .sum()
}

/// Spending against each budget, keyed by category
pub fn budget_status(
    transactions: &[Transaction],
    budgets: &[BudgetRecord],
) -> BTreeMap<String, BudgetStatus> {
    budgets
        .iter()
        .map(|budget| {
            let spent = spent_in(transactions, &budget.category);
            let percentage_used = if budget.limit_amount == 0.0 {
                0.0
            } else {
                spent / budget.limit_amount * 100.0
            };
            debug!(
                category = %budget.category,
                spent,
                percentage_used,
                "Budget status"
            );
            let status = BudgetStatus {
                budgeted: round_cents(budget.limit_amount),
                spent: round_cents(spent),
                remaining: round_cents(budget.limit_amount - spent),
                percentage_used: round_cents(percentage_used.clamp(0.0, 100.0)),
            };
            (budget.category.clone(), status)
        })
        .collect()
}

/// Budget status, savings recommendation and debt plan in one pass
pub fn analyze_spending_and_savings(
    transactions: &[Transaction],
    budgets: &[BudgetRecord],
    config: &AnalysisConfig,
) -> SpendingAnalysis {
    let totals = IncomeTotals::from_transactions(transactions);
    let disposable_income = totals.disposable();

    let status = budget_status(transactions, budgets);
    // One warning per budget record, in input order
    let mut recommendations: Vec<Recommendation> = budgets
        .iter()
        .filter_map(|budget| {
            let overspend = round_cents(spent_in(transactions, &budget.category))
                - round_cents(budget.limit_amount);
            (overspend > 0.0).then(|| {
                Recommendation::new(
                    RecommendationKind::Warning,
                    Severity::High,
                    format!("Over budget in {} by ${:.2}", budget.category, overspend),
                )
                .with_category(budget.category.clone())
                .with_action("Reduce spending in this category")
            })
        })
        .collect();

    let outcome = plan_allocation(budgets, totals.income, disposable_income, config);

    if disposable_income > 0.0 {
        recommendations.push(
            Recommendation::new(
                RecommendationKind::Savings,
                Severity::High,
                format!(
                    "Consider saving ${:.2} this month",
                    outcome.savings_recommendation
                ),
            )
            .with_detail("Based on your disposable income"),
        );
    }

    let savings_goal: f64 = budgets.iter().map(|b| b.savings_goal).sum();
    let savings_goal_progress = if savings_goal > 0.0 {
        round_cents((outcome.savings_recommendation / savings_goal * 100.0).clamp(0.0, 100.0))
    } else {
        0.0
    };

    info!(
        budgets = budgets.len(),
        over_budget = status.values().filter(|s| s.is_over_budget()).count(),
        disposable_income,
        "Spending analysis complete"
    );

    SpendingAnalysis {
        recommendations,
        savings_goal_progress,
        debt_repayment_plan: outcome.debt_plan,
        budget_status: status,
        totals: IncomeTotals {
            income: round_cents(totals.income),
            expenses: round_cents(totals.expenses),
        },
        disposable_income: round_cents(disposable_income),
        savings_recommendation: outcome.savings_recommendation,
        remaining_income: outcome.remaining_income,
    }
}

//! Planning - savings, debt repayment and emergency fund
//!
//! - **allocation** - savings recommendation, waterfall debt plan, budget status
//! - **debt** - debt totals and avalanche ordering
//! - **emergency** - emergency fund progress

pub mod allocation;
pub mod debt;
pub mod emergency;

pub use allocation::{
    analyze_spending_and_savings, budget_status, debt_repayment_plan, plan_allocation,
    recommended_savings, AllocationEntry, AllocationOutcome, AllocationPlan, BudgetStatus,
    IncomeTotals, SpendingAnalysis,
};
pub use debt::{analyze_debts, avalanche_order, DebtAnalysis};
pub use emergency::{emergency_fund_status, EmergencyFundStatus};

//! Budget and allocation plan command

use anyhow::Result;
use fathom_core::planning::{plan_allocation, AllocationPlan, IncomeTotals};
use fathom_core::recommendation::sort_by_severity;
use fathom_core::{
    analyze_spending_and_savings, AnalysisConfig, Recommendation, Severity, Snapshot,
};

use super::{print_json, truncate};

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "🔴",
        Severity::Medium => "🟡",
        Severity::Info => "🔵",
    }
}

pub fn print_recommendations(recommendations: &[Recommendation]) {
    if recommendations.is_empty() {
        return;
    }
    let mut sorted = recommendations.to_vec();
    sort_by_severity(&mut sorted);

    println!();
    println!("   Recommendations:");
    for rec in &sorted {
        println!("   {} {}", severity_icon(rec.severity), rec.message);
        if let Some(action) = &rec.action {
            println!("      \x1b[2m→ {}\x1b[0m", action);
        }
    }
}

fn print_debt_plan(plan: &AllocationPlan) {
    println!();
    println!("   Debt Repayment Plan:");
    if plan.is_empty() {
        println!("   No budgets carry a minimum payment.");
        return;
    }
    println!(
        "   {:20} │ {:>8} │ {:>10} │ {:>10} │ {:>10}",
        "Obligation", "Priority", "Minimum", "Extra", "Total"
    );
    println!("   ─────────────────────┼──────────┼────────────┼────────────┼───────────");
    for entry in plan {
        println!(
            "   {:20} │ {:>8} │ {:>10.2} │ {:>10.2} │ {:>10.2}",
            truncate(&entry.category, 20),
            entry.priority.as_str(),
            entry.minimum_payment,
            entry.additional_payment,
            entry.total_payment()
        );
    }
}

/// Show budget status and allocate disposable income.
///
/// With `disposable` set, the allocation uses that amount instead of income
/// minus expenses from the snapshot.
pub fn cmd_plan(
    snapshot: &Snapshot,
    config: &AnalysisConfig,
    disposable: Option<f64>,
    json: bool,
) -> Result<()> {
    if let Some(disposable) = disposable {
        if !disposable.is_finite() {
            anyhow::bail!("--disposable must be a finite amount");
        }
        let totals = IncomeTotals::from_transactions(&snapshot.transactions);
        let outcome = plan_allocation(&snapshot.budgets, totals.income, disposable, config);

        if json {
            return print_json(&outcome);
        }

        println!();
        println!("💰 Allocation Plan");
        println!("   ─────────────────────────────────────────────────────────────");
        println!("   Income:              ${:.2}", totals.income);
        println!("   Disposable (given):  ${:.2}", disposable);
        println!("   Recommended savings: ${:.2}", outcome.savings_recommendation);
        print_debt_plan(&outcome.debt_plan);
        println!();
        println!("   Remaining after debts: ${:.2}", outcome.remaining_income);
        return Ok(());
    }

    let analysis = analyze_spending_and_savings(&snapshot.transactions, &snapshot.budgets, config);

    if json {
        return print_json(&analysis);
    }

    println!();
    println!("💰 Budget & Allocation Plan");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Income:              ${:.2}", analysis.totals.income);
    println!("   Expenses:            ${:.2}", analysis.totals.expenses);
    println!("   Disposable:          ${:.2}", analysis.disposable_income);
    println!("   Recommended savings: ${:.2}", analysis.savings_recommendation);
    println!(
        "   Savings goal progress: {:.1}%",
        analysis.savings_goal_progress
    );

    if !analysis.budget_status.is_empty() {
        println!();
        println!(
            "   {:20} │ {:>10} │ {:>10} │ {:>10} │ {:>6}",
            "Budget", "Budgeted", "Spent", "Remaining", "Used"
        );
        println!("   ─────────────────────┼────────────┼────────────┼────────────┼───────");
        for (category, status) in &analysis.budget_status {
            let marker = if status.is_over_budget() { "⚠️ " } else { "" };
            println!(
                "   {:20} │ {:>10.2} │ {:>10.2} │ {:>10.2} │ {:>5.0}% {}",
                truncate(category, 20),
                status.budgeted,
                status.spent,
                status.remaining,
                status.percentage_used,
                marker
            );
        }
    }

    print_debt_plan(&analysis.debt_repayment_plan);
    println!();
    println!("   Remaining after debts: ${:.2}", analysis.remaining_income);

    print_recommendations(&analysis.recommendations);

    Ok(())
}

//! Debt and emergency fund command

use anyhow::Result;
use fathom_core::{
    analyze_debts, emergency_fund_status, AnalysisConfig, DebtAnalysis, EmergencyFundStatus,
    Snapshot,
};
use serde::Serialize;

use super::{print_json, print_recommendations, truncate};

#[derive(Serialize)]
struct DebtsReport {
    debts: DebtAnalysis,
    emergency_fund: Option<EmergencyFundStatus>,
}

pub fn cmd_debts(snapshot: &Snapshot, config: &AnalysisConfig, json: bool) -> Result<()> {
    let report = DebtsReport {
        debts: analyze_debts(&snapshot.debts, config),
        emergency_fund: snapshot.emergency_fund.as_ref().map(emergency_fund_status),
    };

    if json {
        return print_json(&report);
    }

    let analysis = &report.debts;
    println!();
    println!("💳 Debt Summary");
    println!("   ─────────────────────────────────────────────────────────────");

    if analysis.debt_count == 0 {
        println!("   ✅ No debts recorded.");
    } else {
        println!("   Total owed:        ${:.2}", analysis.total_debt);
        println!("   Monthly minimums:  ${:.2}", analysis.total_minimum_payment);
        println!("   Highest interest:  {:.2}%", analysis.highest_interest);
        println!();
        println!("   Payoff order (highest interest first):");
        println!(
            "   {:3} │ {:20} │ {:>10} │ {:>7} │ {:>9}",
            "#", "Debt", "Balance", "Rate", "Minimum"
        );
        println!("   ────┼──────────────────────┼────────────┼─────────┼──────────");
        for (i, debt) in analysis.avalanche_order.iter().enumerate() {
            println!(
                "   {:3} │ {:20} │ {:>10.2} │ {:>6.2}% │ {:>9.2}",
                i + 1,
                truncate(&debt.name, 20),
                debt.amount,
                debt.interest_rate,
                debt.minimum_payment
            );
        }
    }

    if let Some(fund) = &report.emergency_fund {
        println!();
        println!("🛟 Emergency Fund");
        println!("   ─────────────────────────────────────────────────────────────");
        println!(
            "   ${:.2} of ${:.2} ({:.1}%)",
            fund.current, fund.goal, fund.progress_percent
        );
        if fund.is_funded() {
            println!("   ✅ Goal reached");
        } else if let Some(months) = fund.months_to_goal {
            println!("   {} month(s) to goal", months);
        } else {
            println!("   No monthly contribution set");
        }
    }

    let mut recommendations = analysis.recommendations.clone();
    if let Some(rec) = report
        .emergency_fund
        .as_ref()
        .and_then(|f| f.recommendation.clone())
    {
        recommendations.push(rec);
    }
    print_recommendations(&recommendations);

    Ok(())
}

//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config, snapshot loading, JSON output) and `validate`
//! - `forecast` - Forecast and anomaly commands
//! - `plan` - Budget status and savings/debt allocation
//! - `reports` - Trends, cash flow and statistics
//! - `debts` - Debt summary and emergency fund

pub mod core;
pub mod debts;
pub mod forecast;
pub mod plan;
pub mod reports;

// Re-export command functions for main.rs
pub use core::*;
pub use debts::*;
pub use forecast::*;
pub use plan::*;
pub use reports::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

//! Analysis configuration
//!
//! The engine's tuning constants (forecast weights, savings rates, warning
//! cutoffs, category aliases) live here rather than inline.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/fathom/config/analysis.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their default values.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analysis.toml");

/// Tuning constants for the analytics engine
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Forecast weights, most recent month first
    pub forecast_weights: Vec<f64>,
    /// Number of recent months the forecast looks at
    pub forecast_window: usize,
    /// Share of income recommended as savings when affordable
    pub ideal_savings_rate: f64,
    /// Lower share of income recommended as savings
    pub minimum_savings_rate: f64,
    /// Share of disposable income recommended when the minimum is unaffordable
    pub fallback_savings_share: f64,
    /// Percent increase (recent vs prior quarter) that triggers a warning
    pub spending_increase_percent: f64,
    /// Interest rate (percent) above which consolidation is suggested
    pub high_interest_percent: f64,
    /// Lowercase alias -> canonical category name
    pub category_aliases: BTreeMap<String, String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            forecast_weights: vec![0.30, 0.25, 0.20, 0.15, 0.07, 0.03],
            forecast_window: 6,
            ideal_savings_rate: 0.20,
            minimum_savings_rate: 0.10,
            fallback_savings_share: 0.50,
            spending_increase_percent: 10.0,
            high_interest_percent: 20.0,
            category_aliases: BTreeMap::new(),
        }
    }
}

impl AnalysisConfig {
    /// Load from the default override location, falling back to embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit path; a missing file means embedded defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// The embedded defaults, including the category alias table
    pub fn embedded() -> Self {
        // The embedded file is covered by tests; fall back to bare defaults anyway
        parse_config(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Check that all values are usable by the engine
    pub fn validate(&self) -> Result<()> {
        if self.forecast_weights.is_empty() {
            return Err(Error::Config("forecast weights must not be empty".into()));
        }
        if self
            .forecast_weights
            .iter()
            .any(|w| !w.is_finite() || *w < 0.0)
        {
            return Err(Error::Config(
                "forecast weights must be finite and non-negative".into(),
            ));
        }
        if self.forecast_window == 0 {
            return Err(Error::Config("forecast window must be at least 1".into()));
        }
        for (name, rate) in [
            ("ideal_rate", self.ideal_savings_rate),
            ("minimum_rate", self.minimum_savings_rate),
            ("fallback_share", self.fallback_savings_share),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(Error::Config(format!(
                    "savings {} must be between 0 and 1, got {}",
                    name, rate
                )));
            }
        }
        if self.minimum_savings_rate > self.ideal_savings_rate {
            return Err(Error::Config(
                "savings minimum_rate must not exceed ideal_rate".into(),
            ));
        }
        if self.spending_increase_percent < 0.0 || self.high_interest_percent < 0.0 {
            return Err(Error::Config("percent thresholds must be non-negative".into()));
        }
        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("fathom").join("config").join("analysis.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<AnalysisConfig> {
    let path = override_path
        .map(Path::to_path_buf)
        .or_else(default_config_path);

    let defaults = parse_config(DEFAULT_CONFIG)?;
    match path {
        Some(ref p) if p.exists() => {
            tracing::debug!(path = %p.display(), "Loading analysis config override");
            let content = fs::read_to_string(p)
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;
            merge_config(&content, defaults)
        }
        _ => Ok(defaults),
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    forecast: Option<RawForecast>,
    savings: Option<RawSavings>,
    recommendations: Option<RawRecommendations>,
    debt: Option<RawDebt>,
    categories: Option<RawCategories>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    weights: Option<Vec<f64>>,
    window: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawSavings {
    ideal_rate: Option<f64>,
    minimum_rate: Option<f64>,
    fallback_share: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawRecommendations {
    spending_increase_percent: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawDebt {
    high_interest_percent: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawCategories {
    aliases: Option<BTreeMap<String, String>>,
}

/// Parse TOML config content over the built-in defaults
fn parse_config(content: &str) -> Result<AnalysisConfig> {
    merge_config(content, AnalysisConfig::default())
}

/// Parse TOML config content, merging it over `config`
///
/// Alias tables are merged key by key, so an override only needs the
/// aliases it adds or changes.
fn merge_config(content: &str, mut config: AnalysisConfig) -> Result<AnalysisConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    if let Some(forecast) = raw.forecast {
        if let Some(weights) = forecast.weights {
            config.forecast_weights = weights;
        }
        if let Some(window) = forecast.window {
            config.forecast_window = window;
        }
    }

    if let Some(savings) = raw.savings {
        if let Some(rate) = savings.ideal_rate {
            config.ideal_savings_rate = rate;
        }
        if let Some(rate) = savings.minimum_rate {
            config.minimum_savings_rate = rate;
        }
        if let Some(share) = savings.fallback_share {
            config.fallback_savings_share = share;
        }
    }

    if let Some(recs) = raw.recommendations {
        if let Some(percent) = recs.spending_increase_percent {
            config.spending_increase_percent = percent;
        }
    }

    if let Some(debt) = raw.debt {
        if let Some(percent) = debt.high_interest_percent {
            config.high_interest_percent = percent;
        }
    }

    if let Some(aliases) = raw.categories.and_then(|c| c.aliases) {
        config.category_aliases.extend(
            aliases
                .into_iter()
                .map(|(alias, canonical)| (alias.trim().to_lowercase(), canonical)),
        );
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_config_parses() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(
            config.forecast_weights,
            vec![0.30, 0.25, 0.20, 0.15, 0.07, 0.03]
        );
        assert_eq!(config.forecast_window, 6);
        assert_eq!(config.ideal_savings_rate, 0.20);
        assert_eq!(config.minimum_savings_rate, 0.10);
        assert_eq!(config.category_aliases.get("groceries").unwrap(), "Food");
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = merge_config(
            r#"
            [savings]
            ideal_rate = 0.25
            "#,
            AnalysisConfig::embedded(),
        )
        .unwrap();
        assert_eq!(config.ideal_savings_rate, 0.25);
        assert_eq!(config.minimum_savings_rate, 0.10);
        assert_eq!(config.forecast_weights.len(), 6);
        assert_eq!(config.category_aliases.get("groceries").unwrap(), "Food");
    }

    #[test]
    fn test_override_aliases_extend_defaults() {
        let config = merge_config(
            r#"
            [categories.aliases]
            " Vet " = "Pets"
            groceries = "Household"
            "#,
            AnalysisConfig::embedded(),
        )
        .unwrap();
        assert_eq!(config.category_aliases.get("vet").unwrap(), "Pets");
        assert_eq!(config.category_aliases.get("groceries").unwrap(), "Household");
        assert_eq!(
            config.category_aliases.len(),
            AnalysisConfig::embedded().category_aliases.len() + 1
        );
    }

    #[test]
    fn test_invalid_rate_rejected() {
        let result = parse_config(
            r#"
            [savings]
            ideal_rate = 1.5
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let result = parse_config(
            r#"
            [forecast]
            weights = [0.5, -0.1]
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_malformed_toml_is_error() {
        assert!(matches!(
            parse_config("[forecast\nweights = "),
            Err(Error::Toml(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[debt]\nhigh_interest_percent = 15.0").unwrap();

        let config = AnalysisConfig::load_from(file.path()).unwrap();
        assert_eq!(config.high_interest_percent, 15.0);
        assert_eq!(
            crate::validate::normalize_category("groceries", &config.category_aliases),
            "Food"
        );
    }

    #[test]
    fn test_load_from_missing_file_uses_embedded() {
        let config = AnalysisConfig::load_from(Path::new("/nonexistent/fathom.toml")).unwrap();
        assert_eq!(config, AnalysisConfig::embedded());
    }
}

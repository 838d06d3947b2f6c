//! Per-stop earnings classification.
//!
//! A stop's reverse-geocoded place name is matched against an ordered list of
//! tiers. Each tier holds a set of lower-case area substrings; the first tier
//! with any substring contained in the lower-cased place name supplies the
//! rate. When nothing matches, the default rate applies.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningTier {
    pub name: String,
    pub areas: Vec<String>,
    pub rate: f64,
}

impl EarningTier {
    fn new(name: &str, areas: &[&str], rate: f64) -> Self {
        Self {
            name: name.to_string(),
            areas: areas.iter().map(|a| (*a).to_string()).collect(),
            rate,
        }
    }

    /// `lowered` must already be lower-case.
    fn matches(&self, lowered: &str) -> bool {
        self.areas.iter().any(|area| lowered.contains(area.as_str()))
    }
}

/// Ordered tier list with a guaranteed fallback rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningTiers {
    pub default_rate: f64,
    pub tiers: Vec<EarningTier>,
}

impl Default for EarningTiers {
    /// Outer villages first, then the villages bordering town, then the town itself.
    fn default() -> Self {
        Self {
            default_rate: 1.00,
            tiers: vec![
                EarningTier::new(
                    "outer-villages",
                    &["yatton keynell", "sutton benger", "draycot cerne"],
                    1.80,
                ),
                EarningTier::new(
                    "near-villages",
                    &["kington langley", "kington saint michael", "langley burrell"],
                    1.30,
                ),
                EarningTier::new("chippenham", &["chippenham"], 1.00),
            ],
        }
    }
}

impl EarningTiers {
    /// Returns the first tier whose areas match `place_name`, if any.
    #[must_use]
    pub fn matching_tier(&self, place_name: &str) -> Option<&EarningTier> {
        let lowered = place_name.to_lowercase();
        self.tiers.iter().find(|tier| tier.matches(&lowered))
    }

    /// Maps a place name to its per-stop earning rate.
    #[must_use]
    pub fn classify(&self, place_name: &str) -> f64 {
        self.matching_tier(place_name)
            .map_or(self.default_rate, |tier| tier.rate)
    }

    fn normalize(mut self) -> Self {
        for tier in &mut self.tiers {
            for area in &mut tier.areas {
                *area = area.trim().to_lowercase();
            }
        }
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_rate("default_rate", self.default_rate)?;

        let mut seen = HashSet::new();
        for tier in &self.tiers {
            if tier.name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "tier name must be non-empty".to_string(),
                ));
            }
            if !seen.insert(tier.name.to_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate tier name: '{}'",
                    tier.name
                )));
            }
            if tier.areas.is_empty() || tier.areas.iter().any(String::is_empty) {
                return Err(ConfigError::Validation(format!(
                    "tier '{}' must list at least one non-empty area",
                    tier.name
                )));
            }
            check_rate(&tier.name, tier.rate)?;
        }
        Ok(())
    }
}

fn check_rate(label: &str, rate: f64) -> Result<(), ConfigError> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "rate for '{label}' must be a non-negative number, got {rate}"
        )))
    }
}

/// Parse and validate a tier list from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the text cannot be parsed or fails validation.
pub fn parse_earning_tiers(content: &str) -> Result<EarningTiers, ConfigError> {
    let tiers: EarningTiers = serde_yaml::from_str(content)?;
    let tiers = tiers.normalize();
    tiers.validate()?;
    Ok(tiers)
}

/// Load and validate the earning tiers from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_earning_tiers(path: &Path) -> Result<EarningTiers, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TiersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_earning_tiers(&content)
}

#[cfg(test)]
#[path = "earnings_test.rs"]
mod tests;

//! Application configuration.
//!
//! Loaded from a TOML file; every section and field is optional and falls
//! back to the built-in defaults.
//!
//! ```toml
//! [selector]
//! trigger_time_s = 1.5
//!
//! [blink]
//! cooldown_s = 0.3
//!
//! [deck]
//! cooldown_s = 1.0
//!
//! [[deck.cards]]
//! label = "Yes"
//! action = "yes"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::deck::builder::{build_deck, default_deck_specs, ActionRegistry, DeckSpec};
use crate::deck::navigator::NavigatorConfig;
use crate::deck::Deck;
use crate::error::ConfigError;
use crate::gaze::blink::BlinkConfig;
use crate::gaze::selector::SelectorConfig;

/// Deck section: navigation timing and the card hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Minimum seconds between blink-driven advances.
    pub cooldown_s: f64,
    pub cards: Vec<DeckSpec>,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            cooldown_s: NavigatorConfig::default().cooldown_s,
            cards: default_deck_specs(),
        }
    }
}

impl DeckConfig {
    pub fn navigator_config(&self) -> NavigatorConfig {
        NavigatorConfig {
            cooldown_s: self.cooldown_s,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub selector: SelectorConfig,
    pub blink: BlinkConfig,
    pub deck: DeckConfig,
}

impl AppConfig {
    /// Read, parse and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!("loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.selector;
        if !(s.trigger_time_s.is_finite() && s.trigger_time_s > 0.0) {
            return Err(invalid(
                "selector.trigger_time_s",
                format!("must be a positive number of seconds, got {}", s.trigger_time_s),
            ));
        }
        let (cx, cy) = s.center;
        if !(0.0..=1.0).contains(&cx) || !(0.0..=1.0).contains(&cy) {
            return Err(invalid(
                "selector.center",
                format!("must lie in the unit square, got ({cx}, {cy})"),
            ));
        }
        if !(s.inner_radius >= 0.0 && s.inner_radius <= s.outer_radius) {
            return Err(invalid(
                "selector.inner_radius",
                format!(
                    "must satisfy 0 <= inner ({}) <= outer ({})",
                    s.inner_radius, s.outer_radius
                ),
            ));
        }
        non_negative("blink.cooldown_s", self.blink.cooldown_s)?;
        non_negative("blink.window_s", self.blink.window_s)?;
        if self.blink.triple_count == 0 {
            return Err(invalid("blink.triple_count", "must be at least 1".to_string()));
        }
        non_negative("deck.cooldown_s", self.deck.cooldown_s)?;
        Ok(())
    }

    /// Resolve the configured cards into a deck.
    pub fn build_deck(&self, registry: &ActionRegistry) -> Result<Deck, ConfigError> {
        Ok(build_deck(&self.deck.cards, registry)?)
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be >= 0, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeckError;

    #[test]
    fn test_defaults() {
        let c = AppConfig::default();
        assert_eq!(c.selector.trigger_time_s, 1.25);
        assert_eq!(c.selector.center, (0.5, 0.5));
        assert_eq!(c.selector.inner_radius, 0.0);
        assert_eq!(c.selector.outer_radius, 0.25);
        assert_eq!(c.blink.cooldown_s, 0.3);
        assert_eq!(c.blink.window_s, 2.5);
        assert_eq!(c.deck.cooldown_s, 1.0);
        assert_eq!(c.deck.cards.len(), 5);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_empty_file_is_default() {
        let c = AppConfig::from_toml_str("").unwrap();
        assert_eq!(c, AppConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let c = AppConfig::from_toml_str(
            r#"
            [selector]
            trigger_time_s = 2.0

            [blink]
            window_s = 3.0
            "#,
        )
        .unwrap();
        assert_eq!(c.selector.trigger_time_s, 2.0);
        assert_eq!(c.selector.outer_radius, 0.25);
        assert_eq!(c.blink.window_s, 3.0);
        assert_eq!(c.blink.cooldown_s, 0.3);
    }

    #[test]
    fn test_rejects_zero_trigger() {
        let err = AppConfig::from_toml_str("[selector]\ntrigger_time_s = 0.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "selector.trigger_time_s",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_bad_center_and_radii() {
        let err = AppConfig::from_toml_str("[selector]\ncenter = [1.5, 0.5]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "selector.center", .. }));

        let err = AppConfig::from_toml_str("[selector]\ninner_radius = 0.5\nouter_radius = 0.2\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "selector.inner_radius", .. }));
    }

    #[test]
    fn test_rejects_negative_cooldown() {
        let err = AppConfig::from_toml_str("[deck]\ncooldown_s = -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "deck.cooldown_s", .. }));
    }

    #[test]
    fn test_parse_error() {
        let err = AppConfig::from_toml_str("[selector\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::load("/nonexistent/gazedeck.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_custom_cards_build() {
        let c = AppConfig::from_toml_str(
            r#"
            [[deck.cards]]
            label = "Yes"
            action = "yes"

            [[deck.cards]]
            label = "Needs"
            children = [{ label = "Hungry", action = "hungry" }]
            "#,
        )
        .unwrap();
        let deck = c.build_deck(&ActionRegistry::with_phrases()).unwrap();
        assert_eq!(deck.card_count(), 3);
    }

    #[test]
    fn test_bad_cards_surface_deck_error() {
        let c = AppConfig::from_toml_str(
            r#"
            [[deck.cards]]
            label = "Nope"
            action = "does_not_exist"
            "#,
        )
        .unwrap();
        let err = c.build_deck(&ActionRegistry::with_phrases()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Deck(DeckError::UnknownAction { .. })
        ));
    }

    #[test]
    fn test_round_trips_through_toml() {
        let c = AppConfig::default();
        let text = toml::to_string(&c).unwrap();
        let back = AppConfig::from_toml_str(&text).unwrap();
        assert_eq!(back, c);
    }
}

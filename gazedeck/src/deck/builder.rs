//! Deck construction: a fluent builder for code, and `DeckSpec` for decks
//! described in configuration with actions resolved by name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{card_path, Deck, DeckAction, DeckNode};
use crate::error::DeckError;

// ── Builder ─────────────────────────────────────────────────

/// Fluent deck builder.
///
/// ```
/// use gazedeck::deck::{builder::DeckBuilder, DeckAction};
///
/// let deck = DeckBuilder::new()
///     .leaf("Yes", DeckAction::new("yes", || {}))
///     .menu("Needs", |m| m.leaf("Water", DeckAction::new("water", || {})))
///     .build()
///     .unwrap();
/// assert_eq!(deck.card_count(), 3);
/// ```
#[derive(Debug, Default)]
pub struct DeckBuilder {
    cards: Vec<DeckNode>,
}

impl DeckBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leaf(mut self, label: impl Into<String>, action: DeckAction) -> Self {
        self.cards.push(DeckNode::leaf(label, action));
        self
    }

    pub fn menu(
        mut self,
        label: impl Into<String>,
        children: impl FnOnce(DeckBuilder) -> DeckBuilder,
    ) -> Self {
        let sub = children(DeckBuilder::new());
        self.cards.push(DeckNode::interior(label, sub.cards));
        self
    }

    pub fn build(self) -> Result<Deck, DeckError> {
        Deck::new(self.cards)
    }
}

// ── Action registry ─────────────────────────────────────────

/// Named actions available to configured decks.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    actions: HashMap<String, DeckAction>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, action: DeckAction) {
        self.actions.insert(action.name().to_string(), action);
    }

    pub fn get(&self, name: &str) -> Option<&DeckAction> {
        self.actions.get(name)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Registry with the built-in phrase actions. Each announces its
    /// phrase on the `gazedeck::phrase` log target.
    pub fn with_phrases() -> Self {
        let mut reg = Self::new();
        for (name, phrase) in BUILTIN_PHRASES {
            reg.register(DeckAction::new(*name, move || {
                info!(target: "gazedeck::phrase", "{}", phrase);
            }));
        }
        reg
    }
}

const BUILTIN_PHRASES: &[(&str, &str)] = &[
    ("yes", "Yes"),
    ("no", "No"),
    ("emergency", "Emergency triggered"),
    ("accident", "Accident triggered"),
    ("bathroom", "Bathroom requested"),
    ("hungry", "Hungry"),
    ("medicine", "Medicine needed"),
    ("uncomfortable", "Uncomfortable"),
    ("thank_you", "Thank you"),
    ("love_you", "I love you"),
    ("appreciation", "I appreciate you"),
    ("happy", "Feeling happy"),
    ("overwhelmed", "Feeling overwhelmed"),
    ("upset", "Feeling upset"),
    ("frustrated", "Feeling frustrated"),
    ("sorry", "I'm sorry"),
];

// ── Deck spec ───────────────────────────────────────────────

/// A card as written in configuration: a leaf names an action, a menu
/// lists children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckSpec {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DeckSpec>>,
}

impl DeckSpec {
    pub fn leaf(label: &str, action: &str) -> Self {
        Self {
            label: label.to_string(),
            action: Some(action.to_string()),
            children: None,
        }
    }

    pub fn menu(label: &str, children: Vec<DeckSpec>) -> Self {
        Self {
            label: label.to_string(),
            action: None,
            children: Some(children),
        }
    }

    fn to_node(&self, registry: &ActionRegistry, parent: &str) -> Result<DeckNode, DeckError> {
        let path = card_path(parent, &self.label);
        match (&self.action, &self.children) {
            (Some(_), Some(_)) => Err(DeckError::AmbiguousCard { path }),
            (None, None) => Err(DeckError::MissingAction { path }),
            (Some(name), None) => {
                let action = registry
                    .get(name)
                    .cloned()
                    .ok_or_else(|| DeckError::UnknownAction {
                        path: path.clone(),
                        action: name.clone(),
                    })?;
                Ok(DeckNode::leaf(&self.label, action))
            }
            (None, Some(children)) => {
                if children.is_empty() {
                    return Err(DeckError::EmptyMenu { path });
                }
                let nodes = children
                    .iter()
                    .map(|c| c.to_node(registry, &path))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(DeckNode::interior(&self.label, nodes))
            }
        }
    }
}

/// Resolve configured cards against a registry into a validated deck.
pub fn build_deck(specs: &[DeckSpec], registry: &ActionRegistry) -> Result<Deck, DeckError> {
    let nodes = specs
        .iter()
        .map(|s| s.to_node(registry, ""))
        .collect::<Result<Vec<_>, _>>()?;
    Deck::new(nodes)
}

/// The built-in phrase deck.
pub fn default_deck_specs() -> Vec<DeckSpec> {
    vec![
        DeckSpec::leaf("Yes", "yes"),
        DeckSpec::leaf("No", "no"),
        DeckSpec::menu("Help Menu", vec![DeckSpec::leaf("Emergency", "emergency")]),
        DeckSpec::menu(
            "Basic Needs Menu",
            vec![
                DeckSpec::leaf("Bathroom", "bathroom"),
                DeckSpec::leaf("Hungry", "hungry"),
                DeckSpec::leaf("Medicine", "medicine"),
                DeckSpec::leaf("Uncomfortable", "uncomfortable"),
            ],
        ),
        DeckSpec::menu(
            "Sentiment Menu",
            vec![
                DeckSpec::leaf("Thank you", "thank_you"),
                DeckSpec::leaf("I love you", "love_you"),
                DeckSpec::leaf("I appreciate you", "appreciation"),
                DeckSpec::leaf("Feeling happy", "happy"),
                DeckSpec::leaf("Feeling overwhelmed", "overwhelmed"),
                DeckSpec::leaf("Feeling upset", "upset"),
                DeckSpec::leaf("Feeling frustrated", "frustrated"),
                DeckSpec::leaf("I'm sorry", "sorry"),
            ],
        ),
    ]
}

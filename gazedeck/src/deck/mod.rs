//! Phrase deck: an immutable tree of cards and the navigator that browses it.
//!
//! A card is either a leaf carrying an action or a menu of child cards,
//! never both. Decks are validated once at construction; navigation never
//! fails afterwards.

pub mod builder;
pub mod navigator;

use std::fmt;
use std::sync::Arc;

use crate::error::DeckError;

/// Side effect attached to a leaf card, injected by the host.
#[derive(Clone)]
pub struct DeckAction {
    name: String,
    run: Arc<dyn Fn() + Send + Sync>,
}

impl DeckAction {
    pub fn new(name: impl Into<String>, run: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            run: Arc::new(run),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoke(&self) {
        (self.run)()
    }
}

impl fmt::Debug for DeckAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeckAction").field("name", &self.name).finish()
    }
}

/// One card of the deck.
#[derive(Debug, Clone)]
pub enum DeckNode {
    Leaf { label: String, action: DeckAction },
    Interior { label: String, children: Arc<[DeckNode]> },
}

impl DeckNode {
    pub fn leaf(label: impl Into<String>, action: DeckAction) -> Self {
        Self::Leaf {
            label: label.into(),
            action,
        }
    }

    pub fn interior(label: impl Into<String>, children: Vec<DeckNode>) -> Self {
        Self::Interior {
            label: label.into(),
            children: children.into(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Leaf { label, .. } | Self::Interior { label, .. } => label,
        }
    }

    pub fn is_interior(&self) -> bool {
        matches!(self, Self::Interior { .. })
    }

    pub fn children(&self) -> Option<&Arc<[DeckNode]>> {
        match self {
            Self::Interior { children, .. } => Some(children),
            Self::Leaf { .. } => None,
        }
    }
}

/// A validated, non-empty deck.
#[derive(Debug, Clone)]
pub struct Deck {
    root: Arc<[DeckNode]>,
}

impl Deck {
    /// Validate and wrap a list of top-level cards.
    pub fn new(cards: Vec<DeckNode>) -> Result<Self, DeckError> {
        if cards.is_empty() {
            return Err(DeckError::EmptyDeck);
        }
        for card in &cards {
            validate(card, "")?;
        }
        Ok(Self { root: cards.into() })
    }

    pub fn root(&self) -> &Arc<[DeckNode]> {
        &self.root
    }

    /// Total number of cards, menus included.
    pub fn card_count(&self) -> usize {
        fn count(nodes: &[DeckNode]) -> usize {
            nodes
                .iter()
                .map(|n| 1 + n.children().map_or(0, |c| count(c)))
                .sum()
        }
        count(&self.root)
    }
}

pub(crate) fn card_path(parent: &str, label: &str) -> String {
    if parent.is_empty() {
        label.to_string()
    } else {
        format!("{} / {}", parent, label)
    }
}

fn validate(node: &DeckNode, parent: &str) -> Result<(), DeckError> {
    let path = card_path(parent, node.label());
    if node.label().trim().is_empty() {
        return Err(DeckError::EmptyLabel { path });
    }
    if let Some(children) = node.children() {
        if children.is_empty() {
            return Err(DeckError::EmptyMenu { path });
        }
        for child in children.iter() {
            validate(child, &path)?;
        }
    }
    Ok(())
}

//! Stack-based deck navigation.
//!
//! The root level is always present; descended menus are pushed on top.
//! Indices grow without bound and are reduced modulo the level length when
//! read, so browsing wraps around.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Deck, DeckNode};

/// Navigator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Minimum seconds between blink-driven advances.
    pub cooldown_s: f64,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self { cooldown_s: 1.0 }
    }
}

/// One level of the navigation stack.
#[derive(Debug, Clone)]
struct Level {
    /// Label of the menu card this level was entered from.
    title: Option<String>,
    cards: Arc<[DeckNode]>,
    index: usize,
}

impl Level {
    fn current(&self) -> &DeckNode {
        &self.cards[self.index % self.cards.len()]
    }
}

/// Browses a deck: advance, descend, ascend.
#[derive(Debug)]
pub struct DeckNavigator {
    pub config: NavigatorConfig,
    root: Level,
    stack: Vec<Level>,
    active: bool,
    last_blink_advance_s: f64,
}

impl DeckNavigator {
    pub fn new(deck: &Deck, config: NavigatorConfig) -> Self {
        Self {
            config,
            root: Level {
                title: None,
                cards: deck.root().clone(),
                index: 0,
            },
            stack: Vec::new(),
            active: false,
            last_blink_advance_s: 0.0,
        }
    }

    pub fn activate(&mut self) {
        if !self.active {
            info!("deck activated");
        }
        self.active = true;
    }

    /// Deactivate and return to the top of the hierarchy.
    pub fn deactivate(&mut self) {
        if self.active {
            info!("deck deactivated");
        }
        self.active = false;
        self.stack.clear();
        self.root.index = 0;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether dwell input should be accepted. Dwell is gated on the deck
    /// being active.
    pub fn dwell_input_enabled(&self) -> bool {
        self.active
    }

    fn top(&self) -> &Level {
        self.stack.last().unwrap_or(&self.root)
    }

    fn top_mut(&mut self) -> &mut Level {
        self.stack.last_mut().unwrap_or(&mut self.root)
    }

    pub fn current_card(&self) -> &DeckNode {
        self.top().current()
    }

    /// Number of levels, 1 at the root.
    pub fn depth(&self) -> usize {
        1 + self.stack.len()
    }

    /// Labels of the menus descended into, outermost first.
    pub fn breadcrumb(&self) -> Vec<&str> {
        self.stack
            .iter()
            .filter_map(|l| l.title.as_deref())
            .collect()
    }

    /// Move to the next card on the current level.
    pub fn advance(&mut self) {
        let level = self.top_mut();
        level.index = level.index.wrapping_add(1);
    }

    /// Blink-driven advance, debounced by the navigator cooldown. Returns
    /// the new current card when the deck advanced.
    pub fn on_blink(&mut self, now_s: f64) -> Option<DeckNode> {
        if !self.active {
            return None;
        }
        if now_s - self.last_blink_advance_s <= self.config.cooldown_s {
            debug!("blink advance suppressed (cooldown)");
            return None;
        }
        self.last_blink_advance_s = now_s;
        self.advance();
        let card = self.current_card().clone();
        debug!("advanced to '{}'", card.label());
        Some(card)
    }

    /// Act on the current card: descend into a menu or run a leaf action.
    /// Returns the card that was read, or `None` when the deck is inactive.
    pub fn select(&mut self) -> Option<DeckNode> {
        if !self.active {
            return None;
        }
        let card = self.current_card().clone();
        match &card {
            DeckNode::Interior { label, children } => {
                info!("entering menu '{}'", label);
                self.stack.push(Level {
                    title: Some(label.clone()),
                    cards: children.clone(),
                    index: 0,
                });
            }
            DeckNode::Leaf { label, action } => {
                info!("selected '{}' ({})", label, action.name());
                action.invoke();
            }
        }
        Some(card)
    }

    /// Return to the parent level. No-op at the root.
    pub fn back(&mut self) {
        if let Some(level) = self.stack.pop() {
            debug!("left menu '{}'", level.title.as_deref().unwrap_or(""));
        }
    }
}

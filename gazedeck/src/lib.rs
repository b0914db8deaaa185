//! gazedeck: gaze-driven communication deck.
//!
//! Eye-gaze dwell selection and blink gestures drive a hierarchical deck
//! of phrase cards. This library crate exposes the core modules for
//! integration testing. The binary entry point lives in `main.rs` and
//! replays recorded gaze traces.

pub mod clock;
pub mod config;
pub mod controller;
pub mod deck;
pub mod error;
pub mod gaze;
pub mod input_source;
pub mod session;

//! Overthrow - Action Resolution & Global Metrics Engine
//!
//! The deterministic-given-seed state machine behind a map-driven
//! geopolitical resistance game: per-city state, player action
//! resolution with probabilistic adversary retaliation, and global
//! indices rolled up from the full registry. Map rendering, popups,
//! and every other UI concern live outside this crate and only read
//! the snapshots and event stream exposed here.

pub mod actions;
pub mod catalog;
pub mod core;
pub mod engine;
pub mod incidents;
pub mod log;
pub mod metrics;
pub mod registry;
pub mod retaliation;

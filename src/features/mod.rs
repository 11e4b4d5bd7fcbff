//! Feature implementations for keytime.
//!
//! - Shortcut registry
//! - Session tracking and the timer tick
//! - Statistics and charts
//! - CSV transfer
//! - Share links
//! - Preferences

pub mod preferences;
pub mod share;
pub mod shortcuts;
pub mod stats;
pub mod tracking;
pub mod transfer;

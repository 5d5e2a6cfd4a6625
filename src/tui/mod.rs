//! The cockpit TUI — ratatui presentation layer.
//!
//! ## Architecture (TEA)
//!
//! Model (`DashboardApp`) + Update (message handler) + View (render).
//! Immediate mode, no retained widget state. Every polled state slice is
//! replaced atomically by a `SliceUpdate` message; a failed fetch sends
//! no message, so a panel can only ever show its previous complete value.

pub mod app;
pub mod event;
pub mod format;
pub mod input;
pub mod layout;
pub mod poll;
pub mod render;
pub mod runner;

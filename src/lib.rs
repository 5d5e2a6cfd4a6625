//! Cockpit — terminal operator console for the agentic control plane.
//!
//! Polls the backend's HTTP API on a fixed interval, interprets the
//! loosely-structured event stream (fenced artifacts, generative-UI
//! directives), and renders a ratatui dashboard. Operator interaction is
//! translated back into single-line commands the backend understands.

pub mod api;
pub mod command;
pub mod config;
pub mod genui;
pub mod governance;
pub mod tui;

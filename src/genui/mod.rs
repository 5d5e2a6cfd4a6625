//! Generative-UI interpretation layer.
//!
//! The backend's event payloads predate strict typing: renderable
//! artifacts arrive as fenced ```html/```svg blocks, and UI directives
//! arrive either as a fenced ```ui block or as an inline `"ui": {...}`
//! fragment inside a larger message. This module recovers that structure
//! with total, ordered parser attempts — every extractor returns an
//! `Option` and never panics or errors on malformed input — and maps
//! recognized directives to typed view models.
//!
//! Should the backend ever emit these as first-class structured fields,
//! only this module changes; callers see the same types.

pub mod artifact;
pub mod directive;
pub mod payload;
pub mod view;

pub use artifact::{extract_artifact, Artifact, ArtifactKind};
pub use directive::{extract_directive, extract_ui_blocks, UiBlock};
pub use view::{action_views, classify, ActionView, UiCard};

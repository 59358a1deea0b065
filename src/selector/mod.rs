//! Selector rules for turn structure.
//!
//! - `artifacts`: the declarative Artifact Filter (UI chrome to skip)
//! - `root`: the Canonical Root Locator for assistant turns

pub mod artifacts;
pub mod root;

pub use artifacts::{is_reasoning_panel, should_skip, ArtifactRule, ARTIFACT_RULES, REASONING_PANEL_RULES};
pub use root::{locate_root, RootSource};

//! Artifact Filter
//!
//! Identifies UI chrome (buttons, icon widgets, citation chips, reasoning
//! panels, action toolbars, watermark indicators) that is not semantic
//! content. A matching node is skipped together with its whole subtree.
//!
//! The rules are declarative lists. The live walk and the cleaned-copy
//! serializer consult them through [`should_skip`]; the root locator reads
//! the reasoning-panel list through [`is_reasoning_panel`].

use crate::dom::{has_class, ContentNode, SHADOW_ROOT_TAG};

/// One artifact rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactRule {
    /// Element tag name (lowercase).
    Tag(&'static str),
    /// Class token.
    Class(&'static str),
    /// Exact attribute value.
    Attr {
        name: &'static str,
        value: &'static str,
    },
}

impl ArtifactRule {
    #[must_use]
    pub fn matches<N: ContentNode>(&self, node: &N) -> bool {
        match *self {
            Self::Tag(tag) => node.tag().as_deref() == Some(tag),
            Self::Class(class) => has_class(node, class),
            Self::Attr { name, value } => node
                .attribute(name)
                .is_some_and(|v| v.trim().eq_ignore_ascii_case(value)),
        }
    }
}

/// Collapsed reasoning panels. They render their own decoy body marker, so
/// the root locator also refuses candidates below them.
pub static REASONING_PANEL_RULES: &[ArtifactRule] = &[
    ArtifactRule::Tag("model-thoughts"),
    ArtifactRule::Class("thoughts-container"),
    ArtifactRule::Class("thoughts-content"),
    ArtifactRule::Class("model-thoughts"),
    ArtifactRule::Attr { name: "data-test-id", value: "model-thoughts" },
];

/// UI chrome rules, shared by the live walk and the cleaned-copy serializer.
pub static ARTIFACT_RULES: &[ArtifactRule] = &[
    // Interactive controls and icon widgets
    ArtifactRule::Tag("button"),
    ArtifactRule::Tag("mat-icon"),
    ArtifactRule::Class("mat-icon"),
    ArtifactRule::Class("material-icons"),
    ArtifactRule::Class("google-symbols"),
    ArtifactRule::Attr { name: "role", value: "button" },
    // Non-rendered content
    ArtifactRule::Tag("script"),
    ArtifactRule::Tag("style"),
    ArtifactRule::Tag("noscript"),
    ArtifactRule::Tag(SHADOW_ROOT_TAG),
    // Citation and source chips
    ArtifactRule::Tag("source-footnote"),
    ArtifactRule::Tag("sources-carousel"),
    ArtifactRule::Tag("sources-carousel-inline"),
    ArtifactRule::Tag("source-inline-chip"),
    ArtifactRule::Tag("sources-list"),
    ArtifactRule::Class("source-chip"),
    ArtifactRule::Class("citation-chip"),
    // Action rows, toolbars, overlay controls
    ArtifactRule::Class("action-buttons"),
    ArtifactRule::Class("response-footer"),
    ArtifactRule::Class("buttons-container"),
    ArtifactRule::Class("table-footer"),
    ArtifactRule::Class("export-sheets-button-container"),
    ArtifactRule::Class("overlay-controls"),
    ArtifactRule::Class("copy-button"),
    ArtifactRule::Attr { name: "data-test-id", value: "copy-button" },
    // Screen-reader labels
    ArtifactRule::Class("cdk-visually-hidden"),
    // Watermark indicators
    ArtifactRule::Tag("watermark-indicator"),
    ArtifactRule::Class("watermark"),
];

/// Returns true if `node` is a collapsed reasoning panel.
#[must_use]
pub fn is_reasoning_panel<N: ContentNode>(node: &N) -> bool {
    node.is_element() && REASONING_PANEL_RULES.iter().any(|rule| rule.matches(node))
}

/// Returns true if `node` is UI chrome or a reasoning panel and must be
/// skipped with its subtree.
///
/// Text nodes and documents are never artifacts.
#[must_use]
pub fn should_skip<N: ContentNode>(node: &N) -> bool {
    node.is_element()
        && (ARTIFACT_RULES.iter().any(|rule| rule.matches(node)) || is_reasoning_panel(node))
}

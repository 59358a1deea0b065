//! Marker vocabulary of the chat application's rendered markup.
//!
//! Every tag, class and attribute name the extractor keys on lives here.
//! The vocabulary is imposed by the source application; when it drifts,
//! extraction degrades through the root locator and walker fallbacks
//! instead of failing.

use crate::dom::{has_any_class, tag_in, ContentNode};

// =============================================================================
// Turn Structure
// =============================================================================

/// Authoritative message body of an assistant turn.
pub const BODY_TAGS: &[&str] = &["message-content"];
pub const BODY_CLASSES: &[&str] = &["model-response-text"];

/// Looser markers for rendered Markdown content.
pub const MARKDOWN_CLASSES: &[&str] = &["markdown", "markdown-main-panel"];

/// Turn containers, in conversation order.
pub const USER_TURN_TAGS: &[&str] = &["user-query"];
pub const ASSISTANT_TURN_TAGS: &[&str] = &["model-response"];

// =============================================================================
// Leaf Content
// =============================================================================

pub const MATH_BLOCK_CLASS: &str = "math-block";
pub const MATH_INLINE_CLASS: &str = "math-inline";
/// Attribute holding the literal formula source.
pub const MATH_LITERAL_ATTR: &str = "data-math";

pub const CODE_BLOCK_TAGS: &[&str] = &["code-block", "pre"];
pub const CODE_BLOCK_CLASSES: &[&str] = &["code-block"];
/// Element that carries the language label above a code block.
pub const CODE_LABEL_CLASSES: &[&str] = &["code-block-decoration"];

pub const TABLE_WRAPPER_TAGS: &[&str] = &["table-block"];
pub const TABLE_WRAPPER_CLASSES: &[&str] = &["table-block"];

/// Wrappers that turn an image into a search result when an attribution is inside.
pub const IMAGE_RESULT_TAGS: &[&str] = &["figure", "single-image"];
pub const IMAGE_RESULT_CLASSES: &[&str] = &["image-container"];
pub const ATTRIBUTION_TAGS: &[&str] = &["figcaption"];
pub const ATTRIBUTION_CLASSES: &[&str] = &["attribution"];

/// Components that hold generated images.
pub const GENERATED_IMAGE_TAGS: &[&str] = &["generated-image", "generated-image-container"];
pub const GENERATED_IMAGE_CLASSES: &[&str] = &["generated-image"];

// =============================================================================
// Containers
// =============================================================================

pub const CONTAINER_TAGS: &[&str] = &[
    "div", "section", "article", "main", "figure", "details", "header", "footer", "aside",
    "body", "center",
];

/// Custom components known to wrap real content.
pub const CONTAINER_COMPONENTS: &[&str] = &[
    "response-element",
    "message-content",
    "structured-content-container",
    "model-response",
];

/// Utility wrappers around wide content.
pub const CONTAINER_CLASSES: &[&str] = &["horizontal-scroll-wrapper", "table-block-component"];

// =============================================================================
// User Turns
// =============================================================================

pub const QUERY_LINE_CLASSES: &[&str] = &["query-text-line"];
pub const QUERY_TEXT_CLASSES: &[&str] = &["query-text"];
pub const UPLOAD_TAGS: &[&str] = &["user-query-file-preview", "user-query-file-carousel"];
pub const UPLOAD_CLASSES: &[&str] = &["file-preview-container", "uploaded-image", "preview-image"];

// =============================================================================
// Predicates
// =============================================================================

#[must_use]
pub fn is_message_body<N: ContentNode>(node: &N) -> bool {
    tag_in(node, BODY_TAGS) || has_any_class(node, BODY_CLASSES)
}

#[must_use]
pub fn is_markdown_content<N: ContentNode>(node: &N) -> bool {
    has_any_class(node, MARKDOWN_CLASSES)
}

/// Carries either content marker.
#[must_use]
pub fn is_content_marked<N: ContentNode>(node: &N) -> bool {
    is_message_body(node) || is_markdown_content(node)
}

#[must_use]
pub fn is_code_block<N: ContentNode>(node: &N) -> bool {
    tag_in(node, CODE_BLOCK_TAGS) || has_any_class(node, CODE_BLOCK_CLASSES)
}

#[must_use]
pub fn is_table_wrapper<N: ContentNode>(node: &N) -> bool {
    tag_in(node, TABLE_WRAPPER_TAGS) || has_any_class(node, TABLE_WRAPPER_CLASSES)
}

#[must_use]
pub fn is_generated_image<N: ContentNode>(node: &N) -> bool {
    tag_in(node, GENERATED_IMAGE_TAGS) || has_any_class(node, GENERATED_IMAGE_CLASSES)
}

#[must_use]
pub fn is_image_result_wrapper<N: ContentNode>(node: &N) -> bool {
    tag_in(node, IMAGE_RESULT_TAGS) || has_any_class(node, IMAGE_RESULT_CLASSES)
}

#[must_use]
pub fn is_attribution<N: ContentNode>(node: &N) -> bool {
    tag_in(node, ATTRIBUTION_TAGS) || has_any_class(node, ATTRIBUTION_CLASSES)
}

#[must_use]
pub fn is_math<N: ContentNode>(node: &N) -> bool {
    has_any_class(node, &[MATH_BLOCK_CLASS, MATH_INLINE_CLASS])
        || node.attribute(MATH_LITERAL_ATTR).is_some()
}

#[must_use]
pub fn is_container<N: ContentNode>(node: &N) -> bool {
    tag_in(node, CONTAINER_TAGS)
        || tag_in(node, CONTAINER_COMPONENTS)
        || has_any_class(node, CONTAINER_CLASSES)
        || is_content_marked(node)
}

#[must_use]
pub fn is_upload_container<N: ContentNode>(node: &N) -> bool {
    tag_in(node, UPLOAD_TAGS) || has_any_class(node, UPLOAD_CLASSES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotNode;

    #[test]
    fn math_matches_class_or_literal_attribute() {
        let by_class = SnapshotNode::element("span").with_attr("class", "math-inline");
        let by_attr = SnapshotNode::element("span").with_attr("data-math", "x");
        assert!(is_math(&&by_class));
        assert!(is_math(&&by_attr));
        assert!(!is_math(&&SnapshotNode::element("span")));
    }

    #[test]
    fn containers_include_components_and_utility_classes() {
        assert!(is_container(&&SnapshotNode::element("response-element")));
        assert!(is_container(
            &&SnapshotNode::element("x-wrap").with_attr("class", "horizontal-scroll-wrapper")
        ));
        assert!(!is_container(&&SnapshotNode::element("span")));
    }
}

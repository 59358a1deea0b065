use turn_extract::{extract_assistant_content, extract_conversation, Error, Role, SnapshotNode};

#[test]
fn shadow_tree_is_walked_before_light_children() {
    let turn = SnapshotNode::from_json(
        r#"{
          "tag": "model-response",
          "children": [{
            "tag": "message-content",
            "children": [
              {"tag": "response-element", "shadow": [
                {"tag": "p", "children": [{"text": "from shadow"}]}
              ], "children": [
                {"tag": "p", "children": [{"text": "from light"}]}
              ]}
            ]
          }]
        }"#,
    );
    assert!(turn.is_ok());
    if let Ok(turn) = turn {
        let content = extract_assistant_content(&&turn);
        assert_eq!(content.text, "from shadow\n\nfrom light");
        assert_eq!(content.markup, "<p>from shadow</p>\n<p>from light</p>");
    }
}

#[test]
fn artifacts_inside_shadow_trees_are_skipped() {
    let turn = SnapshotNode::element("message-content").with_child(
        SnapshotNode::element("response-element")
            .with_shadow_child(
                SnapshotNode::element("div")
                    .with_attr("class", "action-buttons")
                    .with_child(SnapshotNode::text("Copy Share")),
            )
            .with_shadow_child(SnapshotNode::element("p").with_child(SnapshotNode::text("kept"))),
    );
    let content = extract_assistant_content(&&turn);
    assert_eq!(content.text, "kept");
    assert!(!content.markup.contains("action-buttons"));
}

#[test]
fn math_in_shadow_tree_keeps_rendered_markup() {
    let turn = SnapshotNode::element("message-content").with_child(
        SnapshotNode::element("response-element").with_shadow_child(
            SnapshotNode::element("div")
                .with_attr("class", "math-block")
                .with_child(
                    SnapshotNode::element("span")
                        .with_attr("data-math", "E=mc^2")
                        .with_child(SnapshotNode::text("E=mc²")),
                ),
        ),
    );
    let content = extract_assistant_content(&&turn);

    assert_eq!(content.text, "$$\nE=mc^2\n$$");
    assert!(content.has_formulas);
    assert!(content
        .markup
        .starts_with(r#"<div class="math-block" data-math="E=mc^2"><span data-math="E=mc^2">"#));
}

#[test]
fn conversation_from_snapshot() {
    let root = SnapshotNode::element("main")
        .with_child(
            SnapshotNode::element("user-query").with_child(
                SnapshotNode::element("p")
                    .with_attr("class", "query-text-line")
                    .with_child(SnapshotNode::text("hi")),
            ),
        )
        .with_child(
            SnapshotNode::element("model-response").with_child(
                SnapshotNode::element("message-content")
                    .with_child(SnapshotNode::element("p").with_child(SnapshotNode::text("hello"))),
            ),
        );
    let turns = extract_conversation(&&root);
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[1].content.text, "hello");
}

#[test]
fn malformed_snapshot_is_an_error() {
    let result = SnapshotNode::from_json(r#"{"tag": 5}"#);
    assert!(matches!(result, Err(Error::Snapshot(_))));
}

use jsonforge::document::node::{JsonNumber, JsonValue, ValueType};
use jsonforge::document::parser::parse_document;
use jsonforge::editor::destination::Destination;
use jsonforge::editor::session::{EditorSession, ImportMode};
use jsonforge::error::EditError;
use jsonforge::path::{NodeAddress, Path, Segment};

fn session_from(text: &str) -> EditorSession {
    EditorSession::with_tree(parse_document(text).unwrap())
}

fn path(segments: &[Segment]) -> Path {
    Path::from_segments(segments.to_vec())
}

fn addr(segments: &[Segment], key: Segment) -> NodeAddress {
    NodeAddress::new(path(segments), key)
}

#[test]
fn test_build_undo_redo_scenario() {
    let mut session = EditorSession::new();

    session.add_object(&Path::root(), Some("user")).unwrap();
    session
        .add_key_value(
            &path(&[Segment::key("user")]),
            "name",
            JsonValue::String("Ana".to_string()),
        )
        .unwrap();
    assert_eq!(
        session.serialize(),
        "{\n  \"user\": {\n    \"name\": \"Ana\"\n  }\n}"
    );

    assert!(session.undo());
    assert!(session.undo());
    assert_eq!(session.serialize(), "{}");
    assert!(!session.undo());

    assert!(session.redo());
    assert_eq!(session.serialize(), "{\n  \"user\": {}\n}");
    assert!(session.redo());
    assert_eq!(
        session.serialize(),
        "{\n  \"user\": {\n    \"name\": \"Ana\"\n  }\n}"
    );
    assert!(!session.redo());
}

#[test]
fn test_every_mutation_is_one_undo_step() {
    let mut session = EditorSession::new();

    session.add_array(&Path::root(), Some("items")).unwrap();
    session
        .add_array_value(
            &path(&[Segment::key("items")]),
            JsonValue::Number(JsonNumber::Integer(1)),
        )
        .unwrap();
    session
        .add_array_value(
            &path(&[Segment::key("items")]),
            JsonValue::Number(JsonNumber::Integer(2)),
        )
        .unwrap();
    let built = session.serialize();

    for _ in 0..3 {
        assert!(session.undo());
    }
    assert_eq!(session.serialize(), "{}");
    for _ in 0..3 {
        assert!(session.redo());
    }
    assert_eq!(session.serialize(), built);
}

#[test]
fn test_failed_operation_leaves_no_trace() {
    let mut session = session_from(r#"{"a": 1}"#);

    // Duplicate key on add.
    let err = session
        .add_key_value(&Path::root(), "a", JsonValue::Null)
        .unwrap_err();
    assert_eq!(err, EditError::DuplicateKey("a".to_string()));

    // Duplicate key on rename.
    session
        .add_key_value(&Path::root(), "b", JsonValue::Null)
        .unwrap();
    let err = session.rename_key(&Path::root(), "a", "b").unwrap_err();
    assert_eq!(err, EditError::DuplicateKey("b".to_string()));

    // Empty key name.
    let err = session
        .add_key_value(&Path::root(), "  ", JsonValue::Null)
        .unwrap_err();
    assert!(matches!(err, EditError::Validation(_)));

    // Only the successful add is undoable.
    assert!(session.undo());
    assert!(!session.undo());
    assert_eq!(session.serialize(), "{\n  \"a\": 1\n}");
}

#[test]
fn test_add_key_value_to_array_wraps_in_object() {
    let mut session = session_from(r#"{"items": []}"#);

    session
        .add_key_value(
            &path(&[Segment::key("items")]),
            "name",
            JsonValue::String("x".to_string()),
        )
        .unwrap();

    assert_eq!(
        session.serialize(),
        "{\n  \"items\": [\n    {\n      \"name\": \"x\"\n    }\n  ]\n}"
    );
}

#[test]
fn test_add_object_to_array_needs_no_name() {
    let mut session = session_from(r#"{"items": []}"#);

    session
        .add_object(&path(&[Segment::key("items")]), None)
        .unwrap();
    assert_eq!(session.serialize(), "{\n  \"items\": [\n    {}\n  ]\n}");

    // In an object a name is required.
    let err = session.add_object(&Path::root(), None).unwrap_err();
    assert!(matches!(err, EditError::Validation(_)));
}

#[test]
fn test_rename_preserves_sibling_order() {
    let mut session = session_from(r#"{"a": 1, "b": 2, "c": 3}"#);

    session.rename_key(&Path::root(), "b", "x").unwrap();

    assert_eq!(
        session.serialize(),
        "{\n  \"a\": 1,\n  \"x\": 2,\n  \"c\": 3\n}"
    );

    session.undo();
    assert_eq!(
        session.serialize(),
        "{\n  \"a\": 1,\n  \"b\": 2,\n  \"c\": 3\n}"
    );
}

#[test]
fn test_rename_to_same_key_is_a_no_op() {
    let mut session = session_from(r#"{"a": 1}"#);
    session.rename_key(&Path::root(), "a", "a").unwrap();
    assert!(!session.can_undo());
}

#[test]
fn test_edit_primitive_value_coercion() {
    let mut session = session_from(r#"{"n": "old"}"#);
    let target = addr(&[], Segment::key("n"));

    session
        .edit_primitive_value(&target, ValueType::Number, "4.5")
        .unwrap();
    assert_eq!(session.serialize(), "{\n  \"n\": 4.5\n}");

    // Unparseable numbers fall back to 0.
    session
        .edit_primitive_value(&target, ValueType::Number, "not a number")
        .unwrap();
    assert_eq!(session.serialize(), "{\n  \"n\": 0\n}");

    session
        .edit_primitive_value(&target, ValueType::Null, "whatever")
        .unwrap();
    assert_eq!(session.serialize(), "{\n  \"n\": null\n}");
}

#[test]
fn test_remove_selected_container_and_child_removes_once() {
    let mut session = session_from(r#"{"user": {"name": "Ana"}, "keep": 1}"#);

    // Toggling the container also selects the child; both are in the set.
    session.toggle_selection(addr(&[], Segment::key("user")));
    assert_eq!(session.selection().len(), 2);

    let removed = session.remove_selected().unwrap();
    assert_eq!(removed, 1);
    assert_eq!(session.serialize(), "{\n  \"keep\": 1\n}");

    session.undo();
    assert_eq!(
        session.serialize(),
        "{\n  \"user\": {\n    \"name\": \"Ana\"\n  },\n  \"keep\": 1\n}"
    );
}

#[test]
fn test_remove_selected_array_entries_high_index_first() {
    let mut session = session_from(r#"{"items": [10, 20, 30, 40]}"#);
    let items = [Segment::key("items")];

    session.toggle_selection(addr(&items, Segment::index(0)));
    session.toggle_selection(addr(&items, Segment::index(2)));

    let removed = session.remove_selected().unwrap();
    assert_eq!(removed, 2);
    assert_eq!(session.serialize(), "{\n  \"items\": [\n    20,\n    40\n  ]\n}");
}

#[test]
fn test_remove_selected_empty_selection() {
    let mut session = session_from(r#"{"a": 1}"#);
    assert_eq!(session.remove_selected(), Err(EditError::EmptySelection));
    assert!(!session.can_undo());
}

#[test]
fn test_move_element_into_object_with_unique_key() {
    let mut session = session_from(r#"{"item": 1, "inner": {"item": 2}}"#);

    session
        .move_element(
            &addr(&[], Segment::key("item")),
            &Destination::object(path(&[Segment::key("inner")])),
        )
        .unwrap();

    assert_eq!(
        session.serialize(),
        "{\n  \"inner\": {\n    \"item\": 2,\n    \"item_1\": 1\n  }\n}"
    );
}

#[test]
fn test_move_element_kind_mismatch_keeps_source() {
    let mut session = session_from(r#"{"item": 1, "inner": {}}"#);
    let before = session.serialize();

    let err = session
        .move_element(
            &addr(&[], Segment::key("item")),
            &Destination::array(path(&[Segment::key("inner")])),
        )
        .unwrap_err();

    assert!(matches!(err, EditError::InvalidDestination(_)));
    assert_eq!(session.serialize(), before);
    assert!(!session.can_undo());
}

#[test]
fn test_move_element_into_own_subtree_rejected() {
    let mut session = session_from(r#"{"outer": {"inner": {}}}"#);

    let err = session
        .move_element(
            &addr(&[], Segment::key("outer")),
            &Destination::object(path(&[Segment::key("outer"), Segment::key("inner")])),
        )
        .unwrap_err();

    assert!(matches!(err, EditError::InvalidDestination(_)));
}

#[test]
fn test_move_selected_into_array() {
    let mut session = session_from(r#"{"a": 1, "b": 2, "dest": []}"#);

    session.toggle_selection(addr(&[], Segment::key("a")));
    session.toggle_selection(addr(&[], Segment::key("b")));

    let moved = session
        .move_selected(&Destination::array(path(&[Segment::key("dest")])))
        .unwrap();

    assert_eq!(moved, 2);
    assert!(session.selection().is_empty());

    let root = session.tree().root();
    if let JsonValue::Object(entries) = root {
        assert_eq!(entries.len(), 1);
        if let JsonValue::Array(elements) = &entries["dest"] {
            assert_eq!(elements.len(), 2);
        } else {
            panic!("expected array");
        }
    } else {
        panic!("expected object");
    }
}

#[test]
fn test_drag_drop_reorders_within_list() {
    let mut session = session_from(r#"{"items": ["A", "B", "C"]}"#);
    let items = [Segment::key("items")];

    session
        .drag_drop(
            &addr(&items, Segment::index(0)),
            &addr(&items, Segment::index(2)),
        )
        .unwrap();

    assert_eq!(
        session.serialize(),
        "{\n  \"items\": [\n    \"B\",\n    \"C\",\n    \"A\"\n  ]\n}"
    );
}

#[test]
fn test_drag_drop_reorders_map_keys() {
    let mut session = session_from(r#"{"a": 1, "b": 2, "c": 3}"#);

    session
        .drag_drop(&addr(&[], Segment::key("a")), &addr(&[], Segment::key("c")))
        .unwrap();

    assert_eq!(
        session.serialize(),
        "{\n  \"b\": 2,\n  \"c\": 3,\n  \"a\": 1\n}"
    );
}

#[test]
fn test_drag_drop_onto_container_moves_inside() {
    let mut session = session_from(r#"{"value": 7, "bucket": {}}"#);

    session
        .drag_drop(
            &addr(&[], Segment::key("value")),
            &addr(&[], Segment::key("bucket")),
        )
        .unwrap();

    assert_eq!(
        session.serialize(),
        "{\n  \"bucket\": {\n    \"value\": 7\n  }\n}"
    );
}

#[test]
fn test_drag_drop_onto_primitive_in_other_parent_moves_to_its_parent() {
    let mut session = session_from(r#"{"value": 7, "bucket": {"leaf": 1}}"#);

    session
        .drag_drop(
            &addr(&[], Segment::key("value")),
            &addr(&[Segment::key("bucket")], Segment::key("leaf")),
        )
        .unwrap();

    assert_eq!(
        session.serialize(),
        "{\n  \"bucket\": {\n    \"leaf\": 1,\n    \"value\": 7\n  }\n}"
    );
}

#[test]
fn test_drag_drop_onto_self_or_descendant_rejected() {
    let mut session = session_from(r#"{"outer": {"inner": {}}}"#);
    let outer = addr(&[], Segment::key("outer"));
    let inner = addr(&[Segment::key("outer")], Segment::key("inner"));

    assert!(session.drag_drop(&outer, &outer.clone()).is_err());
    assert!(session.drag_drop(&outer, &inner).is_err());
    assert!(!session.can_undo());
}

#[test]
fn test_destinations_exclude_moved_nodes() {
    let session = session_from(r#"{"a": {"b": {}}, "c": {}}"#);

    let moving = vec![addr(&[], Segment::key("a"))];
    let destinations = session.destinations(&moving);

    assert!(destinations.iter().any(|d| d == &Destination::root()));
    assert!(destinations
        .iter()
        .any(|d| d.path == path(&[Segment::key("c")])));
    assert!(!destinations
        .iter()
        .any(|d| d.path == path(&[Segment::key("a")])));
    assert!(!destinations
        .iter()
        .any(|d| d.path == path(&[Segment::key("a"), Segment::key("b")])));
}

#[test]
fn test_import_replace() {
    let mut session = session_from(r#"{"old": 1}"#);

    session
        .import_document(r#"{"new": true}"#, ImportMode::Replace)
        .unwrap();
    assert_eq!(session.serialize(), "{\n  \"new\": true\n}");

    session.undo();
    assert_eq!(session.serialize(), "{\n  \"old\": 1\n}");
}

#[test]
fn test_import_merge_overwrites_colliding_keys() {
    let mut session = session_from(r#"{"a": 1, "b": 2}"#);

    session
        .import_document(r#"{"b": 20, "c": 30}"#, ImportMode::Merge)
        .unwrap();

    assert_eq!(
        session.serialize(),
        "{\n  \"a\": 1,\n  \"b\": 20,\n  \"c\": 30\n}"
    );
}

#[test]
fn test_import_rejects_bad_input() {
    let mut session = session_from(r#"{"a": 1}"#);

    // Malformed JSON surfaces the parser's message.
    let err = session
        .import_document("{not json", ImportMode::Replace)
        .unwrap_err();
    assert!(matches!(err, EditError::Parse(_)));

    // Valid JSON with a primitive root fails validation.
    let err = session
        .import_document("\"just a string\"", ImportMode::Replace)
        .unwrap_err();
    assert!(matches!(err, EditError::Validation(_)));

    // Merging an array into an object root fails validation.
    let err = session
        .import_document("[1, 2]", ImportMode::Merge)
        .unwrap_err();
    assert!(matches!(err, EditError::Validation(_)));

    assert_eq!(session.serialize(), "{\n  \"a\": 1\n}");
    assert!(!session.can_undo());
}

#[test]
fn test_clear_document_is_undoable() {
    let mut session = session_from(r#"{"a": 1}"#);

    session.clear_document();
    assert_eq!(session.serialize(), "{}");

    assert!(session.undo());
    assert_eq!(session.serialize(), "{\n  \"a\": 1\n}");
}

#[test]
fn test_history_cap_bounds_undo_depth() {
    let tree = parse_document("{}").unwrap();
    let mut session = EditorSession::with_limit(tree, 3);

    for i in 0..6 {
        session
            .add_key_value(
                &Path::root(),
                &format!("k{}", i),
                JsonValue::Number(JsonNumber::Integer(i)),
            )
            .unwrap();
    }
    let newest = session.serialize();

    // The live state claims one of the three slots when undo begins.
    let mut undos = 0;
    while session.undo() {
        undos += 1;
    }
    assert_eq!(undos, 2);

    // The newest state survived the eviction and is reachable again.
    while session.redo() {}
    assert_eq!(session.serialize(), newest);
}

#[test]
fn test_revision_signal_and_dirty_flag() {
    let mut session = EditorSession::new();
    assert_eq!(session.revision(), 0);
    assert!(!session.is_dirty());

    session.add_object(&Path::root(), Some("a")).unwrap();
    assert_eq!(session.revision(), 1);
    assert!(session.is_dirty());

    // A failed operation does not signal.
    let _ = session.add_object(&Path::root(), Some("a"));
    assert_eq!(session.revision(), 1);

    session.mark_clean();
    assert!(!session.is_dirty());

    // Undo signals too: the renderer must repaint.
    session.undo();
    assert_eq!(session.revision(), 2);
    assert!(session.is_dirty());
}

#[test]
fn test_undo_clears_stale_selection() {
    let mut session = session_from(r#"{"a": 1}"#);

    session
        .add_key_value(&Path::root(), "b", JsonValue::Null)
        .unwrap();
    session.toggle_selection(addr(&[], Segment::key("b")));
    assert_eq!(session.selection().len(), 1);

    session.undo();
    assert!(session.selection().is_empty());
}

#[test]
fn test_current_path_restored_by_undo() {
    let mut session = session_from(r#"{"user": {}}"#);

    session
        .set_current_path(path(&[Segment::key("user")]))
        .unwrap();
    session
        .add_key_value(&path(&[Segment::key("user")]), "name", JsonValue::Null)
        .unwrap();

    session.set_current_path(Path::root()).unwrap();
    session.clear_document();

    // Undoing the clear restores the context that was active before it.
    session.undo();
    assert_eq!(*session.current_path(), Path::root());
    session.undo();
    assert_eq!(*session.current_path(), path(&[Segment::key("user")]));
}

#[test]
fn test_set_current_path_rejects_primitives() {
    let mut session = session_from(r#"{"name": "Ana"}"#);
    let err = session
        .set_current_path(path(&[Segment::key("name")]))
        .unwrap_err();
    assert!(matches!(err, EditError::InvalidPath(_)));
}

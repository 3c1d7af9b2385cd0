use itemshelf_core::{Item, ItemDraft, ItemId, ItemValidationError};

#[test]
fn item_serializes_id_as_string() {
    let item = Item {
        id: "3".parse().unwrap(),
        name: "milk".to_string(),
        description: Some("2L".to_string()),
    };

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"id": "3", "name": "milk", "description": "2L"})
    );

    let decoded: Item = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, item);
}

#[test]
fn item_absent_description_serializes_as_null() {
    let item = Item {
        id: "1".parse().unwrap(),
        name: "bread".to_string(),
        description: None,
    };

    let json = serde_json::to_value(&item).unwrap();
    assert!(json["description"].is_null());
}

#[test]
fn deserialize_rejects_numeric_or_malformed_id() {
    let numeric = serde_json::json!({"id": 3, "name": "milk"});
    assert!(serde_json::from_value::<Item>(numeric).is_err());

    let malformed = serde_json::json!({"id": "abc", "name": "milk"});
    let err = serde_json::from_value::<Item>(malformed).unwrap_err();
    assert!(err.to_string().contains("invalid item id"), "unexpected error: {err}");
}

#[test]
fn deserialize_rejects_blank_name() {
    let value = serde_json::json!({"name": "   ", "description": null});
    let err = serde_json::from_value::<ItemDraft>(value).unwrap_err();
    assert!(
        err.to_string().contains("item name must not be empty"),
        "unexpected error: {err}"
    );
}

#[test]
fn draft_description_defaults_to_none() {
    let draft: ItemDraft = serde_json::from_value(serde_json::json!({"name": "eggs"})).unwrap();
    assert_eq!(draft, ItemDraft::new("eggs", None).unwrap());
}

#[test]
fn to_draft_copies_mutable_fields() {
    let item = Item {
        id: ItemId::from_row_id(9).unwrap(),
        name: "tea".to_string(),
        description: Some("green".to_string()),
    };
    let draft = item.to_draft();
    assert_eq!(draft.name, "tea");
    assert_eq!(draft.description.as_deref(), Some("green"));
    assert_eq!(draft.validate(), Ok(()));
}

#[test]
fn from_row_id_rejects_non_positive_values() {
    assert!(ItemId::from_row_id(0).is_none());
    assert!(ItemId::from_row_id(-4).is_none());
    assert_eq!(
        ItemDraft::new("", None).unwrap_err(),
        ItemValidationError::EmptyName
    );
}

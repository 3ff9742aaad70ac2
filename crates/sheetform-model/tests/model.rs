//! Tests for sheetform-model types.

use sheetform_model::{
    CellValue, FieldSpec, FieldType, PersistedForm, RawSheet, SheetTable, field_key,
};

#[test]
fn field_type_list_is_complete() {
    let names: Vec<&str> = FieldType::ALL.iter().map(FieldType::as_str).collect();
    assert_eq!(
        names,
        vec![
            "text", "number", "textarea", "date", "radio", "checkbox", "select", "switch",
            "upload", "image", "address", "location",
        ]
    );
    assert_eq!(FieldType::default(), FieldType::Text);
}

#[test]
fn sheet_table_iterates_in_insert_order() {
    let mut table = SheetTable::new();
    table.insert(
        "People",
        RawSheet::new(
            vec!["Name".to_string()],
            vec![vec![CellValue::text("Alice")]],
        ),
    );
    table.insert("Empty", RawSheet::default());
    let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["People", "Empty"]);
    assert!(table.contains("Empty"));
    assert!(!table.contains("Missing"));
}

#[test]
fn persisted_form_rejects_unknown_field_type() {
    let json = r#"{
        "id": "1",
        "formInfo": {
            "formName": "x",
            "formGroup": "Ungrouped",
            "createTime": "2024-01-01T00:00:00Z",
            "updateTime": "2024-01-01T00:00:00Z"
        },
        "fields": [{"title": "A", "key": "field_0", "type": "slider", "rules": []}],
        "data": {"headers": ["A"], "rows": []},
        "metadata": {
            "totalRows": 0,
            "selectedColumns": [true],
            "titleRowIndex": 0,
            "importTime": "2024-01-01T00:00:00Z"
        }
    }"#;
    assert!(serde_json::from_str::<PersistedForm>(json).is_err());
}

#[test]
fn field_spec_deserializes_wire_shape() {
    let json = r#"{"title":"Age","key":"field_1","type":"number","rules":[{"required":true,"message":"Age cannot be empty"}]}"#;
    let field: FieldSpec = serde_json::from_str(json).expect("deserialize field");
    assert_eq!(field, FieldSpec::new("Age", field_key(1), FieldType::Number));
}

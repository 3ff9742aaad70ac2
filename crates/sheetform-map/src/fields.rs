//! Field definitions derived from selected columns.

use std::collections::BTreeMap;

use sheetform_model::{ColumnHint, FieldSpec, FieldType, RawSheet, field_key, parse_field_key};

use crate::error::{MappingError, Result};
use crate::selection::SheetSelection;

/// Field type overrides keyed by field key (`field_<column>`).
///
/// Keys without an override resolve to [`FieldType::Text`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTypes {
    overrides: BTreeMap<String, FieldType>,
}

impl FieldTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the type for a field key. The key must name a column of `width`.
    pub fn set(&mut self, key: &str, field_type: FieldType, width: usize) -> Result<()> {
        match parse_field_key(key) {
            Some(column) if column < width => {
                self.overrides.insert(key.to_string(), field_type);
                Ok(())
            }
            _ => Err(MappingError::UnknownField(key.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> FieldType {
        self.overrides.get(key).copied().unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.overrides.clear();
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Proposes `number` for fully numeric columns that have no override yet.
    ///
    /// Returns the keys that were changed.
    pub fn suggest_from_hints(&mut self, hints: &[ColumnHint]) -> Vec<String> {
        let mut changed = Vec::new();
        for (column, hint) in hints.iter().enumerate() {
            let key = field_key(column);
            if hint.is_numeric && !self.overrides.contains_key(&key) {
                self.overrides.insert(key.clone(), FieldType::Number);
                changed.push(key);
            }
        }
        if !changed.is_empty() {
            tracing::debug!(fields = ?changed, "suggested numeric field types");
        }
        changed
    }
}

/// One field per selected column, in column order.
///
/// Keys come from the original column index, so deselecting other columns
/// never changes a field's key.
pub fn derive_fields(
    sheet: &RawSheet,
    selection: &SheetSelection,
    types: &FieldTypes,
) -> Result<Vec<FieldSpec>> {
    selection.check_width(sheet)?;
    Ok(selection
        .selected_indices()
        .into_iter()
        .map(|column| {
            let key = field_key(column);
            let field_type = types.get(&key);
            FieldSpec::new(sheet.headers[column].clone(), key, field_type)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> RawSheet {
        RawSheet::new(vec!["Name".into(), "Age".into(), "City".into()], Vec::new())
    }

    #[test]
    fn test_fields_follow_selection() {
        let sheet = sheet();
        let mut selection = SheetSelection::for_sheet(&sheet);
        selection.toggle(1).unwrap();
        let mut types = FieldTypes::new();
        types.set("field_2", FieldType::Select, 3).unwrap();

        let fields = derive_fields(&sheet, &selection, &types).unwrap();
        let keys: Vec<_> = fields.iter().map(|field| field.key.as_str()).collect();
        assert_eq!(keys, vec!["field_0", "field_2"]);
        assert_eq!(fields[0].field_type, FieldType::Text);
        assert_eq!(fields[1].field_type, FieldType::Select);
        assert_eq!(fields[1].rules[0].message, "City cannot be empty");
        assert!(fields[1].rules[0].required);
    }

    #[test]
    fn test_set_rejects_unknown_keys() {
        let mut types = FieldTypes::new();
        assert_eq!(
            types.set("field_3", FieldType::Date, 3),
            Err(MappingError::UnknownField("field_3".into()))
        );
        assert!(types.set("age", FieldType::Date, 3).is_err());
        assert!(types.is_empty());
    }

    #[test]
    fn test_suggestions_keep_overrides() {
        let hint = |is_numeric| ColumnHint {
            is_numeric,
            unique_ratio: 1.0,
            null_ratio: 0.0,
        };
        let mut types = FieldTypes::new();
        types.set("field_0", FieldType::Textarea, 3).unwrap();

        let changed = types.suggest_from_hints(&[hint(true), hint(true), hint(false)]);
        assert_eq!(changed, vec!["field_1"]);
        assert_eq!(types.get("field_0"), FieldType::Textarea);
        assert_eq!(types.get("field_1"), FieldType::Number);
        assert_eq!(types.get("field_2"), FieldType::Text);
    }
}

//! Form field definitions.
//!
//! A [`FieldSpec`] is derived from one selected sheet column. Its `key` is
//! tied to the column's position in the original header row, so it stays
//! the same however many other columns are deselected or renamed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

const FIELD_KEY_PREFIX: &str = "field_";

/// Stable field key for an original column index.
pub fn field_key(column: usize) -> String {
    format!("{FIELD_KEY_PREFIX}{column}")
}

/// Recovers the original column index from a field key.
pub fn parse_field_key(key: &str) -> Option<usize> {
    key.strip_prefix(FIELD_KEY_PREFIX)?.parse().ok()
}

/// The kind of input a form field renders as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Single-line text input.
    #[default]
    Text,
    Number,
    /// Multi-line text area.
    Textarea,
    /// Date and time picker.
    Date,
    Radio,
    Checkbox,
    Select,
    /// Yes/no toggle.
    Switch,
    /// File attachment.
    Upload,
    Image,
    Address,
    Location,
}

impl FieldType {
    /// Every field type, in picker order.
    pub const ALL: [Self; 12] = [
        Self::Text,
        Self::Number,
        Self::Textarea,
        Self::Date,
        Self::Radio,
        Self::Checkbox,
        Self::Select,
        Self::Switch,
        Self::Upload,
        Self::Image,
        Self::Address,
        Self::Location,
    ];

    /// Wire name as stored in persisted forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Textarea => "textarea",
            Self::Date => "date",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Select => "select",
            Self::Switch => "switch",
            Self::Upload => "upload",
            Self::Image => "image",
            Self::Address => "address",
            Self::Location => "location",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "Single-line text",
            Self::Number => "Number",
            Self::Textarea => "Multi-line text",
            Self::Date => "Date/time",
            Self::Radio => "Radio group",
            Self::Checkbox => "Checkbox group",
            Self::Select => "Dropdown",
            Self::Switch => "Yes/No",
            Self::Upload => "Attachment",
            Self::Image => "Image",
            Self::Address => "Address",
            Self::Location => "Location",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownFieldType(s.to_string()))
    }
}

/// Validation rule attached to a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    pub required: bool,
    pub message: String,
}

impl FieldRule {
    pub fn required_for(title: &str) -> Self {
        Self {
            required: true,
            message: format!("{title} cannot be empty"),
        }
    }
}

/// Saved definition of one form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub title: String,
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub rules: Vec<FieldRule>,
}

impl FieldSpec {
    /// Creates a field with the single required rule every imported field carries.
    pub fn new(title: impl Into<String>, key: impl Into<String>, field_type: FieldType) -> Self {
        let title = title.into();
        let rules = vec![FieldRule::required_for(&title)];
        Self {
            title,
            key: key.into(),
            field_type,
            rules,
        }
    }

    /// Renames the field and regenerates rule messages for the new title.
    pub fn retitle(&mut self, title: impl Into<String>) {
        self.title = title.into();
        for rule in &mut self.rules {
            if rule.required {
                rule.message = FieldRule::required_for(&self.title).message;
            }
        }
    }

    /// Original column index encoded in the key.
    pub fn column_index(&self) -> Option<usize> {
        parse_field_key(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_type_round_trips_wire_names() {
        for kind in FieldType::ALL {
            assert_eq!(kind.as_str().parse::<FieldType>(), Ok(kind));
        }
        assert_eq!(" Number ".parse::<FieldType>(), Ok(FieldType::Number));
        assert!(matches!(
            "slider".parse::<FieldType>(),
            Err(ModelError::UnknownFieldType(_))
        ));
    }

    #[test]
    fn field_key_encodes_column() {
        assert_eq!(field_key(3), "field_3");
        assert_eq!(parse_field_key("field_12"), Some(12));
        assert_eq!(parse_field_key("column_1"), None);
        assert_eq!(parse_field_key("field_x"), None);
    }

    #[test]
    fn new_field_is_required() {
        let field = FieldSpec::new("Age", field_key(1), FieldType::Number);
        assert_eq!(field.rules.len(), 1);
        assert!(field.rules[0].required);
        assert_eq!(field.rules[0].message, "Age cannot be empty");
        assert_eq!(field.column_index(), Some(1));
    }

    #[test]
    fn retitle_updates_message() {
        let mut field = FieldSpec::new("Age", field_key(1), FieldType::Text);
        field.retitle("Years");
        assert_eq!(field.title, "Years");
        assert_eq!(field.rules[0].message, "Years cannot be empty");
    }

    #[test]
    fn serializes_type_under_wire_name() {
        let field = FieldSpec::new("Name", field_key(0), FieldType::Textarea);
        let json = serde_json::to_value(&field).expect("serialize field");
        assert_eq!(json["type"], "textarea");
        assert_eq!(json["key"], "field_0");
    }
}

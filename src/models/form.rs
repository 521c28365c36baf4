use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TYPE_ATTACHMENT: &str = "attachment";

/// Types whose values are stored as a list of strings.
pub const ARRAY_TYPES: [&str; 3] = ["checkboxMultiple", "dropdownMultiple", TYPE_ATTACHMENT];

/// Presentation-only types. They never carry submitted data.
pub const HIDDEN_TYPES: [&str; 5] = ["spacer", "headline", "freeText", "recaptcha", "hidden"];

pub fn is_hidden_type(field_type: &str) -> bool {
    HIDDEN_TYPES.contains(&field_type)
}

pub fn is_array_type(field_type: &str) -> bool {
    ARRAY_TYPES.contains(&field_type)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub titles: HashMap<String, String>,
}

impl FormField {
    pub fn new(key: &str, field_type: &str) -> Self {
        Self {
            key: key.to_string(),
            field_type: field_type.to_string(),
            required: false,
            titles: HashMap::new(),
        }
    }

    pub fn is_hidden(&self) -> bool {
        is_hidden_type(&self.field_type)
    }

    /// Title in `locale`, falling back to `fallback` and then to the key.
    pub fn title(&self, locale: &str, fallback: &str) -> &str {
        self.titles
            .get(locale)
            .or_else(|| self.titles.get(fallback))
            .map(String::as_str)
            .unwrap_or(self.key.as_str())
    }
}

/// The schema a submission is interpreted against. Field order is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    pub id: Uuid,
    pub default_locale: String,
    pub titles: HashMap<String, String>,
    pub fields: Vec<FormField>,
    pub created_at: DateTime<Utc>,
}

impl FormSchema {
    pub fn fields_by_type<'a>(&'a self, field_type: &'a str) -> impl Iterator<Item = &'a FormField> {
        self.fields.iter().filter(move |f| f.field_type == field_type)
    }

    pub fn field_type(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.field_type.as_str())
    }

    pub fn title(&self, locale: &str) -> Option<&str> {
        self.titles
            .get(locale)
            .or_else(|| self.titles.get(&self.default_locale))
            .map(String::as_str)
    }
}

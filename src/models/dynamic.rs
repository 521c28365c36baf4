use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::form::FormSchema;

/// A single submitted value. Multi-value fields (checkboxes, attachments) are lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::List(items) => Some(items),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

/// Submitted answers keyed by field key, in insertion order. A `None` value is a stored null.
pub type FieldBag = IndexMap<String, Option<FieldValue>>;

#[derive(Debug)]
pub struct FieldDataError(pub serde_json::Error);

impl std::fmt::Display for FieldDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Malformed field data: {}", self.0)
    }
}

impl std::error::Error for FieldDataError {}

/// Decode the stored blob. Absent or empty text is an empty bag, and so is
/// `[]`, which older writers stored for an empty mapping.
pub fn decode_fields(raw: Option<&str>) -> Result<FieldBag, FieldDataError> {
    match raw.map(str::trim) {
        None | Some("") | Some("[]") => Ok(FieldBag::new()),
        Some(text) => serde_json::from_str(text).map_err(FieldDataError),
    }
}

/// Encode for storage. Non-ASCII characters are written as-is.
pub fn encode_fields(fields: &FieldBag) -> Result<String, FieldDataError> {
    serde_json::to_string(fields).map_err(FieldDataError)
}

/// Project `fields` through `schema`, in schema order. Keys missing from the bag map to null.
pub fn project_fields(schema: Option<&FormSchema>, fields: &FieldBag, hide_hidden: bool) -> FieldBag {
    let Some(schema) = schema else {
        return FieldBag::new();
    };

    schema
        .fields
        .iter()
        .filter(|f| !(hide_hidden && f.is_hidden()))
        .map(|f| (f.key.clone(), lookup(fields, &f.key).cloned()))
        .collect()
}

/// Project only the schema fields declared with `field_type`.
pub fn project_fields_by_type(schema: Option<&FormSchema>, fields: &FieldBag, field_type: &str) -> FieldBag {
    let Some(schema) = schema else {
        return FieldBag::new();
    };

    schema
        .fields_by_type(field_type)
        .map(|f| (f.key.clone(), lookup(fields, &f.key).cloned()))
        .collect()
}

fn lookup<'a>(fields: &'a FieldBag, key: &str) -> Option<&'a FieldValue> {
    fields.get(key).and_then(Option::as_ref)
}

/// One stored form submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub type_id: String,
    pub type_name: Option<String>,
    pub locale: String,
    pub webspace_key: Option<String>,
    pub form_id: Option<Uuid>,
    pub fields: FieldBag,
    pub created: DateTime<Utc>,
    pub changed: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        lookup(&self.fields, key)
    }

    pub fn set_field(&mut self, key: &str, value: Option<FieldValue>) -> &mut Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn fields(&self, schema: Option<&FormSchema>, hide_hidden: bool) -> FieldBag {
        project_fields(schema, &self.fields, hide_hidden)
    }

    pub fn fields_by_type(&self, schema: Option<&FormSchema>, field_type: &str) -> FieldBag {
        project_fields_by_type(schema, &self.fields, field_type)
    }

    pub fn field_type<'a>(&self, schema: Option<&'a FormSchema>, key: &str) -> Option<&'a str> {
        schema.and_then(|s| s.field_type(key))
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(FieldValue::as_text)
    }

    pub fn salutation(&self) -> Option<&str> {
        self.text("salutation")
    }

    pub fn title(&self) -> Option<&str> {
        self.text("title")
    }

    pub fn first_name(&self) -> Option<&str> {
        self.text("firstName")
    }

    pub fn last_name(&self) -> Option<&str> {
        self.text("lastName")
    }

    pub fn email(&self) -> Option<&str> {
        self.text("email")
    }

    pub fn phone(&self) -> Option<&str> {
        self.text("phone")
    }

    pub fn fax(&self) -> Option<&str> {
        self.text("fax")
    }

    pub fn street(&self) -> Option<&str> {
        self.text("street")
    }

    pub fn zip(&self) -> Option<&str> {
        self.text("zip")
    }

    pub fn city(&self) -> Option<&str> {
        self.text("city")
    }

    pub fn state(&self) -> Option<&str> {
        self.text("state")
    }

    pub fn country(&self) -> Option<&str> {
        self.text("country")
    }

    pub fn function(&self) -> Option<&str> {
        self.text("function")
    }

    pub fn company(&self) -> Option<&str> {
        self.text("company")
    }

    pub fn text_field(&self) -> Option<&str> {
        self.text("text")
    }

    pub fn textarea(&self) -> Option<&str> {
        self.text("textarea")
    }

    /// Reads the `data` key, not `date`. Stored submissions depend on this key.
    pub fn date(&self) -> Option<&str> {
        self.text("data")
    }

    pub fn attachment(&self) -> Option<&[String]> {
        self.field("attachment").and_then(FieldValue::as_list)
    }

    pub fn checkbox(&self) -> Option<&str> {
        self.text("checkbox")
    }

    pub fn checkbox_multiple(&self) -> Option<&[String]> {
        self.field("checkboxMultiple").and_then(FieldValue::as_list)
    }

    pub fn dropdown(&self) -> Option<&str> {
        self.text("dropdown")
    }

    pub fn dropdown_multiple(&self) -> Option<&[String]> {
        self.field("dropdownMultiple").and_then(FieldValue::as_list)
    }

    pub fn radio_buttons(&self) -> Option<&str> {
        self.text("radioButtons")
    }
}

/// Values needed to store a new submission.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub kind: String,
    pub type_id: String,
    pub type_name: Option<String>,
    pub locale: String,
    pub webspace_key: Option<String>,
    pub form_id: Option<Uuid>,
    pub fields: FieldBag,
}

impl NewSubmission {
    pub fn new(kind: &str, type_id: &str, locale: &str, form_id: Option<Uuid>) -> Self {
        Self {
            kind: kind.to_string(),
            type_id: type_id.to_string(),
            type_name: None,
            locale: locale.to_string(),
            webspace_key: None,
            form_id,
            fields: FieldBag::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.to_string(), Some(value.into()));
        self
    }

    pub fn with_webspace(mut self, webspace_key: &str) -> Self {
        self.webspace_key = Some(webspace_key.to_string());
        self
    }
}

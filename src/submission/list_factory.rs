use std::collections::HashMap;

use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::models::{FieldBag, FieldValue, FormSchema, SubmissionRecord};

/// How list entries are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Multi-values joined for display, localized form title added.
    Default,
    /// Values exactly as stored.
    Raw,
}

impl View {
    pub fn parse(s: &str) -> Self {
        match s {
            "raw" => View::Raw,
            _ => View::Default,
        }
    }
}

/// Render records for the listing. `schemas` holds the forms referenced by `records`.
pub fn build(
    records: &[SubmissionRecord],
    schemas: &HashMap<Uuid, FormSchema>,
    locale: &str,
    view: View,
) -> Vec<Value> {
    records
        .iter()
        .map(|record| {
            let schema = record.form_id.and_then(|id| schemas.get(&id));
            build_entry(record, schema, locale, view)
        })
        .collect()
}

fn build_entry(record: &SubmissionRecord, schema: Option<&FormSchema>, locale: &str, view: View) -> Value {
    let mut entry = Map::new();
    entry.insert("id".into(), json!(record.id));
    entry.insert("type".into(), json!(record.kind));
    entry.insert("typeId".into(), json!(record.type_id));
    entry.insert("typeName".into(), json!(record.type_name));
    entry.insert("locale".into(), json!(record.locale));
    entry.insert("webspaceKey".into(), json!(record.webspace_key));
    entry.insert("form".into(), json!(record.form_id));
    entry.insert("created".into(), json!(record.created));
    entry.insert("changed".into(), json!(record.changed));

    if view == View::Default {
        entry.insert("formTitle".into(), json!(schema.and_then(|s| s.title(locale))));
    }

    // Without a schema there is nothing to order or hide by.
    let fields = match schema {
        Some(_) => record.fields(schema, true),
        None => record.fields.clone(),
    };
    entry.insert("fields".into(), render_fields(&fields, view));

    Value::Object(entry)
}

fn render_fields(fields: &FieldBag, view: View) -> Value {
    let rendered = fields
        .iter()
        .map(|(key, value)| {
            let value = match (view, value) {
                (_, None) => Value::Null,
                (View::Default, Some(FieldValue::List(items))) => json!(items.join(", ")),
                (_, Some(value)) => json!(value),
            };
            (key.clone(), value)
        })
        .collect::<Map<_, _>>();
    Value::Object(rendered)
}

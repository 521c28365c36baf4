use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::db::{DynamicRepository, FormRepository};
use crate::error::AppError;
use crate::media::{MediaError, MediaManager};
use crate::models::form::{self, TYPE_ATTACHMENT};
use crate::models::{FieldValue, FormSchema, SubmissionRecord};

use super::filters::{Filters, Sort};
use super::list_factory::{self, View};

#[derive(Debug, Clone)]
pub struct ListRequest {
    pub filters: Filters,
    pub sort: Sort,
    pub page: i64,
    pub limit: i64,
    pub view: View,
    pub locale: String,
}

impl ListRequest {
    /// Row offset of the requested page. Pages too large to address are rejected.
    pub fn offset(&self) -> Result<i64, AppError> {
        self.page
            .checked_sub(1)
            .and_then(|p| p.checked_mul(self.limit))
            .filter(|offset| *offset >= 0)
            .ok_or_else(|| AppError::BadRequest("Invalid page".to_string()))
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedList {
    pub items: Vec<serde_json::Value>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
}

pub async fn list(
    dynamics: &dyn DynamicRepository,
    forms: &dyn FormRepository,
    req: &ListRequest,
) -> Result<PaginatedList, AppError> {
    let offset = req.offset()?;
    let records = dynamics
        .find_by_filters(&req.filters, req.sort, req.limit, offset)
        .await?;

    let schemas = load_schemas(forms, &records).await?;
    let items = list_factory::build(&records, &schemas, &req.locale, req.view);
    let returned = items.len() as i64;

    // A page that is not full is the last one, so the total is known without counting.
    // An empty page past the first one says nothing about the total.
    let total = if returned == req.limit || (returned == 0 && offset > 0) {
        dynamics.count_by_filters(&req.filters).await?
    } else {
        returned + offset
    };

    let pages = if req.limit > 0 {
        (total + req.limit - 1) / req.limit
    } else {
        0
    };

    Ok(PaginatedList {
        items,
        total,
        page: req.page,
        limit: req.limit,
        pages,
    })
}

async fn load_schemas(
    forms: &dyn FormRepository,
    records: &[SubmissionRecord],
) -> Result<HashMap<Uuid, FormSchema>, AppError> {
    let mut schemas = HashMap::new();
    for form_id in records.iter().filter_map(|r| r.form_id) {
        if schemas.contains_key(&form_id) {
            continue;
        }
        match forms.load_by_id(form_id).await? {
            Some(schema) => {
                schemas.insert(form_id, schema);
            }
            None => tracing::warn!("Form {form_id} referenced by a form entry does not exist"),
        }
    }
    Ok(schemas)
}

/// Media ids held by the record's attachment fields, in schema order.
pub fn attachment_ids(record: &SubmissionRecord, schema: Option<&FormSchema>) -> Vec<String> {
    record
        .fields_by_type(schema, TYPE_ATTACHMENT)
        .into_values()
        .flatten()
        .flat_map(|value| match value {
            FieldValue::Text(id) => vec![id],
            FieldValue::List(ids) => ids,
        })
        .filter(|id| !id.is_empty())
        .collect()
}

/// Delete a form entry and the media uploaded with it.
pub async fn delete(
    dynamics: &dyn DynamicRepository,
    forms: &dyn FormRepository,
    media: &dyn MediaManager,
    id: Uuid,
) -> Result<(), AppError> {
    let record = dynamics
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Form entry not found".to_string()))?;

    let schema = match record.form_id {
        Some(form_id) => forms.load_by_id(form_id).await?,
        None => None,
    };

    for media_id in attachment_ids(&record, schema.as_ref()) {
        match media.delete(&media_id).await {
            Ok(()) => {}
            Err(MediaError::NotFound(_)) => {
                tracing::debug!("Media {media_id} of form entry {id} was already removed");
            }
            Err(e) => return Err(e.into()),
        }
    }

    dynamics.remove(id).await?;
    tracing::info!("Deleted form entry {id}");

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub title: String,
    pub required: bool,
}

/// Load the form named by the `form` parameter. The parameter is mandatory.
pub async fn load_form(forms: &dyn FormRepository, form: Option<&str>) -> Result<FormSchema, AppError> {
    let form_id = form
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<Uuid>().ok())
        .ok_or_else(|| AppError::BadRequest("\"form\" is required parameter".to_string()))?;

    forms
        .load_by_id(form_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Form not found".to_string()))
}

/// Data-bearing columns of a form, titled in `locale`.
pub fn field_descriptors(schema: &FormSchema, locale: &str) -> Vec<FieldDescriptor> {
    schema
        .fields
        .iter()
        .filter(|f| !form::is_hidden_type(&f.field_type))
        .map(|f| FieldDescriptor {
            key: f.key.clone(),
            field_type: f.field_type.clone(),
            title: f.title(locale, &schema.default_locale).to_string(),
            required: f.required,
        })
        .collect()
}

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;

/// Query parameters of the listing endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub view: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub type_id: Option<String>,
    pub webspace_key: Option<String>,
    pub form: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub search: Option<String>,
    pub fields: Option<String>,
    pub locale: Option<String>,
}

/// Storage filters. `None`/empty means "not filtered".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub kind: Option<String>,
    pub type_id: Option<String>,
    pub webspace_key: Option<String>,
    pub form_id: Option<Uuid>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub search: Option<String>,
    pub search_fields: Vec<String>,
}

impl Filters {
    pub fn from_query(query: &ListQuery) -> Result<Self, AppError> {
        let form_id = non_empty(query.form.as_deref())
            .map(|s| {
                s.parse::<Uuid>()
                    .map_err(|_| AppError::BadRequest(format!("Invalid form id: {s}")))
            })
            .transpose()?;

        let mut search_fields: Vec<String> = Vec::new();
        for field in query.fields.as_deref().unwrap_or("").split(',') {
            let field = field.trim();
            if !field.is_empty() && !search_fields.iter().any(|f| f == field) {
                search_fields.push(field.to_string());
            }
        }

        Ok(Filters {
            kind: non_empty(query.kind.as_deref()).map(str::to_string),
            type_id: non_empty(query.type_id.as_deref()).map(str::to_string),
            webspace_key: non_empty(query.webspace_key.as_deref()).map(str::to_string),
            form_id,
            from_date: parse_date("fromDate", query.from_date.as_deref())?,
            to_date: parse_date("toDate", query.to_date.as_deref())?,
            search: non_empty(query.search.as_deref()).map(str::to_string),
            search_fields,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    non_empty(value)
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| AppError::BadRequest(format!("Invalid {name}: expected YYYY-MM-DD")))
        })
        .transpose()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Created,
    Changed,
    Id,
    Type,
    TypeId,
    Locale,
    WebspaceKey,
}

impl SortColumn {
    /// Unknown names sort by creation date.
    pub fn parse(s: &str) -> Self {
        match s {
            "changed" => SortColumn::Changed,
            "id" => SortColumn::Id,
            "type" => SortColumn::Type,
            "typeId" => SortColumn::TypeId,
            "locale" => SortColumn::Locale,
            "webspaceKey" => SortColumn::WebspaceKey,
            _ => SortColumn::Created,
        }
    }

    pub fn column_name(&self) -> &'static str {
        match self {
            SortColumn::Created => "created",
            SortColumn::Changed => "changed",
            SortColumn::Id => "id",
            SortColumn::Type => "type",
            SortColumn::TypeId => "type_id",
            SortColumn::Locale => "locale",
            SortColumn::WebspaceKey => "webspace_key",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: SortColumn,
    pub order: SortOrder,
}

impl Sort {
    pub fn from_query(query: &ListQuery) -> Self {
        Sort {
            column: SortColumn::parse(query.sort_by.as_deref().unwrap_or("created")),
            order: SortOrder::parse(query.sort_order.as_deref().unwrap_or("asc")),
        }
    }
}

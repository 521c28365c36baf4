use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::ApiAccess;
use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::filters::{Filters, ListQuery, Sort};
use crate::submission::list_factory::View;
use crate::submission::service::{self, FieldDescriptor, ListRequest, PaginatedList};

#[derive(Deserialize)]
pub struct FieldsQuery {
    pub form: Option<String>,
    pub locale: Option<String>,
}

pub async fn list(
    _access: ApiAccess,
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<PaginatedList>, AppError> {
    let filters = Filters::from_query(&query)?;

    let req = ListRequest {
        filters,
        sort: Sort::from_query(&query),
        page: query.page.unwrap_or(1).max(1),
        limit: state.config.page_limit(query.limit),
        view: View::parse(query.view.as_deref().unwrap_or("default")),
        locale: resolve_locale(query.locale.as_deref(), &headers, &state.config.default_locale),
    };

    let page = service::list(state.dynamics.as_ref(), state.forms.as_ref(), &req).await?;
    Ok(Json(page))
}

pub async fn delete(
    _access: ApiAccess,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service::delete(
        state.dynamics.as_ref(),
        state.forms.as_ref(),
        state.media.as_ref(),
        id,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn fields(
    _access: ApiAccess,
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<FieldsQuery>,
) -> Result<Json<Vec<FieldDescriptor>>, AppError> {
    let schema = service::load_form(state.forms.as_ref(), query.form.as_deref()).await?;
    let locale = resolve_locale(query.locale.as_deref(), &headers, &state.config.default_locale);

    Ok(Json(service::field_descriptors(&schema, &locale)))
}

/// `locale` parameter, then the first `Accept-Language` tag, then the default.
fn resolve_locale(param: Option<&str>, headers: &HeaderMap, default: &str) -> String {
    if let Some(locale) = param.map(str::trim).filter(|s| !s.is_empty()) {
        return locale.to_string();
    }

    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|tag| tag.split(';').next())
        .map(str::trim)
        .filter(|tag| !tag.is_empty() && *tag != "*")
        .unwrap_or(default)
        .to_string()
}

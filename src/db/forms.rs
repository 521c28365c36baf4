use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::{FormField, FormSchema};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FormRow {
    pub id: Uuid,
    pub default_locale: String,
    pub titles: Json<HashMap<String, String>>,
    pub fields: Json<Vec<FormField>>,
    pub created_at: DateTime<Utc>,
}

impl From<FormRow> for FormSchema {
    fn from(row: FormRow) -> Self {
        FormSchema {
            id: row.id,
            default_locale: row.default_locale,
            titles: row.titles.0,
            fields: row.fields.0,
            created_at: row.created_at,
        }
    }
}

pub async fn create(
    pool: &PgPool,
    default_locale: &str,
    titles: &HashMap<String, String>,
    fields: &[FormField],
) -> Result<FormSchema, sqlx::Error> {
    let row = sqlx::query_as::<_, FormRow>(
        "INSERT INTO forms (id, default_locale, titles, fields)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(default_locale)
    .bind(Json(titles))
    .bind(Json(fields))
    .fetch_one(pool)
    .await?;
    Ok(row.into())
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<FormSchema>, sqlx::Error> {
    let row = sqlx::query_as::<_, FormRow>("SELECT * FROM forms WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(FormSchema::from))
}

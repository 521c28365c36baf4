use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::dynamic::{self, FieldDataError};
use crate::models::{FieldBag, NewSubmission, SubmissionRecord};
use crate::submission::filters::{Filters, Sort};

/// Raw `dynamics` row. `data` is the encoded field bag.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DynamicRow {
    pub id: Uuid,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub type_id: String,
    pub type_name: Option<String>,
    pub locale: String,
    pub webspace_key: Option<String>,
    pub form_id: Option<Uuid>,
    pub data: Option<String>,
    pub created: DateTime<Utc>,
    pub changed: DateTime<Utc>,
}

impl TryFrom<DynamicRow> for SubmissionRecord {
    type Error = FieldDataError;

    fn try_from(row: DynamicRow) -> Result<Self, Self::Error> {
        Ok(SubmissionRecord {
            fields: dynamic::decode_fields(row.data.as_deref())?,
            id: row.id,
            kind: row.kind,
            type_id: row.type_id,
            type_name: row.type_name,
            locale: row.locale,
            webspace_key: row.webspace_key,
            form_id: row.form_id,
            created: row.created,
            changed: row.changed,
        })
    }
}

pub async fn create(pool: &PgPool, new: &NewSubmission) -> Result<DynamicRow, sqlx::Error> {
    let data = encode(&new.fields)?;
    sqlx::query_as::<_, DynamicRow>(
        "INSERT INTO dynamics (id, type, type_id, type_name, locale, webspace_key, form_id, data)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&new.kind)
    .bind(&new.type_id)
    .bind(&new.type_name)
    .bind(&new.locale)
    .bind(&new.webspace_key)
    .bind(new.form_id)
    .bind(data)
    .fetch_one(pool)
    .await
}

/// Write back the field bag of an existing record.
pub async fn update_fields(pool: &PgPool, record: &SubmissionRecord) -> Result<(), sqlx::Error> {
    let data = encode(&record.fields)?;
    sqlx::query("UPDATE dynamics SET data = $2, changed = now() WHERE id = $1")
        .bind(record.id)
        .bind(data)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<DynamicRow>, sqlx::Error> {
    sqlx::query_as::<_, DynamicRow>("SELECT * FROM dynamics WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list(
    pool: &PgPool,
    filters: &Filters,
    sort: Sort,
    limit: i64,
    offset: i64,
) -> Result<Vec<DynamicRow>, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM dynamics");
    push_filters(&mut qb, filters);

    let order = sort.order.as_sql();
    qb.push(format!(
        " ORDER BY {} {order}, id {order}",
        sort.column.column_name()
    ));
    qb.push(" LIMIT ").push_bind(limit);
    qb.push(" OFFSET ").push_bind(offset);

    qb.build_query_as::<DynamicRow>().fetch_all(pool).await
}

pub async fn count(pool: &PgPool, filters: &Filters) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM dynamics");
    push_filters(&mut qb, filters);

    let row = qb.build_query_as::<(i64,)>().fetch_one(pool).await?;
    Ok(row.0)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM dynamics WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &Filters) {
    qb.push(" WHERE TRUE");

    if let Some(kind) = &filters.kind {
        qb.push(" AND type = ").push_bind(kind.clone());
    }
    if let Some(type_id) = &filters.type_id {
        qb.push(" AND type_id = ").push_bind(type_id.clone());
    }
    if let Some(webspace_key) = &filters.webspace_key {
        qb.push(" AND webspace_key = ").push_bind(webspace_key.clone());
    }
    if let Some(form_id) = filters.form_id {
        qb.push(" AND form_id = ").push_bind(form_id);
    }
    if let Some(from) = filters.from_date {
        qb.push(" AND created >= ").push_bind(start_of_day(from));
    }
    if let Some(to) = filters.to_date {
        // Inclusive: everything before the start of the next day.
        qb.push(" AND created < ")
            .push_bind(start_of_day(to) + Duration::days(1));
    }
    if let Some(search) = &filters.search {
        let pattern = format!("%{search}%");
        if filters.search_fields.is_empty() {
            qb.push(" AND data ILIKE ").push_bind(pattern);
        } else {
            qb.push(" AND (");
            for (i, field) in filters.search_fields.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                // Rows whose data is not valid JSON never match a field search.
                qb.push("(try_jsonb(data) ->> ")
                    .push_bind(field.clone())
                    .push(") ILIKE ")
                    .push_bind(pattern.clone());
            }
            qb.push(")");
        }
    }
}

fn encode(fields: &FieldBag) -> Result<String, sqlx::Error> {
    dynamic::encode_fields(fields).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

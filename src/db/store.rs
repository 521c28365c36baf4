use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{DynamicRepository, FormRepository, dynamics, forms};
use crate::error::AppError;
use crate::models::{FormSchema, SubmissionRecord};
use crate::submission::filters::{Filters, Sort};

/// PostgreSQL-backed repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DynamicRepository for PgStore {
    async fn find_by_filters(
        &self,
        filters: &Filters,
        sort: Sort,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SubmissionRecord>, AppError> {
        let rows = dynamics::list(&self.pool, filters, sort, limit, offset).await?;
        let records = rows
            .into_iter()
            .map(SubmissionRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    async fn count_by_filters(&self, filters: &Filters) -> Result<i64, AppError> {
        Ok(dynamics::count(&self.pool, filters).await?)
    }

    async fn find(&self, id: Uuid) -> Result<Option<SubmissionRecord>, AppError> {
        let record = dynamics::find_by_id(&self.pool, id)
            .await?
            .map(SubmissionRecord::try_from)
            .transpose()?;
        Ok(record)
    }

    async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let deleted = dynamics::delete(&self.pool, id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Form entry not found".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl FormRepository for PgStore {
    async fn load_by_id(&self, id: Uuid) -> Result<Option<FormSchema>, AppError> {
        Ok(forms::find_by_id(&self.pool, id).await?)
    }
}

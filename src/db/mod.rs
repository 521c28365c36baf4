pub mod dynamics;
pub mod forms;
pub mod store;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{FormSchema, SubmissionRecord};
use crate::submission::filters::{Filters, Sort};

pub use store::PgStore;

#[async_trait]
pub trait DynamicRepository: Send + Sync {
    async fn find_by_filters(
        &self,
        filters: &Filters,
        sort: Sort,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SubmissionRecord>, AppError>;

    async fn count_by_filters(&self, filters: &Filters) -> Result<i64, AppError>;

    async fn find(&self, id: Uuid) -> Result<Option<SubmissionRecord>, AppError>;

    async fn remove(&self, id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait FormRepository: Send + Sync {
    async fn load_by_id(&self, id: Uuid) -> Result<Option<FormSchema>, AppError>;
}

use std::sync::Arc;

use crate::config::Config;
use crate::db::{DynamicRepository, FormRepository};
use crate::media::MediaManager;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub dynamics: Arc<dyn DynamicRepository>,
    pub forms: Arc<dyn FormRepository>,
    pub media: Arc<dyn MediaManager>,
}

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use formdesk::config::Config;
use formdesk::db::{DynamicRepository, FormRepository, PgStore};
use formdesk::error::AppError;
use formdesk::media::{MediaError, MediaManager};
use formdesk::models::dynamic::encode_fields;
use formdesk::models::{FieldBag, FieldValue, FormField, FormSchema, SubmissionRecord};
use formdesk::state::AppState;
use formdesk::submission::filters::{Filters, Sort, SortColumn, SortOrder};

// ── Fixtures ────────────────────────────────────────────────────

pub fn contact_schema() -> FormSchema {
    let mut email = FormField::new("email", "email");
    email.required = true;
    email.titles.insert("en".into(), "E-Mail".into());
    email.titles.insert("de".into(), "E-Mail-Adresse".into());

    FormSchema {
        id: Uuid::now_v7(),
        default_locale: "en".into(),
        titles: HashMap::from([
            ("en".to_string(), "Contact".to_string()),
            ("de".to_string(), "Kontakt".to_string()),
        ]),
        fields: vec![
            FormField::new("headline", "headline"),
            FormField::new("firstName", "firstName"),
            email,
            FormField::new("interests", "checkboxMultiple"),
            FormField::new("files", "attachment"),
            FormField::new("cv", "attachment"),
            FormField::new("captcha", "recaptcha"),
        ],
        created_at: Utc::now(),
    }
}

pub fn record(form_id: Option<Uuid>, fields: FieldBag) -> SubmissionRecord {
    let now = Utc::now();
    SubmissionRecord {
        id: Uuid::now_v7(),
        kind: "contact".into(),
        type_id: "page-1".into(),
        type_name: None,
        locale: "en".into(),
        webspace_key: Some("example".into()),
        form_id,
        fields,
        created: now,
        changed: now,
    }
}

pub fn bag(entries: &[(&str, Option<FieldValue>)]) -> FieldBag {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

pub fn text(s: &str) -> Option<FieldValue> {
    Some(FieldValue::Text(s.to_string()))
}

pub fn list(items: &[&str]) -> Option<FieldValue> {
    Some(FieldValue::List(items.iter().map(|s| s.to_string()).collect()))
}

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        log_level: "warn".to_string(),
        default_locale: "en".to_string(),
        default_limit: 20,
        max_limit: 100,
        media_url: "http://media.invalid".to_string(),
        media_timeout: Duration::from_secs(1),
        api_token: None,
    }
}

// ── In-memory repository ────────────────────────────────────────

/// Repository fake that counts the calls made against it.
#[derive(Default)]
pub struct MemoryStore {
    pub records: Mutex<Vec<SubmissionRecord>>,
    pub forms: Mutex<HashMap<Uuid, FormSchema>>,
    pub find_by_filters_calls: AtomicUsize,
    pub count_calls: AtomicUsize,
    pub find_calls: AtomicUsize,
    pub remove_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_form(&self, schema: FormSchema) {
        self.forms.lock().unwrap().insert(schema.id, schema);
    }

    pub fn add(&self, record: SubmissionRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn counts(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    fn matching(&self, filters: &Filters) -> Vec<SubmissionRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| matches(r, filters))
            .cloned()
            .collect()
    }
}

fn matches(r: &SubmissionRecord, f: &Filters) -> bool {
    if f.kind.as_ref().is_some_and(|k| &r.kind != k) {
        return false;
    }
    if f.type_id.as_ref().is_some_and(|t| &r.type_id != t) {
        return false;
    }
    if f.webspace_key.is_some() && r.webspace_key != f.webspace_key {
        return false;
    }
    if f.form_id.is_some() && r.form_id != f.form_id {
        return false;
    }
    if let Some(from) = f.from_date {
        if r.created < day_start(from) {
            return false;
        }
    }
    if let Some(to) = f.to_date {
        if r.created >= day_start(to) + chrono::Duration::days(1) {
            return false;
        }
    }
    if let Some(search) = &f.search {
        let needle = search.to_lowercase();
        let hit = if f.search_fields.is_empty() {
            encode_fields(&r.fields).unwrap().to_lowercase().contains(&needle)
        } else {
            f.search_fields.iter().any(|key| match r.field(key) {
                Some(FieldValue::Text(s)) => s.to_lowercase().contains(&needle),
                Some(v @ FieldValue::List(_)) => {
                    serde_json::to_string(v).unwrap().to_lowercase().contains(&needle)
                }
                None => false,
            })
        };
        if !hit {
            return false;
        }
    }
    true
}

fn day_start(date: chrono::NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

#[async_trait]
impl DynamicRepository for MemoryStore {
    async fn find_by_filters(
        &self,
        filters: &Filters,
        sort: Sort,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SubmissionRecord>, AppError> {
        self.find_by_filters_calls.fetch_add(1, Ordering::SeqCst);
        let mut records = self.matching(filters);
        records.sort_by(|a, b| match sort.column {
            SortColumn::Id => a.id.cmp(&b.id),
            SortColumn::Type => a.kind.cmp(&b.kind),
            _ => a.created.cmp(&b.created).then(a.id.cmp(&b.id)),
        });
        if sort.order == SortOrder::Desc {
            records.reverse();
        }
        Ok(records
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_by_filters(&self, filters: &Filters) -> Result<i64, AppError> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.matching(filters).len() as i64)
    }

    async fn find(&self, id: Uuid) -> Result<Option<SubmissionRecord>, AppError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(AppError::NotFound("Form entry not found".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl FormRepository for MemoryStore {
    async fn load_by_id(&self, id: Uuid) -> Result<Option<FormSchema>, AppError> {
        Ok(self.forms.lock().unwrap().get(&id).cloned())
    }
}

// ── Media fake ──────────────────────────────────────────────────

/// Media service fake. Ids in `missing` report NotFound, ids in `broken` fail.
#[derive(Default)]
pub struct RecordingMedia {
    pub calls: Mutex<Vec<String>>,
    pub missing: HashSet<String>,
    pub broken: HashSet<String>,
}

impl RecordingMedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_missing(ids: &[&str]) -> Self {
        Self {
            missing: ids.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_broken(ids: &[&str]) -> Self {
        Self {
            broken: ids.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaManager for RecordingMedia {
    async fn delete(&self, media_id: &str) -> Result<(), MediaError> {
        self.calls.lock().unwrap().push(media_id.to_string());
        if self.missing.contains(media_id) {
            return Err(MediaError::NotFound(media_id.to_string()));
        }
        if self.broken.contains(media_id) {
            return Err(MediaError::Failed("media service unavailable".to_string()));
        }
        Ok(())
    }
}

// ── HTTP test server ────────────────────────────────────────────

/// A running test server instance with a dedicated test database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: PgPool,
    pub client: Client,
    pub db_name: String,
    pub media: Arc<RecordingMedia>,
    pub token: Option<String>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .authed(self.client.get(self.url(path)))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn delete(&self, path: &str) -> (String, StatusCode) {
        let resp = self
            .authed(self.client.delete(self.url(path)))
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        (body, status)
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(RecordingMedia::new(), None).await
}

/// Spawn a test app with a fresh temporary database.
pub async fn spawn_app_with(media: RecordingMedia, token: Option<&str>) -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    // Create a unique test database
    let db_name = format!("formdesk_test_{}", Uuid::now_v7().to_string().replace('-', ""));

    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let mut config = test_config();
    config.database_url = test_url;
    config.api_token = token.map(str::to_string);

    let store = Arc::new(PgStore::new(pool.clone()));
    let media = Arc::new(media);
    let state = Arc::new(AppState {
        config,
        dynamics: store.clone(),
        forms: store,
        media: media.clone(),
    });
    let app = formdesk::router(state);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        pool,
        client: Client::new(),
        db_name,
        media,
        token: token.map(str::to_string),
    }
}

/// Drop the test database after tests complete.
pub async fn cleanup(app: TestApp) {
    let db_name = app.db_name.clone();
    app.pool.close().await;

    let base_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");
    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}

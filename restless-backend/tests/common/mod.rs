use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use http::{HeaderMap, HeaderValue, StatusCode};
use restless_backend::{Backend, BackendError, BackendResult, CacheValue, DeleteStatus};
use restless_core::expiration::format_http_date;
use restless_core::{CacheKey, CachedResponse, Raw};
use url::Url;

#[derive(Debug, Default)]
pub struct BackendCounters {
    pub read_count: AtomicUsize,
    pub write_count: AtomicUsize,
    pub remove_count: AtomicUsize,
}

#[derive(Clone, Debug, Default)]
pub struct MockBackend {
    pub cache: Arc<DashMap<CacheKey, CacheValue<Raw>>>,
    pub counters: Arc<BackendCounters>,
    pub fail_remove: Arc<AtomicBool>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.cache.contains_key(key)
    }

    pub fn write_count(&self) -> usize {
        self.counters.write_count.load(Ordering::SeqCst)
    }

    pub fn remove_count(&self) -> usize {
        self.counters.remove_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<CacheValue<Raw>>> {
        self.counters.read_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.cache.get(key).map(|value| value.clone()))
    }

    async fn write(&self, key: &CacheKey, value: CacheValue<Raw>) -> BackendResult<()> {
        self.counters.write_count.fetch_add(1, Ordering::SeqCst);
        self.cache.insert(key.clone(), value);
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        self.counters.remove_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(BackendError::ConnectionError(Box::new(std::io::Error::other(
                "storage offline",
            ))));
        }
        Ok(match self.cache.remove(key) {
            Some(_) => DeleteStatus::Deleted(1),
            None => DeleteStatus::Missing,
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

pub fn key(path: &str) -> CacheKey {
    CacheKey::from_url("RESTLESS_CACHE", &Url::parse(&format!("http://h{path}")).unwrap())
}

pub fn response(cache_control: Option<&str>, date: Option<DateTime<Utc>>, body: &'static str) -> CachedResponse {
    let mut headers = HeaderMap::new();
    if let Some(value) = cache_control {
        headers.insert("cache-control", HeaderValue::from_str(value).unwrap());
    }
    if let Some(date) = date {
        headers.insert("date", HeaderValue::from_str(&format_http_date(date)).unwrap());
    }
    CachedResponse::new(StatusCode::OK, headers, Bytes::from_static(body.as_bytes()))
}

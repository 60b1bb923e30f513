//! Scripted in-memory tiers for service tests.
//!
//! Each fake answers after a configurable delay, so tests running on a paused
//! clock can control the relative arrival order of tier answers.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::{MappingStore, StoreError};
use crate::infrastructure::cache::{CacheError, CacheResult, CacheService};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Answer,
    Fail,
    Hang,
    Panic,
}

async fn act(delay: Duration, behavior: Behavior) -> bool {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    match behavior {
        Behavior::Answer => true,
        Behavior::Fail => false,
        Behavior::Hang => std::future::pending().await,
        Behavior::Panic => panic!("scripted adapter panic"),
    }
}

pub struct FakeCache {
    delay: Duration,
    behavior: Behavior,
    fail_writes: bool,
    entries: Mutex<HashMap<String, String>>,
    writes: Mutex<Vec<(String, String)>>,
}

impl FakeCache {
    pub fn empty() -> Self {
        Self {
            delay: Duration::ZERO,
            behavior: Behavior::Answer,
            fail_writes: false,
            entries: Mutex::new(HashMap::new()),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn with_entry(self, code: &str, target: &str) -> Self {
        self.entries
            .lock()
            .unwrap()
            .insert(code.to_string(), target.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(mut self) -> Self {
        self.behavior = Behavior::Fail;
        self
    }

    pub fn hanging(mut self) -> Self {
        self.behavior = Behavior::Hang;
        self
    }

    pub fn panicking(mut self) -> Self {
        self.behavior = Behavior::Panic;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheService for FakeCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        if !act(self.delay, self.behavior).await {
            return Err(CacheError::OperationError("scripted failure".to_string()));
        }
        Ok(self.entries.lock().unwrap().get(short_code).cloned())
    }

    async fn set_url(&self, short_code: &str, target_url: &str) -> CacheResult<()> {
        self.writes
            .lock()
            .unwrap()
            .push((short_code.to_string(), target_url.to_string()));
        if self.fail_writes {
            return Err(CacheError::OperationError("scripted write failure".to_string()));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(short_code.to_string(), target_url.to_string());
        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        self.entries.lock().unwrap().remove(short_code);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.behavior == Behavior::Answer
    }
}

pub struct FakeStore {
    delay: Duration,
    behavior: Behavior,
    fail_writes: bool,
    entries: Mutex<HashMap<String, Mapping>>,
    inserts: Mutex<Vec<NewMapping>>,
}

impl FakeStore {
    pub fn empty() -> Self {
        Self {
            delay: Duration::ZERO,
            behavior: Behavior::Answer,
            fail_writes: false,
            entries: Mutex::new(HashMap::new()),
            inserts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_entry(self, code: &str, target: &str) -> Self {
        self.entries.lock().unwrap().insert(
            code.to_string(),
            Mapping::new(code.to_string(), target.to_string(), None, Utc::now()),
        );
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(mut self) -> Self {
        self.behavior = Behavior::Fail;
        self
    }

    pub fn hanging(mut self) -> Self {
        self.behavior = Behavior::Hang;
        self
    }

    pub fn panicking(mut self) -> Self {
        self.behavior = Behavior::Panic;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn inserts(&self) -> Vec<NewMapping> {
        self.inserts.lock().unwrap().clone()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.lock().unwrap().contains_key(code)
    }
}

#[async_trait]
impl MappingStore for FakeStore {
    async fn get(&self, short_code: &str) -> Result<Option<Mapping>, StoreError> {
        if !act(self.delay, self.behavior).await {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.entries.lock().unwrap().get(short_code).cloned())
    }

    async fn insert(&self, new_mapping: &NewMapping) -> Result<(), StoreError> {
        self.inserts.lock().unwrap().push(new_mapping.clone());
        if self.fail_writes {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut entries = self.entries.lock().unwrap();
        if entries.contains_key(&new_mapping.short_code) {
            return Err(StoreError::Duplicate(new_mapping.short_code.clone()));
        }
        entries.insert(
            new_mapping.short_code.clone(),
            Mapping::new(
                new_mapping.short_code.clone(),
                new_mapping.target_url.clone(),
                new_mapping.expires_at,
                Utc::now(),
            ),
        );
        Ok(())
    }

    async fn delete(&self, short_code: &str) -> Result<bool, StoreError> {
        Ok(self.entries.lock().unwrap().remove(short_code).is_some())
    }

    async fn health_check(&self) -> bool {
        self.behavior == Behavior::Answer
    }
}

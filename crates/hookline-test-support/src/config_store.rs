//! Test config stores: `ConfigStore` implementations for tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use hookline_core::category::EventCategory;
use hookline_core::error::DomainError;
use hookline_core::platform::Platform;
use hookline_core::store::{ConfigStore, DestinationMap};

/// A config store held in memory. Follows the same blank-clears rule as the
/// PostgreSQL store.
#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    entries: RwLock<HashMap<(Platform, EventCategory), String>>,
}

impl InMemoryConfigStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_entries(entries: &[(Platform, EventCategory, &str)]) -> Self {
        let store = Self::new();
        {
            let mut map = store.entries.write().unwrap();
            for (platform, category, url) in entries {
                map.insert((*platform, *category), (*url).to_owned());
            }
        }
        store
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn get(
        &self,
        platform: Platform,
        category: EventCategory,
    ) -> Result<Option<String>, DomainError> {
        Ok(self
            .entries
            .read()
            .unwrap()
            .get(&(platform, category))
            .cloned())
    }

    async fn get_all(&self, platform: Platform) -> Result<DestinationMap, DomainError> {
        Ok(self
            .entries
            .read()
            .unwrap()
            .iter()
            .filter(|((p, _), _)| *p == platform)
            .map(|((_, category), url)| (*category, url.clone()))
            .collect())
    }

    async fn set(
        &self,
        platform: Platform,
        category: EventCategory,
        url: &str,
    ) -> Result<(), DomainError> {
        let mut entries = self.entries.write().unwrap();
        let url = url.trim();
        if url.is_empty() {
            entries.remove(&(platform, category));
        } else {
            entries.insert((platform, category), url.to_owned());
        }
        Ok(())
    }
}

/// A config store that always returns an infrastructure error.
#[derive(Debug)]
pub struct FailingConfigStore;

#[async_trait]
impl ConfigStore for FailingConfigStore {
    async fn get(
        &self,
        _platform: Platform,
        _category: EventCategory,
    ) -> Result<Option<String>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn get_all(&self, _platform: Platform) -> Result<DestinationMap, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn set(
        &self,
        _platform: Platform,
        _category: EventCategory,
        _url: &str,
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

//! In-memory repository

use crate::{Result, StorageError, WeatherRecord, WeatherRepository, WeatherStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, info};

/// Repository backed by a `HashMap`, used as a test double for the SQL store
#[derive(Debug, Default)]
pub struct MemoryWeatherRepository {
    records: RwLock<HashMap<String, WeatherRecord>>,
}

impl MemoryWeatherRepository {
    pub fn new() -> Self {
        info!("Creating in-memory weather repository");
        Self::default()
    }

    fn lock_error(e: impl std::fmt::Display) -> StorageError {
        StorageError::Database(format!("Lock error: {}", e))
    }
}

#[async_trait]
impl WeatherStore for MemoryWeatherRepository {
    async fn get(&self, city: &str) -> Result<Option<WeatherRecord>> {
        let records = self.records.read().map_err(Self::lock_error)?;
        Ok(records.get(city).cloned())
    }

    async fn ping(&self) -> Result<()> {
        self.records.read().map(|_| ()).map_err(Self::lock_error)
    }
}

#[async_trait]
impl WeatherRepository for MemoryWeatherRepository {
    async fn insert(&self, record: &WeatherRecord) -> Result<()> {
        let mut records = self.records.write().map_err(Self::lock_error)?;

        if records.contains_key(&record.city) {
            return Err(StorageError::Duplicate(record.city.clone()));
        }

        records.insert(record.city.clone(), record.clone());
        debug!("Inserted weather record for {}", record.city);
        Ok(())
    }

    async fn update(&self, record: &WeatherRecord) -> Result<bool> {
        let mut records = self.records.write().map_err(Self::lock_error)?;

        match records.get_mut(&record.city) {
            Some(existing) => {
                existing.description.clone_from(&record.description);
                existing.icon.clone_from(&record.icon);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, city: &str) -> Result<bool> {
        let mut records = self.records.write().map_err(Self::lock_error)?;
        Ok(records.remove(city).is_some())
    }

    async fn count(&self) -> Result<u64> {
        let records = self.records.read().map_err(Self::lock_error)?;
        Ok(records.len() as u64)
    }
}

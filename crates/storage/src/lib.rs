//! Storage Layer
//!
//! Weather record persistence with repository pattern. Reads go through the
//! narrow [`WeatherStore`] trait; the write side lives on
//! [`WeatherRepository`] and is only used for seeding.

mod config;
mod memory;
mod record;
mod repository;
mod seed;

pub use config::{DatabaseConfig, DatabaseDriver};
pub use memory::MemoryWeatherRepository;
pub use record::WeatherRecord;
pub use repository::{SqlWeatherRepository, WeatherRepository, WeatherStore};
pub use seed::{seed, seed_if_empty, seed_records};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Duplicate city key: {0}")]
    Duplicate(String),
    #[error("Invalid database configuration: {0}")]
    InvalidConfig(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;

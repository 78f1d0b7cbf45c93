//! Startup seed data

use crate::{Result, WeatherRecord, WeatherRepository};
use tracing::info;

/// Fixed rows inserted once at startup
pub fn seed_records() -> Vec<WeatherRecord> {
    vec![
        WeatherRecord::new("Paris, France", "Very cloudy!", "weather-fog"),
        WeatherRecord::new("London, UK", "Quite cloudy", "weather-pouring"),
    ]
}

/// Insert the seed rows.
///
/// Plain inserts: running this twice against the same store fails with
/// [`StorageError::Duplicate`](crate::StorageError::Duplicate).
pub async fn seed<R: WeatherRepository + ?Sized>(repo: &R) -> Result<usize> {
    let records = seed_records();

    for record in &records {
        repo.insert(record).await?;
    }

    info!("Seeded {} weather records", records.len());
    Ok(records.len())
}

/// Seed only an empty store, so restarts against a persistent database
/// keep their rows. Returns the number of rows inserted.
pub async fn seed_if_empty<R: WeatherRepository + ?Sized>(repo: &R) -> Result<usize> {
    let existing = repo.count().await?;
    if existing > 0 {
        info!("Store already holds {} weather records, skipping seed", existing);
        return Ok(0);
    }

    seed(repo).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DatabaseConfig, MemoryWeatherRepository, SqlWeatherRepository, StorageError, WeatherStore,
    };

    #[tokio::test]
    async fn test_seed_sql_store() {
        let repo = SqlWeatherRepository::connect(&DatabaseConfig::in_memory())
            .await
            .unwrap();
        repo.init_schema().await.unwrap();

        assert_eq!(seed(&repo).await.unwrap(), 2);
        assert_eq!(repo.count().await.unwrap(), 2);

        let paris = repo.get("Paris, France").await.unwrap().unwrap();
        assert_eq!(paris.description, "Very cloudy!");
        assert_eq!(paris.icon, "weather-fog");
        assert_eq!(repo.get("Atlantis").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reseed_violates_uniqueness() {
        let repo = MemoryWeatherRepository::new();
        seed(&repo).await.unwrap();

        assert!(matches!(
            seed(&repo).await,
            Err(StorageError::Duplicate(city)) if city == "Paris, France"
        ));
    }

    #[tokio::test]
    async fn test_seed_if_empty_runs_once() {
        let repo = SqlWeatherRepository::connect(&DatabaseConfig::in_memory())
            .await
            .unwrap();
        repo.init_schema().await.unwrap();

        assert_eq!(seed_if_empty(&repo).await.unwrap(), 2);
        assert_eq!(seed_if_empty(&repo).await.unwrap(), 0);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_seed_if_empty_leaves_existing_rows() {
        let repo = MemoryWeatherRepository::new();
        repo.insert(&WeatherRecord::new("Oslo, Norway", "Snow", "weather-snow"))
            .await
            .unwrap();

        assert_eq!(seed_if_empty(&repo).await.unwrap(), 0);
        assert_eq!(repo.get("Paris, France").await.unwrap(), None);
    }
}

//! Repository Implementation

use crate::{DatabaseConfig, Result, StorageError, WeatherRecord};
use async_trait::async_trait;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use tracing::{debug, info};

/// Read-only view of the weather store.
///
/// This is the only capability the HTTP layer needs.
#[async_trait]
pub trait WeatherStore: Send + Sync + 'static {
    /// Look up a record by city name. Returns `None` if no such city exists.
    async fn get(&self, city: &str) -> Result<Option<WeatherRecord>>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<()>;
}

/// Write side of the store, used for seeding and tests.
#[async_trait]
pub trait WeatherRepository: WeatherStore {
    /// Insert a new record. Returns `Err(Duplicate)` if the city already exists.
    async fn insert(&self, record: &WeatherRecord) -> Result<()>;

    /// Replace description and icon of an existing city.
    /// Returns `true` if the record existed.
    async fn update(&self, record: &WeatherRecord) -> Result<bool>;

    /// Delete the record for a city. Returns `true` if it existed.
    async fn delete(&self, city: &str) -> Result<bool>;

    /// Number of stored records
    async fn count(&self) -> Result<u64>;
}

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS weather (\
    city VARCHAR(255) NOT NULL PRIMARY KEY, \
    description VARCHAR(255) NOT NULL, \
    icon VARCHAR(255) NOT NULL)";

/// SQL-backed repository (MySQL or SQLite through the sqlx `Any` driver)
#[derive(Debug, Clone)]
pub struct SqlWeatherRepository {
    pool: AnyPool,
}

impl SqlWeatherRepository {
    /// Connect to the configured database.
    ///
    /// Fails once the connect timeout elapses; callers are expected to abort startup.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        sqlx::any::install_default_drivers();

        let url = config.connection_url()?;
        let mut options = AnyPoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(config.connect_timeout());

        // Every connection to sqlite::memory: is its own database
        if config.is_in_memory() {
            options = options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        info!("Connecting to {:?} database", config.driver);
        let pool = options.connect(&url).await?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Create the weather table if it does not exist
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        debug!("Weather schema ready");
        Ok(())
    }

    /// Close all pooled connections
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl WeatherStore for SqlWeatherRepository {
    async fn get(&self, city: &str) -> Result<Option<WeatherRecord>> {
        let record = sqlx::query_as::<_, WeatherRecord>(
            "SELECT city, description, icon FROM weather WHERE city = ?",
        )
        .bind(city)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl WeatherRepository for SqlWeatherRepository {
    async fn insert(&self, record: &WeatherRecord) -> Result<()> {
        sqlx::query("INSERT INTO weather (city, description, icon) VALUES (?, ?, ?)")
            .bind(record.city.as_str())
            .bind(record.description.as_str())
            .bind(record.icon.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    StorageError::Duplicate(record.city.clone())
                }
                other => other.into(),
            })?;

        debug!("Inserted weather record for {}", record.city);
        Ok(())
    }

    async fn update(&self, record: &WeatherRecord) -> Result<bool> {
        let result = sqlx::query("UPDATE weather SET description = ?, icon = ? WHERE city = ?")
            .bind(record.description.as_str())
            .bind(record.icon.as_str())
            .bind(record.city.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, city: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM weather WHERE city = ?")
            .bind(city)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM weather")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }
}

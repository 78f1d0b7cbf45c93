//! Weather record

use serde::{Deserialize, Serialize};

/// Weather snapshot for one city, keyed by city name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WeatherRecord {
    /// Primary key, e.g. "Paris, France"
    pub city: String,
    /// Human-readable condition text
    pub description: String,
    /// Presentation icon identifier
    pub icon: String,
}

impl WeatherRecord {
    pub fn new(
        city: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            description: description.into(),
            icon: icon.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_field_names() {
        let record = WeatherRecord::new("Paris, France", "Very cloudy!", "weather-fog");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"city":"Paris, France","description":"Very cloudy!","icon":"weather-fog"}"#
        );
    }
}

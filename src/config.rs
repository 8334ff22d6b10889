use crate::engine::listing::RoomType;
use crate::engine::schema::FeatureRole;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub model: ModelConfig,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub constants: ConstantsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    pub path: String,
    /// Role assumed for columns of transformer kinds the crate does not know.
    #[serde(default)]
    pub unrecognized_role: FeatureRole,
}

/// Initial form values.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FormConfig {
    pub city: String,
    pub room_type: RoomType,
    pub max_guests: u8,
    pub num_bedrooms: u8,
    pub monthly_salary: f64,
    pub meal_price: f64,
    pub distance_city_center: f64,
    pub cleanliness_score: f64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            city: "London".to_string(),
            room_type: RoomType::EntireHome,
            max_guests: 2,
            num_bedrooms: 1,
            monthly_salary: 3500.0,
            meal_price: 15.0,
            distance_city_center: 2.5,
            cleanliness_score: 9.5,
        }
    }
}

/// City-level features the form does not ask for.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ConstantsConfig {
    pub taxi_price_per_km: f64,
    pub monthly_basic_utilities: f64,
}

impl Default for ConstantsConfig {
    fn default() -> Self {
        Self {
            taxi_price_per_km: 2.0,
            monthly_basic_utilities: 250.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: String,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: "listing-price.log".to_string(),
            filter: "listing_price=info".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .with_context(|| "Failed to parse config TOML")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parses() {
        let config = Config::load(Path::new("config.toml")).unwrap();
        assert_eq!(config.model.path, "models/listing_model.json");
        assert_eq!(config.model.unrecognized_role, FeatureRole::Numerical);
        assert_eq!(config.form.city, "London");
        assert_eq!(config.form.room_type, RoomType::EntireHome);
        assert_eq!(config.constants.taxi_price_per_km, 2.0);
        assert_eq!(config.constants.monthly_basic_utilities, 250.0);
    }

    #[test]
    fn test_optional_sections_default() {
        let config = Config::parse("[model]\npath = \"m.json\"\n").unwrap();
        assert_eq!(config.form.max_guests, 2);
        assert_eq!(config.form.cleanliness_score, 9.5);
        assert_eq!(config.constants, ConstantsConfig::default());
        assert_eq!(config.logging.file, "listing-price.log");
    }

    #[test]
    fn test_partial_form_section() {
        let config = Config::parse(
            "[model]\npath = \"m.json\"\nunrecognized_role = \"categorical\"\n\n[form]\ncity = \"Paris\"\nroom_type = \"Private room\"\n",
        )
        .unwrap();
        assert_eq!(config.form.city, "Paris");
        assert_eq!(config.form.room_type, RoomType::PrivateRoom);
        assert_eq!(config.form.meal_price, 15.0);
        assert_eq!(config.model.unrecognized_role, FeatureRole::Categorical);
    }

    #[test]
    fn test_missing_model_section_fails() {
        assert!(Config::parse("[form]\ncity = \"Paris\"\n").is_err());
    }
}

use super::value::FeatureRecord;
use crate::config::{ConstantsConfig, FormConfig};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column names the form writes into the user-input record.
pub mod columns {
    pub const ROOM_TYPE: &str = "room_type";
    pub const CITY: &str = "city";
    pub const MAX_GUESTS: &str = "max_guests";
    pub const NUM_BEDROOMS: &str = "num_bedrooms";
    pub const DISTANCE_CITY_CENTER: &str = "distance_city_center";
    pub const CLEANLINESS_SCORE: &str = "cleanliness_score";
    pub const MONTHLY_SALARY: &str = "Monthly_Average_Net_salary";
    pub const MEAL_PRICE: &str = "Meal_at_Inexpensive_Restaurant";
    pub const TAXI_PRICE_PER_KM: &str = "Taxi_price_per_Km";
    pub const MONTHLY_BASIC_UTILITIES: &str = "Monthly_Basic_Utilities";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoomType {
    #[default]
    #[serde(rename = "Entire home/apt")]
    EntireHome,
    #[serde(rename = "Private room")]
    PrivateRoom,
    #[serde(rename = "Shared room")]
    SharedRoom,
}

impl RoomType {
    pub const ALL: [RoomType; 3] = [RoomType::EntireHome, RoomType::PrivateRoom, RoomType::SharedRoom];

    pub fn label(self) -> &'static str {
        match self {
            RoomType::EntireHome => "Entire home/apt",
            RoomType::PrivateRoom => "Private room",
            RoomType::SharedRoom => "Shared room",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.label() == label)
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One form submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingInput {
    pub city: String,
    pub room_type: RoomType,
    pub max_guests: u8,
    pub num_bedrooms: u8,
    pub monthly_salary: f64,
    pub meal_price: f64,
    pub distance_city_center: f64,
    pub cleanliness_score: f64,
}

impl ListingInput {
    pub fn from_defaults(form: &FormConfig) -> Self {
        Self {
            city: form.city.clone(),
            room_type: form.room_type,
            max_guests: form.max_guests,
            num_bedrooms: form.num_bedrooms,
            monthly_salary: form.monthly_salary,
            meal_price: form.meal_price,
            distance_city_center: form.distance_city_center,
            cleanliness_score: form.cleanliness_score,
        }
    }

    /// Named user-input record, including the fixed city constants.
    pub fn to_record(&self, constants: &ConstantsConfig) -> FeatureRecord {
        FeatureRecord::new()
            .with(columns::ROOM_TYPE, self.room_type.label())
            .with(columns::CITY, self.city.as_str())
            .with(columns::MAX_GUESTS, self.max_guests)
            .with(columns::NUM_BEDROOMS, self.num_bedrooms)
            .with(columns::DISTANCE_CITY_CENTER, self.distance_city_center)
            .with(columns::CLEANLINESS_SCORE, self.cleanliness_score)
            .with(columns::MONTHLY_SALARY, self.monthly_salary)
            .with(columns::MEAL_PRICE, self.meal_price)
            .with(columns::TAXI_PRICE_PER_KM, constants.taxi_price_per_km)
            .with(columns::MONTHLY_BASIC_UTILITIES, constants.monthly_basic_utilities)
    }

    /// Short label for history rows, e.g. "London, Private room, 2g/1br".
    pub fn summary(&self) -> String {
        format!(
            "{}, {}, {}g/{}br",
            self.city, self.room_type, self.max_guests, self.num_bedrooms
        )
    }
}

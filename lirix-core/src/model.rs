use serde::{Deserialize, Serialize};

use crate::compass::WindDirection;

/// A named entry in the location registry, keyed by the provider's numeric city id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
}

impl Location {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// One observation (or one forecast entry), flattened for display.
///
/// Every field keeps its zero value when the upstream document omits it,
/// except `wind_direction`, which starts out as [`WindDirection::Unavailable`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WeatherSample {
    pub location_name: String,
    pub location_id: String,
    pub target_time: String,

    /// Only filled for current-conditions documents.
    pub sunrise_time: Option<String>,
    pub sunset_time: Option<String>,

    /// Celsius, two decimals.
    pub temperature: String,
    /// Percent, no decimals.
    pub humidity: String,

    pub wind_speed: f64,
    pub wind_direction: WindDirection,
    pub wind_gusts: f64,

    pub cloud_coverage: f64,

    pub description: String,

    /// Millimetres over the last (or next) three hours.
    pub rain_height: f64,
    pub snow_height: f64,
}

impl WeatherSample {
    pub fn located(mut self, location: &Location) -> Self {
        self.location_name = location.name.clone();
        self.location_id = location.id.clone();
        self
    }
}

/// An ordered run of forecast entries for one location.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ForecastSet {
    pub location_name: String,
    pub location_id: String,
    pub count: usize,
    pub entries: Vec<WeatherSample>,
}

impl ForecastSet {
    pub fn located(self, location: &Location) -> Self {
        Self {
            location_name: location.name.clone(),
            location_id: location.id.clone(),
            count: self.count,
            entries: self.entries.into_iter().map(|e| e.located(location)).collect(),
        }
    }
}

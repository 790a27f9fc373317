//! Mapping of raw OpenWeatherMap documents into [`WeatherSample`] / [`ForecastSet`].
//!
//! Each top-level key is handled by one rule in [`OBSERVATION_RULES`]. A rule
//! decodes its value into a small typed schema whose fields are all optional,
//! so a missing key or sub-key keeps the default while a value of the wrong
//! shape is reported as [`MapError::Structural`].

use chrono_tz::Tz;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

use crate::{
    compass::WindDirection,
    format,
    model::{ForecastSet, WeatherSample},
};

#[derive(Debug, Error)]
pub enum MapError {
    #[error("document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("field `{key}` has the wrong shape: {reason}")]
    Structural { key: String, reason: String },

    #[error("field `{key}` holds an out-of-range timestamp: {value}")]
    Timestamp { key: &'static str, value: f64 },

    #[error("`weather` array is empty")]
    EmptyWeather,

    #[error("forecast declares {declared} entries but only {available} are present")]
    OutOfBounds { declared: usize, available: usize },

    #[error("forecast entry {index}: {source}")]
    Entry {
        index: usize,
        #[source]
        source: Box<MapError>,
    },
}

/// How the `dt` timestamp is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeMode {
    /// Current conditions: full weekday, date and clock time.
    Instant,
    /// One entry of a forecast listing: abbreviated weekday and time.
    Forecast,
}

/// Stateless converter; the time zone only affects how timestamps are printed.
#[derive(Debug, Clone, Copy)]
pub struct Mapper {
    tz: Tz,
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

/// One top-level key of an observation document, ready to be decoded.
struct Field<'a> {
    key: &'static str,
    value: &'a Value,
    mode: TimeMode,
}

impl Field<'_> {
    /// Decode a sub-object. Arrays are rejected even though serde would
    /// happily read them positionally into a struct.
    fn object<T: DeserializeOwned>(&self) -> Result<T, MapError> {
        if !self.value.is_object() {
            return Err(structural(self.key, self.value, "an object"));
        }
        self.decode()
    }

    fn decode<T: DeserializeOwned>(&self) -> Result<T, MapError> {
        T::deserialize(self.value).map_err(|e| MapError::Structural {
            key: self.key.to_string(),
            reason: e.to_string(),
        })
    }

    fn timestamp(
        &self,
        raw: f64,
        render: fn(&Tz, i64) -> Option<String>,
        tz: &Tz,
    ) -> Result<String, MapError> {
        render(tz, raw as i64).ok_or(MapError::Timestamp { key: self.key, value: raw })
    }
}

type Rule = fn(&Mapper, &Field<'_>, &mut WeatherSample) -> Result<(), MapError>;

/// Key to extraction rule, applied in this order for every key that is present.
const OBSERVATION_RULES: &[(&str, Rule)] = &[
    ("dt", Mapper::target_time),
    ("sys", Mapper::sun_events),
    ("main", Mapper::measurements),
    ("weather", Mapper::description),
    ("wind", Mapper::wind),
    ("clouds", Mapper::clouds),
    ("rain", Mapper::rain),
    ("snow", Mapper::snow),
];

#[derive(Debug, Deserialize)]
struct RawSys {
    sunrise: Option<f64>,
    sunset: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawMain {
    temp: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawCondition {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawWind {
    speed: Option<f64>,
    deg: Option<f64>,
    gust: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawClouds {
    all: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawPrecipitation {
    #[serde(rename = "3h")]
    three_hours: Option<f64>,
}

impl Mapper {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Map a single observation document.
    pub fn observation(&self, doc: &Value, mode: TimeMode) -> Result<WeatherSample, MapError> {
        let object = doc.as_object().ok_or_else(|| structural("$", doc, "an object"))?;

        let mut sample = WeatherSample::default();

        for &(key, rule) in OBSERVATION_RULES {
            let Some(value) = object.get(key).filter(|v| !v.is_null()) else {
                continue;
            };
            rule(self, &Field { key, value, mode }, &mut sample)?;
        }

        Ok(sample)
    }

    /// Map a forecast listing (`cnt` plus `list`), every entry in forecast mode.
    ///
    /// Entries past the declared count are ignored; fewer entries than
    /// declared fail the whole call.
    pub fn forecast(&self, doc: &Value) -> Result<ForecastSet, MapError> {
        let object = doc.as_object().ok_or_else(|| structural("$", doc, "an object"))?;

        let declared = match object.get("cnt").filter(|v| !v.is_null()) {
            Some(value) => entry_count(value)?,
            None => 0,
        };

        let list = match object.get("list").filter(|v| !v.is_null()) {
            Some(Value::Array(items)) => items.as_slice(),
            Some(other) => return Err(structural("list", other, "an array")),
            None => &[],
        };

        if list.len() < declared {
            return Err(MapError::OutOfBounds { declared, available: list.len() });
        }

        let entries = list
            .iter()
            .take(declared)
            .enumerate()
            .map(|(index, entry)| {
                self.observation(entry, TimeMode::Forecast)
                    .map_err(|source| MapError::Entry { index, source: Box::new(source) })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ForecastSet { count: declared, entries, ..ForecastSet::default() })
    }

    /// Parse JSON text and map it as a single observation.
    pub fn observation_from_str(&self, body: &str, mode: TimeMode) -> Result<WeatherSample, MapError> {
        let doc: Value = serde_json::from_str(body)?;
        self.observation(&doc, mode)
    }

    /// Parse JSON text and map it as a forecast listing.
    pub fn forecast_from_str(&self, body: &str) -> Result<ForecastSet, MapError> {
        let doc: Value = serde_json::from_str(body)?;
        self.forecast(&doc)
    }

    fn target_time(&self, field: &Field<'_>, out: &mut WeatherSample) -> Result<(), MapError> {
        let dt: f64 = field.decode()?;
        let render: fn(&Tz, i64) -> Option<String> = match field.mode {
            TimeMode::Instant => format::full_timestamp,
            TimeMode::Forecast => format::short_timestamp,
        };
        out.target_time = field.timestamp(dt, render, &self.tz)?;
        Ok(())
    }

    fn sun_events(&self, field: &Field<'_>, out: &mut WeatherSample) -> Result<(), MapError> {
        let sys: RawSys = field.object()?;
        if let Some(sunrise) = sys.sunrise {
            out.sunrise_time = Some(field.timestamp(sunrise, format::clock_time, &self.tz)?);
        }
        if let Some(sunset) = sys.sunset {
            out.sunset_time = Some(field.timestamp(sunset, format::clock_time, &self.tz)?);
        }
        Ok(())
    }

    fn measurements(&self, field: &Field<'_>, out: &mut WeatherSample) -> Result<(), MapError> {
        let main: RawMain = field.object()?;
        if let Some(temp) = main.temp {
            out.temperature = format::celsius_from_kelvin(temp);
        }
        if let Some(humidity) = main.humidity {
            out.humidity = format::whole_percent(humidity);
        }
        Ok(())
    }

    fn description(&self, field: &Field<'_>, out: &mut WeatherSample) -> Result<(), MapError> {
        let Some(conditions) = field.value.as_array() else {
            return Err(structural(field.key, field.value, "an array"));
        };
        // Later elements are never inspected.
        let first = conditions.first().ok_or(MapError::EmptyWeather)?;
        let condition: RawCondition = Field { value: first, ..*field }.object()?;
        out.description = condition.description.unwrap_or_default();
        Ok(())
    }

    fn wind(&self, field: &Field<'_>, out: &mut WeatherSample) -> Result<(), MapError> {
        let wind: RawWind = field.object()?;
        out.wind_speed = wind.speed.unwrap_or_default();
        out.wind_gusts = wind.gust.unwrap_or_default();
        if let Some(deg) = wind.deg {
            out.wind_direction = WindDirection::from_degrees(deg);
        }
        Ok(())
    }

    fn clouds(&self, field: &Field<'_>, out: &mut WeatherSample) -> Result<(), MapError> {
        let clouds: RawClouds = field.object()?;
        out.cloud_coverage = clouds.all.unwrap_or_default();
        Ok(())
    }

    fn rain(&self, field: &Field<'_>, out: &mut WeatherSample) -> Result<(), MapError> {
        let rain: RawPrecipitation = field.object()?;
        out.rain_height = rain.three_hours.unwrap_or_default();
        Ok(())
    }

    fn snow(&self, field: &Field<'_>, out: &mut WeatherSample) -> Result<(), MapError> {
        let snow: RawPrecipitation = field.object()?;
        out.snow_height = snow.three_hours.unwrap_or_default();
        Ok(())
    }
}

/// `cnt` may arrive as `40` or `40.0`; fractional counts are truncated.
fn entry_count(value: &Value) -> Result<usize, MapError> {
    match value.as_f64() {
        Some(n) if n.is_finite() && n >= 0.0 => Ok(n as usize),
        _ => Err(structural("cnt", value, "a non-negative number")),
    }
}

fn structural(key: &str, found: &Value, expected: &str) -> MapError {
    let kind = match found {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    MapError::Structural {
        key: key.to_string(),
        reason: format!("expected {expected}, found {kind}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn current_doc() -> Value {
        json!({
            "coord": { "lon": 37.62, "lat": 55.75 },
            "weather": [
                { "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" },
                { "id": 701, "main": "Mist", "description": "mist", "icon": "50d" }
            ],
            "main": { "temp": 300.0, "pressure": 1012, "humidity": 57.6 },
            "wind": { "speed": 4.1, "deg": 200, "gust": 7.5 },
            "clouds": { "all": 75 },
            "rain": { "3h": 1.25 },
            "dt": 1_445_000_000,
            "sys": { "country": "RU", "sunrise": 1_444_975_200, "sunset": 1_445_018_400 },
            "id": 524901,
            "name": "Moscow",
            "cod": 200
        })
    }

    #[test]
    fn maps_full_current_document() {
        let sample = Mapper::default().observation(&current_doc(), TimeMode::Instant).unwrap();

        assert_eq!(sample.target_time, "Friday, October 16 2015 @ 12:53:20PM (UTC)");
        assert_eq!(sample.sunrise_time.as_deref(), Some("06:00:00am (UTC)"));
        assert_eq!(sample.sunset_time.as_deref(), Some("06:00:00pm (UTC)"));
        assert_eq!(sample.temperature, "26.85");
        assert_eq!(sample.humidity, "58");
        assert_eq!(sample.description, "light rain");
        assert_eq!(sample.wind_speed, 4.1);
        assert_eq!(sample.wind_gusts, 7.5);
        assert_eq!(sample.wind_direction, WindDirection::Ssw);
        assert_eq!(sample.cloud_coverage, 75.0);
        assert_eq!(sample.rain_height, 1.25);
        assert_eq!(sample.snow_height, 0.0);
        assert!(sample.location_name.is_empty());
    }

    #[test]
    fn empty_document_keeps_defaults() {
        let sample = Mapper::default().observation(&json!({}), TimeMode::Instant).unwrap();

        assert_eq!(sample.wind_direction, WindDirection::Unavailable);
        assert_eq!(sample.wind_speed, 0.0);
        assert_eq!(sample.wind_gusts, 0.0);
        assert_eq!(sample.cloud_coverage, 0.0);
        assert_eq!(sample.rain_height, 0.0);
        assert_eq!(sample.snow_height, 0.0);
        assert!(sample.temperature.is_empty());
        assert!(sample.sunrise_time.is_none());
        assert_eq!(sample, WeatherSample::default());
    }

    #[test]
    fn wind_without_degree_stays_unavailable() {
        let doc = json!({ "wind": { "speed": 2.0 } });
        let sample = Mapper::default().observation(&doc, TimeMode::Instant).unwrap();
        assert_eq!(sample.wind_direction, WindDirection::Unavailable);
        assert_eq!(sample.wind_speed, 2.0);
    }

    #[test]
    fn out_of_range_degree_is_undefined() {
        let doc = json!({ "wind": { "deg": 800 } });
        let sample = Mapper::default().observation(&doc, TimeMode::Instant).unwrap();
        assert_eq!(sample.wind_direction, WindDirection::Undefined);
    }

    #[test]
    fn null_values_count_as_missing() {
        let doc = json!({ "rain": null, "wind": { "deg": null } });
        let sample = Mapper::default().observation(&doc, TimeMode::Instant).unwrap();
        assert_eq!(sample.rain_height, 0.0);
        assert_eq!(sample.wind_direction, WindDirection::Unavailable);
    }

    #[test]
    fn forecast_mode_uses_short_time() {
        let doc = json!({ "dt": 1_444_975_200 });
        let sample = Mapper::default().observation(&doc, TimeMode::Forecast).unwrap();
        assert_eq!(sample.target_time, "Fri 6:00am");
    }

    #[test]
    fn empty_weather_array_fails() {
        let doc = json!({ "weather": [] });
        let err = Mapper::default().observation(&doc, TimeMode::Instant).unwrap_err();
        assert!(matches!(err, MapError::EmptyWeather));
    }

    #[test]
    fn only_first_weather_element_is_read() {
        let doc = json!({ "weather": [{ "description": "rain" }, 5] });
        let sample = Mapper::default().observation(&doc, TimeMode::Instant).unwrap();
        assert_eq!(sample.description, "rain");

        let doc = json!({ "weather": [{}] });
        let sample = Mapper::default().observation(&doc, TimeMode::Instant).unwrap();
        assert!(sample.description.is_empty());
    }

    #[test]
    fn weather_element_must_be_an_object() {
        let doc = json!({ "weather": [["positional"]] });
        let err = Mapper::default().observation(&doc, TimeMode::Instant).unwrap_err();
        assert!(matches!(err, MapError::Structural { ref key, .. } if key == "weather"), "{err}");
    }

    #[test]
    fn wrong_shapes_are_structural() {
        let cases = [
            json!({ "dt": "yesterday" }),
            json!({ "weather": { "description": "rain" } }),
            json!({ "wind": [1.0, 2.0, 3.0] }),
            json!({ "main": { "temp": "hot" } }),
            json!({ "clouds": 40 }),
        ];

        for doc in cases {
            let err = Mapper::default().observation(&doc, TimeMode::Instant).unwrap_err();
            assert!(matches!(err, MapError::Structural { .. }), "{doc}: {err}");
        }
    }

    #[test]
    fn structural_error_names_the_key() {
        let doc = json!({ "wind": [1.0] });
        let err = Mapper::default().observation(&doc, TimeMode::Instant).unwrap_err();
        assert_eq!(
            err.to_string(),
            "field `wind` has the wrong shape: expected an object, found an array"
        );
    }

    #[test]
    fn root_must_be_an_object() {
        let err = Mapper::default().observation(&json!([1, 2]), TimeMode::Instant).unwrap_err();
        assert!(matches!(err, MapError::Structural { ref key, .. } if key == "$"));
    }

    #[test]
    fn invalid_json_text() {
        let err = Mapper::default().observation_from_str("{not json", TimeMode::Instant).unwrap_err();
        assert!(matches!(err, MapError::Json(_)));
    }

    #[test]
    fn mapping_is_deterministic() {
        let mapper = Mapper::default();
        let first = mapper.observation(&current_doc(), TimeMode::Instant).unwrap();
        let second = mapper.observation(&current_doc(), TimeMode::Instant).unwrap();
        assert_eq!(first, second);
    }

    fn forecast_doc(cnt: usize, entries: usize) -> Value {
        let list: Vec<Value> = (0..entries)
            .map(|i| {
                json!({
                    "dt": 1_444_975_200 + (i as i64) * 10_800,
                    "main": { "temp": 280.0 + i as f64, "humidity": 80 },
                    "weather": [{ "description": "broken clouds" }],
                    "wind": { "speed": 3.0, "deg": 90 },
                    "snow": { "3h": 0.5 }
                })
            })
            .collect();
        json!({ "cod": "200", "cnt": cnt, "list": list, "city": { "id": 524901, "name": "Moscow" } })
    }

    #[test]
    fn maps_forecast_listing() {
        let set = Mapper::default().forecast(&forecast_doc(3, 3)).unwrap();

        assert_eq!(set.count, 3);
        assert_eq!(set.entries.len(), 3);
        assert_eq!(set.entries[0].target_time, "Fri 6:00am");
        assert_eq!(set.entries[1].target_time, "Fri 9:00am");
        assert_eq!(set.entries[2].temperature, "8.85");
        assert_eq!(set.entries[0].wind_direction, WindDirection::E);
        assert_eq!(set.entries[0].snow_height, 0.5);
        assert!(set.entries.iter().all(|e| e.sunrise_time.is_none()));
    }

    #[test]
    fn forecast_shorter_than_declared_fails() {
        let err = Mapper::default().forecast(&forecast_doc(3, 2)).unwrap_err();
        assert!(matches!(err, MapError::OutOfBounds { declared: 3, available: 2 }));
    }

    #[test]
    fn forecast_longer_than_declared_is_truncated() {
        let set = Mapper::default().forecast(&forecast_doc(2, 4)).unwrap();
        assert_eq!(set.entries.len(), 2);
    }

    #[test]
    fn forecast_without_list_but_with_count_fails() {
        let err = Mapper::default().forecast(&json!({ "cnt": 1 })).unwrap_err();
        assert!(matches!(err, MapError::OutOfBounds { declared: 1, available: 0 }));
    }

    #[test]
    fn forecast_entry_errors_carry_index() {
        let mut doc = forecast_doc(2, 2);
        doc["list"][1]["weather"] = json!([]);

        let err = Mapper::default().forecast(&doc).unwrap_err();
        match err {
            MapError::Entry { index, source } => {
                assert_eq!(index, 1);
                assert!(matches!(*source, MapError::EmptyWeather));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn forecast_wrong_shapes() {
        let err = Mapper::default().forecast(&json!({ "cnt": "40", "list": [] })).unwrap_err();
        assert!(matches!(err, MapError::Structural { ref key, .. } if key == "cnt"));

        let err = Mapper::default().forecast(&json!({ "cnt": 0, "list": {} })).unwrap_err();
        assert!(matches!(err, MapError::Structural { ref key, .. } if key == "list"));
    }

    #[test]
    fn forecast_count_accepts_float_numbers() {
        let set = Mapper::default().forecast(&json!({ "cnt": 1.0, "list": [{}] })).unwrap();
        assert_eq!(set.count, 1);
        assert_eq!(set.entries.len(), 1);

        let set = Mapper::default().forecast(&json!({ "cnt": 1.7, "list": [{}, {}] })).unwrap();
        assert_eq!(set.count, 1);

        let err = Mapper::default().forecast(&json!({ "cnt": -1, "list": [] })).unwrap_err();
        assert!(matches!(err, MapError::Structural { ref key, .. } if key == "cnt"));
    }
}

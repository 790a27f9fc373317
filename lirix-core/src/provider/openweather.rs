use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

use crate::{
    config::OpenWeatherConfig,
    mapper::{Mapper, TimeMode},
    model::{ForecastSet, Location, WeatherSample},
};

use super::WeatherProvider;

/// Client for the OpenWeatherMap 2.5 `weather` and `forecast` endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: String,
    api_key: Option<String>,
    http: Client,
    mapper: Mapper,
}

impl OpenWeatherProvider {
    pub fn new(settings: &OpenWeatherConfig, mapper: Mapper) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            http,
            mapper,
        })
    }

    /// GET `{base_url}/{endpoint}?id=...` and return the body of a successful response.
    async fn fetch(&self, endpoint: &str, location: &Location) -> Result<String> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let mut query = vec![("id", location.id.as_str())];
        if let Some(key) = &self.api_key {
            query.push(("appid", key.as_str()));
        }

        debug!("GET {url} for location {} ({})", location.id, location.name);

        let res = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to send request to OpenWeather ({endpoint})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to read OpenWeather {endpoint} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                endpoint,
                status,
                truncate_body(&body),
            ));
        }

        debug!("OpenWeather {endpoint} answered {status} with {} bytes", body.len());

        Ok(body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, location: &Location) -> Result<WeatherSample> {
        let body = self.fetch("weather", location).await?;

        let sample = self
            .mapper
            .observation_from_str(&body, TimeMode::Instant)
            .with_context(|| format!("Failed to map current weather for {}", location.name))?;

        Ok(sample.located(location))
    }

    async fn forecast(&self, location: &Location) -> Result<ForecastSet> {
        let body = self.fetch("forecast", location).await?;

        let set = self
            .mapper
            .forecast_from_str(&body)
            .with_context(|| format!("Failed to map forecast for {}", location.name))?;

        Ok(set.located(location))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compass::WindDirection, mapper::MapError};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn provider_for(server: &MockServer, api_key: Option<&str>) -> OpenWeatherProvider {
        let settings = OpenWeatherConfig {
            base_url: format!("{}/data/2.5/", server.uri()),
            api_key: api_key.map(str::to_string),
            timeout_secs: 5,
        };
        OpenWeatherProvider::new(&settings, Mapper::default()).unwrap()
    }

    fn moscow() -> Location {
        Location::new("524901", "Moscow, Russia")
    }

    #[tokio::test]
    async fn current_maps_and_attaches_location() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("id", "524901"))
            .and(query_param("appid", "SECRET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"dt":1445000000,"main":{"temp":300.0,"humidity":57.6},
                    "weather":[{"description":"clear sky"}],"wind":{"speed":3.5,"deg":45}}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let sample = provider_for(&server, Some("SECRET")).current(&moscow()).await.unwrap();

        assert_eq!(sample.location_name, "Moscow, Russia");
        assert_eq!(sample.location_id, "524901");
        assert_eq!(sample.temperature, "26.85");
        assert_eq!(sample.description, "clear sky");
        assert_eq!(sample.wind_direction, WindDirection::Ne);
    }

    #[tokio::test]
    async fn forecast_maps_every_entry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .and(query_param("id", "524901"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"cnt":2,"list":[
                    {"dt":1444975200,"main":{"temp":280.0}},
                    {"dt":1444986000,"main":{"temp":281.0}}]}"#,
            ))
            .mount(&server)
            .await;

        let set = provider_for(&server, None).forecast(&moscow()).await.unwrap();

        assert_eq!(set.location_name, "Moscow, Russia");
        assert_eq!(set.count, 2);
        assert_eq!(set.entries[1].target_time, "Fri 9:00am");
        assert_eq!(set.entries[1].location_id, "524901");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string(r#"{"cod":401,"message":"Invalid API key"}"#),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server, None).current(&moscow()).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("401"), "{msg}");
        assert!(msg.contains("Invalid API key"), "{msg}");
    }

    #[tokio::test]
    async fn mapping_errors_stay_typed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"cnt":3,"list":[]}"#))
            .mount(&server)
            .await;

        let err = provider_for(&server, None).forecast(&moscow()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MapError>(),
            Some(MapError::OutOfBounds { declared: 3, available: 0 })
        ));
    }

    #[tokio::test]
    async fn transport_errors_do_not_expose_the_api_key() {
        let settings = OpenWeatherConfig {
            base_url: "http://127.0.0.1:1/data/2.5".to_string(),
            api_key: Some("TOPSECRETKEY".to_string()),
            timeout_secs: 5,
        };
        let provider = OpenWeatherProvider::new(&settings, Mapper::default()).unwrap();

        let err = provider.current(&moscow()).await.unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("Failed to send request to OpenWeather (weather)"), "{msg}");
        assert!(!msg.contains("TOPSECRETKEY"), "{msg}");
        assert!(!msg.contains("appid"), "{msg}");
    }

    #[test]
    fn truncate_body_limits_length() {
        let long = "é".repeat(300);
        let cut = truncate_body(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}

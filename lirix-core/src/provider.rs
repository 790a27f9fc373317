use crate::{
    Config, ForecastSet, Location, WeatherSample, mapper::Mapper,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions and forecasts for a registered location.
///
/// Implementations return samples that already carry the location's name and id.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, location: &Location) -> anyhow::Result<WeatherSample>;

    async fn forecast(&self, location: &Location) -> anyhow::Result<ForecastSet>;
}

/// Construct the OpenWeatherMap provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let mapper = Mapper::new(config.time_zone()?);
    let provider = OpenWeatherProvider::new(&config.openweather, mapper)?;

    Ok(Box::new(provider))
}

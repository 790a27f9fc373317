//! Core library for Lirix, a small weather front end.
//!
//! This crate defines:
//! - The mapping of raw OpenWeatherMap documents into display records
//! - Compass-point classification and timestamp formatting
//! - Configuration & location registry handling
//! - Abstraction over the weather provider, with an OpenWeatherMap client
//!
//! It is used by `lirix-server`, but can also be reused by other binaries or services.

pub mod compass;
pub mod config;
pub mod format;
pub mod mapper;
pub mod model;
pub mod provider;

pub use compass::WindDirection;
pub use config::{Config, OpenWeatherConfig};
pub use mapper::{MapError, Mapper, TimeMode};
pub use model::{ForecastSet, Location, WeatherSample};
pub use provider::{WeatherProvider, provider_from_config};

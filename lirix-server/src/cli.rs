use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use lirix_core::{Config, Location, WeatherSample, provider_from_config};
use log::info;
use std::path::PathBuf;

use crate::{logging, startup};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "lirix", version, about = "Lirix weather front end")]
pub struct Cli {
    /// Path to a config file (TOML). Defaults to the platform config directory.
    #[arg(short, long, global = true, env = "LIRIX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, global = true, env = "LIRIX_LEVEL")]
    pub level: Option<String>,

    /// Defaults to `serve` when absent.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the web front end.
    Serve {
        /// Socket address to listen on, e.g. "127.0.0.1:8080".
        #[arg(long, env = "LIRIX_LISTEN")]
        listen: Option<String>,
    },

    /// Print current weather for one or all configured locations.
    Show {
        /// OpenWeatherMap city id; every configured location when absent.
        location: Option<String>,
    },

    /// Set the OpenWeatherMap API key and display time zone.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = self.load_config()?;

        let level = logging::log_level(self.level.as_deref().or(config.log_level.as_deref()));
        logging::init(level)?;

        match self.command.unwrap_or(Command::Serve { listen: None }) {
            Command::Serve { listen } => {
                if let Some(listen) = listen {
                    config.listen = listen;
                }
                startup::serve(config).await
            }
            Command::Show { location } => show(&config, location.as_deref()).await,
            Command::Configure => configure(config, self.config),
        }
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }
}

async fn show(config: &Config, location_id: Option<&str>) -> anyhow::Result<()> {
    let locations: Vec<&Location> = match location_id {
        Some(id) => vec![config.location(id).ok_or_else(|| {
            anyhow!(
                "Unknown location id '{id}'.\n\
                 Hint: add it under [[locations]] in the config file."
            )
        })?],
        None => config.locations.iter().collect(),
    };

    let provider = provider_from_config(config)?;

    for location in locations {
        match provider.current(location).await {
            Ok(sample) => print_sample(&sample),
            Err(e) => println!("{} ({}): unavailable: {e:#}\n", location.name, location.id),
        }
    }

    Ok(())
}

fn print_sample(sample: &WeatherSample) {
    println!("{} ({})", sample.location_name, sample.location_id);
    println!("  {}", sample.target_time);
    if !sample.description.is_empty() {
        println!("  {}", sample.description);
    }
    if !sample.temperature.is_empty() {
        println!("  Temperature: {} °C", sample.temperature);
    }
    if !sample.humidity.is_empty() {
        println!("  Humidity:    {}%", sample.humidity);
    }
    println!(
        "  Wind:        {:.1} m/s {} (gusts {:.1} m/s)",
        sample.wind_speed, sample.wind_direction, sample.wind_gusts
    );
    println!("  Clouds:      {:.0}%", sample.cloud_coverage);
    if sample.rain_height > 0.0 {
        println!("  Rain (3h):   {:.2} mm", sample.rain_height);
    }
    if sample.snow_height > 0.0 {
        println!("  Snow (3h):   {:.2} mm", sample.snow_height);
    }
    if let (Some(sunrise), Some(sunset)) = (&sample.sunrise_time, &sample.sunset_time) {
        println!("  Sun:         {sunrise} - {sunset}");
    }
    println!();
}

fn configure(mut config: Config, path: Option<PathBuf>) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeatherMap API key (empty to clear):")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(&api_key);

    let timezone = Text::new("Time zone for displayed times:")
        .with_default(&config.timezone)
        .prompt()
        .context("Failed to read time zone")?;
    config.timezone = timezone.trim().to_string();
    config.time_zone()?;

    let saved_to = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };

    info!("Saved configuration to {}", saved_to.display());
    println!("Saved configuration to {}", saved_to.display());

    Ok(())
}

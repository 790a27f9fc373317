use chrono::{SecondsFormat, Utc};
use fern::{
    Dispatch,
    colors::{Color, ColoredLevelConfig},
};
use log::LevelFilter;
use std::env;

/// Resolve the log level: explicit value first, then `RUST_LOG`, then `info`.
pub fn log_level(explicit: Option<&str>) -> LevelFilter {
    let level_str = explicit
        .map(str::to_string)
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    match level_str.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

pub fn setup_logger() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}: {}",
                Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}

/// Install the global logger for the binary.
pub fn init(level: LevelFilter) -> anyhow::Result<()> {
    setup_logger()
        .level(LevelFilter::Warn)
        .level_for("lirix", level)
        .level_for("lirix_server", level)
        .level_for("lirix_core", level)
        .level_for("http_request", level)
        .level_for("http_response", level)
        .apply()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_level_wins() {
        assert_eq!(log_level(Some("debug")), LevelFilter::Debug);
        assert_eq!(log_level(Some("WARN")), LevelFilter::Warn);
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        assert_eq!(log_level(Some("chatty")), LevelFilter::Info);
    }
}

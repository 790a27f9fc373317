use lirix_core::{ForecastSet, Location, WeatherSample, WindDirection};
use maud::{Markup, html};

use crate::templates::{
    components::{detail_href, metres_per_second, millimetres, percent, temperature},
    layout::{CurrentPage, base},
};

/// One card on the overview: either the current conditions or why they are missing.
pub struct OverviewEntry {
    pub location: Location,
    pub outcome: Result<WeatherSample, String>,
}

/// Overview page - current weather for every configured location
pub fn overview_page(entries: &[OverviewEntry]) -> Markup {
    base("Lirix | Overview", CurrentPage::Overview, overview_content(entries))
}

fn overview_content(entries: &[OverviewEntry]) -> Markup {
    html! {
        @if entries.is_empty() {
            div class="has-text-centered has-text-grey py-4" {
                p { "No locations configured." }
            }
        }
        div class="columns is-multiline" {
            @for entry in entries {
                div class="column is-one-third" {
                    div class="box" {
                        h2 class="title is-5" {
                            a href=(detail_href(&entry.location.id)) { (entry.location.name) }
                        }
                        @match &entry.outcome {
                            Ok(sample) => { (current_card(sample)) }
                            Err(reason) => {
                                p class="has-text-danger" { "Weather unavailable" }
                                p class="is-size-7 has-text-grey" { (reason) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn current_card(sample: &WeatherSample) -> Markup {
    html! {
        p class="is-size-7 has-text-grey mb-2" { (sample.target_time) }
        p class="is-size-3" { (temperature(&sample.temperature)) }
        @if !sample.description.is_empty() {
            p class="mb-2" { (sample.description) }
        }
        table class="table is-narrow is-fullwidth" {
            tbody {
                tr { th { "Humidity" } td { (percent(&sample.humidity)) } }
                tr { th { "Wind" } td { (metres_per_second(sample.wind_speed)) " " (wind_label(sample.wind_direction)) } }
                tr { th { "Gusts" } td { (metres_per_second(sample.wind_gusts)) } }
                tr { th { "Clouds" } td { (format!("{:.0}%", sample.cloud_coverage)) } }
                @if sample.rain_height > 0.0 {
                    tr { th { "Rain (3h)" } td { (millimetres(sample.rain_height)) } }
                }
                @if sample.snow_height > 0.0 {
                    tr { th { "Snow (3h)" } td { (millimetres(sample.snow_height)) } }
                }
                @if let Some(sunrise) = &sample.sunrise_time {
                    tr { th { "Sunrise" } td { (sunrise) } }
                }
                @if let Some(sunset) = &sample.sunset_time {
                    tr { th { "Sunset" } td { (sunset) } }
                }
            }
        }
    }
}

fn wind_label(direction: WindDirection) -> Markup {
    html! {
        @if direction.is_known() {
            span class="tag is-info is-light" { (direction.as_str()) }
        } @else {
            span class="tag is-light" title="No usable wind bearing" { (direction.as_str()) }
        }
    }
}

/// Detail page - forecast table for one location
pub fn detail_page(forecast: &ForecastSet) -> Markup {
    base("Lirix | Detail", CurrentPage::Detail, detail_content(forecast))
}

fn detail_content(forecast: &ForecastSet) -> Markup {
    html! {
        div class="box" {
            h2 class="title is-4" { (forecast.location_name) }
            p class="subtitle is-6 has-text-grey" {
                (forecast.count) " forecast entries, city id " (forecast.location_id)
            }
            @if forecast.entries.is_empty() {
                div class="has-text-centered has-text-grey py-4" {
                    p { "No forecast data available." }
                }
            } @else {
                div class="table-container" {
                    table class="table is-fullwidth is-striped is-hoverable" {
                        thead {
                            tr {
                                th { "Time" }
                                th class="has-text-right" { "Temp" }
                                th class="has-text-right" { "Humidity" }
                                th { "Conditions" }
                                th class="has-text-right" { "Wind" }
                                th class="has-text-right" { "Gusts" }
                                th class="has-text-right" { "Clouds" }
                                th class="has-text-right" { "Rain" }
                                th class="has-text-right" { "Snow" }
                            }
                        }
                        tbody {
                            @for entry in &forecast.entries {
                                tr {
                                    td { (entry.target_time) }
                                    td class="has-text-right" { (temperature(&entry.temperature)) }
                                    td class="has-text-right" { (percent(&entry.humidity)) }
                                    td { (entry.description) }
                                    td class="has-text-right" {
                                        (metres_per_second(entry.wind_speed)) " " (wind_label(entry.wind_direction))
                                    }
                                    td class="has-text-right" { (metres_per_second(entry.wind_gusts)) }
                                    td class="has-text-right" { (format!("{:.0}%", entry.cloud_coverage)) }
                                    td class="has-text-right" { (millimetres(entry.rain_height)) }
                                    td class="has-text-right" { (millimetres(entry.snow_height)) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn about_page() -> Markup {
    base(
        "Lirix | About",
        CurrentPage::About,
        html! {
            div class="content box" {
                h2 class="title is-4" { "About Lirix" }
                p {
                    "Lirix shows the current weather for a handful of cities and a three-hourly "
                    "forecast for each of them. All data comes from the OpenWeatherMap API and is "
                    "fetched fresh on every page view."
                }
                p {
                    "The list of cities is part of the server configuration; each one is identified "
                    "by its OpenWeatherMap city id."
                }
            }
        },
    )
}

pub fn help_page() -> Markup {
    base(
        "Lirix | Help",
        CurrentPage::Help,
        html! {
            div class="content box" {
                h2 class="title is-4" { "Reading the weather" }
                dl {
                    dt { strong { "Temperature" } }
                    dd { "Degrees Celsius, two decimals. A dash means the provider sent no value." }
                    dt { strong { "Humidity" } }
                    dd { "Relative humidity in percent, rounded to a whole number." }
                    dt { strong { "Wind" } }
                    dd {
                        "Speed in metres per second followed by one of sixteen compass points "
                        "(N, NNE, NE, ENE, E, ESE, SE, SSE, S, SSW, SW, WSW, W, WNW, NW, NNW). "
                        code { "Unavailable" } " means no bearing was reported; "
                        code { "UNDEFINED" } " means the reported bearing was out of range."
                    }
                    dt { strong { "Gusts" } }
                    dd { "Peak wind speed in metres per second, zero when not reported." }
                    dt { strong { "Clouds" } }
                    dd { "Share of the sky covered by clouds." }
                    dt { strong { "Rain / Snow" } }
                    dd { "Precipitation over a three hour window, in millimetres." }
                }
                p {
                    "Click a city name on the overview to open its forecast."
                }
            }
        },
    )
}

pub fn error_page(heading: &str, message: &str) -> Markup {
    base(
        "Lirix | Error",
        CurrentPage::Detail,
        html! {
            div class="notification is-danger is-light" {
                p class="title is-5" { (heading) }
                p { (message) }
                p class="mt-3" { a href="/" { "Back to the overview" } }
            }
        },
    )
}

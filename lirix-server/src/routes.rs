use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use futures::future::join_all;
use log::{error, warn};
use serde::Deserialize;

use crate::{
    AppState,
    templates::{OverviewEntry, about_page, detail_page, error_page, help_page, overview_page},
};

/// Handler for the overview page (GET /)
///
/// Every location is fetched concurrently; a failed fetch only affects its own card.
pub async fn overview_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    let provider = &state.provider;

    let fetches = state.locations.iter().map(|location| async move {
        let outcome = provider.current(location).await.map_err(|e| {
            warn!("current weather for {} ({}) failed: {e:#}", location.name, location.id);
            format!("{e:#}")
        });
        OverviewEntry { location: location.clone(), outcome }
    });

    let entries = join_all(fetches).await;
    Html(overview_page(&entries).into_string())
}

#[derive(Debug, Deserialize)]
pub struct DetailParams {
    pub location: Option<String>,
}

/// Handler for the forecast page (GET /detail?location=ID)
pub async fn detail_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DetailParams>,
) -> Response {
    let Some(location) = params.location.as_deref().and_then(|id| state.location(id)) else {
        return not_found(&format!(
            "No configured location with id '{}'.",
            params.location.as_deref().unwrap_or_default()
        ));
    };

    match state.provider.forecast(location).await {
        Ok(forecast) => Html(detail_page(&forecast).into_string()).into_response(),
        Err(e) => {
            error!("forecast for {} ({}) failed: {e:#}", location.name, location.id);
            (
                StatusCode::BAD_GATEWAY,
                Html(error_page("Forecast unavailable", &format!("{e:#}")).into_string()),
            )
                .into_response()
        }
    }
}

pub async fn about_handler() -> Html<String> {
    Html(about_page().into_string())
}

pub async fn help_handler() -> Html<String> {
    Html(help_page().into_string())
}

pub async fn not_found_handler() -> Response {
    not_found("The page you asked for does not exist.")
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Html(error_page("Not found", message).into_string())).into_response()
}

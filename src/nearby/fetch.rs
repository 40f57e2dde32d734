use crate::app_config::AppConfig;
use crate::domain::Coordinate;
use crate::nearby::Page;
use crate::nearby::domain::query_response::QueryResponse;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{info, instrument, warn};

/// Fetches the pages around `coordinate`, sorted by title. Transport failures and server errors are
/// retried up to the configured number of times, anything else fails immediately.
#[instrument(skip(client, config))]
pub async fn fetch_nearby(client: &Client, config: &AppConfig, coordinate: Coordinate) -> Result<Vec<Page>, NearbyError> {
    info!("🌍 Retrieving nearby places...");

    let strategy = ExponentialBackoff::from_millis(config.nearby().retry_ms())
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(config.nearby().max_retries());

    let response = RetryIf::spawn(
        strategy,
        || request_pages(client, config, coordinate),
        |e: &NearbyError| {
            let transient = e.is_transient();
            if transient {
                warn!("⚠️ Retrieving nearby places failed: {}. Retrying...", e);
            }
            transient
        },
    )
    .await?;

    let mut pages = response
        .query
        .map(|query| query.pages.into_values().map(Page::from).collect::<Vec<_>>())
        .unwrap_or_default();
    pages.sort_by(|a, b| a.title.cmp(&b.title));

    info!("🌍 Retrieving nearby places... OK, {} found", pages.len());
    Ok(pages)
}

async fn request_pages(client: &Client, config: &AppConfig, coordinate: Coordinate) -> Result<QueryResponse, NearbyError> {
    let nearby = config.nearby();
    let response = client
        .get(nearby.url())
        .query(&[
            ("ggscoord", format!("{}|{}", coordinate.latitude, coordinate.longitude)),
            ("action", "query".to_string()),
            ("prop", "coordinates|pageimages|pageterms".to_string()),
            ("colimit", nearby.limit().to_string()),
            ("piprop", "thumbnail".to_string()),
            ("pithumbsize", "500".to_string()),
            ("pilimit", nearby.limit().to_string()),
            ("wbptterms", "description".to_string()),
            ("generator", "geosearch".to_string()),
            ("ggsradius", nearby.radius_m().to_string()),
            ("ggslimit", nearby.limit().to_string()),
            ("format", "json".to_string()),
        ])
        .send()
        .await
        .map_err(NearbyError::Transport)?
        .error_for_status()
        .map_err(NearbyError::Status)?;

    let body = response.bytes().await.map_err(NearbyError::Transport)?;
    serde_json::from_slice::<QueryResponse>(&body).map_err(NearbyError::Decode)
}

#[derive(Error, Debug)]
pub enum NearbyError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("unexpected response status: {0}")]
    Status(#[source] reqwest::Error),
    #[error("unable to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl NearbyError {
    fn is_transient(&self) -> bool {
        match self {
            NearbyError::Transport(_) => true,
            NearbyError::Status(e) => e.status().is_some_and(|status| status.is_server_error()),
            NearbyError::Decode(_) => false,
        }
    }
}

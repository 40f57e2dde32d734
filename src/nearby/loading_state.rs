use crate::app_config::AppConfig;
use crate::domain::Coordinate;
use crate::nearby::{Page, fetch_nearby};
use reqwest::Client;
use tracing::{instrument, warn};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadingState {
    #[default]
    Loading,
    Loaded(Vec<Page>),
    Failed,
}

#[instrument(skip(client, config))]
pub async fn load_nearby(client: &Client, config: &AppConfig, coordinate: Coordinate) -> LoadingState {
    match fetch_nearby(client, config, coordinate).await {
        Ok(pages) => LoadingState::Loaded(pages),
        Err(e) => {
            warn!("⚠️ Unable to load nearby places: {}", e);
            LoadingState::Failed
        }
    }
}

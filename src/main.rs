use crate::app_config::AppConfig;
use crate::auth::{AuthGate, AuthState, ConsoleAuthenticator};
use crate::domain::commands::Command;
use crate::nearby::{LoadingState, load_nearby};
use crate::store::{LocationStore, SyncState};
use crate::store_listener::store_listener;
use tokio::task;
use tracing::{info, warn};

mod app_config;
mod auth;
mod coordinate_deserializer;
mod domain;
mod extensions;
mod nearby;
mod persistence;
mod store;
mod store_listener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let command = Command::parse(std::env::args().skip(1))?;

    let config = AppConfig::load()?;
    info!("✅  Loaded configuration");

    let map = config.map();
    let start = map.start_position();
    info!(style = ?map.style(), "🗺️ Map centered on ({}, {}), span {}°", start.latitude, start.longitude, map.span_degrees());

    let gate = AuthGate::new(ConsoleAuthenticator::stdin(), config.auth().reason());
    match gate.authenticate().await? {
        AuthState::Unlocked => info!("✅  Unlocked places"),
        AuthState::DeniedPermission => {
            if let Some(remediation) = gate.remediation().await {
                warn!(settings = %remediation.settings_url, "⚠️ {}: {}", remediation.title, remediation.message);
            }
            return Ok(());
        }
        AuthState::Locked => {
            info!("🔒 Places remain locked");
            return Ok(());
        }
    }

    let mut store = LocationStore::open(config.storage().path());
    info!(path = %store.path().display(), "✅  Initialized store with {} place(s)", store.len());

    let listener = task::spawn(store_listener(store.subscribe()));
    info!("✅  Initialized store listener");

    match command {
        Command::List => {
            if store.is_empty() {
                info!("📌 No places saved yet");
            }
            for location in store.locations() {
                info!(id = %location.id, "📌 {} ({}, {}): {}", location.name, location.latitude, location.longitude, location.description);
            }
        }
        Command::Add(coordinate) => {
            store.add(coordinate);
        }
        Command::Edit { id, name, description } => match store.get(id) {
            Some(selected) => {
                let edited = selected.edited(name, description);
                store.update(Some(id), edited);
            }
            None => warn!(id = %id, "⚠️ No place with id '{}'", id),
        },
        Command::Nearby { id } => {
            let selected = match id {
                Some(id) => store.get(id),
                None => store.locations().first(),
            };
            let coordinate = selected.map(|location| location.coordinate()).unwrap_or(start);

            let client = nearby::new_client(&config)?;
            info!("🌍 Nearby: {:?}", LoadingState::Loading);
            match load_nearby(&client, &config, coordinate).await {
                LoadingState::Loaded(pages) => {
                    for page in pages {
                        info!(pageid = page.pageid, "🌍 {}: {}", page.title, page.description);
                    }
                }
                LoadingState::Failed => warn!("⚠️ Please try again later."),
                LoadingState::Loading => {}
            }
        }
    }

    if store.sync_state() == SyncState::Unsynced {
        warn!("⚠️ Changes could not be saved to {}", store.path().display());
    }

    drop(store);
    listener.await?;

    info!("👋 {} finished", env!("CARGO_PKG_NAME"));
    Ok(())
}

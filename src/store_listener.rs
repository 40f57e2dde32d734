use crate::store::LocationSnapshot;
use tokio::sync::watch::Receiver;
use tracing::{info, instrument};

/// Follows the store until it is dropped, logging each published collection.
#[instrument(skip_all)]
pub async fn store_listener(mut rx: Receiver<LocationSnapshot>) -> usize {
    let mut updates = 0;
    while rx.changed().await.is_ok() {
        let snapshot: LocationSnapshot = rx.borrow_and_update().clone();
        updates += 1;
        info!("🗺️ Showing {} place(s)", snapshot.len());
        for location in snapshot.iter() {
            info!(id = %location.id, "📌 {} ({}, {}): {}", location.name, location.latitude, location.longitude, location.description);
        }
    }
    updates
}

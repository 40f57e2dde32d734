use crate::domain::{Coordinate, Location};
use crate::extensions::path_ext::FileName;
use crate::persistence::{JsonFileGateway, PersistenceGateway};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::sync::watch::{Receiver as WatchReceiver, Sender as WatchSender};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

pub type LocationSnapshot = Arc<Vec<Location>>;

/// Whether the in-memory collection matches the last write to disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncState {
    Synced,
    Unsynced,
}

/// The ordered collection of saved locations. Every mutation rewrites the whole collection through
/// the gateway and publishes a snapshot to subscribers. A failed write is logged and leaves the
/// in-memory collection in place, the store then reports [`SyncState::Unsynced`].
#[derive(Debug)]
pub struct LocationStore<G: PersistenceGateway = JsonFileGateway> {
    locations: Vec<Location>,
    path: PathBuf,
    gateway: G,
    sync_state: SyncState,
    notifier_tx: WatchSender<LocationSnapshot>,
    notifier_rx: WatchReceiver<LocationSnapshot>,
}

impl LocationStore<JsonFileGateway> {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        LocationStore::new(path, JsonFileGateway)
    }
}

impl<G: PersistenceGateway> LocationStore<G> {
    pub fn new(path: impl Into<PathBuf>, gateway: G) -> Self {
        let path = path.into();
        let locations = load(&gateway, &path);
        let (notifier_tx, notifier_rx) = watch::channel::<LocationSnapshot>(Arc::new(locations.clone()));

        LocationStore {
            locations,
            path,
            gateway,
            sync_state: SyncState::Synced,
            notifier_tx,
            notifier_rx,
        }
    }

    pub fn subscribe(&self) -> WatchReceiver<LocationSnapshot> {
        self.notifier_rx.clone()
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn get(&self, id: Uuid) -> Option<&Location> {
        self.locations.iter().find(|location| location.id == id)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn sync_state(&self) -> SyncState {
        self.sync_state
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a location named "New Location" at `coordinate`.
    #[instrument(skip(self))]
    pub fn add(&mut self, coordinate: Coordinate) -> &Location {
        let location = Location::at(coordinate);
        info!(id = %location.id, "📍 Added location at ({}, {})", coordinate.latitude, coordinate.longitude);

        self.locations.push(location);
        self.save();
        self.notify();

        &self.locations[self.locations.len() - 1]
    }

    /// Replaces the location with `previous_id` by `new_location`, keeping its position. Returns the
    /// index of the replaced location, or `None` when nothing was selected or nothing matched.
    #[instrument(skip(self, new_location), fields(new_id = %new_location.id))]
    pub fn update(&mut self, previous_id: Option<Uuid>, new_location: Location) -> Option<usize> {
        let Some(previous_id) = previous_id else {
            info!("No location selected");
            return None;
        };

        let Some(index) = self.locations.iter().position(|location| location.id == previous_id) else {
            debug!(previous_id = %previous_id, "No location found to update");
            return None;
        };

        info!(previous_id = %previous_id, "📍 Updated location '{}' at index {}", new_location.name, index);
        self.locations[index] = new_location;
        self.save();
        self.notify();

        Some(index)
    }

    #[instrument(skip(self), fields(file = self.path.string_file_name(), count = self.locations.len()))]
    pub fn save(&mut self) {
        match self.gateway.write_all(&self.path, &self.locations) {
            Ok(()) => {
                debug!("💾 Saving locations... OK");
                self.sync_state = SyncState::Synced;
            }
            Err(e) => {
                warn!("⚠️ Unable to save data: {}", e);
                self.sync_state = SyncState::Unsynced;
            }
        }
    }

    fn notify(&self) {
        self.notifier_tx.send(Arc::new(self.locations.clone())).unwrap_or_default();
    }
}

#[instrument(skip(gateway), fields(file = path.string_file_name()))]
fn load<G: PersistenceGateway>(gateway: &G, path: &Path) -> Vec<Location> {
    match gateway.read_all(path) {
        Ok(locations) => {
            info!("💾 Loading locations... OK, {} found", locations.len());
            locations
        }
        Err(e) => {
            warn!("⚠️ Loading locations... failed, starting empty: {}", e);
            Vec::new()
        }
    }
}

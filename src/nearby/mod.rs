mod client;
mod domain;
mod fetch;
mod loading_state;
mod page;

pub use client::{ClientError, new_client};
pub use fetch::{NearbyError, fetch_nearby};
pub use loading_state::{LoadingState, load_nearby};
pub use page::Page;

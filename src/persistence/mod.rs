mod gateway;
mod json_file_gateway;

pub use gateway::{PersistenceError, PersistenceGateway};
pub use json_file_gateway::JsonFileGateway;

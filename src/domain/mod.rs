pub mod commands;
mod coordinate;
mod location;
mod map_style;

pub use coordinate::Coordinate;
pub use location::Location;
pub use map_style::MapStyle;

use serde::de::Error;
use serde::{Deserialize, Deserializer};

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub enum MapStyle {
    #[default]
    Standard,
    Imagery,
    Hybrid,
}

impl MapStyle {
    /// Maps a picker index to a style, unknown indices fall back to `Standard`.
    pub fn from_index(index: i64) -> Self {
        match index {
            1 => MapStyle::Imagery,
            2 => MapStyle::Hybrid,
            _ => MapStyle::Standard,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "standard" => Some(MapStyle::Standard),
            "imagery" => Some(MapStyle::Imagery),
            "hybrid" => Some(MapStyle::Hybrid),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for MapStyle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Inner {
            Index(i64),
            Name(String),
        }

        match Inner::deserialize(deserializer)? {
            Inner::Index(index) => Ok(MapStyle::from_index(index)),
            Inner::Name(name) => match name.parse::<i64>() {
                Ok(index) => Ok(MapStyle::from_index(index)),
                Err(_) => MapStyle::from_name(&name).ok_or_else(|| {
                    Error::custom(format!("invalid map style '{}', expected standard, imagery or hybrid", name))
                }),
            },
        }
    }
}

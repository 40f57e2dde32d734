use crate::domain::Coordinate;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, PartialEq)]
pub enum Command {
    List,
    Add(Coordinate),
    Edit { id: Uuid, name: String, description: String },
    Nearby { id: Option<Uuid> },
}

impl Command {
    pub fn parse<I, S>(args: I) -> Result<Self, CommandError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args = args.into_iter().map(|arg| arg.as_ref().to_string()).collect::<Vec<_>>();
        let Some((name, rest)) = args.split_first() else {
            return Ok(Command::List);
        };

        match (name.as_str(), rest) {
            ("list", []) => Ok(Command::List),
            ("add", [latitude, longitude]) => Ok(Command::Add(Coordinate::new(
                parse_degrees(latitude, -90.0..=90.0)?,
                parse_degrees(longitude, -180.0..=180.0)?,
            ))),
            ("edit", [id, name]) => Ok(Command::Edit {
                id: parse_id(id)?,
                name: name.clone(),
                description: String::new(),
            }),
            ("edit", [id, name, description]) => Ok(Command::Edit {
                id: parse_id(id)?,
                name: name.clone(),
                description: description.clone(),
            }),
            ("nearby", []) => Ok(Command::Nearby { id: None }),
            ("nearby", [id]) => Ok(Command::Nearby { id: Some(parse_id(id)?) }),
            _ => Err(CommandError::Usage),
        }
    }
}

fn parse_degrees(value: &str, range: std::ops::RangeInclusive<f64>) -> Result<f64, CommandError> {
    match value.parse::<f64>() {
        Ok(degrees) if range.contains(&degrees) => Ok(degrees),
        _ => Err(CommandError::InvalidCoordinate(value.to_string())),
    }
}

fn parse_id(value: &str) -> Result<Uuid, CommandError> {
    Uuid::parse_str(value).map_err(|_| CommandError::InvalidId(value.to_string()))
}

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("usage: [list | add <latitude> <longitude> | edit <id> <name> [description] | nearby [id]]")]
    Usage,
    #[error("invalid coordinate '{0}'")]
    InvalidCoordinate(String),
    #[error("invalid location id '{0}'")]
    InvalidId(String),
}

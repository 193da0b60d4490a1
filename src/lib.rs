use std::path::PathBuf;

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError};
use serde::Deserialize;

pub mod domain;
pub mod infrastructure;

#[derive(Clone, Debug, Deserialize)]
pub struct HotelConfig {
    pub storage: Storage,
    pub logger: Logger,
}

impl HotelConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(config::File::with_name("hotel.toml").required(false))
            .add_source(config::Environment::with_prefix("HOTEL").separator("_"))
            .build()?
            .try_deserialize::<HotelConfig>()
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("storage.rooms", "rooms.json")?
            .set_default("storage.bookings", "bookings.json")?
            .set_default("logger.level", "INFO")
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Storage {
    pub rooms: PathBuf,
    pub bookings: PathBuf,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Logger {
    pub level: Level,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub enum Level {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl From<&Level> for tracing::Level {
    fn from(value: &Level) -> Self {
        match value {
            Level::TRACE => tracing::Level::TRACE,
            Level::DEBUG => tracing::Level::DEBUG,
            Level::INFO => tracing::Level::INFO,
            Level::WARN => tracing::Level::WARN,
            Level::ERROR => tracing::Level::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::Builder;

    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = HotelConfig::builder()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize::<HotelConfig>()
            .unwrap();
        assert_eq!(config.storage.rooms, PathBuf::from("rooms.json"));
        assert_eq!(config.storage.bookings, PathBuf::from("bookings.json"));
        assert_eq!(config.logger.level, Level::INFO);
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[storage]\nrooms = \"/var/lib/hotel/rooms.json\"\n\n[logger]\nlevel = \"DEBUG\""
        )
        .unwrap();
        let config = HotelConfig::builder()
            .unwrap()
            .add_source(config::File::from(file.path()))
            .build()
            .unwrap()
            .try_deserialize::<HotelConfig>()
            .unwrap();
        assert_eq!(
            config.storage.rooms,
            PathBuf::from("/var/lib/hotel/rooms.json")
        );
        assert_eq!(config.storage.bookings, PathBuf::from("bookings.json"));
        assert_eq!(tracing::Level::from(&config.logger.level), tracing::Level::DEBUG);
    }
}

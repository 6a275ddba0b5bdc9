use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::models::pix::PixKeyType;

#[derive(Debug, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Merchant {
    pub name: String,
    pub city: String,
    pub pix_key: String,
    pub pix_key_type: PixKeyType,
}

#[derive(Debug, Deserialize)]
pub struct Txid {
    pub prefix: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub merchant: Merchant,
    pub txid: Txid,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .build()?;

        config.try_deserialize()
    }
}

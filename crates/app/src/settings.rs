//! Handles settings for the application. Configuration is read from
//! `esencias.toml` (optional) and from `ESENCIAS__*` environment variables,
//! e.g. `ESENCIAS__APP__LEVEL=debug` or `ESENCIAS__SALES__OVERHEAD_COST=2.5`.
//!
//! See `esencias.toml` for an example.
use std::collections::HashMap;

use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "esencias.toml";
const DEFAULT_SQLITE_PATH: &str = "./esencias.db";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite(DEFAULT_SQLITE_PATH.to_string())
    }
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Sales {
    /// Overhead charged on sales that do not pass one.
    pub overhead_cost: Decimal,
}

/// Display name of a product that may no longer exist.
#[derive(Debug, Deserialize)]
pub struct KnownProduct {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub database: Database,
    pub sales: Sales,
    pub known_products: Vec<KnownProduct>,
}

impl Settings {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("ESENCIAS").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn known_product_names(&self) -> HashMap<String, String> {
        self.known_products
            .iter()
            .map(|known| (known.id.clone(), known.name.clone()))
            .collect()
    }
}

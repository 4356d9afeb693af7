use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_INCOME_CSV: &str =
    "https://raw.githubusercontent.com/pri-data/50-states/master/data/income-counties-states-national.csv";
pub const DEFAULT_STATES_GEOJSON: &str =
    "https://raw.githubusercontent.com/python-visualization/folium-example-data/main/us_states.json";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub input: InputConfig,
    pub style: StyleConfig,
    pub map: MapConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InputConfig {
    pub income_csv: Source,
    pub states_geojson: Source,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            income_csv: Source::parse(DEFAULT_INCOME_CSV),
            states_geojson: Source::parse(DEFAULT_STATES_GEOJSON),
        }
    }
}

/// Location of a payload: fetched over HTTP or read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    File(PathBuf),
}

impl Source {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Source::Url(raw.to_string())
        } else {
            Source::File(PathBuf::from(raw))
        }
    }
}

impl<'de> Deserialize<'de> for Source {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Source::parse(&raw))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => f.write_str(url),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Cosmetic switches. Neither changes what the dashboard computes.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StyleConfig {
    pub banner_background: String,
    pub overlay: OverlayFill,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            banner_background: "white".to_string(),
            overlay: OverlayFill::Transparent,
        }
    }
}

/// Fill of the tooltip layer drawn over the choropleth.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OverlayFill {
    #[default]
    Transparent,
    LightGreen,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MapConfig {
    pub width: u32,
    pub height: u32,
    pub center: [f64; 2], // lat, lon
    pub zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 700,
            height: 500,
            center: [37.8, -96.0],
            zoom: 4,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }

    /// Reads `path` when given, otherwise falls back to the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Failed to fetch {location}: {err}")]
    Fetch {
        location: String,
        #[source]
        err: reqwest::Error,
    },
    #[error("Fetching {location} returned HTTP {status}")]
    Status {
        location: String,
        status: reqwest::StatusCode,
    },
    #[error("Failed to read {location}: {err}")]
    Io {
        location: String,
        #[source]
        err: std::io::Error,
    },
    #[error("Malformed income CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Malformed GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("GeoJSON must be a FeatureCollection")]
    NotFeatureCollection,
    #[error("Template rendering failed: {0}")]
    Template(#[from] minijinja::Error),
    #[error("Unknown state: {0}")]
    UnknownState(String),
    #[error("Income data contains no recognisable state")]
    NoStates,
}

pub type Result<T> = std::result::Result<T, DashboardError>;

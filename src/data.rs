use crate::config::{InputConfig, Source};
use crate::error::{DashboardError, Result};
use crate::processing;
use crate::types::IncomeRecord;
use csv::ReaderBuilder;
use geojson::{FeatureCollection, GeoJson};
use serde::Deserialize;
use tracing::{debug, info};

/// A CSV row exactly as published. Every cell stays a string so FIPS codes
/// keep their zero padding and malformed numbers survive until normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawIncomeRow {
    pub fips: String,
    pub state: String,
    pub county: String,
    #[serde(rename = "income-2015")]
    pub income_2015: String,
    #[serde(rename = "income-1989a")]
    pub income_1989a: String,
    #[serde(rename = "income-1989b")]
    pub income_1989b: String,
}

/// Everything one render needs.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<IncomeRecord>,
    pub states: FeatureCollection,
}

/// Fetches both payloads and normalizes the income rows. There is no cache:
/// every call goes back to the sources.
pub async fn load_dataset(client: &reqwest::Client, input: &InputConfig) -> Result<Dataset> {
    info!("Loading income data from {}", input.income_csv);
    let csv_text = fetch_text(client, &input.income_csv).await?;
    let records = processing::normalize(parse_income_csv(&csv_text)?);
    debug!("Loaded {} county rows", records.len());

    info!("Loading state boundaries from {}", input.states_geojson);
    let geojson_text = fetch_text(client, &input.states_geojson).await?;
    let states = parse_states_geojson(&geojson_text)?;
    debug!("Loaded {} state features", states.features.len());

    Ok(Dataset { records, states })
}

pub async fn fetch_text(client: &reqwest::Client, source: &Source) -> Result<String> {
    match source {
        Source::Url(url) => {
            let response = client.get(url).send().await.map_err(|err| DashboardError::Fetch {
                location: url.clone(),
                err,
            })?;

            if !response.status().is_success() {
                return Err(DashboardError::Status {
                    location: url.clone(),
                    status: response.status(),
                });
            }

            response.text().await.map_err(|err| DashboardError::Fetch {
                location: url.clone(),
                err,
            })
        }
        Source::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|err| DashboardError::Io {
                    location: path.display().to_string(),
                    err,
                })
        }
    }
}

pub fn parse_income_csv(text: &str) -> Result<Vec<RawIncomeRow>> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: RawIncomeRow = result?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn parse_states_geojson(text: &str) -> Result<FeatureCollection> {
    let geojson: GeoJson = text.parse()?;
    match geojson {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        _ => Err(DashboardError::NotFeatureCollection),
    }
}

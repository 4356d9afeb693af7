//! Joins state medians onto the boundary features and describes the two map
//! layers (colour-graded choropleth, tooltip overlay) for the browser.

use crate::config::{MapConfig, OverlayFill, StyleConfig};
use crate::types::StateMedian;
use geojson::FeatureCollection;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// ColorBrewer YlGn, five classes.
pub const PALETTE: [&str; 5] = ["#ffffcc", "#c2e699", "#78c679", "#31a354", "#006837"];
pub const NO_DATA_FILL: &str = "black";
pub const FILL_OPACITY: f64 = 0.7;
pub const LINE_OPACITY: f64 = 0.2;
pub const LEGEND_NAME: &str = "Median Income 2015 (USD)";

pub const NAME_PROPERTY: &str = "name";
pub const MEDIAN_PROPERTY: &str = "medianincome";
/// Injected for features with no matching state median.
pub const UNMATCHED_MEDIAN: f64 = 0.0;

/// Equal-width classes between the smallest and largest value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorScale {
    pub edges: [f64; 6],
}

impl ColorScale {
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) = values
            .into_iter()
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;

        let step = (max - min) / PALETTE.len() as f64;
        let mut edges = [0.0; 6];
        for (i, edge) in edges.iter_mut().enumerate() {
            *edge = min + step * i as f64;
        }
        edges[5] = max;
        Some(Self { edges })
    }

    pub fn color_for(&self, value: f64) -> &'static str {
        let class = self.edges[1..5].iter().take_while(|edge| value > **edge).count();
        PALETTE[class]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub title: &'static str,
    pub colors: [&'static str; 5],
    pub edges: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethLayer {
    pub key_on: &'static str,
    /// Feature name -> fill colour.
    pub fills: BTreeMap<String, &'static str>,
    pub fill_opacity: f64,
    pub line_opacity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TooltipLayer {
    pub fill_color: &'static str,
    pub fill_opacity: f64,
    pub color: &'static str,
    pub weight: u32,
    pub fields: [&'static str; 2],
    pub aliases: [&'static str; 2],
}

impl TooltipLayer {
    pub fn new(overlay: OverlayFill) -> Self {
        let (fill_color, fill_opacity) = match overlay {
            OverlayFill::Transparent => ("transparent", 0.0),
            OverlayFill::LightGreen => ("lightgreen", FILL_OPACITY),
        };
        Self {
            fill_color,
            fill_opacity,
            color: "black",
            weight: 1,
            fields: [NAME_PROPERTY, MEDIAN_PROPERTY],
            aliases: ["State:", "Median Income:"],
        }
    }
}

/// Everything the browser needs to draw the map.
#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethMap {
    pub geojson: FeatureCollection,
    pub choropleth: ChoroplethLayer,
    pub tooltip: TooltipLayer,
    pub legend: Option<Legend>,
    pub center: [f64; 2],
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
}

/// Writes `medianincome` onto every feature, matching the feature name
/// against the canonical state name exactly.
pub fn enrich_features(states: &mut FeatureCollection, medians: &[StateMedian]) {
    let lookup: HashMap<&str, Option<f64>> = medians
        .iter()
        .map(|m| (m.state.as_str(), m.median_income))
        .collect();

    for feature in &mut states.features {
        let name = feature_name(feature);
        let value = match name.as_deref().and_then(|n| lookup.get(n)) {
            Some(Some(median)) => *median,
            Some(None) => UNMATCHED_MEDIAN,
            None => {
                warn!("No income data for feature {:?}", name);
                UNMATCHED_MEDIAN
            }
        };
        feature.set_property(MEDIAN_PROPERTY, value);
    }
}

fn feature_name(feature: &geojson::Feature) -> Option<String> {
    feature
        .property(NAME_PROPERTY)
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

pub fn build_map(
    mut states: FeatureCollection,
    medians: &[StateMedian],
    style: &StyleConfig,
    map: &MapConfig,
) -> ChoroplethMap {
    enrich_features(&mut states, medians);

    let scale = ColorScale::from_values(medians.iter().filter_map(|m| m.median_income));
    let by_state: HashMap<&str, f64> = medians
        .iter()
        .filter_map(|m| m.median_income.map(|v| (m.state.as_str(), v)))
        .collect();

    let fills = states
        .features
        .iter()
        .filter_map(feature_name)
        .map(|name| {
            let fill = match (by_state.get(name.as_str()), scale.as_ref()) {
                (Some(value), Some(scale)) => scale.color_for(*value),
                _ => NO_DATA_FILL,
            };
            (name, fill)
        })
        .collect();

    ChoroplethMap {
        geojson: states,
        choropleth: ChoroplethLayer {
            key_on: "feature.properties.name",
            fills,
            fill_opacity: FILL_OPACITY,
            line_opacity: LINE_OPACITY,
        },
        tooltip: TooltipLayer::new(style.overlay),
        legend: scale.map(|scale| Legend {
            title: LEGEND_NAME,
            colors: PALETTE,
            edges: scale.edges.to_vec(),
        }),
        center: map.center,
        zoom: map.zoom,
        width: map.width,
        height: map.height,
    }
}

use crate::choropleth::{self, ChoroplethMap};
use crate::config::AppConfig;
use crate::data::Dataset;
use crate::error::{DashboardError, Result};
use crate::processing;
use crate::types::{CountyRow, CountyTable};
use minijinja::Environment;
use serde::Serialize;

pub const TITLE: &str = "US State Median Income Map";
const DASHBOARD_TEMPLATE: &str = include_str!("../templates/dashboard.html");

/// `$` followed by the whole-dollar amount with thousands separators.
/// Missing values render as `n/a`.
pub fn format_currency(value: Option<f64>) -> String {
    let Some(value) = value else {
        return "n/a".to_string();
    };

    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, digit) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if value < 0.0 && rounded != "0" {
        format!("$-{}", grouped)
    } else {
        format!("${}", grouped)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    pub county: String,
    pub income_1989: String,
    pub income_2015: String,
    pub is_median: bool,
}

impl TableRow {
    fn new(row: &CountyRow, is_median: bool) -> Self {
        Self {
            county: row.county.clone(),
            income_1989: format_currency(row.income_1989),
            income_2015: format_currency(row.income_2015),
            is_median,
        }
    }
}

/// One fully computed page.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub title: &'static str,
    pub banner_background: String,
    pub states: Vec<String>,
    pub selected: String,
    pub rows: Vec<TableRow>,
    pub map: ChoroplethMap,
}

impl DashboardView {
    /// Runs aggregation and map building for one render. `selected` defaults
    /// to the first state in alphabetical order.
    pub fn build(dataset: Dataset, selected: Option<&str>, config: &AppConfig) -> Result<Self> {
        let states = processing::state_names(&dataset.records);
        let selected = match selected {
            Some(name) => name.to_string(),
            None => states.first().cloned().ok_or(DashboardError::NoStates)?,
        };

        let table = processing::county_table(&dataset.records, &selected)
            .ok_or_else(|| DashboardError::UnknownState(selected.clone()))?;

        let medians = processing::state_medians(&dataset.records);
        let map = choropleth::build_map(dataset.states, &medians, &config.style, &config.map);

        Ok(Self {
            title: TITLE,
            banner_background: config.style.banner_background.clone(),
            states,
            selected,
            rows: table_rows(&table),
            map,
        })
    }
}

pub fn table_rows(table: &CountyTable) -> Vec<TableRow> {
    table
        .counties
        .iter()
        .map(|row| TableRow::new(row, false))
        .chain(std::iter::once(TableRow::new(&table.median, true)))
        .collect()
}

pub fn render_dashboard(view: &DashboardView) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("dashboard.html", DASHBOARD_TEMPLATE)?;
    let html = env.get_template("dashboard.html")?.render(view)?;
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{parse_states_geojson, RawIncomeRow};

    fn dataset() -> Dataset {
        let row = |state: &str, county: &str, income: &str| RawIncomeRow {
            fips: "00000".to_string(),
            state: state.to_string(),
            county: county.to_string(),
            income_2015: income.to_string(),
            income_1989a: "20,000".to_string(),
            income_1989b: "".to_string(),
        };
        Dataset {
            records: processing::normalize(vec![
                row("OR", "Benton", "30000"),
                row("ME", "Knox <East>", "61,000"),
                row("OR", "Clatsop", "50000"),
                row("OR", "Coos", "40000"),
            ]),
            states: parse_states_geojson(
                r#"{"type":"FeatureCollection","features":[
                    {"type":"Feature","properties":{"name":"Oregon"},"geometry":null},
                    {"type":"Feature","properties":{"name":"Maine"},"geometry":null}
                ]}"#,
            )
            .unwrap(),
        }
    }

    #[test]
    fn currency_format() {
        assert_eq!(format_currency(Some(45000.0)), "$45,000");
        assert_eq!(format_currency(Some(999.4)), "$999");
        assert_eq!(format_currency(Some(1234567.0)), "$1,234,567");
        assert_eq!(format_currency(Some(0.0)), "$0");
        assert_eq!(format_currency(Some(-1500.0)), "$-1,500");
        assert_eq!(format_currency(None), "n/a");
    }

    #[test]
    fn view_defaults_to_first_state() {
        let view = DashboardView::build(dataset(), None, &AppConfig::default()).unwrap();
        assert_eq!(view.states, ["Maine", "Oregon"]);
        assert_eq!(view.selected, "Maine");
        assert_eq!(view.rows.len(), 2);
    }

    #[test]
    fn view_for_selected_state() {
        let view = DashboardView::build(dataset(), Some("Oregon"), &AppConfig::default()).unwrap();
        let last = view.rows.last().unwrap();
        assert!(last.is_median);
        assert_eq!(last.county, "Median");
        assert_eq!(last.income_2015, "$40,000");
        assert_eq!(last.income_1989, "$20,000");
    }

    #[test]
    fn unknown_state_is_rejected() {
        let err = DashboardView::build(dataset(), Some("Atlantis"), &AppConfig::default())
            .unwrap_err();
        assert!(matches!(err, DashboardError::UnknownState(name) if name == "Atlantis"));
    }

    #[test]
    fn renders_page() {
        let mut config = AppConfig::default();
        config.style.banner_background = "red".to_string();
        let view = DashboardView::build(dataset(), Some("Maine"), &config).unwrap();
        let html = render_dashboard(&view).unwrap();

        assert!(html.contains("background-color:red"));
        assert!(html.contains(r#"<option value="Maine" selected>Maine</option>"#));
        assert!(html.contains("Knox &lt;East&gt;"));
        assert!(html.contains("$61,000"));
        assert!(html.contains("width:700px; height:500px;"));
        assert!(html.contains("medianincome"));
    }
}

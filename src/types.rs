use serde::Serialize;

/// One county row after normalization. Missing incomes are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeRecord {
    pub fips: String,
    pub county: String,
    pub state_raw: String,
    pub state_name: Option<String>,
    pub state_abbr: Option<String>,
    pub income_1989a: Option<f64>,
    pub income_1989b: Option<f64>,
    pub income_1989: Option<f64>,
    pub income_2015: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateMedian {
    pub state: String,
    #[serde(rename = "medianincome")]
    pub median_income: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountyRow {
    pub county: String,
    #[serde(rename = "income-1989")]
    pub income_1989: Option<f64>,
    #[serde(rename = "income-2015")]
    pub income_2015: Option<f64>,
}

/// Counties of one state followed by the cross-county median row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountyTable {
    pub state: String,
    pub counties: Vec<CountyRow>,
    pub median: CountyRow,
}

impl CountyTable {
    pub fn rows(&self) -> impl Iterator<Item = &CountyRow> {
        self.counties.iter().chain(std::iter::once(&self.median))
    }
}

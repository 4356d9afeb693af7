use crate::data::RawIncomeRow;
use crate::states::StateKeyFormat;
use crate::types::{CountyRow, CountyTable, IncomeRecord, StateMedian};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

pub const MEDIAN_LABEL: &str = "Median";

/// Parses an income cell. Thousands separators are stripped; anything that
/// is not a finite number becomes missing.
pub fn parse_income(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Mean of the values that are present; `None` when none are.
pub fn mean_present(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    Some(present.iter().sum::<f64>() / present.len() as f64)
}

/// Median of the present values; `None` when none are.
pub fn median<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut sorted: Vec<f64> = values.into_iter().flatten().collect();
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    if n % 2 == 0 {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    } else {
        Some(sorted[n / 2])
    }
}

pub fn normalize(rows: Vec<RawIncomeRow>) -> Vec<IncomeRecord> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    let format = StateKeyFormat::detect(&first.state);
    debug!("State column keyed by {:?}", format);

    rows.into_iter()
        .map(|row| {
            let (state_name, state_abbr) = format.resolve(&row.state);
            let income_1989a = parse_income(&row.income_1989a);
            let income_1989b = parse_income(&row.income_1989b);

            IncomeRecord {
                fips: row.fips,
                county: row.county,
                state_raw: row.state,
                state_name,
                state_abbr,
                income_1989a,
                income_1989b,
                income_1989: mean_present(&[income_1989a, income_1989b]),
                income_2015: parse_income(&row.income_2015),
            }
        })
        .collect()
}

/// Median 2015 income per canonical state name, sorted by name.
pub fn state_medians(records: &[IncomeRecord]) -> Vec<StateMedian> {
    let mut groups: BTreeMap<&str, Vec<Option<f64>>> = BTreeMap::new();
    for record in records {
        if let Some(name) = record.state_name.as_deref() {
            groups.entry(name).or_default().push(record.income_2015);
        }
    }

    groups
        .into_iter()
        .map(|(state, incomes)| StateMedian {
            state: state.to_string(),
            median_income: median(incomes),
        })
        .collect()
}

/// Distinct canonical state names in alphabetical order.
pub fn state_names(records: &[IncomeRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.state_name.as_deref())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Counties of `state` in source order, plus the median row.
/// `None` when no record belongs to `state`.
pub fn county_table(records: &[IncomeRecord], state: &str) -> Option<CountyTable> {
    let counties: Vec<CountyRow> = records
        .iter()
        .filter(|r| r.state_name.as_deref() == Some(state))
        .map(|r| CountyRow {
            county: r.county.clone(),
            income_1989: r.income_1989,
            income_2015: r.income_2015,
        })
        .collect();

    if counties.is_empty() {
        return None;
    }

    let median = CountyRow {
        county: MEDIAN_LABEL.to_string(),
        income_1989: median(counties.iter().map(|c| c.income_1989)),
        income_2015: median(counties.iter().map(|c| c.income_2015)),
    };

    Some(CountyTable {
        state: state.to_string(),
        counties,
        median,
    })
}

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::loader::{RawRecord, RawTable};
use super::model::{Dataset, Observation};

/// Date-only layouts accepted in the `dia` column.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// Date-time layouts accepted in the `dia` column; the time part is dropped.
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Output of the normalization pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub dataset: Dataset,
    /// Rows whose date could not be parsed.
    pub dropped: usize,
}

/// Parse a raw `dia` cell into a calendar date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// A `NaN` or infinite cell counts as missing.
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Turn raw rows into observations, dropping rows with unparseable dates.
///
/// Row order is preserved. The number of dropped rows is returned rather than
/// one error per row.
pub fn normalize(table: &RawTable) -> Normalized {
    let observations: Vec<Observation> = table
        .records
        .iter()
        .filter_map(|rec| {
            let date = parse_date(&rec.date)?;
            Some(Observation {
                date,
                pollution: present(rec.pollution),
                traffic: present(rec.traffic),
                green_area: present(rec.green_area),
            })
        })
        .collect();

    let dropped = table.len() - observations.len();
    if dropped > 0 {
        log::warn!("Dropped {dropped} of {} rows with unparseable dates", table.len());
    }

    Normalized {
        dataset: Dataset::new(observations),
        dropped,
    }
}

#[cfg(test)]
impl From<&Observation> for RawRecord {
    /// Canonical text form (`YYYY-MM-DD`) of an observation.
    fn from(obs: &Observation) -> Self {
        RawRecord {
            date: obs.date.format("%Y-%m-%d").to_string(),
            pollution: obs.pollution,
            traffic: obs.traffic,
            green_area: obs.green_area,
        }
    }
}

#[cfg(test)]
impl From<&Dataset> for RawTable {
    fn from(dataset: &Dataset) -> Self {
        RawTable {
            records: dataset.observations.iter().map(RawRecord::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(date: &str, p: f64) -> RawRecord {
        RawRecord {
            date: date.to_string(),
            pollution: Some(p),
            traffic: Some(1.0),
            green_area: None,
        }
    }

    #[test]
    fn parses_supported_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(parse_date("2024-03-09"), expected);
        assert_eq!(parse_date("2024/03/09"), expected);
        assert_eq!(parse_date("09/03/2024"), expected);
        assert_eq!(parse_date(" 2024-03-09 "), expected);
        assert_eq!(parse_date("2024-03-09T17:45:00"), expected);
        assert_eq!(parse_date("2024-03-09 23:59:59"), expected);
        assert_eq!(parse_date("2024-03-09T10:00:00+02:00"), expected);
    }

    #[test]
    fn rejects_invalid_dates() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("2024-13-01"), None);
    }

    #[test]
    fn drops_bad_rows_and_keeps_order() {
        let table = RawTable {
            records: vec![
                raw("2024-01-03", 3.0),
                raw("garbage", 99.0),
                raw("2024-01-01", 1.0),
                raw("", 98.0),
                raw("2024-01-02", 2.0),
            ],
        };
        let out = normalize(&table);
        assert_eq!(out.dropped, 2);
        let dates: Vec<String> = out
            .dataset
            .observations
            .iter()
            .map(|o| o.date.to_string())
            .collect();
        assert_eq!(dates, ["2024-01-03", "2024-01-01", "2024-01-02"]);
        assert_eq!(out.dataset.observations[0].pollution, Some(3.0));
        assert_eq!(out.dataset.observations[0].green_area, None);
    }

    #[test]
    fn nan_cells_are_missing() {
        let mut rec = raw("2024-01-01", f64::NAN);
        rec.traffic = Some(2.0);
        let out = normalize(&RawTable { records: vec![rec] });
        assert_eq!(out.dataset.observations[0].pollution, None);
        assert_eq!(out.dataset.observations[0].traffic, Some(2.0));
    }

    #[test]
    fn infinite_cells_are_missing() {
        let mut rec = raw("2024-01-01", f64::INFINITY);
        rec.traffic = Some(f64::NEG_INFINITY);
        rec.green_area = Some(3.0);
        let out = normalize(&RawTable { records: vec![rec] });
        let obs = &out.dataset.observations[0];
        assert_eq!(obs.pollution, None);
        assert_eq!(obs.traffic, None);
        assert_eq!(obs.green_area, Some(3.0));
    }

    #[test]
    fn normalization_is_idempotent() {
        let table = RawTable {
            records: vec![
                raw("05/01/2024", 5.0),
                raw("2024-01-06T08:00:00", 6.0),
                raw("nope", 0.0),
                raw("2024/01/07", 7.0),
            ],
        };
        let first = normalize(&table);
        let second = normalize(&RawTable::from(&first.dataset));
        assert_eq!(second.dropped, 0);
        assert_eq!(second.dataset, first.dataset);

        let third = normalize(&RawTable::from(&second.dataset));
        assert_eq!(third.dataset, second.dataset);
    }
}

use chrono::NaiveDate;

use super::model::{Dataset, Indicator};

/// One indicator column as `(date, value)` points, ready for a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator: Indicator,
    pub points: Vec<(NaiveDate, f64)>,
}

impl IndicatorSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Extract one indicator. Rows with a missing value are skipped; order is kept.
pub fn select(dataset: &Dataset, indicator: Indicator) -> IndicatorSeries {
    IndicatorSeries {
        indicator,
        points: dataset
            .observations
            .iter()
            .filter_map(|obs| obs.value(indicator).map(|v| (obs.date, v)))
            .collect(),
    }
}

/// Extract several indicators, in the order requested.
pub fn select_many(dataset: &Dataset, indicators: &[Indicator]) -> Vec<IndicatorSeries> {
    indicators.iter().map(|&ind| select(dataset, ind)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Observation;

    #[test]
    fn selects_present_values_only() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let ds = Dataset::new(vec![
            Observation { date: d2, pollution: Some(20.0), traffic: Some(5.0), green_area: None },
            Observation { date: d1, pollution: None, traffic: Some(6.0), green_area: None },
        ]);

        assert_eq!(select(&ds, Indicator::Pollution).points, vec![(d2, 20.0)]);
        assert!(select(&ds, Indicator::GreenArea).is_empty());

        let many = select_many(&ds, &[Indicator::Traffic, Indicator::Pollution]);
        assert_eq!(many[0].indicator, Indicator::Traffic);
        assert_eq!(many[0].points, vec![(d2, 5.0), (d1, 6.0)]);
        assert_eq!(many[1].indicator, Indicator::Pollution);
    }
}

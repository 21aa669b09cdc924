use statrs::statistics::Statistics;

use crate::data::model::{Dataset, Indicator};

/// Symmetric Pearson matrix over [`Indicator::ALL`], in that order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationMatrix {
    pub values: [[f64; 3]; 3],
}

impl CorrelationMatrix {
    pub fn get(&self, a: Indicator, b: Indicator) -> f64 {
        self.values[a.index()][b.index()]
    }
}

/// Pearson coefficient over the rows where both indicators are present.
///
/// Fewer than two complete pairs or a zero-variance side gives NaN.
pub fn pearson(dataset: &Dataset, a: Indicator, b: Indicator) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = dataset
        .observations
        .iter()
        .filter_map(|obs| Some((obs.value(a)?, obs.value(b)?)))
        .unzip();

    if xs.len() < 2 {
        return f64::NAN;
    }

    let denom = xs.iter().std_dev() * ys.iter().std_dev();
    if denom == 0.0 {
        return f64::NAN;
    }
    (xs.iter().covariance(ys.iter()) / denom).clamp(-1.0, 1.0)
}

/// Pairwise correlations of the three indicators. The diagonal is always 1.0.
pub fn correlation_matrix(dataset: &Dataset) -> CorrelationMatrix {
    let mut values = [[1.0; 3]; 3];
    for (i, &a) in Indicator::ALL.iter().enumerate() {
        for (j, &b) in Indicator::ALL.iter().enumerate().skip(i + 1) {
            let r = pearson(dataset, a, b);
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    CorrelationMatrix { values }
}

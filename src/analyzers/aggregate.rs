use crate::analyzers::types::{Headways, Summary};
use crate::analyzers::utility::{mean, median, stddev};

/// Reduces a station's headways to mean, median and population standard deviation.
///
/// `NoData`, `Empty` and an empty value list all yield [`Summary::unavailable`],
/// so the zero sentinel never feeds into real arithmetic.
pub fn summarize(headways: &Headways) -> Summary {
    let values: Vec<f64> = headways.values().iter().map(|&h| f64::from(h)).collect();
    if values.is_empty() {
        return Summary::unavailable();
    }

    let avg = mean(&values);
    Summary {
        mean: avg,
        median: median(&values),
        std_dev: stddev(&values, avg),
        available: true,
    }
}

use crate::analyzers::types::{Headways, NoDataReason, Predictions};

/// Converts arrival offsets into the gaps between consecutive vehicles.
///
/// Predictions are sorted first, so every gap is non-negative even if the
/// API listed vehicles out of order. An empty minute list is the same as
/// no predictions at all.
pub fn derive_headways(predictions: Predictions) -> Headways {
    let mut minutes = match predictions {
        Predictions::NoData(reason) => return Headways::NoData(reason),
        Predictions::Minutes(m) if m.is_empty() => {
            return Headways::NoData(NoDataReason::NoPredictions);
        }
        Predictions::Minutes(m) if m.len() == 1 => return Headways::Empty,
        Predictions::Minutes(m) => m,
    };

    minutes.sort_unstable();
    Headways::Values(minutes.windows(2).map(|w| w[1] - w[0]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unsorted_predictions() {
        let headways = derive_headways(Predictions::Minutes(vec![10, 4, 7]));
        assert_eq!(headways, Headways::Values(vec![3, 3]));
    }

    #[test]
    fn test_single_prediction_is_empty() {
        assert_eq!(derive_headways(Predictions::Minutes(vec![4])), Headways::Empty);
    }

    #[test]
    fn test_empty_minutes_count_as_no_predictions() {
        assert_eq!(
            derive_headways(Predictions::Minutes(vec![])),
            Headways::NoData(NoDataReason::NoPredictions)
        );
    }

    #[test]
    fn test_no_data_passes_through() {
        let headways = derive_headways(Predictions::NoData(NoDataReason::NoPredictions));
        assert_eq!(headways, Headways::NoData(NoDataReason::NoPredictions));
    }

    #[test]
    fn test_bunched_vehicles_give_zero_headway() {
        let headways = derive_headways(Predictions::Minutes(vec![6, 6]));
        assert_eq!(headways, Headways::Values(vec![0]));
        assert_ne!(headways, Headways::Empty);
    }

    proptest! {
        #[test]
        fn prop_one_fewer_headway_than_predictions(
            minutes in prop::collection::vec(0u32..240, 2..40)
        ) {
            let n = minutes.len();
            let headways = derive_headways(Predictions::Minutes(minutes.clone()));

            let Headways::Values(values) = headways else {
                panic!("expected values for {n} predictions");
            };
            prop_assert_eq!(values.len(), n - 1);

            let mut sorted = minutes;
            sorted.sort_unstable();
            let span: u32 = values.iter().sum();
            prop_assert_eq!(span, sorted[n - 1] - sorted[0]);
        }
    }
}

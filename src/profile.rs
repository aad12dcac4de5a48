//! Per-event synchrony profiles
//!
//! One stimulation event's unit windows go in, one population-normalized
//! [`SyncProfile`] comes out. Events with fewer than two firing units
//! produce nothing; they reduce the aggregate sample set instead of
//! failing.

use crate::config::WindowConfig;
use crate::sync::{SpikeTrain, SyncMeasure};
use crate::types::{StimulationEvent, SyncProfile};

/// Compute the normalized synchrony profile of one stimulation event
///
/// Units with empty windows carry no information about this event and are
/// left out; the remaining windows become spike trains bounded by the
/// extraction edges. The measure's curve values are then divided by the
/// number of trains supplied, exactly the population that produced them,
/// so every profile value lands in [0, 1] regardless of how many units an
/// event had.
///
/// Returns `None` when fewer than two units fired, or when the measure
/// yields no samples.
pub fn event_profile(
    event: &StimulationEvent,
    config: &WindowConfig,
    measure: &dyn SyncMeasure,
) -> Option<SyncProfile> {
    let trains: Vec<SpikeTrain> = event
        .unit_windows
        .values()
        .filter(|times| !times.is_empty())
        .map(|times| SpikeTrain::new(times.clone(), config.edges()))
        .collect();

    if trains.len() < 2 {
        return None;
    }

    let (mut values, positions) = measure.profile(&trains);
    if values.is_empty() {
        return None;
    }

    let population = trains.len() as f64;
    for value in &mut values {
        *value /= population;
    }

    Some(SyncProfile { values, positions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::SpikeSync;
    use std::collections::BTreeMap;

    fn event(windows: &[(&str, &[f64])]) -> StimulationEvent {
        StimulationEvent {
            index: 0,
            onset_sample: 0,
            unit_windows: windows
                .iter()
                .map(|(id, times)| (id.to_string(), times.to_vec()))
                .collect(),
        }
    }

    /// Fixed three-sample curve, for checking the normalization divisor
    struct ConstantMeasure;

    impl SyncMeasure for ConstantMeasure {
        fn profile(&self, _trains: &[SpikeTrain]) -> (Vec<f64>, Vec<f64>) {
            (vec![1.0, 1.0, 1.0], vec![-1.2, 0.0, 1.9])
        }

        fn scalar(&self, _trains: &[SpikeTrain]) -> f64 {
            1.0
        }
    }

    #[test]
    fn test_divides_by_contributing_unit_count() {
        // Four units in the map, one silent: the divisor is the three
        // supplied trains, not the map size.
        let event = event(&[
            ("a", &[0.1]),
            ("b", &[0.2]),
            ("c", &[0.3]),
            ("silent", &[]),
        ]);
        let profile = event_profile(&event, &WindowConfig::default(), &ConstantMeasure).unwrap();

        assert_eq!(profile.values.len(), 3);
        for value in &profile.values {
            assert!((value - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_profile_values_stay_in_unit_interval() {
        let event = event(&[("a", &[0.1, 0.5, 0.9]), ("b", &[0.11, 0.52, 1.4])]);
        let profile = event_profile(&event, &WindowConfig::default(), &SpikeSync).unwrap();

        assert!(!profile.values.is_empty());
        assert!(profile.values.iter().all(|&v| (0.0..=1.0).contains(&v)));
        // Positions are the measure's adaptive samples, strictly increasing
        assert!(profile.positions.windows(2).all(|p| p[1] > p[0]));
    }

    #[test]
    fn test_identical_pair_normalizes_to_half() {
        let event = event(&[("a", &[0.1, 0.5]), ("b", &[0.1, 0.5])]);
        let profile = event_profile(&event, &WindowConfig::default(), &SpikeSync).unwrap();

        // Raw coincidence 1.0 everywhere, divided by 2 trains
        assert!(profile.values.iter().all(|&v| (v - 0.5).abs() < 1e-12));
    }

    #[test]
    fn test_single_firing_unit_contributes_nothing() {
        let event = event(&[("a", &[0.1, 0.5]), ("silent", &[])]);
        assert!(event_profile(&event, &WindowConfig::default(), &SpikeSync).is_none());
    }

    #[test]
    fn test_all_units_silent_contributes_nothing() {
        let event = event(&[("a", &[]), ("b", &[])]);
        assert!(event_profile(&event, &WindowConfig::default(), &SpikeSync).is_none());
    }

    #[test]
    fn test_empty_event_contributes_nothing() {
        let event = StimulationEvent {
            index: 3,
            onset_sample: 100,
            unit_windows: BTreeMap::new(),
        };
        assert!(event_profile(&event, &WindowConfig::default(), &SpikeSync).is_none());
    }
}

//! Cross-event aggregation
//!
//! Per-event profiles have measure-chosen, unequal lengths, so averaging
//! them first goes through a [`ProfileAlignment`] strategy that reduces
//! them to a common length. The shipped strategy truncates to the shortest
//! profile; an interpolating strategy could be substituted without touching
//! the rest of the pipeline.

use crate::config::WindowConfig;
use crate::sync::{SpikeTrain, SyncMeasure};
use crate::types::{SessionAggregate, StimulationEvent, SyncProfile};

/// Policy for reducing variable-length profiles to one common length
pub trait ProfileAlignment {
    /// Value sequences of equal length, ready for elementwise averaging
    fn align(&self, profiles: &[SyncProfile]) -> Vec<Vec<f64>>;
}

/// Truncate every profile to the shortest profile's length
///
/// Tail samples of longer profiles are discarded rather than interpolated,
/// a deliberate precision trade-off: the tail of the extraction window
/// loses resolution in the average, but every retained index averages
/// values from every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TruncateToShortest;

impl ProfileAlignment for TruncateToShortest {
    fn align(&self, profiles: &[SyncProfile]) -> Vec<Vec<f64>> {
        let min_length = profiles
            .iter()
            .map(|p| p.values.len())
            .min()
            .unwrap_or(0);
        profiles
            .iter()
            .map(|p| p.values[..min_length].to_vec())
            .collect()
    }
}

/// Elementwise mean profile and its overall mean
///
/// Zero profiles yield `(vec![], 0.0)`, the defined degenerate for a
/// session where no event had two firing units.
pub fn average_profiles(
    profiles: &[SyncProfile],
    alignment: &dyn ProfileAlignment,
) -> (Vec<f64>, f64) {
    if profiles.is_empty() {
        return (Vec::new(), 0.0);
    }

    let aligned = alignment.align(profiles);
    let length = aligned.first().map_or(0, Vec::len);
    if length == 0 {
        return (Vec::new(), 0.0);
    }

    let count = aligned.len() as f64;
    let avg_profile: Vec<f64> = (0..length)
        .map(|i| aligned.iter().map(|p| p[i]).sum::<f64>() / count)
        .collect();
    let avg_scalar = avg_profile.iter().sum::<f64>() / avg_profile.len() as f64;

    (avg_profile, avg_scalar)
}

/// Whole-session synchrony, event boundaries ignored
///
/// Pools every unit window of every event into one train set, empty
/// windows included, and takes the measure's scalar over all of them.
/// Fewer than two trains leave synchrony undefined; the result is then 0.
pub fn session_scalar(
    events: &[StimulationEvent],
    config: &WindowConfig,
    measure: &dyn SyncMeasure,
) -> f64 {
    let trains: Vec<SpikeTrain> = events
        .iter()
        .flat_map(|event| event.unit_windows.values())
        .map(|times| SpikeTrain::new(times.clone(), config.edges()))
        .collect();

    if trains.len() < 2 {
        return 0.0;
    }
    measure.scalar(&trains)
}

/// Reduce one session's events and profiles into a [`SessionAggregate`]
pub fn aggregate_session(
    events: &[StimulationEvent],
    profiles: &[SyncProfile],
    config: &WindowConfig,
    measure: &dyn SyncMeasure,
    alignment: &dyn ProfileAlignment,
) -> SessionAggregate {
    let (avg_profile, avg_scalar) = average_profiles(profiles, alignment);
    let adaptive_intervals = profiles.iter().flat_map(SyncProfile::intervals).collect();
    let session_scalar_sync = session_scalar(events, config, measure);

    SessionAggregate {
        avg_profile,
        avg_scalar,
        adaptive_intervals,
        session_scalar_sync,
    }
}

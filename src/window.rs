//! Event-aligned window extraction
//!
//! For every stimulation entry of a recording this module carves out, per
//! unit, the spikes falling inside the configured window around the
//! stimulus onset and rescales them to seconds relative to that onset.
//! Entries without a usable onset are skipped; the resulting event count is
//! reported so a shrinking extraction does not pass silently.

use crate::config::WindowConfig;
use crate::types::{Recording, StimulationEvent};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Extract one [`StimulationEvent`] per usable stimulus entry
///
/// The extraction window is `[onset + pre_stimulus_s * rate, onset +
/// full_post_stimulus_s * rate]` in sample indices, truncated toward zero
/// on conversion and inclusive at both ends. Stimulus trains anchor at
/// their first sample; empty trains yield no event, so the output may be
/// shorter than `stim_onsets` (logged as a warning, never an error).
pub fn extract_events(recording: &Recording, config: &WindowConfig) -> Vec<StimulationEvent> {
    let pre_samples = (config.pre_stimulus_s * recording.sampling_rate) as i64;
    let post_samples = (config.full_post_stimulus_s * recording.sampling_rate) as i64;

    let mut events = Vec::with_capacity(recording.stim_onsets.len());

    for (index, entry) in recording.stim_onsets.iter().enumerate() {
        let Some(onset) = entry.onset() else {
            debug!("stimulus entry {index} has no timestamps, skipping");
            continue;
        };

        let start = onset + pre_samples;
        let end = onset + post_samples;

        let mut unit_windows = BTreeMap::new();
        for (unit_id, spikes) in &recording.unit_spikes {
            let times = window_times(spikes, start, end, onset, recording.sampling_rate);
            unit_windows.insert(unit_id.clone(), times);
        }

        events.push(StimulationEvent {
            index,
            onset_sample: onset,
            unit_windows,
        });
    }

    info!(
        "total number of stimulation events: {}",
        recording.stim_onsets.len()
    );
    if events.len() != recording.stim_onsets.len() {
        warn!(
            "extracted windows for {} stimulation events, expected {}",
            events.len(),
            recording.stim_onsets.len()
        );
    }

    events
}

/// Spikes in `[start, end]` rescaled to seconds relative to `onset`
///
/// `spikes` must be sorted ascending (the loader guarantees this), which
/// turns the window selection into a binary range search.
fn window_times(spikes: &[i64], start: i64, end: i64, onset: i64, sampling_rate: f64) -> Vec<f64> {
    let lo = spikes.partition_point(|&t| t < start);
    let hi = spikes.partition_point(|&t| t <= end);
    spikes[lo..hi]
        .iter()
        .map(|&t| (t - onset) as f64 / sampling_rate)
        .collect()
}

//! Core types for the stimsync pipeline
//!
//! This module defines the data structures that flow through each stage of
//! the pipeline: raw recordings, per-event spike windows, per-event synchrony
//! profiles, and session-level aggregates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A stimulus entry as stored in a recording file
///
/// Recordings encode each stimulation either as a single sample index or as
/// a train of sample indices belonging to one stimulus presentation. Only
/// the first sample of a train anchors the event; later samples are
/// redundant repeats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StimulusEntry {
    /// One stimulation timestamp (sample index)
    Single(i64),
    /// A stimulus train of timestamps
    Group(Vec<i64>),
}

impl StimulusEntry {
    /// Sample index anchoring this stimulation, `None` for an empty train
    pub fn onset(&self) -> Option<i64> {
        match self {
            StimulusEntry::Single(sample) => Some(*sample),
            StimulusEntry::Group(samples) => samples.first().copied(),
        }
    }
}

/// One session's raw recording, as decoded from a session file
///
/// Spike sequences are kept sorted ascending by the loader so that window
/// extraction can range-search them. Unit iteration order is the map order,
/// which keeps every derived result deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    /// Spike timestamps per unit, in sample indices
    #[serde(rename = "unit_spike_train_dict")]
    pub unit_spikes: BTreeMap<String, Vec<i64>>,
    /// One entry per stimulation
    #[serde(rename = "stim_trains")]
    pub stim_onsets: Vec<StimulusEntry>,
    /// Samples per second
    pub sampling_rate: f64,
}

/// Spike times of every unit around one stimulation event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StimulationEvent {
    /// Position of the stimulus entry in the recording
    pub index: usize,
    /// Onset sample index the windows are anchored to
    pub onset_sample: i64,
    /// Per-unit spike times in seconds relative to onset; every unit of the
    /// recording appears here, empty windows included
    pub unit_windows: BTreeMap<String, Vec<f64>>,
}

/// Time-resolved synchrony curve for one stimulation event
///
/// The length is chosen by the synchrony measure, not the caller, so
/// profiles of different events differ in length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncProfile {
    /// Normalized synchrony values, each in [0, 1]
    pub values: Vec<f64>,
    /// Sample positions in seconds, strictly increasing
    pub positions: Vec<f64>,
}

impl SyncProfile {
    /// Consecutive differences of the sample positions
    ///
    /// These are the adaptive time windows the synchrony measure chose for
    /// this event; the batch histogram pools them across events.
    pub fn intervals(&self) -> Vec<f64> {
        self.positions
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .collect()
    }
}

/// Session-level reduction of all per-event profiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionAggregate {
    /// Elementwise mean of the per-event profiles after alignment
    pub avg_profile: Vec<f64>,
    /// Mean of `avg_profile`, 0.0 when no event produced a profile
    pub avg_scalar: f64,
    /// Adaptive sample intervals pooled across all events
    pub adaptive_intervals: Vec<f64>,
    /// Whole-session synchrony over all unit windows, event boundaries ignored
    pub session_scalar_sync: f64,
}

/// One processed session's contribution to the cross-session comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    /// Filename stem up to the first `.`
    pub session_name: String,
    /// Whole-session synchrony value
    pub session_scalar_sync: f64,
}

//! Per-session pipeline orchestration
//!
//! One recording goes through the staged pipeline: window extraction →
//! per-event synchrony profiles → cross-event aggregation. Every stage is
//! a pure transform; the batch processor drives this once per session
//! file.

use crate::aggregate::{self, ProfileAlignment};
use crate::config::WindowConfig;
use crate::error::AnalysisError;
use crate::loader;
use crate::profile;
use crate::sync::SyncMeasure;
use crate::types::{Recording, SessionAggregate, SyncProfile};
use crate::window;
use std::path::Path;
use tracing::debug;

/// Run the full analysis over one loaded recording
pub fn analyze_recording(
    recording: &Recording,
    config: &WindowConfig,
    measure: &dyn SyncMeasure,
    alignment: &dyn ProfileAlignment,
) -> SessionAggregate {
    // Stage 1: per-event spike windows
    let events = window::extract_events(recording, config);

    // Stage 2: normalized synchrony profile per qualifying event
    let profiles: Vec<SyncProfile> = events
        .iter()
        .filter_map(|event| {
            let profile = profile::event_profile(event, config, measure);
            match &profile {
                Some(p) => debug!(
                    "event {}: profile with {} samples",
                    event.index,
                    p.values.len()
                ),
                None => debug!("event {}: fewer than two firing units, skipped", event.index),
            }
            profile
        })
        .collect();

    // Stage 3: cross-event aggregation plus the whole-session scalar
    aggregate::aggregate_session(&events, &profiles, config, measure, alignment)
}

/// Load one recording file and analyze it
pub fn analyze_file(
    path: &Path,
    config: &WindowConfig,
    measure: &dyn SyncMeasure,
    alignment: &dyn ProfileAlignment,
) -> Result<SessionAggregate, AnalysisError> {
    let recording = loader::load_recording(path)?;
    Ok(analyze_recording(&recording, config, measure, alignment))
}

//! Recording file loading
//!
//! Decodes one JSON document per session into a [`Recording`] and parses the
//! session name and date out of the filename convention
//! `<label>_<DD-Mon-YYYY>.<ext>` (e.g. `ICMS92_10-Aug-2023.json`). The date
//! token is load-bearing: the batch processor orders sessions by it.

use crate::error::AnalysisError;
use crate::types::Recording;
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

/// Date format encoded in recording filenames
const SESSION_DATE_FORMAT: &str = "%d-%b-%Y";

/// Decode one session's recording file
pub fn load_recording(path: &Path) -> Result<Recording, AnalysisError> {
    let json = fs::read_to_string(path)
        .map_err(|e| AnalysisError::ReadError(format!("{}: {e}", path.display())))?;
    parse_recording(&json)
}

/// Decode a recording from its JSON text
///
/// Rejects non-positive sampling rates and sorts every unit's spike
/// sequence ascending, which window extraction relies on.
pub fn parse_recording(json: &str) -> Result<Recording, AnalysisError> {
    let mut recording: Recording = serde_json::from_str(json)?;

    if !recording.sampling_rate.is_finite() || recording.sampling_rate <= 0.0 {
        return Err(AnalysisError::ShapeError(format!(
            "sampling_rate must be positive, got {}",
            recording.sampling_rate
        )));
    }

    for spikes in recording.unit_spikes.values_mut() {
        spikes.sort_unstable();
    }

    Ok(recording)
}

/// Session name for a recording path: the filename up to the first `.`
pub fn session_name(path: &Path) -> String {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    file_name.split('.').next().unwrap_or(file_name).to_string()
}

/// Session date from the filename convention `<label>_<DD-Mon-YYYY>.<ext>`
///
/// The date is the second `_`-separated field of the filename stem. A
/// missing or malformed token is fatal: ordering sessions by anything other
/// than their real dates would corrupt the cross-session comparison.
pub fn session_date(path: &Path) -> Result<NaiveDate, AnalysisError> {
    let name = session_name(path);
    let token = name.split('_').nth(1).ok_or_else(|| {
        AnalysisError::DateParseError(format!(
            "{}: expected a <label>_<DD-Mon-YYYY> filename",
            path.display()
        ))
    })?;

    NaiveDate::parse_from_str(token, SESSION_DATE_FORMAT).map_err(|e| {
        AnalysisError::DateParseError(format!("{}: {e} (date token {token:?})", path.display()))
    })
}

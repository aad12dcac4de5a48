//! Window timing configuration
//!
//! All times are seconds relative to stimulation onset. Extraction and
//! display deliberately use different post-stimulus bounds: spikes are
//! extracted over the wider `[pre_stimulus_s, full_post_stimulus_s]` window
//! while the session figure shows only `[plot_start_s, post_stimulus_s]`.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Timing bounds for event extraction and display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Start of the extraction window, relative to onset (negative)
    pub pre_stimulus_s: f64,
    /// Start of the displayed portion of the averaged profile
    pub plot_start_s: f64,
    /// End of the displayed portion of the averaged profile
    pub post_stimulus_s: f64,
    /// End of the extraction window, relative to onset (positive)
    pub full_post_stimulus_s: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            pre_stimulus_s: -1.2,
            plot_start_s: -0.7,
            post_stimulus_s: 1.4,
            full_post_stimulus_s: 1.9,
        }
    }
}

impl WindowConfig {
    /// Check the window invariants
    ///
    /// The extraction window must straddle the onset: `pre_stimulus_s < 0 <
    /// full_post_stimulus_s`. The display bounds only select a sub-range of
    /// the computed axis, so they are not constrained beyond being finite.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let fields = [
            ("pre_stimulus_s", self.pre_stimulus_s),
            ("plot_start_s", self.plot_start_s),
            ("post_stimulus_s", self.post_stimulus_s),
            ("full_post_stimulus_s", self.full_post_stimulus_s),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(AnalysisError::ConfigError(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }

        if self.pre_stimulus_s >= 0.0 {
            return Err(AnalysisError::ConfigError(format!(
                "pre_stimulus_s must be negative, got {}",
                self.pre_stimulus_s
            )));
        }
        if self.full_post_stimulus_s <= 0.0 {
            return Err(AnalysisError::ConfigError(format!(
                "full_post_stimulus_s must be positive, got {}",
                self.full_post_stimulus_s
            )));
        }

        Ok(())
    }

    /// Extraction window edges `(pre_stimulus_s, full_post_stimulus_s)`
    ///
    /// These are also the edges declared on every spike train handed to the
    /// synchrony measure.
    pub fn edges(&self) -> (f64, f64) {
        (self.pre_stimulus_s, self.full_post_stimulus_s)
    }
}

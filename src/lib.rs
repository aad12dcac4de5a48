//! Stimsync - Stimulation-aligned spike synchrony analysis
//!
//! Stimsync turns raw spike-sorted recordings into per-session synchrony
//! summaries through a deterministic pipeline: loading → event windowing →
//! per-event synchronization profiles → session aggregation → cross-session
//! batching → figure emission.
//!
//! ## Modules
//!
//! - **Session Pipeline**: Analyze one recording into a [`types::SessionAggregate`]
//! - **Batch Layer**: Process a directory of sessions in date order and emit figures

pub mod aggregate;
pub mod axis;
pub mod batch;
pub mod chart;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod profile;
pub mod sync;
pub mod types;
pub mod window;

pub use batch::{discover_sessions, SessionBatcher};
pub use chart::{ChartSink, Figure, JsonChartSink};
pub use config::WindowConfig;
pub use error::AnalysisError;
pub use pipeline::{analyze_file, analyze_recording};

// Synchrony exports
pub use aggregate::{ProfileAlignment, TruncateToShortest};
pub use sync::{SpikeSync, SpikeTrain, SyncMeasure};
pub use types::{Recording, SessionAggregate, SessionResult, StimulationEvent};

/// Stimsync version embedded in all figure documents
pub const STIMSYNC_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for figure documents
pub const PRODUCER_NAME: &str = "stimsync";

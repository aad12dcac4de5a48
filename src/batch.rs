//! Multi-session batch processing
//!
//! Discovers recording files in a directory, orders them by the date
//! encoded in their filenames, runs the per-session pipeline on each, and
//! collects one whole-session synchrony value per session for the
//! cross-session comparison. Figures are emitted as sessions finish, so
//! only one session's data is ever resident.

use crate::aggregate::{ProfileAlignment, TruncateToShortest};
use crate::axis::{display_window, time_axis};
use crate::chart::{ChartSink, Figure};
use crate::config::WindowConfig;
use crate::error::AnalysisError;
use crate::loader;
use crate::pipeline;
use crate::sync::{SpikeSync, SyncMeasure};
use crate::types::{SessionAggregate, SessionResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// File extension of recording files
pub const RECORDING_EXTENSION: &str = "json";

/// Bin count of the adaptive-interval histogram
const HISTOGRAM_BINS: usize = 50;

/// Display limit of the histogram x axis, in seconds; the interesting
/// adaptive windows are the small ones
const HISTOGRAM_X_MAX_S: f64 = 0.08;

/// Recording files of a directory, ordered by their filename dates
///
/// Every date token is resolved here, before any file is processed: one
/// malformed filename aborts the run with nothing half-done, because a
/// session slotted into the wrong position would corrupt the whole
/// cross-session comparison. Equal dates fall back to filename order.
pub fn discover_sessions(dir: &Path) -> Result<Vec<PathBuf>, AnalysisError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| AnalysisError::ReadError(format!("{}: {e}", dir.display())))?;

    let mut dated = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| AnalysisError::ReadError(format!("{}: {e}", dir.display())))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some(RECORDING_EXTENSION) {
            continue;
        }
        let date = loader::session_date(&path)?;
        dated.push((date, path));
    }

    dated.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    Ok(dated.into_iter().map(|(_, path)| path).collect())
}

/// Drives the pipeline over a directory of sessions
///
/// The batcher owns the only cross-session state of a run, the append-only
/// [`SessionResult`] list; everything else lives and dies with one
/// session.
pub struct SessionBatcher {
    config: WindowConfig,
    measure: Box<dyn SyncMeasure>,
    alignment: Box<dyn ProfileAlignment>,
    sink: Box<dyn ChartSink>,
    results: Vec<SessionResult>,
}

impl SessionBatcher {
    /// Create a batcher with the default measure and alignment strategy
    pub fn new(config: WindowConfig, sink: Box<dyn ChartSink>) -> Result<Self, AnalysisError> {
        Self::with_parts(
            config,
            Box::new(SpikeSync),
            Box::new(TruncateToShortest),
            sink,
        )
    }

    /// Create a batcher from explicit pipeline parts
    pub fn with_parts(
        config: WindowConfig,
        measure: Box<dyn SyncMeasure>,
        alignment: Box<dyn ProfileAlignment>,
        sink: Box<dyn ChartSink>,
    ) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self {
            config,
            measure,
            alignment,
            sink,
            results: Vec::new(),
        })
    }

    /// Process every recording file in `dir`, in date order
    ///
    /// Emits two figures per session plus one cross-session summary. A
    /// failing file fails the batch; figures of earlier sessions stay on
    /// disk as already-emitted side effects.
    pub fn process_directory(&mut self, dir: &Path) -> Result<(), AnalysisError> {
        let paths = discover_sessions(dir)?;
        info!(
            "discovered {} recording file(s) in {}",
            paths.len(),
            dir.display()
        );

        for path in &paths {
            self.process_file(path)?;
        }

        self.emit_summary()
    }

    /// Process a single session file and record its result
    pub fn process_file(&mut self, path: &Path) -> Result<(), AnalysisError> {
        let session_name = loader::session_name(path);
        info!("processing session {session_name}");

        let aggregate = pipeline::analyze_file(
            path,
            &self.config,
            self.measure.as_ref(),
            self.alignment.as_ref(),
        )
        .map_err(|e| {
            error!("session {session_name} ({}): {e}", path.display());
            e
        })?;
        self.emit_session_figures(&session_name, &aggregate)?;

        info!(
            "session {session_name}: whole-session synchrony {:.4}",
            aggregate.session_scalar_sync
        );
        self.results.push(SessionResult {
            session_name,
            session_scalar_sync: aggregate.session_scalar_sync,
        });
        Ok(())
    }

    /// Results of the sessions processed so far, in processing order
    pub fn results(&self) -> &[SessionResult] {
        &self.results
    }

    /// Consume the batcher, returning all session results
    pub fn into_results(self) -> Vec<SessionResult> {
        self.results
    }

    fn emit_session_figures(
        &mut self,
        session_name: &str,
        aggregate: &SessionAggregate,
    ) -> Result<(), AnalysisError> {
        // The averaged profile is laid out over the full extraction window
        // but displayed over the narrower plot range.
        let axis = time_axis(
            self.config.pre_stimulus_s,
            self.config.full_post_stimulus_s,
            aggregate.avg_profile.len(),
        );
        let (x, y) = display_window(
            &axis,
            &aggregate.avg_profile,
            self.config.plot_start_s,
            self.config.post_stimulus_s,
        );

        self.sink.emit(&Figure::Line {
            title: format!(
                "Average Synchronization Profile Across Stimulation Events ({session_name})"
            ),
            x_label: "Time (s)".to_string(),
            y_label: "Synchronization".to_string(),
            series_label: "Average Sync Profile".to_string(),
            x,
            y,
        })?;

        self.sink.emit(&Figure::Histogram {
            title: format!("Adaptive Time Window Distribution ({session_name})"),
            x_label: "Adaptive Time Window (s)".to_string(),
            y_label: "Frequency".to_string(),
            samples: aggregate.adaptive_intervals.clone(),
            bins: HISTOGRAM_BINS,
            x_max: HISTOGRAM_X_MAX_S,
        })
    }

    fn emit_summary(&mut self) -> Result<(), AnalysisError> {
        let categories = self.results.iter().map(|r| r.session_name.clone()).collect();
        let values = self.results.iter().map(|r| r.session_scalar_sync).collect();

        self.sink.emit(&Figure::Bar {
            title: "Average Synchronization Across Entire Sessions".to_string(),
            x_label: "Session".to_string(),
            y_label: "Average Synchronization for Entire Session".to_string(),
            categories,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Sink collecting figures in memory, shared with the test via Rc
    #[derive(Clone, Default)]
    struct MemorySink(Rc<RefCell<Vec<Figure>>>);

    impl ChartSink for MemorySink {
        fn emit(&mut self, figure: &Figure) -> Result<(), AnalysisError> {
            self.0.borrow_mut().push(figure.clone());
            Ok(())
        }
    }

    fn write_recording(dir: &Path, file_name: &str) {
        let recording = json!({
            "unit_spike_train_dict": {
                "a": [10100, 10500, 20100, 20500],
                "b": [10105, 10900, 20105, 20900]
            },
            "stim_trains": [10000, 20000],
            "sampling_rate": 1000.0
        });
        fs::write(dir.join(file_name), recording.to_string()).unwrap();
    }

    #[test]
    fn test_discovery_orders_by_filename_date() {
        let dir = TempDir::new().unwrap();
        for name in [
            "X_01-Jan-2020.json",
            "X_15-Mar-2019.json",
            "X_02-Feb-2020.json",
        ] {
            write_recording(dir.path(), name);
        }

        let paths = discover_sessions(dir.path()).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["X_15-Mar-2019.json", "X_01-Jan-2020.json", "X_02-Feb-2020.json"]
        );
    }

    #[test]
    fn test_discovery_ignores_other_extensions() {
        let dir = TempDir::new().unwrap();
        write_recording(dir.path(), "X_01-Jan-2020.json");
        fs::write(dir.path().join("notes.txt"), "not a recording").unwrap();
        fs::write(dir.path().join("X_02-Jan-2020.json.bak"), "{}").unwrap();

        let paths = discover_sessions(dir.path()).unwrap();
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn test_discovery_bad_date_token_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_recording(dir.path(), "X_01-Jan-2020.json");
        write_recording(dir.path(), "X_2020-01-02.json");

        let result = discover_sessions(dir.path());
        assert!(matches!(result, Err(AnalysisError::DateParseError(_))));
    }

    #[test]
    fn test_bad_date_token_aborts_before_any_processing() {
        // One good file and one with an unparseable date token: the batch
        // must fail during discovery, with nothing processed and nothing
        // emitted.
        let dir = TempDir::new().unwrap();
        write_recording(dir.path(), "X_01-Jan-2020.json");
        write_recording(dir.path(), "X_first-session.json");

        let figures = MemorySink::default();
        let mut batcher =
            SessionBatcher::new(WindowConfig::default(), Box::new(figures.clone())).unwrap();
        let result = batcher.process_directory(dir.path());

        assert!(matches!(result, Err(AnalysisError::DateParseError(_))));
        assert!(batcher.results().is_empty());
        assert!(figures.0.borrow().is_empty());
    }

    #[test]
    fn test_batch_emits_figures_and_collects_results_in_date_order() {
        let dir = TempDir::new().unwrap();
        write_recording(dir.path(), "ICMS92_01-Jan-2020.json");
        write_recording(dir.path(), "ICMS92_15-Mar-2019.json");

        let figures = MemorySink::default();
        let mut batcher =
            SessionBatcher::new(WindowConfig::default(), Box::new(figures.clone())).unwrap();
        batcher.process_directory(dir.path()).unwrap();

        let results = batcher.results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].session_name, "ICMS92_15-Mar-2019");
        assert_eq!(results[1].session_name, "ICMS92_01-Jan-2020");
        for result in results {
            assert!((0.0..=1.0).contains(&result.session_scalar_sync));
        }

        // Two figures per session plus the summary bar chart, in order
        let figures = figures.0.borrow();
        assert_eq!(figures.len(), 5);
        assert!(matches!(&figures[0], Figure::Line { title, .. }
            if title.contains("ICMS92_15-Mar-2019")));
        assert!(matches!(&figures[1], Figure::Histogram { title, .. }
            if title.contains("ICMS92_15-Mar-2019")));
        assert!(matches!(&figures[2], Figure::Line { title, .. }
            if title.contains("ICMS92_01-Jan-2020")));

        match &figures[4] {
            Figure::Bar {
                categories, values, ..
            } => {
                assert_eq!(
                    categories,
                    &vec![
                        "ICMS92_15-Mar-2019".to_string(),
                        "ICMS92_01-Jan-2020".to_string()
                    ]
                );
                assert_eq!(values.len(), 2);
            }
            other => panic!("expected summary bar chart, got {other:?}"),
        }
    }

    #[test]
    fn test_line_figure_covers_display_range_only() {
        let dir = TempDir::new().unwrap();
        write_recording(dir.path(), "ICMS92_01-Jan-2020.json");

        let figures = MemorySink::default();
        let config = WindowConfig::default();
        let mut batcher = SessionBatcher::new(config, Box::new(figures.clone())).unwrap();
        batcher.process_directory(dir.path()).unwrap();

        let figures = figures.0.borrow();
        match &figures[0] {
            Figure::Line { x, y, .. } => {
                assert_eq!(x.len(), y.len());
                assert!(x
                    .iter()
                    .all(|&t| t >= config.plot_start_s && t <= config.post_stimulus_s));
            }
            other => panic!("expected line figure, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_file_fails_the_batch() {
        let dir = TempDir::new().unwrap();
        write_recording(dir.path(), "ICMS92_01-Jan-2020.json");
        fs::write(dir.path().join("ICMS92_02-Jan-2020.json"), "not json").unwrap();

        let figures = MemorySink::default();
        let mut batcher =
            SessionBatcher::new(WindowConfig::default(), Box::new(figures.clone())).unwrap();
        let result = batcher.process_directory(dir.path());

        assert!(matches!(result, Err(AnalysisError::JsonError(_))));
        // The first session was already processed; no summary was emitted.
        assert_eq!(batcher.results().len(), 1);
        assert_eq!(figures.0.borrow().len(), 2);
    }

    #[test]
    fn test_empty_directory_emits_empty_summary() {
        let dir = TempDir::new().unwrap();
        let figures = MemorySink::default();
        let mut batcher =
            SessionBatcher::new(WindowConfig::default(), Box::new(figures.clone())).unwrap();
        batcher.process_directory(dir.path()).unwrap();

        assert!(batcher.results().is_empty());
        let figures = figures.0.borrow();
        assert_eq!(figures.len(), 1);
        assert!(matches!(&figures[0], Figure::Bar { categories, .. } if categories.is_empty()));
    }

    #[test]
    fn test_batch_writes_figure_documents_to_disk() {
        let session_dir = TempDir::new().unwrap();
        write_recording(session_dir.path(), "ICMS92_01-Jan-2020.json");

        let out_dir = TempDir::new().unwrap();
        let sink = crate::chart::JsonChartSink::new(out_dir.path()).unwrap();
        let mut batcher = SessionBatcher::new(WindowConfig::default(), Box::new(sink)).unwrap();
        batcher.process_directory(session_dir.path()).unwrap();

        let mut names: Vec<_> = fs::read_dir(out_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names.len(), 3);
        assert!(names[0].starts_with("001_average-synchronization-profile"));
        assert!(names[1].starts_with("002_adaptive-time-window-distribution"));
        assert!(names[2].starts_with("003_average-synchronization-across-entire-sessions"));

        let json = fs::read_to_string(out_dir.path().join(&names[0])).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(doc["producer"]["name"], "stimsync");
        assert_eq!(doc["figure"]["kind"], "line");
    }

    #[test]
    fn test_invalid_config_is_rejected_at_construction() {
        let config = WindowConfig {
            pre_stimulus_s: 0.3,
            ..Default::default()
        };
        let result = SessionBatcher::new(config, Box::new(MemorySink::default()));
        assert!(matches!(result, Err(AnalysisError::ConfigError(_))));
    }
}

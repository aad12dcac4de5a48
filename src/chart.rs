//! Figure data model and sinks
//!
//! The pipeline describes its figures as data (arrays plus labels) and
//! hands them to a [`ChartSink`]. Rendering to pixels is somebody else's
//! job; the shipped [`JsonChartSink`] writes one self-describing JSON
//! document per figure into an output directory, carrying producer
//! provenance so a figure can always be traced back to the run that made
//! it.

use crate::error::AnalysisError;
use crate::{PRODUCER_NAME, STIMSYNC_VERSION};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One figure, described by its data and labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Figure {
    /// A single-series line plot
    Line {
        title: String,
        x_label: String,
        y_label: String,
        series_label: String,
        x: Vec<f64>,
        y: Vec<f64>,
    },
    /// A histogram over raw samples with a display limit on the x axis
    Histogram {
        title: String,
        x_label: String,
        y_label: String,
        samples: Vec<f64>,
        bins: usize,
        x_max: f64,
    },
    /// A bar chart of one value per category
    Bar {
        title: String,
        x_label: String,
        y_label: String,
        categories: Vec<String>,
        values: Vec<f64>,
    },
}

impl Figure {
    /// The figure's title
    pub fn title(&self) -> &str {
        match self {
            Figure::Line { title, .. }
            | Figure::Histogram { title, .. }
            | Figure::Bar { title, .. } => title,
        }
    }
}

/// Consumer of finished figures
///
/// Sinks take figures one-way; the pipeline never reads anything back.
pub trait ChartSink {
    /// Accept one figure
    fn emit(&mut self, figure: &Figure) -> Result<(), AnalysisError>;
}

/// Producer metadata embedded in every figure document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

#[derive(Serialize)]
struct FigureDocument<'a> {
    producer: FigureProducer,
    created_at: String,
    figure: &'a Figure,
}

/// Writes each figure as `NNN_<slug>.json` into an output directory
pub struct JsonChartSink {
    out_dir: PathBuf,
    instance_id: String,
    sequence: usize,
}

impl JsonChartSink {
    /// Create a sink writing into `out_dir`, with a fresh instance ID
    ///
    /// The directory is created up front so a bad output path fails the
    /// run before any session is processed.
    pub fn new(out_dir: &Path) -> Result<Self, AnalysisError> {
        Self::with_instance_id(out_dir, Uuid::new_v4().to_string())
    }

    /// Create a sink with a specific instance ID
    pub fn with_instance_id(out_dir: &Path, instance_id: String) -> Result<Self, AnalysisError> {
        fs::create_dir_all(out_dir).map_err(|e| {
            AnalysisError::ChartError(format!("cannot create {}: {e}", out_dir.display()))
        })?;
        Ok(Self {
            out_dir: out_dir.to_path_buf(),
            instance_id,
            sequence: 0,
        })
    }

    /// Filename-safe slug of a figure title
    fn slug(title: &str) -> String {
        let mut slug = String::with_capacity(title.len());
        for c in title.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.ends_with('-') {
                slug.push('-');
            }
        }
        slug.trim_matches('-').to_string()
    }
}

impl ChartSink for JsonChartSink {
    fn emit(&mut self, figure: &Figure) -> Result<(), AnalysisError> {
        self.sequence += 1;

        let document = FigureDocument {
            producer: FigureProducer {
                name: PRODUCER_NAME.to_string(),
                version: STIMSYNC_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            created_at: Utc::now().to_rfc3339(),
            figure,
        };
        let json = serde_json::to_string_pretty(&document)?;

        let file_name = format!("{:03}_{}.json", self.sequence, Self::slug(figure.title()));
        let path = self.out_dir.join(file_name);
        fs::write(&path, json)
            .map_err(|e| AnalysisError::ChartError(format!("cannot write {}: {e}", path.display())))
    }
}

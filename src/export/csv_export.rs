//! CSV export of the tension time series.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use crate::state::{MeasurementSeries, SeriesPoint};

/// Record for CSV time-series export
#[derive(Debug, Clone, Serialize)]
pub struct SeriesRecord {
    /// Sample number
    pub time_index: u64,
    /// Recorded tension (g)
    pub tension_g: f64,
}

impl From<&SeriesPoint> for SeriesRecord {
    fn from(p: &SeriesPoint) -> Self {
        Self {
            time_index: p.time_index,
            tension_g: p.tension_g,
        }
    }
}

/// CSV writer for recorded samples
pub struct CsvExporter {
    writer: csv::Writer<File>,
    /// Path to output file
    path: PathBuf,
    rows: usize,
}

impl CsvExporter {
    /// Create an exporter writing to `path`
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let writer = csv::Writer::from_path(&path)?;
        log::info!("CSV export started: {}", path.display());
        Ok(Self {
            writer,
            path,
            rows: 0,
        })
    }

    /// Create an exporter in `dir` with a timestamped filename
    ///
    /// Creates the directory if it doesn't exist.
    pub fn timestamped<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        Self::create(dir.join(format!("tension_{}.csv", timestamp)))
    }

    /// Write one sample
    pub fn record(&mut self, point: &SeriesPoint) -> Result<()> {
        self.writer.serialize(SeriesRecord::from(point))?;
        self.rows += 1;
        Ok(())
    }

    /// Write every recorded sample of a series; seed points are skipped
    pub fn record_series(&mut self, series: &MeasurementSeries) -> Result<()> {
        for point in series.samples() {
            self.record(point)?;
        }
        Ok(())
    }

    /// Finish writing and return the output path
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush()?;
        log::info!("CSV export completed: {} ({} rows)", self.path.display(), self.rows);
        Ok(self.path)
    }

    /// Get the output path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write the recorded samples of `series` to `path`
pub fn export_series_csv<P: AsRef<Path>>(series: &MeasurementSeries, path: P) -> Result<PathBuf> {
    let mut exporter = CsvExporter::create(path)?;
    exporter.record_series(series)?;
    exporter.finish()
}

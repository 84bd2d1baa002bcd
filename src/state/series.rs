//! Time-indexed tension recording.

use serde::{Deserialize, Serialize};

/// Number of seed points a fresh series starts with
pub const SEED_POINTS: usize = 2;

/// One recorded tension value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Sample number on the chart's x axis
    pub time_index: u64,
    /// Recorded tension (g)
    pub tension_g: f64,
}

/// Tension samples for charting.
///
/// Starts with two seed points, `(0, max_tension)` and `(0, 0)`, which pin
/// the chart's y axis to the full tension range. Samples are appended at
/// `time_index = len - 1`, so the first sample sits at 1 and every later one
/// is one step further. Points are never modified once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSeries {
    points: Vec<SeriesPoint>,
}

impl MeasurementSeries {
    /// Fresh series seeded for a tissue with the given maximal tension
    pub fn new(max_tension_g: f64) -> Self {
        Self {
            points: vec![
                SeriesPoint {
                    time_index: 0,
                    tension_g: max_tension_g,
                },
                SeriesPoint {
                    time_index: 0,
                    tension_g: 0.0,
                },
            ],
        }
    }

    /// Append a sample at the next time index
    pub fn push(&mut self, tension_g: f64) -> SeriesPoint {
        let point = SeriesPoint {
            time_index: (self.points.len() - 1) as u64,
            tension_g,
        };
        self.points.push(point);
        point
    }

    /// Drop every sample, keeping the seed points.
    ///
    /// No-op unless samples have been recorded.
    pub fn reset(&mut self) {
        if self.points.len() > SEED_POINTS {
            self.points.truncate(SEED_POINTS);
        }
    }

    /// All points, seed included
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// Recorded samples, seed excluded
    pub fn samples(&self) -> &[SeriesPoint] {
        &self.points[SEED_POINTS.min(self.points.len())..]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }
}

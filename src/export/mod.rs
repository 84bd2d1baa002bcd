//! Export functionality for experiment data.
//!
//! Provides CSV export of the recorded tension series and JSON save/restore
//! of the hidden answer.

mod csv_export;
mod json_export;

pub use csv_export::{export_series_csv, CsvExporter, SeriesRecord};
pub use json_export::{load_answer_json, persist_answer_to, save_answer_json, AnswerSnapshot};

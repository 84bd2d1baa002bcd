//! Configuration module for loading experiment parameters.
//!
//! Drug constants are not based on any real compounds; they were chosen so
//! that 1 mL of 1 uM stock added to the bath gives a clearly visible response.

mod parameters;

pub use parameters::{
    BathParameters, ExperimentParameters, ReceptorSpec, RecordingParameters, StockDrugSpec,
    UnknownParameters,
};

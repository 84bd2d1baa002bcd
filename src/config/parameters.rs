//! Parameter structures for the organ bath experiment.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ExperimentError, Result};
use crate::pharmacology::DrugRole;

/// Top-level parameters container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentParameters {
    /// Bath and dosing constants
    pub bath: BathParameters,
    /// Tension recording cadence
    pub recording: RecordingParameters,
    /// Unknown-drug draw and answer checking
    pub unknown: UnknownParameters,
    /// Stock drugs, in menu order
    pub stock_drugs: Vec<StockDrugSpec>,
    /// Receptor wiring into the stock roster
    pub receptors: Vec<ReceptorSpec>,
}

impl ExperimentParameters {
    /// Load parameters from a JSON file, or use defaults if the file is
    /// missing, unparsable, or fails validation.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => match serde_json::from_str::<Self>(&contents) {
                Ok(params) => match params.validate() {
                    Ok(()) => {
                        log::info!("Loaded experiment parameters from {:?}", path.as_ref());
                        params
                    }
                    Err(e) => {
                        log::warn!("Experiment parameters rejected: {}, using defaults", e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("Failed to parse experiment parameters: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Experiment parameters file not found, using defaults");
                Self::default()
            }
        }
    }

    /// Check scalar constants. Roster and receptor wiring are validated when
    /// the experiment is built from them.
    pub fn validate(&self) -> Result<()> {
        if !(self.bath.bath_volume_mL > 0.0 && self.bath.bath_volume_mL.is_finite()) {
            return Err(ExperimentError::InvalidBathVolume {
                bath_volume_mL: self.bath.bath_volume_mL,
            });
        }
        if !(self.bath.max_tension_g > 0.0 && self.bath.max_tension_g.is_finite()) {
            return Err(ExperimentError::InvalidParameter {
                name: "max_tension_g",
                reason: format!("{} must be > 0", self.bath.max_tension_g),
            });
        }
        let (min, max) = (
            self.unknown.min_concentration_uM,
            self.unknown.max_concentration_uM,
        );
        if !(min > 0.0 && min < max && max.is_finite()) {
            return Err(ExperimentError::InvalidUnknownRange {
                min_uM: min,
                max_uM: max,
            });
        }
        if !(self.unknown.answer_tolerance >= 0.0 && self.unknown.answer_tolerance.is_finite()) {
            return Err(ExperimentError::InvalidParameter {
                name: "answer_tolerance",
                reason: format!("{} must be >= 0", self.unknown.answer_tolerance),
            });
        }
        if self.recording.sample_period_ms == 0 {
            return Err(ExperimentError::InvalidParameter {
                name: "sample_period_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.stock_drugs.is_empty() {
            return Err(ExperimentError::EmptyRoster);
        }
        if self.receptors.is_empty() {
            return Err(ExperimentError::NoReceptors);
        }
        Ok(())
    }
}

impl Default for ExperimentParameters {
    fn default() -> Self {
        Self {
            bath: BathParameters::default(),
            recording: RecordingParameters::default(),
            unknown: UnknownParameters::default(),
            stock_drugs: StockDrugSpec::default_roster(),
            receptors: ReceptorSpec::default_wiring(),
        }
    }
}

/// Bath and dosing constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BathParameters {
    /// Bath volume (mL), fixed for the session
    pub bath_volume_mL: f64,
    /// Maximum tension the tissue can develop (g)
    pub max_tension_g: f64,
    /// Stock concentration offered by default in the dosing menu (uM)
    pub default_stock_concentration_uM: f64,
    /// Stock volume offered by default in the dosing menu (mL)
    pub default_stock_volume_mL: f64,
}

impl Default for BathParameters {
    fn default() -> Self {
        Self {
            bath_volume_mL: 25.0,
            max_tension_g: 5.0,
            default_stock_concentration_uM: 1.0,
            default_stock_volume_mL: 1.0,
        }
    }
}

/// Tension recording cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingParameters {
    /// Interval between tension samples (ms)
    pub sample_period_ms: u64,
}

impl RecordingParameters {
    /// Sampling interval as a `Duration`
    pub fn sample_period(&self) -> Duration {
        Duration::from_millis(self.sample_period_ms)
    }
}

impl Default for RecordingParameters {
    fn default() -> Self {
        Self {
            sample_period_ms: 500,
        }
    }
}

/// Unknown-drug draw and answer checking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnknownParameters {
    /// Lower bound of the hidden concentration draw (uM, inclusive)
    pub min_concentration_uM: f64,
    /// Upper bound of the hidden concentration draw (uM, exclusive)
    pub max_concentration_uM: f64,
    /// Relative tolerance accepted on a concentration guess
    pub answer_tolerance: f64,
}

impl Default for UnknownParameters {
    fn default() -> Self {
        Self {
            min_concentration_uM: 0.5,
            max_concentration_uM: 1.5,
            answer_tolerance: crate::pharmacology::DEFAULT_TOLERANCE,
        }
    }
}

/// A stock drug definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockDrugSpec {
    /// Menu name, unique within the roster
    pub name: String,
    /// Agonist or antagonist
    pub role: DrugRole,
    /// Maximal fractional response (agonists only)
    #[serde(default)]
    pub efficacy: f64,
    /// Half-maximal concentration, EC50 analog (uM, agonists only)
    #[serde(default)]
    pub half_max_uM: f64,
    /// Dissociation constant (uM, antagonists only)
    #[serde(default)]
    pub dissociation_constant_uM: f64,
}

impl StockDrugSpec {
    /// Agonist entry
    pub fn agonist(name: &str, efficacy: f64, half_max_uM: f64) -> Self {
        Self {
            name: name.to_string(),
            role: DrugRole::Agonist,
            efficacy,
            half_max_uM,
            dissociation_constant_uM: 0.0,
        }
    }

    /// Antagonist entry
    pub fn antagonist(name: &str, dissociation_constant_uM: f64) -> Self {
        Self {
            name: name.to_string(),
            role: DrugRole::Antagonist,
            efficacy: 0.0,
            half_max_uM: 0.0,
            dissociation_constant_uM,
        }
    }

    /// Six drugs serving three receptors
    pub fn default_roster() -> Vec<Self> {
        vec![
            Self::agonist("Agonist 1", 0.78, 0.10),
            Self::agonist("Agonist 2", 0.64, 0.15),
            Self::agonist("Agonist 3", 0.97, 0.17),
            Self::antagonist("Antagonist 1", 0.12),
            Self::antagonist("Antagonist 2", 0.09),
            Self::antagonist("Antagonist 3", 0.17),
        ]
    }
}

/// Which stock drugs act on a receptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceptorSpec {
    /// Receptor name
    pub name: String,
    /// Stock roster index of the agonist
    pub agonist: usize,
    /// Stock roster index of the antagonist
    pub antagonist: usize,
}

impl ReceptorSpec {
    /// Receptor k binds agonist k and antagonist k of the default roster
    pub fn default_wiring() -> Vec<Self> {
        (0..3)
            .map(|k| Self {
                name: format!("Receptor {}", k + 1),
                agonist: k,
                antagonist: k + 3,
            })
            .collect()
    }
}

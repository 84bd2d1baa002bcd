//! Drugs and their bath concentration.

use serde::{Deserialize, Serialize};

use super::occupancy::mixed_concentration_uM;
use crate::config::StockDrugSpec;
use crate::error::{ExperimentError, Result};

/// Roster name given to the disguised duplicate of a stock drug
pub const UNKNOWN_NAME: &str = "Unknown";

/// How a drug acts on its receptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrugRole {
    /// Activates the receptor (efficacy, EC50)
    Agonist,
    /// Competitively blocks the agonist (Kd)
    Antagonist,
}

impl DrugRole {
    /// Lowercase label for messages
    pub fn as_str(self) -> &'static str {
        match self {
            DrugRole::Agonist => "agonist",
            DrugRole::Antagonist => "antagonist",
        }
    }
}

/// A drug in the bath.
///
/// Pharmacological constants are fixed at construction; only the bath
/// concentration changes. Parameters that do not apply to the drug's role
/// are zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drug {
    name: String,
    role: DrugRole,
    efficacy: f64,
    half_max_uM: f64,
    dissociation_constant_uM: f64,
    concentration_uM: f64,
}

impl Drug {
    /// Create an agonist with zero bath concentration
    pub fn agonist(name: impl Into<String>, efficacy: f64, half_max_uM: f64) -> Self {
        Self {
            name: name.into(),
            role: DrugRole::Agonist,
            efficacy,
            half_max_uM,
            dissociation_constant_uM: 0.0,
            concentration_uM: 0.0,
        }
    }

    /// Create an antagonist with zero bath concentration
    pub fn antagonist(name: impl Into<String>, dissociation_constant_uM: f64) -> Self {
        Self {
            name: name.into(),
            role: DrugRole::Antagonist,
            efficacy: 0.0,
            half_max_uM: 0.0,
            dissociation_constant_uM,
            concentration_uM: 0.0,
        }
    }

    /// Build a stock drug from its configuration entry, rejecting negative,
    /// non-finite, or (for antagonists) zero constants.
    pub fn from_spec(spec: &StockDrugSpec) -> Result<Self> {
        let drug = match spec.role {
            DrugRole::Agonist => Self::agonist(&spec.name, spec.efficacy, spec.half_max_uM),
            DrugRole::Antagonist => Self::antagonist(&spec.name, spec.dissociation_constant_uM),
        };
        drug.validate()?;
        Ok(drug)
    }

    /// Check the constants that matter for this drug's role.
    pub fn validate(&self) -> Result<()> {
        match self.role {
            DrugRole::Agonist => {
                for (name, value) in [("efficacy", self.efficacy), ("half_max_uM", self.half_max_uM)] {
                    if !(value >= 0.0 && value.is_finite()) {
                        return Err(ExperimentError::InvalidParameter {
                            name,
                            reason: format!("{} for {:?} must be finite and >= 0", value, self.name),
                        });
                    }
                }
            }
            DrugRole::Antagonist => {
                let kd = self.dissociation_constant_uM;
                if !(kd > 0.0 && kd.is_finite()) {
                    return Err(ExperimentError::InvalidDissociationConstant {
                        name: self.name.clone(),
                        kd_uM: kd,
                    });
                }
            }
        }
        Ok(())
    }

    /// A distinct drug named [`UNKNOWN_NAME`] with this drug's constants and
    /// current concentration.
    pub fn disguised_copy(&self) -> Self {
        Self {
            name: UNKNOWN_NAME.to_string(),
            ..self.clone()
        }
    }

    /// Replace the bath concentration with the volume-weighted mix of the
    /// current bath and `stock_volume_mL` of `applied_uM` stock.
    ///
    /// For the Unknown drug the caller passes the hidden unknown
    /// concentration as `applied_uM`.
    pub fn apply_dose(&mut self, applied_uM: f64, stock_volume_mL: f64, bath_volume_mL: f64) {
        self.concentration_uM =
            mixed_concentration_uM(self.concentration_uM, applied_uM, stock_volume_mL, bath_volume_mL);
    }

    /// Drain: concentration back to zero
    pub fn reset(&mut self) {
        self.concentration_uM = 0.0;
    }

    /// Same role and constants, ignoring name and concentration
    pub fn same_pharmacology(&self, other: &Drug) -> bool {
        const EPS: f64 = 1e-9;
        self.role == other.role
            && (self.efficacy - other.efficacy).abs() < EPS
            && (self.half_max_uM - other.half_max_uM).abs() < EPS
            && (self.dissociation_constant_uM - other.dissociation_constant_uM).abs() < EPS
    }

    /// Whether this is the disguised Unknown
    pub fn is_unknown(&self) -> bool {
        self.name == UNKNOWN_NAME
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> DrugRole {
        self.role
    }

    pub fn efficacy(&self) -> f64 {
        self.efficacy
    }

    pub fn half_max_uM(&self) -> f64 {
        self.half_max_uM
    }

    pub fn dissociation_constant_uM(&self) -> f64 {
        self.dissociation_constant_uM
    }

    pub fn concentration_uM(&self) -> f64 {
        self.concentration_uM
    }

    pub(crate) fn set_concentration_uM(&mut self, concentration_uM: f64) {
        self.concentration_uM = concentration_uM;
    }
}

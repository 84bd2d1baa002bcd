//! Receptors and their tension response.
//!
//! A receptor models one binding site. It refers to drugs by their index in
//! the experiment's drug roster, so a dose applied once is seen by every
//! receptor that lists that drug.

use serde::{Deserialize, Serialize};

use super::drug::{Drug, DrugRole};
use super::occupancy::competitive_occupancy;
use crate::error::{ExperimentError, Result};

/// A receptor in the tissue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receptor {
    name: String,
    /// Roster indices of agonists; the first supplies efficacy and EC50
    agonists: Vec<usize>,
    /// Roster indices of antagonists; the first supplies Kd
    antagonists: Vec<usize>,
    /// Fraction of maximal tension, refreshed by `update_tension`
    tension_fraction: f64,
}

impl Receptor {
    /// Wire a receptor to drugs in `roster`.
    ///
    /// Rejects empty slots, indices outside the roster, drugs in the wrong
    /// slot for their role, antagonists with Kd <= 0, and the Unknown drug
    /// appearing as both agonist and antagonist.
    pub fn new(
        name: impl Into<String>,
        agonists: Vec<usize>,
        antagonists: Vec<usize>,
        roster: &[Drug],
    ) -> Result<Self> {
        let name = name.into();
        if agonists.is_empty() {
            return Err(ExperimentError::MissingAgonist { receptor: name });
        }
        if antagonists.is_empty() {
            return Err(ExperimentError::MissingAntagonist { receptor: name });
        }

        if holds_unknown(&agonists, roster) && holds_unknown(&antagonists, roster) {
            return Err(ExperimentError::UnknownDrugConflict { receptor: name });
        }

        for (slots, expected) in [
            (&agonists, DrugRole::Agonist),
            (&antagonists, DrugRole::Antagonist),
        ] {
            for &index in slots.iter() {
                let drug = roster.get(index).ok_or(ExperimentError::DrugIndexOutOfRange {
                    index,
                    len: roster.len(),
                })?;
                if drug.role() != expected {
                    return Err(ExperimentError::RoleMismatch {
                        receptor: name,
                        index,
                        expected: expected.as_str(),
                        found: drug.name().to_string(),
                    });
                }
                drug.validate()?;
            }
        }

        Ok(Self {
            name,
            agonists,
            antagonists,
            tension_fraction: 0.0,
        })
    }

    /// Recompute the cached tension fraction from current bath concentrations.
    ///
    /// # Panics
    ///
    /// Panics if `roster` is shorter than the roster the receptor was wired
    /// against, i.e. if any slot index is out of bounds.
    pub fn update_tension(&mut self, roster: &[Drug]) {
        let total_agonist_uM = total_concentration_uM(&self.agonists, roster);
        let total_antagonist_uM = total_concentration_uM(&self.antagonists, roster);

        let agonist = &roster[self.agonists[0]];
        let antagonist = &roster[self.antagonists[0]];

        self.tension_fraction = competitive_occupancy(
            agonist.efficacy(),
            agonist.half_max_uM(),
            total_agonist_uM,
            total_antagonist_uM,
            antagonist.dissociation_constant_uM(),
        );
    }

    /// Whether the Unknown drug is wired into either slot. Indices past the
    /// end of `roster` count as not holding it.
    pub fn contains_unknown(&self, roster: &[Drug]) -> bool {
        self.agonists
            .iter()
            .chain(self.antagonists.iter())
            .any(|&i| roster.get(i).is_some_and(Drug::is_unknown))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn agonists(&self) -> &[usize] {
        &self.agonists
    }

    pub fn antagonists(&self) -> &[usize] {
        &self.antagonists
    }

    pub fn tension_fraction(&self) -> f64 {
        self.tension_fraction
    }
}

fn holds_unknown(slots: &[usize], roster: &[Drug]) -> bool {
    slots.iter().any(|&i| roster.get(i).is_some_and(Drug::is_unknown))
}

fn total_concentration_uM(slots: &[usize], roster: &[Drug]) -> f64 {
    slots.iter().map(|&i| roster[i].concentration_uM()).sum()
}

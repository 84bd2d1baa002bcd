//! Experiment session state.
//!
//! Owns the drug roster (stock drugs followed by the Unknown), the receptor
//! roster wired against it, the hidden answer, and the measurement series.
//! Every mutation recomputes receptor tensions before returning, so readers
//! never see a stale tension.

use std::collections::HashSet;
use std::fmt;

use rand::Rng;
use rand_distr::Uniform;

use super::answer::{AnswerObserver, HiddenAnswer};
use super::series::{MeasurementSeries, SeriesPoint};
use crate::config::{ExperimentParameters, ReceptorSpec};
use crate::error::{ExperimentError, Result};
use crate::pharmacology::{
    create_unknown, AnswerGuess, AnswerOutcome, AnswerVerifier, Drug, Receptor, UNKNOWN_NAME,
};

/// State of one organ bath session
pub struct ExperimentState {
    params: ExperimentParameters,
    /// Stock drugs in menu order, then the Unknown
    drugs: Vec<Drug>,
    stock_count: usize,
    /// Stock index the Unknown was copied from
    unknown_index: usize,
    /// Hidden stock concentration used whenever the Unknown is dosed (uM)
    unknown_concentration_uM: f64,
    receptors: Vec<Receptor>,
    series: MeasurementSeries,
    verifier: AnswerVerifier,
    observers: Vec<Box<dyn AnswerObserver>>,
}

impl ExperimentState {
    /// Start a fresh experiment with a randomly drawn unknown.
    pub fn new<R: Rng + ?Sized>(params: ExperimentParameters, rng: &mut R) -> Result<Self> {
        params.validate()?;
        let mut drugs = stock_roster(&params)?;
        let unknown = create_unknown(&drugs, rng)?;
        let unknown_concentration_uM = draw_unknown_concentration(&params, rng);
        drugs.push(unknown.drug);

        let state = Self::assemble(params, drugs, unknown.source_index, unknown_concentration_uM)?;
        log::info!(
            "Experiment initialized: {} drugs, {} receptors",
            state.drugs.len(),
            state.receptors.len()
        );
        Ok(state)
    }

    /// Rebuild an experiment around a previously saved hidden answer.
    ///
    /// Stock drugs and receptors are constructed fresh from `params`; the
    /// Unknown keeps the saved concentration in the bath.
    pub fn restore(params: ExperimentParameters, answer: HiddenAnswer) -> Result<Self> {
        params.validate()?;
        let mut drugs = stock_roster(&params)?;

        let source = drugs.get(answer.index).ok_or_else(|| ExperimentError::InvalidRestore {
            reason: format!("index {} outside stock roster of {}", answer.index, drugs.len()),
        })?;
        if !(answer.concentration_uM > 0.0 && answer.concentration_uM.is_finite()) {
            return Err(ExperimentError::InvalidRestore {
                reason: format!("unknown concentration {} must be > 0", answer.concentration_uM),
            });
        }
        if !answer.drug.same_pharmacology(source) {
            return Err(ExperimentError::InvalidRestore {
                reason: format!("saved unknown does not match stock drug {:?}", source.name()),
            });
        }
        let bath_uM = answer.drug.concentration_uM();
        if !(bath_uM >= 0.0 && bath_uM.is_finite()) {
            return Err(ExperimentError::InvalidRestore {
                reason: format!("unknown bath concentration {} must be >= 0", bath_uM),
            });
        }

        let mut unknown = source.disguised_copy();
        unknown.set_concentration_uM(bath_uM);
        drugs.push(unknown);

        let state = Self::assemble(params, drugs, answer.index, answer.concentration_uM)?;
        log::info!("Experiment restored from saved answer");
        Ok(state)
    }

    fn assemble(
        params: ExperimentParameters,
        drugs: Vec<Drug>,
        unknown_index: usize,
        unknown_concentration_uM: f64,
    ) -> Result<Self> {
        let stock_count = drugs.len() - 1;
        let receptors = build_receptors(&params.receptors, &drugs, unknown_index)?;
        let series = MeasurementSeries::new(params.bath.max_tension_g);
        let verifier = AnswerVerifier::new(params.unknown.answer_tolerance);
        Ok(Self {
            params,
            drugs,
            stock_count,
            unknown_index,
            unknown_concentration_uM,
            receptors,
            series,
            verifier,
            observers: Vec::new(),
        })
    }

    // ------------------------------------------------------------------
    // Bath operations
    // ------------------------------------------------------------------

    /// Add `stock_volume_mL` of stock solution of drug `index` to a bath of
    /// `bath_volume_mL`, then recompute every receptor's tension.
    ///
    /// For the Unknown, `stock_concentration_uM` is ignored and the hidden
    /// unknown concentration is mixed in instead.
    pub fn dose_drug(
        &mut self,
        index: usize,
        stock_concentration_uM: f64,
        stock_volume_mL: f64,
        bath_volume_mL: f64,
    ) -> Result<()> {
        if index >= self.drugs.len() {
            return Err(ExperimentError::DrugIndexOutOfRange {
                index,
                len: self.drugs.len(),
            });
        }
        if !(bath_volume_mL > 0.0 && bath_volume_mL.is_finite()) {
            return Err(ExperimentError::InvalidBathVolume { bath_volume_mL });
        }
        if !(stock_concentration_uM >= 0.0
            && stock_concentration_uM.is_finite()
            && stock_volume_mL >= 0.0
            && stock_volume_mL.is_finite())
        {
            return Err(ExperimentError::InvalidDose {
                stock_concentration_uM,
                stock_volume_mL,
            });
        }

        let unknown_concentration_uM = self.unknown_concentration_uM;
        let drug = &mut self.drugs[index];
        let applied_uM = if drug.is_unknown() {
            unknown_concentration_uM
        } else {
            stock_concentration_uM
        };
        drug.apply_dose(applied_uM, stock_volume_mL, bath_volume_mL);
        log::debug!("Dosed {} mL of {:?} into {} mL bath", stock_volume_mL, drug.name(), bath_volume_mL);

        self.update_tensions();
        Ok(())
    }

    /// [`dose_drug`](Self::dose_drug) with the configured bath volume
    pub fn dose(&mut self, index: usize, stock_concentration_uM: f64, stock_volume_mL: f64) -> Result<()> {
        let bath_volume_mL = self.params.bath.bath_volume_mL;
        self.dose_drug(index, stock_concentration_uM, stock_volume_mL, bath_volume_mL)
    }

    /// Discard the bath: every drug back to zero, tensions recomputed
    pub fn drain_bath(&mut self) {
        for drug in &mut self.drugs {
            drug.reset();
        }
        self.update_tensions();
        log::debug!("Bath drained");
    }

    /// Replace the hidden answer with a fresh draw.
    ///
    /// The new Unknown, its concentration and the rewired receptors are all
    /// built before anything is committed; on error the state is untouched.
    /// Stock drugs keep their accumulated concentrations. Observers are
    /// notified with the new answer.
    pub fn randomize_unknown<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let unknown_concentration_uM = draw_unknown_concentration(&self.params, rng);

        let mut drugs = self.drugs[..self.stock_count].to_vec();
        let unknown = create_unknown(&drugs, rng)?;
        drugs.push(unknown.drug);
        let receptors = build_receptors(&self.params.receptors, &drugs, unknown.source_index)?;

        self.drugs = drugs;
        self.receptors = receptors;
        self.unknown_index = unknown.source_index;
        self.unknown_concentration_uM = unknown_concentration_uM;

        log::info!("Unknown drug randomized");
        self.notify_observers();
        Ok(())
    }

    fn update_tensions(&mut self) {
        for receptor in &mut self.receptors {
            receptor.update_tension(&self.drugs);
        }
    }

    // ------------------------------------------------------------------
    // Tension queries
    // ------------------------------------------------------------------

    /// `max_tension_scale` times the largest receptor tension fraction, or 0
    /// if no receptor is above 0
    pub fn current_max_tension(&self, max_tension_scale: f64) -> f64 {
        let largest = self
            .receptors
            .iter()
            .map(Receptor::tension_fraction)
            .fold(0.0_f64, f64::max);
        max_tension_scale * largest
    }

    /// Current tension (g) using the configured maximal tension
    pub fn current_tension_g(&self) -> f64 {
        self.current_max_tension(self.params.bath.max_tension_g)
    }

    /// Tension fraction of every receptor, in roster order
    pub fn receptor_tensions(&self) -> Vec<(&str, f64)> {
        self.receptors
            .iter()
            .map(|r| (r.name(), r.tension_fraction()))
            .collect()
    }

    // ------------------------------------------------------------------
    // Recording
    // ------------------------------------------------------------------

    /// Append the current tension to the measurement series
    pub fn record_sample(&mut self) -> SeriesPoint {
        let tension_g = self.current_tension_g();
        let point = self.series.push(tension_g);
        log::debug!("Sample t={} tension={:.4} g", point.time_index, point.tension_g);
        point
    }

    /// Clear recorded samples back to the seed points
    pub fn reset_series(&mut self) {
        self.series.reset();
    }

    pub fn series(&self) -> &MeasurementSeries {
        &self.series
    }

    // ------------------------------------------------------------------
    // Answer
    // ------------------------------------------------------------------

    /// Judge a guess against the current hidden answer
    pub fn check_answer(&self, guess: &AnswerGuess) -> AnswerOutcome {
        self.verifier
            .check(guess, self.unknown_index, self.unknown_concentration_uM)
    }

    /// Snapshot of the hidden answer for persistence
    pub fn hidden_answer(&self) -> HiddenAnswer {
        HiddenAnswer {
            drug: self.drugs[self.stock_count].clone(),
            index: self.unknown_index,
            concentration_uM: self.unknown_concentration_uM,
        }
    }

    /// Register an observer; it is called at once with the current answer
    /// and again after every randomization.
    pub fn subscribe(&mut self, observer: impl AnswerObserver + 'static) {
        let mut observer: Box<dyn AnswerObserver> = Box::new(observer);
        observer.answer_changed(&self.hidden_answer());
        self.observers.push(observer);
    }

    fn notify_observers(&mut self) {
        let answer = self.hidden_answer();
        for observer in &mut self.observers {
            observer.answer_changed(&answer);
        }
    }

    // ------------------------------------------------------------------
    // Roster access
    // ------------------------------------------------------------------

    /// Menu names. The dosing menu includes the Unknown; the answer menu
    /// lists stock drugs only, so a selection there is a stock index.
    pub fn drug_names(&self, include_unknown: bool) -> Vec<&str> {
        let end = if include_unknown {
            self.drugs.len()
        } else {
            self.stock_count
        };
        self.drugs[..end].iter().map(Drug::name).collect()
    }

    pub fn drug(&self, index: usize) -> Result<&Drug> {
        self.drugs.get(index).ok_or(ExperimentError::DrugIndexOutOfRange {
            index,
            len: self.drugs.len(),
        })
    }

    pub fn drugs(&self) -> &[Drug] {
        &self.drugs
    }

    pub fn receptors(&self) -> &[Receptor] {
        &self.receptors
    }

    pub fn stock_count(&self) -> usize {
        self.stock_count
    }

    /// Roster index of the Unknown (always the last entry)
    pub fn unknown_roster_index(&self) -> usize {
        self.stock_count
    }

    pub fn params(&self) -> &ExperimentParameters {
        &self.params
    }
}

impl fmt::Debug for ExperimentState {
    // Leaves out the hidden answer
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExperimentState")
            .field("drugs", &self.drug_names(true))
            .field("receptors", &self.receptor_tensions())
            .field("series_len", &self.series.len())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

/// Stock drugs from configuration, with unique names none of which is the
/// Unknown's.
fn stock_roster(params: &ExperimentParameters) -> Result<Vec<Drug>> {
    if params.stock_drugs.is_empty() {
        return Err(ExperimentError::EmptyRoster);
    }
    let mut names = HashSet::new();
    names.insert(UNKNOWN_NAME);
    let mut drugs = Vec::with_capacity(params.stock_drugs.len() + 1);
    for spec in &params.stock_drugs {
        if !names.insert(spec.name.as_str()) {
            return Err(ExperimentError::DuplicateDrugName {
                name: spec.name.clone(),
            });
        }
        drugs.push(Drug::from_spec(spec)?);
    }
    Ok(drugs)
}

/// Wire receptors against `drugs` (stock roster plus trailing Unknown). The
/// Unknown joins whichever slot holds the stock drug it was copied from.
///
/// Every stock drug must appear in at least one receptor, since any of them
/// may become the Unknown's source.
fn build_receptors(specs: &[ReceptorSpec], drugs: &[Drug], unknown_index: usize) -> Result<Vec<Receptor>> {
    if specs.is_empty() {
        return Err(ExperimentError::NoReceptors);
    }
    let stock_count = drugs.len() - 1;
    let unknown_slot = stock_count;

    let mut receptors = Vec::with_capacity(specs.len());
    for spec in specs {
        for index in [spec.agonist, spec.antagonist] {
            if index >= stock_count {
                return Err(ExperimentError::DrugIndexOutOfRange {
                    index,
                    len: stock_count,
                });
            }
        }
        let mut agonists = vec![spec.agonist];
        if spec.agonist == unknown_index {
            agonists.push(unknown_slot);
        }
        let mut antagonists = vec![spec.antagonist];
        if spec.antagonist == unknown_index {
            antagonists.push(unknown_slot);
        }

        let mut receptor = Receptor::new(spec.name.clone(), agonists, antagonists, drugs)?;
        receptor.update_tension(drugs);
        receptors.push(receptor);
    }

    let mut wired = vec![false; stock_count];
    for spec in specs {
        wired[spec.agonist] = true;
        wired[spec.antagonist] = true;
    }
    if let Some(unwired) = wired.iter().position(|&w| !w) {
        return Err(ExperimentError::UnwiredDrug {
            name: drugs[unwired].name().to_string(),
        });
    }
    Ok(receptors)
}

fn draw_unknown_concentration<R: Rng + ?Sized>(params: &ExperimentParameters, rng: &mut R) -> f64 {
    let range = Uniform::new(
        params.unknown.min_concentration_uM,
        params.unknown.max_concentration_uM,
    );
    rng.sample(range)
}

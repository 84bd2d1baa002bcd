//! Answer checking for the unknown drug.

use serde::{Deserialize, Serialize};

/// Relative tolerance accepted on a concentration guess (2%)
pub const DEFAULT_TOLERANCE: f64 = 0.02;

/// Whether a guess names the right stock drug and lands within `tolerance`
/// (relative, bounds inclusive) of the true concentration.
///
/// true × (1 - tol) <= guess <= true × (1 + tol)
pub fn is_correct(
    guessed_index: usize,
    guessed_concentration_uM: f64,
    true_index: usize,
    true_concentration_uM: f64,
    tolerance: f64,
) -> bool {
    guessed_index == true_index
        && guessed_concentration_uM >= true_concentration_uM * (1.0 - tolerance)
        && guessed_concentration_uM <= true_concentration_uM * (1.0 + tolerance)
}

/// A user's answer, either half of which may still be missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerGuess {
    /// Index into the stock roster
    pub drug_index: Option<usize>,
    /// Guessed bath-stock concentration (uM)
    pub concentration_uM: Option<f64>,
}

impl AnswerGuess {
    /// Complete guess
    pub fn new(drug_index: usize, concentration_uM: f64) -> Self {
        Self {
            drug_index: Some(drug_index),
            concentration_uM: Some(concentration_uM),
        }
    }
}

/// Result of checking a guess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerOutcome {
    /// Drug or concentration not yet given
    Unanswered,
    Correct,
    Incorrect,
}

/// Checks guesses with a fixed tolerance
#[derive(Debug, Clone, Copy)]
pub struct AnswerVerifier {
    /// Relative concentration tolerance
    pub tolerance: f64,
}

impl AnswerVerifier {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Judge a possibly incomplete guess. An absent half is never treated as 0.
    pub fn check(
        &self,
        guess: &AnswerGuess,
        true_index: usize,
        true_concentration_uM: f64,
    ) -> AnswerOutcome {
        match (guess.drug_index, guess.concentration_uM) {
            (Some(index), Some(concentration)) => {
                if is_correct(index, concentration, true_index, true_concentration_uM, self.tolerance) {
                    AnswerOutcome::Correct
                } else {
                    AnswerOutcome::Incorrect
                }
            }
            _ => AnswerOutcome::Unanswered,
        }
    }
}

impl Default for AnswerVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_inclusive() {
        assert!(is_correct(2, 0.98, 2, 1.0, DEFAULT_TOLERANCE));
        assert!(is_correct(2, 1.02, 2, 1.0, DEFAULT_TOLERANCE));
        assert!(!is_correct(2, 0.979999, 2, 1.0, DEFAULT_TOLERANCE));
        assert!(!is_correct(2, 1.020001, 2, 1.0, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_wrong_index_always_rejected() {
        assert!(!is_correct(1, 1.0, 2, 1.0, DEFAULT_TOLERANCE));
        assert!(!is_correct(1, 1.0, 2, 1.0, 10.0));
    }

    #[test]
    fn test_missing_half_is_unanswered() {
        let verifier = AnswerVerifier::default();
        let no_drug = AnswerGuess {
            drug_index: None,
            concentration_uM: Some(1.0),
        };
        let no_conc = AnswerGuess {
            drug_index: Some(0),
            concentration_uM: None,
        };
        assert_eq!(verifier.check(&no_drug, 0, 1.0), AnswerOutcome::Unanswered);
        assert_eq!(verifier.check(&no_conc, 0, 1.0), AnswerOutcome::Unanswered);
        assert_eq!(verifier.check(&AnswerGuess::default(), 0, 0.0), AnswerOutcome::Unanswered);
    }

    #[test]
    fn test_complete_guess_judged() {
        let verifier = AnswerVerifier::default();
        assert_eq!(verifier.check(&AnswerGuess::new(3, 0.75), 3, 0.76), AnswerOutcome::Correct);
        assert_eq!(verifier.check(&AnswerGuess::new(3, 0.70), 3, 0.76), AnswerOutcome::Incorrect);
    }
}

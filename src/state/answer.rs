//! The hidden answer key and its observers.

use serde::{Deserialize, Serialize};

use crate::pharmacology::Drug;

/// The experiment's secret: which stock drug the Unknown copies, and the
/// concentration of the Unknown's stock solution.
///
/// This is the triple handed to persistence whenever it changes, and the
/// triple accepted back on restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiddenAnswer {
    /// The Unknown drug as it sits in the roster
    pub drug: Drug,
    /// Stock roster index the Unknown was copied from
    pub index: usize,
    /// Concentration of the Unknown stock solution (uM)
    pub concentration_uM: f64,
}

/// Receives the hidden answer whenever it changes
pub trait AnswerObserver: Send {
    fn answer_changed(&mut self, answer: &HiddenAnswer);
}

impl<F> AnswerObserver for F
where
    F: FnMut(&HiddenAnswer) + Send,
{
    fn answer_changed(&mut self, answer: &HiddenAnswer) {
        self(answer)
    }
}

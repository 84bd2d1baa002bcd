//! Unknown drug generation.

use rand::Rng;

use super::drug::Drug;
use crate::error::{ExperimentError, Result};

/// The disguised drug together with the stock index it was copied from.
///
/// `source_index` is the identity half of the answer key.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownDrug {
    /// Copy of the stock drug, renamed to "Unknown"
    pub drug: Drug,
    /// Index into the stock roster
    pub source_index: usize,
}

/// Pick a stock drug uniformly at random and duplicate it as the Unknown.
///
/// The copy shares the source's constants and starting concentration but
/// owns its own concentration from then on.
pub fn create_unknown<R: Rng + ?Sized>(stock: &[Drug], rng: &mut R) -> Result<UnknownDrug> {
    if stock.is_empty() {
        return Err(ExperimentError::EmptyRoster);
    }
    let source_index = rng.gen_range(0..stock.len());
    Ok(UnknownDrug {
        drug: stock[source_index].disguised_copy(),
        source_index,
    })
}

//! Pharmacology of the organ bath.
//!
//! Drugs are mixed into a fixed-volume bath and act on receptors through a
//! single-site competitive occupancy model:
//!
//! ```text
//!   stock solution ──dose──► Drug.concentration ──► Receptor.update_tension
//!                                                        │
//!                         max_tension × max(tension_fraction) ◄─┘
//! ```
//!
//! One stock drug is duplicated as a disguised "Unknown"; identifying it and
//! its concentration is the exercise, checked by [`is_correct`].

mod drug;
mod occupancy;
mod receptor;
mod unknown;
mod verifier;

pub use drug::{Drug, DrugRole, UNKNOWN_NAME};
pub use occupancy::{competitive_occupancy, mixed_concentration_uM};
pub use receptor::Receptor;
pub use unknown::{create_unknown, UnknownDrug};
pub use verifier::{is_correct, AnswerGuess, AnswerOutcome, AnswerVerifier, DEFAULT_TOLERANCE};

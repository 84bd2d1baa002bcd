//! Error types for experiment construction and bath operations.

/// Errors raised while configuring or driving an experiment.
///
/// Configuration variants are fatal setup errors: they are returned by
/// constructors and never by tension computation. Index and argument
/// variants are precondition failures on caller-facing operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ExperimentError {
    /// The stock drug roster is empty.
    #[error("stock drug roster is empty")]
    EmptyRoster,

    /// Two drugs in the roster share a name.
    #[error("drug name {name:?} appears more than once in the roster")]
    DuplicateDrugName {
        /// Offending name
        name: String,
    },

    /// An antagonist with a non-positive or non-finite dissociation constant.
    #[error("antagonist {name:?} has dissociation constant {kd_uM} uM, must be > 0")]
    InvalidDissociationConstant {
        /// Drug name
        name: String,
        /// Offending constant
        kd_uM: f64,
    },

    /// No receptors were configured, so no drug can produce tension.
    #[error("receptor roster is empty")]
    NoReceptors,

    /// A stock drug is not wired into any receptor and could never produce tension.
    #[error("stock drug {name:?} is not wired into any receptor")]
    UnwiredDrug {
        /// Drug name
        name: String,
    },

    /// A receptor was wired without any antagonist.
    #[error("receptor {receptor:?} has no antagonist")]
    MissingAntagonist {
        /// Receptor name
        receptor: String,
    },

    /// A receptor was wired without any agonist.
    #[error("receptor {receptor:?} has no agonist")]
    MissingAgonist {
        /// Receptor name
        receptor: String,
    },

    /// A receptor slot refers to a drug with the wrong role.
    #[error("receptor {receptor:?} expects an {expected} in slot {index}, found {found:?}")]
    RoleMismatch {
        /// Receptor name
        receptor: String,
        /// Roster index of the drug
        index: usize,
        /// Expected role
        expected: &'static str,
        /// Name of the drug found there
        found: String,
    },

    /// The Unknown drug was wired into both the agonist and antagonist slots of one receptor.
    #[error("receptor {receptor:?} holds the Unknown drug as both agonist and antagonist")]
    UnknownDrugConflict {
        /// Receptor name
        receptor: String,
    },

    /// A drug index outside the roster.
    #[error("drug index {index} out of range for roster of {len}")]
    DrugIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Roster length
        len: usize,
    },

    /// Bath volume must be strictly positive.
    #[error("bath volume {bath_volume_mL} mL must be > 0")]
    InvalidBathVolume {
        /// Offending volume
        bath_volume_mL: f64,
    },

    /// Negative or non-finite dose arguments.
    #[error("invalid dose: stock {stock_concentration_uM} uM, volume {stock_volume_mL} mL")]
    InvalidDose {
        /// Stock concentration
        stock_concentration_uM: f64,
        /// Stock volume
        stock_volume_mL: f64,
    },

    /// The unknown concentration range is empty or non-positive.
    #[error("unknown concentration range [{min_uM}, {max_uM}) must satisfy 0 < min < max")]
    InvalidUnknownRange {
        /// Lower bound
        min_uM: f64,
        /// Upper bound
        max_uM: f64,
    },

    /// Any other invalid parameter value.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// A persisted hidden answer that does not match the stock roster.
    #[error("cannot restore hidden answer: {reason}")]
    InvalidRestore {
        /// Why the answer was rejected
        reason: String,
    },
}

/// Result alias for experiment operations.
pub type Result<T> = std::result::Result<T, ExperimentError>;

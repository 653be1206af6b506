use ncc_multisig_domain::Address;

/// Fields of a request that are individually valid but contradict each other or the
/// configured limits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InconsistencyError {
    /// The validity window is zero or negative.
    #[error("hours due must be positive, got {0}")]
    NonPositiveHoursDue(i32),

    /// The validity window is longer than allowed.
    #[error("hours due {hours_due} exceeds the limit of {limit}")]
    HoursDueExceedsLimit {
        /// The requested window.
        hours_due: u32,
        /// The configured maximum.
        limit: u32,
    },

    /// The request adds and removes more cosignatories than allowed.
    #[error("{count} cosignatory modifications exceed the limit of {limit}")]
    TooManyModifications {
        /// Number of additions plus removals.
        count: usize,
        /// The configured maximum.
        limit: usize,
    },

    /// The same cosignatory appears twice in one list.
    #[error("cosignatory {0} is listed more than once")]
    DuplicateCosignatory(Address),

    /// The same cosignatory is both added and removed.
    #[error("cosignatory {0} is both added and removed")]
    CosignatoryAddedAndRemoved(Address),

    /// The multisig account is added as its own cosignatory.
    #[error("multisig account {0} cannot be its own cosignatory")]
    SelfCosignatory(Address),
}

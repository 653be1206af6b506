use core::num::NonZeroU32;

use bon::Builder;
use ncc_multisig_domain::NetworkVersion;

/// Settings shared by every field read from one document.
///
/// A context is copied into the nested deserializers created for objects and array
/// elements, so the same rules apply at every depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Builder)]
pub struct DeserializationContext {
    /// The network every address must belong to. `None` accepts all known networks.
    network: Option<NetworkVersion>,

    /// Upper bounds enforced on decoded requests.
    #[builder(default)]
    limits: RequestLimits,
}

/// Upper bounds enforced on decoded requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct RequestLimits {
    /// The longest validity window accepted, in hours.
    #[builder(default = RequestLimits::DEFAULT_MAX_HOURS_DUE)]
    max_hours_due: NonZeroU32,

    /// The largest number of cosignatory additions and removals in one request.
    #[builder(default = RequestLimits::DEFAULT_MAX_COSIGNATORY_MODIFICATIONS)]
    max_cosignatory_modifications: usize,
}

impl DeserializationContext {
    /// Returns the network addresses must belong to, if restricted.
    pub fn network(&self) -> Option<NetworkVersion> {
        self.network
    }

    /// Returns the request limits.
    pub fn limits(&self) -> &RequestLimits {
        &self.limits
    }
}

impl RequestLimits {
    /// Transactions cannot stay unconfirmed for longer than a day.
    pub const DEFAULT_MAX_HOURS_DUE: NonZeroU32 = NonZeroU32::new(24).unwrap();

    /// A multisig account holds at most 32 cosignatories.
    pub const DEFAULT_MAX_COSIGNATORY_MODIFICATIONS: usize = 32;

    /// Returns the longest validity window accepted, in hours.
    pub fn max_hours_due(&self) -> NonZeroU32 {
        self.max_hours_due
    }

    /// Returns the largest number of cosignatory modifications in one request.
    pub fn max_cosignatory_modifications(&self) -> usize {
        self.max_cosignatory_modifications
    }
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            max_hours_due: Self::DEFAULT_MAX_HOURS_DUE,
            max_cosignatory_modifications: Self::DEFAULT_MAX_COSIGNATORY_MODIFICATIONS,
        }
    }
}

use dledger_types::Name;

/// The admission/weight parameters a peer is configured with.
#[derive(Clone, Debug)]
pub struct AdmissionConfig {
    /// The federation's multicast prefix; record names are
    /// `<mc_prefix>/<producer identity>/<digest>`. Needed to decompose a
    /// preceding name back into its producer identity without ever scanning
    /// strings.
    pub mc_prefix: Name,
    /// Exact number of preceding references required on a non-GENESIS
    /// record.
    pub preceding_record_num: usize,
    /// `|approvers|` at which an entry is archived.
    pub confirm_weight: usize,
    /// Accepted and plumbed through, but not currently consulted by any
    /// rule — the source system only ever checks `confirm_weight` in
    /// practice.
    pub contribution_weight: usize,
    /// Gates admission check 5 (the contribution policy).
    pub using_contribution_policy: bool,
}

impl AdmissionConfig {
    pub fn new(mc_prefix: Name, preceding_record_num: usize, confirm_weight: usize) -> Self {
        Self {
            mc_prefix,
            preceding_record_num,
            confirm_weight,
            contribution_weight: confirm_weight.saturating_sub(1).max(1),
            using_contribution_policy: false,
        }
    }

    pub fn with_contribution_policy(mut self, enabled: bool, contribution_weight: usize) -> Self {
        self.using_contribution_policy = enabled;
        self.contribution_weight = contribution_weight;
        self
    }
}

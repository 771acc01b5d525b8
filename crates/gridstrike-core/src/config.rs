//! Submitter configuration.

/// Protocol-minimum gas price.
pub const DEFAULT_FEE_UNIT_PRICE: u64 = 1_000;

/// Gas ceiling that covers any single game action.
pub const DEFAULT_FEE_BUDGET: u64 = 10_000_000;

/// Local node started by the ledger's development tooling.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:9000";

/// Fixed parameters for every submission.
///
/// Built by the caller; nothing in this crate reads the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitterConfig {
    /// JSON-RPC endpoint of the ledger.
    pub endpoint: String,
    /// Gas price offered by the sponsor.
    pub fee_unit_price: u64,
    /// Maximum gas the sponsor pays for one transaction.
    pub fee_budget: u64,
}

impl SubmitterConfig {
    /// Default fees against `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Overrides the gas price.
    pub fn with_fee_unit_price(mut self, price: u64) -> Self {
        self.fee_unit_price = price;
        self
    }

    /// Overrides the gas budget.
    pub fn with_fee_budget(mut self, budget: u64) -> Self {
        self.fee_budget = budget;
        self
    }
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            fee_unit_price: DEFAULT_FEE_UNIT_PRICE,
            fee_budget: DEFAULT_FEE_BUDGET,
        }
    }
}

//! Allowance Orchestrator.
//!
//! Walks the supported chains in registry order and submits one allowance
//! request per chain. Chains with no usable entry or no token contract are
//! skipped, and a failed submission never stops the rest of the batch.

mod input;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{AllowanceConfig, ChainConfig};
use crate::sdk::{AllowanceRequest, ChainAbstraction, SdkError};

pub use input::{AllowanceTable, AllowanceValue, UNLIMITED};

/// Errors from allowance input or submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllowanceError {
    #[error("Invalid allowance '{input}': expected a non-negative integer or 'unlimited'")]
    InvalidInput { input: String },

    #[error("Please enter a valid non-zero amount (got '{input}')")]
    InvalidAmount { input: String },

    #[error("Chain {chain_id} is not supported")]
    UnknownChain { chain_id: u64 },

    #[error("Allowance on chain {chain_id} failed: {source}")]
    Submit {
        chain_id: u64,
        #[source]
        source: SdkError,
    },
}

/// Why a chain was left out of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingEntry,
    InvalidEntry { input: String },
    NoTokenContract,
    AmountOverflow,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEntry => write!(f, "no allowance entry"),
            Self::InvalidEntry { input } => write!(f, "invalid allowance '{}'", input),
            Self::NoTokenContract => write!(f, "no USDC contract configured"),
            Self::AmountOverflow => write!(f, "amount exceeds 256 bits once scaled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanStep {
    Submit(AllowanceRequest),
    Skip { chain_id: u64, reason: SkipReason },
}

/// What happened to each chain of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub submitted: Vec<u64>,
    pub skipped: Vec<(u64, SkipReason)>,
    pub failed: Vec<AllowanceError>,
}

impl BatchReport {
    pub fn attempted(&self) -> usize {
        self.submitted.len() + self.failed.len()
    }
}

/// Plans and submits allowance batches for a fixed chain registry.
#[derive(Debug, Clone)]
pub struct AllowanceOrchestrator {
    chains: Vec<ChainConfig>,
    settings: AllowanceConfig,
}

impl AllowanceOrchestrator {
    pub fn new(chains: Vec<ChainConfig>, settings: AllowanceConfig) -> Self {
        Self { chains, settings }
    }

    /// One step per registry chain, in registry order.
    pub fn plan(&self, table: &AllowanceTable) -> Vec<PlanStep> {
        self.chains
            .iter()
            .map(|chain| self.plan_chain(chain, table))
            .collect()
    }

    fn plan_chain(&self, chain: &ChainConfig, table: &AllowanceTable) -> PlanStep {
        let chain_id = chain.chain_id;
        let skip = |reason| PlanStep::Skip { chain_id, reason };

        let Some(input) = table.get(chain_id) else {
            return skip(SkipReason::MissingEntry);
        };
        let Ok(value) = AllowanceValue::parse(input) else {
            return skip(SkipReason::InvalidEntry {
                input: input.to_string(),
            });
        };
        let Some(token_address) = chain.usdc else {
            tracing::warn!(chain_id, "No USDC address for chain, skipping allowance");
            return skip(SkipReason::NoTokenContract);
        };
        let Some(amount) = value.to_base_units(self.settings.scale_factor) else {
            return skip(SkipReason::AmountOverflow);
        };

        PlanStep::Submit(AllowanceRequest {
            token_address,
            spender: self.settings.spender,
            amount,
            chain_id,
        })
    }

    /// Submits every planned request, one at a time, in order.
    ///
    /// Per-chain failures are collected, not propagated.
    pub async fn submit(&self, sdk: Arc<dyn ChainAbstraction>, table: &AllowanceTable) -> BatchReport {
        let mut report = BatchReport::default();
        for step in self.plan(table) {
            match step {
                PlanStep::Skip { chain_id, reason } => {
                    tracing::debug!(chain_id, %reason, "Allowance skipped");
                    report.skipped.push((chain_id, reason));
                }
                PlanStep::Submit(request) => {
                    let chain_id = request.chain_id;
                    match sdk.allowance(request).await {
                        Ok(()) => report.submitted.push(chain_id),
                        Err(source) => {
                            tracing::warn!(chain_id, error = %source, "Allowance submission failed");
                            report.failed.push(AllowanceError::Submit { chain_id, source });
                        }
                    }
                }
            }
        }
        tracing::info!(
            submitted = report.submitted.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Allowance batch finished"
        );
        report
    }
}

//! Unified Balance Fetcher.
//!
//! Queries aggregated balances from a ready SDK session and turns whatever
//! shape the SDK returned into a [`BalanceSnapshot`].

mod format;
mod normalize;

use std::collections::BTreeMap;
use std::sync::Arc;

use alloy_primitives::U256;
use thiserror::Error;

use crate::config::DisplayConfig;
use crate::sdk::{ChainAbstraction, SdkError};
use crate::wallet::AccountAddress;

pub use format::{display_precision, format_amount, parse_amount, MAX_DECIMALS};
pub use normalize::{normalize, Normalized};

/// Errors from fetching or normalizing balances.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    #[error("Failed to fetch unified balances: {0}")]
    Fetch(#[from] SdkError),

    #[error("Unrecognized balance response shape ({found})")]
    UnrecognizedShape { found: &'static str },
}

/// A field that was missing or unusable and was treated as zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{asset}: missing or non-numeric {field}, treated as zero")]
pub struct PartialDataError {
    pub asset: String,
    pub field: &'static str,
}

impl PartialDataError {
    pub fn new(asset: &str, field: &'static str) -> Self {
        Self {
            asset: asset.to_string(),
            field,
        }
    }
}

/// Balance of one asset on one chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainBalance {
    pub chain_id: u64,
    pub raw_balance: U256,
    pub decimals: u8,
    pub fiat_value: Option<f64>,
}

/// Aggregated balance of one asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetBalance {
    pub symbol: String,
    pub raw_balance: U256,
    /// Display exponent for `raw_balance`.
    pub decimals: u8,
    pub fiat_value: Option<f64>,
    pub breakdown: Vec<ChainBalance>,
}

impl AssetBalance {
    pub fn formatted(&self) -> String {
        format_amount(self.raw_balance, self.decimals, display_precision(&self.symbol))
    }

    pub fn on_chain(&self, chain_id: u64) -> Option<&ChainBalance> {
        self.breakdown.iter().find(|c| c.chain_id == chain_id)
    }
}

/// Symbol → display exponent, with a fallback for unknown assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalTable {
    known: BTreeMap<String, u8>,
    fallback: u8,
}

impl DecimalTable {
    pub fn from_config(config: &DisplayConfig) -> Self {
        Self {
            known: config
                .decimals
                .iter()
                .map(|(symbol, d)| (symbol.to_ascii_uppercase(), *d))
                .collect(),
            fallback: config.default_decimals,
        }
    }

    pub fn decimals_for(&self, symbol: &str) -> u8 {
        self.known
            .get(&symbol.to_ascii_uppercase())
            .copied()
            .unwrap_or(self.fallback)
    }
}

/// Result of one successful fetch. Replaced wholesale on the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceSnapshot {
    pub account: AccountAddress,
    pub assets: Vec<AssetBalance>,
    /// Sum of all fiat values; missing values count as zero.
    pub total_fiat: f64,
    pub partial: Vec<PartialDataError>,
}

impl BalanceSnapshot {
    pub fn from_normalized(account: AccountAddress, normalized: Normalized) -> Self {
        let total_fiat = total_fiat(&normalized.assets);
        Self {
            account,
            assets: normalized.assets,
            total_fiat,
            partial: normalized.partial,
        }
    }

    /// Chains that appear in any breakdown, in first-seen order.
    pub fn chain_ids(&self) -> Vec<u64> {
        let mut ids = Vec::new();
        for chain in self.assets.iter().flat_map(|a| a.breakdown.iter()) {
            if !ids.contains(&chain.chain_id) {
                ids.push(chain.chain_id);
            }
        }
        ids
    }

    /// `(symbol, formatted amount)` for every asset held on `chain_id`.
    pub fn holdings_on(&self, chain_id: u64) -> Vec<(String, String)> {
        self.assets
            .iter()
            .filter_map(|asset| {
                let entry = asset.on_chain(chain_id)?;
                let amount = format_amount(
                    entry.raw_balance,
                    entry.decimals,
                    display_precision(&asset.symbol),
                );
                Some((asset.symbol.clone(), amount))
            })
            .collect()
    }
}

/// Sums fiat values, treating missing or non-finite ones as zero.
pub fn total_fiat(assets: &[AssetBalance]) -> f64 {
    assets
        .iter()
        .filter_map(|a| a.fiat_value)
        .filter(|v| v.is_finite())
        .sum()
}

/// Fetches and normalizes unified balances.
#[derive(Debug, Clone)]
pub struct UnifiedBalanceFetcher {
    table: DecimalTable,
}

impl UnifiedBalanceFetcher {
    pub fn new(table: DecimalTable) -> Self {
        Self { table }
    }

    /// Callers must only pass the SDK of a `Ready` session.
    pub async fn fetch(
        &self,
        sdk: Arc<dyn ChainAbstraction>,
        account: AccountAddress,
    ) -> Result<BalanceSnapshot, BalanceError> {
        let response = sdk.get_unified_balances(Some(account.to_string())).await?;
        let normalized = normalize(&response, &self.table)?;
        for gap in &normalized.partial {
            tracing::warn!(asset = %gap.asset, field = gap.field, "Partial balance data");
        }
        Ok(BalanceSnapshot::from_normalized(account, normalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedSdk;
    use serde_json::json;

    fn account() -> AccountAddress {
        AccountAddress::parse("0x52908400098527886E0F7030069857D2E4169EE7").unwrap()
    }

    fn fetcher() -> UnifiedBalanceFetcher {
        UnifiedBalanceFetcher::new(DecimalTable::from_config(&DisplayConfig::default()))
    }

    #[test]
    fn missing_fiat_counts_as_zero() {
        let table = DecimalTable::from_config(&DisplayConfig::default());
        let response = json!([
            { "symbol": "ETH", "balance": "1", "balanceInFiat": 10.25 },
            { "symbol": "USDC", "balance": "1" },
            { "symbol": "USDT", "balance": "1", "balanceInFiat": "n/a" },
            { "symbol": "DAI", "balance": "1", "balanceInFiat": "4.75" }
        ]);

        let snapshot = BalanceSnapshot::from_normalized(account(), normalize(&response, &table).unwrap());
        assert_eq!(snapshot.total_fiat, 15.0);
        assert!(!snapshot.total_fiat.is_nan());
        assert_eq!(snapshot.partial.len(), 2);
    }

    #[test]
    fn decimal_table_is_case_insensitive_with_fallback() {
        let table = DecimalTable::from_config(&DisplayConfig::default());
        assert_eq!(table.decimals_for("eth"), 18);
        assert_eq!(table.decimals_for("USDC"), 6);
        assert_eq!(table.decimals_for("WBTC"), 0);
    }

    #[test]
    fn holdings_on_lists_assets_for_one_chain() {
        let table = DecimalTable::from_config(&DisplayConfig::default());
        let response = json!([
            { "chainId": 1, "balance": "1500000000000000000", "tokens": { "USDC": "2500000" } },
            { "chainId": 10, "balance": "0" }
        ]);
        let snapshot = BalanceSnapshot::from_normalized(account(), normalize(&response, &table).unwrap());

        assert_eq!(snapshot.chain_ids(), vec![1, 10]);
        assert_eq!(
            snapshot.holdings_on(1),
            vec![
                ("ETH".to_string(), "1.5000".to_string()),
                ("USDC".to_string(), "2.50".to_string())
            ]
        );
        assert_eq!(snapshot.holdings_on(10), vec![("ETH".to_string(), "0.0000".to_string())]);
    }

    #[tokio::test]
    async fn fetch_normalizes_sdk_response() {
        let sdk = Arc::new(SimulatedSdk::new());
        sdk.set_balances(json!({ "ETH": { "balance": "2000000000000000000", "balanceInFiat": 6000 } }));

        let snapshot = fetcher().fetch(sdk, account()).await.unwrap();
        assert_eq!(snapshot.assets[0].formatted(), "2.0000");
        assert_eq!(snapshot.total_fiat, 6000.0);
    }

    #[tokio::test]
    async fn fetch_surfaces_sdk_failure() {
        let sdk = Arc::new(SimulatedSdk::new());
        sdk.fail_balances("indexer offline");

        let err = fetcher().fetch(sdk, account()).await.unwrap_err();
        assert!(matches!(err, BalanceError::Fetch(_)));
    }
}

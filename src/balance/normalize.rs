//! Coerces the SDK's balance responses into one canonical asset list.
//!
//! Recognised shapes:
//! - a list of per-asset records (`[{symbol, balance, decimals, balanceInFiat, breakdown}]`)
//! - an object keyed by asset (`{"ETH": {...}, "USDC": "1000"}`)
//! - an object wrapping either of the above under `balances`, `assets` or `data`
//! - a list of per-chain records (`[{chainId, balance, tokens: {SYM: amount}}]`)
//!
//! Anything else is rejected with [`BalanceError::UnrecognizedShape`].

use alloy_primitives::U256;
use serde_json::{Map, Value};

use super::format::{parse_amount, MAX_DECIMALS};
use super::{AssetBalance, BalanceError, ChainBalance, DecimalTable, PartialDataError};

const SYMBOL_KEYS: &[&str] = &["symbol", "asset", "token"];
const BALANCE_KEYS: &[&str] = &["balance", "rawBalance", "amount"];
const FIAT_KEYS: &[&str] = &["balanceInFiat", "fiatValue", "fiat"];
const BREAKDOWN_KEYS: &[&str] = &["breakdown", "perChain", "chains"];
const WRAPPER_KEYS: &[&str] = &["balances", "assets", "data"];

/// Normalized assets plus the fields that had to be defaulted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub assets: Vec<AssetBalance>,
    pub partial: Vec<PartialDataError>,
}

pub fn normalize(response: &Value, table: &DecimalTable) -> Result<Normalized, BalanceError> {
    let mut out = Normalized::default();
    match response {
        Value::Array(items) if items.iter().any(is_chain_record) => {
            from_chain_records(items, table, &mut out);
        }
        Value::Array(items) => {
            for item in items {
                push_record(None, item, table, &mut out);
            }
        }
        Value::Object(map) => {
            if let Some(inner) = WRAPPER_KEYS.iter().find_map(|k| map.get(*k)) {
                if inner.is_array() || inner.is_object() {
                    return normalize(inner, table);
                }
            }
            for (symbol, item) in map {
                push_record(Some(symbol.as_str()), item, table, &mut out);
            }
        }
        other => {
            return Err(BalanceError::UnrecognizedShape {
                found: value_kind(other),
            })
        }
    }
    Ok(out)
}

fn push_record(hint: Option<&str>, item: &Value, table: &DecimalTable, out: &mut Normalized) {
    match item {
        Value::Object(fields) => {
            let symbol = text(fields, SYMBOL_KEYS).or_else(|| hint.map(str::to_string));
            let Some(symbol) = symbol else {
                tracing::warn!("Balance record without a symbol skipped");
                out.partial.push(PartialDataError::new("<unknown>", "symbol"));
                return;
            };
            let decimals = explicit_decimals(fields).unwrap_or_else(|| table.decimals_for(&symbol));

            let raw_balance = match first(fields, BALANCE_KEYS) {
                Some(value) => amount(value, decimals),
                None => None,
            };
            let raw_balance = raw_balance.unwrap_or_else(|| {
                out.partial.push(PartialDataError::new(&symbol, "balance"));
                U256::ZERO
            });

            let fiat_value = first(fields, FIAT_KEYS).and_then(fiat);
            if fiat_value.is_none() {
                out.partial.push(PartialDataError::new(&symbol, "fiat value"));
            }

            let breakdown: Vec<ChainBalance> = first(fields, BREAKDOWN_KEYS)
                .and_then(Value::as_array)
                .map(|entries| {
                    entries
                        .iter()
                        .filter_map(|entry| chain_entry(entry, decimals))
                        .collect()
                })
                .unwrap_or_default();

            out.assets.push(AssetBalance {
                symbol,
                raw_balance,
                decimals,
                fiat_value,
                breakdown,
            });
        }
        scalar => {
            let Some(symbol) = hint else {
                out.partial.push(PartialDataError::new("<unknown>", "symbol"));
                return;
            };
            let decimals = table.decimals_for(symbol);
            let raw_balance = amount(scalar, decimals).unwrap_or_else(|| {
                out.partial.push(PartialDataError::new(symbol, "balance"));
                U256::ZERO
            });
            out.partial.push(PartialDataError::new(symbol, "fiat value"));
            out.assets.push(AssetBalance {
                symbol: symbol.to_string(),
                raw_balance,
                decimals,
                fiat_value: None,
                breakdown: Vec::new(),
            });
        }
    }
}

fn chain_entry(entry: &Value, asset_decimals: u8) -> Option<ChainBalance> {
    let fields = entry.as_object()?;
    let chain_id = chain_id(fields)?;
    let decimals = explicit_decimals(fields).unwrap_or(asset_decimals);
    let raw_balance = first(fields, BALANCE_KEYS)
        .and_then(|v| amount(v, decimals))
        .unwrap_or(U256::ZERO);
    Some(ChainBalance {
        chain_id,
        raw_balance,
        decimals,
        fiat_value: first(fields, FIAT_KEYS).and_then(fiat),
    })
}

fn is_chain_record(item: &Value) -> bool {
    item.as_object()
        .map(|fields| fields.contains_key("chainId") && first(fields, SYMBOL_KEYS).is_none())
        .unwrap_or(false)
}

/// Per-chain records: native balance under `balance`, tokens under `tokens`.
fn from_chain_records(items: &[Value], table: &DecimalTable, out: &mut Normalized) {
    for item in items {
        let Some(fields) = item.as_object() else {
            continue;
        };
        let Some(chain_id) = chain_id(fields) else {
            continue;
        };

        let mut holdings: Vec<(String, &Value)> = Vec::new();
        if let Some(native) = fields.get("balance") {
            holdings.push(("ETH".to_string(), native));
        }
        if let Some(Value::Object(tokens)) = fields.get("tokens") {
            holdings.extend(tokens.iter().map(|(sym, v)| (sym.clone(), v)));
        }

        for (symbol, value) in holdings {
            let decimals = table.decimals_for(&symbol);
            let raw = amount(value, decimals).unwrap_or_else(|| {
                out.partial.push(PartialDataError::new(&symbol, "balance"));
                U256::ZERO
            });
            let entry = ChainBalance {
                chain_id,
                raw_balance: raw,
                decimals,
                fiat_value: None,
            };

            match out.assets.iter_mut().find(|a| a.symbol == symbol) {
                Some(asset) => {
                    asset.raw_balance = asset.raw_balance.saturating_add(raw);
                    asset.breakdown.push(entry);
                }
                None => {
                    out.partial.push(PartialDataError::new(&symbol, "fiat value"));
                    out.assets.push(AssetBalance {
                        symbol,
                        raw_balance: raw,
                        decimals,
                        fiat_value: None,
                        breakdown: vec![entry],
                    });
                }
            }
        }
    }
}

fn first<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|k| fields.get(*k))
        .filter(|v| !v.is_null())
}

fn text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    first(fields, keys)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn explicit_decimals(fields: &Map<String, Value>) -> Option<u8> {
    let value = fields.get("decimals")?;
    let n = value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))?;
    u8::try_from(n).ok().filter(|d| *d <= MAX_DECIMALS)
}

fn chain_id(fields: &Map<String, Value>) -> Option<u64> {
    let direct = fields.get("chainId").or_else(|| fields.get("chain_id"));
    let nested = fields.get("chain").and_then(|c| c.get("id"));
    let value = direct.or(nested)?;
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn amount(value: &Value, decimals: u8) -> Option<U256> {
    match value {
        Value::String(s) => parse_amount(s, decimals),
        Value::Number(n) => match n.as_u64() {
            Some(v) => Some(U256::from(v)),
            None => parse_amount(&n.to_string(), decimals),
        },
        _ => None,
    }
}

fn fiat(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

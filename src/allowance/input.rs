//! Allowance input capture and the per-chain allowance table.

use std::collections::BTreeMap;

use alloy_primitives::U256;

use super::AllowanceError;

/// Sentinel accepted in place of an amount.
pub const UNLIMITED: &str = "unlimited";

/// A validated allowance entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowanceValue {
    Unlimited,
    /// Amount in the user-facing unit (gwei-equivalent).
    Amount(U256),
}

impl AllowanceValue {
    /// Accepts the `unlimited` sentinel (any case) or a non-negative
    /// decimal integer. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Result<Self, AllowanceError> {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case(UNLIMITED) {
            return Ok(Self::Unlimited);
        }

        let invalid = || AllowanceError::InvalidInput {
            input: input.to_string(),
        };
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        U256::from_str_radix(trimmed, 10)
            .map(Self::Amount)
            .map_err(|_| invalid())
    }

    /// Like [`AllowanceValue::parse`] but only for a strictly positive amount.
    pub fn parse_positive_amount(input: &str) -> Result<U256, AllowanceError> {
        match Self::parse(input) {
            Ok(Self::Amount(n)) if !n.is_zero() => Ok(n),
            _ => Err(AllowanceError::InvalidAmount {
                input: input.to_string(),
            }),
        }
    }

    /// On-chain amount: `2^256 - 1` for unlimited, otherwise the amount
    /// times `scale`. `None` if the product does not fit in 256 bits.
    pub fn to_base_units(&self, scale: u64) -> Option<U256> {
        match self {
            Self::Unlimited => Some(U256::MAX),
            Self::Amount(n) => n.checked_mul(U256::from(scale)),
        }
    }
}

/// Raw allowance input per supported chain.
///
/// The key set is fixed at construction: entries can be edited or reset,
/// never added or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowanceTable {
    entries: BTreeMap<u64, String>,
}

impl AllowanceTable {
    /// Every chain starts at `unlimited`.
    pub fn new(chain_ids: &[u64]) -> Self {
        Self {
            entries: chain_ids
                .iter()
                .map(|id| (*id, UNLIMITED.to_string()))
                .collect(),
        }
    }

    pub fn get(&self, chain_id: u64) -> Option<&str> {
        self.entries.get(&chain_id).map(String::as_str)
    }

    /// Parsed entry; `None` when missing or not a valid value.
    pub fn value(&self, chain_id: u64) -> Option<AllowanceValue> {
        AllowanceValue::parse(self.get(chain_id)?).ok()
    }

    pub fn set(&mut self, chain_id: u64, input: impl Into<String>) -> Result<(), AllowanceError> {
        let entry = self
            .entries
            .get_mut(&chain_id)
            .ok_or(AllowanceError::UnknownChain { chain_id })?;
        *entry = input.into();
        Ok(())
    }

    pub fn set_all(&mut self, input: &str) {
        for entry in self.entries.values_mut() {
            *entry = input.to_string();
        }
    }

    /// Back to `unlimited` everywhere.
    pub fn reset(&mut self) {
        self.set_all(UNLIMITED);
    }

    /// Sets every entry to `0`.
    pub fn clear_all(&mut self) {
        self.set_all("0");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &str)> {
        self.entries.iter().map(|(id, v)| (*id, v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_maps_to_u256_max() {
        let value = AllowanceValue::parse("unlimited").unwrap();
        assert_eq!(
            value.to_base_units(1000).unwrap().to_string(),
            "115792089237316195423570985008687907853269984665640564039457584007913129639935"
        );
    }

    #[test]
    fn amounts_scale_by_exact_integer_arithmetic() {
        let five = AllowanceValue::parse("5").unwrap();
        assert_eq!(five.to_base_units(1000), Some(U256::from(5000u64)));

        let large = AllowanceValue::parse("123456789012345").unwrap();
        assert_eq!(
            large.to_base_units(1000).unwrap().to_string(),
            "123456789012345000"
        );

        let huge = AllowanceValue::parse("123456789012345678901234567890").unwrap();
        assert_eq!(
            huge.to_base_units(1000).unwrap().to_string(),
            "123456789012345678901234567890000"
        );
    }

    #[test]
    fn overflowing_amount_has_no_base_units() {
        let max = U256::MAX.to_string();
        let value = AllowanceValue::parse(&max).unwrap();
        assert_eq!(value.to_base_units(1000), None);
    }

    #[test]
    fn rejects_non_integer_input() {
        for bad in ["", " ", "-1", "1.5", "1e3", "abc", "+5", "0x10"] {
            assert!(
                matches!(
                    AllowanceValue::parse(bad),
                    Err(AllowanceError::InvalidInput { .. })
                ),
                "{bad:?}"
            );
        }
        assert_eq!(AllowanceValue::parse(" 7 "), Ok(AllowanceValue::Amount(U256::from(7u64))));
        assert_eq!(AllowanceValue::parse("Unlimited"), Ok(AllowanceValue::Unlimited));
    }

    #[test]
    fn positive_amount_rejects_zero_and_sentinel() {
        assert!(AllowanceValue::parse_positive_amount("0").is_err());
        assert!(AllowanceValue::parse_positive_amount("unlimited").is_err());
        assert_eq!(
            AllowanceValue::parse_positive_amount("12"),
            Ok(U256::from(12u64))
        );
    }

    #[test]
    fn table_keeps_one_entry_per_chain() {
        let chains = [1, 10, 8453];
        let mut table = AllowanceTable::new(&chains);
        assert_eq!(table.len(), 3);

        table.set(10, "42").unwrap();
        assert_eq!(
            table.set(999, "1"),
            Err(AllowanceError::UnknownChain { chain_id: 999 })
        );
        table.clear_all();
        assert!(table.iter().all(|(_, v)| v == "0"));
        table.reset();

        assert_eq!(table.len(), 3);
        assert!(chains
            .iter()
            .all(|id| table.value(*id) == Some(AllowanceValue::Unlimited)));
    }

    #[test]
    fn invalid_entry_has_no_value() {
        let mut table = AllowanceTable::new(&[1]);
        table.set(1, "lots").unwrap();
        assert_eq!(table.get(1), Some("lots"));
        assert_eq!(table.value(1), None);
    }
}

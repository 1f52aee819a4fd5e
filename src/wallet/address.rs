use std::fmt;
use std::str::FromStr;

use alloy_primitives::Address;

use super::WalletError;

/// An account address that passed `^0x[a-fA-F0-9]{40}$`.
///
/// The only way to build one is [`AccountAddress::parse`], so a connected
/// state can never hold a malformed account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountAddress(Address);

impl AccountAddress {
    pub fn parse(raw: &str) -> Result<Self, WalletError> {
        let invalid = || WalletError::InvalidAddress {
            address: raw.to_string(),
        };

        let Some(hex) = raw.strip_prefix("0x") else {
            return Err(invalid());
        };
        if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        Address::from_str(raw).map(Self).map_err(|_| invalid())
    }

    pub fn as_address(&self) -> Address {
        self.0
    }
}

impl FromStr for AccountAddress {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_checksum(None))
    }
}

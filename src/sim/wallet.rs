use async_trait::async_trait;
use parking_lot::Mutex;

use crate::wallet::{WalletError, WalletProvider, USER_REJECTED_CODE};

/// Wallet provider with a fixed account list.
pub struct SimulatedWallet {
    accounts: Vec<String>,
    authorized: Mutex<Vec<String>>,
    reject: bool,
    prompts: Mutex<u32>,
}

impl SimulatedWallet {
    /// A wallet holding `accounts`, none authorized yet.
    pub fn new(accounts: Vec<String>) -> Self {
        Self {
            accounts,
            authorized: Mutex::new(Vec::new()),
            reject: false,
            prompts: Mutex::new(0),
        }
    }

    /// Every account prompt is rejected with EIP-1193 code 4001.
    pub fn rejecting(mut self) -> Self {
        self.reject = true;
        self
    }

    /// Accounts are already authorized, as after an earlier visit.
    pub fn pre_authorized(self) -> Self {
        *self.authorized.lock() = self.accounts.clone();
        self
    }

    /// Number of interactive prompts shown so far.
    pub fn prompts(&self) -> u32 {
        *self.prompts.lock()
    }
}

#[async_trait]
impl WalletProvider for SimulatedWallet {
    async fn eth_accounts(&self) -> Result<Vec<String>, WalletError> {
        Ok(self.authorized.lock().clone())
    }

    async fn eth_request_accounts(&self) -> Result<Vec<String>, WalletError> {
        *self.prompts.lock() += 1;
        if self.reject {
            return Err(WalletError::Rpc {
                code: USER_REJECTED_CODE,
                message: "User rejected the request.".to_string(),
            });
        }
        *self.authorized.lock() = self.accounts.clone();
        Ok(self.accounts.clone())
    }
}

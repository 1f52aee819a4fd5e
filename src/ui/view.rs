//! Read-only view derived from [`App`] state, plus a plain-text renderer.

use crate::balance::BalanceSnapshot;
use crate::config::Config;
use crate::ui::app::App;
use crate::ui::connection::ConnectionState;

#[derive(Debug, Clone, PartialEq)]
pub struct AssetLine {
    pub symbol: String,
    pub amount: String,
    pub fiat: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainOption {
    pub chain_id: u64,
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalancePopupView {
    pub chains: Vec<ChainOption>,
    /// `(symbol, amount)` held on the selected chain.
    pub holdings: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowanceRow {
    pub chain_id: u64,
    pub name: String,
    pub value: String,
}

/// Main screen: what the user sees for the current coordinator state.
#[derive(Debug, Clone, PartialEq)]
pub enum MainView {
    NoProvider,
    Disconnected,
    Connecting,
    Initializing,
    Ready {
        account: String,
        unified_balance: Option<String>,
        /// A balance fetch is in flight.
        balances_loading: bool,
        assets: Vec<AssetLine>,
        allowance_status: Option<String>,
        intent_status: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub main: MainView,
    pub balance_popup: Option<BalancePopupView>,
    pub allowance_dialog: Option<Vec<AllowanceRow>>,
    /// The allowance batch is being submitted.
    pub allowance_submitting: bool,
    pub error: Option<String>,
}

impl ViewModel {
    pub fn from_app(app: &App) -> Self {
        let main = match (app.connection(), app.wallet_detected()) {
            (ConnectionState::Disconnected, false) => MainView::NoProvider,
            (ConnectionState::Disconnected, true) => MainView::Disconnected,
            (ConnectionState::Connecting, _) => MainView::Connecting,
            (ConnectionState::Connected(_), _) if !app.session_state().is_ready() => {
                MainView::Initializing
            }
            (ConnectionState::Connected(account), _) => MainView::Ready {
                account: account.to_string(),
                unified_balance: app
                    .snapshot()
                    .map(|snapshot| format!("${:.2}", snapshot.total_fiat)),
                balances_loading: app.is_loading_balances(),
                assets: app.snapshot().map(asset_lines).unwrap_or_default(),
                allowance_status: app.status().allowance().map(ToString::to_string),
                intent_status: app.status().intent().map(ToString::to_string),
            },
        };

        let balance_popup = match (app.popups().balances, app.snapshot()) {
            (Some(popup), Some(snapshot)) => {
                Some(balance_popup(app.config(), snapshot, popup.selected_chain))
            }
            _ => None,
        };

        let allowance_dialog = app.popups().allowance_open.then(|| {
            app.config()
                .chains
                .iter()
                .filter_map(|chain| {
                    Some(AllowanceRow {
                        chain_id: chain.chain_id,
                        name: chain.name.clone(),
                        value: app.allowances().get(chain.chain_id)?.to_string(),
                    })
                })
                .collect()
        });

        Self {
            main,
            balance_popup,
            allowance_dialog,
            allowance_submitting: app.is_submitting_allowances(),
            error: app.last_error().map(ToString::to_string),
        }
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match &self.main {
            MainView::NoProvider => lines.push(
                "No wallet provider detected. Please install MetaMask or another wallet.".into(),
            ),
            MainView::Disconnected => {
                lines.push("Wallet provider detected. Please connect your wallet.".into())
            }
            MainView::Connecting => lines.push("Connecting wallet...".into()),
            MainView::Initializing => lines.push("Initializing CA SDK...".into()),
            MainView::Ready {
                account,
                unified_balance,
                balances_loading,
                assets,
                allowance_status,
                intent_status,
            } => {
                lines.push(format!("Connected: {}", account));
                let balance = match unified_balance {
                    Some(balance) if !*balances_loading => balance.as_str(),
                    _ => "Loading...",
                };
                lines.push(format!("Unified Balance: {}", balance));
                for asset in assets {
                    let fiat = asset
                        .fiat
                        .as_ref()
                        .map(|f| format!(" ({})", f))
                        .unwrap_or_default();
                    lines.push(format!("  {} {}{}", asset.amount, asset.symbol, fiat));
                }
                lines.push(format!(
                    "Allowance Status: {}",
                    allowance_status.as_deref().unwrap_or("No allowance set")
                ));
                lines.push(format!(
                    "Intent Status: {}",
                    intent_status.as_deref().unwrap_or("No intent")
                ));
            }
        }

        if let Some(popup) = &self.balance_popup {
            lines.push(String::new());
            lines.push("Chain Balances".into());
            for chain in &popup.chains {
                let marker = if chain.selected { '>' } else { ' ' };
                lines.push(format!("{} {} ({})", marker, chain.name, chain.chain_id));
            }
            if popup.chains.iter().any(|c| c.selected) {
                if popup.holdings.is_empty() {
                    lines.push("  No balances available".into());
                }
                for (symbol, amount) in &popup.holdings {
                    lines.push(format!("  {}: {} {}", symbol, amount, symbol));
                }
            }
        }

        if let Some(rows) = &self.allowance_dialog {
            lines.push(String::new());
            lines.push("Set USDC Allowances".into());
            if self.allowance_submitting {
                lines.push("  Setting allowances...".into());
            }
            for row in rows {
                lines.push(format!("  {} ({}): {}", row.name, row.chain_id, row.value));
            }
        }

        if let Some(error) = &self.error {
            lines.push(format!("Error: {}", error));
        }
        lines
    }
}

fn asset_lines(snapshot: &BalanceSnapshot) -> Vec<AssetLine> {
    snapshot
        .assets
        .iter()
        .map(|asset| AssetLine {
            symbol: asset.symbol.clone(),
            amount: asset.formatted(),
            fiat: asset.fiat_value.map(|v| format!("${:.2}", v)),
        })
        .collect()
}

fn balance_popup(config: &Config, snapshot: &BalanceSnapshot, selected: Option<u64>) -> BalancePopupView {
    BalancePopupView {
        chains: snapshot
            .chain_ids()
            .into_iter()
            .map(|chain_id| ChainOption {
                chain_id,
                name: config.chain_name(chain_id),
                selected: selected == Some(chain_id),
            })
            .collect(),
        holdings: selected
            .map(|chain_id| snapshot.holdings_on(chain_id))
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimulatedSdk, SimulatedWallet};
    use crate::wallet::WalletAdapter;
    use std::sync::Arc;

    const ACCOUNT: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

    fn app(wallet: WalletAdapter) -> App {
        App::new(Config::default(), wallet, Arc::new(SimulatedSdk::new()))
    }

    fn wallet() -> WalletAdapter {
        WalletAdapter::with_provider(Arc::new(SimulatedWallet::new(vec![ACCOUNT.to_string()])))
    }

    #[test]
    fn no_provider_message() {
        let view = app(WalletAdapter::default()).view();
        assert_eq!(view.main, MainView::NoProvider);
        assert_eq!(
            view.render(),
            vec!["No wallet provider detected. Please install MetaMask or another wallet."]
        );
    }

    #[tokio::test]
    async fn ready_view_lists_balances_and_statuses() {
        let mut app = app(wallet());
        app.connect().unwrap();
        app.run_until_idle().await;

        let lines = app.view().render();
        assert_eq!(lines[0], format!("Connected: {}", ACCOUNT));
        assert_eq!(lines[1], "Unified Balance: $2370.50");
        assert_eq!(lines[2], "  0.7500 ETH ($2250.00)");
        assert_eq!(lines[3], "  120.50 USDC ($120.50)");
        assert_eq!(lines[4], "Allowance Status: No allowance set");
        assert_eq!(lines[5], "Intent Status: No intent");
    }

    #[tokio::test]
    async fn balance_popup_shows_selected_chain_holdings() {
        let mut app = app(wallet());
        app.connect().unwrap();
        app.run_until_idle().await;
        app.show_balances().unwrap();
        app.run_until_idle().await;
        app.select_chain(10);

        let popup = app.view().balance_popup.unwrap();
        let names: Vec<&str> = popup.chains.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ethereum", "Base", "Optimism", "Arbitrum"]);
        assert_eq!(popup.holdings, vec![("USDC".to_string(), "100.00".to_string())]);
    }

    #[tokio::test]
    async fn allowance_dialog_rows_follow_registry() {
        let mut app = app(wallet());
        app.connect().unwrap();
        app.run_until_idle().await;
        app.set_allowance().unwrap();

        let rows = app.view().allowance_dialog.unwrap();
        let ids: Vec<u64> = rows.iter().map(|r| r.chain_id).collect();
        assert_eq!(ids, app.config().chain_ids());
        assert!(rows.iter().all(|r| r.value == "unlimited"));
    }

    #[tokio::test]
    async fn in_flight_work_is_shown_as_loading() {
        let mut app = app(wallet());
        app.connect().unwrap();
        app.run_until_idle().await;
        app.set_allowance().unwrap();
        app.show_balances().unwrap();
        app.submit_allowances().unwrap();

        let view = app.view();
        assert!(view.allowance_submitting);
        let lines = view.render();
        assert_eq!(lines[1], "Unified Balance: Loading...");
        assert!(lines.iter().any(|l| l == "  Setting allowances..."));

        app.run_until_idle().await;
        let lines = app.view().render();
        assert_eq!(lines[1], "Unified Balance: $2370.50");
        assert!(!lines.iter().any(|l| l == "Set USDC Allowances"));
    }
}

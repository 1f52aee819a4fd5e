use std::path::PathBuf;
use std::sync::Arc;

use alloy_primitives::{address, Address, U256};
use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use serde_json::json;

use ca_sample::balance::parse_amount;
use ca_sample::config::Config;
use ca_sample::sdk::{BridgeRequest, RpcRequest, TransferRequest};
use ca_sample::sim::{SimulatedSdk, SimulatedWallet};
use ca_sample::ui::App;
use ca_sample::wallet::WalletAdapter;
use ca_sample::AppError;

const DEFAULT_ACCOUNT: &str = "0x52908400098527886E0F7030069857D2E4169EE7";
const DEMO_RECIPIENT: Address = address!("0x0000000000000000000000000000000000000002");
const USDC_DECIMALS: u8 = 6;

/// Drives the wallet/session/allowance coordinator against in-memory
/// wallet and SDK backends, printing the rendered view after each step.
#[derive(Debug, Parser)]
#[command(name = "ca-sample", version, about)]
struct Cli {
    /// Config file (default: <config dir>/ca-sample/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run without a wallet provider
    #[arg(long)]
    no_wallet: bool,

    /// Wallet rejects every account prompt
    #[arg(long)]
    reject: bool,

    /// Account the wallet returns
    #[arg(long, value_name = "ADDR", default_value = DEFAULT_ACCOUNT)]
    account: String,

    /// JSON file served as the unified balance response
    #[arg(long, value_name = "FILE")]
    balances: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Connect, show balances, set allowances, transfer, bridge, disconnect
    Demo,
    /// Connect and open the balance popup
    Balances,
    /// Connect and submit USDC allowances on every chain
    Allowance {
        /// Amount per chain, in gwei-equivalent units
        #[arg(long, conflicts_with = "unlimited")]
        amount: Option<String>,
        #[arg(long)]
        unlimited: bool,
    },
    /// Connect and transfer USDC
    Transfer {
        /// Amount in USDC (e.g. 0.5)
        #[arg(long)]
        amount: String,
        #[arg(long, default_value_t = 1)]
        chain: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ca_sample::logging::init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let sdk = Arc::new(SimulatedSdk::new());
    if let Some(path) = &cli.balances {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read balances from {}", path.display()))?;
        let value = serde_json::from_str(&text)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?;
        sdk.set_balances(value);
    }

    let wallet = if cli.no_wallet {
        WalletAdapter::default()
    } else {
        let mut provider = SimulatedWallet::new(vec![cli.account.clone()]);
        if cli.reject {
            provider = provider.rejecting();
        }
        WalletAdapter::with_provider(Arc::new(provider))
    };

    let mut app = App::new(config, wallet, sdk);
    let result = run(&mut app, cli.command).await;
    app.shutdown();
    result
}

async fn run(app: &mut App, command: Command) -> anyhow::Result<()> {
    step(app, "connect", App::connect).await?;

    match command {
        Command::Demo => {
            step(app, "show balances", App::show_balances).await?;
            if let Some(chain_id) = app.snapshot().and_then(|s| s.chain_ids().last().copied()) {
                step(app, "select chain", |app| {
                    app.select_chain(chain_id);
                    Ok(())
                })
                .await?;
            }
            step(app, "close balances", |app| {
                app.close_balances();
                Ok(())
            })
            .await?;
            step(app, "open allowance dialog", App::set_allowance).await?;
            step(app, "edit allowances", |app| {
                app.set_all_amount("5")?;
                app.edit_allowance(1, "unlimited")
            })
            .await?;
            step(app, "submit allowances", App::submit_allowances).await?;
            let transfer = transfer_request(app.config(), "0.5", 1)?;
            step(app, "transfer", |app| app.transfer(transfer)).await?;
            step(app, "bridge", |app| {
                app.bridge(BridgeRequest {
                    token: "USDC".to_string(),
                    amount: usdc_units("1").unwrap_or_default(),
                    chain_id: 8453,
                })
            })
            .await?;
            step(app, "request", |app| {
                app.request(RpcRequest {
                    method: "eth_chainId".to_string(),
                    params: json!([]),
                })
            })
            .await?;
            if let Some((method, value)) = app.last_rpc() {
                println!("{} -> {}", method, value);
            }
            step(app, "disconnect", |app| {
                app.disconnect();
                Ok(())
            })
            .await?;
        }
        Command::Balances => {
            step(app, "show balances", App::show_balances).await?;
        }
        Command::Allowance { amount, unlimited } => {
            step(app, "open allowance dialog", App::set_allowance).await?;
            step(app, "edit allowances", |app| match amount.as_deref() {
                Some(amount) if !unlimited => app.set_all_amount(amount),
                _ => {
                    app.set_all_unlimited();
                    Ok(())
                }
            })
            .await?;
            step(app, "submit allowances", App::submit_allowances).await?;
        }
        Command::Transfer { amount, chain } => {
            let transfer = transfer_request(app.config(), &amount, chain)?;
            step(app, "transfer", |app| app.transfer(transfer)).await?;
        }
    }
    Ok(())
}

/// Runs one user action, waits for its effects and prints the view.
///
/// Fails when the action was rejected or left an error behind.
async fn step<F>(app: &mut App, title: &str, action: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut App) -> Result<(), AppError>,
{
    println!("== {} ==", title);
    let outcome = action(app);
    app.run_until_idle().await;
    for line in app.view().render() {
        println!("{}", line);
    }
    println!();

    outcome?;
    match app.last_error() {
        Some(err) => Err(anyhow!("{} failed: {}", title, err)),
        None => Ok(()),
    }
}

fn transfer_request(config: &Config, amount: &str, chain_id: u64) -> anyhow::Result<TransferRequest> {
    let token_address = config
        .chain(chain_id)
        .and_then(|chain| chain.usdc)
        .ok_or(AppError::UnknownChain { chain_id })?;
    let amount = usdc_units(amount)
        .filter(|amount| !amount.is_zero())
        .ok_or_else(|| anyhow!("Invalid transfer amount '{}'", amount))?;
    Ok(TransferRequest {
        token_address,
        to: DEMO_RECIPIENT,
        amount,
        chain_id,
    })
}

/// Whole or fractional USDC to base units.
fn usdc_units(amount: &str) -> Option<U256> {
    if amount.contains('.') {
        parse_amount(amount, USDC_DECIMALS)
    } else {
        parse_amount(&format!("{}.0", amount.trim()), USDC_DECIMALS)
    }
}

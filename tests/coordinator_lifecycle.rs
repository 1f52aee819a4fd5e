mod common;

use ca_sample::config::Config;
use ca_sample::session::SessionState;
use ca_sample::sim::{SimulatedSdk, SimulatedWallet};
use ca_sample::ui::connection::ConnectionState;
use ca_sample::ui::{App, MainView};
use ca_sample::wallet::WalletAdapter;
use ca_sample::AppError;
use common::{app_with, ready_app, wallet, GatedSdk, ACCOUNT};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test]
async fn connect_runs_wallet_then_session_init() {
    let (app, sdk) = ready_app().await;

    assert_eq!(app.account().map(|a| a.to_string()).as_deref(), Some(ACCOUNT));
    let options = sdk.init_options().unwrap();
    assert_eq!(options.chain_ids, Config::default().chain_ids());
    assert_eq!(options.network, "coral");
    assert!(sdk.provider_bound_before_init());
    assert_eq!(app.hook_registrations(), 1);
}

#[tokio::test]
async fn connect_while_ready_does_not_reinitialize() {
    let (mut app, sdk) = ready_app().await;

    app.connect().unwrap();
    app.run_until_idle().await;
    app.connect().unwrap();
    app.run_until_idle().await;

    assert!(app.session_state().is_ready());
    assert_eq!(sdk.init_calls(), 1);
    assert_eq!(sdk.hook_registrations(), 1);
    assert_eq!(app.hook_registrations(), 1);
}

#[tokio::test]
async fn connect_while_connecting_is_ignored() {
    let sdk = Arc::new(SimulatedSdk::new());
    let mut app = app_with(sdk.clone());

    app.connect().unwrap();
    app.connect().unwrap();
    assert_eq!(app.pending(), 1);
    app.run_until_idle().await;

    assert_eq!(sdk.init_calls(), 1);
}

#[tokio::test]
async fn disconnect_twice_matches_single_disconnect() {
    let (mut app, _) = ready_app().await;
    app.show_balances().unwrap();
    app.set_allowance().unwrap();
    app.edit_allowance(10, "99").unwrap();
    app.run_until_idle().await;

    app.disconnect();
    let once = app.view();
    let table_once = app.allowances().clone();

    app.disconnect();
    assert_eq!(app.view(), once);
    assert_eq!(app.allowances(), &table_once);
    assert_eq!(app.connection(), &ConnectionState::Disconnected);
    assert_eq!(app.session_state(), &SessionState::Uninitialized);
    assert!(app.snapshot().is_none());
    assert!(app.status().allowance().is_none());
    assert!(app.status().intent().is_none());
    assert!(!app.popups().balances_open());
    assert!(!app.popups().allowance_open);
    assert!(app.last_error().is_none());
    assert_eq!(once.main, MainView::Disconnected);
}

#[tokio::test]
async fn disconnect_from_fresh_app_is_harmless() {
    let mut app = app_with(Arc::new(SimulatedSdk::new()));
    app.disconnect();
    app.disconnect();
    assert_eq!(app.connection(), &ConnectionState::Disconnected);
    assert!(app.last_error().is_none());
}

#[tokio::test]
async fn reconnect_after_disconnect_registers_hooks_again() {
    let (mut app, sdk) = ready_app().await;
    app.disconnect();
    app.connect().unwrap();
    app.run_until_idle().await;

    assert!(app.session_state().is_ready());
    assert_eq!(sdk.init_calls(), 2);
    assert_eq!(sdk.hook_registrations(), 2);
}

#[tokio::test]
async fn invalid_address_is_never_connected() {
    for bad in [
        "0x1234",
        "52908400098527886E0F7030069857D2E4169EE7",
        "0xZZ908400098527886E0F7030069857D2E4169EE7",
        "0x52908400098527886E0F7030069857D2E4169EE7aa",
        "",
    ] {
        let sdk = Arc::new(SimulatedSdk::new());
        let mut app = App::new(Config::default(), wallet(&[bad]), sdk.clone());
        app.connect().unwrap();
        app.run_until_idle().await;

        assert_eq!(app.connection(), &ConnectionState::Disconnected, "{bad:?}");
        assert!(
            matches!(app.last_error(), Some(AppError::InvalidAddress { .. })),
            "{bad:?}"
        );
        assert_eq!(sdk.init_calls(), 0);
    }
}

#[tokio::test]
async fn lowercase_address_is_accepted() {
    let lower = ACCOUNT.to_lowercase();
    let mut app = App::new(
        Config::default(),
        wallet(&[lower.as_str()]),
        Arc::new(SimulatedSdk::new()),
    );
    app.connect().unwrap();
    app.run_until_idle().await;
    assert!(app.connection().is_connected());
}

#[tokio::test]
async fn missing_provider_fails_fast() {
    let sdk = Arc::new(SimulatedSdk::new());
    let mut app = App::new(Config::default(), WalletAdapter::default(), sdk.clone());

    assert!(matches!(app.connect(), Err(AppError::NoProvider)));
    assert_eq!(app.pending(), 0);
    assert_eq!(app.view().main, MainView::NoProvider);
}

#[tokio::test]
async fn user_rejection_is_surfaced_and_recoverable() {
    let sdk = Arc::new(SimulatedSdk::new());
    let rejecting = WalletAdapter::with_provider(Arc::new(
        SimulatedWallet::new(vec![ACCOUNT.to_string()]).rejecting(),
    ));
    let mut app = App::new(Config::default(), rejecting, sdk.clone());

    app.connect().unwrap();
    app.run_until_idle().await;

    assert_eq!(app.connection(), &ConnectionState::Disconnected);
    assert!(matches!(app.last_error(), Some(AppError::UserRejected)));
    assert_eq!(sdk.init_calls(), 0);

    // The app stays interactive after a failure.
    assert!(matches!(app.show_balances(), Err(AppError::NotConnected)));
}

#[tokio::test]
async fn empty_account_list_is_an_error_for_interactive_connect() {
    let mut app = App::new(Config::default(), wallet(&[]), Arc::new(SimulatedSdk::new()));
    app.connect().unwrap();
    app.run_until_idle().await;

    assert!(matches!(app.last_error(), Some(AppError::NoAccounts)));
    assert_eq!(app.connection(), &ConnectionState::Disconnected);
}

#[tokio::test]
async fn first_account_is_used() {
    let other = "0x8ba1f109551bD432803012645Ac136ddd64DBA72";
    let mut app = App::new(
        Config::default(),
        wallet(&[other, ACCOUNT]),
        Arc::new(SimulatedSdk::new()),
    );
    app.connect().unwrap();
    app.run_until_idle().await;
    assert_eq!(app.account().map(|a| a.to_string()).as_deref(), Some(other));
}

#[tokio::test]
async fn shutdown_detaches_hooks() {
    let (app, sdk) = ready_app().await;
    app.shutdown();
    // Installing no-op hooks counts as a replacement, not a stack.
    assert_eq!(sdk.hook_registrations(), 2);
}

#[tokio::test]
async fn panicking_sdk_call_becomes_current_error() {
    let sdk = Arc::new(GatedSdk::new());
    sdk.panic_on_balances();
    let mut app = app_with(sdk);
    app.connect().unwrap();

    timeout(Duration::from_secs(5), app.run_until_idle())
        .await
        .expect("coordinator goes idle after a task panics");

    assert_eq!(app.pending(), 0);
    assert!(app.session_state().is_ready());
    assert!(app.snapshot().is_none());
    assert!(matches!(
        app.last_error(),
        Some(AppError::TaskFailed {
            task: "balance fetch",
            ..
        })
    ));
}

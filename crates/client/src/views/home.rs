use dioxus::prelude::*;
use govern_shared::{ConnectionStatus, ConnectorEvent};

use crate::components::WalletBadge;
use crate::wallet::{use_connector, use_wallet, ConnectorContext, WalletContext};

#[component]
pub fn Home() -> Element {
    let wallet_ctx = use_context::<WalletContext>();
    let wallet = use_wallet();

    // ProviderState compares by identity, so this only changes on a switch.
    let provider = use_memo(move || wallet_ctx.provider());
    let block_number = use_resource(move || async move {
        let provider = provider.cloned();
        provider.rpc().get_block_number().await
    });

    let refresh_balance = move |_| {
        spawn(async move {
            let mut wallet_ctx = wallet_ctx;
            let Some(signer) = wallet_ctx.state().signer().cloned() else {
                return;
            };
            match signer.provider().get_balance(signer.address()).await {
                Ok(wei) => wallet_ctx.dispatch(ConnectorEvent::BalanceChanged(Some(wei.to_string()))),
                Err(err) => crate::log_warn!("balance lookup failed: {}", err),
            }
        });
    };

    let block_label = match &*block_number.read() {
        Some(Ok(number)) => format!("#{number}"),
        Some(Err(err)) => format!("unavailable ({err})"),
        None => "loading…".to_string(),
    };
    let provider_error = wallet_ctx.provider_error.read().as_ref().map(|e| e.to_string());

    rsx! {
        div { class: "min-h-screen bg-[#313338] text-white p-8 space-y-6",
            header { class: "flex items-center justify-between",
                h1 { class: "text-2xl font-bold", "Govern Console" }
                WalletBadge {}
            }

            section { class: "space-y-2 text-sm text-gray-300",
                if let Some(address) = wallet_ctx.address() {
                    p { "Signing as {address}" }
                }
                p { "Latest block: {block_label}" }
                if let Some(balance) = &wallet.balance {
                    p { "Balance: {balance} wei" }
                }
                if let Some(error) = &wallet.error {
                    p { class: "text-red-400", "{error}" }
                }
                if let Some(error) = provider_error {
                    p { class: "text-red-400", "Wallet provider error: {error}" }
                }
            }

            div { class: "flex gap-3",
                ConnectButton {}
                if wallet.account.is_some() {
                    button {
                        class: "px-4 py-2 rounded-md bg-[#4e5058] hover:bg-[#6d6f78]",
                        onclick: refresh_balance,
                        "Refresh balance"
                    }
                }
            }
        }
    }
}

#[component]
fn ConnectButton() -> Element {
    let wallet_ctx = use_context::<WalletContext>();
    let connector = use_connector();

    if wallet_ctx.is_connected() {
        return rsx! {
            button {
                class: "px-4 py-2 rounded-md bg-[#da373c] hover:bg-[#a12828]",
                onclick: move |_| disconnect(connector),
                "Disconnect"
            }
        };
    }

    let connecting = connector.status() == ConnectionStatus::Connecting;

    rsx! {
        button {
            class: "px-4 py-2 rounded-md bg-[#5865F2] hover:bg-[#4752C4] disabled:opacity-50",
            disabled: connecting,
            onclick: move |_| connect(connector),
            if connecting { "Connecting…" } else { "Connect wallet" }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn connect(connector: ConnectorContext) {
    spawn(async move {
        let _ = crate::eip1193::connect_injected(connector).await;
    });
}

#[cfg(target_arch = "wasm32")]
fn disconnect(connector: ConnectorContext) {
    crate::eip1193::disconnect_injected(connector);
}

#[cfg(not(target_arch = "wasm32"))]
fn connect(mut connector: ConnectorContext) {
    connector.dispatch(ConnectorEvent::Failed(
        "browser wallets are only available in the web build".to_string(),
    ));
}

#[cfg(not(target_arch = "wasm32"))]
fn disconnect(mut connector: ConnectorContext) {
    connector.disconnect();
}

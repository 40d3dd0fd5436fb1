//! Connection status dot and the account badge shown in headers.

use dioxus::prelude::*;
use govern_shared::ConnectionStatus;

use crate::wallet::use_wallet;

#[derive(Props, Clone, PartialEq)]
pub struct StatusDotProps {
    pub status: ConnectionStatus,
    #[props(optional)]
    pub size: Option<&'static str>,
}

#[component]
pub fn StatusDot(props: StatusDotProps) -> Element {
    let size = props.size.unwrap_or("w-2 h-2");

    let color_class = match props.status {
        ConnectionStatus::Connected => "bg-green-500",
        ConnectionStatus::Connecting => "bg-yellow-500",
        ConnectionStatus::Error => "bg-red-500",
        ConnectionStatus::Disconnected => "bg-gray-500",
    };
    let title = props.status.as_str();

    rsx! {
        span {
            class: "{size} {color_class} rounded-full inline-block",
            title: "{title}",
        }
    }
}

/// Shorten `0x1234567890abcdef...` to `0x1234…cdef`.
pub fn short_address(address: &str) -> String {
    if address.len() > 10 && address.is_char_boundary(6) && address.is_char_boundary(address.len() - 4) {
        format!("{}…{}", &address[..6], &address[address.len() - 4..])
    } else {
        address.to_string()
    }
}

/// Account (or status) and network of the current wallet.
#[component]
pub fn WalletBadge() -> Element {
    let wallet = use_wallet();

    let label = match wallet.address() {
        Some(address) => short_address(address),
        None if wallet.is_connected => "read-only".to_string(),
        None => wallet.status.to_string(),
    };
    let network = wallet.network_name.clone().unwrap_or_else(|| "no network".to_string());
    let source = if wallet.provider.is_injected() { "wallet" } else { "public rpc" };

    rsx! {
        div { class: "inline-flex items-center gap-2 rounded-lg bg-[#2b2d31] px-3 py-1 text-sm text-gray-200",
            StatusDot { status: wallet.status }
            span { class: "font-mono", "{label}" }
            span { class: "text-gray-400", "{network} · {source}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortens_long_addresses() {
        assert_eq!(
            short_address("0x52908400098527886E0F7030069857D2E4169EE7"),
            "0x5290…9EE7"
        );
        assert_eq!(short_address("0xABC"), "0xABC");
    }
}

//! Components that render the wallet connection view.

pub mod wallet_badge;

pub use wallet_badge::{StatusDot, WalletBadge};

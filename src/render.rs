use alloy_primitives::Address;

use crate::creator::{SubmitState, SECS_PER_DAY};
use crate::market::{MarketRecord, Outcome};
use crate::wallet::ConnectionState;

/// Shown instead of any wallet action when no signing key is configured.
pub const NO_WALLET_MSG: &str =
    "No signing key configured. Set PRIVATE_KEY or [wallet] private_key in config.toml to use this app.";

pub const HELP: &str = "\
Commands:
  connect                   connect the configured wallet key
  disconnect                disconnect the wallet
  refresh                   re-read the market list from the contract
  create <days> <question>  create a market, e.g. `create 7 Will it rain?`
  help                      show this help
  quit                      exit";

pub fn connection_banner(conn: &ConnectionState) -> String {
    if !conn.key_present() {
        return NO_WALLET_MSG.to_string();
    }
    match conn.address() {
        Some(address) => {
            format!("Connected to {address}\nType `disconnect` to disconnect.")
        }
        None => {
            let mut banner =
                "Not connected. Type `connect` to connect your wallet.".to_string();
            if let Some(err) = conn.last_error() {
                banner.push_str(&format!("\nError: {err}"));
            }
            banner
        }
    }
}

/// Short form for status lines and logs; the "Connected to" banner keeps
/// the full address.
pub fn short_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}…{}", &full[..8], &full[full.len() - 4..])
}

pub fn market_card(market: &MarketRecord, now_secs: u64) -> String {
    let mut out = format!("#{} {}\n", market.id, market.question);
    out.push_str(&format!("  Ends: {}\n", format_end_time(market.end_time)));
    if !market.resolved {
        let remaining = market.time_remaining_secs(now_secs);
        if remaining > 0 {
            out.push_str(&format!("  Closes in: {}\n", format_remaining(remaining)));
        } else {
            out.push_str("  Betting closed\n");
        }
    }
    for outcome in [Outcome::Yes, Outcome::No] {
        out.push_str(&format!(
            "  {} Shares: {}\n",
            outcome.label(),
            market.shares(outcome)
        ));
    }
    out.push_str(&format!(
        "  Status: {}",
        if market.resolved { "Resolved" } else { "Open" }
    ));
    out
}

pub fn market_list(markets: &[MarketRecord], now_secs: u64) -> String {
    if markets.is_empty() {
        return "No markets yet.".to_string();
    }
    markets
        .iter()
        .map(|m| market_card(m, now_secs))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn submit_banner(state: &SubmitState) -> Option<String> {
    match state {
        SubmitState::Idle => None,
        SubmitState::Pending => Some("Creating...".to_string()),
        SubmitState::Succeeded { tx_hash } => {
            Some(format!("Market created successfully! (tx {tx_hash})"))
        }
        SubmitState::Failed { message } => {
            Some(format!("Market creation failed: {message}"))
        }
    }
}

fn format_remaining(secs: u64) -> String {
    let days = secs / SECS_PER_DAY;
    let hours = (secs % SECS_PER_DAY) / 3_600;
    let minutes = (secs % 3_600) / 60;
    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

fn format_end_time(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|s| chrono::DateTime::from_timestamp(s, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| format!("{secs}"))
}

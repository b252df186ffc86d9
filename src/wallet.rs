use alloy::network::EthereumWallet;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use alloy_primitives::Address;

use crate::chain::ChainError;
use crate::config::Config;

/// Local analogue of a browser wallet: a signing key that may or may not
/// be configured. Detection happens once at startup; connect and
/// disconnect are explicit user actions.
pub struct Wallet {
    rpc_url: String,
    chain_id: u64,
    private_key: Option<String>,
}

impl Wallet {
    /// Pick up the key from PRIVATE_KEY or the config file, in that order.
    pub fn detect(cfg: &Config) -> Self {
        let private_key = std::env::var("PRIVATE_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| cfg.wallet.private_key.clone().filter(|k| !k.is_empty()));

        Self {
            rpc_url: cfg.rpc.url.clone(),
            chain_id: cfg.rpc.chain_id,
            private_key,
        }
    }

    pub fn has_key(&self) -> bool {
        self.private_key.is_some()
    }

    /// Provider for contract reads. Works without a key.
    pub fn read_only_provider(&self) -> Result<DynProvider, ChainError> {
        let url = self
            .rpc_url
            .parse()
            .map_err(|_| ChainError::BadRpcUrl(self.rpc_url.clone()))?;
        Ok(ProviderBuilder::new().connect_http(url).erased())
    }

    /// Parse the key and build a signer-backed provider. The derived
    /// address is what the contract sees as msg.sender.
    pub fn connect(&self) -> Result<(Address, DynProvider), ChainError> {
        let key = self.private_key.as_deref().ok_or(ChainError::NoKey)?;
        let signer: PrivateKeySigner = key
            .parse()
            .map_err(|e: alloy::signers::local::LocalSignerError| {
                ChainError::BadKey(e.to_string())
            })?;
        let signer = signer.with_chain_id(Some(self.chain_id));
        let address = signer.address();

        let url = self
            .rpc_url
            .parse()
            .map_err(|_| ChainError::BadRpcUrl(self.rpc_url.clone()))?;
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();

        Ok((address, provider))
    }
}

/// Connection state shown to the user. Only one of connect/disconnect is
/// ever offered, and neither when no key is present.
#[derive(Debug, Default)]
pub struct ConnectionState {
    key_present: bool,
    address: Option<Address>,
    last_error: Option<String>,
}

impl ConnectionState {
    pub fn new(key_present: bool) -> Self {
        Self {
            key_present,
            address: None,
            last_error: None,
        }
    }

    pub fn key_present(&self) -> bool {
        self.key_present
    }

    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    pub fn address(&self) -> Option<Address> {
        self.address
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn connected(&mut self, address: Address) {
        self.address = Some(address);
        self.last_error = None;
    }

    pub fn disconnected(&mut self) {
        self.address = None;
    }

    /// Connect failed; stay disconnected and keep the message for display.
    pub fn failed(&mut self, message: String) {
        self.address = None;
        self.last_error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disconnected() {
        let conn = ConnectionState::new(true);
        assert!(conn.key_present());
        assert!(!conn.is_connected());
        assert!(conn.last_error().is_none());
    }

    #[test]
    fn connect_stores_address_and_clears_error() {
        let mut conn = ConnectionState::new(true);
        conn.failed("user rejected".to_string());
        assert_eq!(conn.last_error(), Some("user rejected"));

        let addr = Address::repeat_byte(0x11);
        conn.connected(addr);
        assert!(conn.is_connected());
        assert_eq!(conn.address(), Some(addr));
        assert!(conn.last_error().is_none());
    }

    #[test]
    fn disconnect_clears_address() {
        let mut conn = ConnectionState::new(true);
        conn.connected(Address::repeat_byte(0x22));
        conn.disconnected();
        assert!(!conn.is_connected());
        assert_eq!(conn.address(), None);
    }

    #[test]
    fn failed_connect_stays_disconnected() {
        let mut conn = ConnectionState::new(true);
        conn.failed("rpc unreachable".to_string());
        assert!(!conn.is_connected());
        assert_eq!(conn.last_error(), Some("rpc unreachable"));
    }
}

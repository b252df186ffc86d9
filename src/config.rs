use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub rpc: Rpc,
    pub contract: Contract,
    #[serde(default)]
    pub wallet: WalletConfig,
    pub general: General,
}

#[derive(Debug, Deserialize)]
pub struct Rpc {
    pub url: String,
    pub chain_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct Contract {
    /// Deployed prediction-market contract address (hex, 0x-prefixed).
    pub address: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct WalletConfig {
    /// Hex private key. Leave unset to run read-only; the PRIVATE_KEY
    /// environment variable takes precedence when set.
    pub private_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct General {
    pub log_level: String,
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }
}

//! Configuration for the ledger service

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use wallet_core::{AmountLimits, WithdrawalPolicy};

/// Ledger service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory for RocksDB
    pub data_dir: PathBuf,

    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Metrics listen address
    pub metrics_listen_addr: String,

    /// RocksDB configuration
    pub rocksdb: RocksDbConfig,

    /// Wallet policy configuration
    pub wallet: WalletPolicyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/wallet"),
            service_name: "wallet-ledger".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            metrics_listen_addr: "0.0.0.0:9090".to_string(),
            rocksdb: RocksDbConfig::default(),
            wallet: WalletPolicyConfig::default(),
        }
    }
}

/// RocksDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RocksDbConfig {
    /// Write buffer size (MB)
    pub write_buffer_size_mb: usize,

    /// Max write buffers
    pub max_write_buffer_number: i32,

    /// Target file size (MB)
    pub target_file_size_mb: u64,

    /// Max background jobs (compaction + flush)
    pub max_background_jobs: i32,

    /// Level 0 file num compaction trigger
    pub level0_file_num_compaction_trigger: i32,

    /// Enable statistics
    pub enable_statistics: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            write_buffer_size_mb: 64,
            max_write_buffer_number: 4,
            target_file_size_mb: 64,
            max_background_jobs: 4,
            level0_file_num_compaction_trigger: 4,
            enable_statistics: false,
        }
    }
}

/// Wallet policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletPolicyConfig {
    /// Smallest withdrawable amount
    pub minimum_withdrawal: Decimal,

    /// Single-entry amount ceiling
    pub max_transaction_amount: Decimal,

    /// Maximum decimal places accepted on input
    pub amount_scale: u32,
}

impl Default for WalletPolicyConfig {
    fn default() -> Self {
        Self {
            minimum_withdrawal: Decimal::from(20),       // $20 payout floor
            max_transaction_amount: Decimal::from(10_000), // $10k per entry
            amount_scale: 2,
        }
    }
}

impl WalletPolicyConfig {
    /// Withdrawal policy derived from this config
    pub fn policy(&self) -> WithdrawalPolicy {
        WithdrawalPolicy::new(self.minimum_withdrawal)
    }

    /// Amount limits derived from this config
    pub fn limits(&self) -> AmountLimits {
        AmountLimits {
            max_amount: self.max_transaction_amount,
            max_scale: self.amount_scale,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(data_dir) = std::env::var("WALLET_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(addr) = std::env::var("WALLET_METRICS_ADDR") {
            config.metrics_listen_addr = addr;
        }

        if let Ok(min) = std::env::var("WALLET_MIN_WITHDRAWAL") {
            config.wallet.minimum_withdrawal = Decimal::from_str(&min).map_err(|e| {
                crate::Error::Config(format!("Invalid WALLET_MIN_WITHDRAWAL: {}", e))
            })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_name, "wallet-ledger");
        assert_eq!(config.wallet.minimum_withdrawal, Decimal::from(20));
        assert_eq!(config.wallet.max_transaction_amount, Decimal::from(10_000));
    }

    #[test]
    fn test_policy_and_limits_from_config() {
        let wallet = WalletPolicyConfig::default();
        assert_eq!(wallet.policy().minimum_withdrawal, Decimal::from(20));
        assert_eq!(wallet.limits().max_amount, Decimal::from(10_000));
        assert_eq!(wallet.limits().max_scale, 2);
    }
}

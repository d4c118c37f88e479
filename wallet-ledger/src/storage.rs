//! Storage layer using RocksDB
//!
//! # Column Families
//!
//! - `transactions` - Append-only transaction log (key: transaction_id)
//! - `wallets` - Wallet snapshots (key: rider_id)
//! - `indices` - Secondary index `rider_id | transaction_id` for history scans

use crate::{
    error::{Error, Result},
    Config,
};
use rocksdb::{
    ColumnFamily, ColumnFamilyDescriptor, DBCompactionStyle, IteratorMode, Options, WriteBatch, DB,
};
use std::sync::Arc;
use uuid::Uuid;
use wallet_core::{RiderId, Transaction, WalletSnapshot};

/// Column family names
const CF_TRANSACTIONS: &str = "transactions";
const CF_WALLETS: &str = "wallets";
const CF_INDICES: &str = "indices";

/// Separator between rider id and transaction id in index keys
const INDEX_SEPARATOR: u8 = b'|';

/// Storage wrapper for RocksDB
pub struct Storage {
    db: Arc<DB>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

impl Storage {
    /// Open or create database
    pub fn open(config: &Config) -> Result<Self> {
        let path = &config.data_dir;

        std::fs::create_dir_all(path)?;

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        // Tuning from config
        db_opts.set_write_buffer_size(config.rocksdb.write_buffer_size_mb * 1024 * 1024);
        db_opts.set_max_write_buffer_number(config.rocksdb.max_write_buffer_number);
        db_opts.set_target_file_size_base(config.rocksdb.target_file_size_mb * 1024 * 1024);
        db_opts.set_max_background_jobs(config.rocksdb.max_background_jobs);
        db_opts.set_level_zero_file_num_compaction_trigger(
            config.rocksdb.level0_file_num_compaction_trigger,
        );

        // Universal compaction for write-heavy workload
        db_opts.set_compaction_style(DBCompactionStyle::Universal);

        if config.rocksdb.enable_statistics {
            db_opts.enable_statistics();
        }

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new(CF_TRANSACTIONS, Self::cf_options_transactions()),
            ColumnFamilyDescriptor::new(CF_WALLETS, Self::cf_options_wallets()),
            ColumnFamilyDescriptor::new(CF_INDICES, Self::cf_options_indices()),
        ];

        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;

        tracing::info!(path = %path.display(), "Opened wallet RocksDB");

        Ok(Self { db: Arc::new(db) })
    }

    // Column family options

    fn cf_options_transactions() -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(rocksdb::DBCompressionType::Zstd);
        opts.set_bottommost_compression_type(rocksdb::DBCompressionType::Zstd);
        opts
    }

    fn cf_options_wallets() -> Options {
        let mut opts = Options::default();
        // Snapshots are read on every decision, use LZ4 for speed
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts
    }

    fn cf_options_indices() -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false); // 10 bits per key
        opts.set_block_based_table_factory(&block_opts);
        opts
    }

    fn cf_handle(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| Error::Storage(format!("Column family {} not found", name)))
    }

    // Transaction operations

    /// Get transaction by ID
    pub fn get_transaction(&self, transaction_id: Uuid) -> Result<Transaction> {
        let cf = self.cf_handle(CF_TRANSACTIONS)?;

        let value = self
            .db
            .get_cf(cf, transaction_id.as_bytes())?
            .ok_or_else(|| Error::TransactionNotFound(transaction_id.to_string()))?;

        let transaction: Transaction = bincode::deserialize(&value)?;
        Ok(transaction)
    }

    /// Get all transactions for a rider (via index)
    pub fn get_rider_transactions(&self, rider_id: &RiderId) -> Result<Vec<Transaction>> {
        let cf_indices = self.cf_handle(CF_INDICES)?;

        let mut prefix = rider_id.as_str().as_bytes().to_vec();
        prefix.push(INDEX_SEPARATOR);

        let iter = self.db.prefix_iterator_cf(cf_indices, &prefix);

        let mut transactions = Vec::new();
        for item in iter {
            let (key, _) = item?;

            if !key.starts_with(&prefix) {
                break;
            }

            // Transaction id occupies the last 16 bytes of the key
            if key.len() >= prefix.len() + 16 {
                let id_bytes: [u8; 16] = key[key.len() - 16..].try_into().unwrap();
                let transaction_id = Uuid::from_bytes(id_bytes);

                transactions.push(self.get_transaction(transaction_id)?);
            }
        }

        Ok(transactions)
    }

    // Wallet snapshot operations

    /// Put wallet snapshot
    pub fn put_wallet(&self, wallet: &WalletSnapshot) -> Result<()> {
        let cf = self.cf_handle(CF_WALLETS)?;
        let value = bincode::serialize(wallet)?;

        self.db
            .put_cf(cf, wallet.rider_id.as_str().as_bytes(), &value)?;

        Ok(())
    }

    /// Get wallet snapshot, if one exists
    pub fn get_wallet(&self, rider_id: &RiderId) -> Result<Option<WalletSnapshot>> {
        let cf = self.cf_handle(CF_WALLETS)?;

        let value = self.db.get_cf(cf, rider_id.as_str().as_bytes())?;

        match value {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Commit a transaction with its updated snapshot and index (atomic)
    pub fn commit_transaction(
        &self,
        transaction: &Transaction,
        wallet: &WalletSnapshot,
    ) -> Result<()> {
        let mut batch = WriteBatch::default();

        // 1. Transaction
        let cf_transactions = self.cf_handle(CF_TRANSACTIONS)?;
        let tx_value = bincode::serialize(transaction)?;
        batch.put_cf(cf_transactions, transaction.transaction_id.as_bytes(), &tx_value);

        // 2. Wallet snapshot
        let cf_wallets = self.cf_handle(CF_WALLETS)?;
        let wallet_value = bincode::serialize(wallet)?;
        batch.put_cf(cf_wallets, wallet.rider_id.as_str().as_bytes(), &wallet_value);

        // 3. Index: rider_id | transaction_id -> empty
        let cf_indices = self.cf_handle(CF_INDICES)?;
        let index_key =
            Self::index_key_rider_transaction(&transaction.rider_id, transaction.transaction_id);
        batch.put_cf(cf_indices, &index_key, b"");

        // Atomic commit
        self.db.write(batch)?;

        tracing::debug!(
            transaction_id = %transaction.transaction_id,
            rider_id = %transaction.rider_id,
            amount = %transaction.amount,
            kind = %transaction.kind,
            "Transaction committed"
        );

        Ok(())
    }

    fn index_key_rider_transaction(rider_id: &RiderId, transaction_id: Uuid) -> Vec<u8> {
        let mut key = rider_id.as_str().as_bytes().to_vec();
        key.push(INDEX_SEPARATOR);
        key.extend_from_slice(transaction_id.as_bytes());
        key
    }

    // Statistics

    /// Get storage statistics
    pub fn get_stats(&self) -> Result<StorageStats> {
        let cf_transactions = self.cf_handle(CF_TRANSACTIONS)?;
        let cf_wallets = self.cf_handle(CF_WALLETS)?;

        let transaction_count = self.approximate_count(cf_transactions)?;

        // Wallet CF is small, count exactly
        let mut wallet_count = 0u64;
        let iter = self.db.iterator_cf(cf_wallets, IteratorMode::Start);
        for item in iter {
            item?;
            wallet_count += 1;
        }

        Ok(StorageStats {
            total_transactions: transaction_count,
            total_wallets: wallet_count,
        })
    }

    fn approximate_count(&self, cf: &ColumnFamily) -> Result<u64> {
        let prop = self
            .db
            .property_int_value_cf(cf, "rocksdb.estimate-num-keys")?
            .unwrap_or(0);

        Ok(prop)
    }

    /// Close database (graceful shutdown)
    pub fn close(self) -> Result<()> {
        drop(self.db);
        tracing::info!("Wallet RocksDB closed gracefully");
        Ok(())
    }
}

/// Storage statistics
#[derive(Debug, Clone)]
pub struct StorageStats {
    /// Approximate number of stored transactions
    pub total_transactions: u64,
    /// Number of tracked wallets
    pub total_wallets: u64,
}

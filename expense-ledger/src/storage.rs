//! Storage layer using RocksDB
//!
//! # Column Families
//!
//! - `couples` - Couple configuration (key: couple_id)
//! - `partners` - Partner display names (key: partner_id)
//! - `expenses` - Expense records (key: expense_id)
//! - `settlements` - Settlement records (key: settlement_id)
//! - `indices` - Secondary index for date-range scans
//!   (key: couple_id || days_from_ce || expense_id)

use crate::{
    config::Config,
    error::{Error, Result},
    store::{CoupleStore, ExpenseStore, PartnerDirectory},
    types::{Couple, CoupleId, Expense, ExpenseId, PartnerId, Settlement, SettlementId},
};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use parking_lot::Mutex;
use rocksdb::{
    ColumnFamily, ColumnFamilyDescriptor, Direction, IteratorMode, Options, WriteBatch, DB,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Column family names
const CF_COUPLES: &str = "couples";
const CF_PARTNERS: &str = "partners";
const CF_EXPENSES: &str = "expenses";
const CF_SETTLEMENTS: &str = "settlements";
const CF_INDICES: &str = "indices";

/// Index key layout: couple_id (16) || days_from_ce (4, BE) || expense_id (16)
const INDEX_KEY_LEN: usize = 36;

/// Storage wrapper for RocksDB implementing all three store traits
pub struct RocksStore {
    db: Arc<DB>,

    /// Serializes settlement commits. The claim check and the batch write
    /// must be one critical section, otherwise two commits over the same
    /// expenses could both pass the check before either batch lands.
    commit_lock: Mutex<()>,
}

impl RocksStore {
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
        db_opts.set_max_background_jobs(config.rocksdb.max_background_jobs);

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new(CF_COUPLES, Self::cf_options_records()),
            ColumnFamilyDescriptor::new(CF_PARTNERS, Self::cf_options_records()),
            ColumnFamilyDescriptor::new(CF_EXPENSES, Self::cf_options_records()),
            ColumnFamilyDescriptor::new(CF_SETTLEMENTS, Self::cf_options_records()),
            ColumnFamilyDescriptor::new(CF_INDICES, Self::cf_options_indices()),
        ];

        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;

        tracing::info!(path = ?path, "Opened expense ledger RocksDB");

        Ok(Self {
            db: Arc::new(db),
            commit_lock: Mutex::new(()),
        })
    }

    fn cf_options_records() -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(rocksdb::DBCompressionType::Zstd);
        opts
    }

    fn cf_options_indices() -> Options {
        let mut opts = Options::default();
        // Index is scanned, records are point reads; LZ4 keeps scans fast
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts
    }

    fn cf_handle(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| Error::Storage(format!("Column family {} not found", name)))
    }

    // Index key helpers

    fn date_bytes(date: NaiveDate) -> [u8; 4] {
        (date.num_days_from_ce() as u32).to_be_bytes()
    }

    fn index_key(couple_id: &CoupleId, date: NaiveDate, expense_id: &ExpenseId) -> Vec<u8> {
        let mut key = couple_id.0.as_bytes().to_vec();
        key.extend_from_slice(&Self::date_bytes(date));
        key.extend_from_slice(expense_id.0.as_bytes());
        key
    }

    fn get_expense_sync(&self, id: &ExpenseId) -> Result<Expense> {
        let cf = self.cf_handle(CF_EXPENSES)?;
        let value = self
            .db
            .get_cf(cf, id.0.as_bytes())?
            .ok_or_else(|| Error::ExpenseNotFound(id.to_string()))?;
        Ok(bincode::deserialize(&value)?)
    }
}

#[async_trait]
impl CoupleStore for RocksStore {
    async fn get_couple(&self, id: &CoupleId) -> Result<Couple> {
        let cf = self.cf_handle(CF_COUPLES)?;
        let value = self
            .db
            .get_cf(cf, id.0.as_bytes())?
            .ok_or_else(|| Error::CoupleNotFound(id.to_string()))?;
        Ok(bincode::deserialize(&value)?)
    }

    async fn put_couple(&self, couple: &Couple) -> Result<()> {
        couple.split.validate()?;
        let cf = self.cf_handle(CF_COUPLES)?;
        let value = bincode::serialize(couple)?;
        self.db.put_cf(cf, couple.id.0.as_bytes(), &value)?;
        Ok(())
    }
}

#[async_trait]
impl PartnerDirectory for RocksStore {
    async fn resolve(&self, ids: &[PartnerId]) -> Result<HashMap<PartnerId, String>> {
        let cf = self.cf_handle(CF_PARTNERS)?;
        let mut names = HashMap::new();
        for id in ids {
            if let Some(value) = self.db.get_cf(cf, id.as_str().as_bytes())? {
                let name: String = bincode::deserialize(&value)?;
                names.insert(id.clone(), name);
            }
        }
        Ok(names)
    }

    async fn put_partner(&self, id: &PartnerId, name: &str) -> Result<()> {
        let cf = self.cf_handle(CF_PARTNERS)?;
        let value = bincode::serialize(name)?;
        self.db.put_cf(cf, id.as_str().as_bytes(), &value)?;
        Ok(())
    }
}

#[async_trait]
impl ExpenseStore for RocksStore {
    async fn insert_expense(&self, expense: &Expense) -> Result<()> {
        expense.validate()?;
        let mut batch = WriteBatch::default();

        let cf_expenses = self.cf_handle(CF_EXPENSES)?;
        let value = bincode::serialize(expense)?;
        batch.put_cf(cf_expenses, expense.id.0.as_bytes(), &value);

        let cf_indices = self.cf_handle(CF_INDICES)?;
        let idx = Self::index_key(&expense.couple_id, expense.expense_date, &expense.id);
        batch.put_cf(cf_indices, &idx, &[]);

        self.db.write(batch)?;

        tracing::debug!(
            expense_id = %expense.id,
            couple_id = %expense.couple_id,
            amount = %expense.amount,
            "Expense recorded"
        );

        Ok(())
    }

    async fn get_expense(&self, id: &ExpenseId) -> Result<Expense> {
        self.get_expense_sync(id)
    }

    async fn unsettled_in_range(
        &self,
        couple_id: &CoupleId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Expense>> {
        let cf_indices = self.cf_handle(CF_INDICES)?;

        let couple_prefix = couple_id.0.as_bytes();
        let mut start_key = couple_prefix.to_vec();
        start_key.extend_from_slice(&Self::date_bytes(start));
        let end_date = Self::date_bytes(end);

        let iter = self.db.iterator_cf(
            cf_indices,
            IteratorMode::From(&start_key, Direction::Forward),
        );

        let mut expenses = Vec::new();
        for item in iter {
            let (key, _) = item?;
            if key.len() != INDEX_KEY_LEN || &key[..16] != couple_prefix {
                break;
            }
            // Inclusive upper bound on the date component
            if key[16..20] > end_date[..] {
                break;
            }

            let expense_id_bytes: [u8; 16] = key[20..36]
                .try_into()
                .map_err(|_| Error::Storage("Malformed index key".to_string()))?;
            let expense_id = ExpenseId(uuid::Uuid::from_bytes(expense_id_bytes));

            let expense = self.get_expense_sync(&expense_id)?;
            if expense.is_unsettled() {
                expenses.push(expense);
            }
        }

        Ok(expenses)
    }

    async fn commit_settlement(
        &self,
        settlement: &Settlement,
        expense_ids: &[ExpenseId],
    ) -> Result<()> {
        // Claim check and batch write are one critical section; no await
        // points while the guard is held
        let _guard = self.commit_lock.lock();

        let mut batch = WriteBatch::default();

        let cf_expenses = self.cf_handle(CF_EXPENSES)?;
        for id in expense_ids {
            let mut expense = self.get_expense_sync(id)?;
            if !expense.is_unsettled() {
                // Claim lost: abort before anything is written
                return Err(Error::AlreadySettled(id.to_string()));
            }
            expense.settlement_id = Some(settlement.id);
            let value = bincode::serialize(&expense)?;
            batch.put_cf(cf_expenses, expense.id.0.as_bytes(), &value);
        }

        let cf_settlements = self.cf_handle(CF_SETTLEMENTS)?;
        let value = bincode::serialize(settlement)?;
        batch.put_cf(cf_settlements, settlement.id.0.as_bytes(), &value);

        // Settlement row and every expense link land together or not at all
        self.db.write(batch)?;

        tracing::info!(
            settlement_id = %settlement.id,
            couple_id = %settlement.couple_id,
            amount = %settlement.amount_settled,
            expenses = expense_ids.len(),
            "Settlement committed"
        );

        Ok(())
    }

    async fn get_settlement(&self, id: &SettlementId) -> Result<Settlement> {
        let cf = self.cf_handle(CF_SETTLEMENTS)?;
        let value = self
            .db
            .get_cf(cf, id.0.as_bytes())?
            .ok_or_else(|| Error::SettlementNotFound(id.to_string()))?;
        Ok(bincode::deserialize(&value)?)
    }
}

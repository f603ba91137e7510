use chrono::{Datelike, NaiveDate};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::crypto::CryptoError;
use crate::finance::{NewTransaction, TransactionFilter, TransactionUpdate};
use crate::habits::NewHabit;
use crate::journal::{JournalFilter, JournalUpdate, NewJournalEntry};
use crate::logs::window_start;
use crate::models::*;
use crate::prediction;
use crate::stats;
use crate::storage::{Storage, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("tracker is locked")]
    Locked,
    #[error("tracker is not set up yet, run `bienestar init` first")]
    NotSetUp,
    #[error("tracker is already set up")]
    AlreadySetUp,
    #[error("passphrase must not be empty")]
    EmptyPassphrase,
    #[error("wrong passphrase")]
    WrongPassphrase,
    #[error("no active habit with id {0}")]
    HabitNotFound(Uuid),
    #[error("no transaction with id {0}")]
    TransactionNotFound(Uuid),
    #[error("no journal entry with id {0}")]
    JournalEntryNotFound(Uuid),
    #[error("invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One invocation's view of the tracker: the data file, the decrypted data
/// and passphrase while unlocked, and the calendar day treated as today.
pub struct Session {
    storage: Storage,
    window_days: u32,
    today: NaiveDate,
    passphrase: Option<Zeroizing<String>>,
    data: Option<AppData>,
}

impl Session {
    pub fn new(storage: Storage, window_days: u32, today: NaiveDate) -> Self {
        Self {
            storage,
            window_days,
            today,
            passphrase: None,
            data: None,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn is_setup(&self) -> bool {
        self.storage.exists()
    }

    pub fn setup(&mut self, passphrase: String) -> Result<(), CommandError> {
        if self.is_setup() {
            return Err(CommandError::AlreadySetUp);
        }
        if passphrase.is_empty() {
            return Err(CommandError::EmptyPassphrase);
        }
        let passphrase = Zeroizing::new(passphrase);
        let data = AppData::default();
        self.storage.save(&passphrase, &data)?;
        tracing::info!(path = %self.storage.path().display(), "created data file");

        self.passphrase = Some(passphrase);
        self.data = Some(data);
        Ok(())
    }

    pub fn unlock(&mut self, passphrase: String) -> Result<(), CommandError> {
        if !self.is_setup() {
            return Err(CommandError::NotSetUp);
        }
        let passphrase = Zeroizing::new(passphrase);
        match self.storage.load(&passphrase) {
            Ok(data) => {
                self.passphrase = Some(passphrase);
                self.data = Some(data);
                Ok(())
            }
            Err(StorageError::Crypto(CryptoError::Decryption)) => {
                tracing::warn!("unlock failed");
                Err(CommandError::WrongPassphrase)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Drop the passphrase and data from memory.
    pub fn lock(&mut self) {
        self.passphrase = None;
        self.data = None;
    }

    fn data(&self) -> Result<&AppData, CommandError> {
        self.data.as_ref().ok_or(CommandError::Locked)
    }

    /// Apply `change` to the unlocked data and persist the result.
    fn mutate<T>(&mut self, change: impl FnOnce(&mut AppData) -> T) -> Result<T, CommandError> {
        let data = self.data.as_mut().ok_or(CommandError::Locked)?;
        let out = change(data);
        let pass = self.passphrase.as_ref().ok_or(CommandError::Locked)?;
        self.storage.save(pass, data)?;
        Ok(out)
    }

    fn window(&self) -> Result<Vec<CycleLog>, CommandError> {
        Ok(self.data()?.fetch_logs(self.window_days, self.today))
    }

    pub fn log_day(&mut self, log: CycleLog) -> Result<CycleLog, CommandError> {
        let date = log.date;
        let saved = self.mutate(|data| data.upsert_log(log))?;
        tracing::info!(%date, flow = ?saved.flow_intensity, "saved day log");
        Ok(saved)
    }

    pub fn delete_log(&mut self, date: NaiveDate) -> Result<bool, CommandError> {
        let removed = self.mutate(|data| data.delete_log(date))?;
        tracing::info!(%date, removed, "deleted day log");
        Ok(removed)
    }

    pub fn logs(&self) -> Result<Vec<CycleLog>, CommandError> {
        self.window()
    }

    pub fn prediction(&self) -> Result<Option<CyclePrediction>, CommandError> {
        let logs = self.window()?;
        let prediction = prediction::calculate_predictions(&logs, self.today);
        if prediction.is_none() {
            tracing::debug!(logs = logs.len(), "not enough flow data for a prediction");
        }
        Ok(prediction)
    }

    pub fn day(&self, date: NaiveDate) -> Result<DayPrediction, CommandError> {
        let logs = self.window()?;
        let prediction = prediction::calculate_predictions(&logs, self.today);
        // the day itself may be older than the window
        let own: Vec<CycleLog> = self.data()?.log_for(date).cloned().into_iter().collect();
        Ok(prediction::day_prediction(date, prediction.as_ref(), &own, self.today))
    }

    pub fn month(&self, year: i32, month: u32) -> Result<MonthData, CommandError> {
        let invalid = CommandError::InvalidMonth { year, month };
        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or(invalid)?;
        let next_first = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or(CommandError::InvalidMonth { year, month })?;

        let data = self.data()?;
        let logs: Vec<CycleLog> = data
            .cycle_logs
            .iter()
            .filter(|l| l.date >= first_day && l.date < next_first)
            .cloned()
            .collect();

        let prediction = prediction::calculate_predictions(&self.window()?, self.today);
        let days = first_day
            .iter_days()
            .take_while(|d| *d < next_first)
            .map(|d| {
                let mut day = prediction::day_prediction(d, prediction.as_ref(), &logs, self.today);
                if !data.settings.show_fertility {
                    day.is_fertile = false;
                    day.is_ovulation = false;
                    day.fertility_level = FertilityLevel::None;
                }
                day
            })
            .collect();

        Ok(MonthData {
            year: first_day.year(),
            month: first_day.month(),
            logs,
            days,
            prediction,
        })
    }

    pub fn stats(&self) -> Result<CycleStats, CommandError> {
        let logs = self.window()?;
        let prediction = prediction::calculate_predictions(&logs, self.today);
        Ok(stats::cycle_stats(&logs, prediction))
    }

    pub fn settings(&self) -> Result<AppSettings, CommandError> {
        Ok(self.data()?.settings.clone())
    }

    pub fn set_show_fertility(&mut self, enabled: bool) -> Result<(), CommandError> {
        self.mutate(|data| data.settings.show_fertility = enabled)?;
        tracing::info!(enabled, "updated fertility display");
        Ok(())
    }

    pub fn export(&self) -> Result<String, CommandError> {
        Ok(serde_json::to_string_pretty(self.data()?)?)
    }

    pub fn wipe(&mut self) -> Result<(), CommandError> {
        self.lock();
        self.storage.wipe()?;
        Ok(())
    }

    pub fn create_habit(&mut self, new: NewHabit) -> Result<Habit, CommandError> {
        let today = self.today;
        let habit = self.mutate(|data| data.create_habit(new, today))?;
        tracing::info!(id = %habit.id, name = %habit.name, "created habit");
        Ok(habit)
    }

    pub fn set_habit_completion(&mut self, id: Uuid, completed: bool) -> Result<(), CommandError> {
        let today = self.today;
        if self.mutate(|data| data.set_completion(id, today, completed))? {
            Ok(())
        } else {
            Err(CommandError::HabitNotFound(id))
        }
    }

    pub fn archive_habit(&mut self, id: Uuid) -> Result<(), CommandError> {
        if self.mutate(|data| data.archive_habit(id))? {
            tracing::info!(%id, "archived habit");
            Ok(())
        } else {
            Err(CommandError::HabitNotFound(id))
        }
    }

    pub fn habit_stats(&self) -> Result<HabitStats, CommandError> {
        Ok(self.data()?.habit_stats(self.today))
    }

    pub fn add_transaction(&mut self, new: NewTransaction) -> Result<Transaction, CommandError> {
        let today = self.today;
        let txn = self.mutate(|data| data.add_transaction(new, today))?;
        tracing::info!(id = %txn.id, category = ?txn.category, "added transaction");
        Ok(txn)
    }

    pub fn update_transaction(
        &mut self,
        id: Uuid,
        changes: TransactionUpdate,
    ) -> Result<Transaction, CommandError> {
        let txn = self
            .mutate(|data| data.update_transaction(id, changes))?
            .ok_or(CommandError::TransactionNotFound(id))?;
        tracing::info!(%id, category = ?txn.category, "updated transaction");
        Ok(txn)
    }

    pub fn delete_transaction(&mut self, id: Uuid) -> Result<bool, CommandError> {
        self.mutate(|data| data.delete_transaction(id))
    }

    /// `last_days` sets the start of the range when `filter` has none.
    pub fn transactions(
        &self,
        last_days: Option<u32>,
        mut filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, CommandError> {
        if filter.start.is_none() {
            filter.start = last_days.map(|d| window_start(self.today, d));
        }
        Ok(self.data()?.transactions(&filter))
    }

    pub fn transaction_stats(&self, period: StatsPeriod) -> Result<TransactionStats, CommandError> {
        Ok(self.data()?.transaction_stats(period, self.today))
    }

    pub fn add_journal_entry(
        &mut self,
        new: NewJournalEntry,
    ) -> Result<JournalEntry, CommandError> {
        let today = self.today;
        let entry = self.mutate(|data| data.add_journal_entry(new, today))?;
        tracing::info!(id = %entry.id, words = entry.word_count, "added journal entry");
        Ok(entry)
    }

    pub fn update_journal_entry(
        &mut self,
        id: Uuid,
        changes: JournalUpdate,
    ) -> Result<JournalEntry, CommandError> {
        self.mutate(|data| data.update_journal_entry(id, changes))?
            .ok_or(CommandError::JournalEntryNotFound(id))
    }

    pub fn delete_journal_entry(&mut self, id: Uuid) -> Result<(), CommandError> {
        if self.mutate(|data| data.delete_journal_entry(id))? {
            tracing::info!(%id, "deleted journal entry");
            Ok(())
        } else {
            Err(CommandError::JournalEntryNotFound(id))
        }
    }

    pub fn set_journal_favorite(&mut self, id: Uuid, favorite: bool) -> Result<(), CommandError> {
        if self.mutate(|data| data.set_journal_favorite(id, favorite))? {
            Ok(())
        } else {
            Err(CommandError::JournalEntryNotFound(id))
        }
    }

    pub fn journal_entries(
        &self,
        filter: &JournalFilter,
    ) -> Result<Vec<JournalEntry>, CommandError> {
        Ok(self.data()?.journal_entries(filter))
    }

    pub fn journal_stats(&self) -> Result<JournalStats, CommandError> {
        Ok(self.data()?.journal_stats(self.today))
    }
}

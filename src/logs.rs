//! Day-log accessors over unlocked [`AppData`]. One log per calendar date.

use chrono::{Days, NaiveDate};

use crate::models::{AppData, CycleLog};

/// First day of a window of `days` days ending at `today`.
/// Windows reaching past the calendar's range start at its first day.
pub fn window_start(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

impl AppData {
    /// Logs from the last `window_days` days, newest first.
    pub fn fetch_logs(&self, window_days: u32, today: NaiveDate) -> Vec<CycleLog> {
        let since = window_start(today, window_days);
        let mut logs: Vec<CycleLog> = self
            .cycle_logs
            .iter()
            .filter(|l| l.date >= since)
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.date.cmp(&a.date));
        logs
    }

    pub fn log_for(&self, date: NaiveDate) -> Option<&CycleLog> {
        self.cycle_logs.iter().find(|l| l.date == date)
    }

    /// Insert or replace the log for `log.date`.
    pub fn upsert_log(&mut self, mut log: CycleLog) -> CycleLog {
        log.energy_level = log.energy_level.map(|e| e.clamp(1, 5));
        let mut seen = Vec::with_capacity(log.symptoms.len());
        log.symptoms.retain(|s| {
            let fresh = !seen.contains(s);
            seen.push(*s);
            fresh
        });

        match self.cycle_logs.iter_mut().find(|l| l.date == log.date) {
            Some(existing) => *existing = log.clone(),
            None => self.cycle_logs.push(log.clone()),
        }
        log
    }

    /// Returns whether a log existed for `date`.
    pub fn delete_log(&mut self, date: NaiveDate) -> bool {
        let before = self.cycle_logs.len();
        self.cycle_logs.retain(|l| l.date != date);
        self.cycle_logs.len() != before
    }
}

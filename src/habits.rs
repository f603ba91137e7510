use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use crate::models::{AppData, Habit, HabitFrequency, HabitLog, HabitOverview, HabitStats};

/// Only this much habit history feeds streaks and the weekly view.
const HISTORY_DAYS: i64 = 30;

pub struct NewHabit {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub frequency: Option<HabitFrequency>,
    pub reminder_time: Option<String>,
}

/// Consecutive days ending at the latest completion.
/// Zero when the latest completion is older than yesterday.
pub fn streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut sorted = dates.to_vec();
    sorted.sort_by(|a, b| b.cmp(a));
    sorted.dedup();

    let Some(&latest) = sorted.first() else {
        return 0;
    };
    if latest != today && latest != today - Duration::days(1) {
        return 0;
    }

    let mut count = 1;
    for pair in sorted.windows(2) {
        if (pair[0] - pair[1]).num_days() != 1 {
            break;
        }
        count += 1;
    }
    count
}

/// Completion for each of the last seven days, oldest first.
pub fn week_history(dates: &[NaiveDate], today: NaiveDate) -> [bool; 7] {
    let mut history = [false; 7];
    for (i, slot) in history.iter_mut().enumerate() {
        let day = today - Duration::days(6 - i as i64);
        *slot = dates.contains(&day);
    }
    history
}

impl AppData {
    pub fn create_habit(&mut self, new: NewHabit, today: NaiveDate) -> Habit {
        let habit = Habit {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            icon: new.icon.unwrap_or_else(|| "🎯".into()),
            color: new.color.unwrap_or_else(|| "#8b5cf6".into()),
            frequency: new.frequency.unwrap_or(HabitFrequency::Daily),
            custom_days: Vec::new(),
            reminder_enabled: new.reminder_time.is_some(),
            reminder_time: new.reminder_time,
            target_count: 1,
            is_active: true,
            created_on: today,
        };
        self.habits.push(habit.clone());
        habit
    }

    pub fn active_habit(&self, id: Uuid) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id && h.is_active)
    }

    /// Mark or unmark `date` for a habit. Completing twice is a no-op.
    /// Returns false if the habit does not exist or is archived.
    pub fn set_completion(&mut self, habit_id: Uuid, date: NaiveDate, completed: bool) -> bool {
        if self.active_habit(habit_id).is_none() {
            return false;
        }
        let exists = self.habit_logs.iter().any(|l| l.habit_id == habit_id && l.date == date);
        if completed && !exists {
            self.habit_logs.push(HabitLog {
                habit_id,
                date,
                count: 1,
                notes: None,
            });
        } else if !completed {
            self.habit_logs.retain(|l| !(l.habit_id == habit_id && l.date == date));
        }
        true
    }

    /// Soft delete: the habit and its history are kept but hidden.
    pub fn archive_habit(&mut self, habit_id: Uuid) -> bool {
        match self.habits.iter_mut().find(|h| h.id == habit_id && h.is_active) {
            Some(habit) => {
                habit.is_active = false;
                true
            }
            None => false,
        }
    }

    pub fn habit_stats(&self, today: NaiveDate) -> HabitStats {
        let since = today - Duration::days(HISTORY_DAYS);
        let habits: Vec<HabitOverview> = self
            .habits
            .iter()
            .filter(|h| h.is_active)
            .map(|habit| {
                let dates: Vec<NaiveDate> = self
                    .habit_logs
                    .iter()
                    .filter(|l| l.habit_id == habit.id && l.date >= since)
                    .map(|l| l.date)
                    .collect();
                HabitOverview {
                    habit: habit.clone(),
                    streak: streak(&dates, today),
                    completed_today: dates.contains(&today),
                    week_history: week_history(&dates, today),
                }
            })
            .collect();

        let week_done: usize = habits
            .iter()
            .map(|h| h.week_history.iter().filter(|d| **d).count())
            .sum();
        let week_possible = habits.len() * 7;
        let week_percentage = if week_possible > 0 {
            (week_done as f64 / week_possible as f64 * 100.0).round() as u32
        } else {
            0
        };

        HabitStats {
            completed_today: habits.iter().filter(|h| h.completed_today).count(),
            total_habits: habits.len(),
            longest_streak: habits.iter().map(|h| h.streak).max().unwrap_or(0),
            week_percentage,
            habits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn new_habit(name: &str) -> NewHabit {
        NewHabit {
            name: name.into(),
            description: None,
            icon: None,
            color: None,
            frequency: None,
            reminder_time: None,
        }
    }

    #[test]
    fn streak_counts_back_from_yesterday() {
        let today = date("2024-03-10");
        let dates = [
            date("2024-03-09"),
            date("2024-03-08"),
            date("2024-03-07"),
            date("2024-03-05"),
        ];
        assert_eq!(streak(&dates, today), 3);
    }

    #[test]
    fn stale_streak_is_zero() {
        let today = date("2024-03-10");
        assert_eq!(streak(&[date("2024-03-08"), date("2024-03-07")], today), 0);
        assert_eq!(streak(&[], today), 0);
    }

    #[test]
    fn week_history_ends_today() {
        let today = date("2024-03-10");
        let dates = [date("2024-03-04"), date("2024-03-10"), date("2024-03-01")];
        let history = week_history(&dates, today);
        assert_eq!(history, [true, false, false, false, false, false, true]);
    }

    #[test]
    fn completion_toggle_and_stats() {
        let today = date("2024-03-10");
        let mut data = AppData::default();
        let read = data.create_habit(new_habit("Read"), today);
        let walk = data.create_habit(new_habit("Walk"), today);
        assert_eq!(read.icon, "🎯");

        assert!(data.set_completion(read.id, today, true));
        assert!(data.set_completion(read.id, today, true));
        assert!(data.set_completion(read.id, date("2024-03-09"), true));
        assert!(data.set_completion(walk.id, date("2024-03-09"), true));
        assert_eq!(data.habit_logs.len(), 3);

        let stats = data.habit_stats(today);
        assert_eq!(stats.total_habits, 2);
        assert_eq!(stats.completed_today, 1);
        assert_eq!(stats.longest_streak, 2);
        // 3 of 14
        assert_eq!(stats.week_percentage, 21);

        assert!(data.set_completion(read.id, today, false));
        assert_eq!(data.habit_stats(today).completed_today, 0);
    }

    #[test]
    fn archived_habits_are_hidden() {
        let today = date("2024-03-10");
        let mut data = AppData::default();
        let habit = data.create_habit(new_habit("Stretch"), today);
        assert!(data.archive_habit(habit.id));
        assert!(!data.archive_habit(habit.id));
        assert!(!data.set_completion(habit.id, today, true));
        assert_eq!(data.habit_stats(today).total_habits, 0);
    }
}

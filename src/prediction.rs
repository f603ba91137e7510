use chrono::{Duration, NaiveDate};

use crate::models::{CycleLog, CyclePrediction, DayPrediction, FertilityLevel, Phase};
use crate::reference;

/// Flow days further apart than this start a new episode.
const EPISODE_GAP_DAYS: i64 = 10;
const MAX_RECENT_STARTS: usize = 6;
const MIN_PLAUSIBLE_CYCLE: i64 = 21;
const MAX_PLAUSIBLE_CYCLE: i64 = 35;
pub const DEFAULT_CYCLE_LENGTH: i64 = 28;
pub const DEFAULT_PERIOD_LENGTH: i64 = 5;
const LUTEAL_LENGTH: i64 = 14;

/// A run of flow-bearing days treated as one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Episode {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Episode {
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Group flow-bearing log dates into episodes, oldest first.
/// Gaps of up to ten days inside a period are tolerated.
pub fn episodes(logs: &[CycleLog]) -> Vec<Episode> {
    let mut flow_days: Vec<NaiveDate> = logs
        .iter()
        .filter(|l| l.has_flow())
        .map(|l| l.date)
        .collect();
    flow_days.sort();
    flow_days.dedup();

    let mut grouped: Vec<Episode> = Vec::new();
    for day in flow_days {
        match grouped.last_mut() {
            Some(current) if (day - current.end).num_days() <= EPISODE_GAP_DAYS => {
                current.end = day
            }
            _ => grouped.push(Episode { start: day, end: day }),
        }
    }
    grouped
}

/// Average of the plausible deltas between consecutive starts, newest first.
/// Falls back to 28 days when nothing plausible remains.
pub fn estimate_cycle_length(recent_starts: &[NaiveDate]) -> i64 {
    let plausible: Vec<i64> = recent_starts
        .windows(2)
        .map(|w| (w[0] - w[1]).num_days())
        .filter(|d| (MIN_PLAUSIBLE_CYCLE..=MAX_PLAUSIBLE_CYCLE).contains(d))
        .collect();

    if plausible.is_empty() {
        return DEFAULT_CYCLE_LENGTH;
    }
    (plausible.iter().sum::<i64>() as f64 / plausible.len() as f64).round() as i64
}

/// Bucket a 1-indexed cycle day into a phase.
pub fn classify_phase(day_in_cycle: i64, cycle_length: i64, period_length: i64) -> Phase {
    if day_in_cycle <= period_length {
        Phase::Menstrual
    } else if day_in_cycle <= cycle_length - 16 {
        Phase::Follicular
    } else if day_in_cycle <= cycle_length - 12 {
        Phase::Ovulation
    } else {
        Phase::Luteal
    }
}

/// Predict the next cycle from logged flow days.
/// Returns `None` until at least one flow day has been logged.
pub fn calculate_predictions(logs: &[CycleLog], today: NaiveDate) -> Option<CyclePrediction> {
    let grouped = episodes(logs);
    let last_start = grouped.last()?.start;

    let recent_starts: Vec<NaiveDate> = grouped
        .iter()
        .rev()
        .take(MAX_RECENT_STARTS)
        .map(|e| e.start)
        .collect();
    let cycle_length = estimate_cycle_length(&recent_starts);
    let period_length = DEFAULT_PERIOD_LENGTH;
    let cycle = Duration::days(cycle_length);

    // Roll forward past any cycles that went unlogged
    let mut next_period_start = last_start + cycle;
    while next_period_start < today {
        next_period_start += cycle;
    }

    let next_period_end = next_period_start + Duration::days(period_length - 1);
    let ovulation_date = next_period_start - Duration::days(LUTEAL_LENGTH);
    let fertile_window_start = ovulation_date - Duration::days(5);
    let fertile_window_end = ovulation_date + Duration::days(1);

    let cycle_day = (today - last_start).num_days().rem_euclid(cycle_length) + 1;
    let days_until_period = (next_period_start - today).num_days().max(0);

    Some(CyclePrediction {
        next_period_start,
        next_period_end,
        fertile_window_start,
        fertile_window_end,
        ovulation_date,
        current_phase: classify_phase(cycle_day, cycle_length, period_length),
        days_until_period,
        cycle_day,
        cycle_length,
        period_length,
    })
}

fn fertility_level(date: NaiveDate, prediction: &CyclePrediction) -> FertilityLevel {
    if date < prediction.fertile_window_start || date > prediction.fertile_window_end {
        return FertilityLevel::None;
    }
    match (date - prediction.ovulation_date).num_days().abs() {
        0 => FertilityLevel::Peak,
        1 => FertilityLevel::High,
        2..=3 => FertilityLevel::Medium,
        _ => FertilityLevel::Low,
    }
}

/// Describe a single calendar day.
///
/// The projection decides phase and fertility; a logged flow day on `date`
/// forces the menstrual phase but leaves the fertility flags as projected.
pub fn day_prediction(
    date: NaiveDate,
    prediction: Option<&CyclePrediction>,
    logs: &[CycleLog],
    today: NaiveDate,
) -> DayPrediction {
    let mut phase = Phase::Follicular;
    let mut is_period_predicted = false;
    let mut is_ovulation = false;
    let mut fertility = FertilityLevel::None;

    if let Some(p) = prediction {
        let day_in_cycle = (date - p.next_period_start).num_days().rem_euclid(p.cycle_length) + 1;
        phase = classify_phase(day_in_cycle, p.cycle_length, p.period_length);

        is_period_predicted = (phase == Phase::Menstrual && date >= today)
            || (date >= p.next_period_start && date <= p.next_period_end);
        is_ovulation = day_in_cycle == p.cycle_length - LUTEAL_LENGTH || date == p.ovulation_date;
        fertility = fertility_level(date, p);
    }

    let logged_flow = logs.iter().any(|l| l.date == date && l.has_flow());
    if logged_flow {
        phase = Phase::Menstrual;
    }

    let info = reference::phase_info(phase);

    DayPrediction {
        date,
        phase,
        is_period: logged_flow,
        is_period_predicted,
        is_fertile: fertility != FertilityLevel::None,
        is_ovulation,
        fertility_level: fertility,
        can_train: info.training.can_train,
        training_intensity: info.training.intensity,
        training_tips: info.training.tips.iter().map(|t| t.to_string()).collect(),
        symptoms: reference::expected_symptoms(phase),
        recommendations: reference::recommendations(phase).iter().map(|r| r.to_string()).collect(),
        energy: info.energy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EnergyLevel, FlowIntensity, Symptom, TrainingIntensity};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn flow(d: &str) -> CycleLog {
        CycleLog {
            date: date(d),
            flow_intensity: Some(FlowIntensity::Medium),
            is_period_start: false,
            symptoms: vec![],
            mood: None,
            energy_level: None,
            notes: String::new(),
        }
    }

    fn plain(d: &str) -> CycleLog {
        CycleLog {
            flow_intensity: None,
            ..flow(d)
        }
    }

    fn two_periods() -> Vec<CycleLog> {
        [
            "2024-01-01",
            "2024-01-02",
            "2024-01-03",
            "2024-01-04",
            "2024-01-29",
            "2024-01-30",
            "2024-01-31",
            "2024-02-01",
        ]
        .iter()
        .map(|d| flow(d))
        .collect()
    }

    #[test]
    fn no_prediction_without_flow() {
        let logs = vec![plain("2024-01-01"), plain("2024-01-05")];
        assert!(calculate_predictions(&logs, date("2024-01-10")).is_none());
        assert!(calculate_predictions(&[], date("2024-01-10")).is_none());
    }

    #[test]
    fn single_flow_day_uses_default_length() {
        let pred = calculate_predictions(&[flow("2024-03-01")], date("2024-03-10")).unwrap();
        assert_eq!(pred.cycle_length, 28);
        assert_eq!(pred.period_length, 5);
        assert_eq!(pred.next_period_start, date("2024-03-29"));
        assert_eq!(pred.cycle_day, 10);
    }

    #[test]
    fn predicts_from_two_periods() {
        let pred = calculate_predictions(&two_periods(), date("2024-02-10")).unwrap();
        assert_eq!(pred.cycle_length, 28);
        assert_eq!(pred.next_period_start, date("2024-02-26"));
        assert_eq!(pred.next_period_end, date("2024-03-01"));
        assert_eq!(pred.ovulation_date, date("2024-02-12"));
        assert_eq!(pred.fertile_window_start, date("2024-02-07"));
        assert_eq!(pred.fertile_window_end, date("2024-02-13"));
        assert_eq!(pred.days_until_period, 16);
        assert_eq!(pred.cycle_day, 13);
        assert_eq!(pred.current_phase, Phase::Ovulation);
    }

    #[test]
    fn rolls_forward_over_missed_cycles() {
        let pred = calculate_predictions(&two_periods(), date("2024-04-01")).unwrap();
        // 02-26, 03-25, then 04-22
        assert_eq!(pred.next_period_start, date("2024-04-22"));
        assert_eq!(pred.days_until_period, 21);
        assert_eq!(pred.cycle_day, 8);
        assert_eq!(pred.current_phase, Phase::Follicular);
    }

    #[test]
    fn projected_start_today_is_not_rolled() {
        let pred = calculate_predictions(&two_periods(), date("2024-02-26")).unwrap();
        assert_eq!(pred.next_period_start, date("2024-02-26"));
        assert_eq!(pred.days_until_period, 0);
        assert_eq!(pred.cycle_day, 1);
        assert_eq!(pred.current_phase, Phase::Menstrual);
    }

    #[test]
    fn episode_grouping_tolerates_short_gaps() {
        let logs = vec![flow("2024-01-01"), flow("2024-01-04"), flow("2024-01-19")];
        let grouped = episodes(&logs);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0], Episode { start: date("2024-01-01"), end: date("2024-01-04") });
        assert_eq!(grouped[1].start, date("2024-01-19"));
    }

    #[test]
    fn episode_start_is_earliest_date() {
        let mut logs = two_periods();
        logs.reverse();
        let grouped = episodes(&logs);
        assert_eq!(grouped[1].start, date("2024-01-29"));
        assert_eq!(grouped[1].span_days(), 4);
    }

    #[test]
    fn implausible_deltas_are_ignored() {
        // newest first: 28 days, then 10 days
        let starts = [date("2024-02-08"), date("2024-01-11"), date("2024-01-01")];
        assert_eq!(estimate_cycle_length(&starts), 28);

        let starts = [date("2024-03-10"), date("2024-01-01")];
        assert_eq!(estimate_cycle_length(&starts), DEFAULT_CYCLE_LENGTH);
    }

    #[test]
    fn short_gap_episode_does_not_skew_length() {
        let logs = vec![flow("2024-01-01"), flow("2024-01-16"), flow("2024-02-13")];
        let pred = calculate_predictions(&logs, date("2024-02-20")).unwrap();
        assert_eq!(pred.cycle_length, 28);
        assert_eq!(pred.next_period_start, date("2024-03-12"));
    }

    #[test]
    fn averages_and_rounds_cycle_lengths() {
        let logs = vec![flow("2024-01-01"), flow("2024-01-30"), flow("2024-02-28")];
        // 29 and 29
        let pred = calculate_predictions(&logs, date("2024-03-01")).unwrap();
        assert_eq!(pred.cycle_length, 29);

        let logs = vec![flow("2024-01-01"), flow("2024-01-27"), flow("2024-02-23")];
        // 26 and 27 -> 26.5 rounds up
        let pred = calculate_predictions(&logs, date("2024-03-01")).unwrap();
        assert_eq!(pred.cycle_length, 27);
    }

    #[test]
    fn only_six_recent_starts_count() {
        // an old 35-day cycle, then five 22-day cycles
        let mut d = date("2023-01-01");
        let mut logs = vec![flow("2022-11-27")];
        for _ in 0..6 {
            logs.push(CycleLog { date: d, ..flow("2023-01-01") });
            d += Duration::days(22);
        }
        let pred = calculate_predictions(&logs, d).unwrap();
        assert_eq!(pred.cycle_length, 22);
    }

    #[test]
    fn phase_thresholds() {
        assert_eq!(classify_phase(5, 28, 5), Phase::Menstrual);
        assert_eq!(classify_phase(6, 28, 5), Phase::Follicular);
        assert_eq!(classify_phase(12, 28, 5), Phase::Follicular);
        assert_eq!(classify_phase(13, 28, 5), Phase::Ovulation);
        assert_eq!(classify_phase(16, 28, 5), Phase::Ovulation);
        assert_eq!(classify_phase(17, 28, 5), Phase::Luteal);
        assert_eq!(classify_phase(28, 28, 5), Phase::Luteal);
    }

    #[test]
    fn day_without_prediction_defaults_to_follicular() {
        let day = day_prediction(date("2024-05-05"), None, &[], date("2024-05-01"));
        assert_eq!(day.phase, Phase::Follicular);
        assert!(!day.is_period && !day.is_period_predicted && !day.is_fertile && !day.is_ovulation);
        assert_eq!(day.fertility_level, FertilityLevel::None);
        assert_eq!(day.training_intensity, TrainingIntensity::Intense);
        assert_eq!(day.energy, EnergyLevel::High);
    }

    #[test]
    fn day_is_idempotent() {
        let logs = two_periods();
        let today = date("2024-02-10");
        let pred = calculate_predictions(&logs, today);
        let a = day_prediction(date("2024-02-12"), pred.as_ref(), &logs, today);
        let b = day_prediction(date("2024-02-12"), pred.as_ref(), &logs, today);
        assert_eq!(a, b);
    }

    #[test]
    fn cycle_length_minus_fourteen_is_ovulation() {
        let logs = two_periods();
        let today = date("2024-02-10");
        let pred = calculate_predictions(&logs, today).unwrap();

        // day 14 of the 28-day cycle ending on 02-26
        let day = day_prediction(date("2024-02-11"), Some(&pred), &logs, today);
        assert_eq!(day.phase, Phase::Ovulation);
        assert!(day.is_ovulation);
        assert_eq!(day.fertility_level, FertilityLevel::High);

        let day = day_prediction(pred.ovulation_date, Some(&pred), &logs, today);
        assert!(day.is_ovulation);
        assert!(day.is_fertile);
        assert_eq!(day.fertility_level, FertilityLevel::Peak);
    }

    #[test]
    fn fertility_levels_by_distance() {
        let logs = two_periods();
        let today = date("2024-02-10");
        let pred = calculate_predictions(&logs, today).unwrap();
        let level = |d: &str| day_prediction(date(d), Some(&pred), &logs, today).fertility_level;

        assert_eq!(level("2024-02-06"), FertilityLevel::None);
        assert_eq!(level("2024-02-07"), FertilityLevel::Low);
        assert_eq!(level("2024-02-08"), FertilityLevel::Low);
        assert_eq!(level("2024-02-09"), FertilityLevel::Medium);
        assert_eq!(level("2024-02-10"), FertilityLevel::Medium);
        assert_eq!(level("2024-02-13"), FertilityLevel::High);
        assert_eq!(level("2024-02-14"), FertilityLevel::None);
        assert!(!day_prediction(date("2024-02-06"), Some(&pred), &logs, today).is_fertile);
    }

    #[test]
    fn predicted_period_days() {
        let logs = two_periods();
        let today = date("2024-02-10");
        let pred = calculate_predictions(&logs, today).unwrap();

        let day = day_prediction(date("2024-02-28"), Some(&pred), &logs, today);
        assert!(day.is_period_predicted);
        assert!(!day.is_period);
        assert_eq!(day.phase, Phase::Menstrual);
        assert_eq!(day.symptoms.len(), 7);
        assert!(day.symptoms.contains(&Symptom::Cramps));

        // later projected cycles still count as predicted period days
        let day = day_prediction(date("2024-03-25"), Some(&pred), &logs, today);
        assert!(day.is_period_predicted);

        // an unlogged past day in the menstrual phase is not a prediction
        let day = day_prediction(date("2024-01-30"), Some(&pred), &[], today);
        assert_eq!(day.phase, Phase::Menstrual);
        assert!(!day.is_period_predicted);
        assert!(!day.is_period);
    }

    #[test]
    fn logged_flow_overrides_projection() {
        let base = two_periods();
        let today = date("2024-02-10");
        let pred = calculate_predictions(&base, today).unwrap();

        let projected = day_prediction(date("2024-02-20"), Some(&pred), &base, today);
        assert_eq!(projected.phase, Phase::Luteal);

        let mut logs = base.clone();
        logs.push(CycleLog {
            flow_intensity: Some(FlowIntensity::Spotting),
            ..plain("2024-02-20")
        });
        let observed = day_prediction(date("2024-02-20"), Some(&pred), &logs, today);
        assert_eq!(observed.phase, Phase::Menstrual);
        assert!(observed.is_period);
        assert_eq!(observed.training_intensity, TrainingIntensity::Light);
        assert_eq!(observed.energy, EnergyLevel::Low);
    }

    #[test]
    fn logged_flow_keeps_projected_fertility() {
        let mut logs = two_periods();
        let today = date("2024-02-10");
        let pred = calculate_predictions(&logs, today).unwrap();
        logs.push(flow("2024-02-12"));

        let day = day_prediction(date("2024-02-12"), Some(&pred), &logs, today);
        assert!(day.is_period);
        assert_eq!(day.phase, Phase::Menstrual);
        assert!(day.is_fertile);
        assert_eq!(day.fertility_level, FertilityLevel::Peak);
    }

    #[test]
    fn log_without_flow_does_not_override() {
        let logs = vec![plain("2024-02-20")];
        let day = day_prediction(date("2024-02-20"), None, &logs, date("2024-02-20"));
        assert_eq!(day.phase, Phase::Follicular);
        assert!(!day.is_period);
    }
}

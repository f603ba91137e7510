use crate::models::{CycleLog, CyclePrediction, CycleStats, SymptomCount};
use crate::prediction::{self, DEFAULT_CYCLE_LENGTH, DEFAULT_PERIOD_LENGTH};
use crate::reference::{SYMPTOMS, SYMPTOM_COUNT};

const TOP_SYMPTOMS: usize = 5;

/// Fold a log window into the stats view.
pub fn cycle_stats(logs: &[CycleLog], prediction: Option<CyclePrediction>) -> CycleStats {
    let mut counts = [0usize; SYMPTOM_COUNT];
    for log in logs {
        for symptom in &log.symptoms {
            counts[*symptom as usize] += 1;
        }
    }

    // stable sort keeps table order on ties
    let mut top_symptoms: Vec<SymptomCount> = SYMPTOMS
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(info, count)| SymptomCount {
            symptom: info.symptom,
            label: info.label.to_string(),
            count,
        })
        .collect();
    top_symptoms.sort_by(|a, b| b.count.cmp(&a.count));
    top_symptoms.truncate(TOP_SYMPTOMS);

    let moods: Vec<f32> = logs.iter().filter_map(|l| l.mood).map(|m| m.score() as f32).collect();
    let avg_mood_score = mean(&moods);

    let episodes = prediction::episodes(logs);
    let spans: Vec<f32> = episodes.iter().map(|e| e.span_days() as f32).collect();
    let cycle_lengths: Vec<i64> = episodes
        .windows(2)
        .map(|w| (w[1].start - w[0].start).num_days())
        .collect();
    let last = episodes.last();

    CycleStats {
        total_logs: logs.len(),
        period_days_count: logs.iter().filter(|l| l.has_flow()).count(),
        top_symptoms,
        avg_mood_score,
        cycle_length: prediction.as_ref().map_or(DEFAULT_CYCLE_LENGTH, |p| p.cycle_length),
        period_length: prediction.as_ref().map_or(DEFAULT_PERIOD_LENGTH, |p| p.period_length),
        prediction,
        total_episodes: episodes.len(),
        avg_observed_period_length: mean(&spans),
        shortest_cycle: cycle_lengths.iter().copied().min(),
        longest_cycle: cycle_lengths.iter().copied().max(),
        last_period_start: last.map(|e| e.start),
        last_period_end: last.map(|e| e.end),
    }
}

fn mean(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f32>() / values.len() as f32)
}

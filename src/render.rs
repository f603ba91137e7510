//! Plain-text output for the CLI.

use crate::models::{
    ContentAnalysis, CycleLog, CyclePrediction, CycleStats, DayPrediction, FertilityLevel,
    HabitStats, JournalEntry, JournalStats, MonthData, Phase, Symptom, Transaction,
    TransactionKind, TransactionStats,
};
use crate::reference::{flow_label, mood_label, phase_info, symptom_info};

fn phase_name(phase: Phase) -> &'static str {
    phase_info(phase).name
}

fn symptom_list(log_symptoms: &[Symptom]) -> String {
    log_symptoms
        .iter()
        .map(|s| symptom_info(*s).label)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn log_line(log: &CycleLog) {
    let mut parts = vec![log.date.to_string()];
    if let Some(flow) = log.flow_intensity {
        let start = if log.is_period_start { " (start)" } else { "" };
        parts.push(format!("flow: {}{start}", flow_label(flow)));
    }
    if let Some(mood) = log.mood {
        parts.push(format!("mood: {}", mood_label(mood)));
    }
    if let Some(energy) = log.energy_level {
        parts.push(format!("energy: {energy}/5"));
    }
    if !log.symptoms.is_empty() {
        parts.push(symptom_list(&log.symptoms));
    }
    if !log.notes.is_empty() {
        parts.push(format!("\"{}\"", log.notes));
    }
    println!("{}", parts.join("  "));
}

pub fn prediction(prediction: Option<&CyclePrediction>) {
    let Some(p) = prediction else {
        println!("Not enough data yet. Log at least one day with flow.");
        return;
    };
    println!(
        "Cycle day {} of {} ({} phase)",
        p.cycle_day,
        p.cycle_length,
        phase_name(p.current_phase)
    );
    println!(
        "Next period:   {} to {} (in {} days)",
        p.next_period_start, p.next_period_end, p.days_until_period
    );
    println!("Fertile window: {} to {}", p.fertile_window_start, p.fertile_window_end);
    println!("Ovulation:     {}", p.ovulation_date);
}

pub fn day(day: &DayPrediction) {
    let info = phase_info(day.phase);
    println!("{}  {} ({})", day.date, info.name, info.short_name);
    if day.is_period {
        println!("  Period day");
    } else if day.is_period_predicted {
        println!("  Period expected");
    }
    if day.is_ovulation {
        println!("  Ovulation day");
    }
    if day.fertility_level != FertilityLevel::None {
        println!("  Fertility: {:?}", day.fertility_level);
    }
    println!("  Energy: {:?}", day.energy);
    if day.can_train {
        println!("  Training: {:?}", day.training_intensity);
    } else {
        println!("  Training: rest");
    }
    for tip in &day.training_tips {
        println!("    - {tip}");
    }
    if !day.symptoms.is_empty() {
        println!("  Common symptoms: {}", symptom_list(&day.symptoms));
    }
    for rec in &day.recommendations {
        println!("  * {rec}");
    }
}

pub fn month(data: &MonthData) {
    println!("{}-{:02}", data.year, data.month);
    for d in &data.days {
        let mut marks = String::new();
        if d.is_period {
            marks.push('P');
        } else if d.is_period_predicted {
            marks.push('p');
        }
        if d.is_ovulation {
            marks.push('O');
        } else if d.is_fertile {
            marks.push('f');
        }
        let logged = if data.logs.iter().any(|l| l.date == d.date) { "*" } else { "" };
        println!("  {}  {:<10} {:<3}{logged}", d.date, phase_name(d.phase), marks);
    }
}

pub fn stats(stats: &CycleStats) {
    println!("Logged days:   {}", stats.total_logs);
    println!("Period days:   {}", stats.period_days_count);
    println!("Periods:       {}", stats.total_episodes);
    println!("Cycle length:  {} days", stats.cycle_length);
    println!("Period length: {} days", stats.period_length);
    if let Some(avg) = stats.avg_observed_period_length {
        println!("Observed period length: {avg:.1} days");
    }
    if let (Some(short), Some(long)) = (stats.shortest_cycle, stats.longest_cycle) {
        println!("Cycle range:   {short} to {long} days");
    }
    if let (Some(start), Some(end)) = (stats.last_period_start, stats.last_period_end) {
        println!("Last period:   {start} to {end}");
    }
    if let Some(mood) = stats.avg_mood_score {
        println!("Average mood:  {mood:.1}/5");
    }
    if !stats.top_symptoms.is_empty() {
        println!("Top symptoms:");
        for s in &stats.top_symptoms {
            println!("  {:<18} {}", s.label, s.count);
        }
    }
    prediction(stats.prediction.as_ref());
}

pub fn phase(phase: Phase) {
    let info = phase_info(phase);
    println!("{} (days {})", info.name, info.days);
    println!("{}", info.description);
    println!("Hormones: {}", info.hormones);
    println!("Energy: {:?}", info.energy);
    println!("Training: {}", info.training.recommendation);
    println!("  Good for: {}", info.training.activities.join(", "));
    if !info.training.avoid.is_empty() {
        println!("  Avoid: {}", info.training.avoid.join(", "));
    }
    println!("Self-care: {}", info.self_care.join(", "));
}

pub fn habits(stats: &HabitStats) {
    println!(
        "{}/{} done today, longest streak {}, {}% this week",
        stats.completed_today, stats.total_habits, stats.longest_streak, stats.week_percentage
    );
    for h in &stats.habits {
        let week: String = h.week_history.iter().map(|d| if *d { '#' } else { '.' }).collect();
        let today = if h.completed_today { "x" } else { " " };
        println!(
            "  [{today}] {} {:<20} {week}  streak {}  {}",
            h.habit.icon, h.habit.name, h.streak, h.habit.id
        );
    }
}

pub fn transaction(txn: &Transaction) {
    let sign = match txn.kind {
        TransactionKind::Income => "+",
        TransactionKind::Expense => "-",
    };
    println!(
        "{}  {sign}{:.2}  {:<14} {}  ({})",
        txn.date,
        txn.amount.abs(),
        format!("{:?}", txn.category),
        txn.description,
        txn.id
    );
}

pub fn transaction_stats(stats: &TransactionStats) {
    println!("Income:   {:.2}", stats.total_income);
    println!("Expenses: {:.2}", stats.total_expenses);
    println!("Balance:  {:.2}", stats.balance);
    println!(
        "{} transactions, average expense {:.2}",
        stats.transaction_count, stats.average_expense
    );
    for c in &stats.categories {
        println!("  {:<14} {:>10.2}  {:>3}%", format!("{:?}", c.category), c.amount, c.percentage);
    }
}

pub fn journal_entry(entry: &JournalEntry) {
    let star = if entry.is_favorite { "*" } else { " " };
    let mood = entry.mood.map(|m| format!(" [{m:?}]")).unwrap_or_default();
    println!(
        "{star} {}  {}{mood}  ({} words)  {}",
        entry.date, entry.title, entry.word_count, entry.id
    );
    if !entry.tags.is_empty() {
        println!("    #{}", entry.tags.join(" #"));
    }
}

pub fn journal_stats(stats: &JournalStats) {
    println!(
        "{} entries, {} words ({} per entry)",
        stats.total_entries, stats.total_words, stats.avg_words
    );
    println!("This month:     {}", stats.entries_this_month);
    println!("Streak:         {} days", stats.streak);
    println!("Longest streak: {} days", stats.longest_streak);
    if let Some(mood) = stats.avg_mood {
        println!("Average mood:   {mood:.1}/5");
    }
    for m in &stats.mood_distribution {
        println!("  {:<10} {}", format!("{:?}", m.mood), m.count);
    }
    if !stats.top_tags.is_empty() {
        let tags: Vec<String> = stats
            .top_tags
            .iter()
            .map(|t| format!("#{} ({})", t.tag, t.count))
            .collect();
        println!("Top tags: {}", tags.join(", "));
    }
}

pub fn content_analysis(analysis: &ContentAnalysis) {
    println!("Sentiment: {:?}", analysis.sentiment);
    if !analysis.keywords.is_empty() {
        println!("Keywords: {}", analysis.keywords.join(", "));
    }
    for s in &analysis.suggestions {
        println!("  * {s}");
    }
}

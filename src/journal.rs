//! Journal entries, writing streaks, prompts and a keyword mood read.

use chrono::{Datelike, NaiveDate};
use rand::seq::SliceRandom;
use serde::Serialize;
use uuid::Uuid;

use crate::habits::streak;
use crate::models::{
    AppData, ContentAnalysis, JournalEntry, JournalMood, JournalStats, MoodCount, PromptCategory,
    Sentiment, TagCount,
};

const TITLE_MAX_CHARS: usize = 50;
const UNTITLED: &str = "Untitled";
/// Stats look at this many of the most recent entries.
const STATS_ENTRIES: usize = 365;
const MOOD_SAMPLE: usize = 30;
const TOP_TAGS: usize = 5;

#[derive(Debug, Serialize)]
pub struct JournalPrompt {
    pub text: &'static str,
    pub category: PromptCategory,
}

const fn prompt(category: PromptCategory, text: &'static str) -> JournalPrompt {
    JournalPrompt { text, category }
}

pub static PROMPTS: [JournalPrompt; 20] = [
    prompt(PromptCategory::Gratitude, "What are three things you are grateful for today?"),
    prompt(PromptCategory::Gratitude, "Who did something kind for you this week?"),
    prompt(PromptCategory::Gratitude, "What small moment made you smile today?"),
    prompt(PromptCategory::Reflection, "What did you learn today that you didn't know yesterday?"),
    prompt(
        PromptCategory::Reflection,
        "If you could change one thing about today, what would it be?",
    ),
    prompt(PromptCategory::Reflection, "How did you feel for most of the day, and why?"),
    prompt(PromptCategory::Reflection, "Which conversation stayed with you?"),
    prompt(PromptCategory::Goals, "What small step did you take towards your goals today?"),
    prompt(PromptCategory::Goals, "What is your number one priority for tomorrow?"),
    prompt(PromptCategory::Goals, "Which habit do you want to build or drop?"),
    prompt(PromptCategory::Emotions, "Which emotion ruled your day? Why do you think that was?"),
    prompt(PromptCategory::Emotions, "Was there a moment you felt outside your comfort zone?"),
    prompt(PromptCategory::Emotions, "What is worrying you right now? Write it all down."),
    prompt(PromptCategory::Creativity, "If today were a colour, which would it be and why?"),
    prompt(PromptCategory::Creativity, "Describe your day as if it were a movie scene."),
    prompt(PromptCategory::Creativity, "What would you do if you knew you could not fail?"),
    prompt(PromptCategory::Growth, "In which area of your life do you feel you are growing?"),
    prompt(PromptCategory::Growth, "What advice would you give yourself from a year ago?"),
    prompt(PromptCategory::Growth, "Which limiting belief are you ready to let go of?"),
    prompt(PromptCategory::Growth, "What would your ideal self look like six months from now?"),
];

const POSITIVE_WORDS: &[&str] = &[
    "happy", "joy", "good", "great", "amazing", "achieved", "success", "love", "thank", "grateful",
    "motivated", "excited", "content", "peace", "calm", "hope",
];

const NEGATIVE_WORDS: &[&str] = &[
    "sad",
    "bad",
    "frustrated",
    "angry",
    "anxious",
    "afraid",
    "worried",
    "stressed",
    "tired",
    "exhausted",
    "lonely",
    "lost",
    "confused",
    "pain",
    "hard",
];

pub struct NewJournalEntry {
    pub title: Option<String>,
    pub content: String,
    pub mood: Option<JournalMood>,
    pub energy_level: Option<u8>,
    pub tags: Vec<String>,
    pub is_favorite: bool,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Default)]
pub struct JournalUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub mood: Option<JournalMood>,
    pub energy_level: Option<u8>,
    pub tags: Option<Vec<String>>,
    pub date: Option<NaiveDate>,
}

/// Listing filters. Dates are inclusive, `search` matches title or content
/// ignoring case.
#[derive(Debug, Default, Clone)]
pub struct JournalFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub tag: Option<String>,
    pub mood: Option<JournalMood>,
    pub favorites: bool,
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl JournalFilter {
    fn matches(&self, entry: &JournalEntry) -> bool {
        let search = self.search.as_ref().map(|s| s.to_lowercase());
        self.start.map_or(true, |s| entry.date >= s)
            && self.end.map_or(true, |e| entry.date <= e)
            && self.tag.as_ref().map_or(true, |t| entry.tags.contains(t))
            && self.mood.map_or(true, |m| entry.mood == Some(m))
            && (!self.favorites || entry.is_favorite)
            && search.map_or(true, |s| {
                entry.title.to_lowercase().contains(&s) || entry.content.to_lowercase().contains(&s)
            })
    }
}

pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

/// First line of `content`, cut to fit a title.
pub fn generate_title(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("").trim();
    if first_line.is_empty() {
        return UNTITLED.to_string();
    }
    if first_line.chars().count() <= TITLE_MAX_CHARS {
        return first_line.to_string();
    }
    let cut: String = first_line.chars().take(TITLE_MAX_CHARS - 3).collect();
    format!("{cut}...")
}

/// Longest run of consecutive days among `dates`.
pub fn longest_streak(dates: &[NaiveDate]) -> u32 {
    let mut sorted = dates.to_vec();
    sorted.sort();
    sorted.dedup();

    let mut longest = 0;
    let mut current = 0;
    let mut prev: Option<NaiveDate> = None;
    for date in sorted {
        current = match prev {
            Some(p) if (date - p).num_days() == 1 => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        prev = Some(date);
    }
    longest
}

/// A random prompt, optionally from one category.
pub fn random_prompt(category: Option<PromptCategory>) -> Option<&'static JournalPrompt> {
    let candidates: Vec<&'static JournalPrompt> = PROMPTS
        .iter()
        .filter(|p| category.map_or(true, |c| p.category == c))
        .collect();
    candidates.choose(&mut rand::thread_rng()).copied()
}

/// Rough sentiment from positive and negative keyword counts.
pub fn analyze_content(content: &str) -> ContentAnalysis {
    let text = content.to_lowercase();
    let found = |words: &[&str]| -> Vec<String> {
        words
            .iter()
            .filter(|w| text.contains(*w))
            .map(|w| w.to_string())
            .collect()
    };
    let positive = found(POSITIVE_WORDS);
    let negative = found(NEGATIVE_WORDS);

    let sentiment = match positive.len().cmp(&negative.len()) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    };
    let suggestions: &[&str] = match sentiment {
        Sentiment::Negative => &[
            "Consider talking to someone you trust about how you feel",
            "Exercise can help lift your mood",
            "Remember that hard moments pass",
        ],
        Sentiment::Positive => &[
            "Great! Keep doing what makes you feel good",
            "Share your good energy with others",
        ],
        Sentiment::Neutral => &[],
    };

    ContentAnalysis {
        sentiment,
        keywords: positive.into_iter().chain(negative).collect(),
        suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
    }
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

impl AppData {
    pub fn add_journal_entry(&mut self, new: NewJournalEntry, today: NaiveDate) -> JournalEntry {
        let title = match new.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => generate_title(&new.content),
        };
        let entry = JournalEntry {
            id: Uuid::new_v4(),
            title,
            word_count: word_count(&new.content),
            mood_score: new.mood.map(JournalMood::score),
            content: new.content,
            mood: new.mood,
            energy_level: new.energy_level.map(|e| e.clamp(1, 5)),
            tags: clean_tags(new.tags),
            is_favorite: new.is_favorite,
            date: new.date.unwrap_or(today),
        };
        self.journal.push(entry.clone());
        entry
    }

    pub fn update_journal_entry(
        &mut self,
        id: Uuid,
        changes: JournalUpdate,
    ) -> Option<JournalEntry> {
        let entry = self.journal.iter_mut().find(|e| e.id == id)?;
        if let Some(title) = changes.title {
            entry.title = title;
        }
        if let Some(content) = changes.content {
            entry.word_count = word_count(&content);
            entry.content = content;
        }
        if let Some(mood) = changes.mood {
            entry.mood = Some(mood);
            entry.mood_score = Some(mood.score());
        }
        if let Some(energy) = changes.energy_level {
            entry.energy_level = Some(energy.clamp(1, 5));
        }
        if let Some(tags) = changes.tags {
            entry.tags = clean_tags(tags);
        }
        if let Some(date) = changes.date {
            entry.date = date;
        }
        Some(entry.clone())
    }

    pub fn delete_journal_entry(&mut self, id: Uuid) -> bool {
        let before = self.journal.len();
        self.journal.retain(|e| e.id != id);
        self.journal.len() != before
    }

    pub fn set_journal_favorite(&mut self, id: Uuid, favorite: bool) -> bool {
        match self.journal.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.is_favorite = favorite;
                true
            }
            None => false,
        }
    }

    /// Matching entries, newest first.
    pub fn journal_entries(&self, filter: &JournalFilter) -> Vec<JournalEntry> {
        let mut entries: Vec<JournalEntry> = self
            .journal
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        if let Some(limit) = filter.limit {
            entries.truncate(limit);
        }
        entries
    }

    pub fn journal_stats(&self, today: NaiveDate) -> JournalStats {
        let entries = self.journal_entries(&JournalFilter {
            limit: Some(STATS_ENTRIES),
            ..Default::default()
        });

        let total_entries = entries.len();
        let total_words: usize = entries.iter().map(|e| e.word_count).sum();
        let avg_words = if total_entries > 0 {
            (total_words as f64 / total_entries as f64).round() as usize
        } else {
            0
        };

        let mut days: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
        days.sort();
        days.dedup();

        let month_start = today.with_day(1).unwrap_or(today);
        let entries_this_month = entries.iter().filter(|e| e.date >= month_start).count();

        let scores: Vec<f32> = entries
            .iter()
            .take(MOOD_SAMPLE)
            .filter_map(|e| e.mood_score)
            .map(f32::from)
            .collect();
        let avg_mood = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f32>() / scores.len() as f32)
        };

        let mut moods: Vec<MoodCount> = Vec::new();
        for mood in entries.iter().filter_map(|e| e.mood) {
            match moods.iter_mut().find(|m| m.mood == mood) {
                Some(m) => m.count += 1,
                None => moods.push(MoodCount { mood, count: 1 }),
            }
        }
        moods.sort_by_key(|m| m.mood);

        // first-seen order breaks ties
        let mut tags: Vec<TagCount> = Vec::new();
        for tag in entries.iter().flat_map(|e| &e.tags) {
            match tags.iter_mut().find(|t| &t.tag == tag) {
                Some(t) => t.count += 1,
                None => tags.push(TagCount {
                    tag: tag.clone(),
                    count: 1,
                }),
            }
        }
        tags.sort_by(|a, b| b.count.cmp(&a.count));
        tags.truncate(TOP_TAGS);

        JournalStats {
            total_entries,
            total_words,
            avg_words,
            streak: streak(&days, today),
            longest_streak: longest_streak(&days),
            entries_this_month,
            avg_mood,
            mood_distribution: moods,
            top_tags: tags,
            days_with_entries: days,
        }
    }
}

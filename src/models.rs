use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum FlowIntensity {
    Spotting,
    Light,
    Medium,
    Heavy,
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Terrible,
    Bad,
    Okay,
    Good,
    Great,
}

impl Mood {
    /// 1 (terrible) through 5 (great).
    pub fn score(self) -> u8 {
        match self {
            Mood::Terrible => 1,
            Mood::Bad => 2,
            Mood::Okay => 3,
            Mood::Good => 4,
            Mood::Great => 5,
        }
    }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Symptom {
    Cramps,
    Headache,
    Bloating,
    Fatigue,
    Acne,
    Backpain,
    #[value(name = "breast_tenderness")]
    BreastTenderness,
    #[value(name = "mood_swings")]
    MoodSwings,
    Cravings,
    Nausea,
    Insomnia,
    Anxiety,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum FertilityLevel {
    None,
    Low,
    Medium,
    High,
    Peak,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum TrainingIntensity {
    Rest,
    Light,
    Moderate,
    Intense,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    Low,
    Medium,
    High,
}

/// One observation per calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CycleLog {
    pub date: NaiveDate,
    pub flow_intensity: Option<FlowIntensity>,
    #[serde(default)]
    pub is_period_start: bool,
    #[serde(default)]
    pub symptoms: Vec<Symptom>,
    pub mood: Option<Mood>,
    pub energy_level: Option<u8>, // 1-5
    #[serde(default)]
    pub notes: String,
}

impl CycleLog {
    pub fn has_flow(&self) -> bool {
        self.flow_intensity.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CyclePrediction {
    pub next_period_start: NaiveDate,
    pub next_period_end: NaiveDate,
    pub fertile_window_start: NaiveDate,
    pub fertile_window_end: NaiveDate,
    pub ovulation_date: NaiveDate,
    pub current_phase: Phase,
    pub days_until_period: i64,
    pub cycle_day: i64,
    pub cycle_length: i64,
    pub period_length: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayPrediction {
    pub date: NaiveDate,
    pub phase: Phase,
    pub is_period: bool,
    pub is_period_predicted: bool,
    pub is_fertile: bool,
    pub is_ovulation: bool,
    pub fertility_level: FertilityLevel,
    pub can_train: bool,
    pub training_intensity: TrainingIntensity,
    pub training_tips: Vec<String>,
    pub symptoms: Vec<Symptom>,
    pub recommendations: Vec<String>,
    pub energy: EnergyLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymptomCount {
    pub symptom: Symptom,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleStats {
    pub prediction: Option<CyclePrediction>,
    pub total_logs: usize,
    pub period_days_count: usize,
    pub top_symptoms: Vec<SymptomCount>,
    pub avg_mood_score: Option<f32>,
    pub cycle_length: i64,
    pub period_length: i64,
    pub total_episodes: usize,
    pub avg_observed_period_length: Option<f32>,
    pub shortest_cycle: Option<i64>,
    pub longest_cycle: Option<i64>,
    pub last_period_start: Option<NaiveDate>,
    pub last_period_end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HabitFrequency {
    Daily,
    Weekdays,
    Weekends,
    Weekly,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: String,
    pub color: String,
    pub frequency: HabitFrequency,
    #[serde(default)]
    pub custom_days: Vec<u8>,
    pub reminder_time: Option<String>,
    #[serde(default)]
    pub reminder_enabled: bool,
    pub target_count: u32,
    pub is_active: bool,
    pub created_on: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitLog {
    pub habit_id: Uuid,
    pub date: NaiveDate,
    pub count: u32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitOverview {
    pub habit: Habit,
    pub streak: u32,
    pub completed_today: bool,
    pub week_history: [bool; 7],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitStats {
    pub completed_today: usize,
    pub total_habits: usize,
    pub longest_streak: u32,
    pub week_percentage: u32,
    pub habits: Vec<HabitOverview>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Transport,
    Utilities,
    Entertainment,
    Health,
    Clothing,
    Home,
    Education,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub category_confidence: f32,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    Week,
    Month,
    Year,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: f64,
    pub percentage: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionStats {
    pub total_expenses: f64,
    pub total_income: f64,
    pub balance: f64,
    pub transaction_count: usize,
    pub categories: Vec<CategoryTotal>,
    pub average_expense: f64,
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum JournalMood {
    Amazing,
    Good,
    Neutral,
    Bad,
    Terrible,
}

impl JournalMood {
    pub fn score(self) -> u8 {
        match self {
            JournalMood::Amazing => 5,
            JournalMood::Good => 4,
            JournalMood::Neutral => 3,
            JournalMood::Bad => 2,
            JournalMood::Terrible => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub mood: Option<JournalMood>,
    pub mood_score: Option<u8>,
    pub energy_level: Option<u8>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    pub word_count: usize,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodCount {
    pub mood: JournalMood,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalStats {
    pub total_entries: usize,
    pub total_words: usize,
    pub avg_words: usize,
    pub streak: u32,
    pub longest_streak: u32,
    pub entries_this_month: usize,
    pub avg_mood: Option<f32>,
    pub mood_distribution: Vec<MoodCount>,
    pub top_tags: Vec<TagCount>,
    pub days_with_entries: Vec<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PromptCategory {
    Gratitude,
    Reflection,
    Goals,
    Emotions,
    Creativity,
    Growth,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentAnalysis {
    pub sentiment: Sentiment,
    pub keywords: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub cycle_logs: Vec<CycleLog>,
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub habit_logs: Vec<HabitLog>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub journal: Vec<JournalEntry>,
    #[serde(default)]
    pub settings: AppSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppSettings {
    #[serde(default)]
    pub show_fertility: bool,
}

/// Data returned for a month view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthData {
    pub year: i32,
    pub month: u32,
    pub logs: Vec<CycleLog>,
    pub days: Vec<DayPrediction>,
    pub prediction: Option<CyclePrediction>,
}

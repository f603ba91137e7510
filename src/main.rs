mod commands;
mod config;
mod crypto;
mod finance;
mod habits;
mod journal;
mod logs;
mod models;
mod prediction;
mod reference;
mod render;
mod stats;
mod storage;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use commands::Session;
use config::Config;
use finance::{NewTransaction, TransactionFilter, TransactionUpdate};
use habits::NewHabit;
use journal::{JournalFilter, JournalUpdate, NewJournalEntry};
use models::{
    Category, CycleLog, FlowIntensity, HabitFrequency, JournalMood, Mood, Phase, PromptCategory,
    StatsPeriod, Symptom, TransactionKind,
};
use storage::Storage;

const PASSPHRASE_ENV: &str = "BIENESTAR_PASSPHRASE";

#[derive(Parser, Debug)]
#[command(name = "bienestar", version, about = "Private, on-device wellness tracker")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the encrypted data file
    Init,

    /// Reference information about a cycle phase
    Phase {
        #[arg(value_enum)]
        phase: Phase,
    },

    #[command(flatten)]
    Data(DataCommand),
}

/// Commands that read or change the encrypted data.
#[derive(Subcommand, Debug)]
enum DataCommand {
    /// Record or replace the log for a day
    Log {
        /// Day to log (default: today)
        date: Option<NaiveDate>,
        #[arg(long, value_enum)]
        flow: Option<FlowIntensity>,
        /// Mark this day as the first day of a period
        #[arg(long)]
        start: bool,
        #[arg(long = "symptom", value_enum)]
        symptoms: Vec<Symptom>,
        #[arg(long, value_enum)]
        mood: Option<Mood>,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        energy: Option<u8>,
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Remove the log for a day
    Delete { date: NaiveDate },

    /// List logs in the prediction window
    Logs,

    /// Show the next period, fertile window and current phase
    Predict,

    /// Describe a single day
    Day {
        /// Default: today
        date: Option<NaiveDate>,
    },

    /// Describe every day of a month
    Month {
        /// Default: current year
        year: Option<i32>,
        /// Default: current month
        month: Option<u32>,
    },

    /// Symptom, mood and cycle summary
    Stats,

    /// Show or change preferences
    Settings {
        /// Show fertility badges in month views
        #[arg(long)]
        show_fertility: Option<bool>,
    },

    /// Print all data as JSON
    Export,

    /// Delete all data permanently
    Wipe {
        /// Required confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Habit tracking
    Habit {
        #[command(subcommand)]
        command: HabitCommand,
    },

    /// Income and expenses
    Finance {
        #[command(subcommand)]
        command: FinanceCommand,
    },

    /// Journal entries and writing prompts
    Journal {
        #[command(subcommand)]
        command: JournalCommand,
    },
}

impl DataCommand {
    fn needs_unlock(&self) -> bool {
        !matches!(
            self,
            DataCommand::Journal {
                command: JournalCommand::Prompt { .. } | JournalCommand::Analyze { .. }
            }
        )
    }
}

#[derive(Subcommand, Debug)]
enum HabitCommand {
    /// Create a habit
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long, value_enum)]
        frequency: Option<HabitFrequency>,
        /// Reminder time, e.g. 08:30
        #[arg(long)]
        reminder: Option<String>,
    },
    /// Mark a habit done today
    Done { id: Uuid },
    /// Unmark a habit for today
    Undo { id: Uuid },
    /// Hide a habit
    Archive { id: Uuid },
    /// Streaks and weekly completion
    List,
}

#[derive(Subcommand, Debug)]
enum FinanceCommand {
    /// Record a transaction (categorized from the description if no category given)
    Add {
        description: String,
        amount: f64,
        #[arg(long)]
        income: bool,
        #[arg(long, value_enum)]
        category: Option<Category>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Change fields of a transaction
    Edit {
        id: Uuid,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long, value_enum)]
        kind: Option<TransactionKind>,
        #[arg(long, value_enum)]
        category: Option<Category>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Remove a transaction
    Delete { id: Uuid },
    /// List transactions, newest first
    List {
        /// Only the last N days
        #[arg(long)]
        days: Option<u32>,
        /// First day to include
        #[arg(long, conflicts_with = "days")]
        from: Option<NaiveDate>,
        /// Last day to include
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long, value_enum)]
        category: Option<Category>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Totals per category
    Stats {
        #[arg(long, value_enum, default_value = "month")]
        period: StatsPeriod,
    },
}

#[derive(Subcommand, Debug)]
enum JournalCommand {
    /// Write an entry (title defaults to the first line)
    Add {
        content: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_enum)]
        mood: Option<JournalMood>,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        energy: Option<u8>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        favorite: bool,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Change fields of an entry
    Edit {
        id: Uuid,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_enum)]
        mood: Option<JournalMood>,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        energy: Option<u8>,
        /// Replaces all tags
        #[arg(long = "tag")]
        tags: Option<Vec<String>>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Remove an entry
    Delete { id: Uuid },
    /// Mark or unmark an entry as favorite
    Favorite {
        id: Uuid,
        #[arg(long)]
        off: bool,
    },
    /// List entries, newest first
    List {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long, value_enum)]
        mood: Option<JournalMood>,
        #[arg(long)]
        favorites: bool,
        /// Text to look for in title or content
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Writing streaks, moods and tags
    Stats,
    /// Suggest something to write about
    Prompt {
        #[arg(long, value_enum)]
        category: Option<PromptCategory>,
    },
    /// Keyword sentiment of a text
    Analyze { content: String },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();
}

/// Passphrase from the environment, else one line from stdin.
fn read_passphrase(prompt: &str) -> Result<String> {
    if let Ok(pass) = std::env::var(PASSPHRASE_ENV) {
        return Ok(pass);
    }
    eprint!("{prompt}");
    io::stderr().flush().ok();
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("reading passphrase")?;
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text(value);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut cfg = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(dir) = cli.data_dir {
        cfg.data_dir = Some(dir);
    }
    let storage = Storage::new(&cfg.data_dir()?, cfg.kdf());
    let today = chrono::Local::now().date_naive();
    let mut session = Session::new(storage, cfg.log_window_days, today);

    run(cli.command, &mut session, cli.json)
}

fn run(command: Command, session: &mut Session, json: bool) -> Result<()> {
    match command {
        Command::Init => {
            if session.is_setup() {
                bail!("already set up");
            }
            let pass = read_passphrase("New passphrase: ")?;
            session.setup(pass)?;
            println!("Tracker created.");
        }
        Command::Phase { phase } => render::phase(phase),
        Command::Data(command) => {
            if command.needs_unlock() {
                let pass = read_passphrase("Passphrase: ")?;
                session.unlock(pass).context("unlocking data file")?;
            }
            run_data(command, session, json)?;
        }
    }
    Ok(())
}

fn run_data(command: DataCommand, session: &mut Session, json: bool) -> Result<()> {
    let today = session.today();

    match command {
        DataCommand::Log {
            date,
            flow,
            start,
            symptoms,
            mood,
            energy,
            notes,
        } => {
            let saved = session.log_day(CycleLog {
                date: date.unwrap_or(today),
                flow_intensity: flow,
                is_period_start: start,
                symptoms,
                mood,
                energy_level: energy,
                notes,
            })?;
            emit(json, &saved, render::log_line)?;
        }

        DataCommand::Delete { date } => {
            if session.delete_log(date)? {
                println!("Deleted log for {date}.");
            } else {
                println!("No log for {date}.");
            }
        }

        DataCommand::Logs => {
            let logs = session.logs()?;
            emit(json, &logs, |logs| logs.iter().for_each(render::log_line))?;
        }

        DataCommand::Predict => {
            let prediction = session.prediction()?;
            emit(json, &prediction, |p| render::prediction(p.as_ref()))?;
        }

        DataCommand::Day { date } => {
            let day = session.day(date.unwrap_or(today))?;
            emit(json, &day, render::day)?;
        }

        DataCommand::Month { year, month } => {
            let year = year.unwrap_or(today.year());
            let month = month.unwrap_or(today.month());
            let data = session.month(year, month)?;
            emit(json, &data, render::month)?;
        }

        DataCommand::Stats => {
            let stats = session.stats()?;
            emit(json, &stats, render::stats)?;
        }

        DataCommand::Settings { show_fertility } => {
            if let Some(enabled) = show_fertility {
                session.set_show_fertility(enabled)?;
            }
            let settings = session.settings()?;
            emit(json, &settings, |s| {
                println!("show_fertility = {}", s.show_fertility)
            })?;
        }

        DataCommand::Export => {
            println!("{}", session.export()?);
        }

        DataCommand::Wipe { yes } => {
            if !yes {
                bail!("refusing to wipe without --yes");
            }
            session.wipe()?;
            println!("All data deleted.");
        }

        DataCommand::Habit { command } => run_habit(command, session, json)?,

        DataCommand::Finance { command } => run_finance(command, session, json)?,

        DataCommand::Journal { command } => run_journal(command, session, json)?,
    }

    Ok(())
}

fn run_habit(command: HabitCommand, session: &mut Session, json: bool) -> Result<()> {
    match command {
        HabitCommand::Add {
            name,
            description,
            icon,
            color,
            frequency,
            reminder,
        } => {
            let habit = session.create_habit(NewHabit {
                name,
                description,
                icon,
                color,
                frequency,
                reminder_time: reminder,
            })?;
            emit(json, &habit, |h| println!("{} {} ({})", h.icon, h.name, h.id))?;
        }
        HabitCommand::Done { id } => session.set_habit_completion(id, true)?,
        HabitCommand::Undo { id } => session.set_habit_completion(id, false)?,
        HabitCommand::Archive { id } => session.archive_habit(id)?,
        HabitCommand::List => {
            let stats = session.habit_stats()?;
            emit(json, &stats, render::habits)?;
        }
    }
    Ok(())
}

fn run_finance(command: FinanceCommand, session: &mut Session, json: bool) -> Result<()> {
    match command {
        FinanceCommand::Add {
            description,
            amount,
            income,
            category,
            date,
            notes,
        } => {
            let kind = if income {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };
            let txn = session.add_transaction(NewTransaction {
                description,
                amount,
                category,
                kind,
                date,
                notes,
            })?;
            emit(json, &txn, render::transaction)?;
        }
        FinanceCommand::Edit {
            id,
            description,
            amount,
            kind,
            category,
            date,
            notes,
        } => {
            let txn = session.update_transaction(
                id,
                TransactionUpdate {
                    description,
                    amount,
                    category,
                    kind,
                    date,
                    notes,
                },
            )?;
            emit(json, &txn, render::transaction)?;
        }
        FinanceCommand::Delete { id } => {
            if !session.delete_transaction(id)? {
                bail!("no transaction with id {id}");
            }
        }
        FinanceCommand::List {
            days,
            from,
            to,
            category,
            limit,
        } => {
            let filter = TransactionFilter {
                start: from,
                end: to,
                category,
                limit,
            };
            let txns = session.transactions(days, filter)?;
            emit(json, &txns, |txns| txns.iter().for_each(render::transaction))?;
        }
        FinanceCommand::Stats { period } => {
            let stats = session.transaction_stats(period)?;
            emit(json, &stats, render::transaction_stats)?;
        }
    }
    Ok(())
}

fn run_journal(command: JournalCommand, session: &mut Session, json: bool) -> Result<()> {
    match command {
        JournalCommand::Add {
            content,
            title,
            mood,
            energy,
            tags,
            favorite,
            date,
        } => {
            let entry = session.add_journal_entry(NewJournalEntry {
                title,
                content,
                mood,
                energy_level: energy,
                tags,
                is_favorite: favorite,
                date,
            })?;
            emit(json, &entry, render::journal_entry)?;
        }
        JournalCommand::Edit {
            id,
            content,
            title,
            mood,
            energy,
            tags,
            date,
        } => {
            let entry = session.update_journal_entry(
                id,
                JournalUpdate {
                    title,
                    content,
                    mood,
                    energy_level: energy,
                    tags,
                    date,
                },
            )?;
            emit(json, &entry, render::journal_entry)?;
        }
        JournalCommand::Delete { id } => session.delete_journal_entry(id)?,
        JournalCommand::Favorite { id, off } => session.set_journal_favorite(id, !off)?,
        JournalCommand::List {
            from,
            to,
            tag,
            mood,
            favorites,
            search,
            limit,
        } => {
            let entries = session.journal_entries(&JournalFilter {
                start: from,
                end: to,
                tag: tag.map(|t| t.trim().to_lowercase()),
                mood,
                favorites,
                search,
                limit,
            })?;
            emit(json, &entries, |entries| {
                entries.iter().for_each(render::journal_entry)
            })?;
        }
        JournalCommand::Stats => {
            let stats = session.journal_stats()?;
            emit(json, &stats, render::journal_stats)?;
        }
        JournalCommand::Prompt { category } => match journal::random_prompt(category) {
            Some(prompt) => emit(json, prompt, |p| println!("{}", p.text))?,
            None => bail!("no prompts available"),
        },
        JournalCommand::Analyze { content } => {
            let analysis = journal::analyze_content(&content);
            emit(json, &analysis, render::content_analysis)?;
        }
    }
    Ok(())
}

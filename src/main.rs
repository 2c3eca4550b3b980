use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use recoverrs::baseline::{BaselineProfile, BaselineProvider, FatigueDelta, Gender};
use recoverrs::coach::coach_insights;
use recoverrs::config::AppConfig;
use recoverrs::database::Database;
use recoverrs::export::export_report_csv;
use recoverrs::guard::{guard_calendar, guard_label};
use recoverrs::logging::init_logging;
use recoverrs::routines::{recommend_routines, FatigueFocus, RoutineKind};
use recoverrs::{Prediction, RiskLevel, SampleValidator, ScoringEngine, WeeklyReport, WorkoutSample};

/// recoverrs - Recovery Scoring CLI
///
/// Scores workouts for fatigue and overtraining risk, recommends recovery
/// windows with their expected return, and summarizes weekly recovery efficiency.
#[derive(Parser)]
#[command(name = "recoverrs")]
#[command(version)]
#[command(about = "Fatigue and recovery scoring CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Override the configured database file
    #[arg(long, value_name = "FILE", global = true)]
    db: Option<PathBuf>,

    /// User id for stored history, todos and routine runs
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one workout: fatigue, risk and recovery windows
    Predict {
        /// JSON file holding one workout sample
        #[arg(short, long)]
        file: PathBuf,

        /// Day the workout belongs to (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Fill last7/last28 load from stored history
        #[arg(long)]
        from_history: bool,

        /// Store the scoring so it counts toward future history
        #[arg(short, long)]
        save: bool,

        /// Age used for the baseline comparison
        #[arg(long)]
        age: Option<u8>,

        /// Gender used for the baseline comparison
        #[arg(long)]
        gender: Option<Gender>,
    },

    /// Weekly recovery efficiency report
    Report {
        /// JSON file holding an array of samples or {"weekly_sessions": [...]}
        #[arg(short, long)]
        file: PathBuf,

        /// Also write the per-day ratios as CSV
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,
    },

    /// Recommend recovery routines
    Routines {
        /// Fatigue focus (muscle, central, heat)
        #[arg(short, long)]
        focus: Option<FatigueFocus>,

        /// Current wind speed in m/s
        #[arg(short, long)]
        wind: Option<f64>,
    },

    /// Two-week overtraining guard calendar
    Guard {
        /// First day of the calendar (default: today)
        #[arg(short, long)]
        start: Option<NaiveDate>,
    },

    /// Coaching alerts
    Coach,

    /// Stored scorings for the user
    History {
        /// Number of recent scorings to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Recovery todo list
    Todo {
        #[command(subcommand)]
        action: TodoAction,
    },

    /// Completed recovery routines
    RoutineLog {
        #[command(subcommand)]
        action: RoutineLogAction,
    },

    /// Configure application settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum TodoAction {
    /// Add a todo
    Add { title: String },
    /// List todos
    List,
    /// Mark a todo done
    Done { id: i64 },
    /// Mark a todo not done
    Undo { id: i64 },
    /// Delete a todo
    Remove { id: i64 },
}

#[derive(Subcommand)]
enum RoutineLogAction {
    /// Record a completed routine
    Add {
        title: String,

        /// Routine kind (breathing, stretch, contrast, nap, walk)
        #[arg(short, long)]
        kind: RoutineKind,

        #[arg(short, long)]
        minutes: u32,
    },
    /// List recent routine runs
    List {
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Weekly report input: a bare array or the request-style wrapper
#[derive(Deserialize)]
#[serde(untagged)]
enum ReportInput {
    Sessions(Vec<WorkoutSample>),
    Wrapped {
        #[serde(default)]
        weekly_sessions: Vec<WorkoutSample>,
    },
}

impl ReportInput {
    fn into_sessions(self) -> Vec<WorkoutSample> {
        match self {
            ReportInput::Sessions(sessions) => sessions,
            ReportInput::Wrapped { weekly_sessions } => weekly_sessions,
        }
    }
}

#[derive(Serialize)]
struct PredictOutput<'a> {
    #[serde(flatten)]
    prediction: &'a Prediction,
    fatigue_delta: &'a FatigueDelta,
}

#[derive(Tabled)]
struct WindowRow {
    #[tabled(rename = "Window")]
    window: String,
    #[tabled(rename = "Minutes")]
    minutes: u32,
    #[tabled(rename = "ROI %")]
    roi: u8,
    #[tabled(rename = "Note")]
    note: String,
}

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Workout load")]
    workout_load: f64,
    #[tabled(rename = "Recovery load")]
    recovery_load: f64,
    #[tabled(rename = "Ratio")]
    ratio: f64,
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Date")]
    date: NaiveDate,
    #[tabled(rename = "Load")]
    load: String,
    #[tabled(rename = "Fatigue")]
    fatigue: u8,
    #[tabled(rename = "Risk")]
    risk: RiskLevel,
}

#[derive(Tabled)]
struct TodoRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Done")]
    done: String,
    #[tabled(rename = "Title")]
    title: String,
}

#[derive(Tabled)]
struct RoutineRunRow {
    #[tabled(rename = "Completed")]
    completed_at: String,
    #[tabled(rename = "Routine")]
    title: String,
    #[tabled(rename = "Kind")]
    kind: RoutineKind,
    #[tabled(rename = "Minutes")]
    minutes: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(cli.config.as_deref())?;
    init_logging(&config.logging.clone().with_verbosity(cli.verbose))?;

    let engine = ScoringEngine::with_constants(config.scoring.clone());
    let user = cli.user.clone().unwrap_or_else(|| config.default_user.clone());
    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| config.storage.database_path.clone());
    let open_db = || Database::new(&db_path).with_context(|| format!("Failed to open database: {}", db_path.display()));

    match cli.command {
        Commands::Predict {
            file,
            date,
            from_history,
            save,
            age,
            gender,
        } => {
            let mut sample: WorkoutSample = read_json(&file)?;
            let date = date.unwrap_or_else(|| Utc::now().date_naive());

            let db = if from_history || save { Some(open_db()?) } else { None };
            if from_history {
                if let Some(db) = &db {
                    db.load_history(&user, date)?.apply_to(&mut sample);
                }
            }

            SampleValidator::validate(&sample)?;
            let prediction = engine.predict(&sample);

            let profile = BaselineProfile { age, gender };
            let baseline = config
                .baseline
                .table()
                .and_then(|table| table.baseline_for(&profile));
            let delta = engine.fatigue_delta(prediction.fatigue_score, baseline);

            if save {
                if let Some(db) = &db {
                    db.store_scoring(&user, date, &sample, &prediction)?;
                }
            }

            if cli.json {
                print_json(&PredictOutput {
                    prediction: &prediction,
                    fatigue_delta: &delta,
                })?;
            } else {
                print_prediction(&prediction, &delta, save);
            }
        }

        Commands::Report { file, csv } => {
            let sessions = read_json::<ReportInput>(&file)?.into_sessions();
            SampleValidator::validate_all(&sessions)?;
            let report = engine.weekly_report(&sessions);

            if let Some(path) = &csv {
                export_report_csv(&report, path)?;
            }

            if cli.json {
                print_json(&report)?;
            } else {
                print_report(&report);
                if let Some(path) = csv {
                    println!("{}", format!("✓ CSV written to {}", path.display()).green());
                }
            }
        }

        Commands::Routines { focus, wind } => {
            let routines = recommend_routines(focus, wind);
            if cli.json {
                print_json(&routines)?;
            } else {
                println!("{}", "Recommended routines".cyan().bold());
                for routine in &routines {
                    println!(
                        "  {} {} ({} min)",
                        "•".cyan(),
                        routine.title.bold(),
                        routine.minutes
                    );
                    for step in &routine.steps {
                        println!("      {}", step.dimmed());
                    }
                }
            }
        }

        Commands::Guard { start } => {
            let calendar = guard_calendar(start.unwrap_or_else(|| Utc::now().date_naive()));
            if cli.json {
                print_json(&calendar)?;
            } else {
                println!("{}", "Overtraining guard".magenta().bold());
                for day in &calendar {
                    println!(
                        "  {} {}",
                        day.date.format("%a %Y-%m-%d"),
                        colorize_risk(day.risk, guard_label(day.risk))
                    );
                }
            }
        }

        Commands::Coach => {
            let insights = coach_insights();
            if cli.json {
                print_json(&insights)?;
            } else {
                println!("{}", "Coach".blue().bold());
                for alert in &insights.alerts {
                    println!("  {} {}", "!".yellow(), alert);
                }
            }
        }

        Commands::History { limit } => {
            let db = open_db()?;
            let records = db.list_scorings(&user, limit)?;
            if cli.json {
                print_json(&records)?;
            } else if records.is_empty() {
                println!("{}", format!("No stored scorings for {}", user).yellow());
            } else {
                let rows = records.iter().map(|r| HistoryRow {
                    date: r.date,
                    load: format!("{:.1}", r.session_load),
                    fatigue: r.prediction.fatigue_score,
                    risk: r.prediction.risk,
                });
                println!("{}", Table::new(rows).with(Style::rounded()));

                let counts = db.risk_counts(&user)?;
                let summary: Vec<String> = counts
                    .iter()
                    .map(|(risk, count)| format!("{}: {}", risk, count))
                    .collect();
                println!("  {}", summary.join("  ").dimmed());
            }
        }

        Commands::Todo { action } => {
            let db = open_db()?;
            match action {
                TodoAction::Add { title } => {
                    let todo = db.add_todo(&user, &title)?;
                    println!("{}", format!("✓ Added todo #{}", todo.id).green());
                }
                TodoAction::List => {
                    let todos = db.list_todos(&user)?;
                    if cli.json {
                        print_json(&todos)?;
                    } else {
                        let rows = todos.into_iter().map(|t| TodoRow {
                            id: t.id,
                            done: if t.done { "✓".to_string() } else { String::new() },
                            title: t.title,
                        });
                        println!("{}", Table::new(rows).with(Style::rounded()));
                    }
                }
                TodoAction::Done { id } => {
                    db.set_todo_done(&user, id, true)?;
                    println!("{}", format!("✓ Todo #{} done", id).green());
                }
                TodoAction::Undo { id } => {
                    db.set_todo_done(&user, id, false)?;
                    println!("{}", format!("Todo #{} reopened", id).yellow());
                }
                TodoAction::Remove { id } => {
                    db.delete_todo(&user, id)?;
                    println!("{}", format!("✓ Todo #{} removed", id).green());
                }
            }
        }

        Commands::RoutineLog { action } => {
            let db = open_db()?;
            match action {
                RoutineLogAction::Add { title, kind, minutes } => {
                    let run = db.log_routine_run(&user, &title, kind, minutes, Utc::now())?;
                    println!("{}", format!("✓ Logged {} ({} min)", run.title, run.minutes).green());
                }
                RoutineLogAction::List { limit } => {
                    let runs = db.list_routine_runs(&user, limit)?;
                    if cli.json {
                        print_json(&runs)?;
                    } else {
                        let rows = runs.into_iter().map(|r| RoutineRunRow {
                            completed_at: r.completed_at.format("%Y-%m-%d %H:%M").to_string(),
                            title: r.title,
                            kind: r.kind,
                            minutes: r.minutes,
                        });
                        println!("{}", Table::new(rows).with(Style::rounded()));
                    }
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                if cli.json {
                    print_json(&config)?;
                } else {
                    let text = toml::to_string_pretty(&config)
                        .context("Failed to serialize configuration to TOML")?;
                    println!("{}", text);
                }
            }
            ConfigAction::Init { force } => {
                let path = cli.config.unwrap_or_else(AppConfig::default_config_path);
                if path.exists() && !force {
                    anyhow::bail!(
                        "Config file already exists: {} (use --force to overwrite)",
                        path.display()
                    );
                }
                let mut fresh = AppConfig::default();
                fresh.save_to_file(&path)?;
                println!("{}", format!("✓ Wrote {}", path.display()).green());
            }
        },
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON input: {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn colorize_risk(risk: RiskLevel, label: &str) -> ColoredString {
    match risk {
        RiskLevel::None => label.green(),
        RiskLevel::Yellow => label.yellow().bold(),
        RiskLevel::Red => label.red().bold(),
    }
}

fn print_prediction(prediction: &Prediction, delta: &FatigueDelta, saved: bool) {
    println!("{}", "Recovery prediction".green().bold());
    println!("  Fatigue score: {}", prediction.fatigue_score.to_string().bold());
    println!("  Overtraining risk: {}", colorize_risk(prediction.risk, &prediction.risk.to_string()));
    println!("  Session load: {:.1}", prediction.session_load);
    println!("  Sleep debt: {:.1} h", prediction.sleep_debt);
    println!(
        "  Versus baseline: {:+} ({} from {})",
        delta.delta, delta.baseline, delta.source
    );

    let rows = prediction.windows.iter().map(|w| WindowRow {
        window: w.label.clone(),
        minutes: w.recommend_min,
        roi: w.expected_roi_pct,
        note: w.note.clone().unwrap_or_default(),
    });
    println!("{}", Table::new(rows).with(Style::rounded()));

    if saved {
        println!("{}", "✓ Scoring saved to history".green());
    }
}

fn print_report(report: &WeeklyReport) {
    println!("{}", "Weekly recovery report".cyan().bold());
    println!(
        "  Efficiency score: {}",
        report.efficiency_score.to_string().bold()
    );
    println!("  Badge: {}", report.badge.to_string().yellow());
    println!(
        "  Expected next performance change: +{}%",
        report.expected_next_performance_change_pct
    );

    let rows = report.days.iter().map(|d| DayRow {
        day: d.day.clone(),
        workout_load: d.workout_load,
        recovery_load: d.recovery_load,
        ratio: d.ratio,
    });
    println!("{}", Table::new(rows).with(Style::rounded()));
}
